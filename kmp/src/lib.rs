//! Knuth-Morris-Pratt substring search over byte strings.
//!
//! A [`Matcher`] is built once per pattern and can then scan any number of
//! texts in O(text) time apiece, reporting every match position in order,
//! overlapping ones included. The construction cost is O(pattern), spent
//! on the failure table: for each prefix, the length of its longest proper
//! border (a string that is both a prefix and a suffix of it).

/// A compiled pattern.
pub struct Matcher {
    pattern: Vec<u8>,
    // fail[i] is the border length of pattern[..=i].
    fail: Vec<usize>,
}

impl Matcher {
    /// Compile `pattern`.
    ///
    /// # Panics
    ///
    /// The pattern must be non-empty; the empty pattern would "match"
    /// before every byte, which no caller has ever meant.
    pub fn new(pattern: &[u8]) -> Matcher {
        assert!(!pattern.is_empty(), "pattern must be non-empty");
        let mut fail = vec![0; pattern.len()];
        let mut border = 0;
        for i in 1..pattern.len() {
            while border > 0 && pattern[i] != pattern[border] {
                border = fail[border - 1];
            }
            if pattern[i] == pattern[border] {
                border += 1;
            }
            fail[i] = border;
        }
        Matcher {
            pattern: pattern.to_vec(),
            fail,
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Start offsets of every occurrence of the pattern in `text`, in
    /// increasing order. Occurrences may overlap: "aa" matches "aaa" at
    /// both 0 and 1.
    pub fn find_iter<'m, 't>(&'m self, text: &'t [u8]) -> FindIter<'m, 't> {
        FindIter {
            matcher: self,
            text,
            at: 0,
            matched: 0,
        }
    }

    /// Offset of the first occurrence, if any.
    pub fn find(&self, text: &[u8]) -> Option<usize> {
        self.find_iter(text).next()
    }

    pub fn is_match(&self, text: &[u8]) -> bool {
        self.find(text).is_some()
    }
}

/// Iterator over match offsets; see [`Matcher::find_iter`].
///
/// The automaton state persists across `next` calls, so draining the
/// iterator costs one pass over the text no matter how many matches it
/// yields.
pub struct FindIter<'m, 't> {
    matcher: &'m Matcher,
    text: &'t [u8],
    at: usize,
    matched: usize,
}

impl Iterator for FindIter<'_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let pattern = &self.matcher.pattern;
        let fail = &self.matcher.fail;
        while self.at < self.text.len() {
            let byte = self.text[self.at];
            while self.matched > 0 && byte != pattern[self.matched] {
                self.matched = fail[self.matched - 1];
            }
            if byte == pattern[self.matched] {
                self.matched += 1;
            }
            self.at += 1;
            if self.matched == pattern.len() {
                // Fall back to the longest border so the next occurrence
                // can overlap this one.
                self.matched = fail[self.matched - 1];
                return Some(self.at - pattern.len());
            }
        }
        None
    }
}
