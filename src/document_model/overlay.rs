/// Derived highlight marking text enclosed in round brackets.
///
/// Intervals are inclusive `(open, close)` char positions, sorted and
/// disjoint. The overlay is never edited directly; it is rebuilt from the
/// raw text after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketOverlay {
    intervals: Vec<(usize, usize)>,
}

impl BracketOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    /// Clear every mark and rescan `raw`.
    pub fn recompute(&mut self, raw: &[char]) {
        self.clear();
        self.intervals = Self::scan(raw);
    }

    /// Leftmost, non-nesting, single-pass match of `(` ... `)`.
    ///
    /// Each `(` pairs with the first `)` after it and scanning resumes past
    /// that `)`, so `(a(b)c)` yields `(a(b)` only. An `(` with no later `)`
    /// stops the scan altogether.
    pub fn scan(raw: &[char]) -> Vec<(usize, usize)> {
        let mut intervals = Vec::new();
        let mut start = 0;

        while start < raw.len() {
            let Some(open) = raw[start..].iter().position(|&c| c == '(').map(|i| start + i) else {
                break;
            };
            let Some(close) = raw[open + 1..]
                .iter()
                .position(|&c| c == ')')
                .map(|i| open + 1 + i)
            else {
                break;
            };

            intervals.push((open, close));
            start = close + 1;
        }

        intervals
    }

    pub fn contains(&self, position: usize) -> bool {
        let idx = self.intervals.partition_point(|&(open, _)| open <= position);
        idx > 0 && self.intervals[idx - 1].1 >= position
    }

    pub fn intervals(&self) -> &[(usize, usize)] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn marked(text: &str) -> String {
        let raw = chars(text);
        let mut overlay = BracketOverlay::new();
        overlay.recompute(&raw);
        raw.iter()
            .enumerate()
            .filter(|(i, _)| overlay.contains(*i))
            .map(|(_, c)| *c)
            .collect()
    }

    #[test]
    fn test_simple_pair() {
        assert_eq!(BracketOverlay::scan(&chars("x (ab) y")), vec![(2, 5)]);
        assert_eq!(marked("x (ab) y"), "(ab)");
    }

    #[test]
    fn test_multiple_pairs() {
        assert_eq!(
            BracketOverlay::scan(&chars("(a) b (cd)")),
            vec![(0, 2), (6, 9)]
        );
    }

    #[test]
    fn test_nesting_is_not_respected() {
        assert_eq!(BracketOverlay::scan(&chars("a(b(c)d)e")), vec![(1, 5)]);
        assert_eq!(marked("a(b(c)d)e"), "(b(c)");
    }

    #[test]
    fn test_trailing_close_after_nested_pair_is_not_marked() {
        let overlay = {
            let mut o = BracketOverlay::new();
            o.recompute(&chars("(a(b)c)"));
            o
        };
        assert_eq!(overlay.intervals(), &[(0, 4)]);
        assert!(!overlay.contains(5));
        assert!(!overlay.contains(6));
    }

    // Quirk kept on purpose: an unmatched `(` ends the scan.
    #[test]
    fn test_unmatched_open_halts_scan() {
        let text = "(ab) (cd";
        assert_eq!(marked(text), "(ab)");
        let raw = chars(text);
        let mut overlay = BracketOverlay::new();
        overlay.recompute(&raw);
        assert!((5..raw.len()).all(|i| !overlay.contains(i)));
    }

    #[test]
    fn test_unmatched_open_marks_nothing() {
        assert!(BracketOverlay::scan(&chars("(x")).is_empty());
        assert_eq!(marked("a ( b"), "");
        assert_eq!(marked("(a) ( b"), "(a)");
    }

    #[test]
    fn test_close_before_open_is_ignored() {
        assert_eq!(BracketOverlay::scan(&chars(") (a)")), vec![(2, 4)]);
    }

    #[test]
    fn test_empty_pair_and_empty_text() {
        assert_eq!(BracketOverlay::scan(&chars("()")), vec![(0, 1)]);
        assert!(BracketOverlay::scan(&[]).is_empty());
    }

    #[test]
    fn test_recompute_replaces_previous_marks() {
        let mut overlay = BracketOverlay::new();
        overlay.recompute(&chars("(a)"));
        assert!(!overlay.is_empty());
        overlay.recompute(&chars("a"));
        assert!(overlay.is_empty());
    }
}
