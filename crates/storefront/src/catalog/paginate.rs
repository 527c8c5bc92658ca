//! Per-section sliding window over a list.

use std::collections::HashMap;

/// Number of products exposed per window.
pub const WINDOW_SIZE: usize = 6;

/// Independent page cursors keyed by section name.
///
/// A cursor counts windows, not items: cursor 1 exposes items 6–11.
#[derive(Debug, Clone)]
pub struct Paginator {
    window: usize,
    cursors: HashMap<String, usize>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}

impl Paginator {
    /// Create a paginator with a given window size (at least 1).
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            cursors: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window
    }

    /// Current cursor for a section; unknown sections sit at 0.
    #[must_use]
    pub fn cursor(&self, name: &str) -> usize {
        self.cursors.get(name).copied().unwrap_or(0)
    }

    /// Move forward one window if another window has items.
    ///
    /// Returns whether the cursor moved.
    pub fn advance(&mut self, name: &str, len: usize) -> bool {
        let cursor = self.cursor(name);
        if (cursor + 1) * self.window < len {
            self.cursors.insert(name.to_string(), cursor + 1);
            true
        } else {
            false
        }
    }

    /// Move back one window, stopping at 0.
    ///
    /// Returns whether the cursor moved.
    pub fn retreat(&mut self, name: &str) -> bool {
        let cursor = self.cursor(name);
        if cursor == 0 {
            return false;
        }
        self.cursors.insert(name.to_string(), cursor - 1);
        true
    }

    /// Put one section back at its first window.
    pub fn reset(&mut self, name: &str) {
        self.cursors.remove(name);
    }

    /// Put every section back at its first window.
    pub fn reset_all(&mut self) {
        self.cursors.clear();
    }

    /// Items visible in the section's current window.
    ///
    /// A cursor left past the end (the list shrank) yields an empty window.
    #[must_use]
    pub fn window<'a, T>(&self, name: &str, items: &'a [T]) -> &'a [T] {
        let start = self.cursor(name).saturating_mul(self.window);
        let end = start.saturating_add(self.window).min(items.len());
        items.get(start..end).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_exposes_next_window() {
        let items: Vec<usize> = (0..20).collect();
        let mut pager = Paginator::default();

        assert_eq!(pager.window("s", &items), &[0, 1, 2, 3, 4, 5]);
        assert!(pager.advance("s", items.len()));
        assert_eq!(pager.cursor("s"), 1);
        assert_eq!(pager.window("s", &items), &[6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_advance_stops_at_last_window() {
        let items: Vec<usize> = (0..20).collect();
        let mut pager = Paginator::default();
        assert!(pager.advance("s", 20));
        assert!(pager.advance("s", 20));
        assert!(pager.advance("s", 20));
        assert_eq!(pager.cursor("s"), 3);
        assert_eq!(pager.window("s", &items), &[18, 19]);

        assert!(!pager.advance("s", 20));
        assert_eq!(pager.cursor("s"), 3);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_window() {
        let mut pager = Paginator::default();
        assert!(pager.advance("s", 12));
        assert!(!pager.advance("s", 12));
    }

    #[test]
    fn test_retreat_clamps_at_zero() {
        let mut pager = Paginator::default();
        assert!(!pager.retreat("s"));
        assert_eq!(pager.cursor("s"), 0);
        pager.advance("s", 20);
        assert!(pager.retreat("s"));
        assert_eq!(pager.cursor("s"), 0);
    }

    #[test]
    fn test_cursors_are_independent() {
        let mut pager = Paginator::default();
        pager.advance("a", 20);
        assert_eq!(pager.cursor("a"), 1);
        assert_eq!(pager.cursor("b"), 0);

        pager.reset("a");
        assert_eq!(pager.cursor("a"), 0);

        pager.advance("a", 20);
        pager.advance("b", 20);
        pager.reset_all();
        assert_eq!(pager.cursor("a"), 0);
        assert_eq!(pager.cursor("b"), 0);
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let mut pager = Paginator::default();
        pager.advance("s", 20);
        pager.advance("s", 20);
        let short: Vec<u8> = vec![1, 2, 3];
        assert!(pager.window("s", &short).is_empty());
    }
}
