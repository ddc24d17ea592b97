// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Submitted lines, oldest first, plus the index of the entry currently shown. An index
/// equal to [`History::len`] means a fresh line is shown.
///
/// Entries keep the exact bytes that were submitted. History lives for the process only
/// and is never truncated.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<Vec<u8>>,
    index: usize,
}

impl History {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn entries(&self) -> &[Vec<u8>] { &self.entries }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[must_use]
    pub fn index(&self) -> usize { self.index }

    /// Record a submitted line. Empty lines and repeats of the last entry are skipped.
    /// Either way navigation restarts after the newest entry. Returns `true` when the
    /// line was appended.
    pub fn update(&mut self, line: &[u8]) -> bool {
        let is_new =
            !line.is_empty() && self.entries.last().map(Vec::as_slice) != Some(line);
        if is_new {
            self.entries.push(line.to_vec());
        }
        self.index = self.entries.len();
        is_new
    }

    /// Step `count` entries toward the oldest one, stopping at it. Returns `None` when
    /// already at the oldest entry.
    pub fn search_previous(&mut self, count: usize) -> Option<&[u8]> {
        if self.index == 0 {
            return None;
        }
        self.index = self.index.saturating_sub(count);
        Some(self.entries[self.index].as_slice())
    }

    /// Step `count` entries toward the fresh line, stopping at it. Returns `None` when
    /// already at the fresh line, and an empty slice when the fresh line is reached.
    pub fn search_next(&mut self, count: usize) -> Option<&[u8]> {
        let len = self.entries.len();
        if self.index == len {
            return None;
        }
        self.index = self.index.saturating_add(count).min(len);
        Some(self.entries.get(self.index).map(Vec::as_slice).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_update_dedups_and_skips_empty() {
        let mut history = History::new();
        assert!(history.update(b"ls"));
        assert!(!history.update(b"ls"));
        assert!(!history.update(b""));
        assert!(history.update(b"pwd"));
        assert!(history.update(b"ls"));
        assert_eq!(
            history.entries(),
            &[b"ls".to_vec(), b"pwd".to_vec(), b"ls".to_vec()]
        );
        assert_eq!(history.index(), 3);
    }

    #[test]
    fn test_search_previous_clamps_at_oldest() {
        let mut history = History::new();
        history.update(b"one");
        history.update(b"two");
        history.update(b"three");

        assert_eq!(history.search_previous(1), Some(&b"three"[..]));
        assert_eq!(history.search_previous(5), Some(&b"one"[..]));
        assert_eq!(history.index(), 0);
        assert_eq!(history.search_previous(1), None);
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_search_next_reaches_fresh_line() {
        let mut history = History::new();
        assert_eq!(history.search_next(1), None);

        history.update(b"one");
        history.update(b"two");
        history.search_previous(2);

        assert_eq!(history.search_next(1), Some(&b"two"[..]));
        assert_eq!(history.search_next(9), Some(&b""[..]));
        assert_eq!(history.index(), 2);
        assert_eq!(history.search_next(1), None);
    }
}
