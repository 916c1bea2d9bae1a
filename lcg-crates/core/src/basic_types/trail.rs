use std::iter::Rev;
use std::vec::Drain;

use crate::lcg_assert_simple;

/// Undo entries grouped by decision level. Entries are handed back most recent first, so that
/// applying them in order restores the oldest state.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    entries: Vec<T>,
    /// The index in `entries` at which each level above the root starts.
    level_starts: Vec<usize>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            entries: Vec::new(),
            level_starts: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    pub(crate) fn increase_decision_level(&mut self) {
        self.level_starts.push(self.entries.len());
    }

    pub(crate) fn get_decision_level(&self) -> usize {
        self.level_starts.len()
    }

    /// Drop the levels above `level` and return their entries.
    pub(crate) fn synchronise(&mut self, level: usize) -> Rev<Drain<'_, T>> {
        lcg_assert_simple!(level <= self.get_decision_level());

        let start = self
            .level_starts
            .get(level)
            .copied()
            .unwrap_or(self.entries.len());
        self.level_starts.truncate(level);
        self.entries.drain(start..).rev()
    }

    /// Return the entries from `position` onwards. `position` may not lie before the start of
    /// the current level.
    pub(crate) fn truncate_to(&mut self, position: usize) -> Rev<Drain<'_, T>> {
        lcg_assert_simple!(self
            .level_starts
            .last()
            .map_or(true, |&start| start <= position));

        let position = position.min(self.entries.len());
        self.entries.drain(position..).rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_undone_together() {
        let mut trail = Trail::default();
        trail.push('a');

        trail.increase_decision_level();
        trail.push('b');
        trail.increase_decision_level();
        trail.increase_decision_level();
        trail.push('c');
        trail.push('d');

        assert_eq!(vec!['d', 'c'], trail.synchronise(1).collect::<Vec<_>>());
        assert_eq!(1, trail.get_decision_level());
        assert_eq!(2, trail.len());

        assert_eq!(vec!['b'], trail.synchronise(0).collect::<Vec<_>>());
        assert_eq!(0, trail.get_decision_level());
    }

    #[test]
    fn truncation_stays_within_the_level() {
        let mut trail = Trail::default();
        trail.push(1);
        trail.increase_decision_level();
        trail.push(2);
        trail.push(3);
        trail.push(4);

        let popped = trail.truncate_to(2).collect::<Vec<_>>();

        assert_eq!(vec![4, 3], popped);
        assert_eq!(1, trail.get_decision_level());
        assert_eq!(2, trail.len());
    }
}
