use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::quince_asserts::quince_assert_simple;

/// A push-only log of undo entries, segmented into checkpoints.
///
/// Restoring to an earlier checkpoint drains the entries pushed since that
/// checkpoint in reverse order, so the caller can undo them one by one.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where the i-th checkpoint ends (exclusive) on the trail.
    trail_delimiter: Vec<usize>,
    trail: Vec<T>,
}

// Implemented explicitly to avoid imposing Default on the generic type T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: Default::default(),
            trail_delimiter: Default::default(),
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.trail_delimiter.push(self.trail.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        quince_assert_simple!(new_checkpoint < self.current_checkpoint);

        let new_trail_len = self.trail_delimiter[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.trail_delimiter.truncate(new_checkpoint);
        self.trail.drain(new_trail_len..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushed_values_are_observed_through_indexing() {
        let mut trail = Trail::default();

        let expected = [1, 2, 3, 4];
        for &elem in expected.iter() {
            trail.push(elem);
        }

        assert_eq!(&expected, trail.deref());
    }

    #[test]
    fn backtracking_removes_elements_beyond_checkpoint() {
        let mut trail = Trail::default();

        trail.new_checkpoint();
        trail.push(1);
        let _ = trail.synchronise(0);

        assert!(trail.is_empty());
    }

    #[test]
    fn backtracking_is_nonchronological() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_checkpoint();
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);
        trail.new_checkpoint();
        trail.push(4);

        let _ = trail.synchronise(1);

        assert_eq!(&[1, 2], trail.deref());
    }

    #[test]
    fn popped_elements_are_given_in_reverse_order_when_backtracking() {
        let mut trail = Trail::default();
        trail.push(1);

        trail.new_checkpoint();
        trail.push(2);
        trail.new_checkpoint();
        trail.push(3);
        trail.new_checkpoint();
        trail.push(4);

        let popped = trail.synchronise(0).collect::<Vec<_>>();
        assert_eq!(vec![4, 3, 2], popped);
    }
}
