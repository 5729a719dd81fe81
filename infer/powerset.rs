//! Lazy powerset generation over a `PersonSet`.
//!
//! Subsets are produced by stepping through the sub-masks of the parent mask in
//! ascending numeric order: `next = ((current | !mask) + 1) & mask`. Nothing is
//! materialized, so nesting three of these costs no memory beyond their cursors.

use std::iter::FusedIterator;

use crate::types::PersonSet;

/// Iterator over every subset of a `PersonSet`, empty and full set included.
#[derive(Debug, Clone)]
pub struct Subsets {
    mask: u64,
    next: Option<u64>,
    remaining: u128,
}

/// All `2^n` subsets of `set`.
pub fn subsets(set: PersonSet) -> Subsets {
    Subsets {
        mask: set.bits(),
        next: Some(0),
        remaining: 1u128 << set.len(),
    }
}

impl Iterator for Subsets {
    type Item = PersonSet;

    #[inline]
    fn next(&mut self) -> Option<PersonSet> {
        let current = self.next?;
        let following = (current | !self.mask).wrapping_add(1) & self.mask;
        self.next = (following != 0).then_some(following);
        self.remaining -= 1;
        Some(PersonSet::from_bits(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Subsets {}
