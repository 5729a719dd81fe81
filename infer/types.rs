// ========================================================================================
//                             High-Level Data Contracts
// ========================================================================================

// This file is ONLY for types that are SHARED BETWEEN FILES, not types that only are used in one file.

use std::fmt;

/// The largest family the engine can represent. A `PersonSet` is a 64-bit mask.
pub const MAX_FAMILY_SIZE: usize = 64;

/// How many copies of the gene of interest a person carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeneCount {
    Zero,
    One,
    Two,
}

impl GeneCount {
    /// All copy counts in the order reports print them.
    pub const DESCENDING: [GeneCount; 3] = [GeneCount::Two, GeneCount::One, GeneCount::Zero];

    /// Position of this count in a `[f64; 3]` table indexed by copies.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
        }
    }

    #[inline]
    pub fn copies(self) -> u8 {
        self.index() as u8
    }
}

impl fmt::Display for GeneCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.copies())
    }
}

/// Dense index of a person inside a `Family`. Stable for the life of the family and
/// equal to the person's position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonIndex(pub usize);

/// A set of people from one family, stored as a bit mask over `PersonIndex`.
///
/// Every set operation the enumeration needs (membership, complement within the family,
/// disjointness) is a single integer instruction, which keeps the innermost loop free of
/// allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PersonSet(u64);

impl PersonSet {
    pub const EMPTY: PersonSet = PersonSet(0);

    /// The set containing the first `size` people of a family.
    pub fn first(size: usize) -> Self {
        assert!(
            size <= MAX_FAMILY_SIZE,
            "a person set holds at most {MAX_FAMILY_SIZE} people, got {size}"
        );
        if size == MAX_FAMILY_SIZE {
            Self(u64::MAX)
        } else {
            Self((1u64 << size) - 1)
        }
    }

    #[inline]
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[inline]
    pub fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn contains(self, person: PersonIndex) -> bool {
        person.0 < MAX_FAMILY_SIZE && self.0 & (1u64 << person.0) != 0
    }

    #[inline]
    pub fn with(self, person: PersonIndex) -> Self {
        debug_assert!(person.0 < MAX_FAMILY_SIZE);
        Self(self.0 | (1u64 << person.0))
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn intersection(self, other: PersonSet) -> Self {
        Self(self.0 & other.0)
    }

    #[inline]
    pub fn union(self, other: PersonSet) -> Self {
        Self(self.0 | other.0)
    }

    /// Members of `self` that are not in `other`.
    #[inline]
    pub fn difference(self, other: PersonSet) -> Self {
        Self(self.0 & !other.0)
    }

    #[inline]
    pub fn is_disjoint(self, other: PersonSet) -> bool {
        self.0 & other.0 == 0
    }

    #[inline]
    pub fn is_subset(self, other: PersonSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Members in ascending index order.
    pub fn iter(self) -> impl Iterator<Item = PersonIndex> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let lowest = remaining.trailing_zeros() as usize;
            remaining &= remaining - 1;
            Some(PersonIndex(lowest))
        })
    }
}

impl FromIterator<PersonIndex> for PersonSet {
    fn from_iter<I: IntoIterator<Item = PersonIndex>>(iter: I) -> Self {
        iter.into_iter().fold(PersonSet::EMPTY, PersonSet::with)
    }
}
