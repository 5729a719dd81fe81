//! Per-person running totals of joint probability mass.

use crate::family::Family;
use crate::joint::Candidate;
use crate::types::{GeneCount, PersonIndex};

/// Gene and trait weights for one person.
///
/// Before normalization these are unnormalized sums of joint probabilities; after
/// normalization each array is a probability distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Marginals {
    /// Indexed by `GeneCount::index`.
    pub gene: [f64; 3],
    /// `[without trait, with trait]`.
    pub traits: [f64; 2],
}

impl Marginals {
    #[inline]
    pub fn gene_probability(&self, count: GeneCount) -> f64 {
        self.gene[count.index()]
    }

    #[inline]
    pub fn trait_probability(&self, has_trait: bool) -> f64 {
        self.traits[usize::from(has_trait)]
    }

    #[inline]
    pub fn gene_total(&self) -> f64 {
        self.gene.iter().sum()
    }

    #[inline]
    pub fn trait_total(&self) -> f64 {
        self.traits.iter().sum()
    }

    fn absorb(&mut self, other: &Marginals) {
        for (mine, theirs) in self.gene.iter_mut().zip(other.gene) {
            *mine += theirs;
        }
        for (mine, theirs) in self.traits.iter_mut().zip(other.traits) {
            *mine += theirs;
        }
    }
}

/// The distribution accumulator: one `Marginals` per person, in family order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    entries: Vec<Marginals>,
}

impl ProbabilityTable {
    /// A zeroed table sized for `family`.
    pub fn new(family: &Family) -> Self {
        Self::with_len(family.len())
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            entries: vec![Marginals::default(); len],
        }
    }

    /// Adds `probability` to each person's gene bucket and trait bucket under `candidate`.
    ///
    /// Must be called exactly once per admitted candidate.
    #[inline]
    pub fn fold(&mut self, candidate: &Candidate, probability: f64) {
        for (idx, entry) in self.entries.iter_mut().enumerate() {
            let person = PersonIndex(idx);
            entry.gene[candidate.genes.count_for(person).index()] += probability;
            entry.traits[usize::from(candidate.has_trait(person))] += probability;
        }
    }

    /// Element-wise sum of another partial table into this one.
    pub fn merge(&mut self, other: &ProbabilityTable) {
        assert_eq!(
            self.entries.len(),
            other.entries.len(),
            "cannot merge probability tables for different families"
        );
        for (mine, theirs) in self.entries.iter_mut().zip(&other.entries) {
            mine.absorb(theirs);
        }
    }

    #[inline]
    pub fn get(&self, person: PersonIndex) -> &Marginals {
        &self.entries[person.0]
    }

    pub fn entries(&self) -> &[Marginals] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [Marginals] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
