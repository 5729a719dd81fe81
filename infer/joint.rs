//! Joint probability of one fully specified gene/trait assignment.

use crate::family::Family;
use crate::params::ModelParameters;
use crate::types::{GeneCount, PersonIndex, PersonSet};

/// A partition of a family into one-copy, two-copy and (implicitly) zero-copy carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneAssignment {
    one_copy: PersonSet,
    two_copies: PersonSet,
}

impl GeneAssignment {
    /// # Panics
    /// If the two sets overlap. The enumeration draws `two_copies` from the complement
    /// of `one_copy`, so an overlap is a programming error.
    pub fn new(one_copy: PersonSet, two_copies: PersonSet) -> Self {
        assert!(
            one_copy.is_disjoint(two_copies),
            "one-copy and two-copy sets overlap: {:#x} & {:#x}",
            one_copy.bits(),
            two_copies.bits()
        );
        Self {
            one_copy,
            two_copies,
        }
    }

    #[inline]
    pub fn one_copy(&self) -> PersonSet {
        self.one_copy
    }

    #[inline]
    pub fn two_copies(&self) -> PersonSet {
        self.two_copies
    }

    #[inline]
    pub fn count_for(&self, person: PersonIndex) -> GeneCount {
        if self.one_copy.contains(person) {
            GeneCount::One
        } else if self.two_copies.contains(person) {
            GeneCount::Two
        } else {
            GeneCount::Zero
        }
    }
}

/// One complete joint outcome over every person in a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub genes: GeneAssignment,
    pub with_trait: PersonSet,
}

impl Candidate {
    #[inline]
    pub fn has_trait(&self, person: PersonIndex) -> bool {
        self.with_trait.contains(person)
    }
}

/// Probability that a person has exactly `count` copies given their parents' counts.
///
/// Both routes to a heterozygous child are summed: the mother passes the gene and the
/// father does not, or the other way round.
#[inline]
pub fn inherited_gene_probability(
    params: &ModelParameters,
    count: GeneCount,
    mother: GeneCount,
    father: GeneCount,
) -> f64 {
    let from_mother = params.transmission_probability(mother);
    let from_father = params.transmission_probability(father);
    match count {
        GeneCount::Zero => (1.0 - from_mother) * (1.0 - from_father),
        GeneCount::One => from_mother * (1.0 - from_father) + (1.0 - from_mother) * from_father,
        GeneCount::Two => from_mother * from_father,
    }
}

/// Probability that every person's gene count and trait status match `candidate`.
///
/// Each person contributes P(gene | parents or prior) × P(trait | gene). Parents' counts
/// are read from the same candidate, so the product over people is the joint.
pub fn joint_probability(
    family: &Family,
    candidate: &Candidate,
    params: &ModelParameters,
) -> f64 {
    family
        .iter()
        .map(|(idx, person)| {
            let count = candidate.genes.count_for(idx);
            let gene_probability = match person.parents {
                None => params.gene_prior(count),
                Some(parents) => inherited_gene_probability(
                    params,
                    count,
                    candidate.genes.count_for(parents.mother),
                    candidate.genes.count_for(parents.father),
                ),
            };
            gene_probability * params.trait_probability(count, candidate.has_trait(idx))
        })
        .product()
}
