//! The fixed parameters of the inheritance network.
//!
//! These are constants of the model, not configuration: there is exactly one set of
//! tables, built once with [`ModelParameters::standard`] and passed by reference to every
//! evaluation.

use thiserror::Error;

use crate::types::GeneCount;

/// Tolerance used when checking that a distribution sums to one.
const SUM_TOLERANCE: f64 = 1e-12;

#[derive(Error, Debug, PartialEq)]
pub enum ParameterError {
    #[error("The {table} distribution sums to {sum}, but must sum to 1.")]
    NotNormalized { table: String, sum: f64 },
    #[error("The {table} table contains {value}, which is not a probability in [0, 1].")]
    OutOfRange { table: String, value: f64 },
}

/// Conditional probability tables of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    /// Unconditional probability of each copy count, indexed by `GeneCount::index`.
    gene_prior: [f64; 3],
    /// `trait_given_gene[g] = [P(no trait | g), P(trait | g)]`.
    trait_given_gene: [[f64; 2]; 3],
    /// Probability that an allele flips state during transmission.
    mutation_rate: f64,
}

impl ModelParameters {
    /// The tables every run uses.
    pub fn standard() -> Self {
        Self {
            gene_prior: [0.96, 0.03, 0.01],
            trait_given_gene: [[0.99, 0.01], [0.44, 0.56], [0.35, 0.65]],
            mutation_rate: 0.01,
        }
    }

    #[inline]
    pub fn gene_prior(&self, count: GeneCount) -> f64 {
        self.gene_prior[count.index()]
    }

    #[inline]
    pub fn trait_probability(&self, count: GeneCount, has_trait: bool) -> f64 {
        self.trait_given_gene[count.index()][usize::from(has_trait)]
    }

    #[inline]
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Probability that a parent with `parent_count` copies passes a copy to a child.
    ///
    /// A heterozygous parent passes the gene with probability one half; mutation in
    /// either direction is equally likely, so it cancels out.
    #[inline]
    pub fn transmission_probability(&self, parent_count: GeneCount) -> f64 {
        match parent_count {
            GeneCount::Zero => self.mutation_rate,
            GeneCount::One => 0.5,
            GeneCount::Two => 1.0 - self.mutation_rate,
        }
    }

    /// Probability that an unconditioned person with these tables has the trait.
    pub fn marginal_trait_probability(&self) -> f64 {
        GeneCount::DESCENDING
            .iter()
            .map(|&g| self.gene_prior(g) * self.trait_probability(g, true))
            .sum()
    }

    /// Checks that each table is a proper distribution.
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_distribution("gene prior", &self.gene_prior)?;
        for count in GeneCount::DESCENDING {
            check_distribution(
                &format!("trait given {count} copies"),
                &self.trait_given_gene[count.index()],
            )?;
        }
        check_probability("mutation rate", self.mutation_rate)
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self::standard()
    }
}

fn check_probability(table: &str, value: f64) -> Result<(), ParameterError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ParameterError::OutOfRange {
            table: table.to_string(),
            value,
        });
    }
    Ok(())
}

fn check_distribution(table: &str, values: &[f64]) -> Result<(), ParameterError> {
    for &value in values {
        check_probability(table, value)?;
    }
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(ParameterError::NotNormalized {
            table: table.to_string(),
            sum,
        });
    }
    Ok(())
}
