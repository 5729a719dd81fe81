//! Rescaling accumulated weights into probability distributions.

use thiserror::Error;

use crate::accumulate::ProbabilityTable;
use crate::family::Family;

#[derive(Error, Debug, PartialEq)]
pub enum NormalizationError {
    #[error(
        "Internal error: the {distribution} distribution for '{person}' has total weight {total}. No candidate consistent with the evidence contributed to it."
    )]
    DegenerateDistribution {
        person: String,
        distribution: &'static str,
        total: f64,
    },
}

/// Rescales every person's gene and trait weights in place so each sums to one.
///
/// The gene and trait arrays are scaled by their own totals. The table is left
/// untouched if any distribution has a zero or non-finite total.
pub fn normalize(table: &mut ProbabilityTable, family: &Family) -> Result<(), NormalizationError> {
    assert_eq!(
        table.len(),
        family.len(),
        "probability table does not match the family"
    );

    for (entry, person) in table.entries().iter().zip(family.people()) {
        for (distribution, total) in [("gene", entry.gene_total()), ("trait", entry.trait_total())] {
            if !(total.is_finite() && total > 0.0) {
                return Err(NormalizationError::DegenerateDistribution {
                    person: person.name.clone(),
                    distribution,
                    total,
                });
            }
        }
    }

    for entry in table.entries_mut() {
        let gene_scale = 1.0 / entry.gene_total();
        let trait_scale = 1.0 / entry.trait_total();
        entry.gene.iter_mut().for_each(|w| *w *= gene_scale);
        entry.traits.iter_mut().for_each(|w| *w *= trait_scale);
    }
    Ok(())
}
