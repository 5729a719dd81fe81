//! Presentation of normalized posteriors: a plain-text rendering for the terminal and a
//! TOML document for downstream tools.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accumulate::ProbabilityTable;
use crate::family::Family;
use crate::types::GeneCount;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to serialize report to TOML format: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("Failed to parse TOML report: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Renders each person's distributions with four decimals, in family order.
///
/// ```text
/// Harry:
///   Gene:
///     2: 0.0092
///     1: 0.4557
///     0: 0.5351
///   Trait:
///     True: 0.2665
///     False: 0.7335
/// ```
pub fn render_text(family: &Family, table: &ProbabilityTable) -> String {
    let mut out = String::new();
    for (idx, person) in family.iter() {
        let marginals = table.get(idx);
        // Writing to a `String` cannot fail.
        let _ = writeln!(out, "{}:", person.name);
        let _ = writeln!(out, "  Gene:");
        for count in GeneCount::DESCENDING {
            let _ = writeln!(out, "    {count}: {:.4}", marginals.gene_probability(count));
        }
        let _ = writeln!(out, "  Trait:");
        for (label, has_trait) in [("True", true), ("False", false)] {
            let _ = writeln!(
                out,
                "    {label}: {:.4}",
                marginals.trait_probability(has_trait)
            );
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneReport {
    pub two: f64,
    pub one: f64,
    pub zero: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitReport {
    pub present: f64,
    pub absent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonReport {
    pub name: String,
    /// The observation the posterior was conditioned on, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_trait: Option<bool>,
    pub gene: GeneReport,
    #[serde(rename = "trait")]
    pub trait_report: TraitReport,
}

/// A serializable snapshot of a finished inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorReport {
    pub people: Vec<PersonReport>,
}

impl PosteriorReport {
    pub fn new(family: &Family, table: &ProbabilityTable) -> Self {
        let people = family
            .iter()
            .map(|(idx, person)| {
                let m = table.get(idx);
                PersonReport {
                    name: person.name.clone(),
                    observed_trait: person.observed_trait,
                    gene: GeneReport {
                        two: m.gene_probability(GeneCount::Two),
                        one: m.gene_probability(GeneCount::One),
                        zero: m.gene_probability(GeneCount::Zero),
                    },
                    trait_report: TraitReport {
                        present: m.trait_probability(true),
                        absent: m.trait_probability(false),
                    },
                }
            })
            .collect();
        Self { people }
    }

    pub fn person(&self, name: &str) -> Option<&PersonReport> {
        self.people.iter().find(|p| p.name == name)
    }

    pub fn to_toml(&self) -> Result<String, ReportError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves the report to a file in a human-readable TOML format.
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        let toml_string = self.to_toml()?;
        let mut file = BufWriter::new(fs::File::create(path)?);
        file.write_all(toml_string.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Loads a report previously written by [`PosteriorReport::save`].
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let toml_string = fs::read_to_string(path)?;
        Ok(toml::from_str(&toml_string)?)
    }
}
