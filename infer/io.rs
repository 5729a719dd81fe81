//! # Family Loading
//!
//! Reads the family CSV (`name,mother,father,trait`) into a validated [`Family`].
//!
//! - Strict Schema: the four column names are fixed. Extra columns are ignored.
//! - Blank means absent: an empty `mother`/`father` field means no recorded parent and an
//!   empty `trait` field means the trait was not observed.
//! - Errors carry the CSV line so the user can find the offending row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::family::{Family, FamilyError, PersonRecord};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not open family file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("Line {line}: trait must be '1', '0' or blank, found '{value}'.")]
    InvalidTrait { line: u64, value: String },
    #[error("Invalid family: {0}")]
    Family(#[from] FamilyError),
}

#[derive(Debug, Deserialize)]
struct Row {
    name: String,
    #[serde(default)]
    mother: String,
    #[serde(default)]
    father: String,
    #[serde(default, rename = "trait")]
    trait_value: String,
}

fn non_blank(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn parse_trait(value: &str, line: u64) -> Result<Option<bool>, LoadError> {
    match value {
        "" => Ok(None),
        "1" => Ok(Some(true)),
        "0" => Ok(Some(false)),
        other => Err(LoadError::InvalidTrait {
            line,
            value: other.to_string(),
        }),
    }
}

/// Parses family CSV data from any reader.
pub fn read_family<R: Read>(reader: R) -> Result<Family, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |pos| pos.line());
        let row: Row = record.deserialize(Some(&headers))?;
        records.push(PersonRecord {
            observed_trait: parse_trait(&row.trait_value, line)?,
            name: row.name,
            mother: non_blank(row.mother),
            father: non_blank(row.father),
        });
    }

    debug!("Parsed {} family records", records.len());
    Ok(Family::from_records(records)?)
}

/// Loads and validates a family CSV file.
pub fn load_family(path: &Path) -> Result<Family, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let family = read_family(file)?;
    debug!("Loaded {} people from {}", family.len(), path.display());
    Ok(family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PersonIndex;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const POTTER_CSV: &str = "name,mother,father,trait\nHarry,Lily,James,\nJames,,,1\nLily,,,0\n";

    #[test]
    fn parses_parents_and_observations() {
        let family = read_family(POTTER_CSV.as_bytes()).unwrap();
        assert_eq!(family.len(), 3);

        let harry = family.person(PersonIndex(0));
        assert_eq!(harry.name, "Harry");
        assert_eq!(harry.observed_trait, None);
        let parents = harry.parents.unwrap();
        assert_eq!(family.person(parents.mother).name, "Lily");
        assert_eq!(family.person(parents.father).name, "James");

        assert_eq!(family.person(PersonIndex(1)).observed_trait, Some(true));
        assert_eq!(family.person(PersonIndex(2)).observed_trait, Some(false));
        assert!(family.person(PersonIndex(2)).parents.is_none());
    }

    #[test]
    fn trims_whitespace_and_ignores_extra_columns() {
        let csv = "name, mother, father, trait, note\n Ron , Molly , Arthur , 0 , x\nMolly,,,,\nArthur,,,1,\n";
        let family = read_family(csv.as_bytes()).unwrap();
        let ron = family.person(PersonIndex(0));
        assert_eq!(ron.name, "Ron");
        assert_eq!(ron.observed_trait, Some(false));
        assert!(ron.parents.is_some());
    }

    #[test]
    fn rejects_unknown_trait_encoding() {
        let csv = "name,mother,father,trait\nHarry,,,yes\n";
        let err = read_family(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::InvalidTrait { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "yes");
            }
            other => panic!("Expected InvalidTrait, got {other:?}"),
        }
    }

    #[test]
    fn surfaces_family_validation_errors() {
        let csv = "name,mother,father,trait\nHarry,Lily,,\nLily,,,\n";
        let err = read_family(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Family(FamilyError::IncompleteParents { .. })
        ));
    }

    #[test]
    fn rejects_missing_name_column() {
        let csv = "person,mother,father,trait\nHarry,,,\n";
        assert!(matches!(
            read_family(csv.as_bytes()).unwrap_err(),
            LoadError::Csv(_)
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{POTTER_CSV}").unwrap();
        file.flush().unwrap();

        let family = load_family(file.path()).unwrap();
        assert_eq!(family.index_of("James"), Some(PersonIndex(1)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_family(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.csv"));
    }
}
