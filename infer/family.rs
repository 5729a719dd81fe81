//! # Family Model
//!
//! The immutable, validated pedigree that the inference engine reads. Construction is
//! the only place referential integrity is checked; downstream modules index people by
//! `PersonIndex` and never look names up again.

use std::collections::HashMap;
use thiserror::Error;

use crate::types::{MAX_FAMILY_SIZE, PersonIndex, PersonSet};

/// A single unvalidated row of family data, as produced by a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub name: String,
    pub mother: Option<String>,
    pub father: Option<String>,
    /// `Some(true)` if the person is known to have the trait, `Some(false)` if known not
    /// to, `None` if unobserved.
    pub observed_trait: Option<bool>,
}

impl PersonRecord {
    pub fn founder(name: &str, observed_trait: Option<bool>) -> Self {
        Self {
            name: name.to_string(),
            mother: None,
            father: None,
            observed_trait,
        }
    }

    pub fn child(name: &str, mother: &str, father: &str, observed_trait: Option<bool>) -> Self {
        Self {
            name: name.to_string(),
            mother: Some(mother.to_string()),
            father: Some(father.to_string()),
            observed_trait,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parents {
    pub mother: PersonIndex,
    pub father: PersonIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub parents: Option<Parents>,
    pub observed_trait: Option<bool>,
}

/// Errors raised while assembling a `Family` from records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FamilyError {
    #[error("A person with an empty name was found. Every row needs a name.")]
    EmptyName,
    #[error("The name '{0}' appears more than once. Names must be unique.")]
    DuplicateName(String),
    #[error(
        "'{person}' lists only one parent. Mother and father must both be given or both be blank."
    )]
    IncompleteParents { person: String },
    #[error("'{person}' lists '{parent}' as a parent, but no such person exists in the family.")]
    UnknownParent { person: String, parent: String },
    #[error("'{0}' is listed as their own parent.")]
    SelfParent(String),
    #[error("The family has {found} people, but at most {max} are supported.")]
    TooManyPeople { found: usize, max: usize },
}

/// An ordered, validated collection of people.
///
/// The order of `people` is the input order and is the order of every output.
#[derive(Debug, Clone)]
pub struct Family {
    people: Vec<Person>,
    by_name: HashMap<String, PersonIndex>,
}

impl Family {
    /// Validates `records` and resolves parent names to indices.
    pub fn from_records(records: Vec<PersonRecord>) -> Result<Self, FamilyError> {
        if records.len() > MAX_FAMILY_SIZE {
            return Err(FamilyError::TooManyPeople {
                found: records.len(),
                max: MAX_FAMILY_SIZE,
            });
        }

        let mut by_name = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.name.is_empty() {
                return Err(FamilyError::EmptyName);
            }
            if by_name
                .insert(record.name.clone(), PersonIndex(idx))
                .is_some()
            {
                return Err(FamilyError::DuplicateName(record.name.clone()));
            }
        }

        let resolve = |person: &str, parent: &str| -> Result<PersonIndex, FamilyError> {
            if parent == person {
                return Err(FamilyError::SelfParent(person.to_string()));
            }
            by_name
                .get(parent)
                .copied()
                .ok_or_else(|| FamilyError::UnknownParent {
                    person: person.to_string(),
                    parent: parent.to_string(),
                })
        };

        let mut people = Vec::with_capacity(records.len());
        for record in records {
            let parents = match (record.mother.as_deref(), record.father.as_deref()) {
                (None, None) => None,
                (Some(mother), Some(father)) => Some(Parents {
                    mother: resolve(&record.name, mother)?,
                    father: resolve(&record.name, father)?,
                }),
                _ => {
                    return Err(FamilyError::IncompleteParents {
                        person: record.name,
                    });
                }
            };
            people.push(Person {
                name: record.name,
                parents,
                observed_trait: record.observed_trait,
            });
        }

        Ok(Self { people, by_name })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    #[inline]
    pub fn person(&self, index: PersonIndex) -> &Person {
        &self.people[index.0]
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn index_of(&self, name: &str) -> Option<PersonIndex> {
        self.by_name.get(name).copied()
    }

    /// `(index, person)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (PersonIndex, &Person)> {
        self.people
            .iter()
            .enumerate()
            .map(|(idx, person)| (PersonIndex(idx), person))
    }

    /// Everyone in the family.
    pub fn everyone(&self) -> PersonSet {
        PersonSet::first(self.people.len())
    }
}
