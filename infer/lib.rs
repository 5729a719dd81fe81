#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

//! Exact posterior inference of gene copy counts and trait status within a family.
//!
//! A family is loaded with [`io::load_family`], solved with [`engine::infer`] under the
//! fixed [`params::ModelParameters`], and presented with [`report`].

pub mod accumulate;
pub mod engine;
pub mod family;
pub mod io;
pub mod joint;
pub mod normalize;
pub mod params;
pub mod powerset;
pub mod progress;
pub mod report;
pub mod types;

pub use accumulate::{Marginals, ProbabilityTable};
pub use engine::{InferenceError, InferenceOptions, Parallelism, infer, infer_with_progress};
pub use family::{Family, FamilyError, Person, PersonRecord};
pub use params::ModelParameters;
pub use types::{GeneCount, PersonIndex, PersonSet};
