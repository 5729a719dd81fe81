//! # Inference Driver
//!
//! Enumerates every gene/trait assignment for a family, prunes trait assignments that
//! contradict the observed evidence, scores the rest with [`joint_probability`], and
//! folds the scores into a [`ProbabilityTable`] that is normalized once at the end.
//!
//! The enumeration is three nested lazy powersets:
//!
//! ```text
//! for with_trait in subsets(everyone) if evidence admits it
//!     for one_copy in subsets(everyone)
//!         for two_copies in subsets(everyone \ one_copy)
//! ```
//!
//! Work is split by trait assignment. Each admitted trait assignment is expanded into
//! its own partial table, possibly on a rayon worker, and the partials are merged on the
//! calling thread in enumeration order. The merge order never depends on scheduling, so
//! sequential and parallel runs produce bit-identical tables.

use std::num::NonZeroUsize;

use log::{debug, info, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::accumulate::ProbabilityTable;
use crate::family::Family;
use crate::joint::{Candidate, GeneAssignment, joint_probability};
use crate::normalize::{NormalizationError, normalize};
use crate::params::{ModelParameters, ParameterError};
use crate::powerset::subsets;
use crate::progress::{InferenceProgressObserver, InferenceStage, NoopInferenceProgress};
use crate::types::PersonSet;

/// Candidate counts above this are logged as a warning before enumeration starts.
const LARGE_SEARCH_SPACE_WARNING: f64 = 1e9;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Invalid model parameters: {0}")]
    Parameters(#[from] ParameterError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error("Failed to build the inference thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How candidate evaluation is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    /// Everything on the calling thread.
    Sequential,
    /// Trait assignments are spread over a rayon pool. `None` uses the global pool;
    /// `Some(n)` builds a dedicated pool with `n` threads for this run.
    Parallel { threads: Option<NonZeroUsize> },
}

/// Run-time options of the driver. The model tables are not part of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceOptions {
    pub parallelism: Parallelism,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            parallelism: Parallelism::Parallel { threads: None },
        }
    }
}

impl InferenceOptions {
    pub fn sequential() -> Self {
        Self {
            parallelism: Parallelism::Sequential,
        }
    }
}

/// The observed trait values of a family, as two person sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evidence {
    observed: PersonSet,
    observed_with_trait: PersonSet,
}

impl Evidence {
    pub fn from_family(family: &Family) -> Self {
        let mut observed = PersonSet::EMPTY;
        let mut observed_with_trait = PersonSet::EMPTY;
        for (idx, person) in family.iter() {
            if let Some(has_trait) = person.observed_trait {
                observed = observed.with(idx);
                if has_trait {
                    observed_with_trait = observed_with_trait.with(idx);
                }
            }
        }
        Self {
            observed,
            observed_with_trait,
        }
    }

    /// People whose trait status is known.
    pub fn observed(&self) -> PersonSet {
        self.observed
    }

    /// True if every observed person's status agrees with membership in `with_trait`.
    #[inline]
    pub fn admits(&self, with_trait: PersonSet) -> bool {
        with_trait.intersection(self.observed) == self.observed_with_trait
    }
}

/// Trait assignments over `family` that agree with `evidence`.
pub fn admitted_trait_sets(
    family: &Family,
    evidence: Evidence,
) -> impl Iterator<Item = PersonSet> + use<> {
    subsets(family.everyone()).filter(move |with_trait| evidence.admits(*with_trait))
}

/// Every way to split `everyone` into one-copy, two-copy and zero-copy carriers.
pub fn gene_assignments(everyone: PersonSet) -> impl Iterator<Item = GeneAssignment> {
    subsets(everyone).flat_map(move |one_copy| {
        subsets(everyone.difference(one_copy))
            .map(move |two_copies| GeneAssignment::new(one_copy, two_copies))
    })
}

/// The full lazy candidate stream: admitted trait assignments crossed with every gene
/// assignment.
pub fn candidates(family: &Family, evidence: Evidence) -> impl Iterator<Item = Candidate> + use<> {
    let everyone = family.everyone();
    admitted_trait_sets(family, evidence).flat_map(move |with_trait| {
        gene_assignments(everyone).map(move |genes| Candidate { genes, with_trait })
    })
}

/// Accumulates every gene assignment under one fixed trait assignment.
fn expand_trait_set(
    family: &Family,
    params: &ModelParameters,
    with_trait: PersonSet,
) -> ProbabilityTable {
    let mut partial = ProbabilityTable::new(family);
    for genes in gene_assignments(family.everyone()) {
        let candidate = Candidate { genes, with_trait };
        let p = joint_probability(family, &candidate, params);
        partial.fold(&candidate, p);
    }
    partial
}

/// Computes normalized gene and trait posteriors for every person in `family`.
pub fn infer(
    family: &Family,
    params: &ModelParameters,
    options: &InferenceOptions,
) -> Result<ProbabilityTable, InferenceError> {
    infer_with_progress(family, params, options, &NoopInferenceProgress)
}

/// Like [`infer`], reporting progress to `observer`.
pub fn infer_with_progress(
    family: &Family,
    params: &ModelParameters,
    options: &InferenceOptions,
    observer: &dyn InferenceProgressObserver,
) -> Result<ProbabilityTable, InferenceError> {
    params.validate()?;

    let evidence = Evidence::from_family(family);
    let trait_sets: Vec<PersonSet> = admitted_trait_sets(family, evidence).collect();
    let gene_assignments_per_trait_set = 3f64.powi(family.len() as i32);
    let total_candidates = trait_sets.len() as f64 * gene_assignments_per_trait_set;

    info!(
        "Evaluating {total_candidates:.0} candidate assignments for {} people ({} observed, {} admitted trait assignments)",
        family.len(),
        evidence.observed().len(),
        trait_sets.len()
    );
    if total_candidates > LARGE_SEARCH_SPACE_WARNING {
        warn!(
            "The search space has {total_candidates:.3e} candidates; exact enumeration may take a very long time."
        );
    }

    observer.on_stage_start(InferenceStage::Enumeration, trait_sets.len() as u64);
    let expand = |with_trait: PersonSet| {
        let partial = expand_trait_set(family, params, with_trait);
        observer.on_stage_advance(InferenceStage::Enumeration, 1);
        partial
    };

    let mut table = ProbabilityTable::new(family);
    match options.parallelism {
        Parallelism::Sequential => {
            debug!("Running enumeration on the calling thread");
            for &with_trait in &trait_sets {
                table.merge(&expand(with_trait));
            }
        }
        Parallelism::Parallel { threads } => {
            let partials: Vec<ProbabilityTable> = match threads {
                None => {
                    debug!(
                        "Running enumeration on the global pool ({} threads)",
                        rayon::current_num_threads()
                    );
                    trait_sets.par_iter().map(|&t| expand(t)).collect()
                }
                Some(n) => {
                    debug!("Running enumeration on a dedicated pool of {n} threads");
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(n.get())
                        .build()?;
                    pool.install(|| trait_sets.par_iter().map(|&t| expand(t)).collect())
                }
            };
            for partial in &partials {
                table.merge(partial);
            }
        }
    }
    observer.on_stage_finish(InferenceStage::Enumeration);

    observer.on_stage_start(InferenceStage::Normalization, family.len() as u64);
    normalize(&mut table, family)?;
    observer.on_stage_advance(InferenceStage::Normalization, family.len() as u64);
    observer.on_stage_finish(InferenceStage::Normalization);

    info!("Posterior distributions computed for {} people", family.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::PersonRecord;
    use crate::types::{GeneCount, PersonIndex};
    use approx::assert_abs_diff_eq;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn potter_family() -> Family {
        Family::from_records(vec![
            PersonRecord::child("Harry", "Lily", "James", None),
            PersonRecord::founder("James", Some(true)),
            PersonRecord::founder("Lily", Some(false)),
        ])
        .unwrap()
    }

    #[test]
    fn evidence_admits_only_agreeing_trait_sets() {
        let family = potter_family();
        let evidence = Evidence::from_family(&family);

        // James (1) must be in the set, Lily (2) must not be; Harry (0) is free.
        assert!(evidence.admits(PersonSet::from_bits(0b010)));
        assert!(evidence.admits(PersonSet::from_bits(0b011)));
        assert!(!evidence.admits(PersonSet::from_bits(0b000)));
        assert!(!evidence.admits(PersonSet::from_bits(0b110)));
        assert_eq!(admitted_trait_sets(&family, evidence).count(), 2);
    }

    #[test]
    fn gene_assignments_cover_three_to_the_n_distinct_partitions() {
        let everyone = PersonSet::first(4);
        let all: Vec<_> = gene_assignments(everyone).collect();
        assert_eq!(all.len(), 81);

        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), 81);
        assert!(
            all.iter()
                .all(|g| g.one_copy().is_disjoint(g.two_copies())
                    && g.one_copy().union(g.two_copies()).is_subset(everyone))
        );
    }

    #[test]
    fn candidate_stream_size_matches_admitted_space() {
        let family = potter_family();
        let evidence = Evidence::from_family(&family);
        assert_eq!(candidates(&family, evidence).count(), 2 * 27);

        let unobserved = Family::from_records(vec![
            PersonRecord::founder("A", None),
            PersonRecord::founder("B", None),
        ])
        .unwrap();
        let evidence = Evidence::from_family(&unobserved);
        assert_eq!(candidates(&unobserved, evidence).count(), 4 * 9);
    }

    #[test]
    fn observed_people_get_certain_trait_posteriors() {
        let family = potter_family();
        let table = infer(&family, &ModelParameters::standard(), &InferenceOptions::sequential())
            .unwrap();

        let james = table.get(family.index_of("James").unwrap());
        assert_abs_diff_eq!(james.trait_probability(true), 1.0, epsilon = 1e-12);
        assert_eq!(james.trait_probability(false), 0.0);

        let lily = table.get(family.index_of("Lily").unwrap());
        assert_abs_diff_eq!(lily.trait_probability(false), 1.0, epsilon = 1e-12);
        assert_eq!(lily.trait_probability(true), 0.0);
    }

    #[test]
    fn lone_founder_reproduces_the_prior() {
        let family = Family::from_records(vec![PersonRecord::founder("Solo", None)]).unwrap();
        let params = ModelParameters::standard();
        let table = infer(&family, &params, &InferenceOptions::sequential()).unwrap();

        let solo = table.get(PersonIndex(0));
        for count in GeneCount::DESCENDING {
            assert_abs_diff_eq!(
                solo.gene_probability(count),
                params.gene_prior(count),
                epsilon = 1e-12
            );
        }
        assert_abs_diff_eq!(
            solo.trait_probability(true),
            params.marginal_trait_probability(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn parallel_and_sequential_runs_agree_exactly() {
        let family = potter_family();
        let params = ModelParameters::standard();
        let sequential = infer(&family, &params, &InferenceOptions::sequential()).unwrap();
        let global = infer(&family, &params, &InferenceOptions::default()).unwrap();
        let dedicated = infer(
            &family,
            &params,
            &InferenceOptions {
                parallelism: Parallelism::Parallel {
                    threads: NonZeroUsize::new(2),
                },
            },
        )
        .unwrap();

        assert_eq!(sequential, global);
        assert_eq!(sequential, dedicated);
    }

    #[test]
    fn empty_family_yields_empty_table() {
        let family = Family::from_records(Vec::new()).unwrap();
        let table = infer(&family, &ModelParameters::standard(), &InferenceOptions::default())
            .unwrap();
        assert!(table.is_empty());
    }

    #[derive(Default)]
    struct CountingObserver {
        started: AtomicU64,
        advanced: AtomicU64,
        finished: AtomicU64,
    }

    impl InferenceProgressObserver for CountingObserver {
        fn on_stage_start(&self, stage: InferenceStage, total_units: u64) {
            if stage == InferenceStage::Enumeration {
                self.started.store(total_units, Ordering::Relaxed);
            }
        }
        fn on_stage_advance(&self, stage: InferenceStage, newly_completed: u64) {
            if stage == InferenceStage::Enumeration {
                self.advanced.fetch_add(newly_completed, Ordering::Relaxed);
            }
        }
        fn on_stage_finish(&self, stage: InferenceStage) {
            let _ = stage;
            self.finished.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn progress_counts_every_admitted_trait_set() {
        let family = potter_family();
        let observer = CountingObserver::default();
        infer_with_progress(
            &family,
            &ModelParameters::standard(),
            &InferenceOptions::default(),
            &observer,
        )
        .unwrap();

        assert_eq!(observer.started.load(Ordering::Relaxed), 2);
        assert_eq!(observer.advanced.load(Ordering::Relaxed), 2);
        assert_eq!(observer.finished.load(Ordering::Relaxed), 2);
    }
}
