use std::fmt;

/// Stages reported while running inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InferenceStage {
    Enumeration,
    Normalization,
}

impl InferenceStage {
    pub fn describe(self) -> &'static str {
        match self {
            Self::Enumeration => "candidate enumeration",
            Self::Normalization => "normalization",
        }
    }
}

impl fmt::Display for InferenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Observer for reporting incremental progress during inference.
///
/// Enumeration work is counted in evidence-consistent trait assignments. Methods take
/// `&self` because workers on several threads report concurrently.
pub trait InferenceProgressObserver: Sync {
    fn on_stage_start(&self, stage: InferenceStage, total_units: u64) {
        let _ = (stage, total_units);
    }
    /// Called with the number of units finished since the previous report.
    fn on_stage_advance(&self, stage: InferenceStage, newly_completed: u64) {
        let _ = (stage, newly_completed);
    }
    fn on_stage_finish(&self, stage: InferenceStage) {
        let _ = stage;
    }
}

#[derive(Default)]
pub struct NoopInferenceProgress;

impl InferenceProgressObserver for NoopInferenceProgress {}
