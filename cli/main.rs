#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]

// ========================================================================================
//
//                      THE COMMAND-LINE FRONT END: HEREDITY
//
// ========================================================================================
//
// Loads a family CSV, runs exact inference over every gene/trait assignment, prints the
// posterior of each person to stdout and optionally saves them as TOML. Logging and the
// progress bar go to stderr so stdout stays machine-readable.

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use std::error::Error;
use std::io::IsTerminal;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use heredity::engine::{InferenceOptions, Parallelism, infer_with_progress};
use heredity::io::load_family;
use heredity::params::ModelParameters;
use heredity::progress::{InferenceProgressObserver, InferenceStage};
use heredity::report::{PosteriorReport, render_text};

// ========================================================================================
//                         COMMAND-LINE INTERFACE DEFINITION
// ========================================================================================

#[derive(Parser, Debug)]
#[command(
    name = "heredity",
    version,
    about = "Exact posterior inference of gene copy counts and trait status within a family."
)]
struct Args {
    /// Path to the family CSV file with name,mother,father,trait columns
    data: PathBuf,

    /// Also write the posteriors to this TOML file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of worker threads (defaults to all available cores)
    #[arg(long, value_name = "N", conflicts_with = "sequential")]
    threads: Option<NonZeroUsize>,

    /// Run the enumeration on the main thread only
    #[arg(long)]
    sequential: bool,

    /// Do not draw a progress bar
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn inference_options(&self) -> InferenceOptions {
        let parallelism = if self.sequential {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel {
                threads: self.threads,
            }
        };
        InferenceOptions { parallelism }
    }
}

// ========================================================================================
//                                 PROGRESS REPORTING
// ========================================================================================

struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    fn new(quiet: bool) -> Self {
        let draw_target = if !quiet && std::io::stderr().is_terminal() {
            ProgressDrawTarget::stderr_with_hz(20)
        } else {
            ProgressDrawTarget::hidden()
        };

        let bar = ProgressBar::with_draw_target(Some(0), draw_target);
        if let Ok(style) = ProgressStyle::with_template(
            "> [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        ) {
            bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        Self { bar }
    }
}

impl InferenceProgressObserver for ProgressBarObserver {
    fn on_stage_start(&self, stage: InferenceStage, total_units: u64) {
        if stage == InferenceStage::Enumeration {
            self.bar.set_length(total_units);
            self.bar.set_message(stage.describe());
        }
    }

    fn on_stage_advance(&self, stage: InferenceStage, newly_completed: u64) {
        if stage == InferenceStage::Enumeration {
            self.bar.inc(newly_completed);
        }
    }

    fn on_stage_finish(&self, stage: InferenceStage) {
        if stage == InferenceStage::Enumeration {
            self.bar.finish_and_clear();
        }
    }
}

// ========================================================================================
//                           THE MAIN ORCHESTRATION LOGIC
// ========================================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let start_time = Instant::now();

    // --- Phase 1: Load and validate the family ---
    info!("Loading family from {}", args.data.display());
    let family = load_family(&args.data)?;

    // --- Phase 2: Enumerate, accumulate and normalize ---
    let params = ModelParameters::standard();
    let observer = ProgressBarObserver::new(args.quiet);
    let table = infer_with_progress(&family, &params, &args.inference_options(), &observer)?;

    // --- Phase 3: Output ---
    print!("{}", render_text(&family, &table));

    if let Some(path) = &args.output {
        PosteriorReport::new(&family, &table).save(path)?;
        info!("Wrote posteriors to {}", path.display());
    }

    info!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(())
}
