/// ea_batch: score every subject of a project and write their GLM inputs.
///
/// For each subject with exactly `--runs` task logs under
/// `<project>/data/RESOURCES/<subject>_??/`, writes into
/// `<project>/data/ea/<subject>/`:
///
///   {sub}_block-times_ea.1D        AFNI -stim_times_AM2 timing, one line per run
///   {sub}_corr_push.csv            Fisher-z and pushes/minute per block
///   {sub}_{log}.svg                overlay plot per log (unless --no-plots)
///   {sub}_glm_1stlevel_cmd.sh      3dDeconvolve script
///   {sub}_analysis-complete.json   completion marker (all runs scored); subjects with one are skipped
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use empacc::{
    batch::{run_batch, BatchOptions, Project},
    AlignmentPolicy, AnalysisConfig, FisherGuard, ReferenceSet, TrialType,
};

#[derive(Parser, Debug)]
#[command(name = "ea_batch", about = "Empathic-accuracy behavioural analysis for a whole project")]
struct Args {
    /// Project directory containing data/.
    project: PathBuf,

    /// Directory holding EA-timing.csv and EA-vid-lengths.csv.
    assets: PathBuf,

    /// Trial type modelled: vid or cvid.
    #[arg(long, default_value = "vid")]
    trial_type: TrialType,

    /// Number of task runs each subject must have.
    #[arg(long, default_value_t = 3)]
    runs: usize,

    /// Seconds subtracted from onsets (discarded volumes).
    #[arg(long, default_value_t = 8.0)]
    onset_shift: f64,

    /// Snap presses to the nearest curve sample instead of requiring an exact match.
    #[arg(long)]
    nearest: bool,

    /// Curve sample spacing in 10⁻⁴ s ticks.
    #[arg(long, default_value_t = 1)]
    sample_period: i64,

    /// Fail blocks whose correlation is exactly ±1 instead of clamping.
    #[arg(long)]
    reject_saturated: bool,

    /// Only process these subjects (comma-separated).
    #[arg(long, default_value = "")]
    subjects: String,

    /// Skip the diagnostic plots.
    #[arg(long)]
    no_plots: bool,

    /// Run the generated 3dDeconvolve script.
    #[arg(long)]
    run_glm: bool,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Debug logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.debug { "debug" } else if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let cfg = AnalysisConfig {
        trial_type:          args.trial_type,
        expected_runs:       args.runs,
        onset_shift_secs:    args.onset_shift,
        sample_period_ticks: args.sample_period,
        alignment:           if args.nearest { AlignmentPolicy::Nearest } else { AlignmentPolicy::Exact },
        fisher_guard:        if args.reject_saturated { FisherGuard::Reject } else { FisherGuard::default() },
        ..AnalysisConfig::default()
    };
    let opts = BatchOptions {
        plots:   !args.no_plots,
        run_glm: args.run_glm,
        only:    if args.subjects.is_empty() {
            vec![]
        } else {
            args.subjects.split(',').map(str::to_string).collect()
        },
    };

    // Without the reference tables nothing can be scored.
    let refs = ReferenceSet::load(&args.assets, cfg.reference_skip_rows)?;
    info!("{} gold-rating columns loaded", refs.gold.labels().len());

    let project = Project::new(&args.project);
    let summary = run_batch(&project, &refs, &cfg, &opts)?;

    println!(
        "{} completed, {} partial, {} skipped, {} failed",
        summary.completed.len(), summary.partial.len(), summary.skipped.len(), summary.failed.len(),
    );
    for subject in &summary.partial {
        println!("  partial: {subject}");
    }
    for subject in &summary.failed {
        println!("  failed: {subject}");
    }
    Ok(())
}
