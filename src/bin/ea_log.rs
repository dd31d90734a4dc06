/// ea_log: score a single empathic-accuracy log and print every block.
///
/// Prints one row per block (including the other trial type and blocks that
/// failed), followed by the timing-file line for the selected trial type.
///
/// Example:
///   ea_log --log S01-UCLAEmpAcc_part1.log --assets assets/ --plot S01_part1.svg
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use empacc::{
    eventlog::read_log,
    plot::plot_log,
    process_log, AlignmentPolicy, AnalysisConfig, FisherGuard, ReferenceSet, TimingColumns, TrialType,
};

#[derive(Parser, Debug)]
#[command(name = "ea_log", about = "Score one empathic-accuracy task log")]
struct Args {
    /// Presentation log file.
    #[arg(long)]
    log: PathBuf,

    /// Directory holding EA-timing.csv and EA-vid-lengths.csv.
    #[arg(long)]
    assets: PathBuf,

    /// Trial type written to the timing line: vid or cvid.
    #[arg(long, default_value = "vid")]
    trial_type: TrialType,

    /// Seconds subtracted from onsets in the timing line.
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

    /// Write the diagnostic plot (SVG) here.
    #[arg(long)]
    plot: Option<PathBuf>,

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
        onset_shift_secs:    args.onset_shift,
        sample_period_ticks: args.sample_period,
        alignment:           if args.nearest { AlignmentPolicy::Nearest } else { AlignmentPolicy::Exact },
        fisher_guard:        if args.reject_saturated { FisherGuard::Reject } else { FisherGuard::default() },
        ..AnalysisConfig::default()
    };

    let refs = ReferenceSet::load(&args.assets, cfg.reference_skip_rows)?;
    let log = read_log(&args.log)?;
    info!(
        "{}: {} Picture rows, {} Video rows, MRI_start={}",
        args.log.display(), log.ratings.len(), log.boundaries.len(), log.mri_start,
    );

    let report = process_log(&log, &refs, &cfg)?;

    println!("{:<10} {:>9} {:>9} {:>7} {:>7} {:>6} {:>9}", "block", "onset", "duration", "r", "z(r)", "pushes", "push/min");
    for s in &report.scores {
        println!(
            "{:<10} {:>9.2} {:>9.2} {:>7.3} {:>7.3} {:>6} {:>9.2}",
            s.label, s.onset_seconds, s.duration_seconds, s.r, s.correlation_z, s.pushes, s.pushes_per_minute,
        );
    }
    for f in &report.failures {
        println!("{:<10} failed: {}", f.label, f.error);
    }

    let cols = TimingColumns::select(&report.scores, cfg.trial_type);
    print!("{}", cols.timing_line(cfg.onset_shift_secs));

    if let Some(path) = &args.plot {
        plot_log(path, &args.log.display().to_string(), &report.traces)?;
        eprintln!("Plot → {}", path.display());
    }
    Ok(())
}
