//! Project-level driver: find every subject's task logs and score them.
//!
//! Project layout:
//!
//! ```text
//! <project>/data/RESOURCES/<subject>_<session>/…/*UCLAEmpAcc*.log   inputs
//! <project>/data/ea/<subject>/                                     outputs
//! ```
//!
//! Subjects are processed one at a time and isolated from each other: any
//! failure is logged and the batch moves on.  A subject whose completion
//! marker exists is skipped.  The marker is only written once every run
//! scored, so a rerun picks up new, failed and partially scored subjects.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{error, info, warn};

use crate::config::AnalysisConfig;
use crate::eventlog::read_log;
use crate::glm;
use crate::io::{write_qc_table, write_timing_file, CompletionMarker, SubjectOutputs};
use crate::plot::plot_log;
use crate::reference::ReferenceSet;
use crate::timing::TimingColumns;
use crate::process_log;

/// Substring identifying empathic-accuracy task logs.
pub const LOG_MARKER: &str = "UCLAEmpAcc";

/// Directory layout of a study.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn resources_path(&self) -> PathBuf {
        self.data_path().join("RESOURCES")
    }

    /// Output root, one directory per subject.
    pub fn func_path(&self) -> PathBuf {
        self.data_path().join("ea")
    }
}

/// Options that only concern the batch driver.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Write the diagnostic plots.
    pub plots:   bool,
    /// Run the generated GLM script with `bash`.
    pub run_glm: bool,
    /// Restrict the batch to these subjects.
    pub only:    Vec<String>,
}

/// Phantom scans carry `_PHA_` in their identifier.
pub fn is_phantom(subject: &str) -> bool {
    subject.contains("_PHA_")
}

/// Subject ids from the `<subject>_<session>` resource directories.
pub fn find_subjects(resources: &Path) -> Result<Vec<String>> {
    let mut subjects = BTreeSet::new();
    for entry in std::fs::read_dir(resources)
        .with_context(|| format!("listing {}", resources.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(subject) = session_subject(&name) {
            subjects.insert(subject.to_string());
        }
    }
    Ok(subjects.into_iter().collect())
}

/// `SPN01_CMH_0001_01` → `SPN01_CMH_0001`: strip a two-character session.
fn session_subject(dir_name: &str) -> Option<&str> {
    let (subject, session) = dir_name.rsplit_once('_')?;
    (session.chars().count() == 2 && !subject.is_empty()).then_some(subject)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// All task logs of a subject across its sessions, sorted by path.
pub fn find_logs(resources: &Path, subject: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(resources)
        .with_context(|| format!("listing {}", resources.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() && session_subject(&name) == Some(subject) {
            collect_files(&entry.path(), &mut files)?;
        }
    }
    let mut logs: Vec<PathBuf> = files
        .into_iter()
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            name.contains(".log") && name.contains(LOG_MARKER)
        })
        .collect();
    logs.sort();
    Ok(logs)
}

/// Outcome of one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectStatus {
    Completed { blocks: usize },
    /// Outputs written with `dropped` runs left empty; no completion marker.
    Partial { blocks: usize, dropped: usize },
    AlreadyDone,
    Phantom,
}

/// Score every run of one subject and write its outputs.
///
/// A log that fails to parse or align contributes an empty run (`*`) so the
/// timing file keeps one line per functional run.  Such a subject is not
/// marked complete and is rescored on the next call.
pub fn process_subject(
    project: &Project,
    subject: &str,
    refs: &ReferenceSet,
    cfg: &AnalysisConfig,
    opts: &BatchOptions,
) -> Result<SubjectStatus> {
    if is_phantom(subject) {
        return Ok(SubjectStatus::Phantom);
    }
    let out = SubjectOutputs::new(&project.func_path(), subject);
    if CompletionMarker::read(&out.marker_file())?.is_some() {
        return Ok(SubjectStatus::AlreadyDone);
    }

    let logs = find_logs(&project.resources_path(), subject)?;
    if logs.len() != cfg.expected_runs {
        bail!("found {} task logs, expected {}", logs.len(), cfg.expected_runs);
    }
    out.create_dir()?;

    let mut runs = Vec::with_capacity(logs.len());
    let mut dropped = 0usize;
    for path in &logs {
        let report = read_log(path).and_then(|log| {
            process_log(&log, refs, cfg).with_context(|| format!("scoring {}", path.display()))
        });
        match report {
            Ok(report) => {
                if opts.plots {
                    let title = path.display().to_string();
                    if let Err(e) = plot_log(&out.plot_file(path), &title, &report.traces) {
                        warn!("{subject}: {e:#}");
                    }
                }
                runs.push(TimingColumns::select(&report.scores, cfg.trial_type));
            }
            Err(e) => {
                warn!("{subject}: dropping run {}: {e:#}", path.display());
                runs.push(TimingColumns::default());
                dropped += 1;
            }
        }
    }

    write_timing_file(&out.timing_file(), &runs, cfg.onset_shift_secs)?;
    write_qc_table(&out.qc_file(), &runs)?;
    glm::write_analysis_script(&out)?;

    let blocks: usize = runs.iter().map(TimingColumns::len).sum();
    if dropped > 0 {
        return Ok(SubjectStatus::Partial { blocks, dropped });
    }
    if opts.run_glm {
        glm::run_script(&out.glm_script())?;
    }
    CompletionMarker {
        subject:    subject.to_string(),
        trial_type: cfg.trial_type.to_string(),
        logs,
        blocks,
        glm_run:    opts.run_glm,
    }
    .write(&out.marker_file())?;

    Ok(SubjectStatus::Completed { blocks })
}

/// Tally of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: Vec<String>,
    /// Written, but with runs left empty; retried on the next batch.
    pub partial:   Vec<String>,
    pub skipped:   Vec<String>,
    pub failed:    Vec<String>,
}

/// Process every subject of a project.
pub fn run_batch(
    project: &Project,
    refs: &ReferenceSet,
    cfg: &AnalysisConfig,
    opts: &BatchOptions,
) -> Result<BatchSummary> {
    let mut subjects = find_subjects(&project.resources_path())?;
    if !opts.only.is_empty() {
        subjects.retain(|s| opts.only.contains(s));
    }
    info!("{} subjects under {}", subjects.len(), project.resources_path().display());

    let mut summary = BatchSummary::default();
    for subject in subjects {
        match process_subject(project, &subject, refs, cfg, opts) {
            Ok(SubjectStatus::Completed { blocks }) => {
                info!("{subject}: {blocks} blocks written");
                summary.completed.push(subject);
            }
            Ok(SubjectStatus::Partial { blocks, dropped }) => {
                warn!("{subject}: {blocks} blocks written, {dropped} runs dropped; not marked complete");
                summary.partial.push(subject);
            }
            Ok(status) => {
                info!("{subject}: skipped ({status:?})");
                summary.skipped.push(subject);
            }
            Err(e) => {
                error!("{subject}: {e:#}");
                summary.failed.push(subject);
            }
        }
    }
    Ok(summary)
}
