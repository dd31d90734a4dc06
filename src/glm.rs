//! First-level GLM script for AFNI's `3dDeconvolve`.
//!
//! The timing file is used as an amplitude-modulated, variable-duration
//! regressor (`-stim_times_AM2 … 'dmBLOCK(1)'`): a standard boxcar per block
//! plus one regressor scaled by the Fisher-z agreement score and one by the
//! push rate.  The regression itself runs outside this crate.
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use log::info;

use crate::io::SubjectOutputs;

/// Preprocessed functional runs of a subject, sorted.
pub fn functional_inputs(out: &SubjectOutputs) -> Result<Vec<String>> {
    let prefix = format!("{}_func", out.subject);
    let mut inputs = Vec::new();
    if !out.dir.exists() {
        return Ok(inputs);
    }
    for entry in std::fs::read_dir(&out.dir).with_context(|| format!("listing {}", out.dir.display()))? {
        let path = entry?.path();
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if name.contains("nii.gz") && name.contains(&prefix) {
            inputs.push(path.display().to_string());
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Text of the `3dDeconvolve` script for one subject.
pub fn analysis_script(out: &SubjectOutputs, inputs: &[String]) -> String {
    let d = out.dir.display();
    let sub = &out.subject;
    let input_data = inputs.join(" ");
    format!(
        r#"#!/bin/bash

# Empathic accuracy GLM for {sub}.
3dDeconvolve \
    -input {input_data} \
    -mask {d}/{sub}_anat_EPI_mask_MNI.nii.gz \
    -ortvec {d}/{sub}_motion.1D motion_parameters \
    -polort 4 \
    -num_stimts 1 \
    -local_times \
    -jobs 8 \
    -x1D {d}/{sub}_glm_1stlevel_design.mat \
    -stim_times_AM2 1 {timing} 'dmBLOCK(1)' \
    -stim_label 1 empathic_accuracy \
    -fitts {d}/{sub}_glm_1stlevel_explained.nii.gz \
    -errts {d}/{sub}_glm_1stlevel_residuals.nii.gz \
    -bucket {d}/{sub}_glm_1stlevel.nii.gz \
    -cbucket {d}/{sub}_glm_1stlevel_coeffs.nii.gz \
    -fout \
    -tout \
    -xjpeg {d}/{sub}_glm_1stlevel_matrix.jpg
"#,
        timing = out.timing_file().display(),
    )
}

/// Write the script next to the subject's other outputs.
pub fn write_analysis_script(out: &SubjectOutputs) -> Result<()> {
    let inputs = functional_inputs(out)?;
    let path = out.glm_script();
    std::fs::write(&path, analysis_script(out, &inputs))
        .with_context(|| format!("writing {}", path.display()))
}

/// Run a script with `bash`, failing on a non-zero exit status.
pub fn run_script(path: &Path) -> Result<()> {
    info!("running {}", path.display());
    let status = Command::new("bash")
        .arg(path)
        .status()
        .with_context(|| format!("launching bash {}", path.display()))?;
    if !status.success() {
        bail!("{} exited with {status}", path.display());
    }
    Ok(())
}
