//! Gold-standard reference tables and curve alignment.
//!
//! Two CSV assets describe the stimuli, both with one column per block label:
//!
//! - `EA-timing.csv`      : the actor's own continuous rating of each video.
//! - `EA-vid-lengths.csv` : the length of each video in seconds.
//!
//! Labels are matched case-insensitively.  Cells that do not parse as numbers
//! read as NaN, and non-finite values are dropped from a column before use,
//! so ragged columns of different lengths can share one file.
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use ndarray::Array1;

use crate::error::{EaError, EaResult};
use crate::ratings::RatingCurve;
use crate::resample::match_lengths;

pub const GOLD_RATINGS_FILE: &str = "EA-timing.csv";
pub const DURATIONS_FILE: &str = "EA-vid-lengths.csv";

/// A column-labelled numeric table.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    name:    String,
    /// Lower-cased header labels.
    headers: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl ReferenceTable {
    /// Parse a table from CSV text.  `skip_rows` rows after the header are
    /// ignored before the numeric data starts.
    pub fn from_reader<R: Read>(reader: R, name: &str, skip_rows: usize) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .with_context(|| format!("reading header of {name}"))?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();
        let mut columns = vec![Vec::new(); headers.len()];

        for (i, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("reading row {} of {name}", i + 2))?;
            if i < skip_rows {
                continue;
            }
            for (c, column) in columns.iter_mut().enumerate() {
                let value = record
                    .get(c)
                    .and_then(|cell| cell.parse::<f64>().ok())
                    .unwrap_or(f64::NAN);
                column.push(value);
            }
        }

        Ok(Self { name: name.to_string(), headers, columns })
    }

    pub fn load(path: &Path, skip_rows: usize) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening reference table {}", path.display()))?;
        Self::from_reader(file, &path.display().to_string(), skip_rows)
    }

    pub fn labels(&self) -> &[String] {
        &self.headers
    }

    fn column_index(&self, label: &str) -> EaResult<usize> {
        let wanted = label.to_lowercase();
        self.headers
            .iter()
            .position(|h| *h == wanted)
            .ok_or_else(|| EaError::MissingReferenceColumn {
                label: label.to_string(),
                table: self.name.clone(),
            })
    }

    /// Finite values of the column labelled `label`.
    pub fn column(&self, label: &str) -> EaResult<Array1<f64>> {
        let idx = self.column_index(label)?;
        let values: Vec<f64> = self.columns[idx].iter().copied().filter(|v| v.is_finite()).collect();
        Ok(Array1::from(values))
    }

    /// First finite value of the column labelled `label`.
    pub fn first_value(&self, label: &str) -> EaResult<f64> {
        let idx = self.column_index(label)?;
        self.columns[idx]
            .iter()
            .copied()
            .find(|v| v.is_finite())
            .ok_or_else(|| EaError::MissingReferenceData {
                label: label.to_string(),
                table: self.name.clone(),
            })
    }
}

/// Gold ratings and block durations, loaded once per batch.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    pub gold:      ReferenceTable,
    pub durations: ReferenceTable,
}

impl ReferenceSet {
    /// Load both tables from an assets directory.
    pub fn load(assets: &Path, skip_rows: usize) -> Result<Self> {
        let gold = ReferenceTable::load(&assets.join(GOLD_RATINGS_FILE), skip_rows)?;
        let durations = ReferenceTable::load(&assets.join(DURATIONS_FILE), skip_rows)?;
        Ok(Self { gold, durations })
    }

    /// Gold curve and duration (seconds) for one block label.
    pub fn lookup(&self, label: &str) -> EaResult<(Array1<f64>, f64)> {
        let gold = self.gold.column(label)?;
        if gold.is_empty() {
            return Err(EaError::MissingReferenceData {
                label: label.to_string(),
                table: self.gold.name.clone(),
            });
        }
        let duration = self.durations.first_value(label)?;
        Ok((gold, duration))
    }
}

/// Bring the subject and gold curves to a common length.
///
/// With presses, the gold curve is stretched onto the subject's timeline.
/// Without presses the subject curve carries no information, so it is
/// replaced by a neutral curve as long as the gold curve.
pub fn align_curves(subject: &RatingCurve, gold: &Array1<f64>, neutral: f64) -> (Array1<f64>, Array1<f64>) {
    if subject.pushes != 0 {
        (subject.values.clone(), match_lengths(&subject.values, gold))
    } else {
        (Array1::from_elem(gold.len(), neutral), gold.clone())
    }
}
