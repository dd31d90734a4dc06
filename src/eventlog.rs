//! Presentation event-log reader.
//!
//! The scanner log is tab-delimited but ragged: `Picture` rows carry 13
//! columns, `Video` rows carry 7, and header/response rows carry others.
//! Rows are first classified by their event-type column and then handed to
//! the fixed schema for that kind, so a short `Video` row is never forced
//! through the `Picture` layout.
//!
//! ```text
//! Picture: subject trial type code time ttime unc1 dur unc2 reqtime reqdur stimtype pairindex
//! Video:   subject trial type code time ttime unc1
//! ```
//!
//! All times are in 10⁻⁴ s.  The first `Picture` row must have the code
//! `MRI_start`; its requested-time field is the run anchor every onset is
//! measured from.
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::{EaError, EaResult};

/// Code of the first `Picture` row, written when the scanner trigger arrives.
pub const MRI_START: &str = "MRI_start";

/// Substring identifying a button-press row among `Picture` rows.
pub const RESPONSE_MARKER: &str = "rating";

/// Event kinds that carry their own column schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Picture,
    Video,
}

impl EventKind {
    pub const ALL: [EventKind; 2] = [EventKind::Picture, EventKind::Video];

    /// Substring matched against the event-type column.
    pub fn marker(&self) -> &'static str {
        match self {
            EventKind::Picture => "Picture",
            EventKind::Video => "Video",
        }
    }

    /// Number of columns in this kind's schema.
    pub fn columns(&self) -> usize {
        match self {
            EventKind::Picture => 13,
            EventKind::Video => 7,
        }
    }

    /// Classify one raw line by its event-type column.
    pub fn classify(line: &str) -> Option<EventKind> {
        let event_type = line.split('\t').nth(2)?;
        Self::ALL
            .into_iter()
            .find(|kind| event_type.contains(kind.marker()))
    }

    fn parse(&self, fields: &[&str], line_no: usize) -> EaResult<EventRecord> {
        let row = Row { fields, line_no, kind: *self };
        row.check_width()?;
        Ok(match self {
            EventKind::Picture => EventRecord::Rating(RatingEvent {
                subject:            fields[0].trim().to_string(),
                trial:              row.required(1)?,
                code:               fields[3].trim().to_string(),
                time:               row.required(4)?,
                ttime:              row.optional(5)?,
                uncertainty1:       row.optional(6)?,
                duration:           row.optional(7)?,
                uncertainty2:       row.optional(8)?,
                requested_time:     row.optional(9)?,
                requested_duration: row.optional(10)?,
                stim_type:          fields[11].trim().to_string(),
                pair_index:         row.optional(12)?,
            }),
            EventKind::Video => EventRecord::Boundary(BoundaryEvent {
                subject:      fields[0].trim().to_string(),
                trial:        row.required(1)?,
                label:        fields[3].trim().to_string(),
                time:         row.required(4)?,
                ttime:        row.optional(5)?,
                uncertainty1: row.optional(6)?,
            }),
        })
    }
}

/// A `Picture` row: rating-scale display or a participant's button press.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEvent {
    pub subject:            String,
    pub trial:              i64,
    pub code:               String,
    /// Absolute event time.
    pub time:               i64,
    /// Time since the last trial started.
    pub ttime:              i64,
    pub uncertainty1:       i64,
    pub duration:           i64,
    pub uncertainty2:       i64,
    pub requested_time:     i64,
    pub requested_duration: i64,
    pub stim_type:          String,
    pub pair_index:         i64,
}

impl RatingEvent {
    /// `true` for a button-press row.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.code.contains(RESPONSE_MARKER)
    }

    /// The rated value, carried as the code's final character.
    pub fn rated_value(&self) -> EaResult<u8> {
        match self.code.chars().last().and_then(|c| c.to_digit(10)) {
            Some(d @ 1..=9) => Ok(d as u8),
            _ => Err(EaError::MalformedResponse {
                trial: self.trial,
                code:  self.code.clone(),
            }),
        }
    }
}

/// A `Video` row: the start of one block (video or circles clip).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryEvent {
    pub subject:      String,
    pub trial:        i64,
    /// Block label, e.g. `vid_4` or `cvid_1`.
    pub label:        String,
    pub time:         i64,
    pub ttime:        i64,
    pub uncertainty1: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventRecord {
    Rating(RatingEvent),
    Boundary(BoundaryEvent),
}

/// A parsed log: both typed streams plus the run anchor.
#[derive(Debug, Clone)]
pub struct ParsedLog {
    pub ratings:    Vec<RatingEvent>,
    pub boundaries: Vec<BoundaryEvent>,
    /// Requested time of the `MRI_start` row.
    pub mri_start:  i64,
}

impl ParsedLog {
    /// Trial index of the final `Picture` row.
    pub fn last_trial(&self) -> Option<i64> {
        self.ratings.last().map(|r| r.trial)
    }
}

struct Row<'a> {
    fields:  &'a [&'a str],
    line_no: usize,
    kind:    EventKind,
}

impl Row<'_> {
    fn check_width(&self) -> EaResult<()> {
        let n = self.kind.columns();
        let extra_nonempty = self.fields.iter().skip(n).any(|f| !f.trim().is_empty());
        if self.fields.len() < n || extra_nonempty {
            return Err(EaError::MalformedLog(format!(
                "line {}: {} row has {} columns, expected {n}",
                self.line_no,
                self.kind.marker(),
                self.fields.len(),
            )));
        }
        Ok(())
    }

    fn required(&self, col: usize) -> EaResult<i64> {
        let raw = self.fields[col].trim();
        raw.parse::<i64>().map_err(|_| {
            EaError::MalformedLog(format!(
                "line {}: column {col} of {} row is not an integer: {raw:?}",
                self.line_no,
                self.kind.marker(),
            ))
        })
    }

    /// Presentation leaves some timing columns blank; those read as 0.
    fn optional(&self, col: usize) -> EaResult<i64> {
        if self.fields[col].trim().is_empty() {
            Ok(0)
        } else {
            self.required(col)
        }
    }
}

/// Parse the text of one log into its typed streams.
pub fn parse_log(text: &str) -> EaResult<ParsedLog> {
    let mut ratings = Vec::new();
    let mut boundaries = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let Some(kind) = EventKind::classify(line) else { continue };
        let fields: Vec<&str> = line.split('\t').collect();
        match kind.parse(&fields, i + 1)? {
            EventRecord::Rating(ev) => ratings.push(ev),
            EventRecord::Boundary(ev) => boundaries.push(ev),
        }
    }

    let first = ratings
        .first()
        .ok_or_else(|| EaError::MalformedLog("no Picture rows".into()))?;
    if first.code != MRI_START {
        return Err(EaError::MalformedLog(format!(
            "first Picture row has code {:?}, expected {MRI_START:?}",
            first.code
        )));
    }
    let mri_start = first.requested_time;

    Ok(ParsedLog { ratings, boundaries, mri_start })
}

/// Read and parse a log file.
pub fn read_log(path: &Path) -> Result<ParsedLog> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading log {}", path.display()))?;
    // Presentation writes Latin-1 on some stations.
    let text = String::from_utf8_lossy(&bytes);
    let parsed = parse_log(&text)
        .with_context(|| format!("parsing log {}", path.display()))?;
    Ok(parsed)
}
