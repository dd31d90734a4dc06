/// Shared helpers: synthetic Presentation logs and reference tables.
use std::path::Path;

const HEADER: &str = "Scenario - UCLAEmpAcc\n\
Logfile written - 03/14/2015 10:21:07\n\
\n\
Subject\tTrial\tEvent Type\tCode\tTime\tTTime\tUncertainty\tDuration\tUncertainty\tReqTime\tReqDur\tStim Type\tPair Index";

/// Builds a log line by line, numbering trials as it goes.
pub struct LogBuilder {
    subject: String,
    lines:   Vec<String>,
    trial:   i64,
}

#[allow(unused)]
impl LogBuilder {
    /// Log whose `MRI_start` row has requested time `mri_start`.
    pub fn new(mri_start: i64) -> Self {
        let mut b = Self { subject: "S01".into(), lines: vec![HEADER.to_string()], trial: 0 };
        b.picture_raw("MRI_start", mri_start, mri_start);
        b
    }

    /// Log whose first `Picture` row is *not* the run anchor.
    pub fn without_anchor() -> Self {
        let mut b = Self { subject: "S01".into(), lines: vec![HEADER.to_string()], trial: 0 };
        b.picture_raw("fixation", 0, 0);
        b
    }

    fn picture_raw(&mut self, code: &str, time: i64, reqtime: i64) {
        self.trial += 1;
        self.lines.push(format!(
            "{}\t{}\tPicture\t{code}\t{time}\t0\t1\t20000\t1\t{reqtime}\t20000\tother\t0",
            self.subject, self.trial,
        ));
    }

    /// A `Video` row opening block `label` at `time`.
    pub fn video(mut self, label: &str, time: i64) -> Self {
        self.trial += 1;
        self.lines.push(format!("{}\t{}\tVideo\t{label}\t{time}\t0\t1", self.subject, self.trial));
        self
    }

    /// A button press setting the rating to `rating` at `time`.
    pub fn press(mut self, rating: u8, time: i64) -> Self {
        self.picture_raw(&format!("rating_{rating}"), time, 0);
        // Presentation follows each press with a Response row.
        self.lines.push(format!("{}\t{}\tResponse\t102\t{}\t0\t1", self.subject, self.trial, time - 3));
        self
    }

    /// A non-response `Picture` row (scale display).
    pub fn picture(mut self, code: &str, time: i64) -> Self {
        self.picture_raw(code, time, 0);
        self
    }

    /// Append a raw line.
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn build(self) -> String {
        self.lines.join("\n") + "\n"
    }
}

/// One reference column: label, gold ratings, duration in seconds.
#[allow(unused)]
pub struct RefColumn<'a> {
    pub label:    &'a str,
    pub gold:     Vec<f64>,
    pub duration: f64,
}

#[allow(unused)]
fn table(header: &[&str], descr: &str, columns: &[Vec<String>]) -> String {
    let mut out = header.join(",") + "\n";
    out += &vec![descr; header.len()].join(",");
    out += "\n";
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    for r in 0..rows {
        let cells: Vec<String> = columns.iter().map(|c| c.get(r).cloned().unwrap_or_default()).collect();
        out += &cells.join(",");
        out += "\n";
    }
    out
}

/// Write `EA-timing.csv` and `EA-vid-lengths.csv` into `dir`.
#[allow(unused)]
pub fn write_assets(dir: &Path, columns: &[RefColumn]) {
    let header: Vec<&str> = columns.iter().map(|c| c.label).collect();
    let gold: Vec<Vec<String>> = columns
        .iter()
        .map(|c| c.gold.iter().map(|v| v.to_string()).collect())
        .collect();
    let durations: Vec<Vec<String>> = columns.iter().map(|c| vec![c.duration.to_string()]).collect();
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join("EA-timing.csv"), table(&header, "actor", &gold)).unwrap();
    std::fs::write(dir.join("EA-vid-lengths.csv"), table(&header, "seconds", &durations)).unwrap();
}

/// A linear ramp from `lo` to `hi` over `n` points.
#[allow(unused)]
pub fn ramp(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64).collect()
}
