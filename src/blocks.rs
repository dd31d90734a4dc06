//! Block segmentation.
//!
//! Every `Video` row opens a block.  A block runs from its own trial index up
//! to (but excluding) the next block's trial index; the final block runs to
//! the last trial of the log.
use crate::eventlog::BoundaryEvent;

/// One stimulus block of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Position in the log, starting at 0.
    pub index:          usize,
    pub label:          String,
    pub start_trial:    i64,
    /// Exclusive end; `None` for the final block.
    pub end_trial:      Option<i64>,
    /// Absolute start time in event-clock ticks.
    pub start_time:     i64,
    /// Start relative to `MRI_start`, in seconds.
    pub onset_seconds:  f64,
}

impl Block {
    /// `true` when `trial` lies in this block, given the log's final trial.
    pub fn contains_trial(&self, trial: i64, last_trial: i64) -> bool {
        match self.end_trial {
            Some(end) => trial >= self.start_trial && trial < end,
            None => trial >= self.start_trial && trial <= last_trial,
        }
    }
}

/// Build the ordered block list from the boundary stream.
pub fn find_blocks(boundaries: &[BoundaryEvent], mri_start: i64, ticks_per_second: i64) -> Vec<Block> {
    let scale = ticks_per_second as f64;
    let mut blocks: Vec<Block> = boundaries
        .iter()
        .enumerate()
        .map(|(index, ev)| Block {
            index,
            label:         ev.label.clone(),
            start_trial:   ev.trial,
            end_trial:     None,
            start_time:    ev.time,
            onset_seconds: (ev.time - mri_start) as f64 / scale,
        })
        .collect();

    for i in 1..blocks.len() {
        let next_start = blocks[i].start_trial;
        blocks[i - 1].end_trial = Some(next_start);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(trial: i64, label: &str, time: i64) -> BoundaryEvent {
        BoundaryEvent {
            subject: "S01".into(),
            trial,
            label: label.into(),
            time,
            ttime: 0,
            uncertainty1: 0,
        }
    }

    #[test]
    fn end_trial_is_next_start() {
        let b = find_blocks(
            &[boundary(2, "vid_1", 50_000), boundary(9, "cvid_1", 900_000), boundary(15, "vid_2", 1_500_000)],
            10_000,
            10_000,
        );
        assert_eq!(b.len(), 3);
        assert_eq!(b[0].end_trial, Some(9));
        assert_eq!(b[1].end_trial, Some(15));
        assert_eq!(b[2].end_trial, None);
        approx::assert_abs_diff_eq!(b[0].onset_seconds, 4.0, epsilon = 1e-12);
        assert_eq!(b[1].label, "cvid_1");
    }

    #[test]
    fn final_block_extends_to_last_trial() {
        let b = find_blocks(&[boundary(4, "vid_3", 0)], 0, 10_000);
        assert!(b[0].contains_trial(4, 20));
        assert!(b[0].contains_trial(20, 20));
        assert!(!b[0].contains_trial(21, 20));
        assert!(!b[0].contains_trial(3, 20));
    }

    #[test]
    fn empty_stream_gives_no_blocks() {
        assert!(find_blocks(&[], 0, 10_000).is_empty());
    }
}
