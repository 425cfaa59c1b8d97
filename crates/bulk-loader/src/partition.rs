//! Split the logical record space between workers.

use std::fmt;
use std::ops::Range;

/// Half-open range `[start, end)` of logical record indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerRange {
    pub start: u64,
    pub end: u64,
}

impl WorkerRange {
    /// Number of records in the range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the range holds no records.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Iterate the indices in the range.
    pub fn indices(&self) -> Range<u64> {
        self.start..self.end
    }
}

impl fmt::Display for WorkerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Result of splitting `total_records` across workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// One range per worker, indexed by worker id.
    pub ranges: Vec<WorkerRange>,
    /// Records left over when the total is not divisible by the worker count.
    /// These are not inserted.
    pub dropped: u64,
}

/// Give worker `w` the range `[w * share, (w + 1) * share)`.
///
/// `share` is `total_records / worker_count`; the remainder is reported in
/// [`Partition::dropped`] and never assigned.
pub fn partition(total_records: u64, worker_count: usize) -> Partition {
    if worker_count == 0 {
        return Partition {
            ranges: Vec::new(),
            dropped: total_records,
        };
    }

    let workers = worker_count as u64;
    let share = total_records / workers;
    let ranges = (0..workers)
        .map(|w| WorkerRange {
            start: w * share,
            end: (w + 1) * share,
        })
        .collect();

    Partition {
        ranges,
        dropped: total_records % workers,
    }
}
