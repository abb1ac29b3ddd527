//! Pair settle tracking.
//!
//! A mezzanine master can take minutes to copy into the watch folder, so a
//! pair is only dispatched once the size and mtime of both files are
//! unchanged between consecutive polls.

use crate::encoder::EncodeJob;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Size and mtime of one file at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: SystemTime,
}

impl FileStamp {
    fn for_path(path: &Path) -> io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            len: meta.len(),
            modified: meta.modified()?,
        })
    }
}

/// Snapshot of both files in a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSnapshot {
    master: FileStamp,
    metadata: FileStamp,
}

impl PairSnapshot {
    pub fn capture(job: &EncodeJob) -> io::Result<Self> {
        Ok(Self {
            master: FileStamp::for_path(&job.master)?,
            metadata: FileStamp::for_path(&job.metadata)?,
        })
    }
}

/// Tracks a pair across polls and reports when it has settled.
#[derive(Debug, Default)]
pub struct SettleTracker {
    last: Option<PairSnapshot>,
}

impl SettleTracker {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Observe the pair. Returns true when it matches the previous
    /// observation; any change (or a freshly seen pair) restarts the clock.
    pub fn observe(&mut self, job: &EncodeJob) -> io::Result<bool> {
        let snapshot = PairSnapshot::capture(job)?;
        let settled = self.last == Some(snapshot);
        self.last = Some(snapshot);
        Ok(settled)
    }

    /// Forget the tracked pair (after dispatch or removal).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
