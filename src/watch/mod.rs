//! Watch-folder polling loop.
//!
//! Polls the watch folder for a `DolbyMaster.mov` / `DolbyMetadata.xml`
//! pair, dispatches the external encoder once the pair has settled, and
//! archives the sources into the processed folder on success.

pub mod settle;

pub use settle::SettleTracker;

use crate::config::EncoderConfig;
use crate::encoder::{self, EncodeJob, MASTER_FILE, METADATA_FILE};
use crate::error::Result;
use crate::tools;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Folder layout the watcher operates on.
#[derive(Debug, Clone)]
pub struct WatchFolders {
    /// Folder polled for the source pair.
    pub watch: PathBuf,
    /// Folder receiving the BL/EL output streams.
    pub output: PathBuf,
    /// Folder the source pair is moved to after a successful encode.
    pub processed: PathBuf,
}

/// Polling watcher that dispatches encode jobs for settled file pairs.
pub struct Watcher {
    folders: WatchFolders,
    config: EncoderConfig,
    interval: Duration,
    stop: Arc<AtomicBool>,
}

impl Watcher {
    pub fn new(folders: WatchFolders, config: EncoderConfig, interval: Duration) -> Self {
        Self {
            folders,
            config,
            interval,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Clone of the stop flag for external control (Ctrl+C handler).
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Run the polling loop until the stop flag is set.
    ///
    /// Encoder failures are logged and re-attempted on the next poll; a
    /// failure to archive a finished pair is a hard error, since leaving it
    /// in place would re-encode the same sources forever.
    pub fn run(&self) -> Result<()> {
        let program = tools::resolve_encoder(&self.config)?;

        tracing::info!("Watching folder: {}", self.folders.watch.display());
        tracing::info!(
            "Polling every {} seconds for {MASTER_FILE} and {METADATA_FILE}",
            self.interval.as_secs()
        );

        let mut settle = SettleTracker::new();

        while !self.stop.load(Ordering::SeqCst) {
            self.poll_once(&program, &mut settle)?;
            self.sleep_interval();
        }

        tracing::info!("Watcher stopped");
        Ok(())
    }

    /// One poll: detect the pair, gate on settle, encode, archive.
    fn poll_once(&self, program: &Path, settle: &mut SettleTracker) -> Result<()> {
        let job = EncodeJob::for_folders(&self.folders.watch, &self.folders.output);

        if !job.pair_present() {
            settle.reset();
            return Ok(());
        }

        match settle.observe(&job) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("Pair found, waiting for it to settle");
                return Ok(());
            }
            Err(e) => {
                // Pair vanished between the existence check and the stat.
                tracing::debug!("Pair disappeared while checking: {e}");
                settle.reset();
                return Ok(());
            }
        }

        tracing::info!("Found {MASTER_FILE} and {METADATA_FILE}. Starting encoding process");

        let args = encoder::build_args(&self.config, &job);
        match encoder::invoke::run_encoder(program, &args) {
            Ok(()) => {
                archive_pair(&job, &self.folders.processed)?;
                settle.reset();
                tracing::info!("Waiting for new files");
            }
            Err(e) => {
                // Pair stays in place; the next poll re-attempts.
                tracing::warn!("Encoding failed: {e}");
                settle.reset();
            }
        }

        Ok(())
    }

    /// Sleep the poll interval in short slices so a stop request is honored
    /// promptly.
    fn sleep_interval(&self) {
        let slice = Duration::from_millis(250);
        let mut remaining = self.interval;

        while !self.stop.load(Ordering::SeqCst) && remaining > Duration::ZERO {
            let step = remaining.min(slice);
            std::thread::sleep(step);
            remaining -= step;
        }
    }
}

/// Move the source pair into the processed folder with a timestamp suffix,
/// `DolbyMaster_<YYYYmmdd-HHMMSS>.mov` and `DolbyMetadata_<YYYYmmdd-HHMMSS>.xml`.
pub fn archive_pair(job: &EncodeJob, processed: &Path) -> Result<()> {
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");

    move_file(&job.master, &processed.join(format!("DolbyMaster_{stamp}.mov")))?;
    move_file(
        &job.metadata,
        &processed.join(format!("DolbyMetadata_{stamp}.xml")),
    )?;

    tracing::info!("Moved source files to {}", processed.display());
    Ok(())
}

/// Rename, falling back to copy+remove when the processed folder sits on a
/// different filesystem.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}
