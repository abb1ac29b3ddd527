//! Spawning the external encoder and relaying its output.
//!
//! The encoder is an opaque, licensed tool that runs for a long time, so its
//! output is streamed line by line into the log as it arrives rather than
//! captured at exit.

use crate::error::{Error, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

/// Severity assigned to a relayed encoder output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineLevel {
    Error,
    Warning,
    Info,
}

/// Classify an encoder output line by content.
fn classify(line: &str) -> LineLevel {
    let lower = line.to_lowercase();
    if lower.contains("error") {
        LineLevel::Error
    } else if lower.contains("warning") {
        LineLevel::Warning
    } else {
        LineLevel::Info
    }
}

fn relay(tool: &str, line: &str) {
    match classify(line) {
        LineLevel::Error => tracing::error!("[{tool}] {line}"),
        LineLevel::Warning => tracing::warn!("[{tool}] {line}"),
        LineLevel::Info => tracing::info!("[{tool}] {line}"),
    }
}

/// Run the encoder, streaming its output through the log.
///
/// # Errors
///
/// - [`Error::Tool`] if the process cannot be spawned (missing binary).
/// - [`Error::Tool`] if the process exits with a non-zero status (the exit
///   status is included in the message).
pub fn run_encoder(program: &Path, args: &[String]) -> Result<()> {
    let tool = program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string());

    tracing::info!("Running encoder: {} {}", program.display(), args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| Error::tool(tool.clone(), format!("failed to spawn: {e}")))?;

    // stderr is drained on a helper thread so neither pipe can fill up and
    // stall the encoder.
    let stderr_handle = child.stderr.take().map(|pipe| {
        let stderr_tool = tool.clone();
        std::thread::spawn(move || {
            for line in BufReader::new(pipe).lines().map_while(std::result::Result::ok) {
                relay(&stderr_tool, &line);
            }
        })
    });

    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines().map_while(std::result::Result::ok) {
            relay(&tool, &line);
        }
    }

    if let Some(handle) = stderr_handle {
        let _ = handle.join();
    }

    let status = child
        .wait()
        .map_err(|e| Error::tool(tool.clone(), format!("I/O error waiting for process: {e}")))?;

    if !status.success() {
        return Err(Error::tool(
            tool,
            format!("exited with status {status}"),
        ));
    }

    tracing::info!("Encoding process completed successfully");
    Ok(())
}
