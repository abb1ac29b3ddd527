//! Encode job definition and encoder argument construction.

pub mod invoke;

use crate::config::EncoderConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Video master the watcher waits for.
pub const MASTER_FILE: &str = "DolbyMaster.mov";

/// Profile 7 metadata file that must accompany the master.
pub const METADATA_FILE: &str = "DolbyMetadata.xml";

/// A single encode: the source pair and where the BL/EL streams land.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Full path to the video master in the watch folder.
    pub master: PathBuf,
    /// Full path to the metadata file in the watch folder.
    pub metadata: PathBuf,
    /// Base-layer output, named after the watch folder.
    pub output_bl: PathBuf,
    /// Enhancement-layer output, named after the watch folder.
    pub output_el: PathBuf,
}

impl EncodeJob {
    /// Derive job paths from the watch and output folders. Output files are
    /// named `<watch_basename>_bl.h265` and `<watch_basename>_el.h265`.
    pub fn for_folders(watch: &Path, output: &Path) -> Self {
        let base_name = watch
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());

        Self {
            master: watch.join(MASTER_FILE),
            metadata: watch.join(METADATA_FILE),
            output_bl: output.join(format!("{base_name}_bl.h265")),
            output_el: output.join(format!("{base_name}_el.h265")),
        }
    }

    /// Whether both source files are on disk.
    pub fn pair_present(&self) -> bool {
        self.master.is_file() && self.metadata.is_file()
    }
}

/// Build the full encoder argument list.
///
/// Config-derived arguments come first, one `--key value` pair per key in
/// sorted order with `null` values skipped, followed by the fixed input and
/// output arguments. The result is deterministic for a given config and job.
pub fn build_args(config: &EncoderConfig, job: &EncodeJob) -> Vec<String> {
    let mut args = Vec::with_capacity(config.args.len() * 2 + 8);

    for (key, value) in &config.args {
        if value.is_null() {
            continue;
        }
        args.push(format!("--{key}"));
        args.push(render_value(value));
    }

    args.push("--input".to_string());
    args.push(job.master.to_string_lossy().to_string());
    args.push("--input-metadata".to_string());
    args.push(job.metadata.to_string_lossy().to_string());
    args.push("--output-bl".to_string());
    args.push(job.output_bl.to_string_lossy().to_string());
    args.push("--output-el".to_string());
    args.push(job.output_el.to_string_lossy().to_string());

    args
}

fn render_value(value: &Value) -> String {
    match value {
        // Strings are passed bare; to_string() would add quotes.
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncoderConfig;
    use std::collections::BTreeMap;

    fn config_with(pairs: &[(&str, Value)]) -> EncoderConfig {
        EncoderConfig {
            encoder_path: PathBuf::from("/opt/dee/dee_wrapper"),
            args: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn job_paths_derive_from_folders() {
        let job = EncodeJob::for_folders(Path::new("/in/feature_a"), Path::new("/out"));
        assert_eq!(job.master, PathBuf::from("/in/feature_a/DolbyMaster.mov"));
        assert_eq!(job.metadata, PathBuf::from("/in/feature_a/DolbyMetadata.xml"));
        assert_eq!(job.output_bl, PathBuf::from("/out/feature_a_bl.h265"));
        assert_eq!(job.output_el, PathBuf::from("/out/feature_a_el.h265"));
    }

    #[test]
    fn args_are_sorted_and_deterministic() {
        let config = config_with(&[
            ("frame-rate", Value::from(24)),
            ("bit-depth", Value::from(10)),
        ]);
        let job = EncodeJob::for_folders(Path::new("/in/m"), Path::new("/out"));

        let args = build_args(&config, &job);
        // bit-depth sorts before frame-rate regardless of insertion order.
        assert_eq!(
            &args[..4],
            &["--bit-depth", "10", "--frame-rate", "24"]
        );
        assert_eq!(args, build_args(&config, &job));
    }

    #[test]
    fn null_values_are_skipped() {
        let config = config_with(&[("skip-me", Value::Null), ("keep", Value::from("x"))]);
        let job = EncodeJob::for_folders(Path::new("/in/m"), Path::new("/out"));

        let args = build_args(&config, &job);
        assert!(!args.iter().any(|a| a.contains("skip-me")));
        assert_eq!(&args[..2], &["--keep", "x"]);
    }

    #[test]
    fn fixed_io_args_come_last() {
        let config = config_with(&[]);
        let job = EncodeJob::for_folders(Path::new("/in/m"), Path::new("/out"));

        let args = build_args(&config, &job);
        assert_eq!(
            args,
            vec![
                "--input",
                "/in/m/DolbyMaster.mov",
                "--input-metadata",
                "/in/m/DolbyMetadata.xml",
                "--output-bl",
                "/out/m_bl.h265",
                "--output-el",
                "/out/m_el.h265",
            ]
        );
    }

    #[test]
    fn scalar_values_render_without_quotes() {
        assert_eq!(render_value(&Value::from("slow")), "slow");
        assert_eq!(render_value(&Value::from(true)), "true");
        assert_eq!(render_value(&Value::from(23.976)), "23.976");
    }
}
