mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use mezzwatch::{config, encoder, tools, watch};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults based on the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mezzwatch=trace".to_string()
        } else {
            "mezzwatch=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Watch {
            watch_folder,
            output_folder,
            processed_folder,
            polling_interval,
        } => run_watch(
            watch_folder,
            output_folder,
            processed_folder,
            polling_interval,
            cli.config.as_deref(),
        ),
        Commands::Run {
            watch_folder,
            output_folder,
            dry_run,
        } => run_once(&watch_folder, &output_folder, dry_run, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::CheckTools { json } => check_tools(cli.config.as_deref(), json),
        Commands::Version => {
            println!("mezzwatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn require_config(path: Option<&Path>) -> Result<config::EncoderConfig> {
    let path = path.context("no config file specified; pass --config <file>")?;
    Ok(config::load_config(path)?)
}

/// The watch folder must already exist; output and processed folders are
/// created on demand.
fn prepare_folders(watch: &Path, output: &Path, processed: Option<&Path>) -> Result<()> {
    if !watch.is_dir() {
        anyhow::bail!(
            "Watch folder {} does not exist or is not a directory",
            watch.display()
        );
    }

    for dir in std::iter::once(output).chain(processed) {
        if !dir.is_dir() {
            tracing::info!("Folder {} does not exist. Creating it", dir.display());
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create folder {}", dir.display()))?;
        }
    }

    Ok(())
}

fn run_watch(
    watch_folder: PathBuf,
    output_folder: PathBuf,
    processed_folder: PathBuf,
    polling_interval: u64,
    config_path: Option<&Path>,
) -> Result<()> {
    if polling_interval == 0 {
        anyhow::bail!("Polling interval must be at least 1 second");
    }

    prepare_folders(&watch_folder, &output_folder, Some(&processed_folder))?;
    let config = require_config(config_path)?;

    let watcher = watch::Watcher::new(
        watch::WatchFolders {
            watch: watch_folder,
            output: output_folder,
            processed: processed_folder,
        },
        config,
        Duration::from_secs(polling_interval),
    );

    let stop = watcher.stop_signal();
    ctrlc::set_handler(move || {
        stop.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    tracing::info!("Press Ctrl+C to stop");
    watcher.run()?;
    Ok(())
}

fn run_once(
    watch_folder: &Path,
    output_folder: &Path,
    dry_run: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    prepare_folders(watch_folder, output_folder, None)?;
    let config = require_config(config_path)?;

    let job = encoder::EncodeJob::for_folders(watch_folder, output_folder);
    if !job.pair_present() {
        anyhow::bail!(
            "Expected {} and {} in {}",
            encoder::MASTER_FILE,
            encoder::METADATA_FILE,
            watch_folder.display()
        );
    }

    let args = encoder::build_args(&config, &job);

    if dry_run {
        println!(
            "[DRY RUN] {} {}",
            config.encoder_path.display(),
            args.join(" ")
        );
        return Ok(());
    }

    let program = tools::resolve_encoder(&config)?;
    encoder::invoke::run_encoder(&program, &args)?;

    println!("Encoding complete");
    println!("  BL: {}", job.output_bl.display());
    println!("  EL: {}", job.output_el.display());
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let path = path.context("no config file specified; pass --config <file>")?;

    println!("Validating config: {}", path.display());
    let config = config::load_config(path)?;

    println!("✓ Configuration is valid");
    println!("  Encoder: {}", config.encoder_path.display());
    println!("  Encoder arguments: {}", config.args.len());
    println!(
        "    Skipped (null): {}",
        config.args.values().filter(|v| v.is_null()).count()
    );

    Ok(())
}

fn check_tools(config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = require_config(config_path)?;
    let info = tools::check_encoder(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Checking external tools...\n");

    let status = if info.available { "✓" } else { "✗" };

    print!("{} {}", status, info.name);
    if let Some(ref version) = info.version {
        print!(" ({})", version);
    }
    if let Some(ref path) = info.path {
        print!(" - {}", path.display());
    }
    println!();

    println!();
    if info.available {
        println!("Encoder is available!");
    } else {
        println!("Encoder is missing. Check 'encoder_path' in the config.");
    }

    Ok(())
}
