use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mezzwatch")]
#[command(
    author,
    version,
    about = "Watch-folder automation for Dolby Vision Profile 7 encoding"
)]
pub struct Cli {
    /// Path to the JSON encoder config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch a folder and encode each DolbyMaster.mov / DolbyMetadata.xml pair
    Watch {
        /// Folder to watch for DolbyMaster.mov and DolbyMetadata.xml
        #[arg(long)]
        watch_folder: PathBuf,

        /// Folder to save encoded files
        #[arg(long)]
        output_folder: PathBuf,

        /// Folder to move source files to after successful encoding
        #[arg(long)]
        processed_folder: PathBuf,

        /// Interval in seconds between folder checks
        #[arg(long, default_value = "60")]
        polling_interval: u64,
    },

    /// Encode a pair that is already present, then exit
    Run {
        /// Folder holding DolbyMaster.mov and DolbyMetadata.xml
        #[arg(long)]
        watch_folder: PathBuf,

        /// Folder to save encoded files
        #[arg(long)]
        output_folder: PathBuf,

        /// Print the constructed encoder command without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate (falls back to --config)
        config: Option<PathBuf>,
    },

    /// Check that the configured encoder is available
    CheckTools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}
