// photom/src/cli.rs
use crate::core::DEFAULT_THREADS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photom", version, about = "Batch photo renaming and downsizing")]
pub struct Cli {
    /// Set logging level to 'INFO'
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set logging level to 'DEBUG'
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rename photos in place using the date when each photo was taken
    Rename {
        /// Photo file or directory to scan recursively
        dir_path: PathBuf,

        /// Print proposed actions but do not commit them
        #[arg(long)]
        dry_run: bool,

        /// Allow replacing a file that already has the computed name
        #[arg(long)]
        overwrite: bool,

        /// Worker threads for the batch
        #[arg(long, default_value_t = DEFAULT_THREADS)]
        threads: usize,
    },

    /// Downsize photos toward a target byte size, mirroring the source tree
    Downsize {
        /// Photo file or directory to scan recursively
        source_dir: PathBuf,

        /// Directory receiving the downsized outputs
        out_dir: PathBuf,

        /// Target file size in bytes
        #[arg(long, default_value_t = 1_048_576)]
        target_bytes: u64,

        /// Print proposed actions but do not commit them
        #[arg(long)]
        dry_run: bool,

        /// Allow replacing pre-existing output files
        #[arg(long)]
        overwrite: bool,

        /// Worker threads for the batch
        #[arg(long, default_value_t = DEFAULT_THREADS)]
        threads: usize,
    },
}
