use clap::Parser;
use log::LevelFilter;
use photom::{Cli, Commands, ConflictPolicy, RunOptions, RunSummary};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    match cli.command {
        Commands::Rename {
            dir_path,
            dry_run,
            overwrite,
            threads,
        } => {
            init_logger(level, dry_run);
            let options = RunOptions {
                dry_run,
                conflict_policy: ConflictPolicy::from_overwrite(overwrite),
                threads,
            };
            let summary = photom::run_rename(&dir_path, &options)?;
            report("Renamed", dry_run, &summary);
        }
        Commands::Downsize {
            source_dir,
            out_dir,
            target_bytes,
            dry_run,
            overwrite,
            threads,
        } => {
            init_logger(level, dry_run);
            let options = RunOptions {
                dry_run,
                conflict_policy: ConflictPolicy::from_overwrite(overwrite),
                threads,
            };
            let summary = photom::run_downsize(&source_dir, &out_dir, target_bytes, &options)?;
            report("Downsized", dry_run, &summary);
        }
    }

    Ok(())
}

fn init_logger(level: LevelFilter, dry_run: bool) {
    // A dry run must at least show the proposed actions.
    let level = if dry_run {
        level.max(LevelFilter::Info)
    } else {
        level
    };
    env_logger::Builder::new().filter_level(level).init();
}

// Per-file failures are reported here but do not change the exit status;
// only errors that abort the whole run do.
fn report(verb: &str, dry_run: bool, summary: &RunSummary) {
    let verb = if dry_run { "Would have processed" } else { verb };
    println!(
        "{} {} photos ({} skipped, {} failed)",
        verb, summary.succeeded, summary.skipped, summary.failed
    );
}
