mod error;
mod history;
mod progress;
mod sync;

use std::{env, io, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};

use crate::{error::Error, history::Git};

/// Set the modification time of every file in a git working tree to the date
/// of the last commit that touched it.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory inside the working tree [default: current directory]
    #[arg(short = 'C', value_name = "DIR")]
    repo: Option<PathBuf>,

    /// Print what would be changed without changing anything
    #[arg(long, short = 'n', default_value_t = false)]
    dry_run: bool,

    /// Do not print a line per file
    #[arg(long, short, default_value_t = false)]
    quiet: bool,

    /// Show a progress bar on stderr
    #[arg(long, default_value_t = false)]
    progress: bool,

    /// Log more (repeatable)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let dir = match args.repo {
        Some(dir) => dir,
        None => env::current_dir().map_err(Error::WorkingDirectory)?,
    };

    let options = sync::Options {
        dry_run: args.dry_run,
        quiet: args.quiet,
        progress: args.progress,
    };

    let git = Git::open(&dir)
        .with_context(|| format!("failed to find a working tree at {}", dir.display()))?;
    let root = git.root();
    let summary = sync::sync(&git, root, options, &mut io::stdout().lock())
        .with_context(|| format!("failed to update timestamps in {}", root.display()))?;

    info!(
        commits = summary.commits,
        stamped = summary.stamped,
        skipped = summary.skipped,
        dry_run = options.dry_run,
        "done"
    );
    Ok(())
}
