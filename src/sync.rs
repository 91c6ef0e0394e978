use std::{
    fs,
    io::{ErrorKind, Write},
    path::Path,
};

use filetime::FileTime;
use indicatif::ProgressBar;
use jiff::Zoned;
use tracing::{debug, warn};

use crate::{error::Error, history::History, progress};

const LINE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

#[derive(Debug, Default, Clone, Copy)]
pub struct Options {
    /// Report what would be stamped without touching any file.
    pub dry_run: bool,
    /// Do not write a line per file.
    pub quiet: bool,
    pub progress: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub commits: usize,
    pub stamped: usize,
    /// Paths listed by a commit that do not exist in the working tree.
    pub skipped: usize,
}

fn file_time(date: &Zoned) -> FileTime {
    FileTime::from_unix_time(date.timestamp().as_second(), 0)
}

/// Sets atime and mtime of every file in `root` to the author date of the
/// commits touching it, in the order `history` lists them. When several
/// commits touch a file, the last one processed wins.
pub fn sync(
    history: &impl History,
    root: &Path,
    options: Options,
    out: &mut impl Write,
) -> Result<Summary, Error> {
    let hashes = history
        .commits()?
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    let pb = if options.progress {
        progress::counting_bar("Commits", hashes.len())
    } else {
        ProgressBar::hidden()
    };

    let mut summary = Summary::default();
    for hash in hashes {
        let record = history.commit(&hash)?;
        let time = file_time(&record.date);
        debug!(%hash, date = %record.date, files = record.paths.len(), "processing commit");

        for path in &record.paths {
            if !options.quiet {
                let line = format!(
                    "{} : {}",
                    record.date.strftime(LINE_FORMAT),
                    path.display()
                );
                pb.suspend(|| writeln!(out, "{line}"))
                    .map_err(Error::Output)?;
            }

            let file = root.join(path);
            match fs::metadata(&file) {
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(path = %path.display(), "skipping file that no longer exists");
                    summary.skipped += 1;
                    continue;
                }
                // Anything else, e.g. a file standing where a directory was.
                Err(source) => return Err(Error::TimestampWrite { path: file, source }),
            }

            if !options.dry_run {
                filetime::set_file_times(&file, time, time).map_err(|source| {
                    Error::TimestampWrite {
                        path: file.clone(),
                        source,
                    }
                })?;
            }
            summary.stamped += 1;
        }

        summary.commits += 1;
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(summary)
}
