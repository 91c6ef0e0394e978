use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use jiff::Zoned;
use tracing::debug;

use crate::error::Error;

use super::{CommitRecord, History};

/// Layout of git's `--date=default` output, with the day of month padded.
const AUTHOR_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Commit history of a working tree, read through the `git` executable.
pub struct Git {
    /// Top level of the working tree. Paths from git are relative to it.
    repo: PathBuf,
}

impl Git {
    /// Opens the working tree containing `dir`, which may be any directory
    /// inside it.
    pub fn open(dir: &Path) -> Result<Self, Error> {
        let mut command = Command::new("git");
        command.arg("-C").arg(dir).arg("rev-parse").arg("--show-toplevel");

        let output = stdout(command)?;
        let toplevel = output.strip_suffix(b"\n").unwrap_or(&output[..]);
        let repo = path_from_bytes(toplevel);
        debug!(repo = %repo.display(), "found working tree");

        Ok(Self { repo })
    }

    pub fn root(&self) -> &Path {
        &self.repo
    }

    fn command(&self) -> Command {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.repo);
        command
    }

    fn has_head(&self) -> Result<bool, Error> {
        let mut command = self.command();
        command
            .arg("rev-parse")
            .arg("--verify")
            .arg("--quiet")
            .arg("HEAD");

        let (line, output) = spawn(command)?;
        // With --quiet, an unborn HEAD exits with 1 and prints nothing.
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Error::Command {
                command: line,
                output: combined(&output),
            }),
        }
    }
}

impl History for Git {
    fn commits(&self) -> Result<Vec<String>, Error> {
        if !self.has_head()? {
            debug!(repo = %self.repo.display(), "no commits yet");
            return Ok(vec![]);
        }

        // Oldest first, so that later commits overwrite earlier timestamps.
        let mut command = self.command();
        command.arg("log").arg("--reverse").arg("--pretty=%H");

        let hashes = String::from_utf8_lossy(&stdout(command)?)
            .lines()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        Ok(hashes)
    }

    fn commit(&self, hash: &str) -> Result<CommitRecord, Error> {
        let mut command = self.command();
        command
            .arg("show")
            .arg("-z")
            .arg("--name-only")
            .arg("--date=default")
            .arg("--pretty=%ad")
            .arg(hash)
            .arg("--");

        parse_show(&stdout(command)?)
    }
}

fn describe(command: &Command) -> String {
    let mut line = command.get_program().to_string_lossy().to_string();
    for arg in command.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

fn combined(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).to_string();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

fn spawn(mut command: Command) -> Result<(String, Output), Error> {
    let line = describe(&command);
    debug!(command = %line, "running");
    match command.output() {
        Ok(output) => Ok((line, output)),
        Err(e) => Err(Error::Command {
            command: line,
            output: e.to_string(),
        }),
    }
}

fn stdout(command: Command) -> Result<Vec<u8>, Error> {
    let (line, output) = spawn(command)?;
    if !output.status.success() {
        return Err(Error::Command {
            command: line,
            output: combined(&output),
        });
    }
    Ok(output.stdout)
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Parses a date like `Mon Jan 2 15:04:05 2006 -0700`.
fn parse_author_date(line: &str) -> Result<Zoned, Error> {
    let fields = line.split(' ').collect::<Vec<_>>();
    let padded = match fields.as_slice() {
        [weekday, month, day, rest @ ..] if day.len() == 1 => {
            format!("{weekday} {month} 0{day} {}", rest.join(" "))
        }
        _ => line.to_string(),
    };

    Zoned::strptime(AUTHOR_DATE_FORMAT, &padded).map_err(|source| Error::TimestampParse {
        line: line.to_string(),
        source,
    })
}

/// Parses `git show -z --name-only --pretty=%ad` output: the author date,
/// then NUL terminated paths. Paths are taken verbatim, unquoted.
fn parse_show(output: &[u8]) -> Result<CommitRecord, Error> {
    let end = output
        .iter()
        .position(|&b| b == b'\n' || b == b'\0')
        .unwrap_or(output.len());
    let (line, rest) = output.split_at(end);
    let date = parse_author_date(&String::from_utf8_lossy(line))?;

    // Skip the byte that ended the date line.
    let paths = rest
        .get(1..)
        .unwrap_or_default()
        .split(|&b| b == b'\0')
        .filter(|s| !s.is_empty())
        .map(path_from_bytes)
        .collect::<Vec<_>>();

    Ok(CommitRecord { date, paths })
}
