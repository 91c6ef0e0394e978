mod git;

use std::path::PathBuf;

use jiff::Zoned;

use crate::error::Error;

pub use self::git::Git;

/// Author date and changed paths of a single commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub date: Zoned,
    /// Paths relative to the repository root, in the order git lists them.
    pub paths: Vec<PathBuf>,
}

/// Source of commit history for the synchronizer.
pub trait History {
    /// Commit identifiers in processing order. May contain empty entries.
    fn commits(&self) -> Result<Vec<String>, Error>;

    fn commit(&self, hash: &str) -> Result<CommitRecord, Error>;
}
