use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to determine the working directory")]
    WorkingDirectory(#[source] io::Error),

    /// `git` could not be spawned or exited unsuccessfully. The output is
    /// stdout and stderr of the process, concatenated.
    #[error("`{command}` failed:\n{output}")]
    Command { command: String, output: String },

    #[error("could not understand this time stamp: {line:?}")]
    TimestampParse {
        line: String,
        #[source]
        source: jiff::Error,
    },

    #[error("failed to change timestamps of {}", path.display())]
    TimestampWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write progress output")]
    Output(#[source] io::Error),
}
