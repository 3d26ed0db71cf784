use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MongitError {
    #[error("Snapshot {label} already exists in commit {commit}")]
    SnapshotExists { label: String, commit: String },

    #[error("Can't find snapshot {0}")]
    SnapshotNotFound(String),

    #[error("invalid snapshot label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    #[error("not inside a git work tree: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("`{command}` exited with {status}: {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MongitError>;
