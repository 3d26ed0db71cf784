use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{MongitError, Result};

pub const CONFIG_FILE: &str = ".mongit.json";

/// Settings shared by every operation. Built once in `main` and passed down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MongitConfig {
    /// Container to run the dump/restore tools in. `None` runs them on the host.
    pub docker: Option<String>,
    /// Connection string handed to the tools' `--uri` flag.
    pub uri: Option<String>,
    /// Commit subject prefix; a snapshot's subject is `prefix + label`.
    pub prefix: String,
    /// Dump directory, relative to the working tree.
    pub dump_dir: String,
    /// Directory inside the container that holds the dump directory.
    pub container_root: String,
    pub dump_tool: String,
    pub restore_tool: String,
}

impl Default for MongitConfig {
    fn default() -> Self {
        Self {
            docker: None,
            uri: None,
            prefix: "mongit-".into(),
            dump_dir: "dump".into(),
            container_root: "/opt".into(),
            dump_tool: "mongodump".into(),
            restore_tool: "mongorestore".into(),
        }
    }
}

impl MongitConfig {
    /// Load the project file: `explicit` if given (it must exist), otherwise
    /// `.mongit.json` in `workdir` when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>, workdir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.is_file() {
                    return Err(MongitError::Config {
                        path: p.to_path_buf(),
                        reason: "file not found".into(),
                    });
                }
                p.to_path_buf()
            }
            None => {
                let p = workdir.join(CONFIG_FILE);
                if !p.is_file() {
                    return Ok(Self::default());
                }
                p
            }
        };

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Self = serde_json::from_str(&content).map_err(|e| MongitError::Config {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        cfg.validate(&path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Command-line flags win over the file. Clap rejects empty values
    /// before they get here.
    pub fn with_overrides(mut self, docker: Option<String>, uri: Option<String>) -> Self {
        if docker.is_some() {
            self.docker = docker;
        }
        if uri.is_some() {
            self.uri = uri;
        }
        self
    }

    pub fn message_for(&self, label: &str) -> String {
        format!("{}{}", self.prefix, label)
    }

    /// Inverse of `message_for`: the label encoded in a commit subject.
    pub fn label_of<'a>(&self, subject: &'a str) -> Option<&'a str> {
        subject
            .strip_prefix(self.prefix.as_str())
            .filter(|l| !l.is_empty())
    }

    pub fn container_dump_path(&self) -> String {
        format!(
            "{}/{}",
            self.container_root.trim_end_matches('/'),
            self.dump_dir
        )
    }

    pub fn local_dump_path(&self) -> String {
        format!("./{}", self.dump_dir)
    }

    pub fn dump_dir_in(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.dump_dir)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let bad = |reason: &str| {
            Err(MongitError::Config {
                path: path.to_path_buf(),
                reason: reason.into(),
            })
        };
        if self.prefix.is_empty() {
            return bad("prefix must not be empty");
        }
        if self.dump_dir.is_empty()
            || self.dump_dir.contains('/')
            || self.dump_dir == "."
            || self.dump_dir == ".."
        {
            return bad("dump_dir must be a single directory name");
        }
        if self.dump_tool.is_empty() || self.restore_tool.is_empty() {
            return bad("dump_tool and restore_tool must not be empty");
        }
        if self.docker.as_deref() == Some("") {
            return bad("docker must name a container");
        }
        Ok(())
    }
}

/// Git rewrites commit subjects (trailing whitespace is stripped, line
/// breaks are folded), so only labels it stores verbatim are accepted.
pub fn validate_label(label: &str) -> Result<()> {
    let reason = if label.is_empty() {
        "must not be empty"
    } else if label.trim() != label {
        "must not start or end with whitespace"
    } else if label.chars().any(char::is_control) {
        "must not contain control characters"
    } else {
        return Ok(());
    };
    Err(MongitError::InvalidLabel {
        label: label.to_string(),
        reason,
    })
}

/// A labeled commit as seen in history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub label: String,
    pub commit: String,
    pub created_at: DateTime<FixedOffset>,
}
