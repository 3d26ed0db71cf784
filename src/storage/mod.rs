//! Snapshot storage on top of git: one labeled commit per snapshot.

use chrono::DateTime;

use crate::config::{MongitConfig, Snapshot};
use crate::error::{MongitError, Result};
use crate::utils::process::{Invocation, Runner};

const GIT: &str = "git";
const FIELD_SEP: char = '\u{1f}';

fn git<I, S>(args: I) -> Invocation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Invocation::new(GIT).args(args)
}

/// Fail unless the runner's working directory is inside a git work tree.
pub fn ensure_repository(runner: &dyn Runner) -> Result<()> {
    match runner.run(&git(["rev-parse", "--is-inside-work-tree"])) {
        Ok(out) if out.trim() == "true" => Ok(()),
        Ok(_) | Err(MongitError::CommandFailed { .. }) => {
            Err(MongitError::NotARepository(runner.workdir().to_path_buf()))
        }
        Err(e) => Err(e),
    }
}

/// False on an unborn branch, where `git log` would fail.
pub fn has_commits(runner: &dyn Runner) -> Result<bool> {
    match runner.run(&git(["rev-parse", "--verify", "-q", "HEAD"])) {
        Ok(_) => Ok(true),
        Err(MongitError::CommandFailed { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Every labeled commit reachable from HEAD, newest first.
pub fn list_snapshots(config: &MongitConfig, runner: &dyn Runner) -> Result<Vec<Snapshot>> {
    if !has_commits(runner)? {
        return Ok(Vec::new());
    }

    // Pin the regex flavour so `grep.patternType` cannot change what the escaping means.
    let out = runner.run(&git([
        "log".to_string(),
        "--format=%h%x1f%cI%x1f%s".to_string(),
        "--basic-regexp".to_string(),
        format!("--grep=^{}", escape_basic_regex(&config.prefix)),
    ]))?;

    let mut snapshots = Vec::new();
    for line in out.lines() {
        let mut fields = line.splitn(3, FIELD_SEP);
        let (Some(commit), Some(date), Some(subject)) =
            (fields.next(), fields.next(), fields.next())
        else {
            tracing::debug!(line, "skipping unparsable log line");
            continue;
        };
        // --grep matches any line of the message; only the subject carries the label.
        let Some(label) = config.label_of(subject) else {
            continue;
        };
        let created_at = match DateTime::parse_from_rfc3339(date) {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(commit, date, error = %e, "skipping commit with bad date");
                continue;
            }
        };
        snapshots.push(Snapshot {
            label: label.to_string(),
            commit: commit.to_string(),
            created_at,
        });
    }
    Ok(snapshots)
}

/// Resolve `label` to its commit. When several commits carry the same label
/// the newest wins and the rest are reported.
pub fn find_snapshot(
    config: &MongitConfig,
    runner: &dyn Runner,
    label: &str,
) -> Result<Option<Snapshot>> {
    let mut matches: Vec<Snapshot> = list_snapshots(config, runner)?
        .into_iter()
        .filter(|s| s.label == label)
        .collect();

    if matches.len() > 1 {
        let ignored: Vec<&str> = matches[1..].iter().map(|s| s.commit.as_str()).collect();
        tracing::warn!(
            label,
            chosen = %matches[0].commit,
            ignored = %ignored.join(", "),
            "label is attached to several commits; using the most recent"
        );
    }
    if matches.is_empty() {
        Ok(None)
    } else {
        Ok(Some(matches.swap_remove(0)))
    }
}

/// Stage the whole working tree and commit it under `label`.
pub fn record_snapshot(config: &MongitConfig, runner: &dyn Runner, label: &str) -> Result<()> {
    runner.run(&git(["add", "."]))?;
    // An unchanged dump still gets its label commit.
    runner.run(&git([
        "commit".to_string(),
        "--allow-empty".to_string(),
        "-m".to_string(),
        config.message_for(label),
    ]))?;
    Ok(())
}

pub fn checkout(runner: &dyn Runner, commit: &str) -> Result<()> {
    runner.run(&git(["checkout", commit]))?;
    Ok(())
}

pub fn create_branch(runner: &dyn Runner, name: &str) -> Result<()> {
    runner.run(&git(["checkout", "-b", name]))?;
    Ok(())
}

/// Escape POSIX basic-regex metacharacters for `git log --basic-regexp --grep`.
fn escape_basic_regex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '.' | '[' | ']' | '*' | '^' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
