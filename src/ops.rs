use std::path::Path;

use colored::*;
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets::UTF8_FULL};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{MongitConfig, Snapshot, validate_label};
use crate::drivers::selector::select_driver;
use crate::error::{MongitError, Result};
use crate::storage;
use crate::utils::io::{DirStats, dir_stats, human_bytes};
use crate::utils::process::Runner;

pub const INITIAL_LABEL: &str = "initial";

pub fn do_init(config: &MongitConfig, runner: &dyn Runner) -> Result<()> {
    storage::ensure_repository(runner)?;
    create_snapshot(config, runner, INITIAL_LABEL)?;
    println!("{} {}", "✔".green().bold(), "mongit initialized".green());
    Ok(())
}

pub fn do_branch(config: &MongitConfig, runner: &dyn Runner, name: &str) -> Result<()> {
    validate_label(name)?;
    storage::ensure_repository(runner)?;
    storage::create_branch(runner, name)?;
    create_snapshot(config, runner, &branch_label(name))?;
    println!(
        "{} {}",
        "✔".green().bold(),
        format!("Created branch {}", name).green()
    );
    Ok(())
}

pub fn do_snapshot(config: &MongitConfig, runner: &dyn Runner, label: &str) -> Result<()> {
    validate_label(label)?;
    storage::ensure_repository(runner)?;
    create_snapshot(config, runner, label)?;
    println!(
        "{} {}",
        "✔".green().bold(),
        format!("Created snapshot {}", label).green()
    );
    Ok(())
}

pub fn do_use(config: &MongitConfig, runner: &dyn Runner, label: &str) -> Result<()> {
    validate_label(label)?;
    storage::ensure_repository(runner)?;
    restore_snapshot(config, runner, label)?;
    println!(
        "{} {}",
        "✔".green().bold(),
        format!("Now using snapshot {}", label).green()
    );
    Ok(())
}

pub fn do_list(config: &MongitConfig, runner: &dyn Runner) -> Result<()> {
    storage::ensure_repository(runner)?;
    let snapshots = storage::list_snapshots(config, runner)?;

    if snapshots.is_empty() {
        println!("{} {}", "i".yellow().bold(), "No snapshots found".yellow());
        return Ok(());
    }

    println!("{}", snapshot_table(&snapshots));
    Ok(())
}

pub fn branch_label(name: &str) -> String {
    format!("{}-{}", name, INITIAL_LABEL)
}

/// Dump, stage and commit under `label`. Refuses before dumping when the
/// label is already taken.
fn create_snapshot(config: &MongitConfig, runner: &dyn Runner, label: &str) -> Result<()> {
    validate_label(label)?;
    if let Some(existing) = storage::find_snapshot(config, runner, label)? {
        return Err(MongitError::SnapshotExists {
            label: label.to_string(),
            commit: existing.commit,
        });
    }

    let driver = select_driver(config);
    tracing::debug!(label, driver = driver.name(), "creating snapshot");

    let bar = create_progress_bar(&format!("Dumping database for {}", label));
    let dumped = driver.dump(config, runner);
    bar.finish_and_clear();
    dumped?;

    let dump_dir = config.dump_dir_in(runner.workdir());
    report_dump(&dump_dir, dir_stats(&dump_dir));

    // A failure past this point leaves the dump in the working tree, uncommitted.
    storage::record_snapshot(config, runner, label)
}

fn restore_snapshot(config: &MongitConfig, runner: &dyn Runner, label: &str) -> Result<()> {
    validate_label(label)?;
    let snapshot = storage::find_snapshot(config, runner, label)?
        .ok_or_else(|| MongitError::SnapshotNotFound(label.to_string()))?;

    storage::checkout(runner, &snapshot.commit)?;

    let driver = select_driver(config);
    tracing::debug!(
        label,
        commit = %snapshot.commit,
        driver = driver.name(),
        "restoring snapshot"
    );

    let bar = create_progress_bar(&format!("Restoring {}", label));
    let restored = driver.restore(config, runner);
    bar.finish_and_clear();
    restored
}

/// Print the dump size. Only informational: errors are logged, never returned.
fn report_dump(dump_dir: &Path, stats: Result<Option<DirStats>>) {
    match stats {
        Ok(Some(stats)) => {
            tracing::debug!(files = stats.files, bytes = stats.bytes, "dump written");
            println!(
                "{} {}",
                "i".yellow().bold(),
                format!(
                    "Dumped {} files ({})",
                    stats.files,
                    human_bytes(stats.bytes)
                )
                .yellow()
            );
        }
        Ok(None) => {
            eprintln!(
                "{} {}: {}",
                "!".yellow().bold(),
                "Warning".yellow(),
                format!("no dump directory at '{}'", dump_dir.display())
            );
        }
        Err(e) => {
            tracing::warn!(dir = %dump_dir.display(), error = %e, "could not measure dump");
        }
    }
}

fn snapshot_table(snapshots: &[Snapshot]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Label").add_attribute(Attribute::Bold),
            Cell::new("Commit").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
        ]);

    for s in snapshots {
        table.add_row(vec![
            Cell::new(&s.label),
            Cell::new(&s.commit),
            Cell::new(s.created_at.format("%Y-%m-%d %H:%M:%S %:z").to_string()),
        ]);
    }
    table
}

fn create_progress_bar(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar
}
