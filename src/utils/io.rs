use std::path::Path;

use walkdir::WalkDir;

use crate::error::Result;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirStats {
    pub files: u64,
    pub bytes: u64,
}

/// Count regular files and their total size under `dir`.
/// Returns `None` when `dir` does not exist.
pub fn dir_stats(dir: &Path) -> Result<Option<DirStats>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut stats = DirStats::default();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            stats.files += 1;
            stats.bytes += entry.metadata().map_err(std::io::Error::from)?.len();
        }
    }
    Ok(Some(stats))
}

pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
