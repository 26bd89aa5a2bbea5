//! Export record persistence.
//!
//! # Responsibilities
//! - Merge this run's (logical name → address) pairs into the export file
//! - Keep entries from other networks and other runs intact
//! - Write atomically so concurrent publishes never interleave
//!
//! # Design Decisions
//! - JSON keyed by network name, human-readable, safe to commit
//! - Write goes to a temp file in the same directory, then a rename; an
//!   existing file that fails to parse is an error, never clobbered

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Serializes read-merge-write cycles so concurrent publishes targeting the
/// same export file cannot lose each other's keys. Cross-process safety
/// comes from the rename-on-write below.
static EXPORT_LOCK: Mutex<()> = Mutex::new(());

/// Errors raised while persisting the export record.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export record '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The existing export file is unreadable; refusing to overwrite it.
    #[error("existing export file '{path}' is not valid JSON: {reason}")]
    ExistingCorrupt { path: String, reason: String },
}

/// `network → logical name → address`, kept sorted for stable diffs.
type ExportMap = BTreeMap<String, BTreeMap<String, String>>;

fn export_path(export_dir: &Path, export_name: &str) -> PathBuf {
    export_dir.join(format!("{}.json", export_name))
}

fn read_existing(path: &Path) -> Result<ExportMap, ExportError> {
    if !path.exists() {
        return Ok(ExportMap::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| ExportError::Write {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ExportError::ExistingCorrupt {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension(format!("json.tmp.{}", std::process::id()));
    std::fs::write(&tmp, content)?;
    match std::fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = std::fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Merge this run's pairs into the export file under `network`, creating
/// the file if needed. Returns the path written. Only the keys produced by
/// this run are overwritten.
pub fn write_export(
    export_dir: &Path,
    export_name: &str,
    network: &str,
    pairs: &[(String, String)],
) -> Result<PathBuf, ExportError> {
    let path = export_path(export_dir, export_name);
    let _guard = EXPORT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let mut map = read_existing(&path)?;

    let entry = map.entry(network.to_string()).or_default();
    for (name, id) in pairs {
        entry.insert(name.clone(), id.clone());
    }

    let mut content = serde_json::to_string_pretty(&map).expect("string map serializes");
    content.push('\n');
    write_atomic(&path, &content).map_err(|e| ExportError::Write {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!(
        path = %path.display(),
        network,
        entries = pairs.len(),
        "Export record written"
    );

    Ok(path)
}
