//! Output directory preparation and working-directory cleanup.

use std::fs;
use std::path::{Path, PathBuf};

use socgen_config::FileCopy;

use crate::error::DriverError;

/// Files Vivado leaves in the directory it was launched from.
const DUMP_FILES: [&str; 2] = ["vivado.jou", "vivado.log"];

/// Cache directory Vivado creates next to its journal.
const DUMP_DIR: &str = ".Xil";

/// Removes `dir` if it exists and creates it empty.
pub fn ensure_clean_dir(dir: &Path) -> Result<(), DriverError> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(DriverError::io("remove", dir))?;
        log::warn!("removed existing directory {}", dir.display());
    }
    fs::create_dir_all(dir).map_err(DriverError::io("create", dir))?;
    log::debug!("created directory {}", dir.display());
    Ok(())
}

/// Performs a copy plan. Stops at the first failure.
pub fn copy_files(plan: &[FileCopy]) -> Result<(), DriverError> {
    for copy in plan {
        fs::copy(&copy.from, &copy.to).map_err(DriverError::io("copy", &copy.from))?;
        log::debug!("copied {} -> {}", copy.from.display(), copy.to.display());
    }
    Ok(())
}

/// Writes the generated script.
pub fn write_script(path: &Path, text: &str) -> Result<(), DriverError> {
    fs::write(path, text).map_err(DriverError::io("write", path))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Deletes Vivado journals, logs, their backups, and the `.Xil` cache from `dir`.
///
/// Returns the paths removed. Failures are logged and skipped.
pub fn delete_dump(dir: &Path) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("cannot list {}: {e}", dir.display());
            return removed;
        }
    };
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        let result = if name == DUMP_DIR && path.is_dir() {
            fs::remove_dir_all(&path)
        } else if is_dump_file(&name) && path.is_file() {
            fs::remove_file(&path)
        } else {
            continue;
        };
        match result {
            Ok(()) => {
                log::info!("{name} is deleted");
                removed.push(path);
            }
            Err(e) => log::warn!("failed to delete {}: {e}", path.display()),
        }
    }
    removed.sort();
    removed
}

/// `vivado.jou`, `vivado.log`, or a rotated `vivado_<n>.backup.{jou,log}`.
fn is_dump_file(name: &str) -> bool {
    if DUMP_FILES.contains(&name) {
        return true;
    }
    name.strip_prefix("vivado_")
        .and_then(|rest| {
            rest.strip_suffix(".backup.jou")
                .or_else(|| rest.strip_suffix(".backup.log"))
        })
        .is_some()
}
