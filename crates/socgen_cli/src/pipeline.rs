//! Shared loading steps used by every subcommand.

use std::path::Path;

use socgen_config::{load_design, load_tool_config, resolve_design, ResolvedDesign, ToolConfig};

use crate::error::DriverError;
use crate::GlobalArgs;

/// Loads the tool settings and the design description, then resolves the design.
///
/// Nothing is written; every input error surfaces here.
pub fn prepare(
    global: &GlobalArgs,
    design_path: &Path,
) -> Result<(ToolConfig, ResolvedDesign), DriverError> {
    let tool = load_tool_config(&global.config).map_err(|source| DriverError::Load {
        path: global.config.clone(),
        source,
    })?;
    if let Some(version) = &tool.version {
        log::debug!("settings written for Vivado {version}");
    }

    let description = load_design(design_path).map_err(|source| DriverError::Load {
        path: design_path.to_path_buf(),
        source,
    })?;
    let design = resolve_design(description, &tool)?;
    log::info!(
        "design '{}': {} source files, {} IP, {} block design cells",
        design.name,
        design.files.len(),
        design.ips.len(),
        design.cells().len()
    );
    Ok((tool, design))
}
