//! Sequencing a resolved design into one ordered Tcl script.

use socgen_config::{ResolvedDesign, ToolConfig};

use crate::allocator::{AddressMap, Allocator};
use crate::error::BdError;
use crate::script::{Stage, TclScript};
use crate::tcl;
use crate::wiring::connections;

/// A generated script together with the memory map it encodes.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// The staged script.
    pub script: TclScript,
    /// Interconnect and address decisions, empty when there is no block design.
    pub address_map: AddressMap,
}

/// Builds the complete script for one design.
///
/// Allocation runs first with a fresh [`Allocator`], so every error surfaces
/// before any statement is produced. Calling this twice on the same design
/// yields identical output.
pub fn assemble(design: &ResolvedDesign, tool: &ToolConfig) -> Result<Assembly, BdError> {
    let mut allocator = Allocator::from_config(tool);
    let address_map = allocator.allocate_many(design.cells())?;

    let mut script = TclScript::new();
    script.extend(
        Stage::Project,
        tcl::create_project(&design.name, &design.target_dir, &tool.part_name),
    );
    script.extend(Stage::Files, design.files.iter().map(|f| tcl::add_file(f)));
    script.extend(Stage::Board, tcl::board(tool));
    for ip in &design.ips {
        script.extend(Stage::Ips, tcl::create_ip(ip));
    }

    if let Some(bd) = &design.block_design {
        script.push(Stage::BlockDesign, tcl::create_bd_design(&bd.name));
        script.extend(Stage::BlockDesign, bd.ports.iter().map(tcl::create_bd_port));
        for cell in &bd.cells {
            script.extend(Stage::Cells, tcl::create_bd_cell(cell));
            script.extend(
                Stage::Wiring,
                connections(cell).iter().map(ToString::to_string),
            );
        }
        script.extend(
            Stage::Wiring,
            address_map.attachments().map(ToString::to_string),
        );
        script.extend(
            Stage::Addressing,
            address_map.assignments().map(ToString::to_string),
        );
        script.extend(Stage::Finalize, tcl::finalize_bd(&bd.name));
    }

    if let Some(constraints) = &tool.constraints {
        script.push(Stage::Constraints, tcl::add_constraints(constraints));
    }
    script.extend(
        Stage::Top,
        tcl::set_top(
            &design.name,
            &design.target_dir,
            &design.top_file,
            design.top_module.as_deref(),
        ),
    );
    if design.package_ip {
        script.extend(Stage::Package, tcl::package_ip(&design.target_dir));
    }

    log::debug!(
        "assembled {} statements for design '{}'",
        script.len(),
        design.name
    );
    Ok(Assembly {
        script,
        address_map,
    })
}
