//! `socgen build`: generate the script, prepare the output directory, and run Vivado.
//!
//! Every fallible decision (loading, resolution, allocation) happens before the
//! output directory is touched, so a bad design never leaves a half-written
//! script behind.

use std::time::Duration;

use socgen_bd::assemble;

use crate::pipeline::prepare;
use crate::vivado::{ToolCommand, ToolOutcome};
use crate::workspace;
use crate::{BuildArgs, GlobalArgs};

/// Runs the `socgen build` command.
///
/// Returns exit code 0 on success. A failed or hung Vivado run returns 1 only
/// when the settings enable `fail_on_tool_error`.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (tool, mut design) = prepare(global, &args.design)?;
    let plan = design.relocate();
    let assembly = assemble(&design, &tool)?;
    log::info!(
        "{} AXI cells on {} interconnect ports, address map ends at {}",
        assembly.address_map.axi_instances,
        assembly.address_map.next_port,
        assembly.address_map.next_offset
    );

    workspace::ensure_clean_dir(&design.target_dir)?;
    workspace::copy_files(&plan)?;
    workspace::write_script(&design.script_path, &assembly.script.render())?;

    if args.no_run {
        log::info!("skipping Vivado (--no-run)");
        return Ok(0);
    }

    let outcome = ToolCommand::vivado(&tool.vivado_path, &design.script_path)
        .timeout(tool.tool_timeout_secs.map(Duration::from_secs))
        .run()?;

    if !args.keep_artifacts {
        let cwd = std::env::current_dir()?;
        workspace::delete_dump(&cwd);
    }

    Ok(exit_code(outcome, tool.fail_on_tool_error))
}

/// Logs the tool outcome and maps it to the process exit code.
fn exit_code(outcome: ToolOutcome, fail_on_tool_error: bool) -> i32 {
    match outcome {
        ToolOutcome::Success => {
            log::info!("Vivado finished normally");
            return 0;
        }
        ToolOutcome::Failed(Some(code)) => log::error!("Vivado exited with status {code}"),
        ToolOutcome::Failed(None) => log::error!("Vivado was terminated by a signal"),
        ToolOutcome::TimedOut(after) => {
            log::error!("Vivado hung and was killed after {}s", after.as_secs())
        }
    }
    if fail_on_tool_error {
        1
    } else {
        0
    }
}
