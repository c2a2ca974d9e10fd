//! `socgen map`: print interconnect attachments and the memory map.

use std::fmt::Write;

use socgen_bd::{assemble, AddressMap};

use crate::pipeline::prepare;
use crate::{DesignArgs, GlobalArgs};

/// Runs the `socgen map` command.
pub fn run(args: &DesignArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (tool, design) = prepare(global, &args.design)?;
    let assembly = assemble(&design, &tool)?;
    print!("{}", render_map(&assembly.address_map));
    Ok(0)
}

/// Renders one row per address window, followed by the allocation summary.
fn render_map(map: &AddressMap) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<16} {:<6} {:<28} {:<40} {:>18} {:>12}",
        "cell", "kind", "port", "master", "segment", "offset", "range"
    );
    for allocation in &map.allocations {
        let port = allocation
            .port
            .as_ref()
            .map(|p| p.port_name())
            .unwrap_or_else(|| "-".to_string());
        let kind = format!("{:?}", allocation.kind);
        for assignment in &allocation.assignments {
            let _ = writeln!(
                out,
                "{:<24} {:<16} {:<6} {:<28} {:<40} {:>18} {:>12}",
                allocation.cell,
                kind,
                port,
                assignment.master,
                assignment.segment,
                assignment.offset.to_string(),
                assignment.range.to_string()
            );
        }
    }
    let user_ports: Vec<String> = map.user_ports.iter().map(u32::to_string).collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "AXI cells:          {}", map.axi_instances);
    let _ = writeln!(out, "interconnect ports: {}", map.next_port);
    let _ = writeln!(out, "next free offset:   {}", map.next_offset);
    let _ = writeln!(
        out,
        "user IP ports:      {}",
        if user_ports.is_empty() {
            "none".to_string()
        } else {
            user_ports.join(", ")
        }
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::fixture;
    use socgen_bd::Allocator;
    use socgen_config::{load_design_from_str, resolve_design};

    #[test]
    fn renders_rows_and_summary() {
        let fx = fixture("");
        let (tool, design) = prepare(&fx.global, &fx.design).unwrap();
        let map = Allocator::from_config(&tool).allocate_many(design.cells()).unwrap();
        let text = render_map(&map);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("cell"));
        assert!(lines[1].starts_with("gpio"));
        assert!(lines[1].contains("M00_AXI"));
        assert!(lines[1].contains("microblaze_0/Data"));
        assert!(lines[2].contains("UserIp"));
        assert!(lines[2].contains("s_axi/reg0"));
        assert!(lines[2].contains("0x1000"));
        assert!(text.contains("next free offset:   0x3000"));
        assert!(text.contains("user IP ports:      1"));
    }

    #[test]
    fn empty_map() {
        let fx = fixture("");
        let (tool, _) = prepare(&fx.global, &fx.design).unwrap();
        let design = resolve_design(
            load_design_from_str(r#"{"verilog": {"name": "a", "top": "a.v"}}"#).unwrap(),
            &tool,
        )
        .unwrap();
        let map = Allocator::from_config(&tool).allocate_many(design.cells()).unwrap();
        let text = render_map(&map);
        assert_eq!(text.lines().count(), 6);
        assert!(text.contains("user IP ports:      none"));
    }

    #[test]
    fn run_prints_map() {
        let fx = fixture("");
        assert_eq!(run(&DesignArgs { design: fx.design.clone() }, &fx.global).unwrap(), 0);
    }
}
