//! Builders for individual Vivado Tcl statements.
//!
//! Each function returns one statement (or a short fixed group) without a
//! trailing newline. Paths are rendered with forward slashes.

use indexmap::IndexMap;
use std::path::Path;

use socgen_config::{tcl_path, BdCell, BdPort, IpDescriptor, ToolConfig};

/// `set project_name` / `set project_dir`, then `create_project`.
pub fn create_project(name: &str, dir: &Path, part: &str) -> Vec<String> {
    vec![
        format!("set project_name \"{name}\""),
        format!("set project_dir \"{}\"", tcl_path(dir)),
        format!("create_project ${{project_name}} ${{project_dir}}/${{project_name}} -part {part}"),
    ]
}

/// Adds one HDL source to the project.
pub fn add_file(path: &Path) -> String {
    format!("add_files -norecurse {{{}}}", tcl_path(path))
}

/// Board repository and board part, or nothing when no board is configured.
pub fn board(tool: &ToolConfig) -> Vec<String> {
    match (&tool.board_name, &tool.board_path) {
        (Some(name), Some(path)) => vec![
            format!("set boardpath {{{}}}", tcl_path(path)),
            "set_param board.repoPaths [list $boardpath]".to_string(),
            format!("set_property BOARD_PART {name} [current_project]"),
        ],
        _ => Vec::new(),
    }
}

/// `CONFIG.*` property list, or `None` when there is nothing to set.
fn config_dict(config: &IndexMap<String, String>) -> Option<String> {
    if config.is_empty() {
        return None;
    }
    let entries: Vec<String> = config
        .iter()
        .map(|(key, value)| format!("CONFIG.{key} {{{value}}}"))
        .collect();
    Some(format!("set_property -dict [list {}]", entries.join(" ")))
}

/// `create_ip` followed by its configuration.
pub fn create_ip(ip: &IpDescriptor) -> Vec<String> {
    let mut create = format!("create_ip -dir {}", tcl_path(&ip.target_dir));
    for (option, value) in ip.options() {
        create.push_str(&format!(" -{option} {value}"));
    }
    let mut out = vec![create];
    if let Some(dict) = config_dict(&ip.config) {
        out.push(format!("{dict} [get_ips {}]", ip.module_name));
    }
    out
}

/// `create_bd_design`.
pub fn create_bd_design(name: &str) -> String {
    format!("create_bd_design \"{name}\"")
}

/// `create_bd_port`, with a bus range when the port has a width.
pub fn create_bd_port(port: &BdPort) -> String {
    let mut out = format!("create_bd_port -dir {}", port.dir.as_tcl());
    if let Some(width) = port.width.filter(|w| *w > 1) {
        out.push_str(&format!(" -from {} -to 0", width - 1));
    }
    if let Some(port_type) = &port.port_type {
        out.push_str(&format!(" -type {port_type}"));
    }
    out.push(' ');
    out.push_str(&port.name);
    out
}

/// `create_bd_cell` followed by its configuration.
///
/// User-library cells are looked up with `get_bd_cells` in the property
/// statement; every other cell goes through the Tcl variable of the same name.
pub fn create_bd_cell(cell: &BdCell) -> Vec<String> {
    let name = &cell.module_name;
    let mut out = vec![format!(
        "set {name} [ create_bd_cell -type ip -vlnv {} {name} ]",
        cell.vlnv
    )];
    if let Some(dict) = config_dict(&cell.config) {
        if cell.kind.is_user_library() {
            out.push(format!("{dict} [get_bd_cells {name}]"));
        } else {
            out.push(format!("{dict} ${name}"));
        }
    }
    out
}

/// Validates and saves the block design, then imports its HDL wrapper.
pub fn finalize_bd(name: &str) -> Vec<String> {
    vec![
        "validate_bd_design".to_string(),
        "save_bd_design".to_string(),
        format!("make_wrapper -files [get_files {name}.bd] -top -import"),
    ]
}

/// Adds the constraints file.
pub fn add_constraints(path: &Path) -> String {
    format!("add_files -fileset constrs_1 -norecurse {}", tcl_path(path))
}

/// Top-level declarations: top name, top file, and the optional override.
pub fn set_top(name: &str, dir: &Path, top_file: &str, top_module: Option<&str>) -> Vec<String> {
    let mut out = vec![
        format!("set_property top {name} [current_fileset]"),
        format!("set_property top_file {{ {}/{top_file} }} [current_fileset]", tcl_path(dir)),
    ];
    if let Some(module) = top_module {
        out.push(format!("set_property top {module} [current_fileset]"));
    }
    out
}

/// Packages the project as user IP and registers the repository.
pub fn package_ip(dir: &Path) -> Vec<String> {
    let dir = tcl_path(dir);
    vec![
        format!("ipx::package_project -root_dir {dir} -vendor xilinx.com -library user -taxonomy /UserIP"),
        "ipx::save_core [ipx::current_core]".to_string(),
        format!("set_property  ip_repo_paths  {dir} [current_project]"),
        "update_ip_catalog".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use socgen_config::PortDirection;
    use std::path::PathBuf;

    #[test]
    fn project_statements() {
        let lines = create_project("soc", Path::new("/out/soc"), "xcku5p-ffvb676-2-e");
        assert_eq!(lines[0], "set project_name \"soc\"");
        assert_eq!(lines[1], "set project_dir \"/out/soc\"");
        assert_eq!(
            lines[2],
            "create_project ${project_name} ${project_dir}/${project_name} -part xcku5p-ffvb676-2-e"
        );
    }

    #[test]
    fn file_is_braced() {
        assert_eq!(add_file(Path::new("/out/soc/soc.v")), "add_files -norecurse {/out/soc/soc.v}");
    }

    #[test]
    fn ip_with_config() {
        let mut config = IndexMap::new();
        config.insert("PRIM_IN_FREQ".to_string(), "125".to_string());
        config.insert("USE_RESET".to_string(), "false".to_string());
        let ip = IpDescriptor {
            module_name: "clk_0".to_string(),
            name: "clk_wiz".to_string(),
            vendor: "xilinx.com".to_string(),
            library: "ip".to_string(),
            version: "6.0".to_string(),
            target_dir: PathBuf::from("/out/soc"),
            config,
        };
        let lines = create_ip(&ip);
        assert_eq!(
            lines[0],
            "create_ip -dir /out/soc -name clk_wiz -vendor xilinx.com -library ip -version 6.0 -module_name clk_0"
        );
        assert_eq!(
            lines[1],
            "set_property -dict [list CONFIG.PRIM_IN_FREQ {125} CONFIG.USE_RESET {false}] [get_ips clk_0]"
        );
    }

    #[test]
    fn ip_without_config_is_one_line() {
        let ip = IpDescriptor {
            module_name: "fifo".to_string(),
            name: "fifo_generator".to_string(),
            vendor: "xilinx.com".to_string(),
            library: "ip".to_string(),
            version: "13.2".to_string(),
            target_dir: PathBuf::from("/out"),
            config: IndexMap::new(),
        };
        assert_eq!(create_ip(&ip).len(), 1);
    }

    #[test]
    fn cell_property_target_depends_on_library() {
        let mut generic = BdCell::new("gpio", "xilinx.com:ip:axi_gpio:2.0".parse().unwrap());
        generic.config.insert("C_GPIO_WIDTH".to_string(), "8".to_string());
        let lines = create_bd_cell(&generic);
        assert_eq!(lines[0], "set gpio [ create_bd_cell -type ip -vlnv xilinx.com:ip:axi_gpio:2.0 gpio ]");
        assert_eq!(lines[1], "set_property -dict [list CONFIG.C_GPIO_WIDTH {8}] $gpio");

        let mut user = BdCell::new("pulse", "xilinx.com:user:PulseGen:1.0".parse().unwrap());
        user.config.insert("WIDTH".to_string(), "4".to_string());
        assert_eq!(
            create_bd_cell(&user)[1],
            "set_property -dict [list CONFIG.WIDTH {4}] [get_bd_cells pulse]"
        );
    }

    #[test]
    fn ports() {
        let clk = BdPort {
            name: "sys_clk".to_string(),
            dir: PortDirection::In,
            port_type: Some("clk".to_string()),
            width: None,
        };
        assert_eq!(create_bd_port(&clk), "create_bd_port -dir I -type clk sys_clk");
        let leds = BdPort {
            name: "leds".to_string(),
            dir: PortDirection::Out,
            port_type: None,
            width: Some(8),
        };
        assert_eq!(create_bd_port(&leds), "create_bd_port -dir O -from 7 -to 0 leds");
    }

    #[test]
    fn top_with_override() {
        let lines = set_top("soc", Path::new("/out/soc"), "soc.v", Some("soc_wrapper"));
        assert_eq!(lines[1], "set_property top_file { /out/soc/soc.v } [current_fileset]");
        assert_eq!(lines[2], "set_property top soc_wrapper [current_fileset]");
        assert_eq!(set_top("soc", Path::new("/out/soc"), "soc.v", None).len(), 2);
    }

    #[test]
    fn packaging() {
        let lines = package_ip(Path::new("/out/soc"));
        assert_eq!(
            lines[0],
            "ipx::package_project -root_dir /out/soc -vendor xilinx.com -library user -taxonomy /UserIP"
        );
        assert_eq!(lines[3], "update_ip_catalog");
    }

    #[test]
    fn finalize() {
        assert_eq!(
            finalize_bd("system")[2],
            "make_wrapper -files [get_files system.bd] -top -import"
        );
    }
}
