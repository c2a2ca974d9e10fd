//! Design resolution: turning a design description into the entity model.

use indexmap::IndexMap;
use socgen_common::{InstanceKind, Vlnv};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::{BdCell, BdPort, BlockDesign, IpDescriptor, ResolvedDesign};
use crate::types::{AddressSpec, BdCellSpec, ConfigValue, DesignDescription, ToolConfig};

/// Resolves a design description against the tool settings.
///
/// Source files are joined onto `common_path`, the output directory becomes
/// `target_path/<name>`, VLNVs are parsed and classified, and module names are
/// checked for uniqueness across standalone IP and block design cells.
pub fn resolve_design(
    desc: DesignDescription,
    tool: &ToolConfig,
) -> Result<ResolvedDesign, ConfigError> {
    let verilog = desc.verilog;
    if verilog.name.is_empty() {
        return Err(ConfigError::MissingField("verilog.name".to_string()));
    }
    if verilog.top.is_empty() {
        return Err(ConfigError::MissingField("verilog.top".to_string()));
    }

    let target_dir = normalize(&tool.target_path.join(&verilog.name));
    let script_path = target_dir.join(format!("{}.tcl", verilog.name));

    let files: Vec<PathBuf> = verilog
        .files
        .iter()
        .map(|f| normalize(&tool.common_path.join(f)))
        .collect();
    check_file_names(&files)?;

    let mut names = HashSet::new();

    let mut ips = Vec::with_capacity(desc.ip.len());
    for (module_name, spec) in desc.ip {
        for (field, value) in [
            ("name", &spec.name),
            ("vendor", &spec.vendor),
            ("version", &spec.version),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField(format!("ip.{module_name}.{field}")));
            }
        }
        claim_name(&mut names, &module_name)?;
        ips.push(IpDescriptor {
            name: spec.name,
            vendor: spec.vendor,
            library: spec.library,
            version: spec.version,
            target_dir: target_dir.clone(),
            config: render_config(spec.config),
            module_name,
        });
    }

    let block_design = match desc.bd {
        Some(bd) => {
            let mut cells = Vec::with_capacity(bd.cells.len());
            for spec in bd.cells {
                claim_name(&mut names, &spec.module_name)?;
                cells.push(resolve_cell(spec)?);
            }
            let ports = bd
                .ports
                .into_iter()
                .map(|p| BdPort {
                    name: p.name,
                    dir: p.dir,
                    port_type: p.port_type,
                    width: p.width,
                })
                .collect();
            Some(BlockDesign {
                name: bd.name,
                ports,
                cells,
            })
        }
        None => None,
    };

    let top_module = verilog.top_module_name.filter(|m| !m.is_empty());

    Ok(ResolvedDesign {
        name: verilog.name,
        files,
        top_file: verilog.top,
        top_module,
        target_dir,
        script_path,
        package_ip: verilog.gen_ip,
        ips,
        block_design,
    })
}

/// Parses, classifies, and validates one block design cell.
fn resolve_cell(spec: BdCellSpec) -> Result<BdCell, ConfigError> {
    if spec.module_name.is_empty() {
        return Err(ConfigError::MissingField("bd.cells.module_name".to_string()));
    }
    let vlnv: Vlnv = spec.vlnv.parse().map_err(|source| ConfigError::InvalidVlnv {
        cell: spec.module_name.clone(),
        source,
    })?;
    if let Some(axi) = &spec.axi {
        check_ranges(&spec.module_name, axi)?;
    }
    let kind = InstanceKind::classify(&vlnv);
    Ok(BdCell {
        module_name: spec.module_name,
        vlnv,
        kind,
        config: render_config(spec.config),
        ports: spec.ports,
        interfaces: spec.interface,
        axi: spec.axi,
    })
}

/// Rejects zero-sized windows and multi-master descriptors with no masters.
fn check_ranges(cell: &str, axi: &AddressSpec) -> Result<(), ConfigError> {
    let ranges = axi.ranges();
    if ranges.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "cell '{cell}': AXI descriptor declares no address ranges"
        )));
    }
    for (master, range) in ranges {
        if range.range.value() == 0 {
            let at = master.map(|m| format!(" for master '{m}'")).unwrap_or_default();
            return Err(ConfigError::ValidationError(format!(
                "cell '{cell}': zero address range{at}"
            )));
        }
    }
    Ok(())
}

fn claim_name(names: &mut HashSet<String>, name: &str) -> Result<(), ConfigError> {
    if !names.insert(name.to_string()) {
        return Err(ConfigError::DuplicateInstance(name.to_string()));
    }
    Ok(())
}

/// Sources are copied flat into the output directory, so base names must be distinct.
fn check_file_names(files: &[PathBuf]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for file in files {
        let base = file
            .file_name()
            .ok_or_else(|| {
                ConfigError::ValidationError(format!("'{}' is not a file path", file.display()))
            })?
            .to_string_lossy()
            .into_owned();
        if !seen.insert(base.clone()) {
            return Err(ConfigError::DuplicateFileName(base));
        }
    }
    Ok(())
}

fn render_config(config: IndexMap<String, ConfigValue>) -> IndexMap<String, String> {
    config.into_iter().map(|(k, v)| (k, v.0)).collect()
}

fn normalize(path: &Path) -> PathBuf {
    PathBuf::from(crate::model::tcl_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_design_from_str, load_tool_config_from_str, ConfigFormat};

    fn tool() -> ToolConfig {
        load_tool_config_from_str(
            r#"{
                "common_path": "/work/rtl",
                "target_path": "/work/out",
                "vivado_path": "vivado",
                "part_name": "xcku5p-ffvb676-2-e"
            }"#,
            ConfigFormat::Json,
        )
        .unwrap()
    }

    fn resolve(json: &str) -> Result<ResolvedDesign, ConfigError> {
        resolve_design(load_design_from_str(json).unwrap(), &tool())
    }

    const SOC: &str = r#"{
        "verilog": {
            "name": "soc",
            "files": ["top/soc.v", "lib/fifo.v"],
            "top": "soc.v",
            "top_module_name": "soc_wrapper",
            "gen_ip": "True"
        },
        "ip": {
            "clk_gen": {"name": "clk_wiz", "vendor": "xilinx.com", "version": "6.0",
                        "config": {"CLKOUT1_REQUESTED_OUT_FREQ": 100}}
        },
        "bd": {
            "name": "system",
            "ports": [{"name": "sys_clk", "dir": "in", "type": "clk"}],
            "cells": [
                {"module_name": "gpio", "vlnv": "xilinx.com:ip:axi_gpio:2.0",
                 "config": {"C_GPIO_WIDTH": 8},
                 "ports": {"s_axi_aclk": "sys_clk"},
                 "axi": {"range": "0x1000"}},
                {"module_name": "pulse", "vlnv": "xilinx.com:user:PulseGen:1.0",
                 "axi": {"range": "0x2000"}}
            ]
        }
    }"#;

    #[test]
    fn resolve_full_design() {
        let d = resolve(SOC).unwrap();
        assert_eq!(d.name, "soc");
        assert_eq!(
            d.files,
            vec![PathBuf::from("/work/rtl/top/soc.v"), PathBuf::from("/work/rtl/lib/fifo.v")]
        );
        assert_eq!(d.target_dir, PathBuf::from("/work/out/soc"));
        assert_eq!(d.script_path, PathBuf::from("/work/out/soc/soc.tcl"));
        assert_eq!(d.top_module.as_deref(), Some("soc_wrapper"));
        assert!(d.package_ip);

        assert_eq!(d.ips.len(), 1);
        assert_eq!(d.ips[0].module_name, "clk_gen");
        assert_eq!(d.ips[0].library, "ip");
        assert_eq!(d.ips[0].config["CLKOUT1_REQUESTED_OUT_FREQ"], "100");

        let bd = d.block_design.as_ref().unwrap();
        assert_eq!(bd.name, "system");
        assert_eq!(bd.ports.len(), 1);
        assert_eq!(bd.cells[0].kind, InstanceKind::Generic);
        assert_eq!(bd.cells[1].kind, InstanceKind::UserIp);
        assert_eq!(bd.cells[0].ports["s_axi_aclk"], "sys_clk");
    }

    #[test]
    fn empty_top_module_is_none() {
        let d = resolve(r#"{"verilog": {"name": "a", "top": "a.v", "top_module_name": ""}}"#)
            .unwrap();
        assert!(d.top_module.is_none());
        assert!(d.block_design.is_none());
    }

    #[test]
    fn duplicate_cell_names_rejected() {
        let err = resolve(
            r#"{"verilog": {"name": "a", "top": "a.v"},
                "bd": {"cells": [
                    {"module_name": "gpio", "vlnv": "xilinx.com:ip:axi_gpio:2.0"},
                    {"module_name": "gpio", "vlnv": "xilinx.com:ip:axi_gpio:2.0"}
                ]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateInstance(ref n) if n == "gpio"));
    }

    #[test]
    fn ip_and_cell_name_clash_rejected() {
        let err = resolve(
            r#"{"verilog": {"name": "a", "top": "a.v"},
                "ip": {"gpio": {"name": "axi_gpio", "vendor": "xilinx.com", "version": "2.0"}},
                "bd": {"cells": [{"module_name": "gpio", "vlnv": "xilinx.com:ip:axi_gpio:2.0"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateInstance(_)));
    }

    #[test]
    fn invalid_vlnv_rejected() {
        let err = resolve(
            r#"{"verilog": {"name": "a", "top": "a.v"},
                "bd": {"cells": [{"module_name": "gpio", "vlnv": "axi_gpio"}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVlnv { ref cell, .. } if cell == "gpio"));
    }

    #[test]
    fn zero_range_rejected() {
        let err = resolve(
            r#"{"verilog": {"name": "a", "top": "a.v"},
                "bd": {"cells": [{"module_name": "gpio", "vlnv": "xilinx.com:ip:axi_gpio:2.0",
                                  "axi": {"range": "0x0"}}]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn duplicate_file_basenames_rejected() {
        let err = resolve(
            r#"{"verilog": {"name": "a", "top": "a.v", "files": ["x/a.v", "y/a.v"]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateFileName(ref n) if n == "a.v"));
    }

    #[test]
    fn empty_ip_version_rejected() {
        let err = resolve(
            r#"{"verilog": {"name": "a", "top": "a.v"},
                "ip": {"clk": {"name": "clk_wiz", "vendor": "xilinx.com", "version": ""}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "ip.clk.version"));
    }

    #[test]
    fn empty_name_rejected() {
        let err = resolve(r#"{"verilog": {"name": "", "top": "a.v"}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }
}
