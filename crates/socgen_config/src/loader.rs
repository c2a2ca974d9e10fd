//! Tool configuration and design description loading.

use crate::error::ConfigError;
use crate::types::{DesignDescription, ToolConfig};
use std::path::Path;

/// File format of a tool configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON (the default).
    Json,
    /// TOML, selected by a `.toml` extension.
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Loads and validates the board/tool settings file.
pub fn load_tool_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_tool_config_from_str(&content, ConfigFormat::from_path(path))
}

/// Parses and validates tool settings from a string.
pub fn load_tool_config_from_str(
    content: &str,
    format: ConfigFormat,
) -> Result<ToolConfig, ConfigError> {
    let config: ToolConfig = match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
    };
    validate_tool_config(&config)?;
    Ok(config)
}

/// Loads a JSON design description.
pub fn load_design(path: &Path) -> Result<DesignDescription, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_design_from_str(&content)
}

/// Parses a JSON design description from a string.
///
/// Malformed hex values and unknown keys fail here. Checks that span several
/// entries happen in [`resolve_design`](crate::resolve_design).
pub fn load_design_from_str(content: &str) -> Result<DesignDescription, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Validates that required settings are present and consistent.
fn validate_tool_config(config: &ToolConfig) -> Result<(), ConfigError> {
    let required = [
        ("common_path", config.common_path.as_os_str().is_empty()),
        ("target_path", config.target_path.as_os_str().is_empty()),
        ("vivado_path", config.vivado_path.as_os_str().is_empty()),
        ("part_name", config.part_name.is_empty()),
        ("cpu", config.cpu.is_empty()),
        ("axi_interconnect", config.axi_interconnect.is_empty()),
    ];
    if let Some((field, _)) = required.iter().find(|(_, empty)| *empty) {
        return Err(ConfigError::MissingField(field.to_string()));
    }
    if config.board_name.is_some() && config.board_path.is_none() {
        return Err(ConfigError::MissingField("board_path".to_string()));
    }
    if config.tool_timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "tool_timeout_secs must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "common_path": "/work/rtl",
        "target_path": "/work/out",
        "vivado_path": "/tools/Xilinx/Vivado/2023.2/bin/vivado",
        "part_name": "xcku5p-ffvb676-2-e"
    }"#;

    #[test]
    fn parse_minimal_json() {
        let config = load_tool_config_from_str(MINIMAL, ConfigFormat::Json).unwrap();
        assert_eq!(config.part_name, "xcku5p-ffvb676-2-e");
        assert_eq!(config.cpu, "microblaze_0");
        assert_eq!(config.axi_interconnect, "microblaze_0_axi_periph");
        assert!(config.board_name.is_none());
        assert!(config.constraints.is_none());
        assert!(!config.fail_on_tool_error);
        assert!(config.tool_timeout_secs.is_none());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
common_path = "/work/rtl"
target_path = "/work/out"
vivado_path = "vivado"
part_name = "xcku5p-ffvb676-2-e"
board_path = "/work/boards"
board_name = "xilinx.com:kcu116:part0:1.5"
constraints = "/work/xdc/top.xdc"
version = "2023.2"
cpu = "mb"
axi_interconnect = "periph"
fail_on_tool_error = true
tool_timeout_secs = 3600
"#;
        let config = load_tool_config_from_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.board_name.as_deref(), Some("xilinx.com:kcu116:part0:1.5"));
        assert_eq!(config.cpu, "mb");
        assert_eq!(config.axi_interconnect, "periph");
        assert!(config.fail_on_tool_error);
        assert_eq!(config.tool_timeout_secs, Some(3600));
    }

    #[test]
    fn unknown_key_rejected() {
        let json = r#"{
            "common_path": "a", "target_path": "b", "vivado_path": "c",
            "part_name": "d", "CPU": "microblaze_0"
        }"#;
        let err = load_tool_config_from_str(json, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_part_name_errors() {
        let json = r#"{"common_path": "a", "target_path": "b", "vivado_path": "c"}"#;
        let err = load_tool_config_from_str(json, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_part_name_errors() {
        let json = r#"{"common_path": "a", "target_path": "b", "vivado_path": "c", "part_name": ""}"#;
        let err = load_tool_config_from_str(json, ConfigFormat::Json).unwrap_err();
        match err {
            ConfigError::MissingField(field) => assert_eq!(field, "part_name"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn board_without_path_errors() {
        let json = r#"{
            "common_path": "a", "target_path": "b", "vivado_path": "c",
            "part_name": "d", "board_name": "kcu116"
        }"#;
        let err = load_tool_config_from_str(json, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "board_path"));
    }

    #[test]
    fn zero_timeout_errors() {
        let json = r#"{
            "common_path": "a", "target_path": "b", "vivado_path": "c",
            "part_name": "d", "tool_timeout_secs": 0
        }"#;
        let err = load_tool_config_from_str(json, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("cfg.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("cfg.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("cfg")), ConfigFormat::Json);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configuration.json");
        std::fs::write(&path, MINIMAL).unwrap();
        let config = load_tool_config(&path).unwrap();
        assert_eq!(config.common_path, Path::new("/work/rtl"));
    }

    #[test]
    fn io_error_from_missing_file() {
        let err = load_tool_config(Path::new("/nonexistent/configuration.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn design_parse_error() {
        let err = load_design_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn design_with_bad_hex_fails_at_load() {
        let json = r#"{
            "verilog": {"name": "soc", "top": "soc.v"},
            "bd": {"cells": [
                {"module_name": "gpio", "vlnv": "xilinx.com:ip:axi_gpio:2.0",
                 "axi": {"range": "0x1OOO"}}
            ]}
        }"#;
        let err = load_design_from_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(ref m) if m.contains("0x1OOO")));
    }
}
