//! Loading and validation of socgen tool configurations and design descriptions.
//!
//! This crate reads the board/tool settings file and the JSON design description,
//! and resolves them into the entity model ([`ResolvedDesign`], [`IpDescriptor`],
//! [`BdCell`]) consumed by the block design generator.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod model;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    load_design, load_design_from_str, load_tool_config, load_tool_config_from_str, ConfigFormat,
};
pub use model::{tcl_path, BdCell, BdPort, BlockDesign, FileCopy, IpDescriptor, ResolvedDesign};
pub use resolve::resolve_design;
pub use types::*;
