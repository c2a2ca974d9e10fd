//! Resolved entity descriptors: the design, its IP instances, and its block design cells.

use indexmap::IndexMap;
use socgen_common::{InstanceKind, Vlnv};
use std::path::{Path, PathBuf};

use crate::types::{AddressSpec, PortDirection};

/// A design ready for script generation.
///
/// Source paths are absolute (or relative to the working directory), already
/// joined onto the common source root. The only mutation after resolution is
/// [`ResolvedDesign::relocate`], which points the sources at their copies in
/// the output directory.
#[derive(Debug, Clone)]
pub struct ResolvedDesign {
    /// Design and project name.
    pub name: String,
    /// HDL source files in declaration order.
    pub files: Vec<PathBuf>,
    /// File name of the top-level HDL file.
    pub top_file: String,
    /// Explicit top module overriding the design name.
    pub top_module: Option<String>,
    /// Output directory for this design.
    pub target_dir: PathBuf,
    /// Path of the generated Tcl script.
    pub script_path: PathBuf,
    /// Whether to package the project as user IP.
    pub package_ip: bool,
    /// Standalone IP instances in declaration order.
    pub ips: Vec<IpDescriptor>,
    /// The block design, if the description has one.
    pub block_design: Option<BlockDesign>,
}

/// A pending copy of one source file into the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCopy {
    /// Original location.
    pub from: PathBuf,
    /// Location inside the output directory.
    pub to: PathBuf,
}

impl ResolvedDesign {
    /// Rewrites every source path to its location inside `target_dir` and
    /// returns the copies the caller must perform.
    pub fn relocate(&mut self) -> Vec<FileCopy> {
        let mut plan = Vec::with_capacity(self.files.len());
        for file in &mut self.files {
            let to = match file.file_name() {
                Some(base) => self.target_dir.join(base),
                None => continue,
            };
            plan.push(FileCopy {
                from: std::mem::replace(file, to.clone()),
                to,
            });
        }
        plan
    }

    /// The block design cells, or an empty slice when there is no block design.
    pub fn cells(&self) -> &[BdCell] {
        self.block_design
            .as_ref()
            .map(|bd| bd.cells.as_slice())
            .unwrap_or(&[])
    }
}

/// A standalone IP instance (`create_ip`).
#[derive(Debug, Clone)]
pub struct IpDescriptor {
    /// Unique module name of the instance.
    pub module_name: String,
    /// IP catalog name.
    pub name: String,
    /// IP vendor.
    pub vendor: String,
    /// IP library.
    pub library: String,
    /// IP version.
    pub version: String,
    /// Directory the IP is generated into.
    pub target_dir: PathBuf,
    /// `CONFIG.*` property values in declaration order.
    pub config: IndexMap<String, String>,
}

impl IpDescriptor {
    /// The named `create_ip` options with their values, in emission order.
    pub fn options(&self) -> [(&'static str, &str); 5] {
        [
            ("name", self.name.as_str()),
            ("vendor", self.vendor.as_str()),
            ("library", self.library.as_str()),
            ("version", self.version.as_str()),
            ("module_name", self.module_name.as_str()),
        ]
    }

    /// Looks up a single option value by name.
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// A block design with its top-level ports and cells.
#[derive(Debug, Clone)]
pub struct BlockDesign {
    /// Block design name.
    pub name: String,
    /// Top-level ports.
    pub ports: Vec<BdPort>,
    /// Cells in declaration order.
    pub cells: Vec<BdCell>,
}

/// A top-level block design port.
#[derive(Debug, Clone)]
pub struct BdPort {
    /// Port name.
    pub name: String,
    /// Direction.
    pub dir: PortDirection,
    /// Optional port type (`clk`, `rst`, ...).
    pub port_type: Option<String>,
    /// Optional bus width.
    pub width: Option<u32>,
}

/// An instantiated IP block in the block design.
#[derive(Debug, Clone)]
pub struct BdCell {
    /// Unique module name.
    pub module_name: String,
    /// IP type.
    pub vlnv: Vlnv,
    /// Role in interconnect and address decisions, derived from `vlnv`.
    pub kind: InstanceKind,
    /// `CONFIG.*` property values.
    pub config: IndexMap<String, String>,
    /// Pin connections: local pin -> target pin path or board port.
    pub ports: IndexMap<String, String>,
    /// Interface connections: local interface -> target interface path or port.
    pub interfaces: IndexMap<String, String>,
    /// AXI slave address descriptor.
    pub axi: Option<AddressSpec>,
}

impl BdCell {
    /// Creates a cell with no configuration, connections, or AXI descriptor.
    pub fn new(module_name: impl Into<String>, vlnv: Vlnv) -> Self {
        let kind = InstanceKind::classify(&vlnv);
        Self {
            module_name: module_name.into(),
            vlnv,
            kind,
            config: IndexMap::new(),
            ports: IndexMap::new(),
            interfaces: IndexMap::new(),
            axi: None,
        }
    }

    /// Sets the AXI descriptor.
    pub fn with_axi(mut self, axi: AddressSpec) -> Self {
        self.axi = Some(axi);
        self
    }

    /// Adds a pin connection.
    pub fn with_port(mut self, pin: impl Into<String>, target: impl Into<String>) -> Self {
        self.ports.insert(pin.into(), target.into());
        self
    }

    /// Adds an interface connection.
    pub fn with_interface(mut self, intf: impl Into<String>, target: impl Into<String>) -> Self {
        self.interfaces.insert(intf.into(), target.into());
        self
    }
}

/// Renders a path the way Tcl expects it, with forward slashes.
pub fn tcl_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
