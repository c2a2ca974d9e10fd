//! Configuration types deserialized from the tool settings file and the design description.

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use socgen_common::HexValue;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Board and tool settings shared by every design built in one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Root directory that design source file paths are relative to.
    pub common_path: PathBuf,
    /// Root directory under which each design gets its own output directory.
    pub target_path: PathBuf,
    /// Path to the Vivado executable.
    pub vivado_path: PathBuf,
    /// Target part identifier (e.g., `xcku5p-ffvb676-2-e`).
    pub part_name: String,
    /// Board support repository path, required when `board_name` is set.
    #[serde(default)]
    pub board_path: Option<PathBuf>,
    /// Board part identifier; the board step is skipped when absent.
    #[serde(default)]
    pub board_name: Option<String>,
    /// Constraints file added to `constrs_1`; skipped when absent.
    #[serde(default)]
    pub constraints: Option<PathBuf>,
    /// Vivado version the settings were written for. Informational only.
    #[serde(default)]
    pub version: Option<String>,
    /// Block design name of the processor whose `Data` master maps single-master cells.
    #[serde(default = "default_cpu")]
    pub cpu: String,
    /// Block design name of the main AXI interconnect.
    #[serde(default = "default_interconnect")]
    pub axi_interconnect: String,
    /// Whether a non-zero Vivado exit status fails the run.
    #[serde(default)]
    pub fail_on_tool_error: bool,
    /// Seconds to wait for Vivado before killing it. Waits indefinitely when absent.
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
}

fn default_cpu() -> String {
    "microblaze_0".to_string()
}

fn default_interconnect() -> String {
    "microblaze_0_axi_periph".to_string()
}

/// A complete design description: HDL sources, standalone IP, and an optional block design.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignDescription {
    /// Project name, sources, and top-level settings.
    pub verilog: VerilogSection,
    /// Standalone IP instances keyed by module name, in declaration order.
    #[serde(default, deserialize_with = "deserialize_unique_map")]
    pub ip: IndexMap<String, IpSpec>,
    /// Block design cells, ports, and address map.
    #[serde(default)]
    pub bd: Option<BlockDesignSpec>,
}

/// The `verilog` section of a design description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerilogSection {
    /// Design name; also the project name and output directory name.
    pub name: String,
    /// Source files relative to the common source root.
    #[serde(default)]
    pub files: Vec<String>,
    /// File name of the top-level HDL file.
    pub top: String,
    /// Explicit top module, overriding the design name.
    #[serde(default)]
    pub top_module_name: Option<String>,
    /// Whether to package the finished project as user IP.
    #[serde(default = "default_true", deserialize_with = "deserialize_bool_or_string")]
    pub gen_ip: bool,
}

fn default_true() -> bool {
    true
}

/// A standalone IP instance created with `create_ip`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IpSpec {
    /// IP name in the catalog (e.g., `clk_wiz`).
    pub name: String,
    /// IP vendor (e.g., `xilinx.com`).
    pub vendor: String,
    /// IP library.
    #[serde(default = "default_ip_library")]
    pub library: String,
    /// IP version (e.g., `6.0`).
    pub version: String,
    /// `CONFIG.*` property values.
    #[serde(default, deserialize_with = "deserialize_unique_map")]
    pub config: IndexMap<String, ConfigValue>,
}

fn default_ip_library() -> String {
    "ip".to_string()
}

/// The `bd` section: one block design.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockDesignSpec {
    /// Block design name.
    #[serde(default = "default_bd_name")]
    pub name: String,
    /// Top-level block design ports.
    #[serde(default)]
    pub ports: Vec<BdPortSpec>,
    /// Cells in declaration order; addresses are allocated in this order.
    #[serde(default)]
    pub cells: Vec<BdCellSpec>,
}

fn default_bd_name() -> String {
    "design_1".to_string()
}

/// A top-level block design port.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BdPortSpec {
    /// Port name.
    pub name: String,
    /// Port direction.
    pub dir: PortDirection,
    /// Port type (e.g., `clk`, `rst`, `data`).
    #[serde(default, rename = "type")]
    pub port_type: Option<String>,
    /// Bus width; scalar when absent.
    #[serde(default)]
    pub width: Option<u32>,
}

/// Direction of a block design port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Input.
    In,
    /// Output.
    Out,
    /// Bidirectional.
    Inout,
}

impl PortDirection {
    /// The `-dir` argument Vivado expects.
    pub fn as_tcl(&self) -> &'static str {
        match self {
            PortDirection::In => "I",
            PortDirection::Out => "O",
            PortDirection::Inout => "IO",
        }
    }
}

/// A block design cell as written in the design description.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BdCellSpec {
    /// Unique module name of the cell.
    pub module_name: String,
    /// VLNV of the IP type.
    pub vlnv: String,
    /// `CONFIG.*` property values.
    #[serde(default, deserialize_with = "deserialize_unique_map")]
    pub config: IndexMap<String, ConfigValue>,
    /// Pin connections: local pin name -> target pin path or board port name.
    #[serde(default, deserialize_with = "deserialize_unique_map")]
    pub ports: IndexMap<String, String>,
    /// Interface connections: local interface name -> target interface path.
    #[serde(default, deserialize_with = "deserialize_unique_map")]
    pub interface: IndexMap<String, String>,
    /// AXI slave address descriptor.
    #[serde(default)]
    pub axi: Option<AddressSpec>,
}

/// One address window requested by a cell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressRange {
    /// Size of the window.
    pub range: HexValue,
    /// Fixed base offset; allocated from the running offset when absent.
    #[serde(default)]
    pub offset: Option<HexValue>,
    /// Target address segment; defaults by instance kind when absent.
    #[serde(default)]
    pub address_space: Option<String>,
}

/// The AXI descriptor of a cell.
///
/// The variant is decided by shape when the descriptor is parsed: if any value
/// is itself a mapping the cell declares several masters, each keyed by its
/// master address space (e.g. `microblaze_0/Data`). Otherwise the descriptor is
/// a single range bound to the configured CPU's `Data` master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    /// One range seen by the default data master.
    Flat(AddressRange),
    /// Ranges keyed by master address space, in declaration order.
    Multi(IndexMap<String, AddressRange>),
}

impl AddressSpec {
    /// Builds the tagged descriptor from raw entries.
    pub fn from_entries(entries: IndexMap<String, Value>) -> Result<Self, String> {
        if !entries.values().any(Value::is_object) {
            let object: serde_json::Map<String, Value> = entries.into_iter().collect();
            return serde_json::from_value(Value::Object(object))
                .map(AddressSpec::Flat)
                .map_err(|e| e.to_string());
        }

        let mut masters = IndexMap::new();
        for (master, value) in entries {
            if !value.is_object() {
                log::warn!("ignoring non-mapping key '{master}' in multi-master AXI descriptor");
                continue;
            }
            let range: AddressRange =
                serde_json::from_value(value).map_err(|e| format!("master '{master}': {e}"))?;
            masters.insert(master, range);
        }
        Ok(AddressSpec::Multi(masters))
    }

    /// Iterates over every range, with its explicit master for multi-master descriptors.
    pub fn ranges(&self) -> Vec<(Option<&str>, &AddressRange)> {
        match self {
            AddressSpec::Flat(range) => vec![(None, range)],
            AddressSpec::Multi(masters) => masters
                .iter()
                .map(|(master, range)| (Some(master.as_str()), range))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for AddressSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = deserialize_unique_map::<_, Value>(deserializer)?;
        AddressSpec::from_entries(entries).map_err(de::Error::custom)
    }
}

/// A `CONFIG.*` property value; strings, numbers, and booleans are all emitted as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue(pub String);

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = ConfigValue;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a string, number, or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ConfigValue(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ConfigValue(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ConfigValue(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ConfigValue(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ConfigValue(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Deserializes a flag written either as a boolean or as `"True"`/`"False"`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolOrString;

    impl Visitor<'_> for BoolOrString {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a boolean or \"True\"/\"False\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            match v {
                "True" | "true" => Ok(true),
                "False" | "false" => Ok(false),
                _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
            }
        }
    }

    deserializer.deserialize_any(BoolOrString)
}

/// Deserializes an ordered map, rejecting repeated keys instead of keeping the last one.
fn deserialize_unique_map<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueMap<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMap<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = IndexMap::new();
            while let Some(key) = map.next_key::<String>()? {
                if out.contains_key(&key) {
                    return Err(de::Error::custom(format!("duplicate key '{key}'")));
                }
                let value = map.next_value::<V>()?;
                out.insert(key, value);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(UniqueMap(PhantomData))
}
