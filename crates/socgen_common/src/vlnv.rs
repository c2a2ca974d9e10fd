//! Vendor:library:name:version identifiers.

use std::fmt;
use std::str::FromStr;

/// A VLNV identifier naming an IP type, such as `xilinx.com:ip:axi_gpio:2.0`.
///
/// The version field is optional; user IP is often referenced as
/// `xilinx.com:user:TimeController` without one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Vlnv {
    /// The vendor (e.g., `xilinx.com`).
    pub vendor: String,
    /// The library (e.g., `ip`, `user`).
    pub library: String,
    /// The IP name (e.g., `axi_gpio`).
    pub name: String,
    /// The optional version (e.g., `2.0`).
    pub version: Option<String>,
}

impl Vlnv {
    /// Returns true if this identifier names `vendor:library:name`, ignoring the version.
    pub fn is(&self, vendor: &str, library: &str, name: &str) -> bool {
        self.vendor == vendor && self.library == library && self.name == name
    }
}

impl fmt::Display for Vlnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.vendor, self.library, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

/// Error type for parsing VLNV strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid VLNV '{input}': expected vendor:library:name[:version]")]
pub struct ParseVlnvError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Vlnv {
    type Err = ParseVlnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(3..=4).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
            return Err(ParseVlnvError {
                input: s.to_string(),
            });
        }
        Ok(Vlnv {
            vendor: parts[0].to_string(),
            library: parts[1].to_string(),
            name: parts[2].to_string(),
            version: parts.get(3).map(|v| v.to_string()),
        })
    }
}
