//! Instance-kind classification of block design cells.

use crate::vlnv::Vlnv;

/// Vendor of the Xilinx-supplied and user-packaged IP libraries.
const XILINX_VENDOR: &str = "xilinx.com";

/// Library that IP packaged from this tool's own projects lands in.
const USER_LIBRARY: &str = "user";

/// User-library cells that are system infrastructure rather than user peripherals.
const RESERVED_USER_CELLS: &[&str] = &["TimeController", "InterruptController"];

/// The role a block design cell plays in interconnect and address decisions.
///
/// Computed once from the cell's [`Vlnv`] when the design is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstanceKind {
    /// An AXI interconnect; wired out-of-band, never attached to itself.
    Interconnect,
    /// A DDR memory controller; wired out-of-band.
    DdrController,
    /// A reserved user-library peripheral (time or interrupt controller).
    SystemPeripheral,
    /// A user-authored IP block.
    UserIp,
    /// Any other vendor IP.
    Generic,
}

impl InstanceKind {
    /// Classifies a VLNV. Checked in order: interconnect, DDR, reserved
    /// user peripheral, user IP, generic.
    pub fn classify(vlnv: &Vlnv) -> Self {
        if vlnv.is(XILINX_VENDOR, "ip", "axi_interconnect") {
            InstanceKind::Interconnect
        } else if vlnv.is(XILINX_VENDOR, "ip", "ddr4") {
            InstanceKind::DdrController
        } else if vlnv.vendor == XILINX_VENDOR && vlnv.library == USER_LIBRARY {
            if RESERVED_USER_CELLS.contains(&vlnv.name.as_str()) {
                InstanceKind::SystemPeripheral
            } else {
                InstanceKind::UserIp
            }
        } else {
            InstanceKind::Generic
        }
    }

    /// Whether a single-master cell of this kind gets a master port on the
    /// main interconnect.
    pub fn attaches_to_interconnect(&self) -> bool {
        !matches!(self, InstanceKind::Interconnect | InstanceKind::DdrController)
    }

    /// Whether the cell is user-authored IP that shows up in the user port report.
    pub fn is_user_authored(&self) -> bool {
        matches!(self, InstanceKind::UserIp)
    }

    /// Whether the cell comes from the user IP library.
    pub fn is_user_library(&self) -> bool {
        matches!(self, InstanceKind::UserIp | InstanceKind::SystemPeripheral)
    }

    /// The address segment mapped when a range names no explicit `address_space`.
    pub fn default_address_segment(&self) -> &'static str {
        match self {
            InstanceKind::UserIp | InstanceKind::SystemPeripheral => "s_axi/reg0",
            InstanceKind::DdrController => "C0_DDR4_MEMORY_MAP/C0_DDR4_ADDRESS_BLOCK",
            InstanceKind::Interconnect | InstanceKind::Generic => "s_axi/Reg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(s: &str) -> InstanceKind {
        InstanceKind::classify(&s.parse().unwrap())
    }

    #[test]
    fn classify_interconnect() {
        assert_eq!(
            kind("xilinx.com:ip:axi_interconnect:2.1"),
            InstanceKind::Interconnect
        );
    }

    #[test]
    fn classify_ddr() {
        assert_eq!(kind("xilinx.com:ip:ddr4:2.2"), InstanceKind::DdrController);
    }

    #[test]
    fn classify_user_ip() {
        assert_eq!(kind("xilinx.com:user:PulseGen:1.0"), InstanceKind::UserIp);
    }

    #[test]
    fn classify_reserved_user_cells() {
        assert_eq!(
            kind("xilinx.com:user:TimeController"),
            InstanceKind::SystemPeripheral
        );
        assert_eq!(
            kind("xilinx.com:user:InterruptController:1.0"),
            InstanceKind::SystemPeripheral
        );
    }

    #[test]
    fn classify_generic() {
        assert_eq!(kind("xilinx.com:ip:axi_gpio:2.0"), InstanceKind::Generic);
        assert_eq!(kind("acme.org:ip:uart:1.0"), InstanceKind::Generic);
        assert_eq!(kind("acme.org:user:uart:1.0"), InstanceKind::Generic);
    }

    #[test]
    fn default_segments() {
        assert_eq!(InstanceKind::UserIp.default_address_segment(), "s_axi/reg0");
        assert_eq!(
            InstanceKind::DdrController.default_address_segment(),
            "C0_DDR4_MEMORY_MAP/C0_DDR4_ADDRESS_BLOCK"
        );
        assert_eq!(InstanceKind::Generic.default_address_segment(), "s_axi/Reg");
    }

    #[test]
    fn interconnect_attachment() {
        assert!(!InstanceKind::Interconnect.attaches_to_interconnect());
        assert!(!InstanceKind::DdrController.attaches_to_interconnect());
        assert!(InstanceKind::SystemPeripheral.attaches_to_interconnect());
        assert!(InstanceKind::Generic.attaches_to_interconnect());
    }

    #[test]
    fn only_user_ip_is_user_authored() {
        assert!(InstanceKind::UserIp.is_user_authored());
        assert!(!InstanceKind::SystemPeripheral.is_user_authored());
        assert!(InstanceKind::SystemPeripheral.is_user_library());
    }
}
