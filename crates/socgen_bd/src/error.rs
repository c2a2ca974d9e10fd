//! Error types for address allocation and script assembly.

use socgen_common::HexValue;

/// Errors that abort script generation for a design.
///
/// All of these are raised before anything is written to disk.
#[derive(Debug, thiserror::Error)]
pub enum BdError {
    /// A window extends past the end of the 64-bit address space.
    #[error("address window of '{cell}' at {offset} with range {range} overflows the address space")]
    AddressOverflow {
        /// The cell whose window overflowed.
        cell: String,
        /// Base offset of the window.
        offset: HexValue,
        /// Size of the window.
        range: HexValue,
    },

    /// A window overlaps one already assigned in the same master address space.
    #[error(
        "segment {cell}/{segment} at {offset}..={last} overlaps {other} in address space {space}"
    )]
    Overlap {
        /// The cell being assigned.
        cell: String,
        /// Its address segment.
        segment: String,
        /// The master address space both windows live in.
        space: String,
        /// Base offset of the new window.
        offset: HexValue,
        /// Last address inside the new window.
        last: HexValue,
        /// The `cell/segment` already holding the overlapping window.
        other: String,
    },

    /// Every master port of the interconnect is taken.
    #[error("interconnect '{interconnect}' has no free master port (limit {limit})")]
    PortsExhausted {
        /// The interconnect name.
        interconnect: String,
        /// Number of master ports available.
        limit: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_display() {
        let err = BdError::AddressOverflow {
            cell: "ddr".to_string(),
            offset: HexValue::new(0xffff_ffff_ffff_f000),
            range: HexValue::new(0x2000),
        };
        let msg = err.to_string();
        assert!(msg.contains("'ddr'"));
        assert!(msg.contains("0x2000"));
    }

    #[test]
    fn overlap_display() {
        let err = BdError::Overlap {
            cell: "uart".to_string(),
            segment: "s_axi/Reg".to_string(),
            space: "microblaze_0/Data".to_string(),
            offset: HexValue::new(0x1000),
            last: HexValue::new(0x1fff),
            other: "gpio/s_axi/Reg".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "segment uart/s_axi/Reg at 0x1000..=0x1fff overlaps gpio/s_axi/Reg in address space microblaze_0/Data"
        );
    }

    #[test]
    fn ports_exhausted_display() {
        let err = BdError::PortsExhausted {
            interconnect: "periph".to_string(),
            limit: 64,
        };
        assert!(err.to_string().contains("limit 64"));
    }
}
