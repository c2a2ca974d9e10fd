//! Interconnect port and address-space allocation.
//!
//! The [`Allocator`] walks the block design cells in declaration order and, for
//! every cell carrying an AXI descriptor, decides which master port of the main
//! interconnect it attaches to and which window of each master's address space
//! it occupies. One allocator serves exactly one design build: create it,
//! [`reset`](Allocator::reset) it (or call [`allocate_many`](Allocator::allocate_many),
//! which resets first), and drop it afterwards.
//!
//! Rules, per AXI-bearing cell:
//! - Every such cell counts towards [`Allocator::axi_instances`], interconnects
//!   and DDR controllers included.
//! - A single-master cell gets the next free interconnect port unless it is
//!   itself an interconnect or a DDR controller. Only attached cells bump the
//!   port index.
//! - Windows without an explicit offset start at the running offset. After a
//!   single-master cell the running offset advances by its range; after a
//!   multi-master cell it advances by the largest auto-placed range, so cells
//!   whose masters all carry explicit offsets leave it untouched.
//! - Windows never overlap within one master address space. A window may end
//!   at the very top of the 64-bit space, but the running offset cannot move
//!   past it, so only an explicitly placed window can occupy the last page.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use socgen_common::{HexValue, InstanceKind};
use socgen_config::{AddressRange, AddressSpec, BdCell, ToolConfig};

use crate::error::BdError;

/// Number of master ports an AXI interconnect can expose.
pub const MAX_INTERCONNECT_PORTS: u32 = 64;

/// Name of the AXI slave interface every attached cell exposes.
const SLAVE_INTERFACE: &str = "s_axi";

/// A cell's attachment to one master port of the main interconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortAttachment {
    /// The interconnect instance name.
    pub interconnect: String,
    /// The master port index.
    pub index: u32,
    /// The attached cell.
    pub cell: String,
}

impl PortAttachment {
    /// The interconnect port name, e.g. `M03_AXI`.
    pub fn port_name(&self) -> String {
        format!("M{:02}_AXI", self.index)
    }

    /// The interface net name, e.g. `periph_M03_AXI`.
    pub fn net_name(&self) -> String {
        format!("{}_{}", self.interconnect, self.port_name())
    }
}

impl fmt::Display for PortAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "connect_bd_intf_net -intf_net {} [get_bd_intf_pins {}/{SLAVE_INTERFACE}] [get_bd_intf_pins {}/{}]",
            self.net_name(),
            self.cell,
            self.interconnect,
            self.port_name()
        )
    }
}

/// One window of a master's address space mapped onto a cell's address segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAssignment {
    /// The master address space (e.g. `microblaze_0/Data`).
    pub master: String,
    /// The cell owning the segment.
    pub cell: String,
    /// The segment path inside the cell (e.g. `s_axi/Reg`).
    pub segment: String,
    /// Base offset.
    pub offset: HexValue,
    /// Window size.
    pub range: HexValue,
}

impl fmt::Display for AddressAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "assign_bd_address -offset {} -range {} -target_address_space [get_bd_addr_spaces {}] [get_bd_addr_segs {}/{}] -force",
            self.offset,
            self.range.upper(),
            self.master,
            self.cell,
            self.segment
        )
    }
}

/// Everything decided for one AXI-bearing cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The cell's module name.
    pub cell: String,
    /// The cell's kind.
    pub kind: InstanceKind,
    /// Interconnect attachment; `None` for multi-master cells, interconnects, and DDR controllers.
    pub port: Option<PortAttachment>,
    /// Address windows, one per master.
    pub assignments: Vec<AddressAssignment>,
}

/// The result of allocating a whole design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMap {
    /// Per-cell decisions in declaration order. Cells without AXI are absent.
    pub allocations: Vec<Allocation>,
    /// Port index the next attached cell would get.
    pub next_port: u32,
    /// Running offset after the last cell.
    pub next_offset: HexValue,
    /// Number of AXI-bearing cells.
    pub axi_instances: u32,
    /// Ports held by user-authored IP, ascending.
    pub user_ports: Vec<u32>,
}

impl AddressMap {
    /// Looks up the allocation of a cell by module name.
    pub fn get(&self, cell: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.cell == cell)
    }

    /// Interconnect attachments in allocation order.
    pub fn attachments(&self) -> impl Iterator<Item = &PortAttachment> {
        self.allocations.iter().filter_map(|a| a.port.as_ref())
    }

    /// Address assignments in allocation order.
    pub fn assignments(&self) -> impl Iterator<Item = &AddressAssignment> {
        self.allocations.iter().flat_map(|a| a.assignments.iter())
    }
}

/// A window already handed out in some address space.
#[derive(Debug, Clone)]
struct Taken {
    first: u64,
    last: u64,
    owner: String,
}

/// Interconnect and address allocation state for one design build.
#[derive(Debug, Clone)]
pub struct Allocator {
    data_master: String,
    interconnect: String,
    next_port: u32,
    next_offset: HexValue,
    axi_instances: u32,
    user_ports: BTreeSet<u32>,
    spaces: BTreeMap<String, Vec<Taken>>,
}

impl Allocator {
    /// Creates an allocator for the given processor and main interconnect.
    pub fn new(cpu: &str, interconnect: &str) -> Self {
        Self {
            data_master: format!("{cpu}/Data"),
            interconnect: interconnect.to_string(),
            next_port: 0,
            next_offset: HexValue::ZERO,
            axi_instances: 0,
            user_ports: BTreeSet::new(),
            spaces: BTreeMap::new(),
        }
    }

    /// Creates an allocator from the tool settings.
    pub fn from_config(tool: &ToolConfig) -> Self {
        Self::new(&tool.cpu, &tool.axi_interconnect)
    }

    /// Clears all counters and assigned windows.
    pub fn reset(&mut self) {
        self.next_port = 0;
        self.next_offset = HexValue::ZERO;
        self.axi_instances = 0;
        self.user_ports.clear();
        self.spaces.clear();
    }

    /// The master address space single-master cells are mapped into.
    pub fn data_master(&self) -> &str {
        &self.data_master
    }

    /// The interconnect cells attach to.
    pub fn interconnect(&self) -> &str {
        &self.interconnect
    }

    /// Port index the next attached cell will get.
    pub fn next_port(&self) -> u32 {
        self.next_port
    }

    /// Base offset the next auto-placed window will get.
    pub fn next_offset(&self) -> HexValue {
        self.next_offset
    }

    /// Number of AXI-bearing cells seen so far.
    pub fn axi_instances(&self) -> u32 {
        self.axi_instances
    }

    /// Ports held by user-authored IP.
    pub fn user_ports(&self) -> &BTreeSet<u32> {
        &self.user_ports
    }

    /// Resets, then allocates every cell in order.
    pub fn allocate_many(&mut self, cells: &[BdCell]) -> Result<AddressMap, BdError> {
        self.reset();
        let mut allocations = Vec::new();
        for cell in cells {
            if let Some(allocation) = self.allocate(cell)? {
                allocations.push(allocation);
            }
        }
        log::debug!(
            "allocated {} AXI cells on {} ({} ports), {} mapped up to {}",
            self.axi_instances,
            self.interconnect(),
            self.next_port,
            self.data_master(),
            self.next_offset
        );
        if !self.user_ports.is_empty() {
            log::debug!("user IP on interconnect ports {:?}", self.user_ports);
        }
        Ok(AddressMap {
            allocations,
            next_port: self.next_port,
            next_offset: self.next_offset,
            axi_instances: self.axi_instances,
            user_ports: self.user_ports.iter().copied().collect(),
        })
    }

    /// Allocates one cell. Returns `None` for cells without an AXI descriptor.
    pub fn allocate(&mut self, cell: &BdCell) -> Result<Option<Allocation>, BdError> {
        let Some(axi) = &cell.axi else {
            return Ok(None);
        };
        self.axi_instances += 1;
        let base = self.next_offset;

        let (port, assignments, advance) = match axi {
            AddressSpec::Flat(range) => {
                let port = if cell.kind.attaches_to_interconnect() {
                    Some(self.claim_port(cell)?)
                } else {
                    None
                };
                let master = self.data_master.clone();
                let assignment = self.assign(cell, &master, range, base)?;
                (port, vec![assignment], range.range)
            }
            AddressSpec::Multi(masters) => {
                let mut assignments = Vec::with_capacity(masters.len());
                let mut advance = HexValue::ZERO;
                for (master, range) in masters {
                    if range.offset.is_none() {
                        advance = advance.max(range.range);
                    }
                    assignments.push(self.assign(cell, master, range, base)?);
                }
                (None, assignments, advance)
            }
        };

        self.next_offset = base
            .checked_add(advance)
            .ok_or_else(|| BdError::AddressOverflow {
                cell: cell.module_name.clone(),
                offset: base,
                range: advance,
            })?;

        Ok(Some(Allocation {
            cell: cell.module_name.clone(),
            kind: cell.kind,
            port,
            assignments,
        }))
    }

    fn claim_port(&mut self, cell: &BdCell) -> Result<PortAttachment, BdError> {
        if self.next_port >= MAX_INTERCONNECT_PORTS {
            return Err(BdError::PortsExhausted {
                interconnect: self.interconnect.clone(),
                limit: MAX_INTERCONNECT_PORTS,
            });
        }
        let index = self.next_port;
        self.next_port += 1;
        if cell.kind.is_user_authored() {
            self.user_ports.insert(index);
        }
        log::trace!("{} -> {} port {index}", cell.module_name, self.interconnect);
        Ok(PortAttachment {
            interconnect: self.interconnect.clone(),
            index,
            cell: cell.module_name.clone(),
        })
    }

    fn assign(
        &mut self,
        cell: &BdCell,
        master: &str,
        range: &AddressRange,
        base: HexValue,
    ) -> Result<AddressAssignment, BdError> {
        let offset = range.offset.unwrap_or(base);
        // Inclusive; a window may end at the top of the address space.
        let last = offset
            .value()
            .checked_add(range.range.value().saturating_sub(1))
            .map(HexValue::new)
            .ok_or_else(|| BdError::AddressOverflow {
                cell: cell.module_name.clone(),
                offset,
                range: range.range,
            })?;
        let segment = range
            .address_space
            .clone()
            .unwrap_or_else(|| cell.kind.default_address_segment().to_string());

        let taken = self.spaces.entry(master.to_string()).or_default();
        if let Some(other) = taken
            .iter()
            .find(|t| t.first <= last.value() && offset.value() <= t.last)
        {
            return Err(BdError::Overlap {
                cell: cell.module_name.clone(),
                segment,
                space: master.to_string(),
                offset,
                last,
                other: other.owner.clone(),
            });
        }
        taken.push(Taken {
            first: offset.value(),
            last: last.value(),
            owner: format!("{}/{}", cell.module_name, segment),
        });

        Ok(AddressAssignment {
            master: master.to_string(),
            cell: cell.module_name.clone(),
            segment,
            offset,
            range: range.range,
        })
    }
}
