//! Block design script generation.
//!
//! This crate turns a [`ResolvedDesign`](socgen_config::ResolvedDesign) into an
//! ordered Vivado Tcl script. The [`Allocator`] decides interconnect ports and
//! the memory map, the [`wiring`] module emits point-to-point connections, and
//! [`assemble`] sequences everything into a [`TclScript`].

#![warn(missing_docs)]

pub mod allocator;
pub mod assembler;
pub mod error;
pub mod script;
pub mod tcl;
pub mod wiring;

pub use allocator::{
    AddressAssignment, AddressMap, Allocation, Allocator, PortAttachment, MAX_INTERCONNECT_PORTS,
};
pub use assembler::{assemble, Assembly};
pub use error::BdError;
pub use script::{Stage, TclScript};
pub use wiring::{connections, Connection, Endpoint};
