//! Shared value types used across the socgen workspace.
//!
//! This crate provides hexadecimal address values, VLNV identifiers, and the
//! instance-kind classification that drives interconnect and address decisions.

#![warn(missing_docs)]

pub mod hex;
pub mod kind;
pub mod vlnv;

pub use hex::{HexValue, ParseHexError};
pub use kind::InstanceKind;
pub use vlnv::{ParseVlnvError, Vlnv};
