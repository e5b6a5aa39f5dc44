//! # Types
//!
//! Host-agnostic types shared by the resolver, the walker and the printers.
//!
//! Everything here describes memory that belongs to the inspected process.
//! The types carry addresses and shapes, never the target data itself.

pub mod address;
pub mod cell;
pub mod layout;
pub mod region;

// Re-export all public types
pub use address::Address;
pub use cell::{ElementValue, IndexLabel, RenderedCell};
pub use layout::{ElementPointer, ShapeDescriptor, ShapeKind};
pub use region::MemoryRegion;
