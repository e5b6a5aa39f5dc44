//! # matlens-core
//!
//! Debugger pretty-printers for linear-algebra arrays and matrices.
//!
//! Given a typed value from an inspected process whose type is a 1-D array or
//! one of the square, dense, or strided matrix layouts, this crate decodes
//! its fields without running any target code and produces an indexable text
//! rendering:
//!
//! - [`resolver`] reads the base pointer and shape out of the value
//! - [`walker`] lazily walks the cells in row-major order and formats them
//! - [`printer`] packages both into the summary/children/display-hint object a
//!   debugger consumes
//! - [`catalog`] and [`registry`] pick the printer for a value by matching its
//!   type name
//!
//! The debugger itself stays behind the [`Target`] trait. [`snapshot`]
//! implements it over a recorded memory image.

pub mod catalog;
pub mod error;
pub mod printer;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod snapshot;
pub mod target;
pub mod typename;
pub mod types;
pub mod walker;

// Re-export commonly used types
pub use catalog::{default_collection, PrinterCollection, PrinterKind};
pub use error::{PrinterError, PrinterResult};
pub use printer::{DisplayHint, Printer};
pub use render::{render, RenderOptions};
pub use target::Target;
pub use types::{Address, ElementPointer, RenderedCell, ShapeDescriptor};
