//! # Target Trait
//!
//! The interface to the host debugger's value API.
//!
//! Printers never read target memory or evaluate expressions themselves. The
//! host (a debugger attached to a live process, or a core-dump reader) hands
//! out typed values and implements the few primitives this crate needs:
//!
//! - named field access on a value
//! - template arguments of a value's type
//! - reading a value as a plain integer
//! - reinterpreting a value as a pointer to a chosen element type
//! - pointer arithmetic plus dereference, yielding the element's native text
//!
//! ## Why use a trait?
//!
//! The layout math is a pure function of (pointer, shape). Keeping the host
//! behind a trait lets that math run against a recorded memory image in
//! tests, or against any debugger that can implement these six methods.

use crate::error::PrinterResult;
use crate::types::{ElementPointer, ElementValue};

/// Host value API
///
/// `Value` is the host's typed value handle (a field, a pointer, a struct).
/// `Type` is the host's handle for an element type, used to cast pointers.
///
/// All methods take `&self`: printers only ever read from the target.
pub trait Target
{
    /// Typed value handle
    type Value;

    /// Element type handle
    type Type: Clone;

    /// Decorated type name of `value`, as the host would print it
    ///
    /// For example `LinAlg::Array<double, LinAlg::DenseDims>`.
    fn type_name(&self, value: &Self::Value) -> String;

    /// Named field of a structure value
    ///
    /// Returns `None` if the value has no such field. That is expected when a
    /// type pattern matched a value with a different layout.
    fn field(&self, value: &Self::Value, name: &str) -> Option<Self::Value>;

    /// Template argument `index` of the value's type, if it is a type
    fn template_argument(&self, value: &Self::Value, index: usize) -> Option<Self::Type>;

    /// The value converted to a plain 64-bit integer
    ///
    /// Returns `None` if the value is not integral (or does not fit).
    fn to_i64(&self, value: &Self::Value) -> Option<i64>;

    /// Reinterpret `value` as a pointer to `element_type`
    ///
    /// Must not dereference anything. Returns `None` if the value is not
    /// pointer-like.
    fn cast_pointer(&self, value: &Self::Value, element_type: &Self::Type) -> Option<ElementPointer<Self::Type>>;

    /// Dereference `pointer + offset`, where `offset` counts elements
    ///
    /// ## Errors
    ///
    /// - `UnreadableMemory`: the computed address is not mapped in the target
    /// - `OffsetOverflow`: the scaled offset does not fit in the address space
    fn read_element(&self, pointer: &ElementPointer<Self::Type>, offset: u64) -> PrinterResult<ElementValue>;
}
