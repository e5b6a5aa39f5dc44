//! # Error Types
//!
//! Errors raised while decoding and rendering inspected values.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

use crate::types::Address;

/// Main error type for printer operations
///
/// Every error is local to one printer instance and one render call. None of
/// them should ever reach the host as a crash: lookup errors make the host try
/// the next pattern, and memory errors are shown inline for a single cell.
///
/// ## Error Categories
///
/// 1. **Lookup errors**: PatternMismatch, InvalidDimension
/// 2. **Memory errors**: UnreadableMemory, OffsetOverflow
/// 3. **Registration errors**: InvalidPattern, DuplicateCollection
/// 4. **I/O errors**: Io (loading memory images from disk)
#[derive(Error, Debug)]
pub enum PrinterError
{
    /// The inspected value does not carry a field the matched pattern needs
    ///
    /// This is expected whenever a type-name regex matches a type whose
    /// layout differs from what the printer assumes. The registry reacts by
    /// trying the next matching pattern.
    #[error("Type {type_name} has no {missing}")]
    PatternMismatch
    {
        /// Basic type name of the inspected value
        type_name: String,
        /// Field path or template argument that was not found
        missing: String,
    },

    /// A shape field holds a value that cannot be a dimension
    #[error("Invalid dimension {field} = {value}")]
    InvalidDimension
    {
        /// Field path the value was read from (e.g. `sz.M`)
        field: String,
        /// The raw value
        value: i64,
    },

    /// The memory collaborator could not read an element
    ///
    /// Rendered as an inline error marker for the affected cell only.
    #[error("Cannot access memory at address {address}: {reason}")]
    UnreadableMemory
    {
        /// Address of the first byte that could not be read
        address: Address,
        /// Host-provided description of the failure
        reason: String,
    },

    /// `col + row * stride` does not fit in 64 bits
    #[error("Element offset overflows at [{row}, {col}]")]
    OffsetOverflow
    {
        /// Row of the offending cell
        row: u64,
        /// Column of the offending cell
        col: u64,
    },

    /// A catalog pattern is not a valid regular expression
    #[error("Invalid type pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A collection with this name is already registered in the same scope
    #[error("Pretty-printer collection already registered: {0}")]
    DuplicateCollection(String),

    /// I/O error (loading memory image regions)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrinterError
{
    /// Whether this error means "wrong printer for this value".
    ///
    /// Lookup logs these quietly and moves on to the next pattern. Other
    /// build errors also move lookup on, but are logged as warnings.
    #[must_use]
    pub fn is_mismatch(&self) -> bool
    {
        matches!(self, Self::PatternMismatch { .. } | Self::InvalidDimension { .. })
    }

    pub(crate) fn mismatch(type_name: impl Into<String>, missing: impl Into<String>) -> Self
    {
        Self::PatternMismatch {
            type_name: type_name.into(),
            missing: missing.into(),
        }
    }
}

/// Convenience type alias for `Result<T, PrinterError>`
///
/// ```rust
/// use matlens_core::error::PrinterResult;
/// fn foo() -> PrinterResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type PrinterResult<T> = std::result::Result<T, PrinterError>;
