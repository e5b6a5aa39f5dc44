//! # Printers
//!
//! The objects handed to the host for each matched value: a summary string,
//! an optional lazy sequence of children, and a display hint.

use std::fmt;

use crate::error::{PrinterError, PrinterResult};
use crate::resolver::{self, LayoutRule, ResolvedLayout};
use crate::target::Target;
use crate::types::ShapeDescriptor;
use crate::walker::{self, ElementWalker};

/// How the host should lay out a printer's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayHint
{
    /// Children form an indexed array
    Array,
}

impl DisplayHint
{
    /// The hint token the host understands
    #[must_use]
    pub fn as_str(self) -> &'static str
    {
        match self {
            DisplayHint::Array => "array",
        }
    }
}

impl fmt::Display for DisplayHint
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

/// Printer for one inspected value
pub enum Printer<'t, T: Target>
{
    /// Vector or matrix
    Array(ArrayPrinter<'t, T>),
    /// Strong integer passed through as a plain integer
    Scalar(ScalarPrinter),
}

impl<'t, T: Target> Printer<'t, T>
{
    /// Summary line(s) shown before any children
    pub fn summary(&self) -> String
    {
        match self {
            Printer::Array(printer) => printer.summary(),
            Printer::Scalar(printer) => printer.summary(),
        }
    }

    /// Fresh walk over the children, or `None` for scalars
    pub fn children(&self) -> Option<ElementWalker<'t, T>>
    {
        match self {
            Printer::Array(printer) => Some(printer.children()),
            Printer::Scalar(_) => None,
        }
    }

    /// Display hint for the host
    pub fn display_hint(&self) -> Option<DisplayHint>
    {
        match self {
            Printer::Array(_) => Some(DisplayHint::Array),
            Printer::Scalar(_) => None,
        }
    }
}

/// Printer for vectors and matrices
pub struct ArrayPrinter<'t, T: Target>
{
    target: &'t T,
    layout: ResolvedLayout<T::Type>,
}

impl<'t, T: Target> ArrayPrinter<'t, T>
{
    /// Resolve `value` with `rule` and build a printer over it
    ///
    /// ## Errors
    ///
    /// Whatever [`resolver::resolve`] reports; a mismatch means another
    /// printer should be tried.
    pub fn new(target: &'t T, value: &T::Value, rule: LayoutRule) -> PrinterResult<Self>
    {
        Ok(Self::from_layout(target, resolver::resolve(target, value, rule)?))
    }

    /// Build a printer over an already resolved layout
    pub fn from_layout(target: &'t T, layout: ResolvedLayout<T::Type>) -> Self
    {
        Self { target, layout }
    }

    /// Shape of the array
    pub fn shape(&self) -> &ShapeDescriptor
    {
        &self.layout.shape
    }

    /// Summary header, e.g. `Matrix, 2 x 3:\n`
    pub fn summary(&self) -> String
    {
        walker::summary(&self.layout.shape)
    }

    /// A new walker starting before the first cell
    ///
    /// Walkers are single-pass; call this again to render a second time.
    pub fn children(&self) -> ElementWalker<'t, T>
    {
        walker::walk(self.target, self.layout.clone())
    }
}

/// Field holding the integer inside a strong integer struct
pub const WRAPPED_VALUE_FIELD: &str = "value";

/// Printer for strong integer wrappers
///
/// The wrapped value is read as a plain 64-bit integer and stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarPrinter
{
    value: i64,
}

impl ScalarPrinter
{
    /// Read `value` as an integer
    ///
    /// Hosts that expose the wrapper as a struct get it read through its
    /// `value` field instead.
    ///
    /// ## Errors
    ///
    /// `PatternMismatch` if neither the value nor its `value` field reads as
    /// an integer.
    pub fn new<T: Target>(target: &T, value: &T::Value) -> PrinterResult<Self>
    {
        let raw = target
            .to_i64(value)
            .or_else(|| {
                target
                    .field(value, WRAPPED_VALUE_FIELD)
                    .and_then(|inner| target.to_i64(&inner))
            })
            .ok_or_else(|| {
                PrinterError::mismatch(
                    target.type_name(value),
                    format!("integer representation or integer field {WRAPPED_VALUE_FIELD}"),
                )
            })?;
        Ok(Self { value: raw })
    }

    /// The integer value
    pub fn value(&self) -> i64
    {
        self.value
    }

    /// The integer as text
    pub fn summary(&self) -> String
    {
        self.value.to_string()
    }
}
