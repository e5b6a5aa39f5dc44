//! # Pattern Catalog
//!
//! Data-driven dispatch from decorated type names to printers.
//!
//! A [`PrinterCollection`] is an ordered list of (name, regex, kind) entries.
//! Lookup matches the basic type name of a value against every entry in
//! order. The first entry whose printer can actually be built wins; an entry
//! whose printer reports a pattern mismatch is skipped, so a loose regex never
//! hides a later, better one.
//!
//! ## Default catalog
//!
//! [`default_collection`] reproduces the `LoopModels` collection:
//!
//! | Regex | Printer |
//! |---|---|
//! | `^LinAlg::Array<.*, unsigned int>$` | vector |
//! | `^LinAlg::ManagedArray<.*, unsigned int, .*, std::allocator<.*>, .*>$` | vector |
//! | `^LinAlg::Array<.*, LinAlg::SquareDims>$` | square matrix |
//! | `^LinAlg::Array<.*, LinAlg::DenseDims>$` | dense matrix |
//! | `^LinAlg::Array<.*, LinAlg::StridedDims>$` | strided matrix |
//! | `^(LinAlg\|LinearAlgebra\|math)::(Row\|Col\|RowStride\|AxisInt<.*>)$` | strong integer |

use std::fmt;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::error::PrinterResult;
use crate::printer::{ArrayPrinter, Printer, ScalarPrinter};
use crate::resolver::LayoutRule;
use crate::target::Target;
use crate::typename::basic_type_name;
use crate::types::ShapeKind;

/// Name of the default collection
pub const DEFAULT_COLLECTION_NAME: &str = "LoopModels";

/// Entries of the default collection, in registration order
pub const DEFAULT_PATTERNS: &[(&str, &str, PrinterKind)] = &[
    ("LinAlg::Array", r"^LinAlg::Array<.*, unsigned int>$", PrinterKind::Vector),
    (
        "LinAlg::ManagedArray",
        r"^LinAlg::ManagedArray<.*, unsigned int, .*, std::allocator<.*>, .*>$",
        PrinterKind::Vector,
    ),
    ("LinAlg::Array", r"^LinAlg::Array<.*, LinAlg::SquareDims>$", PrinterKind::SquareMatrix),
    ("LinAlg::Array", r"^LinAlg::Array<.*, LinAlg::DenseDims>$", PrinterKind::DenseMatrix),
    ("LinAlg::Array", r"^LinAlg::Array<.*, LinAlg::StridedDims>$", PrinterKind::StridedMatrix),
    (
        "LinAlg::StrongInteger",
        r"^(LinAlg|LinearAlgebra|math)::(Row|Col|RowStride|AxisInt<.*>)$",
        PrinterKind::StrongInteger,
    ),
];

/// What kind of printer an entry builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrinterKind
{
    /// 1-D array, `Vector of size: N`
    Vector,
    /// Matrix whose shape stores a single order
    SquareMatrix,
    /// Matrix with implicit stride
    DenseMatrix,
    /// Matrix with explicit row stride
    StridedMatrix,
    /// Integer wrapper printed as its plain value
    StrongInteger,
}

impl PrinterKind
{
    /// Layout rule used by array printers; `None` for scalars
    #[must_use]
    pub fn layout_rule(self) -> Option<LayoutRule>
    {
        match self {
            PrinterKind::Vector => Some(LayoutRule::Vector),
            PrinterKind::SquareMatrix => Some(LayoutRule::SquareMatrix),
            PrinterKind::DenseMatrix => Some(LayoutRule::DenseMatrix),
            PrinterKind::StridedMatrix => Some(LayoutRule::StridedMatrix),
            PrinterKind::StrongInteger => None,
        }
    }

    /// Shape kind produced by this printer; `None` for scalars
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind>
    {
        self.layout_rule().map(LayoutRule::shape_kind)
    }

    /// Build a printer of this kind for `value`
    ///
    /// ## Errors
    ///
    /// Mismatch errors from the resolver or the integer read.
    pub fn build<'t, T: Target>(self, target: &'t T, value: &T::Value) -> PrinterResult<Printer<'t, T>>
    {
        match self.layout_rule() {
            Some(rule) => ArrayPrinter::new(target, value, rule).map(Printer::Array),
            None => ScalarPrinter::new(target, value).map(Printer::Scalar),
        }
    }
}

impl fmt::Display for PrinterKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self {
            PrinterKind::Vector => "vector",
            PrinterKind::SquareMatrix => "square matrix",
            PrinterKind::DenseMatrix => "dense matrix",
            PrinterKind::StridedMatrix => "strided matrix",
            PrinterKind::StrongInteger => "strong integer",
        };
        f.write_str(name)
    }
}

/// One registered pattern
#[derive(Debug, Clone)]
pub struct CatalogEntry
{
    name: String,
    pattern: Regex,
    kind: PrinterKind,
}

impl CatalogEntry
{
    /// Printer name (usually the template name it covers)
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Regex source
    pub fn pattern(&self) -> &str
    {
        self.pattern.as_str()
    }

    /// Printer kind
    pub fn kind(&self) -> PrinterKind
    {
        self.kind
    }

    /// Whether `type_name` (after stripping qualifiers) matches
    pub fn matches(&self, type_name: &str) -> bool
    {
        self.pattern.is_match(basic_type_name(type_name))
    }
}

/// Named, ordered set of printer patterns
#[derive(Debug, Clone)]
pub struct PrinterCollection
{
    name: String,
    entries: Vec<CatalogEntry>,
}

impl PrinterCollection
{
    /// Create an empty collection
    pub fn new(name: impl Into<String>) -> Self
    {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Registered entries, in order
    pub fn entries(&self) -> &[CatalogEntry]
    {
        &self.entries
    }

    /// Append a pattern
    ///
    /// ## Errors
    ///
    /// `InvalidPattern` if `pattern` is not a valid regex.
    pub fn add_printer(&mut self, name: impl Into<String>, pattern: &str, kind: PrinterKind) -> PrinterResult<()>
    {
        self.entries.push(CatalogEntry {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            kind,
        });
        Ok(())
    }

    /// Entries whose pattern matches `type_name`, in order
    pub fn matching<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a CatalogEntry> + 'a
    {
        self.entries.iter().filter(move |entry| entry.matches(type_name))
    }

    /// Find a printer for `value`
    ///
    /// Returns `None` when no entry matches or every matching entry fails.
    /// Mismatches are logged at debug level; any other build error is logged
    /// as a warning. Either way the next entry is tried, and lookup itself
    /// never fails. Memory errors cannot occur here: building a printer never
    /// dereferences the element pointer.
    pub fn lookup<'t, T: Target>(&self, target: &'t T, value: &T::Value) -> Option<Printer<'t, T>>
    {
        let type_name = target.type_name(value);
        for entry in self.matching(&type_name) {
            match entry.kind.build(target, value) {
                Ok(printer) => {
                    trace!(collection = %self.name, printer = %entry.name, kind = %entry.kind, "Printer matched {type_name}");
                    return Some(printer);
                }
                Err(err) if err.is_mismatch() => {
                    debug!(
                        collection = %self.name,
                        printer = %entry.name,
                        pattern = entry.pattern(),
                        "Pattern matched {type_name} but layout does not: {err}"
                    );
                }
                Err(err) => {
                    warn!(
                        collection = %self.name,
                        printer = %entry.name,
                        "Printer for {type_name} failed: {err}"
                    );
                }
            }
        }
        None
    }
}

/// The `LoopModels` collection with every default pattern
///
/// ## Errors
///
/// Only if a built-in pattern fails to compile, which the tests rule out.
pub fn default_collection() -> PrinterResult<PrinterCollection>
{
    let mut collection = PrinterCollection::new(DEFAULT_COLLECTION_NAME);
    for (name, pattern, kind) in DEFAULT_PATTERNS {
        collection.add_printer(*name, pattern, *kind)?;
    }
    Ok(collection)
}
