//! # Layout Resolver
//!
//! Extracts the base element pointer and the shape descriptor from an
//! inspected array value.
//!
//! The resolver is pure field extraction. It reads integer fields and casts
//! the element pointer to the element type, but it never dereferences that
//! pointer. A missing field is not a bug here: it means the type pattern that
//! selected this value was the wrong one, and the caller is expected to fall
//! back to the next pattern.
//!
//! ## Field layout
//!
//! | Layout | Pointer | Shape fields |
//! |---|---|---|
//! | vector | `ptr` | `sz` (the length itself) |
//! | square matrix | `ptr` | `sz.M` (rows = cols = stride) |
//! | dense matrix | `ptr` | `sz.M`, `sz.N` (stride = `N`) |
//! | strided matrix | `ptr` | `sz.M`, `sz.N`, `sz.strideM` |
//!
//! The element type is always the value type's first template argument.

use tracing::debug;

use crate::error::{PrinterError, PrinterResult};
use crate::target::Target;
use crate::types::{ElementPointer, ShapeDescriptor, ShapeKind};

/// Field holding the element pointer
pub const POINTER_FIELD: &str = "ptr";
/// Field holding the length (vectors) or the shape sub-structure (matrices)
pub const SIZE_FIELD: &str = "sz";
/// Shape sub-structure field holding the row count
pub const ROWS_FIELD: &str = "M";
/// Shape sub-structure field holding the column count
pub const COLS_FIELD: &str = "N";
/// Shape sub-structure field holding the row stride
pub const STRIDE_FIELD: &str = "strideM";

/// How to read a shape out of an array value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutRule
{
    /// `sz` is the length
    Vector,
    /// `sz.M` is both dimensions
    SquareMatrix,
    /// `sz.M` rows, `sz.N` columns
    DenseMatrix,
    /// `sz.M` rows, `sz.N` columns, `sz.strideM` row stride
    StridedMatrix,
}

impl LayoutRule
{
    /// The shape kind this rule produces
    #[must_use]
    pub fn shape_kind(self) -> ShapeKind
    {
        match self {
            LayoutRule::Vector => ShapeKind::Linear,
            LayoutRule::SquareMatrix | LayoutRule::DenseMatrix => ShapeKind::Dense,
            LayoutRule::StridedMatrix => ShapeKind::Strided,
        }
    }
}

/// Output of the resolver: where the elements are and how they are laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout<Ty>
{
    /// Base pointer, already cast to the element type
    pub pointer: ElementPointer<Ty>,
    /// Shape of the array
    pub shape: ShapeDescriptor,
}

/// Resolve `value` according to `rule`
///
/// ## Errors
///
/// - `PatternMismatch`: a required field, the element type, or a pointer cast
///   is missing
/// - `InvalidDimension`: a shape field is negative, or a row stride is smaller
///   than the column count of a multi-row matrix
pub fn resolve<T: Target>(target: &T, value: &T::Value, rule: LayoutRule) -> PrinterResult<ResolvedLayout<T::Type>>
{
    let fields = FieldReader {
        target,
        value,
        type_name: target.type_name(value),
    };

    let shape = match rule {
        LayoutRule::Vector => ShapeDescriptor::Linear {
            size: fields.dimension(&[SIZE_FIELD])?,
        },
        LayoutRule::SquareMatrix => {
            let order = fields.dimension(&[SIZE_FIELD, ROWS_FIELD])?;
            ShapeDescriptor::Dense { rows: order, cols: order }
        }
        LayoutRule::DenseMatrix => ShapeDescriptor::Dense {
            rows: fields.dimension(&[SIZE_FIELD, ROWS_FIELD])?,
            cols: fields.dimension(&[SIZE_FIELD, COLS_FIELD])?,
        },
        LayoutRule::StridedMatrix => {
            let rows = fields.dimension(&[SIZE_FIELD, ROWS_FIELD])?;
            let cols = fields.dimension(&[SIZE_FIELD, COLS_FIELD])?;
            let stride_rows = fields.dimension(&[SIZE_FIELD, STRIDE_FIELD])?;
            if rows > 1 && stride_rows < cols {
                return Err(PrinterError::InvalidDimension {
                    field: format!("{SIZE_FIELD}.{STRIDE_FIELD}"),
                    value: i64::try_from(stride_rows).unwrap_or(i64::MAX),
                });
            }
            ShapeDescriptor::Strided { rows, cols, stride_rows }
        }
    };

    let pointer = fields.element_pointer()?;
    debug!(
        type_name = %fields.type_name,
        address = %pointer.address,
        ?shape,
        "Resolved array layout"
    );
    Ok(ResolvedLayout { pointer, shape })
}

struct FieldReader<'a, T: Target>
{
    target: &'a T,
    value: &'a T::Value,
    type_name: String,
}

impl<T: Target> FieldReader<'_, T>
{
    fn mismatch(&self, missing: impl Into<String>) -> PrinterError
    {
        PrinterError::mismatch(self.type_name.clone(), missing)
    }

    fn lookup(&self, path: &[&str]) -> PrinterResult<T::Value>
    {
        let mut segments = path.iter();
        let first = segments.next().ok_or_else(|| self.mismatch("field"))?;
        let mut current = self
            .target
            .field(self.value, first)
            .ok_or_else(|| self.mismatch(format!("field {}", path.join("."))))?;
        for segment in segments {
            current = self
                .target
                .field(&current, segment)
                .ok_or_else(|| self.mismatch(format!("field {}", path.join("."))))?;
        }
        Ok(current)
    }

    fn dimension(&self, path: &[&str]) -> PrinterResult<u64>
    {
        let field = self.lookup(path)?;
        let raw = self
            .target
            .to_i64(&field)
            .ok_or_else(|| self.mismatch(format!("integer field {}", path.join("."))))?;
        u64::try_from(raw).map_err(|_| PrinterError::InvalidDimension {
            field: path.join("."),
            value: raw,
        })
    }

    fn element_pointer(&self) -> PrinterResult<ElementPointer<T::Type>>
    {
        let element_type = self
            .target
            .template_argument(self.value, 0)
            .ok_or_else(|| self.mismatch("element type template argument"))?;
        let raw = self.lookup(&[POINTER_FIELD])?;
        self.target
            .cast_pointer(&raw, &element_type)
            .ok_or_else(|| self.mismatch(format!("pointer field {POINTER_FIELD}")))
    }
}
