//! Element pointers and shape descriptors.
//!
//! These are views over foreign memory. Nothing here owns or copies target
//! data; a layout is rebuilt from the inspected value on every display
//! request and dropped once the rendering is done.

use std::fmt;

use super::Address;

/// Base address of an array plus the host's handle for its element type
///
/// Only used for offset arithmetic and dereference through the host. The
/// pointee is never freed or copied by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPointer<Ty>
{
    /// Address of element 0
    pub address: Address,
    /// Host representation of the element type
    pub element_type: Ty,
}

impl<Ty> ElementPointer<Ty>
{
    /// Create a pointer to `element_type` values starting at `address`
    pub fn new(address: Address, element_type: Ty) -> Self
    {
        Self { address, element_type }
    }
}

/// The three layout kinds a shape can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind
{
    /// One-dimensional array
    Linear,
    /// Two-dimensional, stride equal to the column count
    Dense,
    /// Two-dimensional, explicit row stride (may exceed the column count)
    Strided,
}

impl fmt::Display for ShapeKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self {
            ShapeKind::Linear => "linear",
            ShapeKind::Dense => "dense",
            ShapeKind::Strided => "strided",
        };
        f.write_str(name)
    }
}

/// Shape of an inspected array
///
/// All dimensions are unsigned, so the non-negativity invariant holds by
/// construction. A zero dimension yields an empty cell sequence, not an error.
///
/// ## Example
///
/// ```rust
/// use matlens_core::types::ShapeDescriptor;
///
/// let shape = ShapeDescriptor::Strided { rows: 2, cols: 2, stride_rows: 3 };
/// assert_eq!(shape.element_offset(1, 1), Some(4));
/// assert_eq!(shape.cell_count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeDescriptor
{
    /// 1-D array of `size` elements
    Linear
    {
        /// Number of elements
        size: u64,
    },
    /// Row-major matrix with implicit stride = `cols`
    Dense
    {
        /// Number of rows
        rows: u64,
        /// Number of columns
        cols: u64,
    },
    /// Row-major matrix whose rows start `stride_rows` elements apart
    Strided
    {
        /// Number of rows
        rows: u64,
        /// Number of columns
        cols: u64,
        /// Elements between the starts of consecutive rows
        stride_rows: u64,
    },
}

impl ShapeDescriptor
{
    /// Which layout kind this shape is
    #[must_use]
    pub fn kind(&self) -> ShapeKind
    {
        match self {
            ShapeDescriptor::Linear { .. } => ShapeKind::Linear,
            ShapeDescriptor::Dense { .. } => ShapeKind::Dense,
            ShapeDescriptor::Strided { .. } => ShapeKind::Strided,
        }
    }

    /// Row count; a linear shape is a single row
    #[must_use]
    pub fn rows(&self) -> u64
    {
        match *self {
            ShapeDescriptor::Linear { .. } => 1,
            ShapeDescriptor::Dense { rows, .. } | ShapeDescriptor::Strided { rows, .. } => rows,
        }
    }

    /// Column count; for a linear shape this is its size
    #[must_use]
    pub fn cols(&self) -> u64
    {
        match *self {
            ShapeDescriptor::Linear { size } => size,
            ShapeDescriptor::Dense { cols, .. } | ShapeDescriptor::Strided { cols, .. } => cols,
        }
    }

    /// Effective row stride in elements
    #[must_use]
    pub fn stride(&self) -> u64
    {
        match *self {
            ShapeDescriptor::Linear { size } => size,
            ShapeDescriptor::Dense { cols, .. } => cols,
            ShapeDescriptor::Strided { stride_rows, .. } => stride_rows,
        }
    }

    /// Whether the shape has two dimensions
    #[must_use]
    pub fn is_matrix(&self) -> bool
    {
        !matches!(self, ShapeDescriptor::Linear { .. })
    }

    /// Whether iteration over this shape yields no cells
    #[must_use]
    pub fn is_empty(&self) -> bool
    {
        self.rows() == 0 || self.cols() == 0
    }

    /// Number of cells iteration yields, saturating at `u64::MAX`
    #[must_use]
    pub fn cell_count(&self) -> u64
    {
        self.rows().saturating_mul(self.cols())
    }

    /// Element offset of `(row, col)` from the base pointer: `col + row * stride`
    ///
    /// Padding columns between `cols` and `stride` are never addressed by a
    /// valid `(row, col)`. Returns `None` if the offset overflows.
    #[must_use]
    pub fn element_offset(&self, row: u64, col: u64) -> Option<u64>
    {
        row.checked_mul(self.stride()).and_then(|start| start.checked_add(col))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_dense_stride_is_cols()
    {
        let shape = ShapeDescriptor::Dense { rows: 4, cols: 3 };
        assert_eq!(shape.stride(), 3);
        assert_eq!(shape.element_offset(2, 1), Some(7));
    }

    #[test]
    fn test_linear_degenerates_to_index()
    {
        let shape = ShapeDescriptor::Linear { size: 10 };
        assert_eq!(shape.element_offset(0, 7), Some(7));
        assert!(!shape.is_matrix());
        assert_eq!(shape.cell_count(), 10);
    }

    #[test]
    fn test_zero_dimension_is_empty()
    {
        assert!(ShapeDescriptor::Dense { rows: 0, cols: 5 }.is_empty());
        assert!(ShapeDescriptor::Strided { rows: 5, cols: 0, stride_rows: 8 }.is_empty());
        assert!(ShapeDescriptor::Linear { size: 0 }.is_empty());
        assert!(!ShapeDescriptor::Dense { rows: 1, cols: 1 }.is_empty());
    }

    #[test]
    fn test_offset_overflow()
    {
        let shape = ShapeDescriptor::Strided { rows: 3, cols: 1, stride_rows: u64::MAX };
        assert_eq!(shape.element_offset(2, 0), None);
    }
}
