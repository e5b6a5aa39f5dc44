//! # Element Walker
//!
//! Turns a resolved layout into a lazy sequence of rendered cells.
//!
//! ## Iteration
//!
//! Cells come out in row-major order (column index fastest). A linear shape is
//! walked as a single row. The walker is a pull-based cursor with three
//! states:
//!
//! ```text
//! Start --advance--> At(0, 0) --advance--> At(0, 1) ... At(rows-1, cols-1) --advance--> Done
//!   \                                                                                   ^
//!    `------------------------ advance (rows == 0 or cols == 0) -----------------------'
//! ```
//!
//! `Done` is terminal: further `advance` calls return `false`, never an error.
//! The host may stop pulling at any point (display limits); the walker holds
//! nothing that needs cleanup.
//!
//! ## Matrix cell formatting
//!
//! Applied in order to the element's native text:
//!
//! 1. a value `>= 0` gets one leading space, aligning it with negative values
//! 2. the first cell of every row after the first gets a line break and
//!    four spaces of indentation in front
//! 3. the very last cell of the matrix gets a trailing space
//!
//! Linear cells carry the element text unchanged.

use std::iter::FusedIterator;

use tracing::{trace, warn};

use crate::error::{PrinterError, PrinterResult};
use crate::resolver::ResolvedLayout;
use crate::target::Target;
use crate::types::{ElementPointer, ElementValue, IndexLabel, RenderedCell, ShapeDescriptor};

/// Inserted before the first cell of every row but the first
pub const ROW_BREAK: &str = "\n    ";

/// Cursor position of an [`ElementWalker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState
{
    /// Nothing emitted yet
    Start,
    /// Positioned on a cell
    At
    {
        /// Current row
        row: u64,
        /// Current column
        col: u64,
    },
    /// Sequence exhausted
    Done,
}

/// Lazy, single-pass walk over the cells of an array
///
/// Use it either as an `Iterator` or through the explicit cursor API:
///
/// ```rust,no_run
/// # use matlens_core::walker::ElementWalker;
/// # use matlens_core::target::Target;
/// # fn dump<T: Target>(mut walker: ElementWalker<'_, T>) {
/// while walker.advance() {
///     if let Some(cell) = walker.current() {
///         println!("{} = {}", cell.label, cell.text);
///     }
/// }
/// # }
/// ```
pub struct ElementWalker<'t, T: Target>
{
    target: &'t T,
    pointer: ElementPointer<T::Type>,
    shape: ShapeDescriptor,
    state: WalkState,
}

/// Start a walk over `layout`
pub fn walk<T: Target>(target: &T, layout: ResolvedLayout<T::Type>) -> ElementWalker<'_, T>
{
    ElementWalker::new(target, layout)
}

impl<'t, T: Target> ElementWalker<'t, T>
{
    /// Create a walker positioned before the first cell
    pub fn new(target: &'t T, layout: ResolvedLayout<T::Type>) -> Self
    {
        Self {
            target,
            pointer: layout.pointer,
            shape: layout.shape,
            state: WalkState::Start,
        }
    }

    /// Shape being walked
    pub fn shape(&self) -> &ShapeDescriptor
    {
        &self.shape
    }

    /// Current cursor state
    pub fn state(&self) -> WalkState
    {
        self.state
    }

    /// Whether the walk has reached its terminal state
    pub fn is_done(&self) -> bool
    {
        self.state == WalkState::Done
    }

    /// Whether another call to [`advance`](Self::advance) would land on a cell
    pub fn has_next(&self) -> bool
    {
        self.next_position().is_some()
    }

    /// Move to the next cell; returns `false` once the walk is done
    pub fn advance(&mut self) -> bool
    {
        match self.next_position() {
            Some((row, col)) => {
                self.state = WalkState::At { row, col };
                true
            }
            None => {
                self.state = WalkState::Done;
                false
            }
        }
    }

    /// The cell under the cursor, or `None` before the first `advance` and
    /// after the last one
    ///
    /// Reads the element through the target on every call.
    pub fn current(&self) -> Option<RenderedCell>
    {
        match self.state {
            WalkState::At { row, col } => Some(self.render(row, col)),
            WalkState::Start | WalkState::Done => None,
        }
    }

    fn next_position(&self) -> Option<(u64, u64)>
    {
        if self.shape.is_empty() {
            return None;
        }
        match self.state {
            WalkState::Start => Some((0, 0)),
            WalkState::At { row, col } => {
                if col + 1 < self.shape.cols() {
                    Some((row, col + 1))
                } else if row + 1 < self.shape.rows() {
                    Some((row + 1, 0))
                } else {
                    None
                }
            }
            WalkState::Done => None,
        }
    }

    fn remaining(&self) -> u64
    {
        if self.shape.is_empty() {
            return 0;
        }
        match self.state {
            WalkState::Start => self.shape.cell_count(),
            WalkState::At { row, col } => {
                let emitted = row.saturating_mul(self.shape.cols()).saturating_add(col + 1);
                self.shape.cell_count().saturating_sub(emitted)
            }
            WalkState::Done => 0,
        }
    }

    fn read(&self, row: u64, col: u64) -> PrinterResult<ElementValue>
    {
        let offset = self
            .shape
            .element_offset(row, col)
            .ok_or(PrinterError::OffsetOverflow { row, col })?;
        self.target.read_element(&self.pointer, offset)
    }

    fn render(&self, row: u64, col: u64) -> RenderedCell
    {
        let element = self.read(row, col);
        if let Err(err) = &element {
            warn!(row, col, base = %self.pointer.address, "Failed to read element: {err}");
        }

        let cell = if self.shape.is_matrix() {
            let (text, pad_sign) = match element {
                Ok(value) => {
                    let pad = value.is_non_negative();
                    (value.text, pad)
                }
                Err(err) => (error_marker(&err), false),
            };
            RenderedCell::new(
                IndexLabel::Grid { row, col },
                format_matrix_cell(&text, pad_sign, row, col, &self.shape),
            )
        } else {
            let text = element.map_or_else(|err| error_marker(&err), |value| value.text);
            RenderedCell::new(IndexLabel::Linear(col), text)
        };
        trace!(label = %cell.label, text = %cell.text.escape_debug(), "Rendered cell");
        cell
    }
}

impl<T: Target> Iterator for ElementWalker<'_, T>
{
    type Item = RenderedCell;

    fn next(&mut self) -> Option<Self::Item>
    {
        if self.advance() {
            self.current()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>)
    {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<T: Target> FusedIterator for ElementWalker<'_, T> {}

/// Apply the matrix cell rules to one element's text
///
/// ```rust
/// use matlens_core::types::ShapeDescriptor;
/// use matlens_core::walker::format_matrix_cell;
///
/// let shape = ShapeDescriptor::Dense { rows: 2, cols: 3 };
/// assert_eq!(format_matrix_cell("1", true, 0, 0, &shape), " 1");
/// assert_eq!(format_matrix_cell("-4", false, 1, 0, &shape), "\n    -4");
/// assert_eq!(format_matrix_cell("6", true, 1, 2, &shape), " 6 ");
/// ```
pub fn format_matrix_cell(text: &str, pad_sign: bool, row: u64, col: u64, shape: &ShapeDescriptor) -> String
{
    let mut out = String::with_capacity(text.len() + ROW_BREAK.len() + 2);
    if col == 0 && row != 0 {
        out.push_str(ROW_BREAK);
    }
    if pad_sign {
        out.push(' ');
    }
    out.push_str(text);
    if row + 1 == shape.rows() && col + 1 == shape.cols() {
        out.push(' ');
    }
    out
}

/// Summary header shown before the cells
///
/// ```rust
/// use matlens_core::types::ShapeDescriptor;
/// use matlens_core::walker::summary;
///
/// assert_eq!(summary(&ShapeDescriptor::Linear { size: 0 }), "Vector of size: 0");
/// assert_eq!(summary(&ShapeDescriptor::Dense { rows: 2, cols: 3 }), "Matrix, 2 x 3:\n");
/// assert_eq!(
///     summary(&ShapeDescriptor::Strided { rows: 2, cols: 2, stride_rows: 3 }),
///     "Matrix, 2 x 2, stride 3:\n"
/// );
/// ```
pub fn summary(shape: &ShapeDescriptor) -> String
{
    match *shape {
        ShapeDescriptor::Linear { size } => format!("Vector of size: {size}"),
        ShapeDescriptor::Dense { rows, cols } => format!("Matrix, {rows} x {cols}:\n"),
        ShapeDescriptor::Strided { rows, cols, stride_rows } => {
            format!("Matrix, {rows} x {cols}, stride {stride_rows}:\n")
        }
    }
}

/// Inline marker shown in place of an element that could not be read
pub fn error_marker(err: &PrinterError) -> String
{
    format!("<error: {err}>")
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_single_cell_is_first_and_last()
    {
        let shape = ShapeDescriptor::Dense { rows: 1, cols: 1 };
        assert_eq!(format_matrix_cell("7", true, 0, 0, &shape), " 7 ");
    }

    #[test]
    fn test_first_row_never_wraps()
    {
        let shape = ShapeDescriptor::Dense { rows: 3, cols: 1 };
        assert_eq!(format_matrix_cell("-1", false, 0, 0, &shape), "-1");
        assert_eq!(format_matrix_cell("2", true, 1, 0, &shape), "\n     2");
        assert_eq!(format_matrix_cell("3", true, 2, 0, &shape), "\n     3 ");
    }

    #[test]
    fn test_error_marker_wraps_message()
    {
        let err = PrinterError::OffsetOverflow { row: 1, col: 2 };
        assert_eq!(error_marker(&err), "<error: Element offset overflows at [1, 2]>");
    }
}
