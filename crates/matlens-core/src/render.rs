//! # Host Display
//!
//! Renders a printer the way a debugger's display layer shows an array-hinted
//! value: the summary, ` = `, then the children's texts in braces separated by
//! `, `.
//!
//! The host decides how many children it pulls. With an element limit the
//! walker is simply abandoned after that many cells and `...` marks the cut.

use crate::printer::{DisplayHint, Printer};
use crate::target::Target;
use crate::types::RenderedCell;

/// Conventional debugger limit on printed elements
pub const DEFAULT_ELEMENT_LIMIT: usize = 200;

/// Host-side display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions
{
    /// Maximum number of children shown; `None` shows all of them
    pub element_limit: Option<usize>,
}

impl Default for RenderOptions
{
    fn default() -> Self
    {
        Self {
            element_limit: Some(DEFAULT_ELEMENT_LIMIT),
        }
    }
}

impl RenderOptions
{
    /// Show every child
    #[must_use]
    pub fn unlimited() -> Self
    {
        Self { element_limit: None }
    }

    /// Show at most `limit` children
    #[must_use]
    pub fn with_limit(limit: usize) -> Self
    {
        Self {
            element_limit: Some(limit),
        }
    }
}

/// Children a host would pull, plus whether it stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPage
{
    /// Cells pulled, in walk order
    pub cells: Vec<RenderedCell>,
    /// Whether more cells were left when the limit was hit
    pub truncated: bool,
}

/// Pull children from `printer` up to the element limit
pub fn collect_cells<T: Target>(printer: &Printer<'_, T>, options: &RenderOptions) -> CellPage
{
    let Some(mut walker) = printer.children() else {
        return CellPage {
            cells: Vec::new(),
            truncated: false,
        };
    };

    let limit = options.element_limit.unwrap_or(usize::MAX);
    let mut cells = Vec::new();
    while cells.len() < limit {
        match walker.next() {
            Some(cell) => cells.push(cell),
            None => break,
        }
    }
    let truncated = cells.len() == limit && walker.has_next();
    CellPage { cells, truncated }
}

/// Full display text of `printer`
///
/// ```rust
/// use matlens_core::catalog::default_collection;
/// use matlens_core::render::{render, RenderOptions};
/// use matlens_core::snapshot::{MemoryImage, SnapshotTarget, SnapshotValue};
/// use matlens_core::types::Address;
///
/// let mut image = MemoryImage::new();
/// let bytes: Vec<u8> = (1..=6i64).flat_map(i64::to_le_bytes).collect();
/// image.map(Address::from(0x1000), bytes, None)?;
/// let dims = SnapshotValue::structure(
///     "LinAlg::DenseDims",
///     [("M", SnapshotValue::long(2)), ("N", SnapshotValue::long(3))],
/// );
/// let value = SnapshotValue::structure(
///     "LinAlg::Array<long, LinAlg::DenseDims>",
///     [("ptr", SnapshotValue::pointer("long *", Address::from(0x1000))), ("sz", dims)],
/// );
/// let target = SnapshotTarget::new(image);
/// let printer = default_collection()?.lookup(&target, &value).expect("dense printer");
/// assert_eq!(
///     render(&printer, &RenderOptions::default()),
///     "Matrix, 2 x 3:\n = { 1,  2,  3, \n     4,  5,  6 }"
/// );
/// # Ok::<(), matlens_core::error::PrinterError>(())
/// ```
///
/// Scalars render as their summary alone.
pub fn render<T: Target>(printer: &Printer<'_, T>, options: &RenderOptions) -> String
{
    let summary = printer.summary();
    if printer.display_hint() != Some(DisplayHint::Array) {
        return summary;
    }

    let page = collect_cells(printer, options);
    let mut body = page.cells.iter().map(|cell| cell.text.as_str()).collect::<Vec<_>>().join(", ");
    if page.truncated {
        body.push_str("...");
    }
    format!("{summary} = {{{body}}}")
}
