//! Rendered cells and element values.

use std::fmt;

/// Index label of a rendered cell
///
/// ```rust
/// use matlens_core::types::IndexLabel;
///
/// assert_eq!(IndexLabel::Linear(4).to_string(), "[4]");
/// assert_eq!(IndexLabel::Grid { row: 1, col: 0 }.to_string(), "[1, 0]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexLabel
{
    /// Position in a 1-D array
    Linear(u64),
    /// Position in a 2-D matrix
    Grid
    {
        /// Row index
        row: u64,
        /// Column index
        col: u64,
    },
}

impl fmt::Display for IndexLabel
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            IndexLabel::Linear(index) => write!(f, "[{index}]"),
            IndexLabel::Grid { row, col } => write!(f, "[{row}, {col}]"),
        }
    }
}

/// One (label, text) pair handed to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell
{
    /// Index label
    pub label: IndexLabel,
    /// Formatted element text
    pub text: String,
}

impl RenderedCell
{
    /// Create a cell
    pub fn new(label: IndexLabel, text: impl Into<String>) -> Self
    {
        Self {
            label,
            text: text.into(),
        }
    }
}

/// An element as the host converted it to text
///
/// `text` is the host's own string conversion of the value; this crate never
/// formats numbers itself. `non_negative` is `None` when the element has no
/// ordering against zero (e.g. a structure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementValue
{
    /// Native string form of the element
    pub text: String,
    /// Whether the element compares `>= 0`, if it is numeric
    pub non_negative: Option<bool>,
}

impl ElementValue
{
    /// A numeric element
    pub fn numeric(text: impl Into<String>, non_negative: bool) -> Self
    {
        Self {
            text: text.into(),
            non_negative: Some(non_negative),
        }
    }

    /// An element with no sign
    pub fn opaque(text: impl Into<String>) -> Self
    {
        Self {
            text: text.into(),
            non_negative: None,
        }
    }

    /// Whether the sign column should be padded with a space
    #[must_use]
    pub fn is_non_negative(&self) -> bool
    {
        self.non_negative.unwrap_or(false)
    }
}
