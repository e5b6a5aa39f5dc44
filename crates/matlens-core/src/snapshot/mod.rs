//! # Snapshot Target
//!
//! A [`Target`] implementation over a recorded process image.
//!
//! Values are described explicitly ([`SnapshotValue`]) and element memory is
//! read from a [`MemoryImage`]. This is how the printers are exercised
//! without a debugger: tests build small images by hand, and the CLI loads raw
//! memory dumps taken from a core file.
//!
//! ## Usage
//!
//! ```rust
//! use matlens_core::catalog::default_collection;
//! use matlens_core::snapshot::{MemoryImage, SnapshotTarget, SnapshotValue};
//! use matlens_core::types::Address;
//!
//! let mut image = MemoryImage::new();
//! let bytes: Vec<u8> = [1i64, -2, 3].iter().flat_map(|v| v.to_le_bytes()).collect();
//! image.map(Address::from(0x1000), bytes, None)?;
//!
//! let value = SnapshotValue::structure(
//!     "LinAlg::Array<long, unsigned int>",
//!     [
//!         ("ptr", SnapshotValue::pointer("long *", Address::from(0x1000))),
//!         ("sz", SnapshotValue::unsigned(3)),
//!     ],
//! );
//! let target = SnapshotTarget::new(image);
//! let printer = default_collection()?.lookup(&target, &value).expect("vector printer");
//! assert_eq!(printer.summary(), "Vector of size: 3");
//! let texts: Vec<String> = printer.children().unwrap().map(|cell| cell.text).collect();
//! assert_eq!(texts, ["1", "-2", "3"]);
//! # Ok::<(), matlens_core::error::PrinterError>(())
//! ```

pub mod image;
pub mod value;

pub use image::MemoryImage;
pub use value::{Scalar, ScalarType, SnapshotValue};

use crate::error::{PrinterError, PrinterResult};
use crate::target::Target;
use crate::typename;
use crate::types::{ElementPointer, ElementValue};

/// Host over a [`MemoryImage`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotTarget
{
    image: MemoryImage,
}

impl SnapshotTarget
{
    /// Inspect values backed by `image`
    #[must_use]
    pub fn new(image: MemoryImage) -> Self
    {
        Self { image }
    }

    /// The backing image
    pub fn image(&self) -> &MemoryImage
    {
        &self.image
    }
}

impl Target for SnapshotTarget
{
    type Value = SnapshotValue;
    type Type = ScalarType;

    fn type_name(&self, value: &SnapshotValue) -> String
    {
        value.type_name().to_string()
    }

    fn field(&self, value: &SnapshotValue, name: &str) -> Option<SnapshotValue>
    {
        value.field(name).cloned()
    }

    fn template_argument(&self, value: &SnapshotValue, index: usize) -> Option<ScalarType>
    {
        typename::template_argument(value.type_name(), index).and_then(ScalarType::from_type_name)
    }

    fn to_i64(&self, value: &SnapshotValue) -> Option<i64>
    {
        match value {
            SnapshotValue::Scalar { value, .. } => value.as_i64(),
            SnapshotValue::Pointer { .. } | SnapshotValue::Struct { .. } => None,
        }
    }

    fn cast_pointer(&self, value: &SnapshotValue, element_type: &ScalarType) -> Option<ElementPointer<ScalarType>>
    {
        match value {
            SnapshotValue::Pointer { address, .. } => Some(ElementPointer::new(*address, *element_type)),
            SnapshotValue::Scalar { .. } | SnapshotValue::Struct { .. } => None,
        }
    }

    fn read_element(&self, pointer: &ElementPointer<ScalarType>, offset: u64) -> PrinterResult<ElementValue>
    {
        let size = pointer.element_type.size();
        let address = pointer
            .address
            .element(offset, size as u64)
            .ok_or_else(|| PrinterError::UnreadableMemory {
                address: pointer.address,
                reason: format!("element {offset} lies beyond the address space"),
            })?;
        let bytes = self.image.read(address, size)?;
        pointer
            .element_type
            .decode(bytes)
            .map(|scalar| scalar.to_element())
            .ok_or_else(|| PrinterError::UnreadableMemory {
                address,
                reason: format!("short read decoding {:?}", pointer.element_type),
            })
    }
}
