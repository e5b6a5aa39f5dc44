//! Memory regions of an inspected process image.

use super::Address;

/// Memory region in a process image
///
/// A contiguous range of target addresses. Snapshot images are made of these,
/// one per dumped range.
///
/// ## Example
///
/// ```
/// use matlens_core::types::{Address, MemoryRegion};
///
/// let heap = MemoryRegion::new(Address::from(0x2000), Address::from(0x3000), "rw-", Some("[heap]".to_string()));
/// assert_eq!(heap.size(), 0x1000);
/// assert!(heap.contains(Address::from(0x2fff)));
/// assert!(!heap.contains(Address::from(0x3000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion
{
    /// Start address (inclusive)
    pub start: Address,
    /// End address (exclusive)
    pub end: Address,
    /// Permission string in `rwx` form, `-` for a missing permission
    pub permissions: String,
    /// Optional name (file the region was loaded from, `[heap]`, ...)
    pub name: Option<String>,
}

impl MemoryRegion
{
    /// Create a new memory region
    pub fn new(start: Address, end: Address, permissions: impl Into<String>, name: Option<String>) -> Self
    {
        Self {
            start,
            end,
            permissions: permissions.into(),
            name,
        }
    }

    /// Size in bytes; zero when `end <= start`
    #[must_use]
    pub fn size(&self) -> u64
    {
        self.end.value().saturating_sub(self.start.value())
    }

    /// Whether `address` falls inside the region
    #[must_use]
    pub fn contains(&self, address: Address) -> bool
    {
        self.start <= address && address < self.end
    }

    /// Whether `[start, start + len)` overlaps this region
    #[must_use]
    pub fn overlaps(&self, start: Address, len: u64) -> bool
    {
        let end = start.value().saturating_add(len);
        start.value() < self.end.value() && self.start.value() < end
    }

    /// Whether the region can be read
    #[must_use]
    pub fn is_readable(&self) -> bool
    {
        self.permissions.starts_with('r')
    }
}
