//! In-memory process image.
//!
//! A [`MemoryImage`] is a set of dumped address ranges, each backed by its raw
//! bytes. It stands in for a live process or a core file: reads inside a
//! region succeed, reads that touch unmapped addresses fail the same way a
//! debugger's memory read would.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PrinterError, PrinterResult};
use crate::types::{Address, MemoryRegion};

/// Read-only snapshot of some address ranges of a process
#[derive(Debug, Clone, Default)]
pub struct MemoryImage
{
    regions: Vec<(MemoryRegion, Vec<u8>)>,
}

impl MemoryImage
{
    /// Create an empty image
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Map `bytes` at `start`
    ///
    /// ## Errors
    ///
    /// - `InvalidDimension`: the range would wrap past the end of the address
    ///   space
    /// - `UnreadableMemory`: the range overlaps an existing region
    pub fn map(&mut self, start: Address, bytes: Vec<u8>, name: Option<String>) -> PrinterResult<&MemoryRegion>
    {
        self.map_with_permissions(start, bytes, "r--", name)
    }

    /// Map `bytes` at `start` with an explicit `rwx`-style permission string
    ///
    /// Regions without `r` stay in the image but every read from them fails,
    /// like a guard page in a live process.
    ///
    /// ## Errors
    ///
    /// As [`map`](Self::map).
    pub fn map_with_permissions(
        &mut self,
        start: Address,
        bytes: Vec<u8>,
        permissions: &str,
        name: Option<String>,
    ) -> PrinterResult<&MemoryRegion>
    {
        let len = bytes.len() as u64;
        let end = start.checked_add(len).ok_or_else(|| PrinterError::InvalidDimension {
            field: "region length".to_string(),
            value: i64::try_from(len).unwrap_or(i64::MAX),
        })?;
        if let Some((existing, _)) = self.regions.iter().find(|(region, _)| region.overlaps(start, len)) {
            return Err(PrinterError::UnreadableMemory {
                address: start,
                reason: format!("overlaps region {}..{}", existing.start, existing.end),
            });
        }

        debug!(%start, %end, permissions, ?name, "Mapped image region");
        let region = MemoryRegion::new(start, end, permissions, name);
        self.regions.push((region, bytes));
        self.regions.sort_by_key(|(region, _)| region.start);
        let index = self
            .regions
            .iter()
            .position(|(region, _)| region.start == start)
            .unwrap_or_default();
        Ok(&self.regions[index].0)
    }

    /// Map the contents of a raw dump file at `start`
    ///
    /// ## Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`map`](Self::map).
    pub fn map_file(&mut self, start: Address, path: impl AsRef<Path>) -> PrinterResult<&MemoryRegion>
    {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        self.map(start, bytes, Some(path.display().to_string()))
    }

    /// Mapped regions, ordered by start address
    pub fn regions(&self) -> impl Iterator<Item = &MemoryRegion>
    {
        self.regions.iter().map(|(region, _)| region)
    }

    /// Borrow `len` bytes starting at `address`
    ///
    /// A read must lie entirely inside one region.
    ///
    /// ## Errors
    ///
    /// `UnreadableMemory` naming the first byte that is not mapped.
    pub fn read(&self, address: Address, len: usize) -> PrinterResult<&[u8]>
    {
        let (region, bytes) = self
            .regions
            .iter()
            .find(|(region, _)| region.contains(address))
            .ok_or_else(|| PrinterError::UnreadableMemory {
                address,
                reason: "address is not mapped".to_string(),
            })?;
        if !region.is_readable() {
            return Err(PrinterError::UnreadableMemory {
                address,
                reason: format!("region is not readable ({})", region.permissions),
            });
        }

        let start = usize::try_from(address.value() - region.start.value()).unwrap_or(usize::MAX);
        let end = start.saturating_add(len);
        bytes.get(start..end).ok_or_else(|| PrinterError::UnreadableMemory {
            address: region.end,
            reason: format!("read of {len} bytes runs past the end of the region"),
        })
    }
}
