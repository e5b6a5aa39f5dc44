//! Target memory address type.

use std::fmt;
use std::ops::Add;

/// Address in the inspected process image
///
/// Wrapping the raw `u64` keeps addresses apart from element offsets, sizes
/// and counts, which are all plain integers in the layout math.
///
/// ## Example
///
/// ```rust
/// use matlens_core::types::Address;
///
/// let base = Address::from(0x1000);
/// assert_eq!((base + 0x10).value(), 0x1010);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    ///
    /// Usable in const contexts, unlike `Address::from`.
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Add a byte offset, returning `None` on overflow
    ///
    /// ```rust
    /// use matlens_core::types::Address;
    ///
    /// let addr = Address::from(0x1000);
    /// assert_eq!(addr.checked_add(0x100), Some(Address::from(0x1100)));
    /// assert_eq!(addr.checked_add(u64::MAX), None);
    /// ```
    pub fn checked_add(self, offset: u64) -> Option<Self>
    {
        self.0.checked_add(offset).map(Address)
    }

    /// Address of element `index` in an array of `element_size`-byte elements
    /// starting here
    ///
    /// This is the byte-level half of pointer arithmetic. Returns `None` if the
    /// scaled offset or the final address overflows.
    ///
    /// ```rust
    /// use matlens_core::types::Address;
    ///
    /// let base = Address::from(0x1000);
    /// assert_eq!(base.element(3, 8), Some(Address::from(0x1018)));
    /// assert_eq!(base.element(u64::MAX, 8), None);
    /// ```
    pub fn element(self, index: u64, element_size: u64) -> Option<Self>
    {
        index.checked_mul(element_size).and_then(|bytes| self.checked_add(bytes))
    }

    /// Parse `0x`-prefixed hex or plain decimal
    ///
    /// ```rust
    /// use matlens_core::types::Address;
    ///
    /// assert_eq!(Address::parse("0x1f"), Some(Address::from(31)));
    /// assert_eq!(Address::parse("42"), Some(Address::from(42)));
    /// assert_eq!(Address::parse("zz"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self>
    {
        let text = text.trim();
        let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok()?,
            None => text.parse().ok()?,
        };
        Some(Address(value))
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}
