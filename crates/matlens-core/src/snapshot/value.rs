//! Typed values of a snapshot image.

use std::fmt;
use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::types::{Address, ElementValue};

/// Scalar element types a snapshot can decode
///
/// Sizes follow the LP64 data model; all values are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType
{
    /// `bool`
    Bool,
    /// `char`, `signed char`, `int8_t`
    I8,
    /// `unsigned char`, `uint8_t`
    U8,
    /// `short`, `int16_t`
    I16,
    /// `unsigned short`, `uint16_t`
    U16,
    /// `int`, `int32_t`
    I32,
    /// `unsigned int`, `uint32_t`
    U32,
    /// `long`, `long long`, `int64_t`, `ptrdiff_t`
    I64,
    /// `unsigned long`, `unsigned long long`, `uint64_t`, `size_t`
    U64,
    /// `float`
    F32,
    /// `double`
    F64,
}

impl ScalarType
{
    /// Map a C/C++ type name to a scalar type
    ///
    /// ```rust
    /// use matlens_core::snapshot::ScalarType;
    ///
    /// assert_eq!(ScalarType::from_type_name("unsigned int"), Some(ScalarType::U32));
    /// assert_eq!(ScalarType::from_type_name("std::int64_t"), Some(ScalarType::I64));
    /// assert_eq!(ScalarType::from_type_name("std::string"), None);
    /// ```
    pub fn from_type_name(name: &str) -> Option<Self>
    {
        let name = name.trim();
        let name = name.strip_prefix("std::").unwrap_or(name);
        let scalar = match name {
            "bool" => ScalarType::Bool,
            "char" | "signed char" | "int8_t" => ScalarType::I8,
            "unsigned char" | "uint8_t" => ScalarType::U8,
            "short" | "short int" | "int16_t" => ScalarType::I16,
            "unsigned short" | "unsigned short int" | "uint16_t" => ScalarType::U16,
            "int" | "signed int" | "int32_t" => ScalarType::I32,
            "unsigned" | "unsigned int" | "uint32_t" => ScalarType::U32,
            "long" | "long int" | "long long" | "long long int" | "int64_t" | "ptrdiff_t" | "ssize_t" => {
                ScalarType::I64
            }
            "unsigned long" | "unsigned long int" | "unsigned long long" | "unsigned long long int" | "uint64_t"
            | "size_t" => ScalarType::U64,
            "float" => ScalarType::F32,
            "double" => ScalarType::F64,
            _ => return None,
        };
        Some(scalar)
    }

    /// Size of one element in bytes
    #[must_use]
    pub fn size(self) -> usize
    {
        match self {
            ScalarType::Bool | ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::I64 | ScalarType::U64 | ScalarType::F64 => 8,
        }
    }

    /// Decode one element from the front of `bytes`
    ///
    /// Returns `None` if `bytes` is shorter than [`size`](Self::size).
    pub fn decode(self, bytes: &[u8]) -> Option<Scalar>
    {
        let mut cursor = Cursor::new(bytes);
        let scalar = match self {
            ScalarType::Bool => Scalar::Bool(cursor.read_u8().ok()? != 0),
            ScalarType::I8 => Scalar::Signed(i64::from(cursor.read_i8().ok()?)),
            ScalarType::U8 => Scalar::Unsigned(u64::from(cursor.read_u8().ok()?)),
            ScalarType::I16 => Scalar::Signed(i64::from(cursor.read_i16::<LittleEndian>().ok()?)),
            ScalarType::U16 => Scalar::Unsigned(u64::from(cursor.read_u16::<LittleEndian>().ok()?)),
            ScalarType::I32 => Scalar::Signed(i64::from(cursor.read_i32::<LittleEndian>().ok()?)),
            ScalarType::U32 => Scalar::Unsigned(u64::from(cursor.read_u32::<LittleEndian>().ok()?)),
            ScalarType::I64 => Scalar::Signed(cursor.read_i64::<LittleEndian>().ok()?),
            ScalarType::U64 => Scalar::Unsigned(cursor.read_u64::<LittleEndian>().ok()?),
            ScalarType::F32 => Scalar::Float(f64::from(cursor.read_f32::<LittleEndian>().ok()?)),
            ScalarType::F64 => Scalar::Float(cursor.read_f64::<LittleEndian>().ok()?),
        };
        Some(scalar)
    }
}

/// A decoded scalar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar
{
    /// Boolean
    Bool(bool),
    /// Signed integer
    Signed(i64),
    /// Unsigned integer
    Unsigned(u64),
    /// Floating point (single precision is widened)
    Float(f64),
}

impl Scalar
{
    /// Whether the value compares `>= 0`
    ///
    /// `NaN` compares false, like it would in the target language.
    #[must_use]
    pub fn is_non_negative(&self) -> bool
    {
        match *self {
            Scalar::Bool(_) | Scalar::Unsigned(_) => true,
            Scalar::Signed(v) => v >= 0,
            Scalar::Float(v) => v >= 0.0,
        }
    }

    /// Integer value, if the scalar is integral and fits in `i64`
    #[must_use]
    pub fn as_i64(&self) -> Option<i64>
    {
        match *self {
            Scalar::Bool(v) => Some(i64::from(v)),
            Scalar::Signed(v) => Some(v),
            Scalar::Unsigned(v) => i64::try_from(v).ok(),
            Scalar::Float(_) => None,
        }
    }

    /// The element as the debugger would show it
    #[must_use]
    pub fn to_element(&self) -> ElementValue
    {
        ElementValue::numeric(self.to_string(), self.is_non_negative())
    }
}

impl fmt::Display for Scalar
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Signed(v) => write!(f, "{v}"),
            Scalar::Unsigned(v) => write!(f, "{v}"),
            Scalar::Float(v) if v.is_nan() => f.write_str("nan(0x8000000000000)"),
            Scalar::Float(v) if v.is_infinite() => f.write_str(if *v > 0.0 { "inf" } else { "-inf" }),
            Scalar::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A typed value in a snapshot
///
/// Mirrors what a debugger hands to a printer: a type name plus either a
/// scalar, a raw pointer, or named fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotValue
{
    /// Integer, boolean or floating-point value
    Scalar
    {
        /// Decorated type name
        type_name: String,
        /// The value
        value: Scalar,
    },
    /// Raw pointer
    Pointer
    {
        /// Decorated type name
        type_name: String,
        /// Pointee address
        address: Address,
    },
    /// Structure with named fields, in declaration order
    Struct
    {
        /// Decorated type name
        type_name: String,
        /// Field name and value pairs
        fields: Vec<(String, SnapshotValue)>,
    },
}

impl SnapshotValue
{
    /// A scalar value
    pub fn scalar(type_name: impl Into<String>, value: Scalar) -> Self
    {
        SnapshotValue::Scalar {
            type_name: type_name.into(),
            value,
        }
    }

    /// An `unsigned int` value, the library's size type
    pub fn unsigned(value: u32) -> Self
    {
        Self::scalar("unsigned int", Scalar::Unsigned(u64::from(value)))
    }

    /// A `long` value, the library's index type
    pub fn long(value: i64) -> Self
    {
        Self::scalar("long", Scalar::Signed(value))
    }

    /// A pointer value
    pub fn pointer(type_name: impl Into<String>, address: Address) -> Self
    {
        SnapshotValue::Pointer {
            type_name: type_name.into(),
            address,
        }
    }

    /// A structure value
    pub fn structure<N: Into<String>>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, SnapshotValue)>,
    ) -> Self
    {
        SnapshotValue::Struct {
            type_name: type_name.into(),
            fields: fields.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }

    /// Decorated type name
    pub fn type_name(&self) -> &str
    {
        match self {
            SnapshotValue::Scalar { type_name, .. }
            | SnapshotValue::Pointer { type_name, .. }
            | SnapshotValue::Struct { type_name, .. } => type_name,
        }
    }

    /// Named field of a structure
    pub fn field(&self, name: &str) -> Option<&SnapshotValue>
    {
        match self {
            SnapshotValue::Struct { fields, .. } => fields.iter().find(|(field, _)| field == name).map(|(_, v)| v),
            SnapshotValue::Scalar { .. } | SnapshotValue::Pointer { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_decode_little_endian()
    {
        assert_eq!(ScalarType::I32.decode(&(-3i32).to_le_bytes()), Some(Scalar::Signed(-3)));
        assert_eq!(ScalarType::U16.decode(&[0x34, 0x12]), Some(Scalar::Unsigned(0x1234)));
        assert_eq!(ScalarType::F64.decode(&2.5f64.to_le_bytes()), Some(Scalar::Float(2.5)));
        assert_eq!(ScalarType::F32.decode(&0.5f32.to_le_bytes()), Some(Scalar::Float(0.5)));
        assert_eq!(ScalarType::I64.decode(&[0; 4]), None);
    }

    #[test]
    fn test_native_formatting()
    {
        assert_eq!(Scalar::Float(1.0).to_string(), "1");
        assert_eq!(Scalar::Float(-0.25).to_string(), "-0.25");
        assert_eq!(Scalar::Signed(-3).to_string(), "-3");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Float(f64::NEG_INFINITY).to_string(), "-inf");
    }

    #[test]
    fn test_sign()
    {
        assert!(Scalar::Signed(0).is_non_negative());
        assert!(!Scalar::Signed(-1).is_non_negative());
        assert!(!Scalar::Float(f64::NAN).is_non_negative());
        assert!(Scalar::Unsigned(u64::MAX).is_non_negative());
        assert_eq!(Scalar::Unsigned(u64::MAX).as_i64(), None);
    }
}
