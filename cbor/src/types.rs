/*!
The CBOR type taxonomy.

CBOR only distinguishes eight major types on the wire. The decoder and
encoder work with a finer set of pseudo-types, so that a caller can ask for
a `u8` rather than "some unsigned integer", and `Type::major` folds that
finer set back down to the wire-level major type.
*/

use thiserror::Error;

/// Additional-info value meaning "a 1-byte argument follows".
pub const MINOR_ONE_BYTE: u8 = 24;
/// Additional-info value meaning "a 2-byte argument follows".
pub const MINOR_TWO_BYTES: u8 = 25;
/// Additional-info value meaning "a 4-byte argument follows".
pub const MINOR_FOUR_BYTES: u8 = 26;
/// Additional-info value meaning "an 8-byte argument follows".
pub const MINOR_EIGHT_BYTES: u8 = 27;
/// Additional-info value marking an indefinite-length item, or BREAK under major 7.
pub const MINOR_INDEFINITE: u8 = 31;

pub const MINOR_FALSE: u8 = 20;
pub const MINOR_TRUE: u8 = 21;
pub const MINOR_NULL: u8 = 22;
pub const MINOR_UNDEFINED: u8 = 23;

/// The standalone BREAK byte (major 7, minor 31).
pub const BREAK_BYTE: u8 = (7 << 5) | MINOR_INDEFINITE;

/// Returned by [`major`] for a numeric tag that is not one of [`Type`]'s.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown CBOR type tag {0}")]
pub struct UnknownType(pub u8);

/// The pseudo-types understood by the decoder and encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Type {
    UInt8 = 0,
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Int8 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    Bytes = 8,
    Text = 9,
    Array = 10,
    Object = 11,
    Tagged = 12,
    Bool = 13,
    Null = 14,
    Undefined = 15,
    Break = 16,
    Float16 = 17,
    Float32 = 18,
    Float64 = 19,
}

impl Type {
    /// The CBOR major type (0..=7) this pseudo-type is carried as.
    ///
    /// Signed widths map to major type 1, which is only correct for negative
    /// values; non-negative signed values are written as major type 0.
    pub fn major(self) -> u8 {
        match self {
            Type::UInt8 | Type::UInt16 | Type::UInt32 | Type::UInt64 => 0,
            Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64 => 1,
            Type::Bytes => 2,
            Type::Text => 3,
            Type::Array => 4,
            Type::Object => 5,
            Type::Tagged => 6,
            Type::Bool
            | Type::Null
            | Type::Undefined
            | Type::Break
            | Type::Float16
            | Type::Float32
            | Type::Float64 => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::UInt8 => "u8",
            Type::UInt16 => "u16",
            Type::UInt32 => "u32",
            Type::UInt64 => "u64",
            Type::Int8 => "i8",
            Type::Int16 => "i16",
            Type::Int32 => "i32",
            Type::Int64 => "i64",
            Type::Bytes => "bytes",
            Type::Text => "text",
            Type::Array => "array",
            Type::Object => "object",
            Type::Tagged => "tagged",
            Type::Bool => "bool",
            Type::Null => "null",
            Type::Undefined => "undefined",
            Type::Break => "break",
            Type::Float16 => "f16",
            Type::Float32 => "f32",
            Type::Float64 => "f64",
        }
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Type {
    type Error = UnknownType;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Ok(match tag {
            0 => Type::UInt8,
            1 => Type::UInt16,
            2 => Type::UInt32,
            3 => Type::UInt64,
            4 => Type::Int8,
            5 => Type::Int16,
            6 => Type::Int32,
            7 => Type::Int64,
            8 => Type::Bytes,
            9 => Type::Text,
            10 => Type::Array,
            11 => Type::Object,
            12 => Type::Tagged,
            13 => Type::Bool,
            14 => Type::Null,
            15 => Type::Undefined,
            16 => Type::Break,
            17 => Type::Float16,
            18 => Type::Float32,
            19 => Type::Float64,
            _ => return Err(UnknownType(tag)),
        })
    }
}

/// Classify a numeric pseudo-type tag into its CBOR major type.
pub fn major(tag: u8) -> Result<u8, UnknownType> {
    Type::try_from(tag).map(Type::major)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integer_widths_share_a_major() {
        for t in [Type::UInt8, Type::UInt16, Type::UInt32, Type::UInt64] {
            assert_eq!(t.major(), 0);
        }
        for t in [Type::Int8, Type::Int16, Type::Int32, Type::Int64] {
            assert_eq!(t.major(), 1);
        }
    }

    #[test]
    fn simple_values_are_major_seven() {
        for t in [
            Type::Bool,
            Type::Null,
            Type::Undefined,
            Type::Break,
            Type::Float16,
            Type::Float32,
            Type::Float64,
        ] {
            assert_eq!(t.major(), 7);
        }
    }

    #[test]
    fn numeric_tags() {
        assert_eq!(major(Type::Bytes as u8), Ok(2));
        assert_eq!(major(Type::Object as u8), Ok(5));
        assert_eq!(major(Type::Tagged as u8), Ok(6));
        assert_eq!(major(20), Err(UnknownType(20)));
        assert_eq!(major(255), Err(UnknownType(255)));
        assert_eq!(Type::try_from(19), Ok(Type::Float64));
    }

    #[test]
    fn break_byte() {
        assert_eq!(BREAK_BYTE, 0xFF);
    }
}
