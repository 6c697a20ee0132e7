/*!
A cursor-based CBOR decoder.

[`Decoder`] walks an immutable byte buffer one item at a time. The caller
knows the schema it expects and calls the matching reader; a mismatch is
reported as a [`DecodeError`], never coerced. Every length a header declares
is checked against the decoder's [`Config`] before any payload is touched,
and [`Decoder::skip`] refuses to recurse past `max_depth`.
*/

use super::config::Config;
use super::error::{DecodeError, ErrorKind, Extra};
use super::types::*;
use alloc::format;
use num_traits::NumCast;
use tracing::debug;

pub use super::decode_seq::{ArrayItems, ObjectEntries, Sequence};

const NULL_BYTE: u8 = (7 << 5) | MINOR_NULL;
const UNDEFINED_BYTE: u8 = (7 << 5) | MINOR_UNDEFINED;

/// The count declared by an array or map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Number of items (arrays) or key/value pairs (maps).
    Definite(usize),
    /// Items follow until a BREAK byte.
    Indefinite,
}

impl Length {
    pub fn definite(self) -> Option<usize> {
        match self {
            Length::Definite(n) => Some(n),
            Length::Indefinite => None,
        }
    }
}

/// One decoded item header. `value` is the argument for minors 0..=27, and 0
/// for indefinite-length items and BREAK.
#[derive(Debug, Clone, Copy)]
struct TypeInfo {
    byte: u8,
    major: u8,
    minor: u8,
    value: u64,
}

impl TypeInfo {
    fn is_indefinite(&self) -> bool {
        self.minor == MINOR_INDEFINITE
    }

    fn classify(&self) -> Result<Type, DecodeError> {
        let by_width = |t: [Type; 4]| match self.minor {
            MINOR_TWO_BYTES => t[1],
            MINOR_FOUR_BYTES => t[2],
            MINOR_EIGHT_BYTES => t[3],
            _ => t[0],
        };
        Ok(match (self.major, self.minor) {
            (0, _) => by_width([Type::UInt8, Type::UInt16, Type::UInt32, Type::UInt64]),
            (1, _) => by_width([Type::Int8, Type::Int16, Type::Int32, Type::Int64]),
            (2, _) => Type::Bytes,
            (3, _) => Type::Text,
            (4, _) => Type::Array,
            (5, _) => Type::Object,
            (6, _) => Type::Tagged,
            (7, MINOR_FALSE | MINOR_TRUE) => Type::Bool,
            (7, MINOR_NULL) => Type::Null,
            (7, MINOR_UNDEFINED) => Type::Undefined,
            (7, MINOR_TWO_BYTES) => Type::Float16,
            (7, MINOR_FOUR_BYTES) => Type::Float32,
            (7, MINOR_EIGHT_BYTES) => Type::Float64,
            (7, MINOR_INDEFINITE) => Type::Break,
            // Well-formed, but unassigned simple values have no pseudo-type
            _ => {
                return Err(DecodeError::new(
                    ErrorKind::UnexpectedType,
                    format!("unassigned simple({})", self.value),
                )
                .with_extra(Extra::Byte(self.byte)));
            }
        })
    }
}

#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    data: &'a [u8],
    offset: usize,
    config: Config,
    // Sequences currently open on this decoder
    depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, Config::default())
    }

    pub fn with_config(data: &'a [u8], config: Config) -> Self {
        Self {
            data,
            offset: 0,
            config,
            depth: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Offset of the cursor from the start of the buffer.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, bytes: usize) -> Result<&'a [u8], DecodeError> {
        let available = self.remaining();
        if bytes > available {
            return Err(DecodeError::eof(bytes, available));
        }
        let start = self.offset;
        self.offset += bytes;
        Ok(&self.data[start..self.offset])
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut b = [0u8; N];
        b.copy_from_slice(self.take(N)?);
        Ok(b)
    }

    fn peek_byte(&self) -> Result<u8, DecodeError> {
        self.data
            .get(self.offset)
            .copied()
            .ok_or_else(|| DecodeError::eof(1, 0))
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.take_array::<1>().map(|b| b[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.take_array().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.take_array().map(u32::from_be_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.take_array().map(u64::from_be_bytes)
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        self.take_array().map(i8::from_be_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        self.take_array().map(i16::from_be_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.take_array().map(i32::from_be_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.take_array().map(i64::from_be_bytes)
    }

    /// Read a big-endian IEEE 754 half, widened to `f32`.
    pub fn read_f16(&mut self) -> Result<f32, DecodeError> {
        self.take_array()
            .map(|b| half::f16::from_be_bytes(b).to_f32())
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.take_array().map(f32::from_be_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.take_array().map(f64::from_be_bytes)
    }

    /// Borrow the next `bytes` bytes of the buffer verbatim.
    pub fn read_raw(&mut self, bytes: usize) -> Result<&'a [u8], DecodeError> {
        self.take(bytes)
    }

    fn read_type_info(&mut self) -> Result<TypeInfo, DecodeError> {
        let byte = self.read_u8()?;
        let (major, minor) = (byte >> 5, byte & 0x1F);
        let value = match minor {
            0..=23 => minor as u64,
            MINOR_ONE_BYTE => {
                let v = self.read_u8()?;
                if major == 7 && v < 32 {
                    // Simple values below 32 must use the single-byte form
                    return Err(DecodeError::invalid_type(byte));
                }
                v as u64
            }
            MINOR_TWO_BYTES => self.read_u16()? as u64,
            MINOR_FOUR_BYTES => self.read_u32()? as u64,
            MINOR_EIGHT_BYTES => self.read_u64()?,
            MINOR_INDEFINITE if matches!(major, 2..=5 | 7) => 0,
            _ => return Err(DecodeError::invalid_type(byte)),
        };
        Ok(TypeInfo {
            byte,
            major,
            minor,
            value,
        })
    }

    fn peek_type_info(&self) -> Result<TypeInfo, DecodeError> {
        self.clone().read_type_info()
    }

    fn type_info_with_assert(
        &mut self,
        major: u8,
        expected: &str,
    ) -> Result<TypeInfo, DecodeError> {
        let info = self.read_type_info()?;
        if info.major != major {
            return Err(unexpected(expected, &info));
        }
        Ok(info)
    }

    fn check_length(&self, declared: u64) -> Result<usize, DecodeError> {
        match usize::try_from(declared) {
            Ok(len) if len <= self.config.max_length => Ok(len),
            _ => {
                debug!(
                    declared,
                    max_length = self.config.max_length,
                    "Rejecting over-long CBOR item"
                );
                Err(DecodeError::too_long(declared, self.config.max_length))
            }
        }
    }

    fn definite_length(&self, info: &TypeInfo, what: &str) -> Result<usize, DecodeError> {
        if info.is_indefinite() {
            return Err(DecodeError::new(
                ErrorKind::UnexpectedType,
                format!("indefinite-length {what} is not supported"),
            )
            .with_extra(Extra::Byte(info.byte)));
        }
        self.check_length(info.value)
    }

    /// Classify the next item without consuming it.
    pub fn peek_type(&self) -> Result<Type, DecodeError> {
        self.peek_type_info()?.classify()
    }

    /// Read an unsigned integer of any header width.
    pub fn unsigned(&mut self) -> Result<u64, DecodeError> {
        self.type_info_with_assert(0, "unsigned integer")
            .map(|info| info.value)
    }

    /// Read an unsigned or negative integer that fits in an `i64`.
    pub fn int(&mut self) -> Result<i64, DecodeError> {
        let info = self.read_type_info()?;
        let magnitude = |v: u64| {
            i64::try_from(v).map_err(|_| DecodeError::overflow(Type::Int64, v))
        };
        match info.major {
            0 => magnitude(info.value),
            1 => magnitude(info.value).map(|n| -1 - n),
            _ => Err(unexpected("integer", &info)),
        }
    }

    fn narrow_unsigned<T: NumCast>(&mut self, target: Type) -> Result<T, DecodeError> {
        let v = self.unsigned()?;
        <T as NumCast>::from(v).ok_or_else(|| DecodeError::overflow(target, v))
    }

    fn narrow_signed<T: NumCast>(&mut self, target: Type) -> Result<T, DecodeError> {
        let v = self.int()?;
        <T as NumCast>::from(v).ok_or_else(|| DecodeError::overflow(target, v.unsigned_abs()))
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        self.narrow_unsigned(Type::UInt8)
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        self.narrow_unsigned(Type::UInt16)
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        self.narrow_unsigned(Type::UInt32)
    }

    pub fn u64(&mut self) -> Result<u64, DecodeError> {
        self.unsigned()
    }

    pub fn i8(&mut self) -> Result<i8, DecodeError> {
        self.narrow_signed(Type::Int8)
    }

    pub fn i16(&mut self) -> Result<i16, DecodeError> {
        self.narrow_signed(Type::Int16)
    }

    pub fn i32(&mut self) -> Result<i32, DecodeError> {
        self.narrow_signed(Type::Int32)
    }

    pub fn i64(&mut self) -> Result<i64, DecodeError> {
        self.int()
    }

    /// Read a half-precision float, widened to `f32`.
    pub fn f16(&mut self) -> Result<f32, DecodeError> {
        let info = self.type_info_with_assert(7, "f16")?;
        match info.minor {
            MINOR_TWO_BYTES => Ok(half::f16::from_bits(info.value as u16).to_f32()),
            _ => Err(unexpected("f16", &info)),
        }
    }

    /// Read a half or single precision float.
    pub fn f32(&mut self) -> Result<f32, DecodeError> {
        let info = self.type_info_with_assert(7, "f32")?;
        match info.minor {
            MINOR_TWO_BYTES => Ok(half::f16::from_bits(info.value as u16).to_f32()),
            MINOR_FOUR_BYTES => Ok(f32::from_bits(info.value as u32)),
            _ => Err(unexpected("f32", &info)),
        }
    }

    /// Read a float of any width.
    pub fn f64(&mut self) -> Result<f64, DecodeError> {
        let info = self.type_info_with_assert(7, "f64")?;
        match info.minor {
            MINOR_TWO_BYTES => Ok(half::f16::from_bits(info.value as u16).to_f64()),
            MINOR_FOUR_BYTES => Ok(f32::from_bits(info.value as u32).into()),
            MINOR_EIGHT_BYTES => Ok(f64::from_bits(info.value)),
            _ => Err(unexpected("f64", &info)),
        }
    }

    pub fn bool(&mut self) -> Result<bool, DecodeError> {
        let info = self.type_info_with_assert(7, "bool")?;
        match info.minor {
            MINOR_FALSE => Ok(false),
            MINOR_TRUE => Ok(true),
            _ => Err(unexpected("bool", &info)),
        }
    }

    /// Read a definite-length byte string.
    ///
    /// The cursor is left after the payload, which is returned borrowed from
    /// the input buffer.
    pub fn bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let info = self.type_info_with_assert(2, "bytes")?;
        let len = self.definite_length(&info, "byte string")?;
        self.take(len)
    }

    /// Read a definite-length UTF-8 text string.
    pub fn text(&mut self) -> Result<&'a str, DecodeError> {
        let info = self.type_info_with_assert(3, "text")?;
        let len = self.definite_length(&info, "text string")?;
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes).map_err(|e| {
            DecodeError::new(
                ErrorKind::UnexpectedType,
                format!("text string is not valid UTF-8: {e}"),
            )
        })
    }

    /// Read an array header.
    pub fn array(&mut self) -> Result<Length, DecodeError> {
        let info = self.type_info_with_assert(4, "array")?;
        self.aggregate_length(&info)
    }

    /// Read a map header. A definite length counts key/value pairs.
    pub fn object(&mut self) -> Result<Length, DecodeError> {
        let info = self.type_info_with_assert(5, "object")?;
        self.aggregate_length(&info)
    }

    fn aggregate_length(&self, info: &TypeInfo) -> Result<Length, DecodeError> {
        if info.is_indefinite() {
            Ok(Length::Indefinite)
        } else {
            self.check_length(info.value).map(Length::Definite)
        }
    }

    /// Read an array header and iterate its items.
    pub fn array_items(&mut self) -> Result<ArrayItems<'_, 'a>, DecodeError> {
        let len = self.array()?;
        Ok(Sequence::new(self, len))
    }

    /// Read a map header and iterate its key/value pairs.
    pub fn object_entries(&mut self) -> Result<ObjectEntries<'_, 'a>, DecodeError> {
        let len = self.object()?;
        Ok(Sequence::new(self, len))
    }

    /// Consume a BREAK byte if one is next, reporting whether it was.
    ///
    /// Callers walking an indefinite-length array or map by hand check this
    /// before every item.
    pub fn at_break(&mut self) -> Result<bool, DecodeError> {
        if self.peek_byte()? == BREAK_BYTE {
            self.offset += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Decode a value that may be absent.
    ///
    /// A CBOR `null` or `undefined` is consumed and `None` returned without
    /// calling `f`; anything else is handed to `f`.
    pub fn optional<T, F, E>(&mut self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<DecodeError>,
    {
        match self.peek_byte()? {
            NULL_BYTE | UNDEFINED_BYTE => {
                self.offset += 1;
                Ok(None)
            }
            _ => f(self).map(Some),
        }
    }

    /// Discard the next complete value, whatever its shape.
    ///
    /// Returns `false` only when the buffer is already exhausted; malformed
    /// or over-limit input is an error. Nesting is counted from the number of
    /// [`Sequence`]s currently open on this decoder.
    pub fn skip(&mut self) -> Result<bool, DecodeError> {
        if self.is_empty() {
            debug!(offset = self.offset, "Nothing left to skip");
            return Ok(false);
        }
        self.skip_value(self.depth)?;
        Ok(true)
    }

    pub(crate) fn enter_sequence(&mut self) -> usize {
        self.depth += 1;
        self.depth
    }

    pub(crate) fn leave_sequence(&mut self, level: usize) {
        self.depth = level - 1;
    }

    pub(crate) fn skip_value(&mut self, level: usize) -> Result<(), DecodeError> {
        let info = self.read_type_info()?;
        match (info.major, info.minor) {
            (0 | 1, _) => Ok(()),
            (2 | 3, MINOR_INDEFINITE) => self.skip_chunks(&info),
            (2 | 3, _) => {
                let len = self.check_length(info.value)?;
                self.take(len).map(|_| ())
            }
            (4 | 5, _) => {
                let level = self.enter(level)?;
                let items = if info.major == 5 { 2 } else { 1 };
                if info.is_indefinite() {
                    self.skip_until_break(level, items)
                } else {
                    for _ in 0..self.check_length(info.value)? {
                        for _ in 0..items {
                            self.skip_value(level)?;
                        }
                    }
                    Ok(())
                }
            }
            (6, _) => {
                let level = self.enter(level)?;
                self.skip_value(level)
            }
            (7, MINOR_INDEFINITE) => Err(DecodeError::unexpected("a value", Type::Break)),
            // Floats and simple values are fully consumed with their header
            _ => Ok(()),
        }
    }

    fn enter(&self, level: usize) -> Result<usize, DecodeError> {
        if level >= self.config.max_depth {
            debug!(
                max_depth = self.config.max_depth,
                offset = self.offset,
                "Rejecting over-nested CBOR item"
            );
            return Err(DecodeError::too_nested(self.config.max_depth));
        }
        Ok(level + 1)
    }

    fn skip_until_break(&mut self, level: usize, items: usize) -> Result<(), DecodeError> {
        while !self.at_break()? {
            for _ in 0..items {
                self.skip_value(level)?;
            }
        }
        Ok(())
    }

    fn skip_chunks(&mut self, outer: &TypeInfo) -> Result<(), DecodeError> {
        while !self.at_break()? {
            let chunk = self.read_type_info()?;
            if chunk.major != outer.major || chunk.is_indefinite() {
                return Err(DecodeError::new(
                    ErrorKind::UnexpectedType,
                    "invalid chunk in indefinite-length string",
                )
                .with_extra(Extra::Byte(chunk.byte)));
            }
            let len = self.check_length(chunk.value)?;
            self.take(len)?;
        }
        Ok(())
    }
}

fn unexpected(expected: &str, info: &TypeInfo) -> DecodeError {
    match info.classify() {
        Ok(found) => DecodeError::unexpected(expected, found),
        Err(e) => DecodeError::new(
            e.kind(),
            format!("expected {expected}, found {}", e.message()),
        )
        .with_extra(Extra::Byte(info.byte)),
    }
}
