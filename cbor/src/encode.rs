/*!
An append-only CBOR encoder.

Integer headers always use the shortest argument width that holds the value.
Floats are written at the width asked for. Indefinite-length arrays and maps
are framed by `*_begin`/`*_end` pairs which the caller is responsible for
balancing.
*/

use super::error::EncodeError;
use super::types::*;
use alloc::vec::Vec;
use num_traits::PrimInt;

#[derive(Debug, Clone)]
pub struct Encoder {
    data: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// The bytes written so far.
    pub fn buffer(&self) -> &[u8] {
        &self.data
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ensure(&mut self, bytes: usize) {
        let needed = self.data.len() + bytes;
        if needed > self.data.capacity() {
            // Double, or jump straight to what is needed if that is larger
            let target = needed.max(self.data.capacity() * 2);
            self.data.reserve_exact(target - self.data.len());
        }
    }

    fn emit(&mut self, b: &[u8]) {
        self.ensure(b.len());
        self.data.extend_from_slice(b);
    }

    pub fn write_u8(&mut self, x: u8) -> &mut Self {
        self.emit(&[x]);
        self
    }

    pub fn write_u16(&mut self, x: u16) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_u32(&mut self, x: u32) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_u64(&mut self, x: u64) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_i8(&mut self, x: i8) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_i16(&mut self, x: i16) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_i32(&mut self, x: i32) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_i64(&mut self, x: i64) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_f32(&mut self, x: f32) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    pub fn write_f64(&mut self, x: f64) -> &mut Self {
        self.emit(&x.to_be_bytes());
        self
    }

    /// Append bytes verbatim, without a CBOR header.
    pub fn write_raw(&mut self, data: &[u8]) -> &mut Self {
        self.emit(data);
        self
    }

    fn write_type_and_len(&mut self, major: u8, len: u64) {
        let major = major << 5;
        if len < 24 {
            self.write_u8(major | len as u8);
        } else if len <= u8::MAX as u64 {
            self.write_u8(major | MINOR_ONE_BYTE).write_u8(len as u8);
        } else if len <= u16::MAX as u64 {
            self.write_u8(major | MINOR_TWO_BYTES).write_u16(len as u16);
        } else if len <= u32::MAX as u64 {
            self.write_u8(major | MINOR_FOUR_BYTES).write_u32(len as u32);
        } else {
            self.write_u8(major | MINOR_EIGHT_BYTES).write_u64(len);
        }
    }

    fn write_simple(&mut self, minor: u8) -> &mut Self {
        self.write_u8((7 << 5) | minor)
    }

    /// Write any unsigned integer, in the shortest form.
    pub fn unsigned(&mut self, x: u64) -> &mut Self {
        self.write_type_and_len(0, x);
        self
    }

    /// Write any signed integer, in the shortest form.
    pub fn int(&mut self, x: i64) -> &mut Self {
        if x >= 0 {
            self.write_type_and_len(0, x as u64);
        } else {
            // -1 - x never overflows for negative x
            self.write_type_and_len(1, (-1 - x) as u64);
        }
        self
    }

    fn checked_unsigned<T, U>(
        &mut self,
        x: T,
        target: Type,
        narrow: fn(&T) -> Option<U>,
    ) -> Result<&mut Self, EncodeError>
    where
        T: PrimInt,
        U: Into<u64>,
    {
        let v = narrow(&x).ok_or(EncodeError::OutOfRange(target))?;
        Ok(self.unsigned(v.into()))
    }

    fn checked_signed<T, U>(
        &mut self,
        x: T,
        target: Type,
        narrow: fn(&T) -> Option<U>,
    ) -> Result<&mut Self, EncodeError>
    where
        T: PrimInt,
        U: Into<i64>,
    {
        let v = narrow(&x).ok_or(EncodeError::OutOfRange(target))?;
        Ok(self.int(v.into()))
    }

    pub fn u8<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_unsigned(x, Type::UInt8, T::to_u8)
    }

    pub fn u16<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_unsigned(x, Type::UInt16, T::to_u16)
    }

    pub fn u32<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_unsigned(x, Type::UInt32, T::to_u32)
    }

    pub fn u64<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_unsigned(x, Type::UInt64, T::to_u64)
    }

    pub fn i8<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_signed(x, Type::Int8, T::to_i8)
    }

    pub fn i16<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_signed(x, Type::Int16, T::to_i16)
    }

    pub fn i32<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_signed(x, Type::Int32, T::to_i32)
    }

    pub fn i64<T: PrimInt>(&mut self, x: T) -> Result<&mut Self, EncodeError> {
        self.checked_signed(x, Type::Int64, T::to_i64)
    }

    pub fn f32(&mut self, x: f32) -> &mut Self {
        self.write_simple(MINOR_FOUR_BYTES).write_f32(x)
    }

    pub fn f64(&mut self, x: f64) -> &mut Self {
        self.write_simple(MINOR_EIGHT_BYTES).write_f64(x)
    }

    pub fn bool(&mut self, x: bool) -> &mut Self {
        self.write_simple(if x { MINOR_TRUE } else { MINOR_FALSE })
    }

    pub fn null(&mut self) -> &mut Self {
        self.write_simple(MINOR_NULL)
    }

    pub fn undefined(&mut self) -> &mut Self {
        self.write_simple(MINOR_UNDEFINED)
    }

    pub fn bytes(&mut self, x: &[u8]) -> &mut Self {
        self.write_type_and_len(2, x.len() as u64);
        self.write_raw(x)
    }

    pub fn text(&mut self, x: &str) -> &mut Self {
        self.write_type_and_len(3, x.len() as u64);
        self.write_raw(x.as_bytes())
    }

    /// Write a definite-length array header for `len` items.
    pub fn array(&mut self, len: usize) -> &mut Self {
        self.write_type_and_len(4, len as u64);
        self
    }

    pub fn array_begin(&mut self) -> &mut Self {
        self.write_u8((4 << 5) | MINOR_INDEFINITE)
    }

    pub fn array_end(&mut self) -> &mut Self {
        self.write_u8(BREAK_BYTE)
    }

    /// Write a definite-length map header for `len` key/value pairs.
    pub fn object(&mut self, len: usize) -> &mut Self {
        self.write_type_and_len(5, len as u64);
        self
    }

    pub fn object_begin(&mut self) -> &mut Self {
        self.write_u8((5 << 5) | MINOR_INDEFINITE)
    }

    pub fn object_end(&mut self) -> &mut Self {
        self.write_u8(BREAK_BYTE)
    }
}
