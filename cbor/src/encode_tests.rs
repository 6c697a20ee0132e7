use super::decode::Decoder;
use super::encode::*;
use super::error::EncodeError;
use super::types::Type;
use hex_literal::hex;

fn encode<F>(f: F) -> alloc::vec::Vec<u8>
where
    F: FnOnce(&mut Encoder) -> Result<(), EncodeError>,
{
    let mut e = Encoder::new();
    f(&mut e).unwrap();
    e.build()
}

#[test]
fn rfc_tests() {
    // RFC 8949, Appendix A:
    // https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a

    assert_eq!(*encode(|e| e.u8(0).map(drop)), hex!("00"));
    assert_eq!(*encode(|e| e.u8(1).map(drop)), hex!("01"));
    assert_eq!(*encode(|e| e.u8(10).map(drop)), hex!("0a"));
    assert_eq!(*encode(|e| e.u8(23).map(drop)), hex!("17"));
    assert_eq!(*encode(|e| e.u8(24).map(drop)), hex!("1818"));
    assert_eq!(*encode(|e| e.u8(25).map(drop)), hex!("1819"));
    assert_eq!(*encode(|e| e.u8(100).map(drop)), hex!("1864"));
    assert_eq!(*encode(|e| e.u16(1000).map(drop)), hex!("1903e8"));
    assert_eq!(*encode(|e| e.u32(1000000).map(drop)), hex!("1a000f4240"));
    assert_eq!(
        *encode(|e| e.u64(1000000000000u64).map(drop)),
        hex!("1b000000e8d4a51000")
    );
    assert_eq!(*Encoder::new().unsigned(u64::MAX).buffer(), hex!("1bffffffffffffffff"));

    assert_eq!(*encode(|e| e.i8(-1).map(drop)), hex!("20"));
    assert_eq!(*encode(|e| e.i8(-10).map(drop)), hex!("29"));
    assert_eq!(*encode(|e| e.i8(-100).map(drop)), hex!("3863"));
    assert_eq!(*encode(|e| e.i16(-1000).map(drop)), hex!("3903e7"));

    /* Floats are written at the width requested, never shortened */
    assert_eq!(*Encoder::new().f64(1.1).buffer(), hex!("fb3ff199999999999a"));
    assert_eq!(*Encoder::new().f32(100000.0).buffer(), hex!("fa47c35000"));
    assert_eq!(
        *Encoder::new().f32(3.4028234663852886e+38).buffer(),
        hex!("fa7f7fffff")
    );
    assert_eq!(*Encoder::new().f64(1.0e+300).buffer(), hex!("fb7e37e43c8800759c"));
    assert_eq!(*Encoder::new().f64(-4.1).buffer(), hex!("fbc010666666666666"));
    assert_eq!(*Encoder::new().f32(f32::INFINITY).buffer(), hex!("fa7f800000"));
    assert_eq!(*Encoder::new().f32(f32::NAN).buffer(), hex!("fa7fc00000"));
    assert_eq!(*Encoder::new().f32(f32::NEG_INFINITY).buffer(), hex!("faff800000"));
    assert_eq!(*Encoder::new().f64(f64::INFINITY).buffer(), hex!("fb7ff0000000000000"));
    assert_eq!(*Encoder::new().f64(f64::NAN).buffer(), hex!("fb7ff8000000000000"));
    assert_eq!(
        *Encoder::new().f64(f64::NEG_INFINITY).buffer(),
        hex!("fbfff0000000000000")
    );

    assert_eq!(*Encoder::new().bool(false).buffer(), hex!("f4"));
    assert_eq!(*Encoder::new().bool(true).buffer(), hex!("f5"));
    assert_eq!(*Encoder::new().null().buffer(), hex!("f6"));
    assert_eq!(*Encoder::new().undefined().buffer(), hex!("f7"));

    assert_eq!(*Encoder::new().bytes(&[]).buffer(), hex!("40"));
    assert_eq!(
        *Encoder::new().bytes(&hex!("01020304")).buffer(),
        hex!("4401020304")
    );
    assert_eq!(*Encoder::new().text("").buffer(), hex!("60"));
    assert_eq!(*Encoder::new().text("a").buffer(), hex!("6161"));
    assert_eq!(*Encoder::new().text("IETF").buffer(), hex!("6449455446"));
    assert_eq!(*Encoder::new().text("\"\\").buffer(), hex!("62225c"));
    assert_eq!(*Encoder::new().text("\u{00fc}").buffer(), hex!("62c3bc"));
    assert_eq!(*Encoder::new().text("\u{6c34}").buffer(), hex!("63e6b0b4"));
    assert_eq!(
        *Encoder::new().text("\u{10151}").buffer(),
        hex!("64f0908591")
    );

    assert_eq!(*Encoder::new().array(0).buffer(), hex!("80"));
    assert_eq!(
        *Encoder::new()
            .array(3)
            .unsigned(1)
            .unsigned(2)
            .unsigned(3)
            .buffer(),
        hex!("83010203")
    );
    assert_eq!(
        *Encoder::new()
            .array(3)
            .unsigned(1)
            .array(2)
            .unsigned(2)
            .unsigned(3)
            .array(2)
            .unsigned(4)
            .unsigned(5)
            .buffer(),
        hex!("8301820203820405")
    );
    assert_eq!(
        *encode(|e| {
            e.array(25);
            for i in 1..=25 {
                e.u8(i)?;
            }
            Ok(())
        }),
        hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819")
    );
    assert_eq!(*Encoder::new().object(0).buffer(), hex!("a0"));
    assert_eq!(
        *Encoder::new()
            .object(2)
            .unsigned(1)
            .unsigned(2)
            .unsigned(3)
            .unsigned(4)
            .buffer(),
        hex!("a201020304")
    );
    assert_eq!(
        *Encoder::new()
            .object(2)
            .text("a")
            .unsigned(1)
            .text("b")
            .array(2)
            .unsigned(2)
            .unsigned(3)
            .buffer(),
        hex!("a26161016162820203")
    );
    assert_eq!(
        *Encoder::new()
            .array(2)
            .text("a")
            .object(1)
            .text("b")
            .text("c")
            .buffer(),
        hex!("826161a161626163")
    );

    assert_eq!(
        *Encoder::new().array_begin().array_end().buffer(),
        hex!("9fff")
    );
    assert_eq!(
        *Encoder::new()
            .array_begin()
            .unsigned(1)
            .array(2)
            .unsigned(2)
            .unsigned(3)
            .array_begin()
            .unsigned(4)
            .unsigned(5)
            .array_end()
            .array_end()
            .buffer(),
        hex!("9f018202039f0405ffff")
    );
    assert_eq!(
        *Encoder::new()
            .object_begin()
            .text("Fun")
            .bool(true)
            .text("Amt")
            .int(-2)
            .object_end()
            .buffer(),
        hex!("bf6346756ef563416d7421ff")
    );
    assert_eq!(
        *Encoder::new()
            .object_begin()
            .text("a")
            .unsigned(1)
            .text("b")
            .array_begin()
            .unsigned(2)
            .unsigned(3)
            .array_end()
            .object_end()
            .buffer(),
        hex!("bf61610161629f0203ffff")
    );
}

#[test]
fn minimal_headers() {
    assert_eq!(Encoder::new().unsigned(23).len(), 1);
    assert_eq!(*Encoder::new().unsigned(24).buffer(), hex!("1818"));
    assert_eq!(*Encoder::new().unsigned(255).buffer(), hex!("18ff"));
    assert_eq!(*Encoder::new().unsigned(256).buffer(), hex!("190100"));
    assert_eq!(*Encoder::new().unsigned(65535).buffer(), hex!("19ffff"));
    assert_eq!(*Encoder::new().unsigned(65536).buffer(), hex!("1a00010000"));
    assert_eq!(
        *Encoder::new().unsigned(u32::MAX as u64 + 1).buffer(),
        hex!("1b0000000100000000")
    );

    // Width names bound the value, they do not pick the header width
    assert_eq!(*encode(|e| e.u64(1u64).map(drop)), hex!("01"));
    assert_eq!(*encode(|e| e.i64(-24i64).map(drop)), hex!("37"));
    assert_eq!(*encode(|e| e.i64(-25i64).map(drop)), hex!("3818"));
    assert_eq!(*encode(|e| e.i16(300).map(drop)), hex!("19012c"));

    assert_eq!(*Encoder::new().int(i64::MIN).buffer(), hex!("3b7fffffffffffffff"));
    assert_eq!(*Encoder::new().int(i64::MAX).buffer(), hex!("1b7fffffffffffffff"));

    // Length headers use the same rule
    assert_eq!(
        Encoder::new().bytes(&[0u8; 24]).buffer()[..2],
        hex!("5818")
    );
    assert_eq!(Encoder::new().array(1000).buffer(), hex!("9903e8"));
    assert_eq!(Encoder::new().object(70000).buffer(), hex!("ba00011170"));
}

#[test]
fn out_of_range() {
    let mut e = Encoder::new();
    assert_eq!(Err(EncodeError::OutOfRange(Type::UInt8)), e.u8(300).map(drop));
    assert_eq!(Err(EncodeError::OutOfRange(Type::UInt8)), e.u8(-1).map(drop));
    assert_eq!(Err(EncodeError::OutOfRange(Type::Int8)), e.i8(-200).map(drop));
    assert_eq!(Err(EncodeError::OutOfRange(Type::Int8)), e.i8(128).map(drop));
    assert_eq!(
        Err(EncodeError::OutOfRange(Type::UInt16)),
        e.u16(65536u32).map(drop)
    );
    assert_eq!(
        Err(EncodeError::OutOfRange(Type::UInt32)),
        e.u32(-1i64).map(drop)
    );
    assert_eq!(
        Err(EncodeError::OutOfRange(Type::UInt64)),
        e.u64(i64::MIN).map(drop)
    );
    assert_eq!(
        Err(EncodeError::OutOfRange(Type::Int64)),
        e.i64(u64::MAX).map(drop)
    );
    // Failed writes leave the buffer untouched
    assert!(e.is_empty());

    e.u8(255u64).unwrap();
    e.i8(-128i64).unwrap();
    assert_eq!(*e.buffer(), hex!("18ff387f"));
}

#[test]
fn primitive_writers() {
    let mut e = Encoder::new();
    e.write_u8(0xff)
        .write_u16(0x0102)
        .write_u32(0x01020304)
        .write_u64(0x0102030405060708)
        .write_i8(-128)
        .write_i16(-2)
        .write_i32(-1)
        .write_i64(1)
        .write_f32(1.0)
        .write_f64(1.0)
        .write_raw(&hex!("cafe"));
    assert_eq!(
        *e.build(),
        hex!(
            "ff 0102 01020304 0102030405060708 80 fffe ffffffff 0000000000000001
             3f800000 3ff0000000000000 cafe"
        )
    );
}

#[test]
fn round_trip() {
    let mut e = Encoder::new();
    e.u8(u8::MAX).unwrap();
    e.u16(u16::MAX).unwrap();
    e.u32(u32::MAX).unwrap();
    e.u64(u64::MAX).unwrap();
    e.i8(i8::MIN).unwrap();
    e.i16(i16::MIN).unwrap();
    e.i32(i32::MIN).unwrap();
    e.i64(i64::MIN).unwrap();
    e.f32(-0.5).f64(core::f64::consts::PI).bool(true);
    e.bytes(&hex!("deadbeef")).text("hello").null();

    let data = e.build();
    let mut d = Decoder::new(&data);
    assert_eq!(u8::MAX, d.u8().unwrap());
    assert_eq!(u16::MAX, d.u16().unwrap());
    assert_eq!(u32::MAX, d.u32().unwrap());
    assert_eq!(u64::MAX, d.u64().unwrap());
    assert_eq!(i8::MIN, d.i8().unwrap());
    assert_eq!(i16::MIN, d.i16().unwrap());
    assert_eq!(i32::MIN, d.i32().unwrap());
    assert_eq!(i64::MIN, d.i64().unwrap());
    assert_eq!(-0.5, d.f32().unwrap());
    assert_eq!(core::f64::consts::PI, d.f64().unwrap());
    assert!(d.bool().unwrap());
    assert_eq!(hex!("deadbeef"), d.bytes().unwrap());
    assert_eq!("hello", d.text().unwrap());
    assert_eq!(None, d.optional(|d| d.text()).unwrap());
    assert!(d.is_empty());
}

#[test]
fn buffer_reflects_progress() {
    let mut e = Encoder::with_capacity(1);
    assert!(e.buffer().is_empty());
    e.array_begin();
    assert_eq!(*e.buffer(), hex!("9f"));
    e.unsigned(1);
    assert_eq!(*e.buffer(), hex!("9f01"));
    e.array_end();
    assert_eq!(e.len(), 3);
    assert_eq!(e.build(), hex!("9f01ff"));
}
