#![no_main]

use cbor_codec::{DecodeError, Decoder, Encoder, ErrorKind, Type};
use libfuzzer_sys::fuzz_target;

/// Copy one item through the typed readers and writers.
fn copy(d: &mut Decoder, e: &mut Encoder) -> Result<(), DecodeError> {
    match d.peek_type()? {
        Type::UInt8 | Type::UInt16 | Type::UInt32 | Type::UInt64 => {
            e.unsigned(d.unsigned()?);
        }
        Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64 => {
            e.int(d.int()?);
        }
        Type::Bytes => {
            e.bytes(d.bytes()?);
        }
        Type::Text => {
            e.text(d.text()?);
        }
        Type::Array => {
            let mut items = d.array_items()?;
            match items.len() {
                Some(len) => e.array(len),
                None => e.array_begin(),
            };
            while let Some(item) = items.next_item()? {
                copy(item, e)?;
            }
            if !items.is_definite() {
                e.array_end();
            }
        }
        Type::Object => {
            let mut entries = d.object_entries()?;
            match entries.len() {
                Some(len) => e.object(len),
                None => e.object_begin(),
            };
            while let Some(entry) = entries.next_item()? {
                copy(entry, e)?;
                copy(entry, e)?;
            }
            if !entries.is_definite() {
                e.object_end();
            }
        }
        Type::Bool => {
            e.bool(d.bool()?);
        }
        Type::Null => {
            d.read_u8()?;
            e.null();
        }
        Type::Undefined => {
            d.read_u8()?;
            e.undefined();
        }
        Type::Float16 | Type::Float32 => {
            e.f32(d.f32()?);
        }
        Type::Float64 => {
            e.f64(d.f64()?);
        }
        t @ (Type::Tagged | Type::Break) => {
            return Err(DecodeError::new(
                ErrorKind::UnexpectedType,
                format!("{t} is not copied"),
            ));
        }
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    // Bounded recursion for the copy below
    if !matches!(Decoder::new(data).skip(), Ok(true)) {
        return;
    }

    let mut first = Encoder::new();
    if copy(&mut Decoder::new(data), &mut first).is_err() {
        return;
    }
    let first = first.build();

    let mut decoder = Decoder::new(&first);
    assert!(decoder.clone().skip().unwrap());

    let mut second = Encoder::new();
    copy(&mut decoder, &mut second).unwrap();
    assert!(decoder.is_empty());
    assert_eq!(first, second.build());
});
