#![no_main]

use cbor_codec::{Config, Decoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::with_config(data, Config::default().with_max_depth(64));
    while let Ok(true) = decoder.skip() {}
    assert!(decoder.position() <= data.len());
});
