#![no_std]
extern crate alloc;

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod types;

mod decode_seq;

pub use config::Config;
pub use decode::{Decoder, Length};
pub use encode::Encoder;
pub use error::{DecodeError, EncodeError, ErrorKind};
pub use types::Type;


#[cfg(test)]
mod encode_tests;
