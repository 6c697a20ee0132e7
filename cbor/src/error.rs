/*!
Errors raised by the decoder and encoder.

Decoding failures carry an [`ErrorKind`] from a fixed set, a message, and an
optional piece of diagnostic data describing the offending input. Once a
[`DecodeError`] has been returned the decoder's cursor is unspecified and the
decoder should be discarded.
*/

use super::types::Type;
use alloc::{format, string::String};
use thiserror::Error;

/// The fixed set of decode failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The header byte does not decode to any valid major/minor combination.
    InvalidType,
    /// A read needed more bytes than remain in the buffer.
    UnexpectedEof,
    /// A valid CBOR item, but not the one the caller asked for.
    UnexpectedType,
    /// The decoded magnitude does not fit the requested width.
    IntOverflow,
    /// A declared length exceeds the configured `max_length`.
    TooLong,
    /// Skipping recursed deeper than the configured `max_depth`.
    TooNested,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidType => "INVALID_TYPE",
            ErrorKind::UnexpectedEof => "UNEXPECTED_EOF",
            ErrorKind::UnexpectedType => "UNEXPECTED_TYPE",
            ErrorKind::IntOverflow => "INT_OVERFLOW",
            ErrorKind::TooLong => "TOO_LONG",
            ErrorKind::TooNested => "TOO_NESTED",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic data attached to a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extra {
    /// The offending header byte.
    Byte(u8),
    /// A declared length or decoded magnitude.
    Length(u64),
    /// The depth at which recursion was refused.
    Depth(usize),
    /// The type that was found instead of the expected one.
    Found(Type),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct DecodeError {
    kind: ErrorKind,
    message: String,
    extra: Option<Extra>,
}

impl DecodeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            extra: None,
        }
    }

    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn extra(&self) -> Option<Extra> {
        self.extra
    }

    pub(crate) fn eof(needed: usize, available: usize) -> Self {
        Self::new(
            ErrorKind::UnexpectedEof,
            format!("needed {needed} bytes, {available} available"),
        )
        .with_extra(Extra::Length(needed as u64))
    }

    pub(crate) fn invalid_type(byte: u8) -> Self {
        Self::new(
            ErrorKind::InvalidType,
            format!("invalid header byte {byte:#04x}"),
        )
        .with_extra(Extra::Byte(byte))
    }

    pub(crate) fn unexpected(expected: &str, found: Type) -> Self {
        Self::new(
            ErrorKind::UnexpectedType,
            format!("expected {expected}, found {found}"),
        )
        .with_extra(Extra::Found(found))
    }

    pub(crate) fn overflow(target: Type, magnitude: u64) -> Self {
        Self::new(
            ErrorKind::IntOverflow,
            format!("value does not fit in {target}"),
        )
        .with_extra(Extra::Length(magnitude))
    }

    pub(crate) fn too_long(declared: u64, max: usize) -> Self {
        Self::new(
            ErrorKind::TooLong,
            format!("declared length {declared} exceeds maximum {max}"),
        )
        .with_extra(Extra::Length(declared))
    }

    pub(crate) fn too_nested(depth: usize) -> Self {
        Self::new(
            ErrorKind::TooNested,
            format!("nesting exceeds maximum depth {depth}"),
        )
        .with_extra(Extra::Depth(depth))
    }
}

/// The only way an encoder write can fail.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Value out of range for {0}")]
    OutOfRange(Type),
}
