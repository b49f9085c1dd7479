//! Codec error types.

use thiserror::Error;

/// Encoding failure for a single value.
///
/// These are local: the encoder discards the partial output for the
/// offending value and stays usable for subsequent values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("string of {0} bytes exceeds the str32 limit")]
    StrTooLong(usize),
    #[error("binary payload of {0} bytes exceeds the bin32 limit")]
    BinTooLong(usize),
    #[error("array of {0} elements exceeds the array32 limit")]
    ArrayTooLong(usize),
    #[error("map of {0} pairs exceeds the map32 limit")]
    MapTooLong(usize),
    #[error("extension payload of {0} bytes exceeds the ext32 limit")]
    ExtTooLong(usize),
    #[error("no encoder registered for extension type {0}")]
    UnregisteredExt(i8),
}

/// Decoding failure.
///
/// `MalformedStream`, `InvalidUtf8` and `NotStr` are fatal for the decoder
/// instance that raised them: MessagePack has no sync markers, so there is
/// no way to resynchronize, and every later `feed` call reports the same
/// error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MsgPackError {
    #[error("unrecognized marker byte at stream offset {offset}")]
    MalformedStream { offset: u64 },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8,
    #[error("map key is not a string")]
    NotStr,
    #[error("input continues past the decoded value")]
    TrailingBytes,
}
