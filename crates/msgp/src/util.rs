//! One-shot convenience helpers over the streaming machinery.

use crate::decoder::StreamDecoder;
use crate::encoder::MsgPackEncoder;
use crate::error::{EncodeError, MsgPackError};
use crate::value::Value;

/// Encodes a single value to MessagePack bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, EncodeError> {
    MsgPackEncoder::new().encode(value)
}

/// Decodes exactly one value from a complete buffer.
///
/// Fails with [`MsgPackError::UnexpectedEof`] when the buffer holds less
/// than one whole value and [`MsgPackError::TrailingBytes`] when it holds
/// more.
pub fn decode(data: &[u8]) -> Result<Value, MsgPackError> {
    let mut decoder = StreamDecoder::new();
    let mut values = decoder.feed(data)?;
    match values.len() {
        0 => Err(MsgPackError::UnexpectedEof),
        1 if decoder.is_idle() => Ok(values.remove(0)),
        _ => Err(MsgPackError::TrailingBytes),
    }
}
