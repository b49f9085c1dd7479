//! Binary buffer utilities for the msgp MessagePack codec.
//!
//! # Overview
//!
//! - [`Writer`] - Writes big-endian binary data to an auto-growing buffer
//! - [`StreamingReader`] - Consumes pushed byte chunks incrementally, with
//!   cursor checkpointing for suspend/resume parsing
//!
//! # Example
//!
//! ```
//! use msgp_buffers::{StreamingReader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! let data = writer.flush();
//!
//! let mut reader = StreamingReader::new();
//! reader.push(&data);
//! assert_eq!(reader.u8(), 0x01);
//! assert_eq!(reader.u16(), 0x0203);
//! ```

mod streaming_reader;
mod writer;

pub use streaming_reader::StreamingReader;
pub use writer::Writer;

/// Checks if a number survives a round trip through 32-bit floating point.
///
/// Returns `true` if the value can be stored as an `f32` without precision
/// loss. `±∞` qualifies; `NaN` does not, since `NaN != NaN`.
pub fn is_float32(n: f64) -> bool {
    (n as f32) as f64 == n
}
