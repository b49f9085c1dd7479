//! Streaming MessagePack codec.
//!
//! A bidirectional transcoder between native [`Value`]s and the
//! MessagePack wire format. The encoder emits canonical (size-minimal)
//! markers; the [`StreamDecoder`] reconstructs values from byte chunks
//! that may split a frame at any offset, suspending and resuming without
//! blocking or corrupting state.
//!
//! The codec performs no I/O and is scheduler-agnostic: a transport feeds
//! chunks in and takes decoded values out. One decoder instance owns its
//! parse state exclusively; concurrent streams need one instance each.
//!
//! ```
//! use msgp::{decode, encode, Value};
//!
//! let value = Value::Map(vec![("a".into(), Value::Int(1))]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extension;
pub mod markers;
pub mod util;
pub mod value;

pub use decoder::StreamDecoder;
pub use encoder::{FloatPolicy, MsgPackEncoder};
pub use error::{EncodeError, MsgPackError};
pub use extension::{Extension, ExtensionCodec, ExtensionRegistry};
pub use util::{decode, encode};
pub use value::Value;
