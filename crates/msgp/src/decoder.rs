//! `StreamDecoder` — resumable MessagePack decoder for chunked input.
//!
//! Bytes arrive through [`StreamDecoder::feed`] in chunks that may split a
//! value anywhere: mid-marker-header, mid-length-field, or mid-payload.
//! The decoder suspends at the exact frame boundary whenever the buffered
//! bytes cannot advance the current frame, and resumes from that boundary
//! on the next call.

use msgp_buffers::StreamingReader;

use crate::error::MsgPackError;
use crate::extension::{Extension, ExtensionRegistry};
use crate::markers::{self, classify, Kind};
use crate::value::Value;

/// One in-progress container. Scalar, string, binary and extension frames
/// never suspend half-consumed (their header and payload are read
/// atomically once buffered), so only containers live on the parse stack.
enum Frame {
    Array {
        items: Vec<Value>,
        remaining: usize,
    },
    Map {
        pairs: Vec<(String, Value)>,
        key: Option<String>,
        remaining: usize,
    },
}

/// Outcome of one attempt to advance the frame machine.
enum Step {
    /// A whole value (possibly a child of the frame on top of the stack).
    Value(Value),
    /// A container header was consumed and its frame pushed.
    Deferred,
    /// Not enough buffered bytes; the cursor was left at a frame boundary.
    Stalled,
}

/// Container element counts are declared before any payload arrives, so
/// a hostile length claim must not drive a huge allocation up front.
const MAX_PREALLOC: usize = 1 << 12;

pub struct StreamDecoder {
    reader: StreamingReader,
    stack: Vec<Frame>,
    extensions: ExtensionRegistry,
    /// Total bytes pushed across all `feed` calls.
    fed: u64,
    /// Once set, the stream is dead; every later `feed` repeats the error.
    failed: Option<MsgPackError>,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self {
            reader: StreamingReader::new(),
            stack: Vec::new(),
            extensions: ExtensionRegistry::new(),
            fed: 0,
            failed: None,
        }
    }

    /// The extension registry consulted when an extension payload
    /// completes.
    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.extensions
    }

    /// True when no partial value is buffered and no bytes are pending.
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty() && self.reader.size() == 0
    }

    /// Feeds the next chunk (any length, including zero) and returns the
    /// root values that became complete, in completion order.
    ///
    /// A decode error poisons the instance: buffered state is
    /// unrecoverable and every subsequent call returns the same error.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Value>, MsgPackError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        self.reader.push(chunk);
        self.fed += chunk.len() as u64;

        let mut out = Vec::new();
        let result = self.run(&mut out);
        if let Err(err) = result {
            self.failed = Some(err.clone());
            return Err(err);
        }
        Ok(out)
    }

    fn run(&mut self, out: &mut Vec<Value>) -> Result<(), MsgPackError> {
        loop {
            match self.step()? {
                Step::Value(value) => self.complete(value, out)?,
                Step::Deferred => {}
                Step::Stalled => break,
            }
        }
        // Everything behind the cursor has been folded into values or
        // frames; release it for buffer reuse.
        self.reader.consume();
        Ok(())
    }

    /// Stream offset of the byte at the read cursor.
    fn offset(&self) -> u64 {
        self.fed - self.reader.size() as u64
    }

    /// Tries to advance by exactly one frame transition: consume a marker
    /// (plus its length field) and either produce a scalar value or push a
    /// container frame. Rewinds to the frame boundary when the buffered
    /// bytes fall short.
    fn step(&mut self) -> Result<Step, MsgPackError> {
        let available = self.reader.size();
        if available == 0 {
            return Ok(Step::Stalled);
        }

        let marker = self.reader.peek();
        let class = match classify(marker) {
            Some(class) => class,
            None => {
                return Err(MsgPackError::MalformedStream {
                    offset: self.offset(),
                })
            }
        };

        // Marker byte plus the declared length field must be complete
        // before anything is consumed.
        let header = 1 + class.len_width;
        if available < header {
            return Ok(Step::Stalled);
        }

        let checkpoint = self.reader.x();
        self.reader.skip(1);
        let n = match class.len_width {
            0 => class.fixed.unwrap_or(0),
            1 => self.reader.u8() as usize,
            2 => self.reader.u16() as usize,
            _ => self.reader.u32() as usize,
        };

        match class.kind {
            Kind::Nil => return Ok(Step::Value(Value::Nil)),
            Kind::Bool => return Ok(Step::Value(Value::Bool(marker == markers::TRUE))),
            Kind::Array => {
                if n == 0 {
                    return Ok(Step::Value(Value::Array(Vec::new())));
                }
                self.stack.push(Frame::Array {
                    items: Vec::with_capacity(n.min(MAX_PREALLOC)),
                    remaining: n,
                });
                return Ok(Step::Deferred);
            }
            Kind::Map => {
                if n == 0 {
                    return Ok(Step::Value(Value::Map(Vec::new())));
                }
                self.stack.push(Frame::Map {
                    pairs: Vec::with_capacity(n.min(MAX_PREALLOC)),
                    key: None,
                    remaining: n,
                });
                return Ok(Step::Deferred);
            }
            _ => {}
        }

        // Scalar frame: the whole payload (plus the extension tag byte)
        // must be buffered, or the frame is rewound and retried later.
        let payload = match class.kind {
            Kind::Ext => n + 1,
            _ => n,
        };
        if self.reader.size() < payload {
            self.reader.set_x(checkpoint);
            return Ok(Step::Stalled);
        }

        let value = match marker {
            0x00..=0x7f => Value::Int(marker as i64),
            0xe0..=0xff => Value::Int(marker as i8 as i64),
            0xa0..=0xbf | markers::STR8 | markers::STR16 | markers::STR32 => self.read_str(n)?,
            markers::BIN8 | markers::BIN16 | markers::BIN32 => Value::Bin(self.reader.buf(n)),
            markers::EXT8
            | markers::EXT16
            | markers::EXT32
            | markers::FIXEXT1
            | markers::FIXEXT2
            | markers::FIXEXT4
            | markers::FIXEXT8
            | markers::FIXEXT16 => self.read_ext(n),
            markers::FLOAT32 => Value::Float(self.reader.f32() as f64),
            markers::FLOAT64 => Value::Float(self.reader.f64()),
            markers::UINT8 => Value::Int(self.reader.u8() as i64),
            markers::UINT16 => Value::Int(self.reader.u16() as i64),
            markers::UINT32 => Value::Int(self.reader.u32() as i64),
            markers::UINT64 => {
                // Two 32-bit big-endian words, high then low, mirroring
                // the encoder's split-word layout.
                let hi = self.reader.u32() as u64;
                let lo = self.reader.u32() as u64;
                let uint = (hi << 32) | lo;
                if uint > i64::MAX as u64 {
                    Value::UInt(uint)
                } else {
                    Value::Int(uint as i64)
                }
            }
            markers::INT8 => Value::Int(self.reader.i8() as i64),
            markers::INT16 => Value::Int(self.reader.i16() as i64),
            markers::INT32 => Value::Int(self.reader.i32() as i64),
            markers::INT64 => {
                let hi = self.reader.u32() as u64;
                let lo = self.reader.u32() as u64;
                Value::Int(((hi << 32) | lo) as i64)
            }
            _ => {
                return Err(MsgPackError::MalformedStream {
                    offset: self.offset(),
                })
            }
        };
        Ok(Step::Value(value))
    }

    fn read_str(&mut self, size: usize) -> Result<Value, MsgPackError> {
        let bytes = self.reader.buf(size);
        let s = String::from_utf8(bytes).map_err(|_| MsgPackError::InvalidUtf8)?;
        Ok(Value::Str(s))
    }

    fn read_ext(&mut self, size: usize) -> Value {
        let tag = self.reader.i8();
        let data = self.reader.buf(size);
        match self.extensions.get(tag as u8) {
            Some(codec) => (codec.decode)(&data),
            None => Value::Ext(Box::new(Extension::new(tag, Value::Bin(data)))),
        }
    }

    /// Folds a completed value into the enclosing frame, popping every
    /// container it fills, and appends root values to `out`.
    fn complete(&mut self, mut value: Value, out: &mut Vec<Value>) -> Result<(), MsgPackError> {
        loop {
            match self.stack.last_mut() {
                None => {
                    out.push(value);
                    return Ok(());
                }
                Some(Frame::Array { items, remaining }) => {
                    items.push(value);
                    *remaining -= 1;
                    if *remaining > 0 {
                        return Ok(());
                    }
                }
                Some(Frame::Map {
                    pairs,
                    key,
                    remaining,
                }) => match key.take() {
                    None => {
                        let Value::Str(k) = value else {
                            return Err(MsgPackError::NotStr);
                        };
                        *key = Some(k);
                        return Ok(());
                    }
                    Some(k) => {
                        pairs.push((k, value));
                        *remaining -= 1;
                        if *remaining > 0 {
                            return Ok(());
                        }
                    }
                },
            }
            // The top frame is full; pop it and fold upward.
            value = match self.stack.pop() {
                Some(Frame::Array { items, .. }) => Value::Array(items),
                Some(Frame::Map { pairs, .. }) => Value::Map(pairs),
                None => unreachable!("stack checked non-empty above"),
            };
        }
    }
}
