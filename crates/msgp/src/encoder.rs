//! `MsgPackEncoder` — canonical MessagePack encoder.
//!
//! Every value is written with the narrowest marker tier whose capacity
//! covers the payload length or integer magnitude, so a given value always
//! encodes to the same bytes.

use msgp_buffers::{is_float32, Writer};

use crate::error::EncodeError;
use crate::extension::{Extension, ExtensionRegistry};
use crate::markers;
use crate::value::Value;

/// Width selection for `Value::Float`.
///
/// MessagePack does not mandate a float width, so this is a policy choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatPolicy {
    /// Use float32 when the value survives the narrowing exactly
    /// (including ±∞); float64 otherwise.
    #[default]
    Narrow,
    /// Always use float64.
    Force64,
}

pub struct MsgPackEncoder {
    pub writer: Writer,
    extensions: ExtensionRegistry,
    float_policy: FloatPolicy,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self::with_float_policy(FloatPolicy::default())
    }

    pub fn with_float_policy(float_policy: FloatPolicy) -> Self {
        Self {
            writer: Writer::new(),
            extensions: ExtensionRegistry::new(),
            float_policy,
        }
    }

    /// The extension registry consulted for non-raw extension payloads.
    pub fn extensions_mut(&mut self) -> &mut ExtensionRegistry {
        &mut self.extensions
    }

    /// Encodes one value and returns its bytes.
    ///
    /// On error nothing is emitted for the failed value; the encoder
    /// remains usable for the next call.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        match self.write_any(value) {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                self.writer.x = self.writer.x0;
                Err(err)
            }
        }
    }

    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_int(*i),
            Value::UInt(u) => self.write_uint(*u),
            Value::Float(f) => self.write_float(*f),
            Value::Str(s) => return self.write_str(s),
            Value::Bin(b) => return self.write_bin(b),
            Value::Array(arr) => return self.write_arr(arr),
            Value::Map(pairs) => return self.write_map(pairs),
            Value::Ext(ext) => return self.write_ext(ext),
        }
        Ok(())
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(markers::NIL);
    }

    pub fn write_bool(&mut self, b: bool) {
        self.writer
            .u8(if b { markers::TRUE } else { markers::FALSE });
    }

    pub fn write_uint(&mut self, uint: u64) {
        let w = &mut self.writer;
        if uint <= 0x7f {
            w.u8(uint as u8);
        } else if uint <= 0xff {
            w.u16(((markers::UINT8 as u16) << 8) | uint as u16);
        } else if uint <= 0xffff {
            w.u8u16(markers::UINT16, uint as u16);
        } else if uint <= 0xffff_ffff {
            w.u8u32(markers::UINT32, uint as u32);
        } else {
            // 64-bit payloads go out as two 32-bit big-endian words (high
            // then low) so the byte layout matches peers without native
            // 64-bit integer arithmetic.
            w.u8(markers::UINT64);
            w.u32((uint >> 32) as u32);
            w.u32(uint as u32);
        }
    }

    pub fn write_int(&mut self, int: i64) {
        if int >= 0 {
            return self.write_uint(int as u64);
        }
        let w = &mut self.writer;
        if int >= -0x20 {
            w.u8(int as i8 as u8); // negative fixint fold: 0xe0..0xff
        } else if int >= -0x80 {
            w.u16(((markers::INT8 as u16) << 8) | (int as i8 as u8) as u16);
        } else if int >= -0x8000 {
            w.u8u16(markers::INT16, int as i16 as u16);
        } else if int >= -0x8000_0000 {
            w.u8u32(markers::INT32, int as i32 as u32);
        } else {
            let words = int as u64;
            w.u8(markers::INT64);
            w.u32((words >> 32) as u32);
            w.u32(words as u32);
        }
    }

    pub fn write_float(&mut self, float: f64) {
        match self.float_policy {
            FloatPolicy::Narrow if is_float32(float) => {
                self.writer.u8f32(markers::FLOAT32, float as f32)
            }
            _ => self.writer.u8f64(markers::FLOAT64, float),
        }
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= 0x1f {
            self.writer.u8(0xa0 | length as u8);
        } else if length <= 0xff {
            self.writer
                .u16(((markers::STR8 as u16) << 8) | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(markers::STR16, length as u16);
        } else if length <= 0xffff_ffff {
            self.writer.u8u32(markers::STR32, length as u32);
        } else {
            return Err(EncodeError::StrTooLong(length));
        }
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        self.write_str_hdr(s.len())?;
        self.writer.utf8(s);
        Ok(())
    }

    pub fn write_bin_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= 0xff {
            self.writer
                .u16(((markers::BIN8 as u16) << 8) | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(markers::BIN16, length as u16);
        } else if length <= 0xffff_ffff {
            self.writer.u8u32(markers::BIN32, length as u32);
        } else {
            return Err(EncodeError::BinTooLong(length));
        }
        Ok(())
    }

    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), EncodeError> {
        self.write_bin_hdr(buf.len())?;
        self.writer.buf(buf);
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= 0xf {
            self.writer.u8(0x90 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(markers::ARRAY16, length as u16);
        } else if length <= 0xffff_ffff {
            self.writer.u8u32(markers::ARRAY32, length as u32);
        } else {
            return Err(EncodeError::ArrayTooLong(length));
        }
        Ok(())
    }

    pub fn write_arr(&mut self, arr: &[Value]) -> Result<(), EncodeError> {
        self.write_arr_hdr(arr.len())?;
        for item in arr {
            self.write_any(item)?;
        }
        Ok(())
    }

    pub fn write_map_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= 0xf {
            self.writer.u8(0x80 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(markers::MAP16, length as u16);
        } else if length <= 0xffff_ffff {
            self.writer.u8u32(markers::MAP32, length as u32);
        } else {
            return Err(EncodeError::MapTooLong(length));
        }
        Ok(())
    }

    pub fn write_map(&mut self, pairs: &[(String, Value)]) -> Result<(), EncodeError> {
        self.write_map_hdr(pairs.len())?;
        for (key, val) in pairs {
            self.write_str(key)?;
            self.write_any(val)?;
        }
        Ok(())
    }

    pub fn write_ext_hdr(&mut self, tag: i8, length: usize) -> Result<(), EncodeError> {
        let w = &mut self.writer;
        match length {
            1 => w.u16(((markers::FIXEXT1 as u16) << 8) | (tag as u8) as u16),
            2 => w.u16(((markers::FIXEXT2 as u16) << 8) | (tag as u8) as u16),
            4 => w.u16(((markers::FIXEXT4 as u16) << 8) | (tag as u8) as u16),
            8 => w.u16(((markers::FIXEXT8 as u16) << 8) | (tag as u8) as u16),
            16 => w.u16(((markers::FIXEXT16 as u16) << 8) | (tag as u8) as u16),
            _ => {
                if length <= 0xff {
                    w.u16(((markers::EXT8 as u16) << 8) | length as u16);
                } else if length <= 0xffff {
                    w.u8u16(markers::EXT16, length as u16);
                } else if length <= 0xffff_ffff {
                    w.u8u32(markers::EXT32, length as u32);
                } else {
                    return Err(EncodeError::ExtTooLong(length));
                }
                w.u8(tag as u8);
            }
        }
        Ok(())
    }

    pub fn write_ext(&mut self, ext: &Extension) -> Result<(), EncodeError> {
        match ext.val.as_ref() {
            Value::Bin(data) => {
                self.write_ext_hdr(ext.tag, data.len())?;
                self.writer.buf(data);
            }
            other => {
                let data = {
                    let codec = self
                        .extensions
                        .get(ext.tag as u8)
                        .ok_or(EncodeError::UnregisteredExt(ext.tag))?;
                    (codec.encode)(other)
                };
                self.write_ext_hdr(ext.tag, data.len())?;
                self.writer.buf(&data);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value) -> Vec<u8> {
        MsgPackEncoder::new().encode(value).unwrap()
    }

    #[test]
    fn nil_and_bool() {
        assert_eq!(encode(&Value::Nil), [0xc0]);
        assert_eq!(encode(&Value::Bool(false)), [0xc2]);
        assert_eq!(encode(&Value::Bool(true)), [0xc3]);
    }

    #[test]
    fn uint_tiers_are_minimal() {
        assert_eq!(encode(&Value::Int(0)), [0x00]);
        assert_eq!(encode(&Value::Int(0x7f)), [0x7f]);
        assert_eq!(encode(&Value::Int(0x80)), [0xcc, 0x80]);
        assert_eq!(encode(&Value::Int(0xff)), [0xcc, 0xff]);
        assert_eq!(encode(&Value::Int(0x100)), [0xcd, 0x01, 0x00]);
        assert_eq!(encode(&Value::Int(0x10000)), [0xce, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            encode(&Value::UInt(0x1_0000_0000)),
            [0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn int_tiers_are_minimal() {
        assert_eq!(encode(&Value::Int(-1)), [0xff]);
        assert_eq!(encode(&Value::Int(-32)), [0xe0]);
        assert_eq!(encode(&Value::Int(-33)), [0xd0, 0xdf]);
        assert_eq!(encode(&Value::Int(-128)), [0xd0, 0x80]);
        assert_eq!(encode(&Value::Int(-129)), [0xd1, 0xff, 0x7f]);
        assert_eq!(
            encode(&Value::Int(-0x8000_0001)),
            [0xd3, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn uint64_split_words_high_then_low() {
        let bytes = encode(&Value::UInt(0xdead_beef_cafe_f00d));
        assert_eq!(
            bytes,
            [0xcf, 0xde, 0xad, 0xbe, 0xef, 0xca, 0xfe, 0xf0, 0x0d]
        );
    }

    #[test]
    fn float_narrowing_policy() {
        assert_eq!(encode(&Value::Float(1.5))[0], 0xca);
        assert_eq!(encode(&Value::Float(f64::INFINITY))[0], 0xca);
        assert_eq!(encode(&Value::Float(0.1))[0], 0xcb);
        assert_eq!(encode(&Value::Float(f64::NAN))[0], 0xcb);

        let mut force = MsgPackEncoder::with_float_policy(FloatPolicy::Force64);
        assert_eq!(force.encode(&Value::Float(1.5)).unwrap()[0], 0xcb);
    }

    #[test]
    fn str_tiers_by_byte_length() {
        let s31 = "x".repeat(31);
        let s32 = "x".repeat(32);
        assert_eq!(encode(&Value::from(s31.as_str()))[0], 0xbf);
        assert_eq!(encode(&Value::from(s32.as_str()))[0], 0xd9);
        // Byte length, not character count: four 3-byte codepoints.
        let multi = "€€€€";
        let bytes = encode(&Value::from(multi));
        assert_eq!(bytes[0], 0xa0 | 12);
        assert_eq!(bytes.len(), 13);
    }

    #[test]
    fn bin_has_no_fixed_tier() {
        assert_eq!(encode(&Value::Bin(vec![])), [0xc4, 0x00]);
        let b = encode(&Value::Bin(vec![0xaa; 3]));
        assert_eq!(b, [0xc4, 0x03, 0xaa, 0xaa, 0xaa]);
        assert_eq!(encode(&Value::Bin(vec![0; 256]))[0], 0xc5);
    }

    #[test]
    fn container_headers() {
        assert_eq!(encode(&Value::Array(vec![])), [0x90]);
        assert_eq!(encode(&Value::Map(vec![])), [0x80]);
        let sixteen = Value::Array(vec![Value::Nil; 16]);
        assert_eq!(encode(&sixteen)[..3], [0xdc, 0x00, 0x10]);
    }

    #[test]
    fn map_scenario_bytes() {
        let value = Value::Map(vec![
            ("a".into(), Value::Int(1)),
            (
                "b".into(),
                Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
            ),
        ]);
        assert_eq!(
            encode(&value),
            [0x82, 0xa1, 0x61, 0x01, 0xa1, 0x62, 0x93, 0x01, 0x02, 0x03]
        );
    }

    #[test]
    fn ext_headers() {
        let fix4 = Extension::new(7, Value::Bin(vec![0; 4]));
        assert_eq!(encode(&Value::Ext(Box::new(fix4)))[..2], [0xd6, 0x07]);
        let ext3 = Extension::new(-1, Value::Bin(vec![1, 2, 3]));
        assert_eq!(
            encode(&Value::Ext(Box::new(ext3))),
            [0xc7, 0x03, 0xff, 0x01, 0x02, 0x03]
        );
    }

    #[test]
    fn unregistered_ext_payload_fails_without_corruption() {
        let mut encoder = MsgPackEncoder::new();
        let ext = Value::Ext(Box::new(Extension::new(3, Value::Str("hi".into()))));
        assert_eq!(
            encoder.encode(&ext),
            Err(EncodeError::UnregisteredExt(3))
        );
        // The failed value must not leak partial bytes into the next one.
        assert_eq!(encoder.encode(&Value::Int(1)).unwrap(), [0x01]);
    }

    #[test]
    fn registered_ext_encodes_native_payload() {
        let mut encoder = MsgPackEncoder::new();
        encoder.extensions_mut().register(
            3,
            |v| match v {
                Value::Str(s) => s.as_bytes().to_vec(),
                _ => vec![],
            },
            |_| Value::Nil,
        );
        let ext = Value::Ext(Box::new(Extension::new(3, Value::Str("hi".into()))));
        assert_eq!(encoder.encode(&ext).unwrap(), [0xd5, 0x03, b'h', b'i']);
    }

    #[test]
    fn error_mid_array_leaves_encoder_clean() {
        let mut encoder = MsgPackEncoder::new();
        let bad = Value::Array(vec![
            Value::Int(1),
            Value::Ext(Box::new(Extension::new(9, Value::Nil))),
        ]);
        assert!(encoder.encode(&bad).is_err());
        assert_eq!(encoder.encode(&Value::Str("ok".into())).unwrap()[0], 0xa2);
    }
}
