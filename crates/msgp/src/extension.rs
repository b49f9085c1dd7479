//! Extension values and the per-codec extension registry.

use std::collections::BTreeMap;

use crate::Value;

/// An application-defined extension value: an 8-bit type tag plus a
/// payload the core codec treats as opaque.
///
/// A decoder without a registered handler for `tag` yields the raw payload
/// as `val = Value::Bin(..)`. An encoder writes a `Value::Bin` payload
/// as-is; any other payload is handed to the registered encode function
/// for `tag` first.
#[derive(Debug, Clone, PartialEq)]
pub struct Extension {
    pub tag: i8,
    pub val: Box<Value>,
}

impl Extension {
    pub fn new(tag: i8, val: Value) -> Self {
        Self {
            tag,
            val: Box::new(val),
        }
    }
}

/// Encode half of a registered extension: native value to raw payload.
pub type ExtEncodeFn = Box<dyn Fn(&Value) -> Vec<u8>>;
/// Decode half of a registered extension: raw payload to native value.
pub type ExtDecodeFn = Box<dyn Fn(&[u8]) -> Value>;

/// A registered encode/decode pair for one extension type code.
pub struct ExtensionCodec {
    pub encode: ExtEncodeFn,
    pub decode: ExtDecodeFn,
}

/// Mapping from extension type codes (0-255) to codec pairs.
///
/// Owned by one encoder or decoder instance; never global. Starts empty,
/// and re-registering a code replaces the previous entry.
#[derive(Default)]
pub struct ExtensionRegistry {
    codecs: BTreeMap<u8, ExtensionCodec>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a codec pair for `code`. Last registration wins.
    pub fn register<E, D>(&mut self, code: u8, encode: E, decode: D)
    where
        E: Fn(&Value) -> Vec<u8> + 'static,
        D: Fn(&[u8]) -> Value + 'static,
    {
        self.codecs.insert(
            code,
            ExtensionCodec {
                encode: Box::new(encode),
                decode: Box::new(decode),
            },
        );
    }

    pub fn get(&self, code: u8) -> Option<&ExtensionCodec> {
        self.codecs.get(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_registration_wins() {
        let mut registry = ExtensionRegistry::new();
        registry.register(5, |_| vec![1], |_| Value::Nil);
        registry.register(5, |_| vec![2], |_| Value::Bool(true));
        let codec = registry.get(5).unwrap();
        assert_eq!((codec.encode)(&Value::Nil), vec![2]);
        assert_eq!((codec.decode)(&[]), Value::Bool(true));
    }

    #[test]
    fn starts_empty() {
        let registry = ExtensionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(0).is_none());
    }
}
