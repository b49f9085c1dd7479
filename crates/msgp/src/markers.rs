//! The MessagePack marker table.
//!
//! Pure data and classification; the authoritative mapping between marker
//! bytes and payload shapes. All multi-byte fields on the wire are
//! big-endian.

/// nil
pub const NIL: u8 = 0xc0;
/// The single unassigned marker byte.
pub const UNASSIGNED: u8 = 0xc1;
/// false
pub const FALSE: u8 = 0xc2;
/// true
pub const TRUE: u8 = 0xc3;
/// bin 8/16/32
pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;
/// ext 8/16/32
pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;
/// float 32/64
pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;
/// uint 8/16/32/64
pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;
/// int 8/16/32/64
pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;
/// fixext 1/2/4/8/16
pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;
/// str 8/16/32
pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;
/// array 16/32
pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;
/// map 16/32
pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Value kind a marker byte announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Nil,
    Bool,
    Uint,
    Int,
    Float,
    Str,
    Bin,
    Array,
    Map,
    Ext,
}

/// Shape of the bytes following a marker.
///
/// `len_width` is the width in bytes of the big-endian length field that
/// trails the marker (0, 1, 2 or 4). When the marker itself pins the size,
/// `fixed` carries it instead: the payload width for fixed-size scalars and
/// fixext markers, the byte length for fixstr, or the element/pair count
/// for fixarray/fixmap. Fixints carry their value inside the marker and
/// have `fixed == Some(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerClass {
    pub kind: Kind,
    pub len_width: usize,
    pub fixed: Option<usize>,
}

impl MarkerClass {
    const fn fixed(kind: Kind, size: usize) -> Self {
        Self {
            kind,
            len_width: 0,
            fixed: Some(size),
        }
    }

    const fn variable(kind: Kind, len_width: usize) -> Self {
        Self {
            kind,
            len_width,
            fixed: None,
        }
    }
}

/// Classifies a marker byte. Returns `None` only for the single unassigned
/// byte `0xc1`; every other byte is a valid MessagePack marker.
pub fn classify(marker: u8) -> Option<MarkerClass> {
    let class = match marker {
        0x00..=0x7f => MarkerClass::fixed(Kind::Uint, 0), // positive fixint
        0x80..=0x8f => MarkerClass::fixed(Kind::Map, (marker & 0x0f) as usize),
        0x90..=0x9f => MarkerClass::fixed(Kind::Array, (marker & 0x0f) as usize),
        0xa0..=0xbf => MarkerClass::fixed(Kind::Str, (marker & 0x1f) as usize),
        NIL => MarkerClass::fixed(Kind::Nil, 0),
        UNASSIGNED => return None,
        FALSE | TRUE => MarkerClass::fixed(Kind::Bool, 0),
        BIN8 => MarkerClass::variable(Kind::Bin, 1),
        BIN16 => MarkerClass::variable(Kind::Bin, 2),
        BIN32 => MarkerClass::variable(Kind::Bin, 4),
        EXT8 => MarkerClass::variable(Kind::Ext, 1),
        EXT16 => MarkerClass::variable(Kind::Ext, 2),
        EXT32 => MarkerClass::variable(Kind::Ext, 4),
        FLOAT32 => MarkerClass::fixed(Kind::Float, 4),
        FLOAT64 => MarkerClass::fixed(Kind::Float, 8),
        UINT8 => MarkerClass::fixed(Kind::Uint, 1),
        UINT16 => MarkerClass::fixed(Kind::Uint, 2),
        UINT32 => MarkerClass::fixed(Kind::Uint, 4),
        UINT64 => MarkerClass::fixed(Kind::Uint, 8),
        INT8 => MarkerClass::fixed(Kind::Int, 1),
        INT16 => MarkerClass::fixed(Kind::Int, 2),
        INT32 => MarkerClass::fixed(Kind::Int, 4),
        INT64 => MarkerClass::fixed(Kind::Int, 8),
        FIXEXT1 => MarkerClass::fixed(Kind::Ext, 1),
        FIXEXT2 => MarkerClass::fixed(Kind::Ext, 2),
        FIXEXT4 => MarkerClass::fixed(Kind::Ext, 4),
        FIXEXT8 => MarkerClass::fixed(Kind::Ext, 8),
        FIXEXT16 => MarkerClass::fixed(Kind::Ext, 16),
        STR8 => MarkerClass::variable(Kind::Str, 1),
        STR16 => MarkerClass::variable(Kind::Str, 2),
        STR32 => MarkerClass::variable(Kind::Str, 4),
        ARRAY16 => MarkerClass::variable(Kind::Array, 2),
        ARRAY32 => MarkerClass::variable(Kind::Array, 4),
        MAP16 => MarkerClass::variable(Kind::Map, 2),
        MAP32 => MarkerClass::variable(Kind::Map, 4),
        0xe0..=0xff => MarkerClass::fixed(Kind::Int, 0), // negative fixint
    };
    Some(class)
}
