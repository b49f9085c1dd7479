//! Streaming reader with internal buffer management.

use crate::Writer;

/// A streaming reader over byte chunks that arrive incrementally.
///
/// Chunks are [`push`](StreamingReader::push)ed in as they arrive and read
/// back out with the cursor methods. A parser that runs out of bytes
/// mid-value can record the cursor with [`x`](StreamingReader::x), bail
/// out, and later [`set_x`](StreamingReader::set_x) back to retry once more
/// data has been pushed. [`consume`](StreamingReader::consume) releases
/// everything behind the cursor for buffer reuse.
///
/// Reads past the available bytes panic; callers are expected to check
/// [`size`](StreamingReader::size) first.
pub struct StreamingReader {
    writer: Writer,
    /// Read offset from the consumed boundary (`x0` in [`Writer`]).
    dx: usize,
}

impl Default for StreamingReader {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingReader {
    /// Creates a new streaming reader with the default allocation size.
    pub fn new() -> Self {
        Self::with_alloc_size(16 * 1024)
    }

    /// Creates a new streaming reader with a custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            writer: Writer::with_alloc_size(alloc_size),
            dx: 0,
        }
    }

    /// Returns the number of unread bytes.
    pub fn size(&self) -> usize {
        self.writer.x - self.x()
    }

    fn assert_size(&self, size: usize) {
        if size > self.size() {
            panic!("OUT_OF_BOUNDS");
        }
    }

    /// Appends a chunk of data to be read.
    pub fn push(&mut self, data: &[u8]) {
        self.writer.buf(data);
    }

    /// Marks everything behind the cursor as consumed, freeing that space
    /// for reuse the next time the buffer grows.
    pub fn consume(&mut self) {
        self.writer.x0 += self.dx;
        self.dx = 0;
    }

    /// Returns the current cursor position.
    pub fn x(&self) -> usize {
        self.writer.x0 + self.dx
    }

    /// Rewinds (or advances) the cursor to a previously recorded position.
    pub fn set_x(&mut self, x: usize) {
        self.dx = x - self.writer.x0;
    }

    /// Peeks at the next byte without advancing.
    pub fn peek(&self) -> u8 {
        self.assert_size(1);
        self.writer.uint8[self.x()]
    }

    /// Skips the given number of bytes.
    pub fn skip(&mut self, length: usize) {
        self.assert_size(length);
        self.dx += length;
    }

    /// Reads `size` bytes into a new vector.
    pub fn buf(&mut self, size: usize) -> Vec<u8> {
        self.assert_size(size);
        let x = self.x();
        let result = self.writer.uint8[x..x + size].to_vec();
        self.dx += size;
        result
    }

    /// Reads an unsigned 8-bit integer.
    pub fn u8(&mut self) -> u8 {
        self.assert_size(1);
        let val = self.writer.uint8[self.x()];
        self.dx += 1;
        val
    }

    /// Reads a signed 8-bit integer.
    pub fn i8(&mut self) -> i8 {
        self.u8() as i8
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    pub fn u16(&mut self) -> u16 {
        self.assert_size(2);
        let x = self.x();
        let val = u16::from_be_bytes([self.writer.uint8[x], self.writer.uint8[x + 1]]);
        self.dx += 2;
        val
    }

    /// Reads a signed 16-bit integer (big-endian).
    pub fn i16(&mut self) -> i16 {
        self.u16() as i16
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    pub fn u32(&mut self) -> u32 {
        self.assert_size(4);
        let x = self.x();
        let val = u32::from_be_bytes([
            self.writer.uint8[x],
            self.writer.uint8[x + 1],
            self.writer.uint8[x + 2],
            self.writer.uint8[x + 3],
        ]);
        self.dx += 4;
        val
    }

    /// Reads a signed 32-bit integer (big-endian).
    pub fn i32(&mut self) -> i32 {
        self.u32() as i32
    }

    /// Reads a 32-bit float (big-endian).
    pub fn f32(&mut self) -> f32 {
        f32::from_bits(self.u32())
    }

    /// Reads a 64-bit float (big-endian).
    pub fn f64(&mut self) -> f64 {
        self.assert_size(8);
        let x = self.x();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.writer.uint8[x..x + 8]);
        self.dx += 8;
        f64::from_be_bytes(bytes)
    }
}
