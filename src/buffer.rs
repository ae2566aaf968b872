//! An appendable byte accumulator with the primitive encoding helpers

use byteorder_lite::{ByteOrder, LE};

use crate::codec::{Prefix, WireType};
use crate::errors::Result;

/// The append-only buffer every writer emits into.
///
/// A buffer handed to the `conv` entry points is cleared before use and keeps
/// its allocation after the call returns, so callers may hold one per thread
/// and reuse it across messages.
#[derive(Debug, Default)]
pub struct MsgBuffer {
    buf: Vec<u8>,
}

impl MsgBuffer {
    /// Creates an empty buffer
    pub fn new() -> MsgBuffer {
        MsgBuffer { buf: Vec::new() }
    }

    /// Creates an empty buffer with room for `cap` bytes
    pub fn with_capacity(cap: usize) -> MsgBuffer {
        MsgBuffer {
            buf: Vec::with_capacity(cap),
        }
    }

    /// Drops the contents, keeping the allocation
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Number of bytes accumulated so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Checks if `self.len == 0`
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes
    pub fn contents(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the buffer, yielding its bytes without a copy
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    /// Appends one raw byte
    #[cfg_attr(feature = "std", inline(always))]
    pub fn add_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    /// Appends raw bytes verbatim
    pub fn add_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a varint: base 128, little endian, continuation bit high
    #[cfg_attr(feature = "std", inline(always))]
    pub fn add_vint(&mut self, mut v: u64) {
        while v > 0x7f {
            self.buf.push(((v as u8) & 0x7f) | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
    }

    /// Appends a signed varint, zig-zag coded first
    #[cfg_attr(feature = "std", inline(always))]
    pub fn add_signed_vint(&mut self, v: i64) {
        self.add_vint(((v << 1) ^ (v >> 63)) as u64);
    }

    /// Appends a `u32` as 4 little endian bytes
    pub fn add_fixed32(&mut self, v: u32) {
        let mut b = [0u8; 4];
        LE::write_u32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    /// Appends a `u64` as 8 little endian bytes
    pub fn add_fixed64(&mut self, v: u64) {
        let mut b = [0u8; 8];
        LE::write_u64(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    /// Appends the prefix varint for `(tag, wire_type)`
    pub fn add_prefix(&mut self, tag: u32, wire_type: WireType) {
        self.add_vint(Prefix::new(tag, wire_type).encode());
    }

    /// Appends the byte length of `bytes` as a varint, then the bytes
    pub fn add_len_prefixed_bytes(&mut self, bytes: &[u8]) {
        self.add_vint(bytes.len() as u64);
        self.add_bytes(bytes);
    }

    /// Materializes a body into a nested buffer, then appends its byte length
    /// as a varint followed by the body itself
    pub fn write_length_prefixed<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut MsgBuffer) -> Result<()>,
    {
        let mut nested = MsgBuffer::new();
        body(&mut nested)?;
        self.add_vint(nested.len() as u64);
        self.buf.append(&mut nested.buf);
        Ok(())
    }
}
