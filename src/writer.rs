//! The primitive writer toolkit per-type writers are composed from
//!
//! Every write emits a complete value: the prefix first, then a length prefix
//! when the wire type calls for one, then the body. Composite bodies are
//! materialized into a nested buffer so their byte length is known before it
//! is emitted. Writers always produce the declared arity; growing a tuple is
//! a schema operation, not a runtime one.

use crate::buffer::MsgBuffer;
use crate::codec::WireType;
use crate::errors::Result;

/// Emits schema values into a [`MsgBuffer`]
pub struct Writer<'a> {
    buf: &'a mut MsgBuffer,
}

impl<'a> Writer<'a> {
    /// Creates a writer emitting into `buf`
    pub fn new(buf: &'a mut MsgBuffer) -> Writer<'a> {
        Writer { buf }
    }

    /// The buffer this writer emits into
    pub fn buffer(&mut self) -> &mut MsgBuffer {
        self.buf
    }

    /// Writes a `bool` as a 1 byte body, 1 = true, 0 = false
    pub fn write_bool(&mut self, tag: u32, v: bool) -> Result<()> {
        self.buf.add_prefix(tag, WireType::Bits8);
        self.buf.add_byte(u8::from(v));
        Ok(())
    }

    /// Writes a `byte`
    pub fn write_byte(&mut self, tag: u32, v: u8) -> Result<()> {
        self.buf.add_prefix(tag, WireType::Bits8);
        self.buf.add_byte(v);
        Ok(())
    }

    /// Writes an `int` as a zig-zag varint
    pub fn write_int(&mut self, tag: u32, v: i32) -> Result<()> {
        self.buf.add_prefix(tag, WireType::Vint);
        self.buf.add_signed_vint(v as i64);
        Ok(())
    }

    /// Writes a `long` as 8 little endian bytes
    pub fn write_long(&mut self, tag: u32, v: i64) -> Result<()> {
        self.buf.add_prefix(tag, WireType::Bits64Long);
        self.buf.add_fixed64(v as u64);
        Ok(())
    }

    /// Writes a `float` as an IEEE-754 double, 8 little endian bytes
    pub fn write_float(&mut self, tag: u32, v: f64) -> Result<()> {
        self.buf.add_prefix(tag, WireType::Bits64Float);
        self.buf.add_fixed64(v.to_bits());
        Ok(())
    }

    /// Writes a byte `string`: length first, then the raw bytes
    pub fn write_bytes(&mut self, tag: u32, v: &[u8]) -> Result<()> {
        self.buf.add_prefix(tag, WireType::Bytes);
        self.buf.add_len_prefixed_bytes(v);
        Ok(())
    }

    /// Writes a utf8 `string`
    pub fn write_string(&mut self, tag: u32, v: &str) -> Result<()> {
        self.write_bytes(tag, v.as_bytes())
    }

    /// Writes a constant sum constructor: a bare prefix, no body
    pub fn write_enum(&mut self, tag: u32) -> Result<()> {
        self.buf.add_prefix(tag, WireType::Enum);
        Ok(())
    }

    /// Writes a tuple or record: `prefix; length; count; elements`
    ///
    /// `nelms` must match the number of elements `body` emits.
    pub fn write_tuple<F>(&mut self, tag: u32, nelms: u64, body: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<'_>) -> Result<()>,
    {
        self.composite(tag, WireType::Tuple, nelms, body)
    }

    /// Writes a list or array: the htuple form of [`write_tuple`](Self::write_tuple)
    pub fn write_htuple<F>(&mut self, tag: u32, nelms: u64, body: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<'_>) -> Result<()>,
    {
        self.composite(tag, WireType::Htuple, nelms, body)
    }

    fn composite<F>(&mut self, tag: u32, wire_type: WireType, nelms: u64, body: F) -> Result<()>
    where
        F: FnOnce(&mut Writer<'_>) -> Result<()>,
    {
        self.buf.add_prefix(tag, wire_type);
        self.buf.write_length_prefixed(|b| {
            b.add_vint(nelms);
            body(&mut Writer::new(b))
        })
    }
}
