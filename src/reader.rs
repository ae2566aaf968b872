//! Cursor abstractions over a byte source
//!
//! Two cursors share one semantic interface: [`StringReader`] walks an
//! in-memory byte range with O(1) position queries, and [`IoReader`] walks a
//! blocking byte stream. The io cursor may block while the source produces
//! more bytes, but every `read_*` call hands back a complete value; a source
//! that runs dry mid value yields [`Error::EndOfInput`].

use byteorder_lite::{ByteOrder, LE};

#[cfg(feature = "std")]
use crate::buffer::MsgBuffer;
use crate::codec::{Prefix, WireType};
use crate::errors::{Error, Result};

/// The cursor interface every decoder runs against
pub trait Reader {
    /// Reads the next byte
    fn read_byte(&mut self) -> Result<u8>;

    /// Fills `buf` completely from the source
    fn read_into(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Discards exactly `n` bytes
    fn skip(&mut self, n: u64) -> Result<()>;

    /// Bytes consumed since the cursor was created
    fn offset(&self) -> u64;

    /// Reads `n` bytes into an owned buffer
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        // grow in bounded steps so a hostile length prefix cannot force a
        // huge allocation before the source runs dry
        let mut out = Vec::with_capacity(n.min(4096));
        let mut chunk = [0u8; 4096];
        let mut remaining = n;
        while remaining > 0 {
            let take = remaining.min(chunk.len());
            self.read_into(&mut chunk[..take])?;
            out.extend_from_slice(&chunk[..take]);
            remaining -= take;
        }
        Ok(out)
    }

    /// Reads a varint, at most 10 bytes for a 64 bit value
    #[cfg_attr(feature = "std", inline(always))]
    fn read_vint(&mut self) -> Result<u64> {
        let mut r: u64 = 0;
        let mut shift = 0u32;
        loop {
            let b = self.read_byte()?;
            // the tenth byte may only carry the final payload bit
            if shift == 63 && b > 1 {
                return Err(Error::Overflow);
            }
            r |= ((b & 0x7f) as u64) << shift;
            if b & 0x80 == 0 {
                return Ok(r);
            }
            shift += 7;
            if shift > 63 {
                return Err(Error::Overflow);
            }
        }
    }

    /// Reads a zig-zag coded signed varint
    #[cfg_attr(feature = "std", inline)]
    fn read_signed_vint(&mut self) -> Result<i64> {
        let n = self.read_vint()?;
        Ok(((n >> 1) as i64) ^ -((n & 1) as i64))
    }

    /// Reads one prefix varint and splits it into `(tag, wire_type)`
    #[cfg_attr(feature = "std", inline(always))]
    fn read_prefix(&mut self) -> Result<Prefix> {
        Prefix::decode(self.read_vint()?)
    }

    /// Reads a 1 byte body
    fn read_bits8(&mut self) -> Result<u8> {
        self.read_byte()
    }

    /// Reads a 4 byte little endian body
    fn read_bits32(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        self.read_into(&mut b)?;
        Ok(LE::read_u32(&b))
    }

    /// Reads an 8 byte little endian body
    fn read_bits64(&mut self) -> Result<u64> {
        let mut b = [0u8; 8];
        self.read_into(&mut b)?;
        Ok(LE::read_u64(&b))
    }

    /// Reads an IEEE-754 double stored as 8 little endian bytes
    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_bits64()?))
    }

    /// Discards one whole value whose prefix has already been read
    fn skip_value(&mut self, prefix: Prefix) -> Result<()> {
        match prefix.wire_type {
            WireType::Vint => self.read_vint().map(drop),
            WireType::Enum => Ok(()),
            WireType::Bits8 => self.skip(1),
            WireType::Bits32 => self.skip(4),
            WireType::Bits64Long | WireType::Bits64Float => self.skip(8),
            WireType::Tuple | WireType::Htuple | WireType::Bytes | WireType::Assoc => {
                let len = self.read_vint()?;
                self.skip(len)
            }
        }
    }
}

/// A cursor over an in-memory byte range
#[derive(Debug, Clone)]
pub struct StringReader<'a> {
    bytes: &'a [u8],
    start: usize,
    pos: usize,
    end: usize,
}

impl<'a> StringReader<'a> {
    /// Creates a cursor over all of `bytes`
    pub fn from_bytes(bytes: &'a [u8]) -> StringReader<'a> {
        StringReader {
            bytes,
            start: 0,
            pos: 0,
            end: bytes.len(),
        }
    }

    /// Creates a cursor over `bytes[offset..offset + len]`
    pub fn from_range(bytes: &'a [u8], offset: usize, len: usize) -> Result<StringReader<'a>> {
        let end = offset.checked_add(len).ok_or(Error::EndOfInput)?;
        if end > bytes.len() {
            return Err(Error::EndOfInput);
        }
        Ok(StringReader {
            bytes,
            start: offset,
            pos: offset,
            end,
        })
    }

    /// Absolute position in the underlying slice
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewinds to a position previously returned by [`position`](Self::position)
    pub fn rewind_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.start && pos <= self.end);
        self.pos = pos.clamp(self.start, self.end);
    }

    /// Bytes left before the cursor is exhausted
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }
}

impl Reader for StringReader<'_> {
    #[cfg_attr(feature = "std", inline(always))]
    fn read_byte(&mut self) -> Result<u8> {
        if self.pos >= self.end {
            return Err(Error::EndOfInput);
        }
        let b = self.bytes[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let next = self.pos.checked_add(buf.len()).ok_or(Error::EndOfInput)?;
        if next > self.end {
            return Err(Error::EndOfInput);
        }
        buf.copy_from_slice(&self.bytes[self.pos..next]);
        self.pos = next;
        Ok(())
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        let n = usize::try_from(n).map_err(|_| Error::EndOfInput)?;
        let next = self.pos.checked_add(n).ok_or(Error::EndOfInput)?;
        if next > self.end {
            return Err(Error::EndOfInput);
        }
        self.pos = next;
        Ok(())
    }

    fn offset(&self) -> u64 {
        (self.pos - self.start) as u64
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let next = self.pos.checked_add(n).ok_or(Error::EndOfInput)?;
        if next > self.end {
            return Err(Error::EndOfInput);
        }
        let out = self.bytes[self.pos..next].to_vec();
        self.pos = next;
        Ok(out)
    }
}

/// A cursor over a blocking byte stream.
///
/// Each request loops until the byte count is satisfied, so a slow source
/// simply blocks the caller. Wrap the source in [`std::io::BufReader`] when
/// many small reads would otherwise hit the operating system directly.
#[cfg(feature = "std")]
pub struct IoReader<R> {
    inner: R,
    consumed: u64,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoReader<R> {
    /// Creates a cursor over `inner`
    pub fn new(inner: R) -> IoReader<R> {
        IoReader { inner, consumed: 0 }
    }

    /// Consumes the cursor, yielding the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads one length-prefixed top-level message and returns it as owned
    /// bytes, framing included, ready for a [`StringReader`]
    pub fn read_message(&mut self) -> Result<Vec<u8>> {
        let prefix = self.read_prefix()?;
        if prefix.wire_type != WireType::Tuple {
            return Err(Error::BadWireType(prefix.wire_type.nibble()));
        }
        let len = self.read_vint()?;
        let body = self.read_bytes(usize::try_from(len).map_err(|_| Error::Overflow)?)?;
        let mut framed = MsgBuffer::with_capacity(body.len() + 12);
        framed.add_vint(prefix.encode());
        framed.add_vint(len);
        framed.add_bytes(&body);
        Ok(framed.into_vec())
    }
}

#[cfg(feature = "std")]
fn from_io(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::EndOfInput
    } else {
        Error::Io(e)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader for IoReader<R> {
    fn read_byte(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b).map_err(from_io)?;
        self.consumed += 1;
        Ok(b[0])
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read_exact(buf).map_err(from_io)?;
        self.consumed += buf.len() as u64;
        Ok(())
    }

    fn skip(&mut self, n: u64) -> Result<()> {
        let mut chunk = [0u8; 512];
        let mut remaining = n;
        while remaining > 0 {
            let take = remaining.min(chunk.len() as u64) as usize;
            self.inner.read_exact(&mut chunk[..take]).map_err(from_io)?;
            self.consumed += take as u64;
            remaining -= take as u64;
        }
        Ok(())
    }

    fn offset(&self) -> u64 {
        self.consumed
    }
}
