//! The stable serialize/deserialize entry points and the versioned framings
//!
//! A versioned frame starts with a 16 bit little endian version index that
//! selects one entry of a codec table. The version always travels *before*
//! the body, on both the in-memory and the io paths; a peer that expects it
//! after the body is not wire compatible with this framing.

use crate::buffer::MsgBuffer;
use crate::decode::DecodeContext;
use crate::errors::{Error, Result};
use crate::message::{MessageRead, MessageWrite};
use crate::reader::StringReader;
use crate::writer::Writer;

#[cfg(feature = "std")]
use crate::reader::{IoReader, Reader};
#[cfg(feature = "std")]
use log::{debug, trace};

/// One entry of a versioned read table
pub type ReadFn<T> = fn(&mut StringReader<'_>, DecodeContext) -> Result<T>;

/// One entry of a versioned write table
pub type WriteFn<T> = fn(&mut Writer<'_>, &T) -> Result<()>;

/// Greatest version index the two byte frame header can carry
const MAX_VERSION: usize = 0xffff;

fn fill<T, F>(write: F, x: &T, buf: &mut MsgBuffer) -> Result<()>
where
    F: FnOnce(&mut Writer<'_>, &T) -> Result<()>,
{
    buf.clear();
    write(&mut Writer::new(buf), x)
}

/// Runs `write` into `buf` (cleared first) or a fresh buffer, returning the
/// encoded bytes
pub fn serialize<T, F>(write: F, x: &T, buf: Option<&mut MsgBuffer>) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Writer<'_>, &T) -> Result<()>,
{
    match buf {
        Some(buf) => {
            fill(write, x, buf)?;
            Ok(buf.contents().to_vec())
        }
        None => {
            let mut fresh = MsgBuffer::new();
            fill(write, x, &mut fresh)?;
            Ok(fresh.into_vec())
        }
    }
}

/// Decodes one value from `bytes`, which must be consumed exactly
pub fn deserialize<'a, T, F>(read: F, bytes: &'a [u8]) -> Result<T>
where
    F: FnOnce(&mut StringReader<'a>, DecodeContext) -> Result<T>,
{
    deserialize_at(read, bytes, 0)
}

/// Decodes one value starting at `offset`; the rest of `bytes` must be
/// consumed exactly
pub fn deserialize_at<'a, T, F>(read: F, bytes: &'a [u8], offset: usize) -> Result<T>
where
    F: FnOnce(&mut StringReader<'a>, DecodeContext) -> Result<T>,
{
    let len = bytes.len().checked_sub(offset).ok_or(Error::EndOfInput)?;
    let mut r = StringReader::from_range(bytes, offset, len)?;
    let v = read(&mut r, DecodeContext::new())?;
    if r.remaining() != 0 {
        return Err(Error::ExtraDataAfterValue(r.remaining()));
    }
    Ok(v)
}

/// Serializes a [`MessageWrite`] implementor
pub fn serialize_message<T: MessageWrite>(x: &T, buf: Option<&mut MsgBuffer>) -> Result<Vec<u8>> {
    fn go<T: MessageWrite>(w: &mut Writer<'_>, x: &T) -> Result<()> {
        x.write_message(w)
    }
    serialize(go::<T>, x, buf)
}

/// Deserializes a [`MessageRead`] implementor
pub fn deserialize_message<T: MessageRead>(bytes: &[u8]) -> Result<T> {
    fn go<T: MessageRead>(r: &mut StringReader<'_>, cx: DecodeContext) -> Result<T> {
        T::read_message(r, cx)
    }
    deserialize(go::<T>, bytes)
}

/// Reads one framed message from `io` and decodes it
#[cfg(feature = "std")]
pub fn read<T, F>(read: F, io: &mut impl std::io::Read) -> Result<T>
where
    F: FnOnce(&mut StringReader<'_>, DecodeContext) -> Result<T>,
{
    let frame = IoReader::new(io).read_message()?;
    deserialize(read, &frame)
}

/// Serializes `x` and writes the bytes to `io`
#[cfg(feature = "std")]
pub fn write<T, F>(
    write_fn: F,
    io: &mut impl std::io::Write,
    x: &T,
    buf: Option<&mut MsgBuffer>,
) -> Result<()>
where
    F: FnOnce(&mut Writer<'_>, &T) -> Result<()>,
{
    match buf {
        Some(buf) => {
            fill(write_fn, x, buf)?;
            io.write_all(buf.contents())?;
        }
        None => {
            let mut fresh = MsgBuffer::new();
            fill(write_fn, x, &mut fresh)?;
            io.write_all(fresh.contents())?;
        }
    }
    Ok(())
}

/// Serializes `x` under `version`, prepending the 16 bit little endian
/// version tag
pub fn serialize_versioned<T>(
    fs: &[WriteFn<T>],
    version: usize,
    x: &T,
    buf: Option<&mut MsgBuffer>,
) -> Result<Vec<u8>> {
    if version > MAX_VERSION || version >= fs.len() {
        return Err(Error::InvalidVersion(version));
    }
    let write = fs[version];
    let header = (version as u16).to_le_bytes();
    let emit = move |b: &mut MsgBuffer| -> Result<()> {
        b.add_bytes(&header);
        write(&mut Writer::new(b), x)
    };
    match buf {
        Some(buf) => {
            buf.clear();
            emit(buf)?;
            Ok(buf.contents().to_vec())
        }
        None => {
            let mut fresh = MsgBuffer::new();
            emit(&mut fresh)?;
            Ok(fresh.into_vec())
        }
    }
}

/// Decodes a blob produced by [`serialize_versioned`]
pub fn deserialize_versioned<T>(fs: &[ReadFn<T>], bytes: &[u8]) -> Result<T> {
    if bytes.len() < 2 {
        return Err(Error::EndOfInput);
    }
    let found = u16::from_le_bytes([bytes[0], bytes[1]]) as usize;
    if found >= fs.len() {
        return Err(Error::WrongProtocolVersion {
            max_known: fs.len(),
            found,
        });
    }
    deserialize_at(fs[found], bytes, 2)
}

/// Decodes a body-only blob under a caller supplied version
pub fn deserialize_versioned_explicit<T>(
    fs: &[ReadFn<T>],
    version: usize,
    bytes: &[u8],
) -> Result<T> {
    if version >= fs.len() {
        return Err(Error::WrongProtocolVersion {
            max_known: fs.len(),
            found: version,
        });
    }
    deserialize(fs[version], bytes)
}

/// Reads the 16 bit version and one framed message, without decoding it
#[cfg(feature = "std")]
pub fn read_frame(io: &mut impl std::io::Read) -> Result<(u16, Vec<u8>)> {
    let mut r = IoReader::new(io);
    let mut vb = [0u8; 2];
    r.read_into(&mut vb)?;
    let version = u16::from_le_bytes(vb);
    let frame = r.read_message()?;
    trace!("read frame: version {version}, {} bytes", frame.len());
    Ok((version, frame))
}

/// Reads a versioned frame and decodes it with the matching codec.
///
/// An unknown version drains exactly the offending frame before failing, so
/// the stream stays aligned for the next one.
#[cfg(feature = "std")]
pub fn read_versioned<T>(fs: &[ReadFn<T>], io: &mut impl std::io::Read) -> Result<T> {
    let mut r = IoReader::new(io);
    let mut vb = [0u8; 2];
    r.read_into(&mut vb)?;
    let found = u16::from_le_bytes(vb) as usize;
    if found >= fs.len() {
        let prefix = r.read_prefix()?;
        r.skip_value(prefix)?;
        debug!(
            "skipped frame with unknown protocol version {found} (max known {})",
            fs.len()
        );
        return Err(Error::WrongProtocolVersion {
            max_known: fs.len(),
            found,
        });
    }
    let frame = r.read_message()?;
    deserialize(fs[found], &frame)
}

/// Writes the 16 bit version, then the framed message
#[cfg(feature = "std")]
pub fn write_versioned<T>(
    fs: &[WriteFn<T>],
    version: usize,
    io: &mut impl std::io::Write,
    x: &T,
    buf: Option<&mut MsgBuffer>,
) -> Result<()> {
    let bytes = serialize_versioned(fs, version, x, buf)?;
    io.write_all(&bytes)?;
    Ok(())
}
