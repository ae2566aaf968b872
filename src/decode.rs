//! Type-directed decoding: the contracts every per-type reader obeys
//!
//! Primitive readers dispatch on the observed wire type. The canonical form
//! decodes the body directly; an `Enum` prefix stands for an absent value and
//! yields the type's default; a `Tuple` body triggers primitive expansion,
//! where the reader descends into the first element and skips whatever a
//! newer schema put after it. Composite readers substitute defaults for
//! missing trailing elements and skip unknown extra ones. Together these four
//! moves are what lets producers and consumers evolve their schemas
//! independently.

use crate::codec::{Prefix, WireType};
use crate::errors::{Error, Result};
use crate::reader::Reader;

/// Recursion bound applied when no explicit one is configured
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Decoder state threaded down the recursion
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    level: u32,
    max_depth: u32,
    path: &'static str,
}

impl DecodeContext {
    /// A root context with the default depth bound
    pub fn new() -> DecodeContext {
        DecodeContext {
            level: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            path: "",
        }
    }

    /// A root context with a caller chosen depth bound
    pub fn with_max_depth(max_depth: u32) -> DecodeContext {
        DecodeContext {
            max_depth,
            ..DecodeContext::new()
        }
    }

    /// Enters one level of nesting
    pub fn descend(self) -> Result<DecodeContext> {
        if self.level >= self.max_depth {
            return Err(Error::DepthExceeded);
        }
        Ok(DecodeContext {
            level: self.level + 1,
            ..self
        })
    }

    /// Names the field being decoded, for error reporting
    pub fn field(self, path: &'static str) -> DecodeContext {
        DecodeContext { path, ..self }
    }

    /// The field most recently named with [`field`](Self::field)
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Current nesting level, 0 at the root
    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Default for DecodeContext {
    fn default() -> DecodeContext {
        DecodeContext::new()
    }
}

/// Skips forward to an absolute offset computed from a body length
fn skip_to<R: Reader>(r: &mut R, end: u64) -> Result<()> {
    let cur = r.offset();
    if cur > end {
        return Err(Error::EndOfInput);
    }
    r.skip(end - cur)
}

/// Primitive expansion: a primitive promoted to a tuple or to a non-constant
/// sum constructor is decoded by descending into the first element and
/// skipping the rest of the body
fn expand<R: Reader, T>(
    r: &mut R,
    cx: DecodeContext,
    inner: fn(&mut R, DecodeContext) -> Result<T>,
    empty: T,
) -> Result<T> {
    let cx = cx.descend()?;
    let len = r.read_vint()?;
    let end = r.offset().checked_add(len).ok_or(Error::Overflow)?;
    let nelms = r.read_vint()?;
    let v = if nelms == 0 { empty } else { inner(r, cx)? };
    skip_to(r, end)?;
    Ok(v)
}

/// Reads a `bool`
pub fn read_bool<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<bool> {
    let p = r.read_prefix()?;
    read_bool_with(r, p, cx)
}

/// Reads a `bool` whose prefix has already been consumed
pub fn read_bool_with<R: Reader>(r: &mut R, p: Prefix, cx: DecodeContext) -> Result<bool> {
    match p.wire_type {
        WireType::Bits8 => Ok(r.read_bits8()? != 0),
        WireType::Enum => Ok(false),
        WireType::Tuple => expand(r, cx, read_bool, false),
        w => Err(Error::BadWireType(w.nibble())),
    }
}

/// Reads a `byte`
pub fn read_byte<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<u8> {
    let p = r.read_prefix()?;
    read_byte_with(r, p, cx)
}

/// Reads a `byte` whose prefix has already been consumed
pub fn read_byte_with<R: Reader>(r: &mut R, p: Prefix, cx: DecodeContext) -> Result<u8> {
    match p.wire_type {
        WireType::Bits8 => r.read_bits8(),
        WireType::Enum => Ok(0),
        WireType::Tuple => expand(r, cx, read_byte, 0),
        w => Err(Error::BadWireType(w.nibble())),
    }
}

/// Reads an `int`
pub fn read_int<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<i32> {
    let p = r.read_prefix()?;
    read_int_with(r, p, cx)
}

/// Reads an `int` whose prefix has already been consumed.
///
/// A `long` body is narrowed with a range check; senders are expected to
/// widen only, so an out of range value is an [`Error::Overflow`], not data.
pub fn read_int_with<R: Reader>(r: &mut R, p: Prefix, cx: DecodeContext) -> Result<i32> {
    match p.wire_type {
        WireType::Vint => {
            let v = r.read_signed_vint()?;
            i32::try_from(v).map_err(|_| Error::Overflow)
        }
        WireType::Bits8 => Ok(r.read_bits8()? as i32),
        WireType::Bits64Long => {
            let v = r.read_bits64()? as i64;
            i32::try_from(v).map_err(|_| Error::Overflow)
        }
        WireType::Enum => Ok(0),
        WireType::Tuple => expand(r, cx, read_int, 0),
        w => Err(Error::BadWireType(w.nibble())),
    }
}

/// Reads a `long`
pub fn read_long<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<i64> {
    let p = r.read_prefix()?;
    read_long_with(r, p, cx)
}

/// Reads a `long` whose prefix has already been consumed. Accepts `int` and
/// `byte` bodies, widened losslessly.
pub fn read_long_with<R: Reader>(r: &mut R, p: Prefix, cx: DecodeContext) -> Result<i64> {
    match p.wire_type {
        WireType::Bits64Long => Ok(r.read_bits64()? as i64),
        WireType::Vint => r.read_signed_vint(),
        WireType::Bits8 => Ok(r.read_bits8()? as i64),
        WireType::Enum => Ok(0),
        WireType::Tuple => expand(r, cx, read_long, 0),
        w => Err(Error::BadWireType(w.nibble())),
    }
}

/// Reads a `float`
pub fn read_float<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<f64> {
    let p = r.read_prefix()?;
    read_float_with(r, p, cx)
}

/// Reads a `float` whose prefix has already been consumed
pub fn read_float_with<R: Reader>(r: &mut R, p: Prefix, cx: DecodeContext) -> Result<f64> {
    match p.wire_type {
        WireType::Bits64Float => r.read_f64(),
        WireType::Enum => Ok(0.0),
        WireType::Tuple => expand(r, cx, read_float, 0.0),
        w => Err(Error::BadWireType(w.nibble())),
    }
}

/// Reads a byte `string`
pub fn read_bytes<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Vec<u8>> {
    let p = r.read_prefix()?;
    read_bytes_with(r, p, cx)
}

/// Reads a byte `string` whose prefix has already been consumed
pub fn read_bytes_with<R: Reader>(r: &mut R, p: Prefix, cx: DecodeContext) -> Result<Vec<u8>> {
    match p.wire_type {
        WireType::Bytes => {
            let len = r.read_vint()?;
            r.read_bytes(usize::try_from(len).map_err(|_| Error::Overflow)?)
        }
        WireType::Enum => Ok(Vec::new()),
        WireType::Tuple => expand(r, cx, read_bytes, Vec::new()),
        w => Err(Error::BadWireType(w.nibble())),
    }
}

/// Reads a `string` validated as utf8
pub fn read_string<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<String> {
    let p = r.read_prefix()?;
    read_string_with(r, p, cx)
}

/// Reads a `string` whose prefix has already been consumed
pub fn read_string_with<R: Reader>(r: &mut R, p: Prefix, cx: DecodeContext) -> Result<String> {
    let raw = read_bytes_with(r, p, cx)?;
    String::from_utf8(raw).map_err(|e| Error::Utf8(e.utf8_error()))
}

/// Streams the elements of one tuple or record body.
///
/// Built after a `Tuple` prefix has been consumed. Elements are pulled one by
/// one; once the count the producer actually wrote is exhausted, `element`
/// returns `None` and the caller substitutes the schema default.
/// [`finish`](Self::finish) then skips whatever a newer producer appended
/// past the declared arity.
pub struct TupleReader<'a, R: Reader> {
    r: &'a mut R,
    end: u64,
    present: u64,
    index: u64,
    cx: DecodeContext,
}

impl<'a, R: Reader> TupleReader<'a, R> {
    /// Reads the body length and present-element count
    pub fn begin(r: &'a mut R, cx: DecodeContext) -> Result<TupleReader<'a, R>> {
        let cx = cx.descend()?;
        let len = r.read_vint()?;
        let end = r.offset().checked_add(len).ok_or(Error::Overflow)?;
        let present = r.read_vint()?;
        Ok(TupleReader {
            r,
            end,
            present,
            index: 0,
            cx,
        })
    }

    /// Count of elements the producer actually wrote
    pub fn present(&self) -> u64 {
        self.present
    }

    /// Decodes the next element, or `None` once the producer's element count
    /// is exhausted
    pub fn element<T, F>(&mut self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut R, DecodeContext) -> Result<T>,
    {
        if self.index >= self.present {
            return Ok(None);
        }
        self.index += 1;
        f(self.r, self.cx).map(Some)
    }

    /// Skips the extra elements a newer producer may have appended
    pub fn finish(self) -> Result<()> {
        skip_to(self.r, self.end)
    }
}

/// Reads a list or array
pub fn read_htuple<R, T, F>(r: &mut R, cx: DecodeContext, elem: F) -> Result<Vec<T>>
where
    R: Reader,
    F: FnMut(&mut R, DecodeContext) -> Result<T>,
{
    let p = r.read_prefix()?;
    read_htuple_with(r, p, cx, elem)
}

/// Reads a list or array whose prefix has already been consumed
pub fn read_htuple_with<R, T, F>(r: &mut R, p: Prefix, cx: DecodeContext, mut elem: F) -> Result<Vec<T>>
where
    R: Reader,
    F: FnMut(&mut R, DecodeContext) -> Result<T>,
{
    match p.wire_type {
        WireType::Htuple => {
            let cx = cx.descend()?;
            let len = r.read_vint()?;
            let end = r.offset().checked_add(len).ok_or(Error::Overflow)?;
            let count = r.read_vint()?;
            // cap the preallocation by the body length so a hostile count
            // cannot reserve more than the body could possibly hold
            let mut out = Vec::with_capacity(count.min(len) as usize);
            for _ in 0..count {
                out.push(elem(r, cx)?);
            }
            skip_to(r, end)?;
            Ok(out)
        }
        WireType::Enum => Ok(Vec::new()),
        w => Err(Error::BadWireType(w.nibble())),
    }
}
