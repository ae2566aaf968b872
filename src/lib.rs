//! A pure Rust runtime for the extprot binary serialization format
//!
//! extprot messages are self-describing, tagged, length-prefixed values whose
//! schemas may evolve independently on each side of the wire: fields can be
//! added, primitives promoted to tuples or tagged unions, integers widened,
//! and new constructors introduced, while readers keep accepting data from
//! both older and newer producers.
//!
//! This crate is the wire runtime only: the binary encoding, the
//! type-directed reader/writer toolkit per-schema-type codecs are composed
//! from, default-value computation, and the 16 bit versioned framing. The
//! schema language parser and the code generator are separate concerns; the
//! hand-written types under `tests/` show the shape of the code they emit.
//!
//! ```rust
//! use extprot::{conv, decode, DecodeContext, MsgBuffer, Reader, Result, StringReader, Writer};
//!
//! fn write_point(w: &mut Writer<'_>, p: &(i32, i32)) -> Result<()> {
//!     w.write_tuple(0, 2, |w| {
//!         w.write_int(0, p.0)?;
//!         w.write_int(0, p.1)
//!     })
//! }
//!
//! fn read_point(r: &mut StringReader<'_>, cx: DecodeContext) -> Result<(i32, i32)> {
//!     r.read_prefix()?;
//!     let mut t = decode::TupleReader::begin(r, cx)?;
//!     let x = t.element(decode::read_int)?.unwrap_or(0);
//!     let y = t.element(decode::read_int)?.unwrap_or(0);
//!     t.finish()?;
//!     Ok((x, y))
//! }
//!
//! let mut buf = MsgBuffer::new();
//! let bytes = conv::serialize(write_point, &(3, -4), Some(&mut buf)).unwrap();
//! assert_eq!(conv::deserialize(read_point, &bytes).unwrap(), (3, -4));
//! ```

pub mod buffer;
pub mod codec;
pub mod conv;
pub mod decode;
pub mod defaults;
pub mod errors;
pub mod message;
pub mod reader;
pub mod writer;

pub use crate::{
    buffer::MsgBuffer,
    codec::{Prefix, WireType},
    conv::{deserialize, serialize, ReadFn, WriteFn},
    decode::DecodeContext,
    defaults::WireDefault,
    errors::{Error, Result},
    message::{MessageRead, MessageWrite},
    reader::{Reader, StringReader},
    writer::Writer,
};

#[cfg(feature = "std")]
pub use crate::reader::IoReader;
