//! Seams between the runtime and generated message types
//!
//! The code generator emits one impl of each trait per top-level message;
//! the hand-written types under `tests/` show the exact shape it produces.

use crate::decode::DecodeContext;
use crate::errors::Result;
use crate::reader::Reader;
use crate::writer::Writer;

/// A type that can emit itself as a complete top-level message frame
pub trait MessageWrite {
    /// Writes the full `prefix; length; count; fields` frame for `self`
    fn write_message(&self, w: &mut Writer<'_>) -> Result<()>;
}

/// A type that can rebuild itself from a message frame
pub trait MessageRead: Sized {
    /// Reads one complete message, prefix included
    fn read_message<R: Reader>(r: &mut R, cx: DecodeContext) -> Result<Self>;
}
