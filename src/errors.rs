//! Every failure the runtime can surface while encoding or decoding

use std::fmt;

/// A wrapper for all the errors the (de)serializer may raise
#[derive(Debug)]
pub enum Error {
    /// Io error when reading from or writing to a byte stream
    #[cfg(feature = "std")]
    Io(std::io::Error),
    /// A `string` value requested as utf8 did not hold valid utf8
    Utf8(std::str::Utf8Error),
    /// The low nibble of a prefix is the invalid sentinel or a reserved value
    BadWireType(u8),
    /// A sum constructor tag not present in the reader's schema
    UnknownTag(u32),
    /// A varint exceeded 64 bits, or a narrowed integer fell out of range
    Overflow,
    /// The byte source was exhausted in the middle of a value
    EndOfInput,
    /// A required field was absent and its type has no computable default
    MissingFieldNoDefault(&'static str),
    /// The decoder hit its recursion bound
    DepthExceeded,
    /// Version index out of bounds for the codec table on write
    InvalidVersion(usize),
    /// The version read from the wire is not known to the codec table
    WrongProtocolVersion {
        /// Number of versions the reading side knows
        max_known: usize,
        /// Version found on the wire
        found: usize,
    },
    /// Bytes remained after a top level decode that should have been exhaustive
    ExtraDataAfterValue(usize),
}

/// A wrapper for the result of the (de)serializer's operations
pub type Result<T> = ::std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            #[cfg(feature = "std")]
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Utf8(e) => write!(f, "string is not valid utf8: {e}"),
            Error::BadWireType(n) => write!(f, "invalid wire type nibble {n:#x}"),
            Error::UnknownTag(t) => write!(f, "unknown constructor tag {t}"),
            Error::Overflow => write!(f, "integer does not fit the requested width"),
            Error::EndOfInput => write!(f, "end of input reached mid value"),
            Error::MissingFieldNoDefault(path) => {
                write!(f, "missing field with no default: {path}")
            }
            Error::DepthExceeded => write!(f, "message nesting exceeds the decode depth bound"),
            Error::InvalidVersion(v) => write!(f, "version {v} is outside the codec table"),
            Error::WrongProtocolVersion { max_known, found } => {
                write!(
                    f,
                    "wrong protocol version: found {found}, at most {max_known} known"
                )
            }
            Error::ExtraDataAfterValue(n) => {
                write!(f, "{n} bytes left over after the top level value")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(e: std::str::Utf8Error) -> Error {
        Error::Utf8(e)
    }
}
