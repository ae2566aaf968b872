//! Default-value computation for schema types
//!
//! The default is what a reader substitutes when a tuple element or message
//! field is missing from older data. Not every type has one — a sum with no
//! constant constructor whose field tuple is not total, for example — and
//! those surface as [`MissingFieldNoDefault`](Error::MissingFieldNoDefault)
//! the moment a reader actually needs the missing value.

use crate::errors::{Error, Result};

/// The schema default of a type, when it has one
pub trait WireDefault: Sized {
    /// Returns the default, or `None` when the type has no computable default
    fn wire_default() -> Option<Self>;
}

impl WireDefault for bool {
    fn wire_default() -> Option<bool> {
        Some(false)
    }
}

impl WireDefault for u8 {
    fn wire_default() -> Option<u8> {
        Some(0)
    }
}

impl WireDefault for i32 {
    fn wire_default() -> Option<i32> {
        Some(0)
    }
}

impl WireDefault for i64 {
    fn wire_default() -> Option<i64> {
        Some(0)
    }
}

impl WireDefault for f64 {
    fn wire_default() -> Option<f64> {
        Some(0.0)
    }
}

impl WireDefault for String {
    fn wire_default() -> Option<String> {
        Some(String::new())
    }
}

// lists and arrays default to empty whatever the element type
impl<T> WireDefault for Vec<T> {
    fn wire_default() -> Option<Vec<T>> {
        Some(Vec::new())
    }
}

macro_rules! tuple_defaults {
    ($($ty:ident)+) => {
        impl<$($ty: WireDefault),+> WireDefault for ($($ty,)+) {
            fn wire_default() -> Option<($($ty,)+)> {
                Some(($($ty::wire_default()?,)+))
            }
        }
    };
}

tuple_defaults! { A }
tuple_defaults! { A B }
tuple_defaults! { A B C }
tuple_defaults! { A B C D }
tuple_defaults! { A B C D E }
tuple_defaults! { A B C D E F }
tuple_defaults! { A B C D E F G }
tuple_defaults! { A B C D E F G H }

/// The default for `T`, or the missing-field error naming the decode path
pub fn default_or_missing<T: WireDefault>(path: &'static str) -> Result<T> {
    T::wire_default().ok_or(Error::MissingFieldNoDefault(path))
}
