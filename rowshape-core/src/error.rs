// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error type shared by the algebras, the materializers and the host codecs.
//!
//! Every failure in this crate is local to a single `materialize`, `encode`
//! or `decode` call. Nothing is retried and nothing is substituted silently:
//! the caller is expected to fail the enclosing operation.

use std::borrow::Cow;

use thiserror::Error;

/// Set `ROWSHAPE_PANIC_ON_ERROR=1` at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("ROWSHAPE_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for materialization, encoding and decoding.
///
/// Do not construct variants directly; use the static constructor functions
/// ([`Error::invalid_data`], [`Error::unknown_variant`], ...). They accept
/// anything convertible into `Cow<'static, str>` and honor
/// `ROWSHAPE_PANIC_ON_ERROR`, which makes the program panic at the exact
/// creation site:
///
/// ```bash
/// RUST_BACKTRACE=1 ROWSHAPE_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// ```rust
/// use rowshape_core::error::Error;
///
/// let err = Error::invalid_data("row has 3 values, schema has 2 fields");
/// let err = Error::type_mismatch("INT32", format!("{}", "STRING"));
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A value did not have the shape its descriptor declares.
    #[error("Type mismatch: expected {0}, found {1}")]
    TypeMismatch(Cow<'static, str>, Cow<'static, str>),

    /// Read past the end of the input buffer.
    #[error("Buffer out of bound: {0} + {1} > {2}")]
    BufferOutOfBound(usize, usize, usize),

    /// A codec failed to produce bytes.
    #[error("{0}")]
    EncodeError(Cow<'static, str>),

    /// Corrupt input or an inconsistent algebra (construct arity, row arity).
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// A disjunction discriminator with no matching variant.
    #[error("{0}")]
    UnknownVariant(Cow<'static, str>),

    /// A name or discriminator declared twice where uniqueness is required.
    #[error("{0}")]
    Duplicate(Cow<'static, str>),

    /// Materialization went deeper than `Config::max_depth`.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// No coder or schema exists for a type and no fallback was supplied.
    #[error("{0}")]
    Unsupported(Cow<'static, str>),

    /// An internal invariant was violated by the caller.
    #[error("{0}")]
    NotAllowed(Cow<'static, str>),
}

macro_rules! message_constructor {
    ($(#[$meta:meta])* $name:ident => $variant:ident) => {
        $(#[$meta])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $name<S: Into<Cow<'static, str>>>(s: S) -> Self {
            let err = Error::$variant(s.into());
            if PANIC_ON_ERROR {
                panic!("ROWSHAPE_PANIC_ON_ERROR: {}", err);
            }
            err
        }
    };
}

impl Error {
    /// Creates a new [`Error::TypeMismatch`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<Cow<'static, str>>,
        A: Into<Cow<'static, str>>,
    {
        let err = Error::TypeMismatch(expected.into(), actual.into());
        if PANIC_ON_ERROR {
            panic!("ROWSHAPE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::BufferOutOfBound`].
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn buffer_out_of_bound(offset: usize, length: usize, capacity: usize) -> Self {
        let err = Error::BufferOutOfBound(offset, length, capacity);
        if PANIC_ON_ERROR {
            panic!("ROWSHAPE_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    message_constructor!(
        /// Creates a new [`Error::EncodeError`].
        encode_error => EncodeError
    );
    message_constructor!(
        /// Creates a new [`Error::InvalidData`].
        invalid_data => InvalidData
    );
    message_constructor!(
        /// Creates a new [`Error::UnknownVariant`].
        unknown_variant => UnknownVariant
    );
    message_constructor!(
        /// Creates a new [`Error::Duplicate`].
        duplicate => Duplicate
    );
    message_constructor!(
        /// Creates a new [`Error::DepthExceed`].
        depth_exceed => DepthExceed
    );
    message_constructor!(
        /// Creates a new [`Error::Unsupported`].
        unsupported => Unsupported
    );
    message_constructor!(
        /// Creates a new [`Error::NotAllowed`].
        not_allowed => NotAllowed
    );

    /// Appends the Rust type name to an [`Error::Unsupported`] message;
    /// other errors are returned unchanged.
    ///
    /// ```
    /// use rowshape_core::error::Error;
    ///
    /// let err = Error::unsupported("no coder registered");
    /// let err = Error::enhance_type_error::<String>(err);
    /// assert!(err.to_string().contains("alloc::string::String"));
    /// ```
    #[inline(never)]
    pub fn enhance_type_error<T: ?Sized + 'static>(err: Error) -> Error {
        let with_type = |s: &str| format!("{} (type: {})", s, std::any::type_name::<T>());
        match err {
            Error::Unsupported(s) => Error::unsupported(with_type(&s)),
            other => other,
        }
    }
}

impl From<bincode::Error> for Error {
    #[track_caller]
    fn from(err: bincode::Error) -> Self {
        Error::encode_error(err.to_string())
    }
}

/// Ensures a condition is true; otherwise returns an [`Error::InvalidData`].
///
/// ```
/// use rowshape_core::ensure;
/// use rowshape_core::error::Error;
///
/// fn check_arity(n: usize) -> Result<(), Error> {
///     ensure!(n > 0, "a record needs at least one field");
///     ensure!(n < 1024, "record has {} fields", n);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::InvalidData`].
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::invalid_data($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)))
    };
}

/// Returns early with a [`Error::NotAllowed`].
#[macro_export]
macro_rules! not_allowed {
    ($err:expr) => {
        return Err($crate::error::Error::not_allowed($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::not_allowed(format!($fmt, $($arg)*)))
    };
}
