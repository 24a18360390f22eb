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

//! Decorators applied by the coder materializer.

use std::sync::Arc;

use crate::buffer::{Reader, Writer};
use crate::codec::{Codec, CodecRef};
use crate::error::Error;
use crate::types::NullFlag;

/// Null-tolerant framing: every payload is preceded by a [`NullFlag`].
///
/// Rust values are never null, so encoding always writes `NotNull`; a `Null`
/// flag on the wire (written by a peer) cannot be represented and is rejected.
pub struct NullableCodec<T> {
    inner: CodecRef<T>,
}

impl<T> NullableCodec<T> {
    pub fn new(inner: CodecRef<T>) -> NullableCodec<T> {
        NullableCodec { inner }
    }
}

impl<T: 'static> Codec<T> for NullableCodec<T> {
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        writer.write_i8(NullFlag::NotNull.into());
        self.inner.encode(value, writer)
    }

    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        match NullFlag::from_byte(reader.read_i8()?)? {
            NullFlag::NotNull => self.inner.decode(reader),
            NullFlag::Null => Err(Error::invalid_data(format!(
                "null value for non-nullable {}",
                self.inner.describe()
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("Nullable({})", self.inner.describe())
    }
}

/// Gives a codec a stable identity: equality and hashing follow the
/// structural description, computed once.
pub struct CanonicalCodec<T> {
    inner: CodecRef<T>,
    description: String,
}

impl<T: 'static> CanonicalCodec<T> {
    /// Wraps `codec` unless it is canonical already.
    pub fn wrap(codec: CodecRef<T>) -> CodecRef<T> {
        if codec.is_canonical() {
            return codec;
        }
        let description = codec.describe();
        tracing::trace!(codec = %description, "canonicalized codec");
        Arc::new(CanonicalCodec {
            inner: codec,
            description,
        })
    }

    pub fn inner(&self) -> &CodecRef<T> {
        &self.inner
    }
}

impl<T: 'static> Codec<T> for CanonicalCodec<T> {
    #[inline(always)]
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        self.inner.encode(value, writer)
    }

    #[inline(always)]
    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        self.inner.decode(reader)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }

    fn is_canonical(&self) -> bool {
        true
    }
}

impl<T> PartialEq for CanonicalCodec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl<T> Eq for CanonicalCodec<T> {}

impl<T> std::hash::Hash for CanonicalCodec<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.description.hash(state)
    }
}

impl<T> std::fmt::Debug for CanonicalCodec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CanonicalCodec")
            .field(&self.description)
            .finish()
    }
}

type FromFn<U, T> = Arc<dyn Fn(U) -> Result<T, Error> + Send + Sync>;
type ToFn<T, U> = Arc<dyn Fn(&T) -> Result<U, Error> + Send + Sync>;

/// Adapts a codec for `U` into one for `T` through a pair of conversions.
pub struct MappedCodec<U, T> {
    inner: CodecRef<U>,
    from: FromFn<U, T>,
    to: ToFn<T, U>,
    label: String,
}

impl<U: 'static, T: 'static> MappedCodec<U, T> {
    pub fn new<F, G>(inner: CodecRef<U>, from: F, to: G) -> MappedCodec<U, T>
    where
        F: Fn(U) -> T + Send + Sync + 'static,
        G: Fn(&T) -> U + Send + Sync + 'static,
    {
        Self::try_new(inner, move |u| Ok(from(u)), move |t| Ok(to(t)))
    }

    /// Conversions that may fail, such as projecting one variant out of an enum.
    pub fn try_new<F, G>(inner: CodecRef<U>, from: F, to: G) -> MappedCodec<U, T>
    where
        F: Fn(U) -> Result<T, Error> + Send + Sync + 'static,
        G: Fn(&T) -> Result<U, Error> + Send + Sync + 'static,
    {
        MappedCodec {
            inner,
            from: Arc::new(from),
            to: Arc::new(to),
            label: short_type_name::<T>().to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl<U: 'static, T: 'static> Codec<T> for MappedCodec<U, T> {
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        let u = (self.to)(value)?;
        self.inner.encode(&u, writer)
    }

    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        let u = self.inner.decode(reader)?;
        (self.from)(u)
    }

    fn describe(&self) -> String {
        format!("Mapped[{}]({})", self.label, self.inner.describe())
    }
}

/// `std::any::type_name` without the module path of the outermost type.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
