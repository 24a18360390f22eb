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

//! Concrete, ready-to-use codecs.
//!
//! A [`Codec`] is what the coder materializer lowers a
//! [`crate::coder::Coder`] into. Native codecs for the built-in leaf types
//! live in [`primitive`]; [`wrapper`] holds the decorators the materializer
//! applies; [`generic`] is the serde-backed fallback.

use std::sync::Arc;

use crate::buffer::{Reader, Writer};
use crate::error::Error;

pub mod composite;
pub mod generic;
pub mod primitive;
pub mod wrapper;

pub use composite::{KvCodec, OptionCodec, SeqCodec};
pub use generic::{GenericCodec, TypeTag};
pub use primitive::Native;
pub use wrapper::{CanonicalCodec, MappedCodec, NullableCodec};

pub trait Codec<T>: Send + Sync {
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error>;

    fn decode(&self, reader: &mut Reader) -> Result<T, Error>;

    /// Structural description. Two codecs with the same description read and
    /// write the same bytes, so it doubles as an identity for caching.
    fn describe(&self) -> String;

    #[inline(always)]
    fn is_canonical(&self) -> bool {
        false
    }
}

pub type CodecRef<T> = Arc<dyn Codec<T>>;

pub fn encode_to_vec<T, C: Codec<T> + ?Sized>(codec: &C, value: &T) -> Result<Vec<u8>, Error> {
    let mut writer = Writer::default();
    codec.encode(value, &mut writer)?;
    Ok(writer.into_bytes())
}

/// Decodes exactly one value; trailing bytes are an error.
pub fn decode_from_slice<T, C: Codec<T> + ?Sized>(codec: &C, bytes: &[u8]) -> Result<T, Error> {
    let mut reader = Reader::new(bytes);
    let value = codec.decode(&mut reader)?;
    if reader.remaining() != 0 {
        return Err(Error::invalid_data(format!(
            "{} trailing bytes after decoding with {}",
            reader.remaining(),
            codec.describe()
        )));
    }
    Ok(value)
}
