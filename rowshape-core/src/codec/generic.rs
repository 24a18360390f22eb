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

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::buffer::{Reader, Writer};
use crate::codec::Codec;
use crate::config::{FallbackConfig, IntEncoding};
use crate::error::Error;

/// Identity of a type carried by a fallback coder.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag {
    name: &'static str,
    id: TypeId,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> TypeTag {
        TypeTag {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

macro_rules! with_bincode_options {
    ($config:expr, |$opts:ident| $body:expr) => {{
        let base = bincode::DefaultOptions::new();
        match ($config.int_encoding, $config.size_limit) {
            (IntEncoding::Varint, None) => {
                let $opts = base;
                $body
            }
            (IntEncoding::Varint, Some(limit)) => {
                let $opts = base.with_limit(limit);
                $body
            }
            (IntEncoding::Fixed, None) => {
                let $opts = base.with_fixint_encoding();
                $body
            }
            (IntEncoding::Fixed, Some(limit)) => {
                let $opts = base.with_fixint_encoding().with_limit(limit);
                $body
            }
        }
    }};
}

/// Serializes any serde type through bincode, length-prefixed so it composes
/// inside records and sequences.
pub struct GenericCodec<T> {
    tag: TypeTag,
    config: FallbackConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> GenericCodec<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    pub fn new(tag: TypeTag, config: FallbackConfig) -> GenericCodec<T> {
        GenericCodec {
            tag,
            config,
            _marker: PhantomData,
        }
    }

    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }
}

impl<T> Codec<T> for GenericCodec<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        let bytes = with_bincode_options!(self.config, |opts| opts.serialize(value))?;
        writer.write_len_bytes(&bytes)
    }

    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        let bytes = reader.read_len_bytes()?;
        let value = with_bincode_options!(self.config, |opts| opts.deserialize::<T>(bytes))?;
        Ok(value)
    }

    fn describe(&self) -> String {
        let encoding = match self.config.int_encoding {
            IntEncoding::Varint => "varint",
            IntEncoding::Fixed => "fixint",
        };
        match self.config.size_limit {
            Some(limit) => format!("Generic[{}; {}; limit={}]", self.tag.name, encoding, limit),
            None => format!("Generic[{}; {}]", self.tag.name, encoding),
        }
    }
}
