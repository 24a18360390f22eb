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

use crate::buffer::{Reader, Writer};
use crate::codec::{Codec, CodecRef};
use crate::error::Error;
use crate::types::NullFlag;

/// `Option<T>`: a [`NullFlag`] byte, then the payload when present.
pub struct OptionCodec<T> {
    inner: CodecRef<T>,
}

impl<T> OptionCodec<T> {
    pub fn new(inner: CodecRef<T>) -> OptionCodec<T> {
        OptionCodec { inner }
    }
}

impl<T: 'static> Codec<Option<T>> for OptionCodec<T> {
    fn encode(&self, value: &Option<T>, writer: &mut Writer) -> Result<(), Error> {
        match value {
            Some(v) => {
                writer.write_i8(NullFlag::NotNull.into());
                self.inner.encode(v, writer)
            }
            None => {
                writer.write_i8(NullFlag::Null.into());
                Ok(())
            }
        }
    }

    fn decode(&self, reader: &mut Reader) -> Result<Option<T>, Error> {
        match NullFlag::from_byte(reader.read_i8()?)? {
            NullFlag::Null => Ok(None),
            NullFlag::NotNull => self.inner.decode(reader).map(Some),
        }
    }

    fn describe(&self) -> String {
        format!("Option({})", self.inner.describe())
    }
}

/// `Vec<T>`: varint length, then each element.
pub struct SeqCodec<T> {
    element: CodecRef<T>,
}

impl<T> SeqCodec<T> {
    pub fn new(element: CodecRef<T>) -> SeqCodec<T> {
        SeqCodec { element }
    }
}

impl<T: 'static> Codec<Vec<T>> for SeqCodec<T> {
    fn encode(&self, value: &Vec<T>, writer: &mut Writer) -> Result<(), Error> {
        writer.write_len(value.len())?;
        for v in value {
            self.element.encode(v, writer)?;
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader) -> Result<Vec<T>, Error> {
        let len = reader.read_varuint32()? as usize;
        // elements may be zero-width, so only the preallocation is bounded
        let mut values = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            values.push(self.element.decode(reader)?);
        }
        Ok(values)
    }

    fn describe(&self) -> String {
        format!("Seq({})", self.element.describe())
    }
}

/// Dedicated pair codec for key/value data: key first, then value.
pub struct KvCodec<K, V> {
    key: CodecRef<K>,
    value: CodecRef<V>,
}

impl<K, V> KvCodec<K, V> {
    pub fn new(key: CodecRef<K>, value: CodecRef<V>) -> KvCodec<K, V> {
        KvCodec { key, value }
    }

    pub fn key_codec(&self) -> &CodecRef<K> {
        &self.key
    }

    pub fn value_codec(&self) -> &CodecRef<V> {
        &self.value
    }
}

impl<K: 'static, V: 'static> Codec<(K, V)> for KvCodec<K, V> {
    fn encode(&self, value: &(K, V), writer: &mut Writer) -> Result<(), Error> {
        self.key.encode(&value.0, writer)?;
        self.value.encode(&value.1, writer)
    }

    fn decode(&self, reader: &mut Reader) -> Result<(K, V), Error> {
        let key = self.key.decode(reader)?;
        let value = self.value.decode(reader)?;
        Ok((key, value))
    }

    fn describe(&self) -> String {
        format!("KV({}, {})", self.key.describe(), self.value.describe())
    }
}
