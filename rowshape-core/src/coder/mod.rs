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

//! The coder algebra: how a value type is turned into bytes.
//!
//! A [`Coder`] is an immutable description. [`materialize`] lowers it into
//! one concrete [`Codec`](crate::codec::Codec) for a given registry and
//! config; the same coder may be materialized any number of times, from any
//! number of threads.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{
    CodecRef, GenericCodec, KvCodec, MappedCodec, Native, OptionCodec, SeqCodec, TypeTag,
};
use crate::config::FallbackConfig;
use crate::error::Error;
use crate::resolver::MaterializeContext;

mod disjunction;
mod materializer;
pub(crate) mod record;

pub use disjunction::{DisjunctionBuilder, DisjunctionNode, VariantCodec};
pub use materializer::{materialize, CoderMaterializer};
pub use record::{CoderField, FieldCodec, RecordBuilder, RecordCoder};

/// One case per serialization strategy.
pub enum Coder<T> {
    /// A ready-made codec for a leaf type.
    Beam(CodecRef<T>),
    /// No structural or native codec is known; serialize generically.
    Fallback(FallbackCoder<T>),
    /// A codec derived from another coder's codec.
    Transform(Arc<dyn TransformNode<T>>),
    /// Product type: ordered, uniquely named fields.
    Record(RecordCoder<T>),
    /// Sum type: a discriminator selects the payload coder.
    Disjunction(Arc<dyn DisjunctionNode<T>>),
    /// Key/value pair.
    KV(Arc<dyn KvNode<T>>),
}

impl<T> Clone for Coder<T> {
    fn clone(&self) -> Self {
        match self {
            Coder::Beam(codec) => Coder::Beam(codec.clone()),
            Coder::Fallback(fallback) => Coder::Fallback(fallback.clone()),
            Coder::Transform(node) => Coder::Transform(node.clone()),
            Coder::Record(record) => Coder::Record(record.clone()),
            Coder::Disjunction(node) => Coder::Disjunction(node.clone()),
            Coder::KV(node) => Coder::KV(node.clone()),
        }
    }
}

impl<T> std::fmt::Debug for Coder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Coder::Beam(codec) => write!(f, "Beam({})", codec.describe()),
            Coder::Fallback(fallback) => write!(f, "Fallback({:?})", fallback.tag),
            Coder::Transform(_) => f.write_str("Transform"),
            Coder::Record(record) => write!(f, "Record({})", record.name()),
            Coder::Disjunction(node) => write!(f, "Disjunction({})", node.name()),
            Coder::KV(_) => f.write_str("KV"),
        }
    }
}

type MakeFallbackFn<T> = fn(&TypeTag, &FallbackConfig) -> CodecRef<T>;

/// Type identity plus the means to build a generic codec for it once the
/// serializer options are known.
pub struct FallbackCoder<T> {
    tag: TypeTag,
    make: MakeFallbackFn<T>,
}

impl<T> Clone for FallbackCoder<T> {
    fn clone(&self) -> Self {
        FallbackCoder {
            tag: self.tag,
            make: self.make,
        }
    }
}

impl<T> FallbackCoder<T> {
    pub fn tag(&self) -> &TypeTag {
        &self.tag
    }

    pub(crate) fn make(&self, config: &FallbackConfig) -> CodecRef<T> {
        (self.make)(&self.tag, config)
    }
}

fn make_generic<T>(tag: &TypeTag, config: &FallbackConfig) -> CodecRef<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    Arc::new(GenericCodec::<T>::new(*tag, config.clone()))
}

/// Hides the representation type `U` of a transform.
pub trait TransformNode<T>: Send + Sync {
    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<CodecRef<T>, Error>;
}

type ApplyFn<U, T> = Arc<dyn Fn(CodecRef<U>) -> CodecRef<T> + Send + Sync>;

pub struct TransformCoder<U, T> {
    inner: Coder<U>,
    apply: ApplyFn<U, T>,
}

impl<U: 'static, T: 'static> TransformNode<T> for TransformCoder<U, T> {
    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<CodecRef<T>, Error> {
        let inner = CoderMaterializer::materialize(ctx, &self.inner)?;
        Ok((self.apply)(inner))
    }
}

/// Hides the key and value types of a pair coder.
pub trait KvNode<T>: Send + Sync {
    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<CodecRef<T>, Error>;
}

pub struct KvCoder<K, V> {
    key: Coder<K>,
    value: Coder<V>,
}

impl<K: 'static, V: 'static> KvNode<(K, V)> for KvCoder<K, V> {
    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<CodecRef<(K, V)>, Error> {
        let key = CoderMaterializer::materialize(ctx, &self.key)?;
        let value = CoderMaterializer::materialize(ctx, &self.value)?;
        Ok(Arc::new(KvCodec::new(key, value)))
    }
}

impl<T: 'static> Coder<T> {
    pub fn beam(codec: CodecRef<T>) -> Coder<T> {
        Coder::Beam(codec)
    }

    /// Generic serde-backed coder, used when nothing structural is known.
    pub fn fallback() -> Coder<T>
    where
        T: Serialize + DeserializeOwned,
    {
        Coder::Fallback(FallbackCoder {
            tag: TypeTag::of::<T>(),
            make: make_generic::<T>,
        })
    }

    /// Derives this coder from the codec `inner` materializes to.
    pub fn transform<U, F>(inner: Coder<U>, apply: F) -> Coder<T>
    where
        U: 'static,
        F: Fn(CodecRef<U>) -> CodecRef<T> + Send + Sync + 'static,
    {
        Coder::Transform(Arc::new(TransformCoder {
            inner,
            apply: Arc::new(apply),
        }))
    }

    /// Adapts a coder for `U` to `T` through a bijection.
    pub fn xmap<U, F, G>(inner: Coder<U>, from: F, to: G) -> Coder<T>
    where
        U: 'static,
        F: Fn(U) -> T + Send + Sync + 'static,
        G: Fn(&T) -> U + Send + Sync + 'static,
    {
        let from = Arc::new(from);
        let to = Arc::new(to);
        Self::transform(inner, move |codec: CodecRef<U>| -> CodecRef<T> {
            let from = from.clone();
            let to = to.clone();
            Arc::new(MappedCodec::new(codec, move |u| from(u), move |t: &T| to(t)))
        })
    }

    pub fn record(name: impl Into<String>) -> RecordBuilder<T> {
        RecordBuilder::new(name.into())
    }

    pub fn disjunction<I, F>(name: impl Into<String>, id_coder: Coder<I>, id_of: F) -> DisjunctionBuilder<I, T>
    where
        I: std::hash::Hash + Eq + Clone + std::fmt::Debug + Send + Sync + 'static,
        F: Fn(&T) -> I + Send + Sync + 'static,
    {
        DisjunctionBuilder::new(name.into(), id_coder, Arc::new(id_of))
    }

    /// Coder for one case of a sum type: `project` picks the payload out of
    /// the sum value, `inject` wraps a decoded payload back into it.
    pub fn variant<P, F, G>(payload: Coder<P>, inject: F, project: G) -> Coder<T>
    where
        P: 'static,
        F: Fn(P) -> T + Send + Sync + 'static,
        G: Fn(&T) -> Option<&P> + Send + Sync + 'static,
    {
        let inject = Arc::new(inject);
        let project = Arc::new(project);
        Self::transform(payload, move |codec: CodecRef<P>| -> CodecRef<T> {
            Arc::new(VariantCodec::new(codec, inject.clone(), project.clone()))
        })
    }
}

impl<T: Native> Coder<T> {
    /// The built-in codec for a leaf type.
    pub fn native() -> Coder<T> {
        Coder::Beam(T::native_codec())
    }
}

impl<T: 'static> Coder<Option<T>> {
    pub fn optional(inner: Coder<T>) -> Coder<Option<T>> {
        Coder::transform(inner, |codec: CodecRef<T>| -> CodecRef<Option<T>> {
            Arc::new(OptionCodec::new(codec))
        })
    }
}

impl<T: 'static> Coder<Vec<T>> {
    pub fn seq(element: Coder<T>) -> Coder<Vec<T>> {
        Coder::transform(element, |codec: CodecRef<T>| -> CodecRef<Vec<T>> {
            Arc::new(SeqCodec::new(codec))
        })
    }
}

impl<K: 'static, V: 'static> Coder<(K, V)> {
    pub fn kv(key: Coder<K>, value: Coder<V>) -> Coder<(K, V)> {
        Coder::KV(Arc::new(KvCoder { key, value }))
    }
}
