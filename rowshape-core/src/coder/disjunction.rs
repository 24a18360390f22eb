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

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::buffer::{Reader, Writer};
use crate::codec::wrapper::short_type_name;
use crate::codec::{Codec, CodecRef};
use crate::coder::{Coder, CoderMaterializer};
use crate::error::Error;
use crate::resolver::MaterializeContext;

type IdOfFn<T, I> = Arc<dyn Fn(&T) -> I + Send + Sync>;
type InjectFn<P, T> = Arc<dyn Fn(P) -> T + Send + Sync>;
type ProjectFn<T, P> = Arc<dyn Fn(&T) -> Option<&P> + Send + Sync>;

/// Hides the discriminator type of a sum coder.
pub trait DisjunctionNode<T>: Send + Sync {
    fn name(&self) -> &str;

    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<CodecRef<T>, Error>;
}

struct DisjunctionCoder<I, T> {
    name: String,
    id_coder: Coder<I>,
    id_of: IdOfFn<T, I>,
    variants: Vec<(I, Coder<T>)>,
}

impl<I, T> DisjunctionNode<T> for DisjunctionCoder<I, T>
where
    I: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    T: 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<CodecRef<T>, Error> {
        let id_codec = CoderMaterializer::materialize(ctx, &self.id_coder)?;
        let mut variants = HashMap::with_capacity(self.variants.len());
        let mut described = Vec::with_capacity(self.variants.len());
        for (id, coder) in &self.variants {
            if variants.contains_key(id) {
                return Err(Error::duplicate(format!(
                    "discriminator {:?} is declared twice in `{}`",
                    id, self.name
                )));
            }
            let codec = CoderMaterializer::materialize(ctx, coder)?;
            described.push(format!("{:?} => {}", id, codec.describe()));
            variants.insert(id.clone(), codec);
        }
        tracing::debug!(
            disjunction = %self.name,
            variants = variants.len(),
            "materialized disjunction coder"
        );
        let description = format!(
            "Disjunction[{}]({}; {})",
            self.name,
            id_codec.describe(),
            described.join(", ")
        );
        Ok(Arc::new(DisjunctionCodec {
            name: self.name.clone(),
            id_codec,
            id_of: self.id_of.clone(),
            variants,
            description,
        }))
    }
}

pub struct DisjunctionBuilder<I, T> {
    name: String,
    id_coder: Coder<I>,
    id_of: IdOfFn<T, I>,
    variants: Vec<(I, Coder<T>)>,
}

impl<I, T> DisjunctionBuilder<I, T>
where
    I: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    T: 'static,
{
    pub(crate) fn new(name: String, id_coder: Coder<I>, id_of: IdOfFn<T, I>) -> Self {
        DisjunctionBuilder {
            name,
            id_coder,
            id_of,
            variants: Vec::new(),
        }
    }

    /// Adds the payload coder used for values whose discriminator is `id`.
    pub fn variant(mut self, id: I, coder: Coder<T>) -> Self {
        self.variants.push((id, coder));
        self
    }

    /// Discriminator uniqueness is checked when the coder is materialized.
    pub fn build(self) -> Coder<T> {
        Coder::Disjunction(Arc::new(DisjunctionCoder {
            name: self.name,
            id_coder: self.id_coder,
            id_of: self.id_of,
            variants: self.variants,
        }))
    }
}

struct DisjunctionCodec<I, T> {
    name: String,
    id_codec: CodecRef<I>,
    id_of: IdOfFn<T, I>,
    variants: HashMap<I, CodecRef<T>>,
    description: String,
}

impl<I, T> Codec<T> for DisjunctionCodec<I, T>
where
    I: Hash + Eq + Debug + Send + Sync + 'static,
    T: 'static,
{
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        let id = (self.id_of)(value);
        let codec = self.variants.get(&id).ok_or_else(|| {
            Error::unknown_variant(format!(
                "no variant of `{}` for discriminator {:?}",
                self.name, id
            ))
        })?;
        self.id_codec.encode(&id, writer)?;
        codec.encode(value, writer)
    }

    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        let id = self.id_codec.decode(reader)?;
        match self.variants.get(&id) {
            Some(codec) => codec.decode(reader),
            None => Err(Error::unknown_variant(format!(
                "unknown discriminator {:?} while decoding `{}`",
                id, self.name
            ))),
        }
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

/// Encodes the payload of one case of a sum type.
pub struct VariantCodec<P, T> {
    payload: CodecRef<P>,
    inject: InjectFn<P, T>,
    project: ProjectFn<T, P>,
}

impl<P, T> VariantCodec<P, T> {
    pub fn new(payload: CodecRef<P>, inject: InjectFn<P, T>, project: ProjectFn<T, P>) -> Self {
        VariantCodec {
            payload,
            inject,
            project,
        }
    }
}

impl<P: 'static, T: 'static> Codec<T> for VariantCodec<P, T> {
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        match (self.project)(value) {
            Some(payload) => self.payload.encode(payload, writer),
            None => Err(Error::type_mismatch(
                short_type_name::<P>(),
                "another variant",
            )),
        }
    }

    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        let payload = self.payload.decode(reader)?;
        Ok((self.inject)(payload))
    }

    fn describe(&self) -> String {
        format!("Variant[{}]({})", short_type_name::<P>(), self.payload.describe())
    }
}
