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

use std::collections::HashSet;
use std::sync::Arc;

use crate::codec::{CanonicalCodec, CodecRef, NullableCodec};
use crate::coder::record::RecordCodec;
use crate::coder::{Coder, RecordCoder};
use crate::config::Config;
use crate::error::Error;
use crate::resolver::{MaterializeContext, Registry};

/// Lowers a [`Coder`] to a concrete codec for the given registry and config.
pub fn materialize<T: 'static>(
    registry: &Registry,
    config: &Config,
    coder: &Coder<T>,
) -> Result<CodecRef<T>, Error> {
    let mut ctx = MaterializeContext::new(registry, config);
    CoderMaterializer::materialize(&mut ctx, coder)
}

pub struct CoderMaterializer;

impl CoderMaterializer {
    /// Depth-first lowering. Every node comes out wrapped in a
    /// [`CanonicalCodec`].
    pub fn materialize<T: 'static>(
        ctx: &mut MaterializeContext<'_>,
        coder: &Coder<T>,
    ) -> Result<CodecRef<T>, Error> {
        ctx.inc_depth()?;
        let codec = Self::lower(ctx, coder);
        ctx.dec_depth();
        Ok(CanonicalCodec::wrap(codec?))
    }

    fn lower<T: 'static>(
        ctx: &mut MaterializeContext<'_>,
        coder: &Coder<T>,
    ) -> Result<CodecRef<T>, Error> {
        match coder {
            Coder::Beam(codec) => {
                if ctx.config().is_nullable_coders() {
                    Ok(Arc::new(NullableCodec::new(codec.clone())))
                } else {
                    Ok(codec.clone())
                }
            }
            Coder::Fallback(fallback) => {
                // the generic codec wins even when the registry knows the type
                if ctx.registry().has_coder::<T>() {
                    tracing::debug!(
                        ty = fallback.tag().name(),
                        "fallback requested for a type with a registered coder"
                    );
                } else {
                    tracing::trace!(ty = fallback.tag().name(), "generic fallback codec");
                }
                Ok(fallback.make(ctx.config().get_fallback()))
            }
            Coder::Transform(node) => node.materialize(ctx),
            Coder::Record(record) => Self::record(ctx, record),
            Coder::Disjunction(node) => node.materialize(ctx),
            Coder::KV(node) => node.materialize(ctx),
        }
    }

    fn record<T: 'static>(
        ctx: &mut MaterializeContext<'_>,
        record: &RecordCoder<T>,
    ) -> Result<CodecRef<T>, Error> {
        let mut seen = HashSet::with_capacity(record.fields().len());
        let mut fields = Vec::with_capacity(record.fields().len());
        for field in record.fields() {
            if !seen.insert(field.name()) {
                return Err(Error::duplicate(format!(
                    "field `{}` is declared twice in record `{}`",
                    field.name(),
                    record.name()
                )));
            }
            fields.push((field.name().to_string(), field.materialize(ctx)?));
        }
        tracing::debug!(
            record = record.name(),
            fields = fields.len(),
            "materialized record coder"
        );
        Ok(Arc::new(RecordCodec::new(
            record.name().into(),
            fields,
            record.construct().clone(),
        )))
    }
}
