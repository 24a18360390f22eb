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

use std::any::Any;
use std::sync::Arc;

use crate::codec::wrapper::short_type_name;
use crate::codec::{decode_from_slice, encode_to_vec};
use crate::coder::{Coder, CoderMaterializer};
use crate::config::Config;
use crate::error::Error;
use crate::fields::Fields;
use crate::resolver::{MaterializeContext, Registry};
use crate::row::{Field, FieldType, Row, RowSchema, Value};
use crate::schema::{DecodeFn, EncodeFn, FromRowFn, RecordSchema, Schema, ToRowFn};

/// Name of the single field a non-record root is wrapped in.
pub const WRAPPED_FIELD_NAME: &str = "value";

/// A row descriptor plus the conversions between `T` and rows of it.
pub struct Materialized<T> {
    schema: Arc<RowSchema>,
    to_row: ToRowFn<T>,
    from_row: FromRowFn<T>,
}

impl<T> Clone for Materialized<T> {
    fn clone(&self) -> Self {
        Materialized {
            schema: self.schema.clone(),
            to_row: self.to_row.clone(),
            from_row: self.from_row.clone(),
        }
    }
}

impl<T> Materialized<T> {
    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    pub fn to_row(&self, value: &T) -> Result<Row, Error> {
        (self.to_row)(value)
    }

    pub fn from_row(&self, row: Row) -> Result<T, Error> {
        (self.from_row)(row)
    }
}

impl<T> std::fmt::Debug for Materialized<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materialized")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Materializes `schema` into a row descriptor and its conversions.
pub fn materialize<T: 'static>(
    registry: &Registry,
    config: &Config,
    schema: &Schema<T>,
) -> Result<Materialized<T>, Error> {
    let mut ctx = MaterializeContext::new(registry, config);
    SchemaMaterializer::materialize(&mut ctx, schema)
}

pub struct SchemaMaterializer;

impl SchemaMaterializer {
    /// Top-level driver.
    ///
    /// A `RawRecord` is returned as supplied and a `Record` is materialized
    /// directly. Any other root is wrapped in a one-field record named
    /// [`WRAPPED_FIELD_NAME`]; the wrapper is added and removed inside the
    /// returned conversions.
    pub fn materialize<T: 'static>(
        ctx: &mut MaterializeContext<'_>,
        schema: &Schema<T>,
    ) -> Result<Materialized<T>, Error> {
        match schema {
            Schema::RawRecord(raw) => Ok(Materialized {
                schema: raw.schema().clone(),
                to_row: raw.to_row_fn().clone(),
                from_row: raw.from_row_fn().clone(),
            }),
            Schema::Record(_) => Self::materialize_record(ctx, schema),
            _ => {
                tracing::debug!(
                    ty = std::any::type_name::<T>(),
                    "wrapping non-record root in a single-field record"
                );
                let wrapped = Schema::<T>::record()
                    .field(WRAPPED_FIELD_NAME, schema.clone(), |value: &T| value)
                    .build(|fields| fields.next::<T>());
                Self::materialize_record(ctx, &wrapped)
            }
        }
    }

    fn materialize_record<T: 'static>(
        ctx: &mut MaterializeContext<'_>,
        schema: &Schema<T>,
    ) -> Result<Materialized<T>, Error> {
        let field_type = Self::field_type(schema)?;
        let row_schema = field_type.row_schema()?.clone();
        let resolved = Self::resolve(ctx, schema)?;
        let encode = Self::build_encode(&resolved, &field_type)?;
        let decode = Self::build_decode(&resolved)?;
        tracing::debug!(
            ty = std::any::type_name::<T>(),
            fields = row_schema.len(),
            fingerprint = row_schema.fingerprint(),
            "materialized record schema"
        );
        Ok(Materialized {
            schema: row_schema,
            to_row: Arc::new(move |value: &T| match encode(value)? {
                Value::Row(row) => Ok(row),
                other => crate::not_allowed!(
                    "record encoder produced {} instead of a row",
                    other.label()
                ),
            }),
            from_row: Arc::new(move |row: Row| decode(Value::Row(row))),
        })
    }

    /// Structural field type; needs no registry or config.
    pub fn field_type<T>(schema: &Schema<T>) -> Result<FieldType, Error> {
        match schema {
            Schema::Record(record) => {
                let fields = record
                    .fields()
                    .iter()
                    .map(|field| Ok(Field::new(field.name(), field.field_type()?)))
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(FieldType::row(RowSchema::new(fields)?))
            }
            Schema::RawRecord(raw) => Ok(FieldType::row(raw.schema().clone())),
            Schema::Type(leaf) => Ok(leaf.field_type().clone()),
            Schema::Fallback(_) => Ok(FieldType::bytes()),
            Schema::Optional(node) | Schema::Arr(node) => node.field_type(),
        }
    }

    /// Replaces every `Fallback` leaf's coder with the codec it materializes
    /// to; the rest of the tree is rebuilt unchanged.
    pub fn resolve<T: 'static>(
        ctx: &mut MaterializeContext<'_>,
        schema: &Schema<T>,
    ) -> Result<Schema<T>, Error> {
        ctx.inc_depth()?;
        let resolved = Self::resolve_node(ctx, schema);
        ctx.dec_depth();
        resolved
    }

    fn resolve_node<T: 'static>(
        ctx: &mut MaterializeContext<'_>,
        schema: &Schema<T>,
    ) -> Result<Schema<T>, Error> {
        match schema {
            Schema::Record(record) => Ok(Schema::Record(record.resolve(ctx)?)),
            Schema::RawRecord(_) | Schema::Type(_) => Ok(schema.clone()),
            Schema::Optional(node) => Ok(Schema::Optional(node.resolve(ctx)?)),
            Schema::Arr(node) => Ok(Schema::Arr(node.resolve(ctx)?)),
            Schema::Fallback(coder) => {
                let codec = CoderMaterializer::materialize(ctx, coder)?;
                tracing::trace!(codec = %codec.describe(), "resolved fallback leaf");
                Ok(Schema::Fallback(Coder::Beam(codec)))
            }
        }
    }

    /// Encoder for a resolved schema whose field type is `field_type`.
    pub fn build_encode<T: 'static>(
        schema: &Schema<T>,
        field_type: &FieldType,
    ) -> Result<EncodeFn<T>, Error> {
        match schema {
            Schema::Record(record) => Self::record_encoder(record, field_type),
            Schema::RawRecord(raw) => {
                let to_row = raw.to_row_fn().clone();
                Ok(Arc::new(move |value: &T| Ok(Value::Row(to_row(value)?))))
            }
            Schema::Type(leaf) => {
                let to_value = leaf.to_value();
                Ok(Arc::new(move |value: &T| Ok(to_value(value))))
            }
            Schema::Optional(node) | Schema::Arr(node) => node.encoder(field_type),
            Schema::Fallback(Coder::Beam(codec)) => {
                let codec = codec.clone();
                Ok(Arc::new(move |value: &T| {
                    Ok(Value::Bytes(encode_to_vec(&*codec, value)?))
                }))
            }
            Schema::Fallback(_) => Err(Self::unresolved::<T>()),
        }
    }

    /// Decoder for a resolved schema.
    pub fn build_decode<T: 'static>(schema: &Schema<T>) -> Result<DecodeFn<T>, Error> {
        match schema {
            Schema::Record(record) => Self::record_decoder(record),
            Schema::RawRecord(raw) => {
                let from_row = raw.from_row_fn().clone();
                Ok(Arc::new(move |value: Value| match value {
                    Value::Row(row) => from_row(row),
                    other => Err(Error::type_mismatch("ROW", other.label())),
                }))
            }
            Schema::Type(leaf) => {
                let from_value = leaf.from_value();
                Ok(Arc::new(from_value))
            }
            Schema::Optional(node) | Schema::Arr(node) => node.decoder(),
            Schema::Fallback(Coder::Beam(codec)) => {
                let codec = codec.clone();
                Ok(Arc::new(move |value: Value| match value {
                    Value::Bytes(bytes) => decode_from_slice(&*codec, &bytes),
                    other => Err(Error::type_mismatch("BYTES", other.label())),
                }))
            }
            Schema::Fallback(_) => Err(Self::unresolved::<T>()),
        }
    }

    fn record_encoder<T: 'static>(
        record: &RecordSchema<T>,
        field_type: &FieldType,
    ) -> Result<EncodeFn<T>, Error> {
        let row_schema = field_type.row_schema()?.clone();
        if row_schema.len() != record.fields().len() {
            return Err(Error::invalid_data(format!(
                "record `{}` has {} fields, its row type has {}",
                record.name(),
                record.fields().len(),
                row_schema.len()
            )));
        }
        let encoders = record
            .fields()
            .iter()
            .zip(row_schema.fields())
            .map(|(field, row_field)| field.encoder(row_field.field_type()))
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Arc::new(move |value: &T| {
            let values = encoders
                .iter()
                .map(|encode| encode(value))
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(Value::Row(Row::with_values(row_schema.clone(), values)?))
        }))
    }

    fn record_decoder<T: 'static>(record: &RecordSchema<T>) -> Result<DecodeFn<T>, Error> {
        let decoders = record
            .fields()
            .iter()
            .map(|field| field.decoder())
            .collect::<Result<Vec<_>, Error>>()?;
        let name = record.name().to_string();
        let construct = record.construct().clone();
        Ok(Arc::new(move |value: Value| {
            let row = match value {
                Value::Row(row) => row,
                other => return Err(Error::type_mismatch("ROW", other.label())),
            };
            if row.len() != decoders.len() {
                return Err(Error::invalid_data(format!(
                    "row has {} values, record `{}` has {} fields",
                    row.len(),
                    name,
                    decoders.len()
                )));
            }
            let values = row
                .into_values()
                .into_iter()
                .zip(&decoders)
                .map(|(value, decode)| decode(value))
                .collect::<Result<Vec<Box<dyn Any>>, Error>>()?;
            let mut fields = Fields::new(&name, values);
            let decoded = construct(&mut fields)?;
            fields.finish()?;
            Ok(decoded)
        }))
    }

    #[cold]
    fn unresolved<T>() -> Error {
        Error::not_allowed(format!(
            "fallback leaf of `{}` must be resolved before building conversions",
            short_type_name::<T>()
        ))
    }
}
