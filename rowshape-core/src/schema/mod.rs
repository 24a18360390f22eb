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

//! The schema algebra: how a value type maps onto a row.
//!
//! A [`Schema`] describes the structural shape of a type. [`materialize`]
//! turns it into a [`RowSchema`] plus a total pair of functions between
//! the typed value and a [`Row`]. Leaves that have no structural form are
//! stored as opaque bytes produced by an embedded [`Coder`].

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::codec::wrapper::short_type_name;
use crate::coder::record::ConstructFn;
use crate::coder::Coder;
use crate::error::Error;
use crate::fields::Fields;
use crate::resolver::MaterializeContext;
use crate::row::{Decimal, FieldType, Row, RowSchema, Value};

mod codec;
mod materializer;
mod nodes;

pub use codec::SchemaCodec;
pub use materializer::{materialize, Materialized, SchemaMaterializer, WRAPPED_FIELD_NAME};
use nodes::{ArrSchema, OptionalSchema, TypedSchemaField};

/// Converts a `T` into the value of a row field.
pub type EncodeFn<T> = Arc<dyn Fn(&T) -> Result<Value, Error> + Send + Sync>;
/// Converts the value of a row field back into a `T`.
pub type DecodeFn<T> = Arc<dyn Fn(Value) -> Result<T, Error> + Send + Sync>;

pub type ToRowFn<T> = Arc<dyn Fn(&T) -> Result<Row, Error> + Send + Sync>;
pub type FromRowFn<T> = Arc<dyn Fn(Row) -> Result<T, Error> + Send + Sync>;

/// One case per structural shape.
pub enum Schema<T> {
    /// A row with named sub-schemas.
    Record(RecordSchema<T>),
    /// A row shape supplied from outside, with ready-made conversions.
    RawRecord(RawRecord<T>),
    /// A scalar that is a row field type of its own.
    Type(TypeSchema<T>),
    /// Nullable wrapper around exactly one inner schema.
    Optional(Arc<dyn SchemaNode<T>>),
    /// Stored as an opaque byte field, encoded by the embedded coder.
    Fallback(Coder<T>),
    /// Homogeneous ordered collection.
    Arr(Arc<dyn SchemaNode<T>>),
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        match self {
            Schema::Record(record) => Schema::Record(record.clone()),
            Schema::RawRecord(raw) => Schema::RawRecord(raw.clone()),
            Schema::Type(leaf) => Schema::Type(leaf.clone()),
            Schema::Optional(node) => Schema::Optional(node.clone()),
            Schema::Fallback(coder) => Schema::Fallback(coder.clone()),
            Schema::Arr(node) => Schema::Arr(node.clone()),
        }
    }
}

impl<T> std::fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Schema::Record(record) => write!(f, "Record({})", record.name()),
            Schema::RawRecord(raw) => write!(f, "RawRecord({:016x})", raw.schema.fingerprint()),
            Schema::Type(leaf) => write!(f, "Type({})", leaf.field_type),
            Schema::Optional(_) => f.write_str("Optional"),
            Schema::Fallback(coder) => write!(f, "Fallback({:?})", coder),
            Schema::Arr(_) => f.write_str("Arr"),
        }
    }
}

/// Hides the inner types of `Optional` and `Arr`.
pub trait SchemaNode<T>: Send + Sync {
    fn field_type(&self) -> Result<FieldType, Error>;

    fn resolve(&self, ctx: &mut MaterializeContext<'_>) -> Result<Arc<dyn SchemaNode<T>>, Error>;

    fn encoder(&self, field_type: &FieldType) -> Result<EncodeFn<T>, Error>;

    fn decoder(&self) -> Result<DecodeFn<T>, Error>;
}

/// One named field of a record schema, with its value type hidden.
pub trait SchemaField<T>: Send + Sync {
    fn name(&self) -> &str;

    fn field_type(&self) -> Result<FieldType, Error>;

    fn resolve(&self, ctx: &mut MaterializeContext<'_>)
        -> Result<Arc<dyn SchemaField<T>>, Error>;

    fn encoder(&self, field_type: &FieldType) -> Result<EncodeFn<T>, Error>;

    fn decoder(&self) -> Result<DecodeFn<Box<dyn std::any::Any>>, Error>;
}

pub struct RecordSchema<T> {
    name: Arc<str>,
    fields: Vec<Arc<dyn SchemaField<T>>>,
    construct: ConstructFn<T>,
}

impl<T> Clone for RecordSchema<T> {
    fn clone(&self) -> Self {
        RecordSchema {
            name: self.name.clone(),
            fields: self.fields.clone(),
            construct: self.construct.clone(),
        }
    }
}

impl<T> RecordSchema<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Arc<dyn SchemaField<T>>] {
        &self.fields
    }

    pub(crate) fn construct(&self) -> &ConstructFn<T> {
        &self.construct
    }

    pub(crate) fn resolve(&self, ctx: &mut MaterializeContext<'_>) -> Result<RecordSchema<T>, Error> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            fields.push(field.resolve(ctx)?);
        }
        Ok(RecordSchema {
            name: self.name.clone(),
            fields,
            construct: self.construct.clone(),
        })
    }
}

pub struct RecordSchemaBuilder<T> {
    name: Arc<str>,
    fields: Vec<Arc<dyn SchemaField<T>>>,
}

impl<T: 'static> RecordSchemaBuilder<T> {
    /// Name used in error messages and logs; defaults to the type name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into().into();
        self
    }

    pub fn field<F, G>(mut self, name: impl Into<String>, schema: Schema<F>, getter: G) -> Self
    where
        F: 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
    {
        self.fields.push(Arc::new(TypedSchemaField::new(
            name.into(),
            schema,
            Arc::new(getter),
        )));
        self
    }

    pub fn build<C>(self, construct: C) -> Schema<T>
    where
        C: Fn(&mut Fields<'_>) -> Result<T, Error> + Send + Sync + 'static,
    {
        Schema::Record(RecordSchema {
            name: self.name,
            fields: self.fields,
            construct: Arc::new(construct),
        })
    }
}

pub struct RawRecord<T> {
    schema: Arc<RowSchema>,
    to_row: ToRowFn<T>,
    from_row: FromRowFn<T>,
}

impl<T> Clone for RawRecord<T> {
    fn clone(&self) -> Self {
        RawRecord {
            schema: self.schema.clone(),
            to_row: self.to_row.clone(),
            from_row: self.from_row.clone(),
        }
    }
}

impl<T> RawRecord<T> {
    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    pub fn to_row_fn(&self) -> &ToRowFn<T> {
        &self.to_row
    }

    pub fn from_row_fn(&self) -> &FromRowFn<T> {
        &self.from_row
    }
}

/// A scalar leaf; its conversions are the identity up to the [`Value`] case.
pub struct TypeSchema<T> {
    field_type: FieldType,
    to_value: fn(&T) -> Value,
    from_value: fn(Value) -> Result<T, Error>,
}

impl<T> Clone for TypeSchema<T> {
    fn clone(&self) -> Self {
        TypeSchema {
            field_type: self.field_type.clone(),
            to_value: self.to_value,
            from_value: self.from_value,
        }
    }
}

impl<T> TypeSchema<T> {
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub(crate) fn to_value(&self) -> fn(&T) -> Value {
        self.to_value
    }

    pub(crate) fn from_value(&self) -> fn(Value) -> Result<T, Error> {
        self.from_value
    }
}

/// Types that are row field types of their own.
pub trait Primitive: Sized + Send + Sync + 'static {
    fn field_type() -> FieldType;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, Error>;
}

macro_rules! impl_primitive {
    ($ty:ty, $field_type:ident, $variant:ident) => {
        impl Primitive for $ty {
            #[inline(always)]
            fn field_type() -> FieldType {
                FieldType::$field_type()
            }

            #[inline(always)]
            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, Error> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(Error::type_mismatch(
                        FieldType::$field_type().to_string(),
                        other.label(),
                    )),
                }
            }
        }
    };
}

impl_primitive!(i8, byte, Byte);
impl_primitive!(i16, int16, Int16);
impl_primitive!(i32, int32, Int32);
impl_primitive!(i64, int64, Int64);
impl_primitive!(f32, float, Float);
impl_primitive!(f64, double, Double);
impl_primitive!(bool, boolean, Boolean);
impl_primitive!(String, string, String);
impl_primitive!(Vec<u8>, bytes, Bytes);
impl_primitive!(Decimal, decimal, Decimal);
impl_primitive!(NaiveDateTime, datetime, DateTime);

impl<T: Primitive> Schema<T> {
    pub fn of() -> Schema<T> {
        Schema::Type(TypeSchema {
            field_type: T::field_type(),
            to_value: T::to_value,
            from_value: T::from_value,
        })
    }
}

impl<T: 'static> Schema<T> {
    /// A scalar leaf for a type that is not [`Primitive`] itself, such as a
    /// newtype around one.
    pub fn leaf(
        field_type: FieldType,
        to_value: fn(&T) -> Value,
        from_value: fn(Value) -> Result<T, Error>,
    ) -> Schema<T> {
        Schema::Type(TypeSchema {
            field_type,
            to_value,
            from_value,
        })
    }

    pub fn record() -> RecordSchemaBuilder<T> {
        RecordSchemaBuilder {
            name: short_type_name::<T>().into(),
            fields: Vec::new(),
        }
    }

    pub fn raw<F, G>(schema: Arc<RowSchema>, to_row: F, from_row: G) -> Schema<T>
    where
        F: Fn(&T) -> Result<Row, Error> + Send + Sync + 'static,
        G: Fn(Row) -> Result<T, Error> + Send + Sync + 'static,
    {
        Schema::RawRecord(RawRecord {
            schema,
            to_row: Arc::new(to_row),
            from_row: Arc::new(from_row),
        })
    }

    /// Stores `T` as a byte field encoded by `coder`.
    pub fn fallback(coder: Coder<T>) -> Schema<T> {
        Schema::Fallback(coder)
    }

    /// Array over any container: `to_list` borrows the elements in order,
    /// `from_list` rebuilds the container.
    pub fn array_with<U, F, G>(inner: Schema<U>, to_list: F, from_list: G) -> Schema<T>
    where
        U: 'static,
        F: Fn(&T) -> Vec<&U> + Send + Sync + 'static,
        G: Fn(Vec<U>) -> T + Send + Sync + 'static,
    {
        Schema::Arr(Arc::new(ArrSchema::new(
            inner,
            Arc::new(to_list),
            Arc::new(from_list),
        )))
    }

    /// Array over a container that iterates by reference and collects back,
    /// such as `Vec`, `VecDeque` or `BTreeSet`.
    pub fn array<U>(inner: Schema<U>) -> Schema<T>
    where
        U: 'static,
        T: FromIterator<U>,
        for<'a> &'a T: IntoIterator<Item = &'a U>,
    {
        Self::array_with(inner, iter_to_list::<T, U>, |items: Vec<U>| {
            items.into_iter().collect::<T>()
        })
    }
}

impl<T: 'static> Schema<Option<T>> {
    pub fn optional(inner: Schema<T>) -> Schema<Option<T>> {
        Schema::Optional(Arc::new(OptionalSchema::new(inner)))
    }
}

fn iter_to_list<C, U>(container: &C) -> Vec<&U>
where
    for<'a> &'a C: IntoIterator<Item = &'a U>,
{
    container.into_iter().collect()
}
