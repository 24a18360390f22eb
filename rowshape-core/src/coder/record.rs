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

use crate::buffer::{Reader, Writer};
use crate::codec::{Codec, CodecRef};
use crate::coder::{Coder, CoderMaterializer};
use crate::error::Error;
use crate::fields::Fields;
use crate::resolver::MaterializeContext;

pub(crate) type ConstructFn<T> = Arc<dyn Fn(&mut Fields<'_>) -> Result<T, Error> + Send + Sync>;
type GetterFn<T, F> = Arc<dyn Fn(&T) -> &F + Send + Sync>;

/// One named field of a record coder, with its value type hidden.
pub trait CoderField<T>: Send + Sync {
    fn name(&self) -> &str;

    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<Box<dyn FieldCodec<T>>, Error>;
}

/// Encodes one field of `T` and decodes it back as an erased value.
pub trait FieldCodec<T>: Send + Sync {
    fn encode(&self, record: &T, writer: &mut Writer) -> Result<(), Error>;

    fn decode(&self, reader: &mut Reader) -> Result<Box<dyn Any>, Error>;

    fn describe(&self) -> String;
}

struct TypedField<T, F> {
    name: String,
    coder: Coder<F>,
    getter: GetterFn<T, F>,
}

impl<T: 'static, F: 'static> CoderField<T> for TypedField<T, F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn materialize(&self, ctx: &mut MaterializeContext<'_>) -> Result<Box<dyn FieldCodec<T>>, Error> {
        let codec = CoderMaterializer::materialize(ctx, &self.coder)?;
        Ok(Box::new(TypedFieldCodec {
            codec,
            getter: self.getter.clone(),
        }))
    }
}

struct TypedFieldCodec<T, F> {
    codec: CodecRef<F>,
    getter: GetterFn<T, F>,
}

impl<T: 'static, F: 'static> FieldCodec<T> for TypedFieldCodec<T, F> {
    fn encode(&self, record: &T, writer: &mut Writer) -> Result<(), Error> {
        self.codec.encode((self.getter)(record), writer)
    }

    fn decode(&self, reader: &mut Reader) -> Result<Box<dyn Any>, Error> {
        Ok(Box::new(self.codec.decode(reader)?))
    }

    fn describe(&self) -> String {
        self.codec.describe()
    }
}

/// Product coder: fields in declaration order plus the constructor that
/// reassembles a `T` from their decoded values.
pub struct RecordCoder<T> {
    name: Arc<str>,
    fields: Vec<Arc<dyn CoderField<T>>>,
    construct: ConstructFn<T>,
}

impl<T> Clone for RecordCoder<T> {
    fn clone(&self) -> Self {
        RecordCoder {
            name: self.name.clone(),
            fields: self.fields.clone(),
            construct: self.construct.clone(),
        }
    }
}

impl<T> RecordCoder<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Arc<dyn CoderField<T>>] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name())
    }

    pub(crate) fn construct(&self) -> &ConstructFn<T> {
        &self.construct
    }
}

pub struct RecordBuilder<T> {
    name: String,
    fields: Vec<Arc<dyn CoderField<T>>>,
}

impl<T: 'static> RecordBuilder<T> {
    pub(crate) fn new(name: String) -> RecordBuilder<T> {
        RecordBuilder {
            name,
            fields: Vec::new(),
        }
    }

    /// Appends a field; `getter` borrows the field out of a `T`.
    pub fn field<F, G>(mut self, name: impl Into<String>, coder: Coder<F>, getter: G) -> Self
    where
        F: 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
    {
        self.fields.push(Arc::new(TypedField {
            name: name.into(),
            coder,
            getter: Arc::new(getter),
        }));
        self
    }

    /// `construct` must take the fields with [`Fields::next`] in the order
    /// they were declared.
    pub fn build<C>(self, construct: C) -> Coder<T>
    where
        C: Fn(&mut Fields<'_>) -> Result<T, Error> + Send + Sync + 'static,
    {
        Coder::Record(RecordCoder {
            name: self.name.into(),
            fields: self.fields,
            construct: Arc::new(construct),
        })
    }
}

/// Writes every field in declaration order; reads them back the same way and
/// hands them to the record's constructor.
pub(crate) struct RecordCodec<T> {
    name: Arc<str>,
    fields: Vec<(String, Box<dyn FieldCodec<T>>)>,
    construct: ConstructFn<T>,
}

impl<T> RecordCodec<T> {
    pub(crate) fn new(
        name: Arc<str>,
        fields: Vec<(String, Box<dyn FieldCodec<T>>)>,
        construct: ConstructFn<T>,
    ) -> RecordCodec<T> {
        RecordCodec {
            name,
            fields,
            construct,
        }
    }
}

impl<T: 'static> Codec<T> for RecordCodec<T> {
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        for (_, field) in &self.fields {
            field.encode(value, writer)?;
        }
        Ok(())
    }

    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        let mut values = Vec::with_capacity(self.fields.len());
        for (_, field) in &self.fields {
            values.push(field.decode(reader)?);
        }
        let mut fields = Fields::new(&self.name, values);
        let value = (self.construct)(&mut fields)?;
        fields.finish()?;
        Ok(value)
    }

    fn describe(&self) -> String {
        let fields = self
            .fields
            .iter()
            .map(|(name, field)| format!("{}: {}", name, field.describe()))
            .collect::<Vec<_>>();
        format!("Record[{}]({})", self.name, fields.join(", "))
    }
}
