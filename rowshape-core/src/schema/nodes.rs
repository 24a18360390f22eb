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

use crate::error::Error;
use crate::resolver::MaterializeContext;
use crate::row::{FieldType, Value};
use crate::schema::{DecodeFn, EncodeFn, Schema, SchemaField, SchemaMaterializer, SchemaNode};

type GetterFn<T, F> = Arc<dyn Fn(&T) -> &F + Send + Sync>;
type ToListFn<C, U> = Arc<dyn Fn(&C) -> Vec<&U> + Send + Sync>;
type FromListFn<U, C> = Arc<dyn Fn(Vec<U>) -> C + Send + Sync>;

pub(super) struct TypedSchemaField<T, F> {
    name: String,
    schema: Schema<F>,
    getter: GetterFn<T, F>,
}

impl<T, F> TypedSchemaField<T, F> {
    pub(super) fn new(name: String, schema: Schema<F>, getter: GetterFn<T, F>) -> Self {
        TypedSchemaField {
            name,
            schema,
            getter,
        }
    }
}

impl<T: 'static, F: 'static> SchemaField<T> for TypedSchemaField<T, F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_type(&self) -> Result<FieldType, Error> {
        SchemaMaterializer::field_type(&self.schema)
    }

    fn resolve(
        &self,
        ctx: &mut MaterializeContext<'_>,
    ) -> Result<Arc<dyn SchemaField<T>>, Error> {
        Ok(Arc::new(TypedSchemaField {
            name: self.name.clone(),
            schema: SchemaMaterializer::resolve(ctx, &self.schema)?,
            getter: self.getter.clone(),
        }))
    }

    fn encoder(&self, field_type: &FieldType) -> Result<EncodeFn<T>, Error> {
        let encode = SchemaMaterializer::build_encode(&self.schema, field_type)?;
        let getter = self.getter.clone();
        Ok(Arc::new(move |record: &T| encode(getter(record))))
    }

    fn decoder(&self) -> Result<DecodeFn<Box<dyn Any>>, Error> {
        let decode = SchemaMaterializer::build_decode(&self.schema)?;
        Ok(Arc::new(move |value: Value| {
            let field: Box<dyn Any> = Box::new(decode(value)?);
            Ok(field)
        }))
    }
}

/// `None` is a null row value; `Some` is the inner encoding.
///
/// Nesting collapses: `Some(None)` of an `Option<Option<U>>` encodes as null
/// and decodes as `None`.
pub(super) struct OptionalSchema<U> {
    inner: Schema<U>,
}

impl<U> OptionalSchema<U> {
    pub(super) fn new(inner: Schema<U>) -> Self {
        OptionalSchema { inner }
    }
}

impl<U: 'static> SchemaNode<Option<U>> for OptionalSchema<U> {
    fn field_type(&self) -> Result<FieldType, Error> {
        Ok(SchemaMaterializer::field_type(&self.inner)?.with_nullable(true))
    }

    fn resolve(
        &self,
        ctx: &mut MaterializeContext<'_>,
    ) -> Result<Arc<dyn SchemaNode<Option<U>>>, Error> {
        Ok(Arc::new(OptionalSchema {
            inner: SchemaMaterializer::resolve(ctx, &self.inner)?,
        }))
    }

    fn encoder(&self, field_type: &FieldType) -> Result<EncodeFn<Option<U>>, Error> {
        let encode = SchemaMaterializer::build_encode(&self.inner, field_type)?;
        Ok(Arc::new(move |value: &Option<U>| match value {
            Some(inner) => encode(inner),
            None => Ok(Value::Null),
        }))
    }

    fn decoder(&self) -> Result<DecodeFn<Option<U>>, Error> {
        let decode = SchemaMaterializer::build_decode(&self.inner)?;
        Ok(Arc::new(move |value: Value| {
            if value.is_null() {
                return Ok(None);
            }
            decode(value).map(Some)
        }))
    }
}

pub(super) struct ArrSchema<C, U> {
    inner: Schema<U>,
    to_list: ToListFn<C, U>,
    from_list: FromListFn<U, C>,
}

impl<C, U> ArrSchema<C, U> {
    pub(super) fn new(inner: Schema<U>, to_list: ToListFn<C, U>, from_list: FromListFn<U, C>) -> Self {
        ArrSchema {
            inner,
            to_list,
            from_list,
        }
    }
}

impl<C: 'static, U: 'static> SchemaNode<C> for ArrSchema<C, U> {
    fn field_type(&self) -> Result<FieldType, Error> {
        Ok(FieldType::array(SchemaMaterializer::field_type(&self.inner)?))
    }

    fn resolve(&self, ctx: &mut MaterializeContext<'_>) -> Result<Arc<dyn SchemaNode<C>>, Error> {
        Ok(Arc::new(ArrSchema {
            inner: SchemaMaterializer::resolve(ctx, &self.inner)?,
            to_list: self.to_list.clone(),
            from_list: self.from_list.clone(),
        }))
    }

    fn encoder(&self, field_type: &FieldType) -> Result<EncodeFn<C>, Error> {
        let encode = SchemaMaterializer::build_encode(&self.inner, field_type.element_type()?)?;
        let to_list = self.to_list.clone();
        Ok(Arc::new(move |container: &C| {
            let elements = to_list(container)
                .into_iter()
                .map(|element| encode(element))
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(Value::Array(elements))
        }))
    }

    fn decoder(&self) -> Result<DecodeFn<C>, Error> {
        let decode = SchemaMaterializer::build_decode(&self.inner)?;
        let from_list = self.from_list.clone();
        Ok(Arc::new(move |value: Value| match value {
            Value::Array(elements) => {
                let items = elements
                    .into_iter()
                    .map(|element| decode(element))
                    .collect::<Result<Vec<U>, Error>>()?;
                Ok(from_list(items))
            }
            other => Err(Error::type_mismatch("ARRAY", other.label())),
        }))
    }
}
