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

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::Error;
use crate::row::schema::{FieldKind, FieldType, RowSchema};

/// Fixed-point decimal: `unscaled * 10^-scale`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub unscaled: i128,
    pub scale: u32,
}

impl Decimal {
    pub fn new(unscaled: i128, scale: u32) -> Decimal {
        Decimal { unscaled, scale }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.unscaled);
        }
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int, frac)
        } else {
            write!(f, "{}0.{:0>scale$}", sign, digits, scale = scale)
        }
    }
}

/// A single row value. One case per [`FieldKind`], plus `Null`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Byte(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Boolean(bool),
    String(String),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Row(Row),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Byte(_) => "BYTE",
            Value::Int16(_) => "INT16",
            Value::Int32(_) => "INT32",
            Value::Int64(_) => "INT64",
            Value::Float(_) => "FLOAT",
            Value::Double(_) => "DOUBLE",
            Value::Decimal(_) => "DECIMAL",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::DateTime(_) => "DATETIME",
            Value::Bytes(_) => "BYTES",
            Value::Array(_) => "ARRAY",
            Value::Map(_) => "MAP",
            Value::Row(_) => "ROW",
        }
    }

    /// Checks that the value is legal for `field_type`, nullability included.
    ///
    /// Nested rows are only compared by schema: a [`Row`] is validated when it
    /// is built.
    pub fn conforms_to(&self, field_type: &FieldType) -> Result<(), Error> {
        let ok = match (self, field_type.kind()) {
            (Value::Null, _) => {
                if field_type.is_nullable() {
                    return Ok(());
                }
                return Err(Error::invalid_data(format!(
                    "null value for non-nullable field of type {}",
                    field_type
                )));
            }
            (Value::Byte(_), FieldKind::Byte)
            | (Value::Int16(_), FieldKind::Int16)
            | (Value::Int32(_), FieldKind::Int32)
            | (Value::Int64(_), FieldKind::Int64)
            | (Value::Float(_), FieldKind::Float)
            | (Value::Double(_), FieldKind::Double)
            | (Value::Decimal(_), FieldKind::Decimal)
            | (Value::Boolean(_), FieldKind::Boolean)
            | (Value::String(_), FieldKind::String)
            | (Value::DateTime(_), FieldKind::DateTime)
            | (Value::Bytes(_), FieldKind::Bytes) => true,
            (Value::Array(elements), FieldKind::Array(element_type)) => {
                for element in elements {
                    element.conforms_to(element_type)?;
                }
                true
            }
            (Value::Map(entries), FieldKind::Map(key_type, value_type)) => {
                for (k, v) in entries {
                    k.conforms_to(key_type)?;
                    v.conforms_to(value_type)?;
                }
                true
            }
            (Value::Row(row), FieldKind::Row(schema)) => {
                Arc::ptr_eq(&row.schema, schema) || row.schema.as_ref() == schema.as_ref()
            }
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::type_mismatch(
                field_type.to_string(),
                self.label(),
            ))
        }
    }
}

/// Structural value: one [`Value`] per field of its [`RowSchema`], in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    schema: Arc<RowSchema>,
    values: Vec<Value>,
}

impl Row {
    /// Builds a row from a schema plus ordered values, validating arity,
    /// types and nullability.
    pub fn with_values(schema: Arc<RowSchema>, values: Vec<Value>) -> Result<Row, Error> {
        if values.len() != schema.len() {
            return Err(Error::invalid_data(format!(
                "row has {} values, schema has {} fields",
                values.len(),
                schema.len()
            )));
        }
        for (field, value) in schema.fields().iter().zip(&values) {
            value
                .conforms_to(field.field_type())
                .map_err(|e| Error::invalid_data(format!("field `{}`: {}", field.name(), e)))?;
        }
        Ok(Row { schema, values })
    }

    /// For values already known to conform, e.g. fresh from [`crate::row::RowCodec`].
    pub(crate) fn new_unchecked(schema: Arc<RowSchema>, values: Vec<Value>) -> Row {
        Row { schema, values }
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.schema.index_of(name).and_then(|idx| self.values.get(idx))
    }

    pub fn set(&mut self, idx: usize, value: Value) -> Result<(), Error> {
        let field = self.schema.field(idx).ok_or_else(|| {
            Error::invalid_data(format!(
                "field index {} out of range for a row of {} fields",
                idx,
                self.schema.len()
            ))
        })?;
        value.conforms_to(field.field_type())?;
        self.values[idx] = value;
        Ok(())
    }

    pub fn is_nullable(&self, idx: usize) -> Option<bool> {
        self.schema
            .field(idx)
            .map(|field| field.field_type().is_nullable())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
