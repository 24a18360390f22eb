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
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::types::TypeName;

/// Shape of a field, without its nullability.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Byte,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
    Decimal,
    Boolean,
    String,
    DateTime,
    Bytes,
    Array(Box<FieldType>),
    Map(Box<FieldType>, Box<FieldType>),
    Row(Arc<RowSchema>),
}

impl FieldKind {
    pub fn type_name(&self) -> TypeName {
        match self {
            FieldKind::Byte => TypeName::BYTE,
            FieldKind::Int16 => TypeName::INT16,
            FieldKind::Int32 => TypeName::INT32,
            FieldKind::Int64 => TypeName::INT64,
            FieldKind::Float => TypeName::FLOAT,
            FieldKind::Double => TypeName::DOUBLE,
            FieldKind::Decimal => TypeName::DECIMAL,
            FieldKind::Boolean => TypeName::BOOLEAN,
            FieldKind::String => TypeName::STRING,
            FieldKind::DateTime => TypeName::DATETIME,
            FieldKind::Bytes => TypeName::BYTES,
            FieldKind::Array(_) => TypeName::ARRAY,
            FieldKind::Map(_, _) => TypeName::MAP,
            FieldKind::Row(_) => TypeName::ROW,
        }
    }
}

/// A field kind plus its nullable bit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldType {
    kind: FieldKind,
    nullable: bool,
}

impl FieldType {
    pub fn new(kind: FieldKind) -> FieldType {
        FieldType {
            kind,
            nullable: false,
        }
    }

    pub fn byte() -> FieldType {
        FieldType::new(FieldKind::Byte)
    }

    pub fn int16() -> FieldType {
        FieldType::new(FieldKind::Int16)
    }

    pub fn int32() -> FieldType {
        FieldType::new(FieldKind::Int32)
    }

    pub fn int64() -> FieldType {
        FieldType::new(FieldKind::Int64)
    }

    pub fn float() -> FieldType {
        FieldType::new(FieldKind::Float)
    }

    pub fn double() -> FieldType {
        FieldType::new(FieldKind::Double)
    }

    pub fn decimal() -> FieldType {
        FieldType::new(FieldKind::Decimal)
    }

    pub fn boolean() -> FieldType {
        FieldType::new(FieldKind::Boolean)
    }

    pub fn string() -> FieldType {
        FieldType::new(FieldKind::String)
    }

    pub fn datetime() -> FieldType {
        FieldType::new(FieldKind::DateTime)
    }

    pub fn bytes() -> FieldType {
        FieldType::new(FieldKind::Bytes)
    }

    pub fn array(element: FieldType) -> FieldType {
        FieldType::new(FieldKind::Array(Box::new(element)))
    }

    pub fn map(key: FieldType, value: FieldType) -> FieldType {
        FieldType::new(FieldKind::Map(Box::new(key), Box::new(value)))
    }

    pub fn row(schema: impl Into<Arc<RowSchema>>) -> FieldType {
        FieldType::new(FieldKind::Row(schema.into()))
    }

    pub fn with_nullable(mut self, nullable: bool) -> FieldType {
        self.nullable = nullable;
        self
    }

    #[inline(always)]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[inline(always)]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline(always)]
    pub fn type_name(&self) -> TypeName {
        self.kind.type_name()
    }

    /// Element type of an `ARRAY` field.
    pub fn element_type(&self) -> Result<&FieldType, Error> {
        match &self.kind {
            FieldKind::Array(element) => Ok(element),
            _ => Err(Error::type_mismatch("ARRAY", self.to_string())),
        }
    }

    /// Row descriptor of a `ROW` field.
    pub fn row_schema(&self) -> Result<&Arc<RowSchema>, Error> {
        match &self.kind {
            FieldKind::Row(schema) => Ok(schema),
            _ => Err(Error::type_mismatch("ROW", self.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FieldKind::Array(element) => write!(f, "ARRAY<{}>", element)?,
            FieldKind::Map(key, value) => write!(f, "MAP<{}, {}>", key, value)?,
            other => f.write_str(other.type_name().as_str())?,
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Field {
        Field {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }
}

/// Row descriptor: an ordered list of uniquely named fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowSchema {
    fields: Vec<Field>,
}

impl RowSchema {
    pub fn new(fields: Vec<Field>) -> Result<RowSchema, Error> {
        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::duplicate(format!(
                    "Duplicate field name `{}` in row schema",
                    field.name
                )));
            }
        }
        Ok(RowSchema { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 64-bit FNV-1a hash of the field names, type tags and nullable bits.
    /// Stable across processes, unlike `std::hash`.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = Fnv::default();
        self.hash_into(&mut hash);
        hash.0
    }

    fn hash_into(&self, hash: &mut Fnv) {
        hash.write(&(self.fields.len() as u32).to_le_bytes());
        for field in &self.fields {
            hash.write(field.name.as_bytes());
            hash.write(&[0]);
            hash_field_type(&field.field_type, hash);
        }
    }
}

struct Fnv(u64);

impl Default for Fnv {
    fn default() -> Self {
        Fnv(0xcbf2_9ce4_8422_2325)
    }
}

impl Fnv {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 ^= *b as u64;
            self.0 = self.0.wrapping_mul(0x0100_0000_01b3);
        }
    }
}

fn hash_field_type(field_type: &FieldType, hash: &mut Fnv) {
    hash.write(&[u8::from(field_type.type_name()), field_type.nullable as u8]);
    match &field_type.kind {
        FieldKind::Array(element) => hash_field_type(element, hash),
        FieldKind::Map(key, value) => {
            hash_field_type(key, hash);
            hash_field_type(value, hash);
        }
        FieldKind::Row(schema) => schema.hash_into(hash),
        _ => {}
    }
}

const NAME_WIDTH: usize = 40;
const TYPE_WIDTH: usize = 30;

/// Renders the schema as a `NAME TYPE NULLABLE` table. Fields of nested rows
/// follow their parent with a dotted prefix; rows inside arrays use `name[]`.
impl fmt::Display for RowSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<nw$} {:<tw$} NULLABLE",
            "NAME",
            "TYPE",
            nw = NAME_WIDTH,
            tw = TYPE_WIDTH
        )?;
        print_fields(f, self, "", 0)
    }
}

fn print_fields(
    f: &mut fmt::Formatter<'_>,
    schema: &RowSchema,
    prefix: &str,
    indent: usize,
) -> fmt::Result {
    for field in schema.fields() {
        let name = format!("{:indent$}{}{}", "", prefix, field.name, indent = indent);
        let field_type = field.field_type();
        let rendered = match field_type.kind() {
            FieldKind::Row(_) => "ROW".to_string(),
            FieldKind::Array(element) if matches!(element.kind(), FieldKind::Row(_)) => {
                "ARRAY<ROW>".to_string()
            }
            _ => {
                let mut s = field_type.to_string();
                if field_type.is_nullable() {
                    s.pop();
                }
                s
            }
        };
        writeln!(
            f,
            "{:<nw$} {:<tw$} {}",
            name,
            rendered,
            field_type.is_nullable(),
            nw = NAME_WIDTH,
            tw = TYPE_WIDTH
        )?;
        match field_type.kind() {
            FieldKind::Row(nested) => {
                let prefix = format!("{}{}.", prefix, field.name);
                print_fields(f, nested, &prefix, indent + 2)?;
            }
            FieldKind::Array(element) => {
                if let FieldKind::Row(nested) = element.kind() {
                    let prefix = format!("{}{}[].", prefix, field.name);
                    print_fields(f, nested, &prefix, indent + 2)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
