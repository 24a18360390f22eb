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

//! Binary form of a [`Row`].
//!
//! ```text
//! | varuint field count | null bitmap | value of each non-null field |
//! ```
//!
//! A set bit in the bitmap marks a null field. Array elements and map
//! entries carry a one-byte [`NullFlag`] only when their type is nullable.

use std::sync::Arc;

use crate::buffer::{Reader, Writer};
use crate::codec::primitive::{read_datetime, read_decimal, write_datetime, write_decimal};
use crate::codec::Codec;
use crate::error::Error;
use crate::row::bit_util::{calculate_bitmap_width_in_bytes, is_set, set_bit};
use crate::row::schema::{FieldKind, FieldType, RowSchema};
use crate::row::value::{Row, Value};
use crate::types::NullFlag;

/// Codec for rows of a single [`RowSchema`].
#[derive(Clone, Debug)]
pub struct RowCodec {
    schema: Arc<RowSchema>,
}

impl RowCodec {
    pub fn new(schema: Arc<RowSchema>) -> RowCodec {
        RowCodec { schema }
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }
}

impl Codec<Row> for RowCodec {
    fn encode(&self, row: &Row, writer: &mut Writer) -> Result<(), Error> {
        if !Arc::ptr_eq(row.schema(), &self.schema) && row.schema().as_ref() != self.schema.as_ref()
        {
            return Err(Error::type_mismatch(
                format!("row of schema {:016x}", self.schema.fingerprint()),
                format!("row of schema {:016x}", row.schema().fingerprint()),
            ));
        }
        write_row(row, writer)
    }

    fn decode(&self, reader: &mut Reader) -> Result<Row, Error> {
        read_row(&self.schema, reader)
    }

    fn describe(&self) -> String {
        format!("Row[{:016x}]", self.schema.fingerprint())
    }
}

fn write_row(row: &Row, writer: &mut Writer) -> Result<(), Error> {
    let fields = row.schema().fields();
    writer.write_len(fields.len())?;
    let mut bitmap = vec![0u8; calculate_bitmap_width_in_bytes(fields.len())];
    for (idx, value) in row.values().iter().enumerate() {
        if value.is_null() {
            set_bit(&mut bitmap, idx);
        }
    }
    writer.write_bytes(&bitmap);
    for (field, value) in fields.iter().zip(row.values()) {
        if value.is_null() {
            if !field.field_type().is_nullable() {
                return Err(Error::invalid_data(format!(
                    "null value for non-nullable field `{}`",
                    field.name()
                )));
            }
            continue;
        }
        write_value(value, field.field_type(), writer)?;
    }
    Ok(())
}

fn read_row(schema: &Arc<RowSchema>, reader: &mut Reader) -> Result<Row, Error> {
    let count = reader.read_varuint32()? as usize;
    crate::ensure!(
        count == schema.len(),
        "row has {} fields on the wire, schema has {}",
        count,
        schema.len()
    );
    let bitmap = reader.read_bytes(calculate_bitmap_width_in_bytes(count))?;
    let mut values = Vec::with_capacity(count);
    for (idx, field) in schema.fields().iter().enumerate() {
        if is_set(bitmap, idx) {
            if !field.field_type().is_nullable() {
                return Err(Error::invalid_data(format!(
                    "null bit set for non-nullable field `{}`",
                    field.name()
                )));
            }
            values.push(Value::Null);
        } else {
            values.push(read_value(field.field_type(), reader)?);
        }
    }
    Ok(Row::new_unchecked(schema.clone(), values))
}

fn write_nested(value: &Value, field_type: &FieldType, writer: &mut Writer) -> Result<(), Error> {
    if field_type.is_nullable() {
        if value.is_null() {
            writer.write_i8(NullFlag::Null.into());
            return Ok(());
        }
        writer.write_i8(NullFlag::NotNull.into());
    }
    write_value(value, field_type, writer)
}

fn read_nested(field_type: &FieldType, reader: &mut Reader) -> Result<Value, Error> {
    if field_type.is_nullable() {
        if let NullFlag::Null = NullFlag::from_byte(reader.read_i8()?)? {
            return Ok(Value::Null);
        }
    }
    read_value(field_type, reader)
}

fn write_value(value: &Value, field_type: &FieldType, writer: &mut Writer) -> Result<(), Error> {
    match (value, field_type.kind()) {
        (Value::Byte(v), FieldKind::Byte) => writer.write_i8(*v),
        (Value::Int16(v), FieldKind::Int16) => writer.write_i16(*v),
        (Value::Int32(v), FieldKind::Int32) => writer.write_varint32(*v),
        (Value::Int64(v), FieldKind::Int64) => writer.write_varint64(*v),
        (Value::Float(v), FieldKind::Float) => writer.write_f32(*v),
        (Value::Double(v), FieldKind::Double) => writer.write_f64(*v),
        (Value::Decimal(v), FieldKind::Decimal) => write_decimal(writer, v),
        (Value::Boolean(v), FieldKind::Boolean) => writer.write_bool(*v),
        (Value::String(v), FieldKind::String) => writer.write_utf8_string(v)?,
        (Value::DateTime(v), FieldKind::DateTime) => write_datetime(writer, v),
        (Value::Bytes(v), FieldKind::Bytes) => writer.write_len_bytes(v)?,
        (Value::Array(elements), FieldKind::Array(element_type)) => {
            writer.write_len(elements.len())?;
            for element in elements {
                write_nested(element, element_type, writer)?;
            }
        }
        (Value::Map(entries), FieldKind::Map(key_type, value_type)) => {
            writer.write_len(entries.len())?;
            for (k, v) in entries {
                write_nested(k, key_type, writer)?;
                write_nested(v, value_type, writer)?;
            }
        }
        (Value::Row(row), FieldKind::Row(_)) => write_row(row, writer)?,
        (Value::Null, _) => {
            return Err(Error::invalid_data(format!(
                "null value for non-nullable {}",
                field_type
            )))
        }
        (other, _) => {
            return Err(Error::type_mismatch(
                field_type.to_string(),
                other.label(),
            ))
        }
    }
    Ok(())
}

fn read_value(field_type: &FieldType, reader: &mut Reader) -> Result<Value, Error> {
    let value = match field_type.kind() {
        FieldKind::Byte => Value::Byte(reader.read_i8()?),
        FieldKind::Int16 => Value::Int16(reader.read_i16()?),
        FieldKind::Int32 => Value::Int32(reader.read_varint32()?),
        FieldKind::Int64 => Value::Int64(reader.read_varint64()?),
        FieldKind::Float => Value::Float(reader.read_f32()?),
        FieldKind::Double => Value::Double(reader.read_f64()?),
        FieldKind::Decimal => Value::Decimal(read_decimal(reader)?),
        FieldKind::Boolean => Value::Boolean(reader.read_bool()?),
        FieldKind::String => Value::String(reader.read_utf8_string()?),
        FieldKind::DateTime => Value::DateTime(read_datetime(reader)?),
        FieldKind::Bytes => Value::Bytes(reader.read_len_bytes()?.to_vec()),
        FieldKind::Array(element_type) => {
            let len = read_length(reader)?;
            let mut elements = Vec::with_capacity(len);
            for _ in 0..len {
                elements.push(read_nested(element_type, reader)?);
            }
            Value::Array(elements)
        }
        FieldKind::Map(key_type, value_type) => {
            let len = read_length(reader)?;
            let mut entries = Vec::with_capacity(len);
            for _ in 0..len {
                let k = read_nested(key_type, reader)?;
                let v = read_nested(value_type, reader)?;
                entries.push((k, v));
            }
            Value::Map(entries)
        }
        FieldKind::Row(schema) => Value::Row(read_row(schema, reader)?),
    };
    Ok(value)
}

/// Every element takes at least one byte, so a length beyond the remaining
/// input is corrupt.
fn read_length(reader: &mut Reader) -> Result<usize, Error> {
    let len = reader.read_varuint32()? as usize;
    if len > reader.remaining() {
        return Err(Error::invalid_data(format!(
            "collection length {} exceeds the {} remaining bytes",
            len,
            reader.remaining()
        )));
    }
    Ok(len)
}
