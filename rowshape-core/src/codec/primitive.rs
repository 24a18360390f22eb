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

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime};

use crate::buffer::{Reader, Writer};
use crate::codec::{Codec, CodecRef};
use crate::error::Error;
use crate::row::Decimal;

/// Leaf types with a codec the host engine provides out of the box.
pub trait Native: Sized + Send + Sync + 'static {
    fn native_codec() -> CodecRef<Self>;
}

macro_rules! impl_fixed_codec {
    ($name:ident, $ty:ty, $writer:expr, $reader:expr, $desc:literal) => {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl Codec<$ty> for $name {
            #[inline(always)]
            fn encode(&self, value: &$ty, writer: &mut Writer) -> Result<(), Error> {
                $writer(writer, *value);
                Ok(())
            }

            #[inline(always)]
            fn decode(&self, reader: &mut Reader) -> Result<$ty, Error> {
                $reader(reader)
            }

            fn describe(&self) -> String {
                $desc.to_string()
            }
        }

        impl Native for $ty {
            fn native_codec() -> CodecRef<Self> {
                Arc::new($name)
            }
        }
    };
}

impl_fixed_codec!(BoolCodec, bool, Writer::write_bool, Reader::read_bool, "Bool");
impl_fixed_codec!(ByteCodec, i8, Writer::write_i8, Reader::read_i8, "Byte");
impl_fixed_codec!(Int16Codec, i16, Writer::write_i16, Reader::read_i16, "Int16");
impl_fixed_codec!(
    VarInt32Codec,
    i32,
    Writer::write_varint32,
    Reader::read_varint32,
    "VarInt32"
);
impl_fixed_codec!(
    VarInt64Codec,
    i64,
    Writer::write_varint64,
    Reader::read_varint64,
    "VarInt64"
);
impl_fixed_codec!(FloatCodec, f32, Writer::write_f32, Reader::read_f32, "Float");
impl_fixed_codec!(DoubleCodec, f64, Writer::write_f64, Reader::read_f64, "Double");

#[derive(Clone, Copy, Debug, Default)]
pub struct StringUtf8Codec;

impl Codec<String> for StringUtf8Codec {
    fn encode(&self, value: &String, writer: &mut Writer) -> Result<(), Error> {
        writer.write_utf8_string(value)
    }

    fn decode(&self, reader: &mut Reader) -> Result<String, Error> {
        reader.read_utf8_string()
    }

    fn describe(&self) -> String {
        "StringUtf8".to_string()
    }
}

impl Native for String {
    fn native_codec() -> CodecRef<Self> {
        Arc::new(StringUtf8Codec)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BytesCodec;

impl Codec<Vec<u8>> for BytesCodec {
    fn encode(&self, value: &Vec<u8>, writer: &mut Writer) -> Result<(), Error> {
        writer.write_len_bytes(value)
    }

    fn decode(&self, reader: &mut Reader) -> Result<Vec<u8>, Error> {
        Ok(reader.read_len_bytes()?.to_vec())
    }

    fn describe(&self) -> String {
        "Bytes".to_string()
    }
}

impl Native for Vec<u8> {
    fn native_codec() -> CodecRef<Self> {
        Arc::new(BytesCodec)
    }
}

/// Scale as a varint, then the unscaled value as 16 little-endian bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalCodec;

impl Codec<Decimal> for DecimalCodec {
    fn encode(&self, value: &Decimal, writer: &mut Writer) -> Result<(), Error> {
        write_decimal(writer, value);
        Ok(())
    }

    fn decode(&self, reader: &mut Reader) -> Result<Decimal, Error> {
        read_decimal(reader)
    }

    fn describe(&self) -> String {
        "Decimal".to_string()
    }
}

impl Native for Decimal {
    fn native_codec() -> CodecRef<Self> {
        Arc::new(DecimalCodec)
    }
}

/// Seconds since the epoch as a zig-zag varint, then sub-second nanoseconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateTimeCodec;

impl Codec<NaiveDateTime> for DateTimeCodec {
    fn encode(&self, value: &NaiveDateTime, writer: &mut Writer) -> Result<(), Error> {
        write_datetime(writer, value);
        Ok(())
    }

    fn decode(&self, reader: &mut Reader) -> Result<NaiveDateTime, Error> {
        read_datetime(reader)
    }

    fn describe(&self) -> String {
        "DateTime".to_string()
    }
}

impl Native for NaiveDateTime {
    fn native_codec() -> CodecRef<Self> {
        Arc::new(DateTimeCodec)
    }
}

pub(crate) fn write_decimal(writer: &mut Writer, value: &Decimal) {
    writer.write_varuint32(value.scale);
    writer.write_i128(value.unscaled);
}

pub(crate) fn read_decimal(reader: &mut Reader) -> Result<Decimal, Error> {
    let scale = reader.read_varuint32()?;
    let unscaled = reader.read_i128()?;
    Ok(Decimal::new(unscaled, scale))
}

pub(crate) fn write_datetime(writer: &mut Writer, value: &NaiveDateTime) {
    let utc = value.and_utc();
    writer.write_varint64(utc.timestamp());
    writer.write_varuint32(utc.timestamp_subsec_nanos());
}

pub(crate) fn read_datetime(reader: &mut Reader) -> Result<NaiveDateTime, Error> {
    let secs = reader.read_varint64()?;
    let nanos = reader.read_varuint32()?;
    DateTime::from_timestamp(secs, nanos)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| Error::invalid_data(format!("invalid timestamp {}s {}ns", secs, nanos)))
}
