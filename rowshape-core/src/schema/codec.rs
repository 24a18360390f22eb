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

use crate::buffer::{Reader, Writer};
use crate::codec::wrapper::short_type_name;
use crate::codec::Codec;
use crate::coder::Coder;
use crate::config::Config;
use crate::error::Error;
use crate::resolver::Registry;
use crate::row::{Row, RowCodec};
use crate::schema::{materialize, Materialized, Schema};

/// Binary codec for `T` that goes through its row form.
pub struct SchemaCodec<T> {
    materialized: Materialized<T>,
    row_codec: RowCodec,
}

impl<T> SchemaCodec<T> {
    pub fn new(materialized: Materialized<T>) -> SchemaCodec<T> {
        let row_codec = RowCodec::new(materialized.schema().clone());
        SchemaCodec {
            materialized,
            row_codec,
        }
    }

    pub fn materialized(&self) -> &Materialized<T> {
        &self.materialized
    }
}

impl<T: 'static> Codec<T> for SchemaCodec<T> {
    fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
        let row = self.materialized.to_row(value)?;
        self.row_codec.encode(&row, writer)
    }

    fn decode(&self, reader: &mut Reader) -> Result<T, Error> {
        let row: Row = self.row_codec.decode(reader)?;
        self.materialized.from_row(row)
    }

    fn describe(&self) -> String {
        format!(
            "Schema[{}]({})",
            short_type_name::<T>(),
            self.row_codec.describe()
        )
    }
}

impl<T: 'static> Coder<T> {
    /// A leaf coder that serializes `T` through its materialized schema.
    pub fn from_schema(
        registry: &Registry,
        config: &Config,
        schema: &Schema<T>,
    ) -> Result<Coder<T>, Error> {
        let materialized = materialize(registry, config, schema)?;
        Ok(Coder::Beam(Arc::new(SchemaCodec::new(materialized))))
    }
}
