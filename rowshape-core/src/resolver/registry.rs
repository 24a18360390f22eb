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

use std::any::{Any, TypeId};
use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::codec::CodecRef;
use crate::coder::{self, Coder};
use crate::config::Config;
use crate::error::Error;
use crate::row::Decimal;
use crate::schema::{self, Materialized, Schema};

/// Explicit lookup table from a Rust type to its coder and schema algebras.
///
/// Populate it at startup and share it read-only afterwards; every lookup
/// takes `&self`. Values are stored type-erased and recovered by downcast,
/// so an entry registered for `T` is only ever returned as a `Coder<T>` or a
/// `Schema<T>`.
pub struct Registry {
    coders: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    schemas: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry.register_builtin_types();
        registry
    }
}

macro_rules! register_builtins {
    ($registry:expr, $($ty:ty),+ $(,)?) => {
        $(
            $registry
                .coders
                .insert(TypeId::of::<$ty>(), Box::new(Coder::<$ty>::native()));
            $registry
                .schemas
                .insert(TypeId::of::<$ty>(), Box::new(Schema::<$ty>::of()));
        )+
    };
}

impl Registry {
    /// A registry without the built-in primitive entries.
    pub fn empty() -> Registry {
        Registry {
            coders: HashMap::new(),
            schemas: HashMap::new(),
        }
    }

    fn register_builtin_types(&mut self) {
        register_builtins!(
            self,
            bool,
            i8,
            i16,
            i32,
            i64,
            f32,
            f64,
            String,
            Vec<u8>,
            Decimal,
            NaiveDateTime,
        );
    }

    pub fn register_coder<T: 'static>(&mut self, coder: Coder<T>) -> Result<(), Error> {
        let id = TypeId::of::<T>();
        if self.coders.contains_key(&id) {
            return Err(Error::duplicate(format!(
                "a coder for `{}` is already registered",
                std::any::type_name::<T>()
            )));
        }
        tracing::debug!(ty = std::any::type_name::<T>(), "registered coder");
        self.coders.insert(id, Box::new(coder));
        Ok(())
    }

    pub fn register_schema<T: 'static>(&mut self, schema: Schema<T>) -> Result<(), Error> {
        let id = TypeId::of::<T>();
        if self.schemas.contains_key(&id) {
            return Err(Error::duplicate(format!(
                "a schema for `{}` is already registered",
                std::any::type_name::<T>()
            )));
        }
        tracing::debug!(ty = std::any::type_name::<T>(), "registered schema");
        self.schemas.insert(id, Box::new(schema));
        Ok(())
    }

    pub fn coder<T: 'static>(&self) -> Result<Coder<T>, Error> {
        self.coders
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Coder<T>>())
            .cloned()
            .ok_or_else(|| {
                Error::enhance_type_error::<T>(Error::unsupported(
                    "no coder registered and no fallback supplied",
                ))
            })
    }

    pub fn schema<T: 'static>(&self) -> Result<Schema<T>, Error> {
        self.schemas
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Schema<T>>())
            .cloned()
            .ok_or_else(|| {
                Error::enhance_type_error::<T>(Error::unsupported(
                    "no schema registered and no fallback supplied",
                ))
            })
    }

    pub fn has_coder<T: 'static>(&self) -> bool {
        self.coders.contains_key(&TypeId::of::<T>())
    }

    pub fn has_schema<T: 'static>(&self) -> bool {
        self.schemas.contains_key(&TypeId::of::<T>())
    }

    /// Looks up the coder registered for `T` and lowers it to a codec.
    pub fn materialize_coder<T: 'static>(&self, config: &Config) -> Result<CodecRef<T>, Error> {
        let coder = self.coder::<T>()?;
        coder::materialize(self, config, &coder)
    }

    /// Looks up the schema registered for `T` and materializes it.
    pub fn materialize_schema<T: 'static>(&self, config: &Config) -> Result<Materialized<T>, Error> {
        let schema = self.schema::<T>()?;
        schema::materialize(self, config, &schema)
    }
}
