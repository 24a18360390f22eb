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

//! # Rowshape
//!
//! Describe how a type maps onto a row and onto bytes once, then derive the
//! row descriptor, the binary codec and the conversions between them from
//! that description.
//!
//! ## Coders
//!
//! A [`Coder`] says how a value is serialized: a ready-made native codec, a
//! generic serde fallback, a transform of another coder, a record of
//! field coders, a tagged union, or a key/value pair.
//!
//! ```rust
//! use rowshape::prelude::*;
//!
//! #[derive(Debug, PartialEq)]
//! enum Shape {
//!     Circle(f64),
//!     Square(i32),
//! }
//!
//! let shape: Coder<Shape> = Coder::disjunction("Shape", Coder::<i32>::native(), |s: &Shape| {
//!     match s {
//!         Shape::Circle(_) => 0,
//!         Shape::Square(_) => 1,
//!     }
//! })
//! .variant(
//!     0,
//!     Coder::variant(Coder::native(), Shape::Circle, |s: &Shape| match s {
//!         Shape::Circle(r) => Some(r),
//!         _ => None,
//!     }),
//! )
//! .variant(
//!     1,
//!     Coder::variant(Coder::native(), Shape::Square, |s: &Shape| match s {
//!         Shape::Square(side) => Some(side),
//!         _ => None,
//!     }),
//! )
//! .build();
//!
//! let registry = Registry::default();
//! let codec = rowshape::materialize_coder(&registry, &Config::default(), &shape).unwrap();
//! let bytes = encode_to_vec(&*codec, &Shape::Square(5)).unwrap();
//! assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), Shape::Square(5));
//! ```
//!
//! ## Schemas
//!
//! A [`Schema`] says how a value maps onto a row. Leaves without a
//! structural form are stored as bytes through an embedded coder. A root
//! that is not a record is wrapped in a one-field record.
//!
//! ```rust
//! use rowshape::prelude::*;
//!
//! let tags: Schema<Vec<Option<String>>> = Schema::array(Schema::optional(Schema::of()));
//! let registry = Registry::default();
//! let materialized = rowshape::materialize_schema(&registry, &Config::default(), &tags).unwrap();
//! assert_eq!(materialized.schema().len(), 1);
//!
//! let value = vec![Some("a".to_string()), None];
//! let row = materialized.to_row(&value).unwrap();
//! assert_eq!(materialized.from_row(row).unwrap(), value);
//! println!("{}", materialized.schema());
//! ```
//!
//! ## Logging
//!
//! Materialization emits `tracing` events (`debug` per record, disjunction
//! and wrapped root; `trace` per canonicalized codec). Install any
//! subscriber to see them.

pub use rowshape_core::codec::{decode_from_slice, encode_to_vec, Codec, CodecRef, Native};
pub use rowshape_core::coder::{materialize as materialize_coder, Coder};
pub use rowshape_core::config::{Config, FallbackConfig, IntEncoding};
pub use rowshape_core::error::Error;
pub use rowshape_core::fields::Fields;
pub use rowshape_core::resolver::Registry;
pub use rowshape_core::row::{Decimal, Field, FieldKind, FieldType, Row, RowCodec, RowSchema, Value};
pub use rowshape_core::schema::{
    materialize as materialize_schema, Materialized, Primitive, Schema, SchemaCodec,
};
pub use rowshape_core::{bail, ensure, not_allowed};

pub mod prelude {
    pub use crate::{
        decode_from_slice, encode_to_vec, Codec, Coder, Config, Error, Fields, FieldType,
        Materialized, Registry, Row, RowSchema, Schema, Value,
    };
}
