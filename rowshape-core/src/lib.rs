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

//! # Rowshape Core
//!
//! Two small recursive algebras and the materializers that lower them.
//!
//! ## Architecture
//!
//! - **`coder`**: the coder algebra (`Beam`, `Fallback`, `Transform`,
//!   `Record`, `Disjunction`, `KV`) and its materializer
//! - **`schema`**: the schema algebra (`Record`, `RawRecord`, `Type`,
//!   `Optional`, `Fallback`, `Arr`), field-type computation, fallback
//!   resolution, row conversions and top-level wrapping
//! - **`codec`**: concrete codecs: natives, composites, decorators and the
//!   serde-backed generic fallback
//! - **`row`**: row descriptors, row values and their binary form
//! - **`resolver`**: the explicit type registry and the materialization
//!   context
//! - **`buffer`**: little-endian `Writer`/`Reader` with varints
//! - **`config`**, **`error`**, **`types`**
//!
//! ## Materialization
//!
//! Algebras are immutable values built once per type. Materializing one is a
//! pure function of the algebra, a [`resolver::Registry`] and a
//! [`config::Config`]: nothing is cached and nothing is mutated, so results
//! may be cached by the caller, keyed on the type and on the
//! (registry, config) pair.
//!
//! ```rust
//! use rowshape_core::coder::{self, Coder};
//! use rowshape_core::codec::{decode_from_slice, encode_to_vec};
//! use rowshape_core::config::Config;
//! use rowshape_core::resolver::Registry;
//! use rowshape_core::row::Value;
//! use rowshape_core::schema::{self, Schema};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let registry = Registry::default();
//! let config = Config::default();
//!
//! let point: Schema<Point> = Schema::record()
//!     .field("x", Schema::of(), |p: &Point| &p.x)
//!     .field("y", Schema::of(), |p: &Point| &p.y)
//!     .build(|f| Ok(Point { x: f.next()?, y: f.next()? }));
//! let materialized = schema::materialize(&registry, &config, &point).unwrap();
//! let row = materialized.to_row(&Point { x: 3, y: 4 }).unwrap();
//! assert_eq!(row.values(), &[Value::Int32(3), Value::Int32(4)]);
//! assert_eq!(materialized.from_row(row).unwrap(), Point { x: 3, y: 4 });
//!
//! let coder: Coder<Vec<i64>> = Coder::seq(Coder::native());
//! let codec = coder::materialize(&registry, &config, &coder).unwrap();
//! let bytes = encode_to_vec(&*codec, &vec![1, 2, 3]).unwrap();
//! assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), vec![1, 2, 3]);
//! ```

pub mod buffer;
pub mod codec;
pub mod coder;
pub mod config;
pub mod error;
pub mod fields;
pub mod resolver;
pub mod row;
pub mod schema;
pub mod types;
