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

use chrono::{DateTime, NaiveDateTime};
use rowshape::prelude::*;
use rowshape::Decimal;
use tests::{person_schema, point_coder, point_schema, sample_person, Person, Point};

struct Unregistered;

#[test]
fn test_builtins_materialize() {
    let registry = Registry::default();
    let config = Config::default();

    let codec = registry.materialize_coder::<Decimal>(&config).unwrap();
    let value = Decimal::new(-12345, 3);
    let bytes = encode_to_vec(&*codec, &value).unwrap();
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), value);

    let now: NaiveDateTime = DateTime::from_timestamp(1_700_000_000, 123_456_789)
        .unwrap()
        .naive_utc();
    let materialized = registry.materialize_schema::<NaiveDateTime>(&config).unwrap();
    assert_eq!(
        materialized.schema().fields()[0].field_type(),
        &FieldType::datetime()
    );
    let row = materialized.to_row(&now).unwrap();
    assert_eq!(materialized.from_row(row).unwrap(), now);
}

#[test]
fn test_lookup_miss_is_unsupported() {
    let registry = Registry::default();
    assert!(matches!(
        registry.coder::<Unregistered>(),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(
        registry.materialize_schema::<Unregistered>(&Config::default()),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(
        Registry::empty().materialize_coder::<i32>(&Config::default()),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn test_registered_types_materialize() {
    let mut registry = Registry::default();
    registry.register_coder(point_coder()).unwrap();
    registry.register_schema(point_schema()).unwrap();
    registry.register_schema(person_schema()).unwrap();

    let config = Config::default();
    let codec = registry.materialize_coder::<Point>(&config).unwrap();
    let bytes = encode_to_vec(&*codec, &Point { x: 5, y: 6 }).unwrap();
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), Point { x: 5, y: 6 });

    let materialized = registry.materialize_schema::<Person>(&config).unwrap();
    let person = sample_person();
    let row = materialized.to_row(&person).unwrap();
    assert_eq!(materialized.from_row(row).unwrap(), person);
}

#[test]
fn test_registered_algebras_compose() {
    let mut registry = Registry::default();
    registry.register_coder(point_coder()).unwrap();
    let points: Coder<Vec<Point>> = Coder::seq(registry.coder::<Point>().unwrap());
    registry.register_coder(points).unwrap();

    let codec = registry.materialize_coder::<Vec<Point>>(&Config::default()).unwrap();
    let value = vec![Point { x: 1, y: 1 }, Point { x: 2, y: 3 }];
    let bytes = encode_to_vec(&*codec, &value).unwrap();
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), value);
}

#[test]
fn test_re_registration_is_rejected() {
    let mut registry = Registry::default();
    registry.register_schema(point_schema()).unwrap();
    assert!(matches!(
        registry.register_schema(point_schema()),
        Err(Error::Duplicate(_))
    ));
    assert!(matches!(
        registry.register_schema(Schema::<String>::of()),
        Err(Error::Duplicate(_))
    ));
}

#[test]
fn test_configs_are_independent() {
    let registry = Registry::default();
    let plain = registry.materialize_coder::<i64>(&Config::default()).unwrap();
    let nullable = registry
        .materialize_coder::<i64>(&Config::default().nullable_coders(true))
        .unwrap();
    assert_eq!(encode_to_vec(&*plain, &1).unwrap(), vec![2]);
    assert_eq!(encode_to_vec(&*nullable, &1).unwrap(), vec![1, 2]);
}
