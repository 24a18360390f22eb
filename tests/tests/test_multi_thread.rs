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
use std::sync::Arc;
use std::thread;

use rowshape::prelude::*;
use rowshape::RowCodec;
use tests::{person_schema, point_coder, sample_person, Person, Point};

#[test]
fn test_shared_codec_across_threads() {
    let registry = Registry::default();
    let codec = registry.materialize_coder::<i32>(&Config::default()).unwrap();
    let src: HashSet<i32> = [41, 42, 43, 45, 46, 47].into_iter().collect();
    // encode
    let mut handles = vec![];
    for item in &src {
        let codec = Arc::clone(&codec);
        let item = *item;
        handles.push(thread::spawn(move || encode_to_vec(&*codec, &item).unwrap()));
    }
    let encoded: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // decode
    let mut handles = vec![];
    for bytes in encoded {
        let codec = Arc::clone(&codec);
        handles.push(thread::spawn(move || decode_from_slice(&*codec, &bytes).unwrap()));
    }
    let dest: HashSet<i32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(dest, src);
}

#[test]
fn test_concurrent_materialization_agrees() {
    let mut registry = Registry::default();
    registry.register_coder(point_coder()).unwrap();
    registry.register_schema(person_schema()).unwrap();
    let registry = Arc::new(registry);

    let mut handles = vec![];
    for i in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let config = Config::default();
            let codec = registry.materialize_coder::<Point>(&config).unwrap();
            let point_bytes = encode_to_vec(&*codec, &Point { x: 1, y: 2 }).unwrap();

            let materialized = registry.materialize_schema::<Person>(&config).unwrap();
            let mut person = sample_person();
            person.age = i;
            let row = materialized.to_row(&person).unwrap();
            let row_bytes =
                encode_to_vec(&RowCodec::new(materialized.schema().clone()), &row).unwrap();
            (
                codec.describe(),
                point_bytes,
                materialized.schema().to_string(),
                row_bytes,
                person,
            )
        }));
    }
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let (describe, point_bytes, printed, _, _) = &results[0];
    for (d, p, s, row_bytes, person) in &results {
        assert_eq!(d, describe);
        assert_eq!(p, point_bytes);
        assert_eq!(s, printed);

        let materialized = registry
            .materialize_schema::<Person>(&Config::default())
            .unwrap();
        let row = decode_from_slice(&RowCodec::new(materialized.schema().clone()), row_bytes)
            .unwrap();
        let decoded: Person = materialized.from_row(row).unwrap();
        assert_eq!(&decoded, person);
    }
}

#[test]
fn test_shared_materialized_schema() {
    let registry = Registry::default();
    let materialized = Arc::new(
        registry
            .materialize_schema::<String>(&Config::default())
            .unwrap(),
    );
    let handles: Vec<_> = (0..6)
        .map(|i| {
            let materialized = Arc::clone(&materialized);
            thread::spawn(move || {
                let value = format!("item-{}", i);
                let row = materialized.to_row(&value).unwrap();
                materialized.from_row(row).unwrap() == value
            })
        })
        .collect();
    assert!(handles.into_iter().all(|h| h.join().unwrap()));
}
