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

use std::collections::BTreeMap;

use rowshape::prelude::*;
use rowshape::{materialize_coder, IntEncoding};
use tests::{circle_coder, point_coder, shape_coder, square_coder, Blob, Point, Shape};

fn materialize<T: 'static>(coder: &Coder<T>) -> rowshape::CodecRef<T> {
    materialize_coder(&Registry::default(), &Config::default(), coder).unwrap()
}

#[test]
fn test_record_round_trip() {
    let codec = materialize(&point_coder());
    let point = Point { x: 3, y: 4 };
    let bytes = encode_to_vec(&*codec, &point).unwrap();
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), point);
}

#[test]
fn test_disjunction_writes_discriminator_then_payload() {
    let codec = materialize(&shape_coder());
    let bytes = encode_to_vec(&*codec, &Shape::Circle(1.5)).unwrap();
    assert_eq!(bytes[0], 0);
    assert_eq!(&bytes[1..], &1.5f64.to_le_bytes());
    assert_eq!(
        decode_from_slice(&*codec, &bytes).unwrap(),
        Shape::Circle(1.5)
    );

    let bytes = encode_to_vec(&*codec, &Shape::Square(-2)).unwrap();
    // zig-zag: 1 -> 2, -2 -> 3
    assert_eq!(bytes, vec![2, 3]);
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), Shape::Square(-2));
}

#[test]
fn test_unknown_discriminator_is_fatal() {
    let circles_only: Coder<Shape> =
        Coder::disjunction("Shape", Coder::<i32>::native(), Shape::tag)
            .variant(0, circle_coder())
            .build();
    let codec = materialize(&circles_only);
    // discriminator 1 followed by a square payload
    let result = decode_from_slice(&*codec, &[2, 10]);
    assert!(matches!(result, Err(Error::UnknownVariant(_))));
    assert!(matches!(
        encode_to_vec(&*codec, &Shape::Square(5)),
        Err(Error::UnknownVariant(_))
    ));
}

#[test]
fn test_duplicate_discriminator_detected_at_materialization() {
    let ambiguous: Coder<Shape> = Coder::disjunction("Shape", Coder::<i32>::native(), Shape::tag)
        .variant(0, circle_coder())
        .variant(0, square_coder())
        .build();
    let result = materialize_coder(&Registry::default(), &Config::default(), &ambiguous);
    assert!(matches!(result, Err(Error::Duplicate(_))));
}

#[test]
fn test_kv_coder() {
    let coder: Coder<(String, Vec<i64>)> = Coder::kv(Coder::native(), Coder::seq(Coder::native()));
    let codec = materialize(&coder);
    let value = ("key".to_string(), vec![1, -1, i64::MAX]);
    let bytes = encode_to_vec(&*codec, &value).unwrap();
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), value);
    assert!(codec.describe().starts_with("KV("));
}

#[test]
fn test_xmap_adapts_a_known_codec() {
    #[derive(Debug, PartialEq)]
    struct UserId(i64);

    let coder: Coder<UserId> = Coder::xmap(Coder::<i64>::native(), UserId, |id: &UserId| id.0);
    let codec = materialize(&coder);
    let bytes = encode_to_vec(&*codec, &UserId(42)).unwrap();
    let raw = materialize(&Coder::<i64>::native());
    assert_eq!(bytes, encode_to_vec(&*raw, &42).unwrap());
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), UserId(42));
}

#[test]
fn test_transform_to_a_sorted_map() {
    let pairs: Coder<Vec<(String, i32)>> =
        Coder::seq(Coder::kv(Coder::native(), Coder::native()));
    let coder: Coder<BTreeMap<String, i32>> = Coder::xmap(
        pairs,
        |pairs: Vec<(String, i32)>| pairs.into_iter().collect(),
        |map: &BTreeMap<String, i32>| map.iter().map(|(k, v)| (k.clone(), *v)).collect(),
    );
    let codec = materialize(&coder);
    let map: BTreeMap<_, _> = [("b".to_string(), 2), ("a".to_string(), 1)].into_iter().collect();
    let bytes = encode_to_vec(&*codec, &map).unwrap();
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), map);
}

#[test]
fn test_optional_payloads() {
    let coder: Coder<Option<Point>> = Coder::optional(point_coder());
    let codec = materialize(&coder);
    for value in [None, Some(Point { x: -1, y: 0 })] {
        let bytes = encode_to_vec(&*codec, &value).unwrap();
        assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), value);
    }
    assert_eq!(encode_to_vec(&*codec, &None).unwrap(), vec![0]);
}

#[test]
fn test_nullable_config_changes_the_codec() {
    let registry = Registry::default();
    let plain = materialize_coder(&registry, &Config::default(), &point_coder()).unwrap();
    let nullable = materialize_coder(
        &registry,
        &Config::default().nullable_coders(true),
        &point_coder(),
    )
    .unwrap();
    assert_ne!(plain.describe(), nullable.describe());

    let point = Point { x: 1, y: 2 };
    let bytes = encode_to_vec(&*nullable, &point).unwrap();
    assert_eq!(bytes.len(), encode_to_vec(&*plain, &point).unwrap().len() + 2);
    assert_eq!(decode_from_slice(&*nullable, &bytes).unwrap(), point);
    // a null flag where a point's x is expected
    assert!(matches!(
        decode_from_slice(&*nullable, &[0, 1, 4]),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_fallback_uses_the_generic_codec() {
    let coder: Coder<Blob> = Coder::fallback();
    let blob = Blob {
        id: 1 << 40,
        labels: vec!["a".to_string(), "b".to_string()],
    };
    let registry = Registry::default();

    let varint = materialize_coder(&registry, &Config::default(), &coder).unwrap();
    let fixint = materialize_coder(
        &registry,
        &Config::default().fallback_int_encoding(IntEncoding::Fixed),
        &coder,
    )
    .unwrap();
    assert!(varint.describe().starts_with("Generic["));
    let a = encode_to_vec(&*varint, &blob).unwrap();
    let b = encode_to_vec(&*fixint, &blob).unwrap();
    assert!(a.len() < b.len());
    assert_eq!(decode_from_slice(&*varint, &a).unwrap(), blob);
    assert_eq!(decode_from_slice(&*fixint, &b).unwrap(), blob);

    let limited = materialize_coder(
        &registry,
        &Config::default().fallback_size_limit(Some(8)),
        &coder,
    )
    .unwrap();
    assert!(matches!(
        encode_to_vec(&*limited, &blob),
        Err(Error::EncodeError(_))
    ));
}

#[test]
fn test_construct_arity_mismatch_is_invalid_data() {
    let greedy: Coder<Point> = Coder::record("Point")
        .field("x", Coder::native(), |p: &Point| &p.x)
        .build(|f| {
            Ok(Point {
                x: f.next()?,
                y: f.next()?,
            })
        });
    let codec = materialize(&greedy);
    let bytes = encode_to_vec(&*codec, &Point { x: 1, y: 2 }).unwrap();
    assert!(matches!(
        decode_from_slice(&*codec, &bytes),
        Err(Error::InvalidData(_))
    ));

    let lazy: Coder<Point> = Coder::record("Point")
        .field("x", Coder::native(), |p: &Point| &p.x)
        .field("y", Coder::native(), |p: &Point| &p.y)
        .build(|f| Ok(Point { x: f.next()?, y: 0 }));
    let codec = materialize(&lazy);
    let bytes = encode_to_vec(&*codec, &Point { x: 1, y: 2 }).unwrap();
    assert!(matches!(
        decode_from_slice(&*codec, &bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn test_materialization_is_deterministic() {
    let registry = Registry::default();
    let config = Config::default();
    let coder = shape_coder();
    let a = materialize_coder(&registry, &config, &coder).unwrap();
    let b = materialize_coder(&registry, &config, &coder).unwrap();
    assert_eq!(a.describe(), b.describe());
    let shape = Shape::Circle(0.25);
    assert_eq!(
        encode_to_vec(&*a, &shape).unwrap(),
        encode_to_vec(&*b, &shape).unwrap()
    );
}

#[test]
fn test_seq_of_fieldless_records() {
    #[derive(Debug, Clone, PartialEq)]
    struct Marker;

    let coder: Coder<Vec<Marker>> = Coder::seq(Coder::record("Marker").build(|_| Ok(Marker)));
    let codec = materialize(&coder);
    let value = vec![Marker; 3];
    let bytes = encode_to_vec(&*codec, &value).unwrap();
    assert_eq!(bytes, vec![3]);
    assert_eq!(decode_from_slice(&*codec, &bytes).unwrap(), value);
}

#[test]
fn test_disjunction_identity_tracks_id_codec() {
    let wide_id: Coder<i32> = Coder::xmap(
        Coder::<i64>::native(),
        |wide: i64| wide as i32,
        |narrow: &i32| *narrow as i64,
    );
    let wide = Coder::disjunction("Shape", wide_id, Shape::tag)
        .variant(0, circle_coder())
        .variant(1, square_coder())
        .build();
    let a = materialize(&shape_coder());
    let b = materialize(&wide);
    assert_ne!(a.describe(), b.describe());
    let square = Shape::Square(5);
    assert_eq!(
        decode_from_slice(&*b, &encode_to_vec(&*b, &square).unwrap()).unwrap(),
        square
    );
}
