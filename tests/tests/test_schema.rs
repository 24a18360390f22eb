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

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rowshape::prelude::*;
use rowshape::{materialize_schema, Field, FieldKind};
use rowshape_core::schema::SchemaMaterializer;
use tests::{person_schema, point_schema, sample_person, Blob, Point};

fn encode<T: 'static>(schema: &Schema<T>, value: &T) -> Value {
    let field_type = SchemaMaterializer::field_type(schema).unwrap();
    let encode = SchemaMaterializer::build_encode(schema, &field_type).unwrap();
    encode(value).unwrap()
}

fn decode<T: 'static>(schema: &Schema<T>, value: Value) -> T {
    let decode = SchemaMaterializer::build_decode(schema).unwrap();
    decode(value).unwrap()
}

#[test]
fn test_point_record() {
    let schema = point_schema();
    let materialized = materialize_schema(&Registry::default(), &Config::default(), &schema).unwrap();
    let row_schema = materialized.schema();
    assert_eq!(row_schema.len(), 2);
    assert_eq!(row_schema.fields()[0], Field::new("x", FieldType::int32()));
    assert_eq!(row_schema.fields()[1], Field::new("y", FieldType::int32()));
    assert!(!row_schema.fields()[0].field_type().is_nullable());

    let row = materialized.to_row(&Point { x: 3, y: 4 }).unwrap();
    assert_eq!(row.values(), &[Value::Int32(3), Value::Int32(4)]);
    assert_eq!(materialized.from_row(row).unwrap(), Point { x: 3, y: 4 });
}

#[test]
fn test_optional_string() {
    let schema: Schema<Option<String>> = Schema::optional(Schema::of());
    let field_type = SchemaMaterializer::field_type(&schema).unwrap();
    assert_eq!(field_type, FieldType::string().with_nullable(true));

    assert_eq!(encode(&schema, &None), Value::Null);
    assert_eq!(
        encode(&schema, &Some("x".to_string())),
        Value::String("x".to_string())
    );
    assert_eq!(decode(&schema, Value::Null), None);
    assert_eq!(
        decode(&schema, Value::String("x".to_string())),
        Some("x".to_string())
    );
}

#[test]
fn test_null_never_reaches_the_inner_decoder() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    fn counting(value: Value) -> Result<i32, Error> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        match value {
            Value::Int32(v) => Ok(v),
            other => Err(Error::type_mismatch("INT32", other.label())),
        }
    }

    let inner: Schema<i32> = Schema::leaf(FieldType::int32(), |v| Value::Int32(*v), counting);
    let schema = Schema::optional(inner);
    assert_eq!(decode(&schema, Value::Null), None);
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    assert_eq!(decode(&schema, Value::Int32(5)), Some(5));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_array_of_int32() {
    let schema: Schema<Vec<i32>> = Schema::array(Schema::of());
    assert_eq!(
        SchemaMaterializer::field_type(&schema).unwrap(),
        FieldType::array(FieldType::int32())
    );
    let value = encode(&schema, &vec![1, 2, 3]);
    assert_eq!(
        value,
        Value::Array(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
    );
    assert_eq!(decode(&schema, value), vec![1, 2, 3]);
}

#[test]
fn test_array_over_other_containers() {
    let deque: Schema<VecDeque<String>> = Schema::array(Schema::of());
    let value: VecDeque<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(decode(&deque, encode(&deque, &value)), value);

    let set: Schema<BTreeSet<i64>> = Schema::array(Schema::of());
    let value: BTreeSet<i64> = [3, 1, 2].into_iter().collect();
    let encoded = encode(&set, &value);
    assert_eq!(
        encoded,
        Value::Array(vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)])
    );
    assert_eq!(decode(&set, encoded), value);

    // fixed-size arrays go through explicit conversions
    let pair: Schema<[i32; 2]> = Schema::array_with(
        Schema::of(),
        |a: &[i32; 2]| a.iter().collect(),
        |items: Vec<i32>| [items[0], items[1]],
    );
    assert_eq!(decode(&pair, encode(&pair, &[7, 8])), [7, 8]);
}

#[test]
fn test_nested_record_of_optional_array_of_record() {
    let registry = Registry::default();
    let materialized = materialize_schema(&registry, &Config::default(), &person_schema()).unwrap();
    let schema = materialized.schema();
    let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["name", "age", "homes", "blob"]);

    let homes = schema.fields()[2].field_type();
    assert!(homes.is_nullable());
    let address = homes.element_type().unwrap();
    assert!(!address.is_nullable());
    let address_schema = address.row_schema().unwrap();
    assert_eq!(address_schema.fields()[1].name(), "zip");
    assert!(address_schema.fields()[1].field_type().is_nullable());
    assert_eq!(schema.fields()[3].field_type(), &FieldType::bytes());

    let person = sample_person();
    let row = materialized.to_row(&person).unwrap();
    assert!(matches!(row.get_by_name("blob"), Some(Value::Bytes(_))));
    assert_eq!(materialized.from_row(row).unwrap(), person);

    let mut homeless = sample_person();
    homeless.homes = None;
    let row = materialized.to_row(&homeless).unwrap();
    assert_eq!(row.get_by_name("homes"), Some(&Value::Null));
    assert_eq!(materialized.from_row(row).unwrap(), homeless);

    let mut empty = sample_person();
    empty.homes = Some(Vec::new());
    let row = materialized.to_row(&empty).unwrap();
    assert_eq!(row.get_by_name("homes"), Some(&Value::Array(Vec::new())));
    assert_eq!(materialized.from_row(row).unwrap(), empty);
}

#[test]
fn test_fallback_leaf_is_bytes() {
    let schema: Schema<Blob> = Schema::fallback(Coder::fallback());
    assert_eq!(
        SchemaMaterializer::field_type(&schema).unwrap(),
        FieldType::bytes()
    );
    let materialized = materialize_schema(&Registry::default(), &Config::default(), &schema).unwrap();
    let blob = Blob {
        id: 9,
        labels: Vec::new(),
    };
    let row = materialized.to_row(&blob).unwrap();
    assert!(matches!(row.get(0), Some(Value::Bytes(_))));
    assert_eq!(materialized.from_row(row).unwrap(), blob);
}

#[test]
fn test_fallback_leaf_with_structured_coder() {
    // the byte field hides the coder's real shape
    let schema: Schema<Point> = Schema::fallback(tests::point_coder());
    let materialized = materialize_schema(&Registry::default(), &Config::default(), &schema).unwrap();
    assert_eq!(materialized.schema().fields()[0].field_type(), &FieldType::bytes());
    let row = materialized.to_row(&Point { x: 1, y: -1 }).unwrap();
    assert_eq!(row.get(0), Some(&Value::Bytes(vec![2, 1])));
    assert_eq!(materialized.from_row(row).unwrap(), Point { x: 1, y: -1 });
}

#[test]
fn test_raw_record_nested_in_a_record() {
    #[derive(Debug, Clone, PartialEq)]
    struct Money {
        cents: i64,
        currency: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Invoice {
        id: i64,
        total: Money,
    }

    let money_row = Arc::new(
        RowSchema::new(vec![
            Field::new("amount", FieldType::int64()),
            Field::new("currency", FieldType::string()),
        ])
        .unwrap(),
    );
    let to_schema = money_row.clone();
    let money: Schema<Money> = Schema::raw(
        money_row.clone(),
        move |m: &Money| {
            Row::with_values(
                to_schema.clone(),
                vec![Value::Int64(m.cents), Value::String(m.currency.clone())],
            )
        },
        |row: Row| match row.into_values().as_slice() {
            [Value::Int64(cents), Value::String(currency)] => Ok(Money {
                cents: *cents,
                currency: currency.clone(),
            }),
            _ => Err(Error::invalid_data("not a money row")),
        },
    );
    let invoice: Schema<Invoice> = Schema::record()
        .field("id", Schema::of(), |i: &Invoice| &i.id)
        .field("total", money, |i: &Invoice| &i.total)
        .build(|f| {
            Ok(Invoice {
                id: f.next()?,
                total: f.next()?,
            })
        });

    let materialized = materialize_schema(&Registry::default(), &Config::default(), &invoice).unwrap();
    match materialized.schema().fields()[1].field_type().kind() {
        FieldKind::Row(schema) => assert!(Arc::ptr_eq(schema, &money_row)),
        other => panic!("unexpected kind {:?}", other),
    }
    let value = Invoice {
        id: 1,
        total: Money {
            cents: 1999,
            currency: "EUR".to_string(),
        },
    };
    let row = materialized.to_row(&value).unwrap();
    assert_eq!(materialized.from_row(row).unwrap(), value);
}

#[test]
fn test_double_optional_collapses() {
    let schema: Schema<Option<Option<i32>>> = Schema::optional(Schema::optional(Schema::of()));
    assert!(SchemaMaterializer::field_type(&schema).unwrap().is_nullable());
    assert_eq!(encode(&schema, &Some(None)), Value::Null);
    assert_eq!(encode(&schema, &None), Value::Null);
    assert_eq!(decode(&schema, encode(&schema, &Some(None))), None);
    assert_eq!(decode(&schema, encode(&schema, &Some(Some(3)))), Some(Some(3)));
}

#[test]
fn test_optional_elements_are_nullable() {
    let schema: Schema<Vec<Option<i32>>> = Schema::array(Schema::optional(Schema::of()));
    let field_type = SchemaMaterializer::field_type(&schema).unwrap();
    assert!(!field_type.is_nullable());
    assert!(field_type.element_type().unwrap().is_nullable());
    let value = vec![Some(1), None, Some(3)];
    let encoded = encode(&schema, &value);
    assert_eq!(
        encoded,
        Value::Array(vec![Value::Int32(1), Value::Null, Value::Int32(3)])
    );
    assert_eq!(decode(&schema, encoded), value);
}

#[test]
fn test_decode_rejects_wrong_value_shape() {
    let schema: Schema<Vec<i32>> = Schema::array(Schema::of());
    let decode = SchemaMaterializer::build_decode(&schema).unwrap();
    assert!(matches!(
        decode(Value::Int32(1)),
        Err(Error::TypeMismatch(_, _))
    ));
    assert!(matches!(
        decode(Value::Array(vec![Value::String("1".into())])),
        Err(Error::TypeMismatch(_, _))
    ));
}

#[test]
fn test_duplicate_field_names_are_rejected() {
    let schema: Schema<Point> = Schema::record()
        .field("x", Schema::of(), |p: &Point| &p.x)
        .field("x", Schema::of(), |p: &Point| &p.y)
        .build(|f| {
            Ok(Point {
                x: f.next()?,
                y: f.next()?,
            })
        });
    assert!(matches!(
        SchemaMaterializer::field_type(&schema),
        Err(Error::Duplicate(_))
    ));
    assert!(matches!(
        materialize_schema(&Registry::default(), &Config::default(), &schema),
        Err(Error::Duplicate(_))
    ));
}
