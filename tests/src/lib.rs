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

//! Models shared by the integration tests.

use rowshape::{Coder, Schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

pub fn point_schema() -> Schema<Point> {
    Schema::record()
        .field("x", Schema::of(), |p: &Point| &p.x)
        .field("y", Schema::of(), |p: &Point| &p.y)
        .build(|f| {
            Ok(Point {
                x: f.next()?,
                y: f.next()?,
            })
        })
}

pub fn point_coder() -> Coder<Point> {
    Coder::record("Point")
        .field("x", Coder::native(), |p: &Point| &p.x)
        .field("y", Coder::native(), |p: &Point| &p.y)
        .build(|f| {
            Ok(Point {
                x: f.next()?,
                y: f.next()?,
            })
        })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(f64),
    Square(i32),
}

impl Shape {
    pub fn tag(&self) -> i32 {
        match self {
            Shape::Circle(_) => 0,
            Shape::Square(_) => 1,
        }
    }
}

pub fn circle_coder() -> Coder<Shape> {
    Coder::variant(Coder::native(), Shape::Circle, |s: &Shape| match s {
        Shape::Circle(radius) => Some(radius),
        _ => None,
    })
}

pub fn square_coder() -> Coder<Shape> {
    Coder::variant(Coder::native(), Shape::Square, |s: &Shape| match s {
        Shape::Square(side) => Some(side),
        _ => None,
    })
}

pub fn shape_coder() -> Coder<Shape> {
    Coder::disjunction("Shape", Coder::<i32>::native(), Shape::tag)
        .variant(0, circle_coder())
        .variant(1, square_coder())
        .build()
}

/// Not structurally representable here; stored through the generic codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    pub id: u64,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub homes: Option<Vec<Address>>,
    pub blob: Blob,
}

pub fn address_schema() -> Schema<Address> {
    Schema::record()
        .field("city", Schema::of(), |a: &Address| &a.city)
        .field("zip", Schema::optional(Schema::of()), |a: &Address| &a.zip)
        .build(|f| {
            Ok(Address {
                city: f.next()?,
                zip: f.next()?,
            })
        })
}

/// Record of optional of array of record, plus a fallback leaf.
pub fn person_schema() -> Schema<Person> {
    Schema::record()
        .field("name", Schema::of(), |p: &Person| &p.name)
        .field("age", Schema::of(), |p: &Person| &p.age)
        .field(
            "homes",
            Schema::optional(Schema::array(address_schema())),
            |p: &Person| &p.homes,
        )
        .field("blob", Schema::fallback(Coder::fallback()), |p: &Person| &p.blob)
        .build(|f| {
            Ok(Person {
                name: f.next()?,
                age: f.next()?,
                homes: f.next()?,
                blob: f.next()?,
            })
        })
}

pub fn sample_person() -> Person {
    Person {
        name: "Ada".to_string(),
        age: 36,
        homes: Some(vec![
            Address {
                city: "London".to_string(),
                zip: None,
            },
            Address {
                city: "Paris".to_string(),
                zip: Some(75001),
            },
        ]),
        blob: Blob {
            id: 7,
            labels: vec!["x".to_string()],
        },
    }
}
