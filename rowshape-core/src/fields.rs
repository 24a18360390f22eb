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

use std::any::Any;

use crate::error::Error;

/// Ordered field values handed to a record's `construct` function.
///
/// Values come out in declaration order. Asking for the wrong type, or
/// leaving values unconsumed, is an `InvalidData` error: the record's field
/// list and its constructor disagree.
///
/// ```rust,ignore
/// Coder::record("Point")
///     .field("x", Coder::native(), |p: &Point| &p.x)
///     .field("y", Coder::native(), |p: &Point| &p.y)
///     .build(|f| Ok(Point { x: f.next()?, y: f.next()? }))
/// ```
pub struct Fields<'a> {
    record: &'a str,
    values: std::vec::IntoIter<Box<dyn Any>>,
    index: usize,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(record: &'a str, values: Vec<Box<dyn Any>>) -> Fields<'a> {
        Fields {
            record,
            values: values.into_iter(),
            index: 0,
        }
    }

    /// Takes the next value, which must be an `F`.
    pub fn next<F: 'static>(&mut self) -> Result<F, Error> {
        let idx = self.index;
        let value = self.values.next().ok_or_else(|| {
            Error::invalid_data(format!(
                "record `{}` has no field at position {}",
                self.record, idx
            ))
        })?;
        self.index += 1;
        value.downcast::<F>().map(|v| *v).map_err(|_| {
            Error::invalid_data(format!(
                "field {} of record `{}` is not a `{}`",
                idx,
                self.record,
                std::any::type_name::<F>()
            ))
        })
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Fails if `construct` left values behind.
    pub(crate) fn finish(self) -> Result<(), Error> {
        if self.values.len() != 0 {
            return Err(Error::invalid_data(format!(
                "record `{}` constructor consumed {} of {} fields",
                self.record,
                self.index,
                self.index + self.values.len()
            )));
        }
        Ok(())
    }
}
