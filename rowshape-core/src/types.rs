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

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::Error;

/// Presence marker written by nullable codecs and option codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i8)]
pub enum NullFlag {
    Null = 0,
    NotNull = 1,
}

impl NullFlag {
    #[inline(always)]
    pub fn from_byte(b: i8) -> Result<NullFlag, Error> {
        NullFlag::try_from(b).map_err(|_| Error::invalid_data(format!("Unknown null flag: {}", b)))
    }
}

/// Tag of every field type a row can carry.
///
/// The discriminants are stable; [`crate::row::RowSchema::fingerprint`]
/// hashes them, so they must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[allow(non_camel_case_types)]
#[repr(u8)]
pub enum TypeName {
    BYTE = 1,
    INT16 = 2,
    INT32 = 3,
    INT64 = 4,
    FLOAT = 5,
    DOUBLE = 6,
    DECIMAL = 7,
    BOOLEAN = 8,
    STRING = 9,
    DATETIME = 10,
    BYTES = 11,
    ARRAY = 12,
    MAP = 13,
    ROW = 14,
}

impl TypeName {
    pub fn is_primitive(self) -> bool {
        !self.is_composite()
    }

    pub fn is_composite(self) -> bool {
        matches!(self, TypeName::ARRAY | TypeName::MAP | TypeName::ROW)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::BYTE => "BYTE",
            TypeName::INT16 => "INT16",
            TypeName::INT32 => "INT32",
            TypeName::INT64 => "INT64",
            TypeName::FLOAT => "FLOAT",
            TypeName::DOUBLE => "DOUBLE",
            TypeName::DECIMAL => "DECIMAL",
            TypeName::BOOLEAN => "BOOLEAN",
            TypeName::STRING => "STRING",
            TypeName::DATETIME => "DATETIME",
            TypeName::BYTES => "BYTES",
            TypeName::ARRAY => "ARRAY",
            TypeName::MAP => "MAP",
            TypeName::ROW => "ROW",
        }
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
