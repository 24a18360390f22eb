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

/// Integer encoding used by the generic fallback codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntEncoding {
    #[default]
    Varint,
    Fixed,
}

/// Serializer options handed to the generic fallback codec.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FallbackConfig {
    pub int_encoding: IntEncoding,
    /// Upper bound on the bytes a single fallback value may occupy.
    pub size_limit: Option<u64>,
}

/// Options read by the materializers.
///
/// A `Config` is consumed read-only; materialization never mutates it, so one
/// instance may be shared by any number of threads. Two configs that differ
/// (for example in `nullable_coders`) may legitimately materialize the same
/// algebra to different codecs, so caches must key on the config as well as
/// on the type.
///
/// ```rust
/// use rowshape_core::config::Config;
///
/// let config = Config::default().nullable_coders(true).max_depth(16);
/// assert!(config.is_nullable_coders());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    /// Wrap every native codec in a null-tolerant decorator.
    pub nullable_coders: bool,
    /// Maximum nesting depth of a coder or schema tree.
    pub max_depth: u32,
    pub fallback: FallbackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            nullable_coders: false,
            max_depth: 64,
            fallback: FallbackConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nullable_coders(mut self, nullable_coders: bool) -> Self {
        self.nullable_coders = nullable_coders;
        self
    }

    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn fallback_int_encoding(mut self, int_encoding: IntEncoding) -> Self {
        self.fallback.int_encoding = int_encoding;
        self
    }

    pub fn fallback_size_limit(mut self, size_limit: Option<u64>) -> Self {
        self.fallback.size_limit = size_limit;
        self
    }

    #[inline(always)]
    pub fn is_nullable_coders(&self) -> bool {
        self.nullable_coders
    }

    #[inline(always)]
    pub fn get_max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline(always)]
    pub fn get_fallback(&self) -> &FallbackConfig {
        &self.fallback
    }
}
