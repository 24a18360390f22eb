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

use crate::config::Config;
use crate::error::Error;
use crate::resolver::registry::Registry;

/// Read-only view of the (registry, config) pair plus the current nesting
/// depth. Materializers never mutate the registry or the config.
pub struct MaterializeContext<'a> {
    registry: &'a Registry,
    config: &'a Config,
    current_depth: u32,
}

impl<'a> MaterializeContext<'a> {
    pub fn new(registry: &'a Registry, config: &'a Config) -> MaterializeContext<'a> {
        MaterializeContext {
            registry,
            config,
            current_depth: 0,
        }
    }

    #[inline(always)]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[inline(always)]
    pub fn config(&self) -> &'a Config {
        self.config
    }

    #[inline(always)]
    pub fn depth(&self) -> u32 {
        self.current_depth
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.config.get_max_depth() {
            return Err(Error::depth_exceed(format!(
                "Maximum nesting depth ({}) exceeded while materializing. \
                Self-referential types are not supported; \
                raise Config::max_depth if the nesting is legitimate.",
                self.config.get_max_depth()
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
