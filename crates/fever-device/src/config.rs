// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Sizing of the registry's fixed-capacity stores.

use crate::error::ConfigError;
use crate::id::ResourceKind;
use fever_core::Handle;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capacities of the per-kind resource stores, usually read from a
/// `registry.toml` manifest. Keys missing from the manifest take their default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Maximum number of live buffers.
    pub buffers: usize,
    /// Maximum number of live shaders.
    pub shaders: usize,
    /// Maximum number of live textures.
    pub textures: usize,
    /// Maximum number of live depth-stencil states.
    pub depth_stencil_states: usize,
    /// Maximum number of live render pipelines.
    pub render_pipelines: usize,
    /// Maximum number of live render passes.
    pub render_passes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            buffers: 1024,
            shaders: 128,
            textures: 256,
            depth_stencil_states: 64,
            render_pipelines: 128,
            render_passes: 64,
        }
    }
}

impl RegistryConfig {
    /// The largest capacity a single store can be given.
    pub const MAX_CAPACITY: usize = Handle::MAX_INDEX as usize + 1;

    /// Returns the configured capacity for `kind`.
    pub fn capacity(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Buffer => self.buffers,
            ResourceKind::Shader => self.shaders,
            ResourceKind::Texture => self.textures,
            ResourceKind::DepthStencilState => self.depth_stencil_states,
            ResourceKind::RenderPipeline => self.render_pipelines,
            ResourceKind::RenderPass => self.render_passes,
        }
    }

    /// Parses a TOML manifest and validates it.
    pub fn from_toml_str(manifest: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(manifest)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the manifest at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let manifest = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&manifest)?;
        log::info!("Loaded registry configuration from {}", path.display());
        Ok(config)
    }

    /// Checks that every capacity is addressable by a [`Handle`] and non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in ResourceKind::TEARDOWN_ORDER {
            let capacity = self.capacity(kind);
            if capacity == 0 || capacity > Self::MAX_CAPACITY {
                return Err(ConfigError::InvalidCapacity {
                    kind,
                    capacity,
                    max: Self::MAX_CAPACITY,
                });
            }
        }
        Ok(())
    }
}
