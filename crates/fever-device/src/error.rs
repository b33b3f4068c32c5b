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


//! Defines the hierarchy of error types for the device layer.

use crate::id::ResourceKind;
use fever_core::Handle;
use thiserror::Error;

/// An error related to the creation or use of a resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The store for this resource kind has no free slot left.
    #[error("Cannot create {kind}: capacity of {capacity} exhausted.")]
    CapacityExhausted {
        /// The kind of resource that could not be created.
        kind: ResourceKind,
        /// The fixed capacity of that kind's store.
        capacity: usize,
    },
    /// The handle is stale (its resource was destroyed) or was never issued.
    #[error("Invalid or destroyed {kind} handle: {handle:?}")]
    InvalidHandle {
        /// The kind of resource the handle was supposed to refer to.
        kind: ResourceKind,
        /// The offending handle.
        handle: Handle,
    },
    /// The descriptor was rejected before reaching the backend.
    #[error("Invalid {kind} descriptor: {reason}")]
    InvalidDescriptor {
        /// The kind of resource being described.
        kind: ResourceKind,
        /// Why the descriptor was rejected.
        reason: String,
    },
    /// An error originating from the backend implementation.
    #[error("Backend-specific resource error: {0}")]
    Backend(String),
}

impl ResourceError {
    /// Shorthand for [`ResourceError::InvalidHandle`].
    pub fn invalid_handle(kind: ResourceKind, handle: Handle) -> Self {
        ResourceError::InvalidHandle { kind, handle }
    }

    /// Shorthand for [`ResourceError::InvalidDescriptor`].
    pub fn invalid_descriptor(kind: ResourceKind, reason: impl Into<String>) -> Self {
        ResourceError::InvalidDescriptor {
            kind,
            reason: reason.into(),
        }
    }
}

/// A high-level error raised while submitting recorded commands.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A command referenced a resource that could not be resolved.
    #[error("Graphics resource operation failed: {0}")]
    Resource(#[from] ResourceError),
    /// The recorded commands are not correctly structured into passes.
    #[error("Invalid command sequence at command {index}: {reason}")]
    InvalidCommandSequence {
        /// Position of the offending command in the list.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// The backend failed to execute the resolved commands.
    #[error("Command submission failed: {0}")]
    SubmissionFailed(String),
}

/// An error raised while loading or validating a [`RegistryConfig`](crate::RegistryConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read registry configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse registry configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A capacity is outside what a handle store can address.
    #[error("Invalid capacity {capacity} for {kind} store (allowed: 1..={max})")]
    InvalidCapacity {
        /// The resource kind whose capacity is wrong.
        kind: ResourceKind,
        /// The configured value.
        capacity: usize,
        /// The largest accepted value.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn capacity_error_display() {
        let err = ResourceError::CapacityExhausted {
            kind: ResourceKind::Texture,
            capacity: 256,
        };
        assert_eq!(
            err.to_string(),
            "Cannot create texture: capacity of 256 exhausted."
        );
    }

    #[test]
    fn invalid_handle_display_shows_unpacked_handle() {
        let err = ResourceError::invalid_handle(ResourceKind::Buffer, Handle::from_raw(3));
        assert_eq!(
            err.to_string(),
            "Invalid or destroyed buffer handle: Handle { index: 3, generation: 0 }"
        );
    }

    #[test]
    fn render_error_wraps_resource_error() {
        let res_err = ResourceError::invalid_descriptor(ResourceKind::Shader, "empty source");
        let render_err: RenderError = res_err.into();
        assert_eq!(
            render_err.to_string(),
            "Graphics resource operation failed: Invalid shader descriptor: empty source"
        );
        assert!(render_err.source().is_some());
    }
}
