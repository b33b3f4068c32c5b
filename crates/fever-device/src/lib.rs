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


//! The resource-management contract of Fever.
//!
//! This crate turns the generational stores of `fever-core` into a typed
//! resource API: callers describe a resource, get back a [`BufferId`],
//! [`TextureId`] or similar, record [`Command`]s against those ids, and let
//! the [`ResourceRegistry`] resolve everything before a [`GraphicsBackend`]
//! sees it. Backends implement the trait; they live in `fever-infra`.

#![warn(missing_docs)]

pub mod backend;
pub mod command;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod id;
pub mod registry;

pub use self::backend::GraphicsBackend;
pub use self::command::{BackendCommand, Command};
pub use self::config::RegistryConfig;
pub use self::descriptor::*;
pub use self::error::{ConfigError, RenderError, ResourceError};
pub use self::id::*;
pub use self::registry::{RegistryUsage, ResourceRegistry, StoreUsage};
