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


//! Strongly-typed resource identifiers built on top of [`Handle`].

use fever_core::Handle;
use std::fmt;

/// The kinds of resources the registry manages, one handle store each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A vertex, index or uniform buffer.
    Buffer,
    /// A compiled shader stage.
    Shader,
    /// A texture image.
    Texture,
    /// A depth/stencil test configuration.
    DepthStencilState,
    /// A compiled render pipeline state object.
    RenderPipeline,
    /// A set of attachments rendered into by one pass.
    RenderPass,
}

impl ResourceKind {
    /// Every kind, in teardown order: dependents before their dependencies.
    pub const TEARDOWN_ORDER: [ResourceKind; 6] = [
        ResourceKind::RenderPass,
        ResourceKind::RenderPipeline,
        ResourceKind::DepthStencilState,
        ResourceKind::Texture,
        ResourceKind::Shader,
        ResourceKind::Buffer,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Buffer => "buffer",
            ResourceKind::Shader => "shader",
            ResourceKind::Texture => "texture",
            ResourceKind::DepthStencilState => "depth-stencil state",
            ResourceKind::RenderPipeline => "render pipeline",
            ResourceKind::RenderPass => "render pass",
        };
        f.write_str(label)
    }
}

/// Common interface of the typed resource ids.
pub trait ResourceId: Copy + Eq + fmt::Debug {
    /// The kind of resource this id refers to.
    const KIND: ResourceKind;

    /// Wraps a handle issued by the store for [`Self::KIND`].
    fn from_handle(handle: Handle) -> Self;

    /// Returns the underlying handle.
    fn handle(self) -> Handle;
}

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Handle);

        impl ResourceId for $name {
            const KIND: ResourceKind = ResourceKind::$kind;

            fn from_handle(handle: Handle) -> Self {
                Self(handle)
            }

            fn handle(self) -> Handle {
                self.0
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0.to_raw()
            }
        }
    };
}

resource_id! {
    /// An opaque handle to a buffer, returned by `ResourceRegistry::create_buffer`.
    BufferId => Buffer
}
resource_id! {
    /// An opaque handle to a shader, returned by `ResourceRegistry::create_shader`.
    ShaderId => Shader
}
resource_id! {
    /// An opaque handle to a texture, returned by `ResourceRegistry::create_texture`.
    TextureId => Texture
}
resource_id! {
    /// An opaque handle to a depth-stencil state.
    DepthStencilStateId => DepthStencilState
}
resource_id! {
    /// An opaque handle to a render pipeline.
    RenderPipelineId => RenderPipeline
}
resource_id! {
    /// An opaque handle to a render pass.
    RenderPassId => RenderPass
}
