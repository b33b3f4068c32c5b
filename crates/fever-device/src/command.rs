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


//! Recorded rendering commands, by id and resolved.

use crate::backend::GraphicsBackend;
use crate::id::{BufferId, DepthStencilStateId, RenderPassId, RenderPipelineId, TextureId};
use std::ops::Range;

/// A rendering command recorded against resource ids.
///
/// A command list is a sequence of passes: every binding and draw sits between
/// a [`Command::BeginRenderPass`] and its [`Command::EndRenderPass`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Starts rendering into the attachments of a render pass.
    BeginRenderPass(RenderPassId),
    /// Binds the pipeline used by subsequent draws.
    SetRenderPipeline(RenderPipelineId),
    /// Binds the depth-stencil state used by subsequent draws.
    SetDepthStencilState(DepthStencilStateId),
    /// Binds a vertex buffer to a slot.
    SetVertexBuffer {
        /// The vertex buffer slot.
        slot: u32,
        /// The buffer to bind. Must be a vertex buffer.
        buffer: BufferId,
        /// Byte offset into the buffer.
        offset: u64,
    },
    /// Binds a texture for the fragment stage.
    SetFragmentTexture {
        /// The texture binding index.
        index: u32,
        /// The texture to bind. Must be readable by shaders.
        texture: TextureId,
    },
    /// Draws non-indexed primitives.
    Draw {
        /// The range of vertices to draw.
        vertices: Range<u32>,
        /// The range of instances to draw.
        instances: Range<u32>,
    },
    /// Draws indexed primitives.
    DrawIndexed {
        /// The index buffer. Must be an index buffer.
        index_buffer: BufferId,
        /// The range of indices to draw.
        indices: Range<u32>,
        /// The range of instances to draw.
        instances: Range<u32>,
    },
    /// Ends the current render pass.
    EndRenderPass,
}

impl Command {
    /// Returns `true` for commands that are only legal inside a pass.
    pub fn requires_pass(&self) -> bool {
        !matches!(self, Command::BeginRenderPass(_) | Command::EndRenderPass)
    }
}

/// A [`Command`] whose ids have been resolved to backend objects.
pub enum BackendCommand<'a, B: GraphicsBackend> {
    /// See [`Command::BeginRenderPass`].
    BeginRenderPass(&'a B::RenderPass),
    /// See [`Command::SetRenderPipeline`].
    SetRenderPipeline(&'a B::RenderPipeline),
    /// See [`Command::SetDepthStencilState`].
    SetDepthStencilState(&'a B::DepthStencilState),
    /// See [`Command::SetVertexBuffer`].
    SetVertexBuffer {
        /// The vertex buffer slot.
        slot: u32,
        /// The bound buffer.
        buffer: &'a B::Buffer,
        /// Byte offset into the buffer.
        offset: u64,
    },
    /// See [`Command::SetFragmentTexture`].
    SetFragmentTexture {
        /// The texture binding index.
        index: u32,
        /// The bound texture.
        texture: &'a B::Texture,
    },
    /// See [`Command::Draw`].
    Draw {
        /// The range of vertices to draw.
        vertices: Range<u32>,
        /// The range of instances to draw.
        instances: Range<u32>,
    },
    /// See [`Command::DrawIndexed`].
    DrawIndexed {
        /// The index buffer.
        index_buffer: &'a B::Buffer,
        /// The range of indices to draw.
        indices: Range<u32>,
        /// The range of instances to draw.
        instances: Range<u32>,
    },
    /// See [`Command::EndRenderPass`].
    EndRenderPass,
}
