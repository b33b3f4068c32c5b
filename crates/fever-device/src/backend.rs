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


//! Defines the contract between the resource registry and a graphics backend.

use crate::command::BackendCommand;
use crate::descriptor::*;
use crate::error::{RenderError, ResourceError};
use std::fmt::Debug;

/// A graphics backend that builds and destroys the actual resource objects.
///
/// The backend never sees a handle. The [`ResourceRegistry`](crate::ResourceRegistry)
/// owns every object the backend returns, hands them back for destruction
/// exactly once, and resolves recorded ids into references before submission.
pub trait GraphicsBackend: Debug {
    /// The backend's buffer object.
    type Buffer: Debug;
    /// The backend's shader object.
    type Shader: Debug;
    /// The backend's texture object.
    type Texture: Debug;
    /// The backend's depth-stencil state object.
    type DepthStencilState: Debug;
    /// The backend's render pipeline object.
    type RenderPipeline: Debug;
    /// The backend's render pass object.
    type RenderPass: Debug;

    /// Creates a new buffer, initialised with the descriptor's contents if any.
    /// ## Arguments
    /// * `descriptor` - A validated `BufferDescriptor`.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot allocate the buffer.
    fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<Self::Buffer, ResourceError>;

    /// Releases a buffer. Called exactly once per created buffer.
    fn destroy_buffer(&mut self, buffer: Self::Buffer);

    /// Compiles a shader.
    /// ## Errors
    /// * `ResourceError` - If compilation fails.
    fn create_shader(
        &mut self,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<Self::Shader, ResourceError>;

    /// Releases a shader.
    fn destroy_shader(&mut self, shader: Self::Shader);

    /// Creates a new texture.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot allocate the texture.
    fn create_texture(
        &mut self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<Self::Texture, ResourceError>;

    /// Releases a texture.
    fn destroy_texture(&mut self, texture: Self::Texture);

    /// Creates a depth-stencil state.
    fn create_depth_stencil_state(
        &mut self,
        descriptor: &DepthStencilStateDescriptor<'_>,
    ) -> Result<Self::DepthStencilState, ResourceError>;

    /// Releases a depth-stencil state.
    fn destroy_depth_stencil_state(&mut self, state: Self::DepthStencilState);

    /// Creates a render pipeline from already resolved shaders.
    /// ## Arguments
    /// * `descriptor` - The pipeline configuration.
    /// * `vertex_shader` - The object behind `descriptor.vertex_shader`.
    /// * `fragment_shader` - The object behind `descriptor.fragment_shader`, if any.
    fn create_render_pipeline(
        &mut self,
        descriptor: &RenderPipelineDescriptor<'_>,
        vertex_shader: &Self::Shader,
        fragment_shader: Option<&Self::Shader>,
    ) -> Result<Self::RenderPipeline, ResourceError>;

    /// Releases a render pipeline.
    fn destroy_render_pipeline(&mut self, pipeline: Self::RenderPipeline);

    /// Creates a render pass from already resolved attachments.
    /// ## Arguments
    /// * `descriptor` - The pass configuration.
    /// * `color_targets` - The textures behind `descriptor.color_attachments`, in order.
    /// * `depth_target` - The texture behind `descriptor.depth_attachment`, if any.
    fn create_render_pass(
        &mut self,
        descriptor: &RenderPassDescriptor<'_>,
        color_targets: &[&Self::Texture],
        depth_target: Option<&Self::Texture>,
    ) -> Result<Self::RenderPass, ResourceError>;

    /// Releases a render pass.
    fn destroy_render_pass(&mut self, pass: Self::RenderPass);

    /// Executes a fully resolved, structurally valid command list.
    /// ## Errors
    /// * `RenderError::SubmissionFailed` - If the backend cannot execute the list.
    fn submit(&mut self, commands: &[BackendCommand<'_, Self>]) -> Result<(), RenderError>
    where
        Self: Sized;
}
