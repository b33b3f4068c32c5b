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


//! The objects the headless backend hands to the registry.

use fever_device::{
    BufferKind, CompareFunction, PixelFormat, ShaderStage, StencilFaceState, TextureUsage,
};

/// A buffer living in host memory.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessBuffer {
    /// The debug label given at creation.
    pub label: Option<String>,
    /// How the buffer is bound.
    pub kind: BufferKind,
    /// A copy of the buffer's contents; zeroed when created without data.
    pub data: Vec<u8>,
}

impl HeadlessBuffer {
    /// Returns the size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A shader that was "compiled" by checking it is not empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessShader {
    /// The debug label given at creation.
    pub label: Option<String>,
    /// The stage the shader was created for.
    pub stage: ShaderStage,
    /// The entry point name.
    pub entry_point: String,
    /// Length of the source code in bytes.
    pub source_len: usize,
}

/// A texture whose storage is only accounted for, never allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessTexture {
    /// The debug label given at creation.
    pub label: Option<String>,
    /// The texel format.
    pub format: PixelFormat,
    /// The usages the texture was created with.
    pub usage: TextureUsage,
    /// Width, height and depth in texels.
    pub extent: (u32, u32, u32),
    /// Number of mip levels.
    pub mip_level_count: u32,
    /// Samples per texel.
    pub sample_count: u32,
    /// Bytes a device would need for the full mip chain.
    pub byte_size: u64,
}

/// A recorded depth-stencil configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessDepthStencilState {
    /// The debug label given at creation.
    pub label: Option<String>,
    /// The depth comparison.
    pub depth_compare: CompareFunction,
    /// Whether depth writes are enabled.
    pub depth_write_enabled: bool,
    /// Stencil test for front and back faces, in that order.
    pub stencil: [StencilFaceState; 2],
}

/// A recorded pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessRenderPipeline {
    /// The debug label given at creation.
    pub label: Option<String>,
    /// Entry point of the vertex shader it was built from.
    pub vertex_entry_point: String,
    /// Entry point of the fragment shader, if any.
    pub fragment_entry_point: Option<String>,
    /// Formats of the color targets.
    pub color_formats: Vec<PixelFormat>,
    /// Format of the depth target, if any.
    pub depth_format: Option<PixelFormat>,
}

/// A recorded render pass configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessRenderPass {
    /// The debug label given at creation.
    pub label: Option<String>,
    /// Labels of the color targets, in binding order.
    pub color_targets: Vec<Option<String>>,
    /// Label of the depth target, if there is one.
    pub depth_target: Option<Option<String>>,
    /// Clear colors of the color attachments.
    pub clear_colors: Vec<[f32; 4]>,
    /// Depth and stencil clear values of the depth target, if there is one.
    pub clear_depth_stencil: Option<(f32, u32)>,
}
