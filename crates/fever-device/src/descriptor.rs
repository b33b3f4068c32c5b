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


//! Plain-data descriptors for every resource the registry can create.
//!
//! Descriptors carry only what a backend needs to build an object. The checks
//! that need nothing but the descriptor itself live here in `validate`; checks
//! that involve other live resources happen in the registry.

use crate::error::ResourceError;
use crate::id::{ResourceKind, ShaderId, TextureId};
use std::borrow::Cow;

/// Maximum number of color targets a pipeline or render pass may use.
pub const MAX_COLOR_ATTACHMENTS: usize = 8;

/// The role a buffer plays when bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data.
    Vertex,
    /// Indices into the bound vertex buffers.
    Index,
    /// Constant data read by shaders.
    Uniform,
}

/// The programmable stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment shader stage.
    Fragment,
    /// The compute shader stage.
    Compute,
}

/// Defines the memory format of pixels in a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    /// Four 8-bit unsigned normalized components (BGRA). The usual swapchain format.
    Bgra8Unorm,
    /// Four 16-bit float components.
    Rgba16Float,
    /// A 32-bit float depth format with an 8-bit stencil component.
    Depth32FloatStencil8,
}

impl PixelFormat {
    /// Returns the size in bytes of a single pixel for this format.
    pub fn bytes_per_pixel(&self) -> u64 {
        match self {
            PixelFormat::Rgba8Unorm | PixelFormat::Bgra8Unorm => 4,
            PixelFormat::Rgba16Float => 8,
            PixelFormat::Depth32FloatStencil8 => 5,
        }
    }

    /// Returns `true` for depth/stencil formats.
    pub fn is_depth(&self) -> bool {
        matches!(self, PixelFormat::Depth32FloatStencil8)
    }
}

/// A set of flags describing how a texture will be used. Can be OR'd together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureUsage {
    bits: u32,
}

impl TextureUsage {
    /// No usage.
    pub const NONE: Self = Self { bits: 0 };
    /// The texture can be rendered into as a color or depth attachment.
    pub const RENDER_TARGET: Self = Self { bits: 1 << 0 };
    /// The texture can be sampled by shaders.
    pub const SHADER_READ: Self = Self { bits: 1 << 1 };
    /// The texture can be written by shaders.
    pub const SHADER_WRITE: Self = Self { bits: 1 << 2 };

    /// Returns the raw bits.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Combines two sets of flags.
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Checks if every flag of `other` is set in `self`.
    pub const fn contains(&self, other: Self) -> bool {
        (self.bits & other.bits) == other.bits
    }

    /// Checks if no flag is set.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl std::ops::BitOr for TextureUsage {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// A comparison function used for depth testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    /// The test never passes.
    Never,
    /// Passes if the new value is less than the existing value.
    Less,
    /// Passes if the new value is equal to the existing value.
    Equal,
    /// Passes if the new value is less than or equal to the existing value.
    LessEqual,
    /// Passes if the new value is not equal to the existing value.
    NotEqual,
    /// Passes if the new value is greater than the existing value.
    Greater,
    /// Passes if the new value is greater than or equal to the existing value.
    GreaterEqual,
    /// The test always passes.
    Always,
}

/// What the stencil test does to the stored stencil value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOperation {
    /// Keeps the current value.
    #[default]
    Keep,
    /// Sets the value to zero.
    Zero,
    /// Sets the value to the reference value.
    Replace,
    /// Increments the value, clamping at the maximum.
    IncrementClamp,
    /// Decrements the value, clamping at zero.
    DecrementClamp,
    /// Inverts the bits of the value.
    Invert,
    /// Increments the value, wrapping to zero.
    IncrementWrap,
    /// Decrements the value, wrapping to the maximum.
    DecrementWrap,
}

/// Stencil test configuration for one primitive facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFaceState {
    /// Comparison between the masked reference and the stored value.
    pub compare: CompareFunction,
    /// Applied when the stencil test fails.
    pub fail_op: StencilOperation,
    /// Applied when the stencil test passes but the depth test fails.
    pub depth_fail_op: StencilOperation,
    /// Applied when both tests pass.
    pub pass_op: StencilOperation,
    /// Bits the comparison reads.
    pub read_mask: u32,
    /// Bits the operations may write.
    pub write_mask: u32,
}

impl Default for StencilFaceState {
    /// A stencil test that always passes and never writes.
    fn default() -> Self {
        Self {
            compare: CompareFunction::Always,
            fail_op: StencilOperation::Keep,
            depth_fail_op: StencilOperation::Keep,
            pass_op: StencilOperation::Keep,
            read_mask: u32::MAX,
            write_mask: u32::MAX,
        }
    }
}

impl StencilFaceState {
    /// Returns `true` if this face never modifies the stencil attachment.
    pub fn is_read_only(&self) -> bool {
        self.write_mask == 0
            || [self.fail_op, self.depth_fail_op, self.pass_op]
                .iter()
                .all(|op| *op == StencilOperation::Keep)
    }
}

/// What happens to an attachment's contents at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOp {
    /// Contents are undefined.
    DontCare,
    /// Existing contents are preserved.
    Load,
    /// Contents are cleared to the attachment's clear value.
    Clear,
}

/// What happens to an attachment's contents at the end of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// Contents are left undefined.
    DontCare,
    /// Results are written back to the texture.
    Store,
}

/// A descriptor used to create a [`BufferId`](crate::BufferId).
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// How the buffer will be bound.
    pub kind: BufferKind,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// Initial contents. When present, its length must equal `size`.
    pub contents: Option<Cow<'a, [u8]>>,
}

impl<'a> BufferDescriptor<'a> {
    /// Describes a buffer initialised with `contents`, sized to fit them.
    pub fn with_contents(label: &'a str, kind: BufferKind, contents: &'a [u8]) -> Self {
        Self {
            label: Some(Cow::Borrowed(label)),
            kind,
            size: contents.len() as u64,
            contents: Some(Cow::Borrowed(contents)),
        }
    }

    /// Checks the descriptor on its own.
    pub fn validate(&self) -> Result<(), ResourceError> {
        if self.size == 0 {
            return Err(ResourceError::invalid_descriptor(
                ResourceKind::Buffer,
                "size must be greater than zero",
            ));
        }
        if let Some(contents) = &self.contents {
            if contents.len() as u64 != self.size {
                return Err(ResourceError::invalid_descriptor(
                    ResourceKind::Buffer,
                    format!(
                        "initial contents are {} bytes but the buffer is {} bytes",
                        contents.len(),
                        self.size
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// A descriptor used to create a [`ShaderId`].
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The stage this shader runs in.
    pub stage: ShaderStage,
    /// The name of the entry point function.
    pub entry_point: Cow<'a, str>,
    /// The shader source code.
    pub source: Cow<'a, str>,
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The format of the texels.
    pub format: PixelFormat,
    /// How the texture will be used.
    pub usage: TextureUsage,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth in texels (1 for 2D textures).
    pub depth: u32,
    /// The number of mipmap levels.
    pub mip_level_count: u32,
    /// The number of samples per pixel.
    pub sample_count: u32,
}

impl<'a> TextureDescriptor<'a> {
    /// Describes a single-sampled 2D texture without mipmaps.
    pub fn new_2d(
        label: &'a str,
        format: PixelFormat,
        usage: TextureUsage,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            label: Some(Cow::Borrowed(label)),
            format,
            usage,
            width,
            height,
            depth: 1,
            mip_level_count: 1,
            sample_count: 1,
        }
    }

    /// Returns the number of mip levels a full chain would have for this extent.
    pub fn max_mip_levels(&self) -> u32 {
        let largest = self.width.max(self.height).max(self.depth).max(1);
        u32::BITS - largest.leading_zeros()
    }

    /// Checks the descriptor on its own.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let invalid = |reason: String| ResourceError::invalid_descriptor(ResourceKind::Texture, reason);

        if self.width == 0 || self.height == 0 || self.depth == 0 {
            return Err(invalid(format!(
                "extent {}x{}x{} has a zero dimension",
                self.width, self.height, self.depth
            )));
        }
        if self.mip_level_count == 0 || self.mip_level_count > self.max_mip_levels() {
            return Err(invalid(format!(
                "mip level count {} is outside 1..={}",
                self.mip_level_count,
                self.max_mip_levels()
            )));
        }
        if !matches!(self.sample_count, 1 | 2 | 4 | 8) {
            return Err(invalid(format!(
                "sample count {} is not one of 1, 2, 4 or 8",
                self.sample_count
            )));
        }
        if self.usage.is_empty() {
            return Err(invalid("usage must not be empty".to_owned()));
        }
        Ok(())
    }
}

/// A descriptor used to create a [`DepthStencilStateId`](crate::DepthStencilStateId).
#[derive(Debug, Clone)]
pub struct DepthStencilStateDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The comparison used for the depth test.
    pub depth_compare: CompareFunction,
    /// Whether passing fragments write their depth.
    pub depth_write_enabled: bool,
    /// Stencil test for front-facing primitives.
    pub stencil_front: StencilFaceState,
    /// Stencil test for back-facing primitives.
    pub stencil_back: StencilFaceState,
}

/// A descriptor used to create a [`RenderPipelineId`](crate::RenderPipelineId).
#[derive(Debug, Clone)]
pub struct RenderPipelineDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The vertex stage. Must refer to a live vertex shader.
    pub vertex_shader: ShaderId,
    /// The fragment stage, if any. Must refer to a live fragment shader.
    pub fragment_shader: Option<ShaderId>,
    /// Formats of the color targets the pipeline renders into.
    pub color_formats: Cow<'a, [PixelFormat]>,
    /// Format of the depth target, if any.
    pub depth_format: Option<PixelFormat>,
}

impl RenderPipelineDescriptor<'_> {
    /// Checks the descriptor on its own.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let invalid = |reason: String| {
            ResourceError::invalid_descriptor(ResourceKind::RenderPipeline, reason)
        };

        if self.color_formats.is_empty() && self.depth_format.is_none() {
            return Err(invalid("pipeline has no color or depth target".to_owned()));
        }
        if self.color_formats.len() > MAX_COLOR_ATTACHMENTS {
            return Err(invalid(format!(
                "{} color targets exceed the maximum of {MAX_COLOR_ATTACHMENTS}",
                self.color_formats.len()
            )));
        }
        if let Some(format) = self.color_formats.iter().find(|f| f.is_depth()) {
            return Err(invalid(format!("{format:?} cannot be a color target")));
        }
        if let Some(format) = self.depth_format.filter(|f| !f.is_depth()) {
            return Err(invalid(format!("{format:?} cannot be a depth target")));
        }
        Ok(())
    }
}

/// A color target of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachment {
    /// The texture rendered into.
    pub texture: TextureId,
    /// What to do with the existing contents.
    pub load_op: LoadOp,
    /// What to do with the results.
    pub store_op: StoreOp,
    /// RGBA value used when `load_op` is [`LoadOp::Clear`].
    pub clear_color: [f32; 4],
}

/// The depth target of a render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthAttachment {
    /// The depth texture.
    pub texture: TextureId,
    /// What to do with the existing contents.
    pub load_op: LoadOp,
    /// What to do with the results.
    pub store_op: StoreOp,
    /// Depth value used when `load_op` is [`LoadOp::Clear`].
    pub clear_depth: f32,
    /// Stencil value used when `load_op` is [`LoadOp::Clear`].
    pub clear_stencil: u32,
}

/// A descriptor used to create a [`RenderPassId`](crate::RenderPassId).
#[derive(Debug, Clone)]
pub struct RenderPassDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The color targets, in binding order.
    pub color_attachments: Vec<ColorAttachment>,
    /// The depth target, if any.
    pub depth_attachment: Option<DepthAttachment>,
}

impl RenderPassDescriptor<'_> {
    /// Checks the descriptor on its own.
    pub fn validate(&self) -> Result<(), ResourceError> {
        let invalid =
            |reason: String| ResourceError::invalid_descriptor(ResourceKind::RenderPass, reason);

        if self.color_attachments.is_empty() {
            return Err(invalid("at least one color attachment is required".to_owned()));
        }
        if self.color_attachments.len() > MAX_COLOR_ATTACHMENTS {
            return Err(invalid(format!(
                "{} color attachments exceed the maximum of {MAX_COLOR_ATTACHMENTS}",
                self.color_attachments.len()
            )));
        }
        for (index, attachment) in self.color_attachments.iter().enumerate() {
            if attachment.clear_color.iter().any(|c| !c.is_finite()) {
                return Err(invalid(format!(
                    "clear color of attachment {index} is not finite"
                )));
            }
        }
        if let Some(depth) = &self.depth_attachment {
            if !(0.0..=1.0).contains(&depth.clear_depth) {
                return Err(invalid(format!(
                    "clear depth {} is outside [0, 1]",
                    depth.clear_depth
                )));
            }
        }
        Ok(())
    }
}
