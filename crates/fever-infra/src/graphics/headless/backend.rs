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


use super::objects::*;
use super::stats::HeadlessStats;
use fever_device::{
    BackendCommand, BufferDescriptor, DepthStencilStateDescriptor, GraphicsBackend,
    RenderError, RenderPassDescriptor, RenderPipelineDescriptor, ResourceError, ResourceKind,
    ShaderDescriptor, TextureDescriptor,
};
use std::borrow::Cow;

/// Size of one index; indexed draws read 32-bit indices.
const INDEX_SIZE: u64 = 4;

/// A [`GraphicsBackend`] that keeps everything in host memory.
///
/// Buffers hold a real copy of their bytes; textures are only accounted for.
/// An optional memory budget caps the bytes buffers and textures may occupy
/// at once, so budget exhaustion can be exercised without a device.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    memory_budget: Option<u64>,
    stats: HeadlessStats,
}

impl HeadlessBackend {
    /// Creates a backend without a memory budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that refuses to hold more than `bytes` of buffer and
    /// texture memory at once.
    pub fn with_memory_budget(bytes: u64) -> Self {
        Self {
            memory_budget: Some(bytes),
            ..Self::default()
        }
    }

    /// Returns the memory budget, if any.
    pub fn memory_budget(&self) -> Option<u64> {
        self.memory_budget
    }

    /// Returns the counters accumulated so far.
    pub fn stats(&self) -> &HeadlessStats {
        &self.stats
    }

    fn reserve(
        &mut self,
        kind: ResourceKind,
        label: &Option<Cow<'_, str>>,
        bytes: u64,
    ) -> Result<(), ResourceError> {
        let allocated = self.stats.allocated_bytes;
        if let Some(budget) = self.memory_budget {
            if allocated.saturating_add(bytes) > budget {
                return Err(ResourceError::Backend(format!(
                    "{kind} '{}' needs {bytes} bytes but only {} of the {budget}-byte budget are free",
                    label.as_deref().unwrap_or_default(),
                    budget.saturating_sub(allocated)
                )));
            }
        }

        self.stats.allocated_bytes = allocated.checked_add(bytes).ok_or_else(|| {
            ResourceError::Backend(format!(
                "{kind} '{}' of {bytes} bytes overflows the allocation counter",
                label.as_deref().unwrap_or_default()
            ))
        })?;
        self.stats.peak_bytes = self.stats.peak_bytes.max(self.stats.allocated_bytes);
        log::trace!(
            "HeadlessBackend: reserved {bytes} bytes for {kind}, {} bytes in use",
            self.stats.allocated_bytes
        );
        Ok(())
    }

    fn release(&mut self, bytes: u64) {
        self.stats.allocated_bytes = self.stats.allocated_bytes.saturating_sub(bytes);
    }

    fn created(&mut self, kind: ResourceKind) {
        self.stats.counters_mut(kind).created += 1;
    }

    fn destroyed(&mut self, kind: ResourceKind) {
        self.stats.counters_mut(kind).destroyed += 1;
    }
}

fn owned_label(label: &Option<Cow<'_, str>>) -> Option<String> {
    label.as_deref().map(str::to_owned)
}

/// Allocates `size` zeroed bytes, reporting failure instead of aborting.
fn zeroed(label: &Option<Cow<'_, str>>, size: u64) -> Result<Vec<u8>, ResourceError> {
    let failed = |reason: String| {
        ResourceError::Backend(format!(
            "buffer '{}' of {size} bytes: {reason}",
            label.as_deref().unwrap_or_default()
        ))
    };
    let len =
        usize::try_from(size).map_err(|_| failed("size exceeds the address space".to_owned()))?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|err| failed(err.to_string()))?;
    data.resize(len, 0);
    Ok(data)
}

/// Bytes needed by every mip level of a texture, multisampling included.
///
/// Returns `None` if the size does not fit in a `u64`.
fn texture_byte_size(descriptor: &TextureDescriptor<'_>) -> Option<u64> {
    let mut texels: u64 = 0;
    for level in 0..descriptor.mip_level_count {
        let width = u64::from(descriptor.width.checked_shr(level).unwrap_or(0).max(1));
        let height = u64::from(descriptor.height.checked_shr(level).unwrap_or(0).max(1));
        let depth = u64::from(descriptor.depth.checked_shr(level).unwrap_or(0).max(1));
        let level_texels = width.checked_mul(height)?.checked_mul(depth)?;
        texels = texels.checked_add(level_texels)?;
    }
    texels
        .checked_mul(descriptor.format.bytes_per_pixel())?
        .checked_mul(u64::from(descriptor.sample_count))
}

impl GraphicsBackend for HeadlessBackend {
    type Buffer = HeadlessBuffer;
    type Shader = HeadlessShader;
    type Texture = HeadlessTexture;
    type DepthStencilState = HeadlessDepthStencilState;
    type RenderPipeline = HeadlessRenderPipeline;
    type RenderPass = HeadlessRenderPass;

    fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<HeadlessBuffer, ResourceError> {
        self.reserve(ResourceKind::Buffer, &descriptor.label, descriptor.size)?;
        let data = match &descriptor.contents {
            Some(contents) => contents.to_vec(),
            None => zeroed(&descriptor.label, descriptor.size).inspect_err(|_| {
                self.release(descriptor.size);
            })?,
        };
        self.created(ResourceKind::Buffer);
        Ok(HeadlessBuffer {
            label: owned_label(&descriptor.label),
            kind: descriptor.kind,
            data,
        })
    }

    fn destroy_buffer(&mut self, buffer: HeadlessBuffer) {
        self.release(buffer.size());
        self.destroyed(ResourceKind::Buffer);
    }

    fn create_shader(
        &mut self,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<HeadlessShader, ResourceError> {
        if descriptor.source.trim().is_empty() {
            return Err(ResourceError::Backend(format!(
                "shader '{}' has no source code",
                descriptor.label.as_deref().unwrap_or_default()
            )));
        }
        if descriptor.entry_point.trim().is_empty() {
            return Err(ResourceError::Backend(format!(
                "shader '{}' has no entry point",
                descriptor.label.as_deref().unwrap_or_default()
            )));
        }

        self.created(ResourceKind::Shader);
        Ok(HeadlessShader {
            label: owned_label(&descriptor.label),
            stage: descriptor.stage,
            entry_point: descriptor.entry_point.to_string(),
            source_len: descriptor.source.len(),
        })
    }

    fn destroy_shader(&mut self, _shader: HeadlessShader) {
        self.destroyed(ResourceKind::Shader);
    }

    fn create_texture(
        &mut self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<HeadlessTexture, ResourceError> {
        let byte_size = texture_byte_size(descriptor).ok_or_else(|| {
            ResourceError::Backend(format!(
                "texture '{}' of {}x{}x{} texels overflows u64 bytes",
                descriptor.label.as_deref().unwrap_or_default(),
                descriptor.width,
                descriptor.height,
                descriptor.depth
            ))
        })?;
        self.reserve(ResourceKind::Texture, &descriptor.label, byte_size)?;
        self.created(ResourceKind::Texture);
        Ok(HeadlessTexture {
            label: owned_label(&descriptor.label),
            format: descriptor.format,
            usage: descriptor.usage,
            extent: (descriptor.width, descriptor.height, descriptor.depth),
            mip_level_count: descriptor.mip_level_count,
            sample_count: descriptor.sample_count,
            byte_size,
        })
    }

    fn destroy_texture(&mut self, texture: HeadlessTexture) {
        self.release(texture.byte_size);
        self.destroyed(ResourceKind::Texture);
    }

    fn create_depth_stencil_state(
        &mut self,
        descriptor: &DepthStencilStateDescriptor<'_>,
    ) -> Result<HeadlessDepthStencilState, ResourceError> {
        self.created(ResourceKind::DepthStencilState);
        Ok(HeadlessDepthStencilState {
            label: owned_label(&descriptor.label),
            depth_compare: descriptor.depth_compare,
            depth_write_enabled: descriptor.depth_write_enabled,
            stencil: [descriptor.stencil_front, descriptor.stencil_back],
        })
    }

    fn destroy_depth_stencil_state(&mut self, _state: HeadlessDepthStencilState) {
        self.destroyed(ResourceKind::DepthStencilState);
    }

    fn create_render_pipeline(
        &mut self,
        descriptor: &RenderPipelineDescriptor<'_>,
        vertex_shader: &HeadlessShader,
        fragment_shader: Option<&HeadlessShader>,
    ) -> Result<HeadlessRenderPipeline, ResourceError> {
        self.created(ResourceKind::RenderPipeline);
        Ok(HeadlessRenderPipeline {
            label: owned_label(&descriptor.label),
            vertex_entry_point: vertex_shader.entry_point.clone(),
            fragment_entry_point: fragment_shader.map(|shader| shader.entry_point.clone()),
            color_formats: descriptor.color_formats.to_vec(),
            depth_format: descriptor.depth_format,
        })
    }

    fn destroy_render_pipeline(&mut self, _pipeline: HeadlessRenderPipeline) {
        self.destroyed(ResourceKind::RenderPipeline);
    }

    fn create_render_pass(
        &mut self,
        descriptor: &RenderPassDescriptor<'_>,
        color_targets: &[&HeadlessTexture],
        depth_target: Option<&HeadlessTexture>,
    ) -> Result<HeadlessRenderPass, ResourceError> {
        self.created(ResourceKind::RenderPass);
        Ok(HeadlessRenderPass {
            label: owned_label(&descriptor.label),
            color_targets: color_targets
                .iter()
                .map(|texture| texture.label.clone())
                .collect(),
            depth_target: depth_target.map(|texture| texture.label.clone()),
            clear_colors: descriptor
                .color_attachments
                .iter()
                .map(|attachment| attachment.clear_color)
                .collect(),
            clear_depth_stencil: descriptor
                .depth_attachment
                .as_ref()
                .map(|depth| (depth.clear_depth, depth.clear_stencil)),
        })
    }

    fn destroy_render_pass(&mut self, _pass: HeadlessRenderPass) {
        self.destroyed(ResourceKind::RenderPass);
    }

    fn submit(&mut self, commands: &[BackendCommand<'_, Self>]) -> Result<(), RenderError> {
        let mut passes = 0;
        let mut draws = 0;

        for command in commands {
            match command {
                BackendCommand::BeginRenderPass(pass) => {
                    log::trace!(
                        "HeadlessBackend: executing pass '{}'",
                        pass.label.as_deref().unwrap_or_default()
                    );
                    passes += 1;
                }
                BackendCommand::Draw { .. } => draws += 1,
                BackendCommand::DrawIndexed {
                    index_buffer,
                    indices,
                    ..
                } => {
                    let needed = u64::from(indices.end) * INDEX_SIZE;
                    if needed > index_buffer.size() {
                        return Err(RenderError::SubmissionFailed(format!(
                            "indices {indices:?} read {needed} bytes from a {}-byte index buffer",
                            index_buffer.size()
                        )));
                    }
                    draws += 1;
                }
                _ => {}
            }
        }

        self.stats.submissions += 1;
        self.stats.passes_executed += passes;
        self.stats.draw_calls += draws;
        Ok(())
    }
}
