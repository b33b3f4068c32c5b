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


use fever_device::ResourceKind;

/// Creation and destruction counts for one resource kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounters {
    /// Objects created so far.
    pub created: u64,
    /// Objects destroyed so far.
    pub destroyed: u64,
}

impl KindCounters {
    /// Returns the number of objects currently alive.
    pub fn alive(&self) -> u64 {
        self.created - self.destroyed
    }
}

/// Everything a [`HeadlessBackend`](super::HeadlessBackend) has done so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    /// Buffer counters.
    pub buffers: KindCounters,
    /// Shader counters.
    pub shaders: KindCounters,
    /// Texture counters.
    pub textures: KindCounters,
    /// Depth-stencil state counters.
    pub depth_stencil_states: KindCounters,
    /// Render pipeline counters.
    pub render_pipelines: KindCounters,
    /// Render pass counters.
    pub render_passes: KindCounters,
    /// Command lists submitted.
    pub submissions: u64,
    /// Render passes executed across all submissions.
    pub passes_executed: u64,
    /// Draw calls executed across all submissions.
    pub draw_calls: u64,
    /// Bytes currently allocated by buffers and textures.
    pub allocated_bytes: u64,
    /// Highest value `allocated_bytes` has reached.
    pub peak_bytes: u64,
}

impl HeadlessStats {
    /// Returns the counters for `kind`.
    pub fn counters(&self, kind: ResourceKind) -> KindCounters {
        match kind {
            ResourceKind::Buffer => self.buffers,
            ResourceKind::Shader => self.shaders,
            ResourceKind::Texture => self.textures,
            ResourceKind::DepthStencilState => self.depth_stencil_states,
            ResourceKind::RenderPipeline => self.render_pipelines,
            ResourceKind::RenderPass => self.render_passes,
        }
    }

    pub(super) fn counters_mut(&mut self, kind: ResourceKind) -> &mut KindCounters {
        match kind {
            ResourceKind::Buffer => &mut self.buffers,
            ResourceKind::Shader => &mut self.shaders,
            ResourceKind::Texture => &mut self.textures,
            ResourceKind::DepthStencilState => &mut self.depth_stencil_states,
            ResourceKind::RenderPipeline => &mut self.render_pipelines,
            ResourceKind::RenderPass => &mut self.render_passes,
        }
    }

    /// Returns the number of backend objects alive across all kinds.
    pub fn total_alive(&self) -> u64 {
        ResourceKind::TEARDOWN_ORDER
            .iter()
            .map(|kind| self.counters(*kind).alive())
            .sum()
    }
}
