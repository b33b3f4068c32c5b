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


//! The handle-backed owner of every backend resource.

use crate::backend::GraphicsBackend;
use crate::command::{BackendCommand, Command};
use crate::config::RegistryConfig;
use crate::descriptor::*;
use crate::error::{ConfigError, RenderError, ResourceError};
use crate::id::*;
use fever_core::{Handle, PersistentHandleDataStore};
use std::borrow::Cow;

/// A backend object together with the facts the registry checks it against.
#[derive(Debug)]
struct Tracked<T, I> {
    object: T,
    info: I,
}

#[derive(Debug, Clone, Copy)]
struct BufferInfo {
    kind: BufferKind,
    size: u64,
}

#[derive(Debug, Clone, Copy)]
struct TextureInfo {
    format: PixelFormat,
    usage: TextureUsage,
    width: u32,
    height: u32,
    sample_count: u32,
}

/// Target formats of a pipeline, or attachment formats of a pass.
#[derive(Debug, Clone, PartialEq)]
struct TargetFormats {
    color: Vec<PixelFormat>,
    depth: Option<PixelFormat>,
}

type Store<T, I> = PersistentHandleDataStore<Tracked<T, I>>;

#[derive(Debug)]
struct ResourceStores<B: GraphicsBackend> {
    buffers: Store<B::Buffer, BufferInfo>,
    shaders: Store<B::Shader, ShaderStage>,
    textures: Store<B::Texture, TextureInfo>,
    depth_stencil_states: Store<B::DepthStencilState, ()>,
    render_pipelines: Store<B::RenderPipeline, TargetFormats>,
    render_passes: Store<B::RenderPass, TargetFormats>,
}

impl<B: GraphicsBackend> ResourceStores<B> {
    fn new(config: &RegistryConfig) -> Self {
        Self {
            buffers: PersistentHandleDataStore::new(config.buffers),
            shaders: PersistentHandleDataStore::new(config.shaders),
            textures: PersistentHandleDataStore::new(config.textures),
            depth_stencil_states: PersistentHandleDataStore::new(config.depth_stencil_states),
            render_pipelines: PersistentHandleDataStore::new(config.render_pipelines),
            render_passes: PersistentHandleDataStore::new(config.render_passes),
        }
    }

    fn is_valid(&self, kind: ResourceKind, handle: Handle) -> bool {
        match kind {
            ResourceKind::Buffer => self.buffers.is_valid(handle),
            ResourceKind::Shader => self.shaders.is_valid(handle),
            ResourceKind::Texture => self.textures.is_valid(handle),
            ResourceKind::DepthStencilState => self.depth_stencil_states.is_valid(handle),
            ResourceKind::RenderPipeline => self.render_pipelines.is_valid(handle),
            ResourceKind::RenderPass => self.render_passes.is_valid(handle),
        }
    }

    fn usage(&self, kind: ResourceKind) -> StoreUsage {
        match kind {
            ResourceKind::Buffer => StoreUsage::of(&self.buffers),
            ResourceKind::Shader => StoreUsage::of(&self.shaders),
            ResourceKind::Texture => StoreUsage::of(&self.textures),
            ResourceKind::DepthStencilState => StoreUsage::of(&self.depth_stencil_states),
            ResourceKind::RenderPipeline => StoreUsage::of(&self.render_pipelines),
            ResourceKind::RenderPass => StoreUsage::of(&self.render_passes),
        }
    }
}

/// Occupancy of one resource store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUsage {
    /// Number of live resources.
    pub live: usize,
    /// Maximum number of live resources.
    pub capacity: usize,
}

impl StoreUsage {
    fn of<T>(store: &PersistentHandleDataStore<T>) -> Self {
        Self {
            live: store.len(),
            capacity: store.capacity(),
        }
    }
}

/// A snapshot of the occupancy of every store of a [`ResourceRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryUsage {
    /// Buffer store occupancy.
    pub buffers: StoreUsage,
    /// Shader store occupancy.
    pub shaders: StoreUsage,
    /// Texture store occupancy.
    pub textures: StoreUsage,
    /// Depth-stencil state store occupancy.
    pub depth_stencil_states: StoreUsage,
    /// Render pipeline store occupancy.
    pub render_pipelines: StoreUsage,
    /// Render pass store occupancy.
    pub render_passes: StoreUsage,
}

impl RegistryUsage {
    /// Returns the occupancy of the store for `kind`.
    pub fn get(&self, kind: ResourceKind) -> StoreUsage {
        match kind {
            ResourceKind::Buffer => self.buffers,
            ResourceKind::Shader => self.shaders,
            ResourceKind::Texture => self.textures,
            ResourceKind::DepthStencilState => self.depth_stencil_states,
            ResourceKind::RenderPipeline => self.render_pipelines,
            ResourceKind::RenderPass => self.render_passes,
        }
    }

    /// Returns the number of live resources across all kinds.
    pub fn total_live(&self) -> usize {
        ResourceKind::TEARDOWN_ORDER
            .iter()
            .map(|kind| self.get(*kind).live)
            .sum()
    }
}

/// Owns a [`GraphicsBackend`] and every resource created through it.
///
/// Each resource kind lives in its own fixed-capacity
/// [`PersistentHandleDataStore`], sized from a [`RegistryConfig`]. Callers only
/// ever hold typed ids; a stale or foreign id is reported as
/// [`ResourceError::InvalidHandle`] and never reaches the backend.
///
/// Dropping the registry destroys every resource still alive, dependents
/// first.
#[derive(Debug)]
pub struct ResourceRegistry<B: GraphicsBackend> {
    backend: B,
    stores: ResourceStores<B>,
    config: RegistryConfig,
}

impl<B: GraphicsBackend> ResourceRegistry<B> {
    /// Creates a registry over `backend` with stores sized by `config`.
    /// ## Errors
    /// * `ConfigError::InvalidCapacity` - If a capacity is zero or not addressable.
    pub fn new(backend: B, config: &RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "ResourceRegistry: created with capacities {} buffers, {} shaders, {} textures, \
             {} depth-stencil states, {} render pipelines, {} render passes",
            config.buffers,
            config.shaders,
            config.textures,
            config.depth_stencil_states,
            config.render_pipelines,
            config.render_passes
        );
        Ok(Self {
            backend,
            stores: ResourceStores::new(config),
            config: *config,
        })
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Returns the configuration the stores were sized from.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns `true` if `id` refers to a live resource of this registry.
    pub fn is_alive<I: ResourceId>(&self, id: I) -> bool {
        self.stores.is_valid(I::KIND, id.handle())
    }

    /// Returns the current occupancy of every store.
    pub fn usage(&self) -> RegistryUsage {
        RegistryUsage {
            buffers: self.stores.usage(ResourceKind::Buffer),
            shaders: self.stores.usage(ResourceKind::Shader),
            textures: self.stores.usage(ResourceKind::Texture),
            depth_stencil_states: self.stores.usage(ResourceKind::DepthStencilState),
            render_pipelines: self.stores.usage(ResourceKind::RenderPipeline),
            render_passes: self.stores.usage(ResourceKind::RenderPass),
        }
    }

    // --- Buffers ---

    /// Creates a buffer.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the descriptor is inconsistent.
    /// * `ResourceError::CapacityExhausted` - If the buffer store is full.
    /// * `ResourceError::Backend` - If the backend fails to build it.
    pub fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor<'_>,
    ) -> Result<BufferId, ResourceError> {
        descriptor.validate()?;
        ensure_room(&self.stores.buffers, BufferId::KIND)?;

        let object = self
            .backend
            .create_buffer(descriptor)
            .map_err(|err| backend_failure(BufferId::KIND, &descriptor.label, err))?;
        let info = BufferInfo {
            kind: descriptor.kind,
            size: descriptor.size,
        };

        match admit::<BufferId, _, _>(&mut self.stores.buffers, Tracked { object, info }) {
            Ok(id) => {
                log::debug!(
                    "Created buffer '{}' ({:?}, {} bytes) as {:?}",
                    label_of(&descriptor.label),
                    descriptor.kind,
                    descriptor.size,
                    id.handle()
                );
                Ok(id)
            }
            Err(rejected) => {
                self.backend.destroy_buffer(rejected.object);
                Err(capacity_exhausted(&self.stores.buffers, BufferId::KIND))
            }
        }
    }

    /// Destroys a buffer.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If `id` is stale; nothing is changed.
    pub fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        let tracked = retire(&mut self.stores.buffers, id)?;
        self.backend.destroy_buffer(tracked.object);
        log::debug!("Destroyed buffer {:?}", id.handle());
        Ok(())
    }

    /// Returns the backend buffer behind `id`.
    pub fn buffer(&self, id: BufferId) -> Result<&B::Buffer, ResourceError> {
        resolve(&self.stores.buffers, id).map(|tracked| &tracked.object)
    }

    // --- Shaders ---

    /// Creates a shader.
    /// ## Errors
    /// * `ResourceError::CapacityExhausted` - If the shader store is full.
    /// * `ResourceError::Backend` - If the backend fails to compile it.
    pub fn create_shader(
        &mut self,
        descriptor: &ShaderDescriptor<'_>,
    ) -> Result<ShaderId, ResourceError> {
        ensure_room(&self.stores.shaders, ShaderId::KIND)?;

        let object = self
            .backend
            .create_shader(descriptor)
            .map_err(|err| backend_failure(ShaderId::KIND, &descriptor.label, err))?;
        let tracked = Tracked {
            object,
            info: descriptor.stage,
        };

        match admit::<ShaderId, _, _>(&mut self.stores.shaders, tracked) {
            Ok(id) => {
                log::debug!(
                    "Created {:?} shader '{}' as {:?}",
                    descriptor.stage,
                    label_of(&descriptor.label),
                    id.handle()
                );
                Ok(id)
            }
            Err(rejected) => {
                self.backend.destroy_shader(rejected.object);
                Err(capacity_exhausted(&self.stores.shaders, ShaderId::KIND))
            }
        }
    }

    /// Destroys a shader. Pipelines already built from it are unaffected.
    pub fn destroy_shader(&mut self, id: ShaderId) -> Result<(), ResourceError> {
        let tracked = retire(&mut self.stores.shaders, id)?;
        self.backend.destroy_shader(tracked.object);
        log::debug!("Destroyed shader {:?}", id.handle());
        Ok(())
    }

    /// Returns the backend shader behind `id`.
    pub fn shader(&self, id: ShaderId) -> Result<&B::Shader, ResourceError> {
        resolve(&self.stores.shaders, id).map(|tracked| &tracked.object)
    }

    // --- Textures ---

    /// Creates a texture.
    /// ## Errors
    /// * `ResourceError::InvalidDescriptor` - If the extent, mips, samples or usage are wrong.
    /// * `ResourceError::CapacityExhausted` - If the texture store is full.
    /// * `ResourceError::Backend` - If the backend fails to allocate it.
    pub fn create_texture(
        &mut self,
        descriptor: &TextureDescriptor<'_>,
    ) -> Result<TextureId, ResourceError> {
        descriptor.validate()?;
        ensure_room(&self.stores.textures, TextureId::KIND)?;

        let object = self
            .backend
            .create_texture(descriptor)
            .map_err(|err| backend_failure(TextureId::KIND, &descriptor.label, err))?;
        let info = TextureInfo {
            format: descriptor.format,
            usage: descriptor.usage,
            width: descriptor.width,
            height: descriptor.height,
            sample_count: descriptor.sample_count,
        };

        match admit::<TextureId, _, _>(&mut self.stores.textures, Tracked { object, info }) {
            Ok(id) => {
                log::debug!(
                    "Created texture '{}' ({}x{}x{} {:?}) as {:?}",
                    label_of(&descriptor.label),
                    descriptor.width,
                    descriptor.height,
                    descriptor.depth,
                    descriptor.format,
                    id.handle()
                );
                Ok(id)
            }
            Err(rejected) => {
                self.backend.destroy_texture(rejected.object);
                Err(capacity_exhausted(&self.stores.textures, TextureId::KIND))
            }
        }
    }

    /// Destroys a texture.
    pub fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        let tracked = retire(&mut self.stores.textures, id)?;
        self.backend.destroy_texture(tracked.object);
        log::debug!("Destroyed texture {:?}", id.handle());
        Ok(())
    }

    /// Returns the backend texture behind `id`.
    pub fn texture(&self, id: TextureId) -> Result<&B::Texture, ResourceError> {
        resolve(&self.stores.textures, id).map(|tracked| &tracked.object)
    }

    // --- Depth-stencil states ---

    /// Creates a depth-stencil state.
    pub fn create_depth_stencil_state(
        &mut self,
        descriptor: &DepthStencilStateDescriptor<'_>,
    ) -> Result<DepthStencilStateId, ResourceError> {
        ensure_room(&self.stores.depth_stencil_states, DepthStencilStateId::KIND)?;

        let object = self
            .backend
            .create_depth_stencil_state(descriptor)
            .map_err(|err| backend_failure(DepthStencilStateId::KIND, &descriptor.label, err))?;

        match admit::<DepthStencilStateId, _, _>(
            &mut self.stores.depth_stencil_states,
            Tracked { object, info: () },
        ) {
            Ok(id) => {
                log::debug!(
                    "Created depth-stencil state '{}' ({:?}, write: {}) as {:?}",
                    label_of(&descriptor.label),
                    descriptor.depth_compare,
                    descriptor.depth_write_enabled,
                    id.handle()
                );
                Ok(id)
            }
            Err(rejected) => {
                self.backend.destroy_depth_stencil_state(rejected.object);
                Err(capacity_exhausted(
                    &self.stores.depth_stencil_states,
                    DepthStencilStateId::KIND,
                ))
            }
        }
    }

    /// Destroys a depth-stencil state.
    pub fn destroy_depth_stencil_state(
        &mut self,
        id: DepthStencilStateId,
    ) -> Result<(), ResourceError> {
        let tracked = retire(&mut self.stores.depth_stencil_states, id)?;
        self.backend.destroy_depth_stencil_state(tracked.object);
        log::debug!("Destroyed depth-stencil state {:?}", id.handle());
        Ok(())
    }

    /// Returns the backend depth-stencil state behind `id`.
    pub fn depth_stencil_state(
        &self,
        id: DepthStencilStateId,
    ) -> Result<&B::DepthStencilState, ResourceError> {
        resolve(&self.stores.depth_stencil_states, id).map(|tracked| &tracked.object)
    }

    // --- Render pipelines ---

    /// Creates a render pipeline from live shaders.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If a referenced shader is not alive.
    /// * `ResourceError::InvalidDescriptor` - If the targets are inconsistent or a
    ///   shader was compiled for the wrong stage.
    /// * `ResourceError::CapacityExhausted` - If the pipeline store is full.
    /// * `ResourceError::Backend` - If the backend fails to build it.
    pub fn create_render_pipeline(
        &mut self,
        descriptor: &RenderPipelineDescriptor<'_>,
    ) -> Result<RenderPipelineId, ResourceError> {
        descriptor.validate()?;

        let vertex = resolve(&self.stores.shaders, descriptor.vertex_shader)?;
        expect_stage(vertex.info, ShaderStage::Vertex, "vertex_shader")?;
        let fragment = match descriptor.fragment_shader {
            Some(id) => {
                let fragment = resolve(&self.stores.shaders, id)?;
                expect_stage(fragment.info, ShaderStage::Fragment, "fragment_shader")?;
                Some(&fragment.object)
            }
            None => None,
        };
        ensure_room(&self.stores.render_pipelines, RenderPipelineId::KIND)?;

        let object = self
            .backend
            .create_render_pipeline(descriptor, &vertex.object, fragment)
            .map_err(|err| backend_failure(RenderPipelineId::KIND, &descriptor.label, err))?;
        let info = TargetFormats {
            color: descriptor.color_formats.to_vec(),
            depth: descriptor.depth_format,
        };

        match admit::<RenderPipelineId, _, _>(
            &mut self.stores.render_pipelines,
            Tracked { object, info },
        ) {
            Ok(id) => {
                log::debug!(
                    "Created render pipeline '{}' as {:?}",
                    label_of(&descriptor.label),
                    id.handle()
                );
                Ok(id)
            }
            Err(rejected) => {
                self.backend.destroy_render_pipeline(rejected.object);
                Err(capacity_exhausted(
                    &self.stores.render_pipelines,
                    RenderPipelineId::KIND,
                ))
            }
        }
    }

    /// Destroys a render pipeline.
    pub fn destroy_render_pipeline(&mut self, id: RenderPipelineId) -> Result<(), ResourceError> {
        let tracked = retire(&mut self.stores.render_pipelines, id)?;
        self.backend.destroy_render_pipeline(tracked.object);
        log::debug!("Destroyed render pipeline {:?}", id.handle());
        Ok(())
    }

    /// Returns the backend render pipeline behind `id`.
    pub fn render_pipeline(&self, id: RenderPipelineId) -> Result<&B::RenderPipeline, ResourceError> {
        resolve(&self.stores.render_pipelines, id).map(|tracked| &tracked.object)
    }

    // --- Render passes ---

    /// Creates a render pass over live textures.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If an attachment texture is not alive.
    /// * `ResourceError::InvalidDescriptor` - If an attachment cannot be rendered
    ///   into, has the wrong kind of format, or its extent differs from the others.
    /// * `ResourceError::CapacityExhausted` - If the render pass store is full.
    /// * `ResourceError::Backend` - If the backend fails to build it.
    pub fn create_render_pass(
        &mut self,
        descriptor: &RenderPassDescriptor<'_>,
    ) -> Result<RenderPassId, ResourceError> {
        descriptor.validate()?;

        let mut extent = None;
        let mut color_targets = Vec::with_capacity(descriptor.color_attachments.len());
        let mut color_formats = Vec::with_capacity(descriptor.color_attachments.len());
        for (index, attachment) in descriptor.color_attachments.iter().enumerate() {
            let texture = resolve(&self.stores.textures, attachment.texture)?;
            check_attachment(
                &texture.info,
                false,
                &format!("color attachment {index}"),
                &mut extent,
            )?;
            color_targets.push(&texture.object);
            color_formats.push(texture.info.format);
        }
        let depth = match &descriptor.depth_attachment {
            Some(attachment) => {
                let texture = resolve(&self.stores.textures, attachment.texture)?;
                check_attachment(&texture.info, true, "depth attachment", &mut extent)?;
                Some(texture)
            }
            None => None,
        };
        ensure_room(&self.stores.render_passes, RenderPassId::KIND)?;

        let object = self
            .backend
            .create_render_pass(
                descriptor,
                &color_targets,
                depth.map(|texture| &texture.object),
            )
            .map_err(|err| backend_failure(RenderPassId::KIND, &descriptor.label, err))?;
        let info = TargetFormats {
            color: color_formats,
            depth: depth.map(|texture| texture.info.format),
        };

        match admit::<RenderPassId, _, _>(&mut self.stores.render_passes, Tracked { object, info }) {
            Ok(id) => {
                log::debug!(
                    "Created render pass '{}' ({} color attachments) as {:?}",
                    label_of(&descriptor.label),
                    descriptor.color_attachments.len(),
                    id.handle()
                );
                Ok(id)
            }
            Err(rejected) => {
                self.backend.destroy_render_pass(rejected.object);
                Err(capacity_exhausted(
                    &self.stores.render_passes,
                    RenderPassId::KIND,
                ))
            }
        }
    }

    /// Destroys a render pass.
    pub fn destroy_render_pass(&mut self, id: RenderPassId) -> Result<(), ResourceError> {
        let tracked = retire(&mut self.stores.render_passes, id)?;
        self.backend.destroy_render_pass(tracked.object);
        log::debug!("Destroyed render pass {:?}", id.handle());
        Ok(())
    }

    /// Returns the backend render pass behind `id`.
    pub fn render_pass(&self, id: RenderPassId) -> Result<&B::RenderPass, ResourceError> {
        resolve(&self.stores.render_passes, id).map(|tracked| &tracked.object)
    }

    // --- Submission and teardown ---

    /// Resolves and validates a recorded command list, then hands it to the backend.
    ///
    /// The whole list is checked before anything is submitted: if any id is
    /// stale or the pass structure is broken, the backend sees nothing.
    /// ## Errors
    /// * `RenderError::Resource` - If a command refers to a dead resource or
    ///   binds a resource in a role it was not created for.
    /// * `RenderError::InvalidCommandSequence` - If commands are not properly
    ///   enclosed in passes.
    /// * `RenderError::SubmissionFailed` - If the backend rejects the list.
    pub fn submit(&mut self, commands: &[Command]) -> Result<(), RenderError> {
        let resolved = resolve_commands(&self.stores, commands)?;
        self.backend.submit(&resolved).map_err(|err| {
            log::error!("Command submission failed: {err}");
            err
        })
    }

    /// Destroys every live resource, dependents first: render passes,
    /// pipelines, depth-stencil states, textures, shaders, then buffers.
    ///
    /// Every id issued so far becomes invalid. The stores keep their capacity
    /// and can be refilled.
    pub fn destroy_all(&mut self) {
        let live = self.usage().total_live();
        if live == 0 {
            return;
        }

        for (_, tracked) in self.stores.render_passes.drain() {
            self.backend.destroy_render_pass(tracked.object);
        }
        for (_, tracked) in self.stores.render_pipelines.drain() {
            self.backend.destroy_render_pipeline(tracked.object);
        }
        for (_, tracked) in self.stores.depth_stencil_states.drain() {
            self.backend.destroy_depth_stencil_state(tracked.object);
        }
        for (_, tracked) in self.stores.textures.drain() {
            self.backend.destroy_texture(tracked.object);
        }
        for (_, tracked) in self.stores.shaders.drain() {
            self.backend.destroy_shader(tracked.object);
        }
        for (_, tracked) in self.stores.buffers.drain() {
            self.backend.destroy_buffer(tracked.object);
        }

        log::info!("ResourceRegistry: destroyed {live} live resources");
    }
}

impl<B: GraphicsBackend> Drop for ResourceRegistry<B> {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

fn label_of<'l>(label: &'l Option<Cow<'_, str>>) -> &'l str {
    label.as_deref().unwrap_or("<unnamed>")
}

fn capacity_exhausted<T>(store: &PersistentHandleDataStore<T>, kind: ResourceKind) -> ResourceError {
    log::warn!(
        "Cannot create {kind}: all {} slots are in use",
        store.capacity()
    );
    ResourceError::CapacityExhausted {
        kind,
        capacity: store.capacity(),
    }
}

/// Rejects a creation before the backend is involved when `store` is full.
fn ensure_room<T>(
    store: &PersistentHandleDataStore<T>,
    kind: ResourceKind,
) -> Result<(), ResourceError> {
    if store.is_full() {
        return Err(capacity_exhausted(store, kind));
    }
    Ok(())
}

fn backend_failure(
    kind: ResourceKind,
    label: &Option<Cow<'_, str>>,
    err: ResourceError,
) -> ResourceError {
    log::error!("Backend failed to create {kind} '{}': {err}", label_of(label));
    err
}

fn admit<I: ResourceId, T, N>(
    store: &mut Store<T, N>,
    tracked: Tracked<T, N>,
) -> Result<I, Tracked<T, N>> {
    store.try_add(tracked).map(|handle| I::from_handle(*handle))
}

fn invalid_handle<I: ResourceId>(id: I) -> ResourceError {
    log::warn!("Use of invalid {} handle {:?}", I::KIND, id.handle());
    ResourceError::invalid_handle(I::KIND, id.handle())
}

fn resolve<I: ResourceId, T>(
    store: &PersistentHandleDataStore<T>,
    id: I,
) -> Result<&T, ResourceError> {
    store.get(id.handle()).ok_or_else(|| invalid_handle(id))
}

fn retire<I: ResourceId, T>(
    store: &mut PersistentHandleDataStore<T>,
    id: I,
) -> Result<T, ResourceError> {
    store.remove(id.handle()).ok_or_else(|| invalid_handle(id))
}

fn expect_stage(
    actual: ShaderStage,
    expected: ShaderStage,
    field: &str,
) -> Result<(), ResourceError> {
    if actual != expected {
        return Err(ResourceError::invalid_descriptor(
            ResourceKind::RenderPipeline,
            format!("{field} is a {actual:?} shader, expected {expected:?}"),
        ));
    }
    Ok(())
}

/// Checks one pass attachment; `extent` accumulates the size every attachment must share.
fn check_attachment(
    info: &TextureInfo,
    depth: bool,
    what: &str,
    extent: &mut Option<(u32, u32, u32)>,
) -> Result<(), ResourceError> {
    let invalid = |reason: String| ResourceError::invalid_descriptor(ResourceKind::RenderPass, reason);

    if !info.usage.contains(TextureUsage::RENDER_TARGET) {
        return Err(invalid(format!("{what} texture is not a render target")));
    }
    if info.format.is_depth() != depth {
        return Err(invalid(format!(
            "{what} cannot use a {:?} texture",
            info.format
        )));
    }
    let this = (info.width, info.height, info.sample_count);
    match *extent {
        Some(expected) if expected != this => Err(invalid(format!(
            "{what} is {}x{} with {} samples, other attachments are {}x{} with {} samples",
            this.0, this.1, this.2, expected.0, expected.1, expected.2
        ))),
        Some(_) => Ok(()),
        None => {
            *extent = Some(this);
            Ok(())
        }
    }
}

fn sequence_error(index: usize, reason: impl Into<String>) -> RenderError {
    let err = RenderError::InvalidCommandSequence {
        index,
        reason: reason.into(),
    };
    log::warn!("Rejected command list: {err}");
    err
}

fn resolve_commands<'a, B: GraphicsBackend>(
    stores: &'a ResourceStores<B>,
    commands: &[Command],
) -> Result<Vec<BackendCommand<'a, B>>, RenderError> {
    let mut resolved = Vec::with_capacity(commands.len());
    // Attachment formats of the open pass, if any.
    let mut open_pass: Option<&'a TargetFormats> = None;
    let mut pipeline_bound = false;

    for (index, command) in commands.iter().enumerate() {
        if command.requires_pass() && open_pass.is_none() {
            return Err(sequence_error(
                index,
                format!("{command:?} outside of a render pass"),
            ));
        }

        let backend_command = match command {
            Command::BeginRenderPass(id) => {
                if open_pass.is_some() {
                    return Err(sequence_error(index, "render passes cannot be nested"));
                }
                let pass = resolve(&stores.render_passes, *id)?;
                open_pass = Some(&pass.info);
                pipeline_bound = false;
                BackendCommand::BeginRenderPass(&pass.object)
            }
            Command::EndRenderPass => {
                if open_pass.take().is_none() {
                    return Err(sequence_error(
                        index,
                        "EndRenderPass without a matching BeginRenderPass",
                    ));
                }
                BackendCommand::EndRenderPass
            }
            Command::SetRenderPipeline(id) => {
                let pipeline = resolve(&stores.render_pipelines, *id)?;
                if let Some(pass) = open_pass.filter(|pass| **pass != pipeline.info) {
                    return Err(sequence_error(
                        index,
                        format!(
                            "pipeline targets {:?} do not match pass attachments {:?}",
                            pipeline.info, pass
                        ),
                    ));
                }
                pipeline_bound = true;
                BackendCommand::SetRenderPipeline(&pipeline.object)
            }
            Command::SetDepthStencilState(id) => {
                let state = resolve(&stores.depth_stencil_states, *id)?;
                BackendCommand::SetDepthStencilState(&state.object)
            }
            Command::SetVertexBuffer {
                slot,
                buffer,
                offset,
            } => {
                let tracked = resolve(&stores.buffers, *buffer)?;
                if tracked.info.kind != BufferKind::Vertex {
                    return Err(ResourceError::invalid_descriptor(
                        ResourceKind::Buffer,
                        format!("{:?} buffer bound as a vertex buffer", tracked.info.kind),
                    )
                    .into());
                }
                if *offset >= tracked.info.size {
                    return Err(ResourceError::invalid_descriptor(
                        ResourceKind::Buffer,
                        format!(
                            "vertex buffer offset {offset} is past its {} bytes",
                            tracked.info.size
                        ),
                    )
                    .into());
                }
                BackendCommand::SetVertexBuffer {
                    slot: *slot,
                    buffer: &tracked.object,
                    offset: *offset,
                }
            }
            Command::SetFragmentTexture {
                index: binding,
                texture,
            } => {
                let tracked = resolve(&stores.textures, *texture)?;
                if !tracked.info.usage.contains(TextureUsage::SHADER_READ) {
                    return Err(ResourceError::invalid_descriptor(
                        ResourceKind::Texture,
                        "texture bound for sampling was not created with SHADER_READ usage",
                    )
                    .into());
                }
                BackendCommand::SetFragmentTexture {
                    index: *binding,
                    texture: &tracked.object,
                }
            }
            Command::Draw {
                vertices,
                instances,
            } => {
                if !pipeline_bound {
                    return Err(sequence_error(index, "draw without a render pipeline"));
                }
                BackendCommand::Draw {
                    vertices: vertices.clone(),
                    instances: instances.clone(),
                }
            }
            Command::DrawIndexed {
                index_buffer,
                indices,
                instances,
            } => {
                if !pipeline_bound {
                    return Err(sequence_error(index, "draw without a render pipeline"));
                }
                let tracked = resolve(&stores.buffers, *index_buffer)?;
                if tracked.info.kind != BufferKind::Index {
                    return Err(ResourceError::invalid_descriptor(
                        ResourceKind::Buffer,
                        format!("{:?} buffer used as an index buffer", tracked.info.kind),
                    )
                    .into());
                }
                BackendCommand::DrawIndexed {
                    index_buffer: &tracked.object,
                    indices: indices.clone(),
                    instances: instances.clone(),
                }
            }
        };
        resolved.push(backend_command);
    }

    if open_pass.is_some() {
        return Err(sequence_error(commands.len(), "render pass is never ended"));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// What the mock backend saw, shared with the test after the registry is dropped.
    #[derive(Debug, Default)]
    struct MockLog {
        created: Vec<(ResourceKind, u32)>,
        destroyed: Vec<(ResourceKind, u32)>,
        submitted: Vec<usize>,
    }

    #[derive(Debug, Default)]
    struct MockBackend {
        next_object: u32,
        fail_creation: bool,
        log: Rc<RefCell<MockLog>>,
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MockObject(u32);

    impl MockBackend {
        fn create(&mut self, kind: ResourceKind) -> Result<MockObject, ResourceError> {
            if self.fail_creation {
                return Err(ResourceError::Backend("mock failure".to_owned()));
            }
            self.next_object += 1;
            self.log.borrow_mut().created.push((kind, self.next_object));
            Ok(MockObject(self.next_object))
        }

        fn destroy(&mut self, kind: ResourceKind, object: MockObject) {
            self.log.borrow_mut().destroyed.push((kind, object.0));
        }
    }

    impl GraphicsBackend for MockBackend {
        type Buffer = MockObject;
        type Shader = MockObject;
        type Texture = MockObject;
        type DepthStencilState = MockObject;
        type RenderPipeline = MockObject;
        type RenderPass = MockObject;

        fn create_buffer(&mut self, _: &BufferDescriptor<'_>) -> Result<MockObject, ResourceError> {
            self.create(ResourceKind::Buffer)
        }
        fn destroy_buffer(&mut self, buffer: MockObject) {
            self.destroy(ResourceKind::Buffer, buffer)
        }
        fn create_shader(&mut self, _: &ShaderDescriptor<'_>) -> Result<MockObject, ResourceError> {
            self.create(ResourceKind::Shader)
        }
        fn destroy_shader(&mut self, shader: MockObject) {
            self.destroy(ResourceKind::Shader, shader)
        }
        fn create_texture(&mut self, _: &TextureDescriptor<'_>) -> Result<MockObject, ResourceError> {
            self.create(ResourceKind::Texture)
        }
        fn destroy_texture(&mut self, texture: MockObject) {
            self.destroy(ResourceKind::Texture, texture)
        }
        fn create_depth_stencil_state(
            &mut self,
            _: &DepthStencilStateDescriptor<'_>,
        ) -> Result<MockObject, ResourceError> {
            self.create(ResourceKind::DepthStencilState)
        }
        fn destroy_depth_stencil_state(&mut self, state: MockObject) {
            self.destroy(ResourceKind::DepthStencilState, state)
        }
        fn create_render_pipeline(
            &mut self,
            _: &RenderPipelineDescriptor<'_>,
            _: &MockObject,
            _: Option<&MockObject>,
        ) -> Result<MockObject, ResourceError> {
            self.create(ResourceKind::RenderPipeline)
        }
        fn destroy_render_pipeline(&mut self, pipeline: MockObject) {
            self.destroy(ResourceKind::RenderPipeline, pipeline)
        }
        fn create_render_pass(
            &mut self,
            _: &RenderPassDescriptor<'_>,
            color_targets: &[&MockObject],
            _: Option<&MockObject>,
        ) -> Result<MockObject, ResourceError> {
            assert!(!color_targets.is_empty());
            self.create(ResourceKind::RenderPass)
        }
        fn destroy_render_pass(&mut self, pass: MockObject) {
            self.destroy(ResourceKind::RenderPass, pass)
        }
        fn submit(&mut self, commands: &[BackendCommand<'_, Self>]) -> Result<(), RenderError> {
            self.log.borrow_mut().submitted.push(commands.len());
            Ok(())
        }
    }

    fn registry_with(config: RegistryConfig) -> (ResourceRegistry<MockBackend>, Rc<RefCell<MockLog>>) {
        let backend = MockBackend::default();
        let log = Rc::clone(&backend.log);
        (ResourceRegistry::new(backend, &config).unwrap(), log)
    }

    fn registry() -> (ResourceRegistry<MockBackend>, Rc<RefCell<MockLog>>) {
        registry_with(RegistryConfig::default())
    }

    fn buffer_desc(kind: BufferKind) -> BufferDescriptor<'static> {
        BufferDescriptor {
            label: Some(Cow::Borrowed("test buffer")),
            kind,
            size: 64,
            contents: None,
        }
    }

    fn shader_desc(stage: ShaderStage) -> ShaderDescriptor<'static> {
        ShaderDescriptor {
            label: None,
            stage,
            entry_point: Cow::Borrowed("main"),
            source: Cow::Borrowed("void main() {}"),
        }
    }

    fn target_desc(format: PixelFormat, usage: TextureUsage) -> TextureDescriptor<'static> {
        TextureDescriptor::new_2d("target", format, usage, 64, 64)
    }

    /// A pass with one color target and the matching pipeline.
    fn pass_and_pipeline(
        registry: &mut ResourceRegistry<MockBackend>,
    ) -> (RenderPassId, RenderPipelineId) {
        let color = registry
            .create_texture(&target_desc(
                PixelFormat::Bgra8Unorm,
                TextureUsage::RENDER_TARGET,
            ))
            .unwrap();
        let pass = registry
            .create_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: vec![ColorAttachment {
                    texture: color,
                    load_op: LoadOp::Clear,
                    store_op: StoreOp::Store,
                    clear_color: [0.0; 4],
                }],
                depth_attachment: None,
            })
            .unwrap();
        let vertex = registry.create_shader(&shader_desc(ShaderStage::Vertex)).unwrap();
        let pipeline = registry
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: None,
                vertex_shader: vertex,
                fragment_shader: None,
                color_formats: Cow::Owned(vec![PixelFormat::Bgra8Unorm]),
                depth_format: None,
            })
            .unwrap();
        (pass, pipeline)
    }

    #[test]
    fn created_resource_resolves_until_destroyed() {
        let (mut registry, log) = registry();
        let id = registry.create_buffer(&buffer_desc(BufferKind::Vertex)).unwrap();

        assert!(registry.is_alive(id));
        assert_eq!(registry.buffer(id).unwrap(), &MockObject(1));

        registry.destroy_buffer(id).unwrap();
        assert!(!registry.is_alive(id));
        assert!(matches!(
            registry.buffer(id),
            Err(ResourceError::InvalidHandle {
                kind: ResourceKind::Buffer,
                ..
            })
        ));
        assert_eq!(log.borrow().destroyed, vec![(ResourceKind::Buffer, 1)]);
    }

    #[test]
    fn destroying_a_stale_id_changes_nothing() {
        let (mut registry, log) = registry();
        let id = registry.create_texture(&target_desc(
            PixelFormat::Rgba8Unorm,
            TextureUsage::SHADER_READ,
        ))
        .unwrap();
        registry.destroy_texture(id).unwrap();

        let err = registry.destroy_texture(id).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidHandle { kind: ResourceKind::Texture, handle } if handle == id.handle()));
        assert_eq!(log.borrow().destroyed.len(), 1);
        assert_eq!(registry.usage().textures.live, 0);
    }

    #[test]
    fn full_store_is_rejected_before_the_backend_is_called() {
        let config = RegistryConfig {
            shaders: 2,
            ..Default::default()
        };
        let (mut registry, log) = registry_with(config);
        registry.create_shader(&shader_desc(ShaderStage::Vertex)).unwrap();
        registry.create_shader(&shader_desc(ShaderStage::Fragment)).unwrap();

        let err = registry
            .create_shader(&shader_desc(ShaderStage::Vertex))
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::CapacityExhausted {
                kind: ResourceKind::Shader,
                capacity: 2
            }
        ));
        assert_eq!(log.borrow().created.len(), 2);
        assert_eq!(
            registry.usage().shaders,
            StoreUsage {
                live: 2,
                capacity: 2
            }
        );
    }

    #[test]
    fn freed_slot_can_be_reused_after_exhaustion() {
        let config = RegistryConfig {
            depth_stencil_states: 1,
            ..Default::default()
        };
        let (mut registry, _log) = registry_with(config);
        let desc = DepthStencilStateDescriptor {
            label: None,
            depth_compare: CompareFunction::Less,
            depth_write_enabled: true,
            stencil_front: StencilFaceState::default(),
            stencil_back: StencilFaceState::default(),
        };
        let first = registry.create_depth_stencil_state(&desc).unwrap();
        assert!(registry.create_depth_stencil_state(&desc).is_err());

        registry.destroy_depth_stencil_state(first).unwrap();
        let second = registry.create_depth_stencil_state(&desc).unwrap();
        assert_ne!(first, second);
        assert!(!registry.is_alive(first));
        assert!(registry.depth_stencil_state(second).is_ok());
    }

    #[test]
    fn backend_failure_leaves_the_store_untouched() {
        let (mut registry, _log) = registry();
        registry.backend_mut().fail_creation = true;

        let err = registry
            .create_buffer(&buffer_desc(BufferKind::Index))
            .unwrap_err();
        assert!(matches!(err, ResourceError::Backend(_)));
        assert_eq!(registry.usage().total_live(), 0);
    }

    #[test]
    fn invalid_descriptor_never_reaches_the_backend() {
        let (mut registry, log) = registry();
        let mut desc = buffer_desc(BufferKind::Uniform);
        desc.size = 0;

        assert!(matches!(
            registry.create_buffer(&desc),
            Err(ResourceError::InvalidDescriptor { .. })
        ));
        assert!(log.borrow().created.is_empty());
    }

    #[test]
    fn pipeline_checks_shader_liveness_and_stage() {
        let (mut registry, _log) = registry();
        let fragment = registry.create_shader(&shader_desc(ShaderStage::Fragment)).unwrap();
        let mut desc = RenderPipelineDescriptor {
            label: Some(Cow::Borrowed("triangle")),
            vertex_shader: fragment,
            fragment_shader: None,
            color_formats: Cow::Owned(vec![PixelFormat::Bgra8Unorm]),
            depth_format: None,
        };
        assert!(matches!(
            registry.create_render_pipeline(&desc),
            Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::RenderPipeline,
                ..
            })
        ));

        let vertex = registry.create_shader(&shader_desc(ShaderStage::Vertex)).unwrap();
        desc.vertex_shader = vertex;
        desc.fragment_shader = Some(fragment);
        assert!(registry.create_render_pipeline(&desc).is_ok());

        registry.destroy_shader(fragment).unwrap();
        assert!(matches!(
            registry.create_render_pipeline(&desc),
            Err(ResourceError::InvalidHandle {
                kind: ResourceKind::Shader,
                ..
            })
        ));
    }

    #[test]
    fn pass_attachments_must_be_render_targets_of_one_extent() {
        let (mut registry, _log) = registry();
        let sampled = registry
            .create_texture(&target_desc(PixelFormat::Rgba8Unorm, TextureUsage::SHADER_READ))
            .unwrap();
        let color = registry
            .create_texture(&target_desc(PixelFormat::Rgba8Unorm, TextureUsage::RENDER_TARGET))
            .unwrap();
        let small_depth = registry
            .create_texture(&TextureDescriptor::new_2d(
                "depth",
                PixelFormat::Depth32FloatStencil8,
                TextureUsage::RENDER_TARGET,
                32,
                32,
            ))
            .unwrap();

        let attachment = |texture| ColorAttachment {
            texture,
            load_op: LoadOp::Load,
            store_op: StoreOp::Store,
            clear_color: [0.0; 4],
        };
        let mut desc = RenderPassDescriptor {
            label: None,
            color_attachments: vec![attachment(sampled)],
            depth_attachment: None,
        };
        assert!(registry.create_render_pass(&desc).is_err());

        desc.color_attachments = vec![attachment(color)];
        desc.depth_attachment = Some(DepthAttachment {
            texture: small_depth,
            load_op: LoadOp::Clear,
            store_op: StoreOp::DontCare,
            clear_depth: 1.0,
            clear_stencil: 0,
        });
        assert!(matches!(
            registry.create_render_pass(&desc),
            Err(ResourceError::InvalidDescriptor {
                kind: ResourceKind::RenderPass,
                ..
            })
        ));

        desc.depth_attachment = None;
        assert!(registry.create_render_pass(&desc).is_ok());
    }

    #[test]
    fn submit_hands_a_valid_list_to_the_backend() {
        let (mut registry, log) = registry();
        let (pass, pipeline) = pass_and_pipeline(&mut registry);
        let vertices = registry.create_buffer(&buffer_desc(BufferKind::Vertex)).unwrap();
        let indices = registry.create_buffer(&buffer_desc(BufferKind::Index)).unwrap();

        let commands = [
            Command::BeginRenderPass(pass),
            Command::SetRenderPipeline(pipeline),
            Command::SetVertexBuffer {
                slot: 0,
                buffer: vertices,
                offset: 0,
            },
            Command::DrawIndexed {
                index_buffer: indices,
                indices: 0..6,
                instances: 0..1,
            },
            Command::EndRenderPass,
        ];
        registry.submit(&commands).unwrap();
        assert_eq!(log.borrow().submitted, vec![5]);
    }

    #[test]
    fn submit_rejects_broken_pass_structure() {
        let (mut registry, log) = registry();
        let (pass, pipeline) = pass_and_pipeline(&mut registry);
        let draw = Command::Draw {
            vertices: 0..3,
            instances: 0..1,
        };

        let broken: [Vec<Command>; 5] = [
            vec![draw.clone()],
            vec![
                Command::BeginRenderPass(pass),
                Command::BeginRenderPass(pass),
            ],
            vec![Command::BeginRenderPass(pass), Command::SetRenderPipeline(pipeline)],
            vec![Command::EndRenderPass],
            vec![
                Command::BeginRenderPass(pass),
                draw,
                Command::EndRenderPass,
            ],
        ];
        for commands in &broken {
            assert!(
                matches!(
                    registry.submit(commands),
                    Err(RenderError::InvalidCommandSequence { .. })
                ),
                "{commands:?} should be rejected"
            );
        }
        assert!(log.borrow().submitted.is_empty());
    }

    #[test]
    fn submit_with_a_stale_id_reaches_nothing() {
        let (mut registry, log) = registry();
        let (pass, pipeline) = pass_and_pipeline(&mut registry);
        let vertices = registry.create_buffer(&buffer_desc(BufferKind::Vertex)).unwrap();
        registry.destroy_buffer(vertices).unwrap();

        let result = registry.submit(&[
            Command::BeginRenderPass(pass),
            Command::SetRenderPipeline(pipeline),
            Command::SetVertexBuffer {
                slot: 0,
                buffer: vertices,
                offset: 0,
            },
            Command::Draw {
                vertices: 0..3,
                instances: 0..1,
            },
            Command::EndRenderPass,
        ]);
        assert!(matches!(
            result,
            Err(RenderError::Resource(ResourceError::InvalidHandle {
                kind: ResourceKind::Buffer,
                ..
            }))
        ));
        assert!(log.borrow().submitted.is_empty());
    }

    #[test]
    fn submit_checks_binding_roles() {
        let (mut registry, _log) = registry();
        let (pass, pipeline) = pass_and_pipeline(&mut registry);
        let uniforms = registry.create_buffer(&buffer_desc(BufferKind::Uniform)).unwrap();

        let result = registry.submit(&[
            Command::BeginRenderPass(pass),
            Command::SetRenderPipeline(pipeline),
            Command::SetVertexBuffer {
                slot: 0,
                buffer: uniforms,
                offset: 0,
            },
            Command::EndRenderPass,
        ]);
        assert!(matches!(result, Err(RenderError::Resource(_))));
    }

    #[test]
    fn vertex_buffer_offset_must_fall_inside_the_buffer() {
        let (mut registry, log) = registry();
        let (pass, pipeline) = pass_and_pipeline(&mut registry);
        let vertices = registry.create_buffer(&buffer_desc(BufferKind::Vertex)).unwrap();
        let bind_at = |offset| {
            [
                Command::BeginRenderPass(pass),
                Command::SetRenderPipeline(pipeline),
                Command::SetVertexBuffer {
                    slot: 0,
                    buffer: vertices,
                    offset,
                },
                Command::EndRenderPass,
            ]
        };

        assert!(matches!(
            registry.submit(&bind_at(64)),
            Err(RenderError::Resource(ResourceError::InvalidDescriptor {
                kind: ResourceKind::Buffer,
                ..
            }))
        ));
        assert!(log.borrow().submitted.is_empty());

        registry.submit(&bind_at(63)).unwrap();
        assert_eq!(log.borrow().submitted, vec![4]);
    }

    #[test]
    fn pipeline_must_match_the_pass_targets() {
        let (mut registry, _log) = registry();
        let (pass, _) = pass_and_pipeline(&mut registry);
        let vertex = registry.create_shader(&shader_desc(ShaderStage::Vertex)).unwrap();
        let hdr_pipeline = registry
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: None,
                vertex_shader: vertex,
                fragment_shader: None,
                color_formats: Cow::Owned(vec![PixelFormat::Rgba16Float]),
                depth_format: None,
            })
            .unwrap();

        let result = registry.submit(&[
            Command::BeginRenderPass(pass),
            Command::SetRenderPipeline(hdr_pipeline),
            Command::EndRenderPass,
        ]);
        assert!(matches!(
            result,
            Err(RenderError::InvalidCommandSequence { index: 1, .. })
        ));
    }

    #[test]
    fn destroy_all_tears_down_dependents_first() {
        let (mut registry, log) = registry();
        registry.create_buffer(&buffer_desc(BufferKind::Vertex)).unwrap();
        registry
            .create_depth_stencil_state(&DepthStencilStateDescriptor {
                label: None,
                depth_compare: CompareFunction::LessEqual,
                depth_write_enabled: false,
                stencil_front: StencilFaceState::default(),
                stencil_back: StencilFaceState::default(),
            })
            .unwrap();
        let (pass, pipeline) = pass_and_pipeline(&mut registry);

        registry.destroy_all();
        assert_eq!(registry.usage().total_live(), 0);
        assert!(!registry.is_alive(pass));
        assert!(!registry.is_alive(pipeline));

        let kinds: Vec<ResourceKind> = log.borrow().destroyed.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, ResourceKind::TEARDOWN_ORDER.to_vec());
    }

    #[test]
    fn dropping_the_registry_destroys_everything_once() {
        let (mut registry, log) = registry();
        registry.create_buffer(&buffer_desc(BufferKind::Vertex)).unwrap();
        let gone = registry.create_buffer(&buffer_desc(BufferKind::Index)).unwrap();
        registry.destroy_buffer(gone).unwrap();

        drop(registry);
        let log = log.borrow();
        assert_eq!(log.destroyed.len(), log.created.len());
    }

    #[test]
    fn new_rejects_an_invalid_config() {
        let config = RegistryConfig {
            textures: 0,
            ..Default::default()
        };
        assert!(matches!(
            ResourceRegistry::new(MockBackend::default(), &config),
            Err(ConfigError::InvalidCapacity {
                kind: ResourceKind::Texture,
                ..
            })
        ));
    }
}
