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


//! Renders a textured triangle on the headless backend and reports what the
//! registry and backend did.

use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fever_device::*;
use fever_infra::HeadlessBackend;

#[derive(Parser, Debug)]
#[command(version, about = "Drives the Fever resource registry on a headless backend")]
struct Args {
    /// Registry capacity manifest (TOML). Built-in capacities are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to submit.
    #[arg(long, default_value_t = 3)]
    frames: u32,

    /// Memory budget of the headless backend, in bytes.
    #[arg(long)]
    memory_budget: Option<u64>,
}

struct SandboxScene {
    vertex_buffer: BufferId,
    index_buffer: BufferId,
    index_count: u32,
    albedo: TextureId,
    depth_state: DepthStencilStateId,
    render_pipeline: RenderPipelineId,
    render_pass: RenderPassId,
}

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

impl SandboxScene {
    fn new(registry: &mut ResourceRegistry<HeadlessBackend>) -> Result<Self, ResourceError> {
        let vertices: [[f32; 5]; 3] = [
            [0.0, 0.5, 0.0, 0.5, 0.0],
            [-0.5, -0.5, 0.0, 0.0, 1.0],
            [0.5, -0.5, 0.0, 1.0, 1.0],
        ];
        let indices: [u32; 3] = [0, 1, 2];
        let vertex_bytes: Vec<u8> = vertices
            .iter()
            .flatten()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let index_bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();

        let vertex_buffer = registry.create_buffer(&BufferDescriptor::with_contents(
            "Triangle Vertex Buffer",
            BufferKind::Vertex,
            &vertex_bytes,
        ))?;
        let index_buffer = registry.create_buffer(&BufferDescriptor::with_contents(
            "Triangle Index Buffer",
            BufferKind::Index,
            &index_bytes,
        ))?;

        let vertex_shader = registry.create_shader(&ShaderDescriptor {
            label: Some(Cow::Borrowed("Triangle Vertex Shader")),
            stage: ShaderStage::Vertex,
            entry_point: Cow::Borrowed("vs_main"),
            source: Cow::Borrowed(include_str!("triangle.wgsl")),
        })?;
        let fragment_shader = registry.create_shader(&ShaderDescriptor {
            label: Some(Cow::Borrowed("Triangle Fragment Shader")),
            stage: ShaderStage::Fragment,
            entry_point: Cow::Borrowed("fs_main"),
            source: Cow::Borrowed(include_str!("triangle.wgsl")),
        })?;

        let color_target = registry.create_texture(&TextureDescriptor::new_2d(
            "Backbuffer",
            PixelFormat::Bgra8Unorm,
            TextureUsage::RENDER_TARGET,
            WIDTH,
            HEIGHT,
        ))?;
        let depth_target = registry.create_texture(&TextureDescriptor::new_2d(
            "Depth Buffer",
            PixelFormat::Depth32FloatStencil8,
            TextureUsage::RENDER_TARGET,
            WIDTH,
            HEIGHT,
        ))?;
        let mut albedo_desc = TextureDescriptor::new_2d(
            "Albedo",
            PixelFormat::Rgba8Unorm,
            TextureUsage::SHADER_READ,
            256,
            256,
        );
        albedo_desc.mip_level_count = albedo_desc.max_mip_levels();
        let albedo = registry.create_texture(&albedo_desc)?;

        let depth_state = registry.create_depth_stencil_state(&DepthStencilStateDescriptor {
            label: Some(Cow::Borrowed("Depth Less Write")),
            depth_compare: CompareFunction::Less,
            depth_write_enabled: true,
            stencil_front: StencilFaceState::default(),
            stencil_back: StencilFaceState::default(),
        })?;
        let render_pipeline = registry.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(Cow::Borrowed("Triangle Pipeline")),
            vertex_shader,
            fragment_shader: Some(fragment_shader),
            color_formats: Cow::Borrowed(&[PixelFormat::Bgra8Unorm]),
            depth_format: Some(PixelFormat::Depth32FloatStencil8),
        })?;
        let render_pass = registry.create_render_pass(&RenderPassDescriptor {
            label: Some(Cow::Borrowed("Main Pass")),
            color_attachments: vec![ColorAttachment {
                texture: color_target,
                load_op: LoadOp::Clear,
                store_op: StoreOp::Store,
                clear_color: [0.1, 0.2, 0.3, 1.0],
            }],
            depth_attachment: Some(DepthAttachment {
                texture: depth_target,
                load_op: LoadOp::Clear,
                store_op: StoreOp::DontCare,
                clear_depth: 1.0,
                clear_stencil: 0,
            }),
        })?;

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            albedo,
            depth_state,
            render_pipeline,
            render_pass,
        })
    }

    fn frame(&self) -> Vec<Command> {
        vec![
            Command::BeginRenderPass(self.render_pass),
            Command::SetRenderPipeline(self.render_pipeline),
            Command::SetDepthStencilState(self.depth_state),
            Command::SetVertexBuffer {
                slot: 0,
                buffer: self.vertex_buffer,
                offset: 0,
            },
            Command::SetFragmentTexture {
                index: 0,
                texture: self.albedo,
            },
            Command::DrawIndexed {
                index_buffer: self.index_buffer,
                indices: 0..self.index_count,
                instances: 0..1,
            },
            Command::EndRenderPass,
        ]
    }
}

fn report(registry: &ResourceRegistry<HeadlessBackend>) {
    let usage = registry.usage();
    for kind in ResourceKind::TEARDOWN_ORDER.iter().rev() {
        let store = usage.get(*kind);
        log::info!("  {kind}: {}/{} live", store.live, store.capacity);
    }

    let stats = registry.backend().stats();
    log::info!(
        "Backend: {} submissions, {} passes, {} draw calls, {} bytes in use (peak {} bytes)",
        stats.submissions,
        stats.passes_executed,
        stats.draw_calls,
        stats.allocated_bytes,
        stats.peak_bytes
    );
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("Failed to load registry manifest {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    let backend = match args.memory_budget {
        Some(bytes) => HeadlessBackend::with_memory_budget(bytes),
        None => HeadlessBackend::new(),
    };
    let mut registry = ResourceRegistry::new(backend, &config)?;

    let scene = SandboxScene::new(&mut registry).context("Failed to build the sandbox scene")?;
    for frame in 0..args.frames {
        registry
            .submit(&scene.frame())
            .with_context(|| format!("Failed to submit frame {frame}"))?;
    }
    log::info!("Submitted {} frames", args.frames);
    report(&registry);

    // A destroyed texture must not be reachable through an old id.
    registry.destroy_texture(scene.albedo)?;
    match registry.submit(&scene.frame()) {
        Err(err) => log::info!("Frame with a destroyed texture rejected: {err}"),
        Ok(()) => anyhow::bail!("a destroyed texture was accepted by submit"),
    }

    registry.destroy_all();
    report(&registry);
    Ok(())
}
