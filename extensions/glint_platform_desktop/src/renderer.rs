//! wgpu presentation of a [`DrawList`]
//!
//! Every rect becomes two triangles in a single vertex buffer drawn by one
//! solid-color pipeline. Colors are passed through unchanged, so the surface
//! prefers a non-sRGB format.

use bytemuck::{Pod, Zeroable};
use glint_platform::{DrawCommand, DrawList, PlatformError, Rect, Result};

const SHADER: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) color: vec4<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4<f32>(position, 0.0, 1.0);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

const CURSOR_SIZE: f32 = 8.0;
const CURSOR_COLOR: [u8; 4] = [255, 255, 255, 255];

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

fn normalize(color: [u8; 4]) -> [f32; 4] {
    color.map(|c| c as f32 / 255.0)
}

/// Triangles for every visible command, in clip space for a `width` x
/// `height` surface
pub fn tessellate(list: &DrawList, width: u32, height: u32) -> Vec<Vertex> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let (w, h) = (width as f32, height as f32);
    let mut vertices = Vec::with_capacity(list.commands.len() * 6);
    let mut push_rect = |rect: Rect, color: [u8; 4]| {
        if rect.is_empty() || color[3] == 0 {
            return;
        }
        let color = normalize(color);
        let x0 = rect.x / w * 2.0 - 1.0;
        let x1 = rect.right() / w * 2.0 - 1.0;
        let y0 = 1.0 - rect.y / h * 2.0;
        let y1 = 1.0 - rect.bottom() / h * 2.0;
        for position in [[x0, y0], [x0, y1], [x1, y1], [x0, y0], [x1, y1], [x1, y0]] {
            vertices.push(Vertex { position, color });
        }
    };
    for command in &list.commands {
        match command {
            DrawCommand::Rect { rect, color } => push_rect(*rect, *color),
            DrawCommand::Cursor { x, y } => {
                push_rect(Rect::new(*x, *y, CURSOR_SIZE, CURSOR_SIZE), CURSOR_COLOR)
            }
        }
    }
    vertices
}

/// GPU device, pipeline and surface configuration
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    config: wgpu::SurfaceConfiguration,
    vertex_buffer: Option<wgpu::Buffer>,
}

impl Renderer {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
        (width, height): (u32, u32),
        present_mode: wgpu::PresentMode,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| PlatformError::Loader("no compatible GPU adapter".to_string()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Glint Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                },
                None,
            )
            .await
            .map_err(|e| PlatformError::Loader(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| PlatformError::ContextCreation("surface has no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Glint Solid Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Glint Solid Pipeline Layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Glint Solid Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        tracing::info!(
            "GPU ready: {} ({:?}), surface {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            format
        );
        Ok(Self {
            device,
            queue,
            pipeline,
            config,
            vertex_buffer: None,
        })
    }

    pub fn resize(&mut self, surface: &wgpu::Surface<'static>, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        surface.configure(&self.device, &self.config);
    }

    pub fn set_present_mode(&mut self, surface: &wgpu::Surface<'static>, mode: wgpu::PresentMode) {
        if self.config.present_mode != mode {
            self.config.present_mode = mode;
            surface.configure(&self.device, &self.config);
        }
    }

    pub fn render(&mut self, surface: &wgpu::Surface<'static>, list: &DrawList) -> Result<()> {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("Surface timed out; skipping frame");
                return Ok(());
            }
            Err(e) => return Err(PlatformError::Present(e.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let vertices = tessellate(list, self.config.width, self.config.height);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        if !vertices.is_empty() {
            let needs_buffer = self
                .vertex_buffer
                .as_ref()
                .map_or(true, |buffer| buffer.size() < bytes.len() as u64);
            if needs_buffer {
                self.vertex_buffer = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Glint Vertices"),
                    size: (bytes.len() as u64).next_power_of_two(),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                }));
            }
        }

        let clear = normalize(list.clear_color);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glint Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Glint Frame"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: clear[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let (false, Some(buffer)) = (vertices.is_empty(), self.vertex_buffer.as_ref()) {
                self.queue.write_buffer(buffer, 0, bytes);
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, buffer.slice(..bytes.len() as u64));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_surface_rect_covers_clip_space() {
        let mut list = DrawList::new([0, 0, 0, 255]);
        list.push_rect(Rect::new(0.0, 0.0, 100.0, 50.0), [255, 0, 0, 255]);
        let vertices = tessellate(&list, 100, 50);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[2].position, [1.0, -1.0]);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_invisible_commands_are_skipped() {
        let mut list = DrawList::new([0, 0, 0, 255]);
        list.push_rect(Rect::new(0.0, 0.0, 0.0, 10.0), [255, 0, 0, 255]);
        list.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0), [255, 0, 0, 0]);
        list.push_cursor(5.0, 5.0);
        assert_eq!(tessellate(&list, 100, 100).len(), 6);
        assert!(tessellate(&list, 0, 100).is_empty());
    }
}
