use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, BufferBindingType, ColorTargetState,
    CommandEncoder, Device, FragmentState, PipelineCompilationOptions, PipelineLayoutDescriptor,
    PrimitiveState, PrimitiveTopology, Queue, RenderPipeline, SamplerBindingType, ShaderStages,
    TextureFormat, TextureSampleType, TextureViewDimension, VertexState,
};

use crate::media::DecodedFrame;
use crate::overlay::ObjectGeometry;

const OBJECT_QUAD_WGSL: &str = r#"
struct Quad {
    corners: array<vec4f, 4>,
    tint: vec4f,
}

@group(0) @binding(0) var frame_tex: texture_2d<f32>;
@group(0) @binding(1) var frame_sampler: sampler;
@group(0) @binding(2) var<uniform> quad: Quad;

struct VertexOutput {
    @builtin(position) position: vec4f,
    @location(0) uv: vec2f,
}

// strip order: top-left, top-right, bottom-left, bottom-right
@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VertexOutput {
    var out: VertexOutput;
    out.position = vec4f(quad.corners[vi].xy, 0.0, 1.0);
    out.uv = vec2f(f32(vi & 1u), f32(vi >> 1u));
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4f {
    return textureSample(frame_tex, frame_sampler, in.uv) * quad.tint;
}
"#;

/// Tint applied to the blank texture before the first frame arrives.
const PLACEHOLDER_TINT: [f32; 4] = [0.18, 0.18, 0.18, 1.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadUniforms {
    corners: [[f32; 4]; 4],
    tint: [f32; 4],
}

/// Object corners in clip space, in triangle-strip order.
///
/// `viewport` is the surface size in logical points, the same space the
/// geometry lives in.
pub fn quad_corners_ndc(geometry: &ObjectGeometry, viewport: Vec2) -> [[f32; 4]; 4] {
    let viewport = viewport.max(Vec2::ONE);
    let [tl, tr, br, bl] = geometry.corners();
    [tl, tr, bl, br].map(|p| {
        let x = p.x / viewport.x * 2.0 - 1.0;
        let y = 1.0 - p.y / viewport.y * 2.0;
        [x, y, 0.0, 1.0]
    })
}

/// Draws the video object as a textured, rotated quad.
pub struct ObjectRenderer {
    pipeline: RenderPipeline,
    bind_group_layout: BindGroupLayout,
    bind_group: BindGroup,
    sampler: wgpu::Sampler,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    texture_size: (u32, u32),
    has_frame: bool,
}

impl ObjectRenderer {
    pub fn new(device: &Device, queue: &Queue, format: TextureFormat) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("object-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        let (texture, view) = create_frame_texture(device, 1, 1);
        write_frame(queue, &texture, &DecodedFrame::solid(1, 1, [255; 4]));

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object-uniforms"),
            size: std::mem::size_of::<QuadUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // texture(0), sampler(1), uniform(2)
        let bind_group_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("object-bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::VERTEX_FRAGMENT,
                    ty: BindingType::Buffer {
                        ty: BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<QuadUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("object-quad"),
            source: wgpu::ShaderSource::Wgsl(OBJECT_QUAD_WGSL.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("object-quad-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("object-quad-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader_module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader_module,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let bind_group =
            create_bind_group(device, &bind_group_layout, &view, &sampler, &uniform_buffer);

        Self {
            pipeline,
            bind_group_layout,
            bind_group,
            sampler,
            texture,
            view,
            uniform_buffer,
            texture_size: (1, 1),
            has_frame: false,
        }
    }

    /// Upload a decoded frame, reallocating the texture when its size changes.
    pub fn upload_frame(&mut self, device: &Device, queue: &Queue, frame: &DecodedFrame) {
        if !frame.is_well_formed() || frame.width == 0 || frame.height == 0 {
            log::warn!(
                "Skipping malformed frame {}x{} ({} bytes)",
                frame.width,
                frame.height,
                frame.data.len()
            );
            return;
        }
        if self.texture_size != (frame.width, frame.height) {
            let (texture, view) = create_frame_texture(device, frame.width, frame.height);
            self.texture = texture;
            self.view = view;
            self.texture_size = (frame.width, frame.height);
            self.bind_group = create_bind_group(
                device,
                &self.bind_group_layout,
                &self.view,
                &self.sampler,
                &self.uniform_buffer,
            );
            log::debug!("Object texture resized to {}x{}", frame.width, frame.height);
        }
        write_frame(queue, &self.texture, frame);
        self.has_frame = true;
    }

    /// Clear to `background`, then draw the object if there is one.
    pub fn render(
        &self,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        target: &wgpu::TextureView,
        geometry: Option<&ObjectGeometry>,
        viewport: Vec2,
        background: wgpu::Color,
    ) {
        if let Some(geometry) = geometry {
            let uniforms = QuadUniforms {
                corners: quad_corners_ndc(geometry, viewport),
                tint: if self.has_frame {
                    [1.0; 4]
                } else {
                    PLACEHOLDER_TINT
                },
            };
            queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("object-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(background),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if geometry.is_some() {
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..4, 0..1);
        }
    }
}

fn create_frame_texture(device: &Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    // sRGB so sampling converts to linear
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("object-frame"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn write_frame(queue: &Queue, texture: &wgpu::Texture, frame: &DecodedFrame) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &frame.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(frame.width * 4),
            rows_per_image: Some(frame.height),
        },
        wgpu::Extent3d {
            width: frame.width,
            height: frame.height,
            depth_or_array_layers: 1,
        },
    );
}

fn create_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniform_buffer: &wgpu::Buffer,
) -> BindGroup {
    device.create_bind_group(&BindGroupDescriptor {
        label: Some("object-bg"),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(sampler),
            },
            BindGroupEntry {
                binding: 2,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_object_maps_to_clip_corners() {
        let g = ObjectGeometry {
            left: 0.0,
            top: 0.0,
            width: 800.0,
            height: 600.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        };
        let c = quad_corners_ndc(&g, Vec2::new(800.0, 600.0));
        assert_eq!(c[0], [-1.0, 1.0, 0.0, 1.0]);
        assert_eq!(c[1], [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(c[2], [-1.0, -1.0, 0.0, 1.0]);
        assert_eq!(c[3], [1.0, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_viewport_stays_finite() {
        let g = ObjectGeometry {
            left: 10.0,
            top: 10.0,
            width: 10.0,
            height: 10.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 30.0,
        };
        let c = quad_corners_ndc(&g, Vec2::ZERO);
        assert!(c.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn uniform_layout_matches_wgsl() {
        // array<vec4f, 4> + vec4f
        assert_eq!(std::mem::size_of::<QuadUniforms>(), 80);
    }
}
