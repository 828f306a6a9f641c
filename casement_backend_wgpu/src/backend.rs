// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;

use casement_render::{Backend, BackendError, BlendMode};
use kurbo::{Rect, Size};

use crate::vertex::WgpuVertex;

const SHADER: &str = include_str!("shader.wgsl");

/// Format of textures and render targets.
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Configuration for [`WgpuBackend`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WgpuConfig {
    /// Format of the views passed to [`WgpuBackend::set_target`].
    pub surface_format: wgpu::TextureFormat,
    /// Vertices the GPU buffer holds before its first growth.
    pub initial_vertex_capacity: usize,
    /// Colour the target is cleared to at the start of each frame, or
    /// `None` to draw over its contents.
    pub clear_colour: Option<wgpu::Color>,
}

impl WgpuConfig {
    /// A configuration for targets of the given format.
    #[must_use]
    pub fn new(surface_format: wgpu::TextureFormat) -> Self {
        Self {
            surface_format,
            ..Self::default()
        }
    }
}

impl Default for WgpuConfig {
    fn default() -> Self {
        Self {
            surface_format: wgpu::TextureFormat::Bgra8Unorm,
            initial_vertex_capacity: 4096,
            clear_colour: Some(wgpu::Color::TRANSPARENT),
        }
    }
}

/// A GPU texture with the bind group used to sample it.
///
/// Textures keep a CPU copy of the pixels uploaded to them, which is what
/// [`Backend::read_texture`] returns. Pixels drawn into a render target are
/// not copied back, so a target always reads as transparent.
#[derive(Debug)]
pub struct WgpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl WgpuTexture {
    /// The underlying texture.
    #[must_use]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Size in texels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

struct DrawCall {
    vertices: Range<u32>,
    scissor: [u32; 4],
    blend: BlendMode,
    bind_group: wgpu::BindGroup,
}

struct Frame {
    target: Target,
    offscreen: bool,
    display_size: Size,
    clip: Rect,
    blend: BlendMode,
    bound: Option<wgpu::BindGroup>,
    vertices: Vec<WgpuVertex>,
    draws: Vec<DrawCall>,
}

#[derive(Clone)]
struct Target {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// One pipeline per blend mode, for one target format.
struct Pipelines {
    normal: wgpu::RenderPipeline,
    premultiplied: wgpu::RenderPipeline,
}

impl Pipelines {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            normal: create_pipeline(device, layout, shader, format, BlendMode::Normal),
            premultiplied: create_pipeline(
                device,
                layout,
                shader,
                format,
                BlendMode::RttPremultiplied,
            ),
        }
    }

    fn get(&self, mode: BlendMode) -> &wgpu::RenderPipeline {
        match mode {
            BlendMode::Normal => &self.normal,
            BlendMode::RttPremultiplied => &self.premultiplied,
        }
    }
}

/// A [`Backend`] drawing with wgpu.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: WgpuConfig,
    surface_pipelines: Pipelines,
    target_pipelines: Pipelines,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    screen_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    white: WgpuTexture,
    target: Option<Target>,
    frame: Option<Frame>,
}

impl std::fmt::Debug for WgpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuBackend")
            .field("config", &self.config)
            .field("vertex_capacity", &self.vertex_capacity)
            .field("in_frame", &self.frame.is_some())
            .finish_non_exhaustive()
    }
}

impl WgpuBackend {
    /// Creates the pipelines and shared resources on `device`.
    #[must_use]
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, config: WgpuConfig) -> Self {
        let screen_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("casement screen layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("casement texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("casement shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("casement pipeline layout"),
            bind_group_layouts: &[&screen_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let surface_pipelines = Pipelines::new(&device, &layout, &shader, config.surface_format);
        let target_pipelines = Pipelines::new(&device, &layout, &shader, TEXTURE_FORMAT);

        // 16 bytes keeps the uniform aligned: size plus padding.
        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("casement screen uniform"),
            size: 16,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("casement screen bind group"),
            layout: &screen_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("casement sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let vertex_capacity = config.initial_vertex_capacity.max(3);
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        let white = upload_texture(
            &device,
            &queue,
            &texture_layout,
            &sampler,
            1,
            1,
            &[0xFF; 4],
            false,
        );

        Self {
            device,
            queue,
            config,
            surface_pipelines,
            target_pipelines,
            texture_layout,
            sampler,
            screen_buffer,
            screen_bind_group,
            vertex_buffer,
            vertex_capacity,
            white,
            target: None,
            frame: None,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &WgpuConfig {
        &self.config
    }

    /// Vertices the GPU buffer currently holds.
    #[must_use]
    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    /// Sets the view the next frame renders into. `width` and `height` are
    /// the view's size in pixels; scissor rects are clamped to it.
    pub fn set_target(&mut self, view: wgpu::TextureView, width: u32, height: u32) {
        self.target = Some(Target {
            view,
            width,
            height,
        });
    }

    /// Drops the current target view.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    fn frame_mut(&mut self) -> Result<&mut Frame, BackendError> {
        self.frame
            .as_mut()
            .ok_or_else(|| BackendError::Device("no frame in progress".into()))
    }

    fn ensure_vertex_capacity(&mut self, required: usize) {
        if required <= self.vertex_capacity {
            return;
        }
        let grown = self.vertex_capacity + self.vertex_capacity.div_ceil(2);
        self.vertex_capacity = required.max(grown);
        self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
    }

    fn start_frame(
        &mut self,
        target: Target,
        offscreen: bool,
        display_size: Size,
    ) -> Result<(), BackendError> {
        if self.frame.is_some() {
            return Err(BackendError::Device("frame already in progress".into()));
        }
        self.frame = Some(Frame {
            target,
            offscreen,
            display_size,
            clip: display_size.to_rect(),
            blend: BlendMode::Normal,
            bound: None,
            vertices: Vec::new(),
            draws: Vec::new(),
        });
        Ok(())
    }

    fn check_size(width: u32, height: u32, rgba: &[u8]) -> Result<(), BackendError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(BackendError::TextureDataSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(())
    }
}

impl Backend for WgpuBackend {
    type Vertex = WgpuVertex;
    type Texture = WgpuTexture;

    fn begin_frame(&mut self, display_size: Size) -> Result<(), BackendError> {
        let Some(target) = self.target.clone() else {
            return Err(BackendError::Device("no render target set".into()));
        };
        self.start_frame(target, false, display_size)
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<WgpuTexture, BackendError> {
        Self::check_size(width, height, rgba)?;
        if width == 0 || height == 0 {
            return Err(BackendError::Device("zero-sized texture".into()));
        }
        Ok(upload_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            width,
            height,
            rgba,
            false,
        ))
    }

    fn update_texture(
        &mut self,
        texture: &mut WgpuTexture,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), BackendError> {
        Self::check_size(width, height, rgba)?;
        let fits = x
            .checked_add(width)
            .is_some_and(|right| right <= texture.width)
            && y.checked_add(height)
                .is_some_and(|bottom| bottom <= texture.height);
        if !fits {
            return Err(BackendError::InvalidTexture);
        }
        if width == 0 || height == 0 {
            return Ok(());
        }
        write_pixels(&self.queue, &texture.texture, x, y, width, height, rgba);
        let stride = texture.width as usize * 4;
        for (row, src) in rgba.chunks_exact(width as usize * 4).enumerate() {
            let start = (y as usize + row) * stride + x as usize * 4;
            texture.pixels[start..start + src.len()].copy_from_slice(src);
        }
        Ok(())
    }

    fn destroy_texture(&mut self, texture: WgpuTexture) {
        texture.texture.destroy();
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<WgpuTexture, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::Device("zero-sized render target".into()));
        }
        let transparent = vec![0; width as usize * height as usize * 4];
        Ok(upload_texture(
            &self.device,
            &self.queue,
            &self.texture_layout,
            &self.sampler,
            width,
            height,
            &transparent,
            true,
        ))
    }

    fn begin_target_frame(&mut self, target: &WgpuTexture) -> Result<(), BackendError> {
        if !target
            .texture
            .usage()
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
        {
            return Err(BackendError::InvalidTexture);
        }
        let size = Size::new(f64::from(target.width), f64::from(target.height));
        let target = Target {
            view: target.view.clone(),
            width: target.width,
            height: target.height,
        };
        self.start_frame(target, true, size)
    }

    fn read_texture(&mut self, texture: &WgpuTexture) -> Result<Vec<u8>, BackendError> {
        Ok(texture.pixels.clone())
    }

    fn set_clip(&mut self, clip: Rect) -> Result<(), BackendError> {
        self.frame_mut()?.clip = clip;
        Ok(())
    }

    fn set_blend_mode(&mut self, mode: BlendMode) -> Result<(), BackendError> {
        self.frame_mut()?.blend = mode;
        Ok(())
    }

    fn bind_texture(&mut self, texture: Option<&WgpuTexture>) -> Result<(), BackendError> {
        let bound = texture.map(|t| t.bind_group.clone());
        self.frame_mut()?.bound = bound;
        Ok(())
    }

    fn draw_triangles(&mut self, vertices: &[WgpuVertex]) -> Result<(), BackendError> {
        if vertices.len() % 3 != 0 {
            return Err(BackendError::Device(format!(
                "{} vertices do not form whole triangles",
                vertices.len()
            )));
        }
        let white = self.white.bind_group.clone();
        let frame = self.frame_mut()?;
        let Some(scissor) = scissor_rect(frame.clip, frame.target.width, frame.target.height)
        else {
            return Ok(());
        };
        let start = frame.vertices.len();
        frame.vertices.extend_from_slice(vertices);
        let end = frame.vertices.len();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a frame never holds more than u32::MAX vertices"
        )]
        let range = start as u32..end as u32;
        let bind_group = frame.bound.clone().unwrap_or(white);
        frame.draws.push(DrawCall {
            vertices: range,
            scissor,
            blend: frame.blend,
            bind_group,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let frame = self
            .frame
            .take()
            .ok_or_else(|| BackendError::Device("no frame in progress".into()))?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "display sizes fit comfortably in f32"
        )]
        let screen = [
            frame.display_size.width as f32,
            frame.display_size.height as f32,
            0.0_f32,
            0.0_f32,
        ];
        self.queue
            .write_buffer(&self.screen_buffer, 0, bytemuck::cast_slice(&screen));

        self.ensure_vertex_capacity(frame.vertices.len());
        if !frame.vertices.is_empty() {
            self.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&frame.vertices),
            );
        }

        let load = load_op(frame.offscreen, self.config.clear_colour);
        let pipelines = if frame.offscreen {
            &self.target_pipelines
        } else {
            &self.surface_pipelines
        };
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("casement frame"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("casement pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.screen_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for draw in &frame.draws {
                let [x, y, w, h] = draw.scissor;
                pass.set_pipeline(pipelines.get(draw.blend));
                pass.set_bind_group(1, &draw.bind_group, &[]);
                pass.set_scissor_rect(x, y, w, h);
                pass.draw(draw.vertices.clone(), 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}

/// Render targets always start transparent; the display follows the
/// configured clear colour.
fn load_op(offscreen: bool, clear_colour: Option<wgpu::Color>) -> wgpu::LoadOp<wgpu::Color> {
    match (offscreen, clear_colour) {
        (true, _) => wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
        (false, Some(colour)) => wgpu::LoadOp::Clear(colour),
        (false, None) => wgpu::LoadOp::Load,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    mode: BlendMode,
) -> wgpu::RenderPipeline {
    let label = match mode {
        BlendMode::Normal => "casement normal pipeline",
        BlendMode::RttPremultiplied => "casement premultiplied pipeline",
    };
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[WgpuVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend_state(mode)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Blend equations per mode. Alpha accumulates the same way in both so
/// render-to-texture targets stay composable.
fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    let src_colour = match mode {
        BlendMode::Normal => wgpu::BlendFactor::SrcAlpha,
        BlendMode::RttPremultiplied => wgpu::BlendFactor::One,
    };
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: src_colour,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::OneMinusDstAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("casement vertices"),
        size: (capacity * size_of::<WgpuVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[expect(
    clippy::too_many_arguments,
    reason = "the white texture is uploaded before the backend exists"
)]
fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
    rgba: &[u8],
    render_target: bool,
) -> WgpuTexture {
    let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
    if render_target {
        usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("casement texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage,
        view_formats: &[],
    });
    write_pixels(queue, &texture, 0, 0, width, height, rgba);

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("casement texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    WgpuTexture {
        texture,
        view,
        bind_group,
        width,
        height,
        pixels: rgba.to_vec(),
    }
}

fn write_pixels(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    rgba: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x, y, z: 0 },
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

/// Converts a pixel clip into a scissor rect inside the target.
///
/// Returns `None` when nothing of the clip is visible.
fn scissor_rect(clip: Rect, target_width: u32, target_height: u32) -> Option<[u32; 4]> {
    let bounds = Rect::new(0.0, 0.0, f64::from(target_width), f64::from(target_height));
    let visible = clip.intersect(bounds).expand();
    if visible.width() <= 0.0 || visible.height() <= 0.0 {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the rect is clamped to the target, so every edge fits in u32"
    )]
    let [x0, y0, x1, y1] = [visible.x0, visible.y0, visible.x1, visible.y1].map(|v| v as u32);
    Some([x0, y0, x1 - x0, y1 - y0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_rounds_outward() {
        let clip = Rect::new(10.5, 20.25, 30.75, 40.0);
        assert_eq!(scissor_rect(clip, 100, 100), Some([10, 20, 21, 20]));
    }

    #[test]
    fn scissor_clamps_to_target() {
        let clip = Rect::new(-20.0, -5.0, 500.0, 50.0);
        assert_eq!(scissor_rect(clip, 320, 240), Some([0, 0, 320, 50]));
    }

    #[test]
    fn offscreen_clip_has_no_scissor() {
        assert_eq!(scissor_rect(Rect::new(400.0, 0.0, 500.0, 10.0), 320, 240), None);
        assert_eq!(scissor_rect(Rect::new(5.0, 5.0, 5.0, 50.0), 320, 240), None);
    }

    #[test]
    fn blend_modes_differ_only_in_colour_source() {
        let normal = blend_state(BlendMode::Normal);
        let premultiplied = blend_state(BlendMode::RttPremultiplied);
        assert_eq!(normal.alpha, premultiplied.alpha);
        assert_eq!(normal.color.dst_factor, premultiplied.color.dst_factor);
        assert_eq!(premultiplied.color.src_factor, wgpu::BlendFactor::One);
    }

    #[test]
    fn target_frames_ignore_the_clear_colour() {
        assert_eq!(
            load_op(true, None),
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT)
        );
        assert_eq!(
            load_op(true, Some(wgpu::Color::RED)),
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT)
        );
        assert_eq!(
            load_op(false, Some(wgpu::Color::RED)),
            wgpu::LoadOp::Clear(wgpu::Color::RED)
        );
        assert_eq!(load_op(false, None), wgpu::LoadOp::Load);
    }

    #[test]
    fn default_config_clears_to_transparent() {
        let config = WgpuConfig::new(wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(config.surface_format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(config.clear_colour, Some(wgpu::Color::TRANSPARENT));
        assert_eq!(config.initial_vertex_capacity, 4096);
    }
}
