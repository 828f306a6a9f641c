// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer: a backend, its textures and the frame's render queue.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use casement_core::collab::DecodedImage;
use casement_core::trace::{
    BufferGrowthFailedEvent, FrameBeginEvent, FrameEndEvent, FrameSummary, FrameSummaryBuilder,
    TraceSink, Tracer,
};
use kurbo::{Rect, Size};

use crate::backend::{Backend, BackendError, rgba_len};
use crate::batch::{BlendMode, GeometryBatch};
use crate::colour::ColourRect;
use crate::error::RenderError;
use crate::queue::{QuadSplitMode, RenderQueue};
use crate::texture::{TextureId, TextureStore};
use crate::vertex::Vertex;

/// Renderer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RendererConfig {
    /// Initial display size in pixels.
    pub display_size: Size,
    /// Maximum vertices per batch, or `None` for no limit.
    pub max_batch_vertices: Option<usize>,
    /// Diagonal quads are split along.
    pub quad_split: QuadSplitMode,
    /// Offset added to quad positions so texels map onto pixel centres.
    /// Direct3D 9 style rasterizers need `-0.5`.
    pub texel_offset: f32,
}

impl RendererConfig {
    /// Settings for GL-family and modern backends.
    #[must_use]
    pub const fn gl() -> Self {
        Self {
            display_size: Size::new(1280.0, 720.0),
            max_batch_vertices: None,
            quad_split: QuadSplitMode::TopLeftToBottomRight,
            texel_offset: 0.0,
        }
    }

    /// Settings for Direct3D 9 style backends.
    #[must_use]
    pub const fn d3d9() -> Self {
        Self {
            texel_offset: -0.5,
            ..Self::gl()
        }
    }

    /// Same configuration with a different display size.
    #[must_use]
    pub const fn with_display_size(mut self, display_size: Size) -> Self {
        self.display_size = display_size;
        self
    }

    /// Same configuration with a batch vertex limit.
    #[must_use]
    pub const fn with_max_batch_vertices(mut self, max: usize) -> Self {
        self.max_batch_vertices = Some(max);
        self
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::gl()
    }
}

/// Owns a [`Backend`], the textures created through it and the frame's
/// [`RenderQueue`].
///
/// Batches refer to textures by [`TextureId`] and never own them; destroying
/// a texture that queued or cached batches still use makes their next draw
/// fail with [`RenderError::UnknownTexture`].
pub struct Renderer<B: Backend> {
    backend: B,
    config: RendererConfig,
    queue: RenderQueue<B::Vertex>,
    textures: TextureStore<B::Texture>,
    display_size: Size,
    frame_index: u64,
    summary: FrameSummaryBuilder,
    grabbed: Vec<(TextureId, Vec<u8>)>,
    trace_sink: Option<Box<dyn TraceSink>>,
}

impl<B: Backend + core::fmt::Debug> core::fmt::Debug for Renderer<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Renderer")
            .field("backend", &self.backend)
            .field("config", &self.config)
            .field("batches", &self.queue.batch_count())
            .field("textures", &self.textures.len())
            .field("display_size", &self.display_size)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink.as_deref_mut() {
        Some(sink) => Tracer::new(sink),
        None => Tracer::none(),
    }
}

fn display_rect(size: Size) -> Rect {
    Rect::from_origin_size((0.0, 0.0), size)
}

impl<B: Backend> Renderer<B> {
    /// Creates a renderer drawing through `backend`.
    #[must_use]
    pub fn new(backend: B, config: RendererConfig) -> Self {
        Self {
            backend,
            config,
            queue: RenderQueue::new(display_rect(config.display_size))
                .with_batch_limit(config.max_batch_vertices),
            textures: TextureStore::new(),
            display_size: config.display_size,
            frame_index: 0,
            summary: FrameSummaryBuilder::new(1),
            grabbed: Vec::new(),
            trace_sink: None,
        }
    }

    /// The configuration the renderer was created with.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// The backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The frame's queued geometry.
    #[must_use]
    pub fn queue(&self) -> &RenderQueue<B::Vertex> {
        &self.queue
    }

    /// Installs a diagnostics sink.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace_sink = Some(sink);
    }

    /// Removes and returns the diagnostics sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace_sink.take()
    }

    // -- Display --

    /// The display size in pixels.
    #[must_use]
    pub fn display_size(&self) -> Size {
        self.display_size
    }

    /// Changes the display size; the root clip follows it.
    pub fn set_display_size(&mut self, size: Size) {
        self.display_size = size;
        self.queue.set_root_clip(display_rect(size));
    }

    // -- Geometry --

    /// Queues a quad, applying the configured split and texel offset.
    ///
    /// `tex_rect` is in normalized texture coordinates.
    pub fn add_quad(
        &mut self,
        dest: Rect,
        z: f32,
        texture: Option<TextureId>,
        tex_rect: Rect,
        colours: &ColourRect,
    ) -> Result<(), RenderError> {
        let offset = f64::from(self.config.texel_offset);
        let dest = dest + kurbo::Vec2::new(offset, offset);
        let split = self.config.quad_split;
        #[cfg(feature = "trace-rich")]
        let before = self.open_batch_capacity();
        let result = self
            .queue
            .add_quad(dest, z, texture, tex_rect, colours, split);
        #[cfg(feature = "trace-rich")]
        self.trace_growth(before, &result);
        self.observe(result)
    }

    /// Queues one triangle. Positions are used as given.
    pub fn add_triangle(
        &mut self,
        texture: Option<TextureId>,
        vertices: &[Vertex; 3],
    ) -> Result<(), RenderError> {
        #[cfg(feature = "trace-rich")]
        let before = self.open_batch_capacity();
        let result = self.queue.add_triangle(texture, vertices);
        #[cfg(feature = "trace-rich")]
        self.trace_growth(before, &result);
        self.observe(result)
    }

    /// Queues a render target as a quad covering `dest`, blended as
    /// premultiplied colour.
    ///
    /// The blend mode for later geometry is left as it was.
    pub fn add_texture_target_quad(
        &mut self,
        dest: Rect,
        z: f32,
        target: TextureId,
        colours: &ColourRect,
    ) -> Result<(), RenderError> {
        self.check_target(target)?;
        let previous = self.queue.blend_mode();
        self.queue.set_blend_mode(BlendMode::RttPremultiplied);
        let result = self.add_quad(dest, z, Some(target), Rect::new(0.0, 0.0, 1.0, 1.0), colours);
        self.queue.set_blend_mode(previous);
        result
    }

    /// Queues a deep copy of a cached batch.
    pub fn append_batch(&mut self, batch: &GeometryBatch<B::Vertex>) {
        self.queue.append_batch(batch);
    }

    /// Forces the next submission into a new batch.
    pub fn break_batch(&mut self) {
        self.queue.break_batch();
    }

    /// Pushes a clip rectangle, intersected with the current one.
    pub fn push_clip(&mut self, clip: Rect) {
        self.queue.push_clip(clip);
    }

    /// Pops the innermost clip rectangle.
    pub fn pop_clip(&mut self) -> Option<Rect> {
        self.queue.pop_clip()
    }

    /// Sets the blend mode for subsequent geometry.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.queue.set_blend_mode(mode);
    }

    /// Number of queued batches.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.queue.batch_count()
    }

    /// Discards the queued geometry. Textures are untouched.
    pub fn clear_render_queue(&mut self) {
        self.queue.clear();
    }

    /// Batch count and capacity of the open batch, for growth tracing.
    #[cfg(feature = "trace-rich")]
    fn open_batch_capacity(&self) -> (usize, usize) {
        let capacity = self.queue.batches().last().map_or(0, GeometryBatch::capacity);
        (self.queue.batch_count(), capacity)
    }

    #[cfg(feature = "trace-rich")]
    fn trace_growth(&mut self, before: (usize, usize), result: &Result<(), RenderError>) {
        if result.is_err() {
            return;
        }
        let (count, capacity) = self.open_batch_capacity();
        let old_capacity = if count == before.0 { before.1 } else { 0 };
        if capacity != old_capacity {
            tracer(&mut self.trace_sink).buffer_grown(&casement_core::trace::BufferGrownEvent {
                old_capacity: u32::try_from(old_capacity).unwrap_or(u32::MAX),
                new_capacity: u32::try_from(capacity).unwrap_or(u32::MAX),
            });
        }
    }

    fn observe(&mut self, result: Result<(), RenderError>) -> Result<(), RenderError> {
        if let Err(RenderError::OutOfMemory { required, capacity }) = &result {
            tracer(&mut self.trace_sink).buffer_growth_failed(&BufferGrowthFailedEvent {
                required: *required as u64,
                old_capacity: u32::try_from(*capacity).unwrap_or(u32::MAX),
            });
        }
        result
    }

    // -- Textures --

    /// Creates a texture from tightly packed RGBA8 pixels.
    pub fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<TextureId, RenderError> {
        check_len(width, height, rgba)?;
        let native = self.backend.create_texture(width, height, rgba)?;
        Ok(self.textures.insert(native, width, height))
    }

    /// Creates a texture from a decoded image, converting it to RGBA8.
    pub fn create_texture_from_image(
        &mut self,
        image: &DecodedImage,
    ) -> Result<TextureId, RenderError> {
        let rgba = image.to_rgba8();
        self.create_texture(image.width, image.height, &rgba)
    }

    /// Replaces a region of a texture.
    pub fn update_texture(
        &mut self,
        texture: TextureId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), RenderError> {
        check_len(width, height, rgba)?;
        let native = self
            .textures
            .get_mut(texture)
            .ok_or(RenderError::UnknownTexture(texture))?;
        self.backend
            .update_texture(native, x, y, width, height, rgba)?;
        Ok(())
    }

    /// Creates a transparent render target. It is drawn into with
    /// [`render_to_texture`](Self::render_to_texture) and sampled like any
    /// other texture.
    pub fn create_texture_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<TextureId, RenderError> {
        let native = self.backend.create_render_target(width, height)?;
        Ok(self.textures.insert_target(native, width, height))
    }

    /// Whether the texture is a render target.
    #[must_use]
    pub fn is_texture_target(&self, texture: TextureId) -> bool {
        self.textures.is_target(texture)
    }

    /// The native handle of a texture.
    #[must_use]
    pub fn native_texture(&self, texture: TextureId) -> Option<&B::Texture> {
        self.textures.get(texture)
    }

    /// Destroys a texture.
    ///
    /// Returns [`RenderError::UnknownTexture`] if it was already destroyed.
    pub fn destroy_texture(&mut self, texture: TextureId) -> Result<(), RenderError> {
        let native = self
            .textures
            .remove(texture)
            .ok_or(RenderError::UnknownTexture(texture))?;
        self.backend.destroy_texture(native);
        Ok(())
    }

    /// Destroys every texture.
    pub fn destroy_all_textures(&mut self) {
        for native in self.textures.drain() {
            self.backend.destroy_texture(native);
        }
    }

    /// The size of a texture in pixels.
    #[must_use]
    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures.size(texture)
    }

    /// Whether the texture exists.
    #[must_use]
    pub fn is_texture_present(&self, texture: TextureId) -> bool {
        self.textures.contains(texture)
    }

    fn check_target(&self, texture: TextureId) -> Result<(), RenderError> {
        if !self.textures.contains(texture) {
            Err(RenderError::UnknownTexture(texture))
        } else if !self.textures.is_target(texture) {
            Err(RenderError::NotATarget(texture))
        } else {
            Ok(())
        }
    }

    // -- Device loss --

    /// Reads every texture back so that it can be recreated on a new device.
    ///
    /// Render targets are not read; they come back transparent. Copies from
    /// an earlier grab are replaced.
    pub fn grab_textures(&mut self) -> Result<(), RenderError> {
        self.grabbed.clear();
        let ids: Vec<TextureId> = self.textures.ids().collect();
        for id in ids {
            if self.textures.is_target(id) {
                continue;
            }
            let native = self.textures.get(id).ok_or(RenderError::UnknownTexture(id))?;
            let pixels = self.backend.read_texture(native)?;
            self.grabbed.push((id, pixels));
        }
        Ok(())
    }

    /// Swaps in a backend on a new device and returns the old one.
    ///
    /// Textures still hold handles from the old device until
    /// [`restore_textures`](Self::restore_textures) recreates them.
    pub fn replace_backend(&mut self, backend: B) -> B {
        core::mem::replace(&mut self.backend, backend)
    }

    /// Recreates every texture on the current backend, keeping its
    /// [`TextureId`].
    ///
    /// Textures are filled from the last [`grab_textures`](Self::grab_textures);
    /// ones created after it, and render targets, come back transparent. The
    /// old handles are dropped without being passed to `destroy_texture`,
    /// since they belong to the old device.
    pub fn restore_textures(&mut self) -> Result<(), RenderError> {
        let mut grabbed = core::mem::take(&mut self.grabbed);
        let ids: Vec<TextureId> = self.textures.ids().collect();
        for id in ids {
            let (width, height) = self.textures.size(id).ok_or(RenderError::UnknownTexture(id))?;
            let native = if self.textures.is_target(id) {
                self.backend.create_render_target(width, height)?
            } else {
                let pixels = match grabbed.iter().position(|(g, _)| *g == id) {
                    Some(pos) => grabbed.swap_remove(pos).1,
                    None => vec![0; rgba_len(width, height)],
                };
                self.backend.create_texture(width, height, &pixels)?
            };
            drop(self.textures.replace(id, native));
        }
        Ok(())
    }

    // -- Frames --

    /// Records a window visited by the draw path for the next summary.
    pub(crate) fn record_window(&mut self, from_cache: bool) {
        self.summary.record_window(from_cache);
    }

    /// Flushes the queued batches to the backend in submission order.
    ///
    /// The queue is left intact so that an unchanged frame can be rendered
    /// again; call [`clear_render_queue`](Self::clear_render_queue) before
    /// building the next one. A failing batch aborts the frame: the backend
    /// frame is ended and the batch's error returned.
    pub fn render(&mut self) -> Result<FrameSummary, RenderError> {
        let (frame_index, summary) = self.start_frame();
        self.backend.begin_frame(self.display_size)?;
        self.flush(frame_index, summary)
    }

    /// Flushes the queued batches into a render target instead of the
    /// display. Otherwise the same as [`render`](Self::render).
    ///
    /// The target starts out transparent. Geometry is positioned in the
    /// target's pixels, and the queue must not sample the target itself.
    pub fn render_to_texture(&mut self, target: TextureId) -> Result<FrameSummary, RenderError> {
        self.check_target(target)?;
        let (frame_index, summary) = self.start_frame();
        let native = self
            .textures
            .get(target)
            .ok_or(RenderError::UnknownTexture(target))?;
        self.backend.begin_target_frame(native)?;
        self.flush(frame_index, summary)
    }

    fn start_frame(&mut self) -> (u64, FrameSummaryBuilder) {
        self.frame_index += 1;
        let frame_index = self.frame_index;
        // The pending builder was created for this frame index.
        let summary = core::mem::replace(
            &mut self.summary,
            FrameSummaryBuilder::new(frame_index + 1),
        );
        tracer(&mut self.trace_sink).frame_begin(&FrameBeginEvent {
            frame_index,
            queued_batches: u32::try_from(self.queue.batch_count()).unwrap_or(u32::MAX),
        });
        (frame_index, summary)
    }

    fn flush(
        &mut self,
        frame_index: u64,
        mut summary: FrameSummaryBuilder,
    ) -> Result<FrameSummary, RenderError> {
        #[cfg(feature = "trace-rich")]
        let mut batch_index = 0_u32;
        for batch in self.queue.batches() {
            if let Err(err) = batch.draw(&mut self.backend, &self.textures) {
                self.backend.end_frame()?;
                return Err(err);
            }
            summary.record_batch(batch.vertex_count());
            #[cfg(feature = "trace-rich")]
            {
                tracer(&mut self.trace_sink).batch_flushed(
                    &casement_core::trace::BatchFlushedEvent {
                        frame_index,
                        batch_index,
                        texture: batch.texture().map(TextureId::index),
                        vertex_count: u32::try_from(batch.vertex_count()).unwrap_or(u32::MAX),
                    },
                );
                batch_index += 1;
            }
        }

        self.backend.end_frame()?;
        let summary = summary.finish();
        let mut tracer = tracer(&mut self.trace_sink);
        tracer.frame_end(&FrameEndEvent { frame_index });
        tracer.frame_summary(&summary);
        Ok(summary)
    }
}

fn check_len(width: u32, height: u32, rgba: &[u8]) -> Result<(), RenderError> {
    let expected = rgba_len(width, height);
    if rgba.len() == expected {
        Ok(())
    } else {
        Err(BackendError::TextureDataSize {
            expected,
            actual: rgba.len(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use casement_core::collab::PixelFormat;

    use super::*;
    use crate::colour::Colour;
    use crate::layout::{D3d9Vertex, D3d10Vertex, GlVertex, IrrlichtVertex};
    use crate::recording::{Command, RecordingBackend};
    use crate::vertex::NativeVertex;

    fn renderer<V: NativeVertex>(config: RendererConfig) -> Renderer<RecordingBackend<V>> {
        Renderer::new(
            RecordingBackend::new(),
            config.with_display_size(Size::new(200.0, 100.0)),
        )
    }

    fn unit() -> Rect {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }

    fn white() -> ColourRect {
        ColourRect::uniform(Colour::WHITE)
    }

    /// Draws a small scene: two textures, a clip and a triangle.
    fn scene<V: NativeVertex>() -> Vec<Command<Vertex>> {
        let mut r = renderer::<V>(RendererConfig::gl());
        let a = r.create_texture(1, 1, &[255; 4]).unwrap();
        let b = r.create_texture(2, 1, &[0; 8]).unwrap();
        let colours = ColourRect::vertical(
            Colour::from_argb(0xFF10_2030),
            Colour::from_argb(0x8040_5060),
        );
        r.add_quad(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, Some(a), unit(), &colours)
            .unwrap();
        r.push_clip(Rect::new(5.0, 5.0, 50.0, 50.0));
        r.add_quad(Rect::new(0.0, 0.0, 20.0, 20.0), 0.5, Some(b), unit(), &white())
            .unwrap();
        r.pop_clip();
        let tri = Vertex::new([1.0, 2.0, 0.0], Colour::from_argb(0x7F00_FF00), [0.0, 0.0]);
        r.add_triangle(Some(a), &[tri; 3]).unwrap();
        r.render().unwrap();
        r.backend().neutral_commands()
    }

    #[test]
    fn every_layout_produces_the_same_command_stream() {
        let reference = scene::<Vertex>();
        assert_eq!(scene::<GlVertex>(), reference, "gl");
        assert_eq!(scene::<D3d9Vertex>(), reference, "d3d9");
        assert_eq!(scene::<D3d10Vertex>(), reference, "d3d10");
        assert_eq!(scene::<IrrlichtVertex>(), reference, "irrlicht");

        let draws = reference
            .iter()
            .filter(|c| matches!(c, Command::DrawTriangles(_)))
            .count();
        assert_eq!(draws, 3, "texture switch back to A opens a third batch");
    }

    #[test]
    fn render_flushes_in_submission_order_and_keeps_the_queue() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        r.add_quad(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, None, unit(), &white())
            .unwrap();
        r.add_quad(Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, None, unit(), &white())
            .unwrap();
        let summary = r.render().unwrap();
        assert_eq!(summary.frame_index, 1);
        assert_eq!(summary.batches, 1);
        assert_eq!(summary.vertices, 12);

        let commands = r.backend().commands();
        assert_eq!(commands.first(), Some(&Command::BeginFrame(Size::new(200.0, 100.0))));
        assert_eq!(commands.last(), Some(&Command::EndFrame));

        assert_eq!(r.render().unwrap().frame_index, 2);
        assert_eq!(r.batch_count(), 1, "render does not consume the queue");
        r.clear_render_queue();
        assert_eq!(r.render().unwrap().batches, 0);
    }

    #[test]
    fn texel_offset_shifts_quads() {
        let mut r = renderer::<D3d9Vertex>(RendererConfig::d3d9());
        r.add_quad(Rect::new(10.0, 20.0, 30.0, 40.0), 0.0, None, unit(), &white())
            .unwrap();
        let first = r.queue().batches()[0].vertices()[0];
        assert_eq!(first.position, [9.5, 19.5, 0.0]);
        assert_eq!(first.tex, [0.0, 0.0], "texture coordinates are not offset");
    }

    #[test]
    fn images_are_uploaded_as_rgba() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        let image = DecodedImage::new(vec![1, 2, 3, 4, 5, 6], 2, 1, PixelFormat::Rgb8).unwrap();
        let tex = r.create_texture_from_image(&image).unwrap();
        assert_eq!(r.texture_size(tex), Some((2, 1)));
        assert_eq!(
            r.backend().commands(),
            [Command::CreateTexture {
                id: 0,
                width: 2,
                height: 1
            }]
        );
    }

    #[test]
    fn texture_data_must_match_dimensions() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        assert_eq!(
            r.create_texture(2, 2, &[0; 4]),
            Err(RenderError::Backend(BackendError::TextureDataSize {
                expected: 16,
                actual: 4
            }))
        );
        let tex = r.create_texture(2, 2, &[0; 16]).unwrap();
        r.update_texture(tex, 0, 0, 1, 1, &[7; 4]).unwrap();
        assert!(r.update_texture(tex, 0, 0, 2, 2, &[7; 4]).is_err());
    }

    #[test]
    fn destroyed_textures_fail_the_frame_but_end_it() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        let tex = r.create_texture(1, 1, &[0; 4]).unwrap();
        r.add_quad(Rect::new(0.0, 0.0, 1.0, 1.0), 0.0, Some(tex), unit(), &white())
            .unwrap();
        r.destroy_texture(tex).unwrap();
        assert_eq!(r.destroy_texture(tex), Err(RenderError::UnknownTexture(tex)));
        assert_eq!(r.render(), Err(RenderError::UnknownTexture(tex)));
        assert_eq!(r.backend().commands().last(), Some(&Command::EndFrame));

        r.clear_render_queue();
        r.render().unwrap();
    }

    #[test]
    fn device_failures_surface_as_backend_errors() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        r.add_quad(Rect::new(0.0, 0.0, 1.0, 1.0), 0.0, None, unit(), &white())
            .unwrap();
        r.backend_mut().fail_next_draw(BackendError::DeviceLost);
        assert_eq!(r.render(), Err(RenderError::Backend(BackendError::DeviceLost)));
        assert_eq!(r.render().unwrap().batches, 1, "next frame works");
    }

    #[test]
    fn display_size_drives_the_root_clip() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        r.set_display_size(Size::new(50.0, 40.0));
        r.add_quad(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0, None, unit(), &white())
            .unwrap();
        assert_eq!(r.queue().batches()[0].clip(), Rect::new(0.0, 0.0, 50.0, 40.0));
        assert_eq!(r.display_size(), Size::new(50.0, 40.0));
    }

    #[test]
    fn destroy_all_textures_returns_them_to_the_backend() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        let a = r.create_texture(1, 1, &[0; 4]).unwrap();
        r.create_texture(1, 1, &[0; 4]).unwrap();
        assert_eq!(r.backend().live_texture_count(), 2);
        r.destroy_all_textures();
        assert_eq!(r.backend().live_texture_count(), 0);
        assert!(!r.is_texture_present(a));
    }

    #[test]
    fn targets_render_offscreen_and_composite_premultiplied() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        let target = r.create_texture_target(64, 32).unwrap();
        assert!(r.is_texture_target(target));
        assert_eq!(r.texture_size(target), Some((64, 32)));

        r.add_quad(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, None, unit(), &white())
            .unwrap();
        assert_eq!(r.render_to_texture(target).unwrap().batches, 1);
        r.clear_render_queue();

        r.add_texture_target_quad(Rect::new(0.0, 0.0, 64.0, 32.0), 0.0, target, &white())
            .unwrap();
        r.add_quad(Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, None, unit(), &white())
            .unwrap();
        let batches = r.queue().batches();
        assert_eq!(batches[0].blend_mode(), BlendMode::RttPremultiplied);
        assert_eq!(batches[1].blend_mode(), BlendMode::Normal, "blend mode restored");
        r.render().unwrap();

        let commands = r.backend().commands();
        assert_eq!(
            commands[0],
            Command::CreateRenderTarget {
                id: 0,
                width: 64,
                height: 32
            }
        );
        assert_eq!(commands[1], Command::BeginTargetFrame(0));
        assert!(commands.contains(&Command::BindTexture(Some(0))));
    }

    #[test]
    fn only_live_targets_are_rendered_into() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        let tex = r.create_texture(1, 1, &[0; 4]).unwrap();
        assert_eq!(r.render_to_texture(tex), Err(RenderError::NotATarget(tex)));
        assert_eq!(
            r.add_texture_target_quad(unit(), 0.0, tex, &white()),
            Err(RenderError::NotATarget(tex))
        );
        assert!(r.queue().is_empty());

        let target = r.create_texture_target(4, 4).unwrap();
        r.destroy_texture(target).unwrap();
        assert_eq!(
            r.render_to_texture(target),
            Err(RenderError::UnknownTexture(target))
        );
        assert_eq!(r.render().unwrap().frame_index, 1, "rejected frames are not counted");
    }

    #[test]
    fn textures_survive_a_device_swap() {
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        let image = r.create_texture(1, 1, &[1, 2, 3, 4]).unwrap();
        let target = r.create_texture_target(2, 2).unwrap();
        r.add_quad(Rect::new(0.0, 0.0, 1.0, 1.0), 0.0, Some(image), unit(), &white())
            .unwrap();
        r.backend_mut().fail_next_draw(BackendError::DeviceLost);
        assert_eq!(r.render(), Err(RenderError::Backend(BackendError::DeviceLost)));

        r.grab_textures().unwrap();
        let late = r.create_texture(1, 1, &[9; 4]).unwrap();
        let old = r.replace_backend(RecordingBackend::new());
        assert_eq!(old.live_texture_count(), 3);
        r.restore_textures().unwrap();

        assert_eq!(r.backend().live_texture_count(), 3);
        assert_eq!(old.live_texture_count(), 3, "old handles are dropped, not destroyed");
        let pixels = |id| r.native_texture(id).map(|t| t.pixels.clone());
        assert_eq!(pixels(image), Some(vec![1, 2, 3, 4]));
        assert_eq!(pixels(late), Some(vec![0; 4]), "not grabbed, so blank");
        assert!(r.is_texture_target(target));
        assert_eq!(
            r.backend().commands(),
            [
                Command::CreateTexture {
                    id: 0,
                    width: 1,
                    height: 1
                },
                Command::CreateRenderTarget {
                    id: 1,
                    width: 2,
                    height: 2
                },
                Command::CreateTexture {
                    id: 2,
                    width: 1,
                    height: 1
                },
            ]
        );

        r.render().unwrap();
        assert!(r.backend().commands().contains(&Command::BindTexture(Some(0))));
    }

    #[cfg(feature = "trace-rich")]
    #[test]
    fn rich_tracing_reports_growth_and_batch_order() {
        use alloc::rc::Rc;
        use core::cell::RefCell;

        use casement_core::trace::{BatchFlushedEvent, BufferGrownEvent};

        #[derive(Default)]
        struct Log {
            grown: Vec<(u32, u32)>,
            flushed: Vec<u32>,
        }
        struct Sink(Rc<RefCell<Log>>);
        impl TraceSink for Sink {
            fn on_buffer_grown(&mut self, e: &BufferGrownEvent) {
                self.0.borrow_mut().grown.push((e.old_capacity, e.new_capacity));
            }
            fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
                self.0.borrow_mut().flushed.push(e.batch_index);
            }
        }

        let log = Rc::new(RefCell::new(Log::default()));
        let mut r = renderer::<Vertex>(RendererConfig::gl());
        r.set_trace_sink(Box::new(Sink(log.clone())));
        r.add_quad(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, None, unit(), &white())
            .unwrap();
        r.add_quad(Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, None, unit(), &white())
            .unwrap();
        r.push_clip(Rect::new(0.0, 0.0, 4.0, 4.0));
        r.add_quad(Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, None, unit(), &white())
            .unwrap();
        r.render().unwrap();

        let log = log.borrow();
        assert_eq!(log.flushed, [0, 1]);
        assert_eq!(log.grown.len(), 3);
        assert_eq!(log.grown[0].0, 0, "first batch starts empty");
        assert_eq!(log.grown[1].0, log.grown[0].1, "same batch grows again");
        assert_eq!(log.grown[2].0, 0, "clip change opens a new batch");
    }
}
