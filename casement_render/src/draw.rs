// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window draw path.
//!
//! [`draw_tree`] walks the tree's draw order (parents before children,
//! siblings back to front) and, for every visible window:
//!
//! 1. fires `StartRender`,
//! 2. pushes the window's clipped pixel rectangle as the clip,
//! 3. replays the window's cached batches, or asks the [`WindowPainter`] to
//!    paint it and caches what it produced,
//! 4. pops the clip and fires `EndRender`.
//!
//! Painters draw through a [`PaintContext`], which multiplies every colour by
//! the window's effective alpha.

use alloc::vec::Vec;

use casement_core::event::EventArgs;
use casement_core::window::{TreeChanges, WindowEvent, WindowId, WindowTree};
use kurbo::Rect;

use crate::backend::Backend;
use crate::cache::GeometryCache;
use crate::colour::{Colour, ColourRect};
use crate::error::RenderError;
use crate::renderer::Renderer;
use crate::texture::TextureId;
use crate::vertex::Vertex;

/// Paints one window's geometry.
pub trait WindowPainter<B: Backend> {
    /// Submits the window's geometry through `ctx`.
    fn paint(
        &mut self,
        tree: &WindowTree,
        window: WindowId,
        ctx: &mut PaintContext<'_, B>,
    ) -> Result<(), RenderError>;
}

/// What a [`WindowPainter`] draws through.
pub struct PaintContext<'a, B: Backend> {
    renderer: &'a mut Renderer<B>,
    rect: Rect,
    alpha: f32,
}

impl<B: Backend> core::fmt::Debug for PaintContext<'_, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintContext")
            .field("rect", &self.rect)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> PaintContext<'_, B> {
    /// The window's unclipped outer rectangle in display pixels.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The window's effective alpha.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Size of a texture in pixels.
    #[must_use]
    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.renderer.texture_size(texture)
    }

    /// Queues a quad with alpha-modulated colours.
    pub fn add_quad(
        &mut self,
        dest: Rect,
        z: f32,
        texture: Option<TextureId>,
        tex_rect: Rect,
        colours: &ColourRect,
    ) -> Result<(), RenderError> {
        let colours = colours.modulate_alpha(self.alpha);
        self.renderer
            .add_quad(dest, z, texture, tex_rect, &colours)
    }

    /// Queues a triangle with alpha-modulated colours.
    pub fn add_triangle(
        &mut self,
        texture: Option<TextureId>,
        vertices: &[Vertex; 3],
    ) -> Result<(), RenderError> {
        let vertices = vertices.map(|v| Vertex {
            colour: v.colour.modulate_alpha(self.alpha),
            ..v
        });
        self.renderer.add_triangle(texture, &vertices)
    }

    /// Fills the whole window with untextured colour.
    pub fn fill(&mut self, colours: &ColourRect) -> Result<(), RenderError> {
        let rect = self.rect;
        self.add_quad(rect, 0.0, None, Rect::ZERO, colours)
    }
}

/// A painter that fills each window with a flat colour.
///
/// The colour is read from the window's `FillColour` property (`AARRGGBB`
/// hex) when it has one that parses, and is `default` otherwise. Fully
/// transparent windows submit nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillPainter {
    /// Colour for windows without a usable `FillColour`.
    pub default: Colour,
}

impl FillPainter {
    /// Name of the property read for each window's colour.
    pub const PROPERTY: &'static str = "FillColour";

    /// Creates a painter with a default colour.
    #[must_use]
    pub const fn new(default: Colour) -> Self {
        Self { default }
    }

    fn colour_of(&self, tree: &WindowTree, window: WindowId) -> Colour {
        tree.get_property(window, Self::PROPERTY)
            .ok()
            .and_then(|text| Colour::parse_argb(&text))
            .unwrap_or(self.default)
    }
}

impl<B: Backend> WindowPainter<B> for FillPainter {
    fn paint(
        &mut self,
        tree: &WindowTree,
        window: WindowId,
        ctx: &mut PaintContext<'_, B>,
    ) -> Result<(), RenderError> {
        let colour = self.colour_of(tree, window);
        if colour.a <= 0.0 {
            return Ok(());
        }
        ctx.fill(&ColourRect::uniform(colour))
    }
}

/// Queues every visible window of `tree` into `renderer`.
///
/// `changes` must be the result of the [`WindowTree::evaluate`] call made
/// after the last mutation; it brings the draw order up to date and tells
/// `cache` which windows must be painted again. The render queue is cleared
/// first. If the tree's display size differs from the renderer's, the
/// renderer follows the tree and the cache is emptied.
///
/// A painter error aborts the walk; the clip stack is restored first.
pub fn draw_tree<B, P>(
    tree: &mut WindowTree,
    renderer: &mut Renderer<B>,
    painter: &mut P,
    cache: &mut GeometryCache<B::Vertex>,
    changes: &TreeChanges,
) -> Result<(), RenderError>
where
    B: Backend,
    P: WindowPainter<B> + ?Sized,
{
    if renderer.display_size() != tree.display_size() {
        renderer.set_display_size(tree.display_size());
        cache.clear();
    }
    cache.apply(changes);
    renderer.clear_render_queue();

    let order: Vec<u32> = tree.draw_order().to_vec();
    for idx in order {
        let Some(window) = tree.window_at(idx) else {
            continue;
        };
        if !tree.is_visible(window) {
            continue;
        }
        let clip = tree.pixel_rect(window);
        if clip.area() <= 0.0 {
            continue;
        }

        notify(tree, window, WindowEvent::StartRender);
        renderer.break_batch();
        renderer.push_clip(clip);

        let from_cache = match cache.get(idx) {
            Some(batches) => {
                for batch in batches {
                    renderer.append_batch(batch);
                }
                true
            }
            None => {
                let start = renderer.batch_count();
                let mut ctx = PaintContext {
                    rect: tree.unclipped_outer_rect(window),
                    alpha: tree.effective_alpha(window),
                    renderer: &mut *renderer,
                };
                let painted = painter.paint(tree, window, &mut ctx);
                if let Err(err) = painted {
                    renderer.pop_clip();
                    return Err(err);
                }
                cache.store(idx, &renderer.queue().batches()[start..]);
                false
            }
        };

        renderer.pop_clip();
        renderer.record_window(from_cache);
        notify(tree, window, WindowEvent::EndRender);
    }
    Ok(())
}

/// Fires a render notification. Users may remove the event from a window's
/// set, in which case nothing fires.
fn notify(tree: &mut WindowTree, window: WindowId, event: WindowEvent) {
    let name = event.name();
    if tree.event_set(window).is_event_present(name) {
        let mut args = EventArgs::for_window(window);
        // Present, so firing cannot fail.
        _ = tree.fire_event(window, name, &mut args);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::RefCell;

    use casement_core::dim::{URect, UVector2};
    use casement_core::window::TreeConfig;
    use kurbo::{Point, Size};

    use super::*;
    use crate::recording::RecordingBackend;
    use crate::renderer::RendererConfig;

    type TestBackend = RecordingBackend<Vertex>;

    /// Counts paint calls per window name.
    struct CountingPainter {
        inner: FillPainter,
        painted: Vec<String>,
    }

    impl CountingPainter {
        fn new() -> Self {
            Self {
                inner: FillPainter::new(Colour::WHITE),
                painted: Vec::new(),
            }
        }
    }

    impl WindowPainter<TestBackend> for CountingPainter {
        fn paint(
            &mut self,
            tree: &WindowTree,
            window: WindowId,
            ctx: &mut PaintContext<'_, TestBackend>,
        ) -> Result<(), RenderError> {
            self.painted.push(tree.name(window).into());
            self.inner.paint(tree, window, ctx)
        }
    }

    struct Scene {
        tree: WindowTree,
        renderer: Renderer<TestBackend>,
        cache: GeometryCache<Vertex>,
        root: WindowId,
        child: WindowId,
    }

    fn scene() -> Scene {
        let mut tree = WindowTree::new(TreeConfig::small());
        let root = tree.create_window("DefaultWindow", "root").unwrap();
        tree.set_pixel_position(root, Point::new(10.0, 10.0));
        tree.set_pixel_size(root, Size::new(100.0, 100.0));
        let child = tree.create_window("DefaultWindow", "child").unwrap();
        tree.add_child(root, child).unwrap();
        tree.set_area(
            child,
            URect::from_origin_size(UVector2::px(50.0, 50.0), UVector2::px(100.0, 20.0)),
        );
        let renderer = Renderer::new(
            RecordingBackend::new(),
            RendererConfig::gl().with_display_size(Size::new(640.0, 480.0)),
        );
        Scene {
            tree,
            renderer,
            cache: GeometryCache::new(),
            root,
            child,
        }
    }

    impl Scene {
        fn frame(&mut self, painter: &mut CountingPainter) {
            let changes = self.tree.evaluate();
            draw_tree(
                &mut self.tree,
                &mut self.renderer,
                painter,
                &mut self.cache,
                &changes,
            )
            .unwrap();
        }
    }

    #[test]
    fn windows_are_drawn_back_to_front_and_clipped() {
        let mut s = scene();
        let mut painter = CountingPainter::new();
        s.frame(&mut painter);
        assert_eq!(painter.painted, ["root", "child"]);

        let batches = s.renderer.queue().batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].clip(), Rect::new(10.0, 10.0, 110.0, 110.0));
        assert_eq!(
            batches[1].clip(),
            Rect::new(60.0, 60.0, 110.0, 80.0),
            "child is clipped by its parent"
        );
        let first = batches[1].vertices()[0];
        assert_eq!(first.position, [60.0, 60.0, 0.0], "painted unclipped");
    }

    #[test]
    fn unchanged_windows_are_replayed_from_the_cache() {
        let mut s = scene();
        let mut painter = CountingPainter::new();
        s.frame(&mut painter);
        s.frame(&mut painter);
        assert_eq!(painter.painted, ["root", "child"], "second frame painted nothing");
        assert_eq!(s.renderer.batch_count(), 2);
        let summary = s.renderer.render().unwrap();
        assert_eq!(summary.windows_drawn, 4);
        assert_eq!(summary.cache_hits, 2);

        s.tree.invalidate(s.child);
        s.frame(&mut painter);
        assert_eq!(painter.painted, ["root", "child", "child"]);

        s.tree.set_pixel_position(s.root, Point::new(0.0, 0.0));
        s.frame(&mut painter);
        assert_eq!(
            painter.painted[3..],
            ["root", "child"],
            "moving a parent invalidates its children"
        );
    }

    #[test]
    fn alpha_and_visibility_apply() {
        let mut s = scene();
        s.tree.set_alpha(s.root, 0.5);
        s.tree.set_alpha(s.child, 0.5);
        let mut painter = CountingPainter::new();
        s.frame(&mut painter);
        let child_colour = s.renderer.queue().batches()[1].vertices()[0].colour;
        assert_eq!(child_colour.a, 0.25);

        s.tree.hide(s.root);
        s.frame(&mut painter);
        assert_eq!(s.renderer.batch_count(), 0, "hidden subtree is skipped");
    }

    #[test]
    fn fill_colour_property_is_honoured() {
        let mut s = scene();
        s.tree
            .define_user_property(s.child, FillPainter::PROPERTY, "00000000")
            .unwrap();
        let mut painter = CountingPainter::new();
        s.frame(&mut painter);
        assert_eq!(s.renderer.batch_count(), 1, "transparent child submits nothing");

        s.tree
            .set_property(s.child, FillPainter::PROPERTY, "FF102030")
            .unwrap();
        s.frame(&mut painter);
        let colour = s.renderer.queue().batches()[1].vertices()[0].colour;
        assert_eq!(colour.to_argb(), 0xFF10_2030);
    }

    #[test]
    fn render_events_bracket_painting() {
        let mut s = scene();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (w, name) in [(s.root, "root"), (s.child, "child")] {
            for event in [WindowEvent::StartRender, WindowEvent::EndRender] {
                let log = log.clone();
                s.tree
                    .subscribe_event(w, event.name(), move |_| {
                        log.borrow_mut().push(alloc::format!("{name}:{}", event.name()));
                        false
                    })
                    .unwrap();
            }
        }
        s.tree
            .event_set_mut(s.child)
            .remove_event(WindowEvent::EndRender.name());

        let mut painter = CountingPainter::new();
        s.frame(&mut painter);
        assert_eq!(
            *log.borrow(),
            vec![
                "root:StartRender",
                "root:EndRender",
                "child:StartRender",
            ]
        );
    }

    #[test]
    fn display_size_changes_reach_the_renderer() {
        let mut s = scene();
        let mut painter = CountingPainter::new();
        s.frame(&mut painter);
        s.tree.set_display_size(Size::new(60.0, 60.0));
        s.frame(&mut painter);
        assert_eq!(s.renderer.display_size(), Size::new(60.0, 60.0));
        assert_eq!(
            s.renderer.queue().batches()[0].clip(),
            Rect::new(10.0, 10.0, 60.0, 60.0)
        );
    }

    #[test]
    fn painter_errors_abort_and_restore_the_clip_stack() {
        struct Failing;
        impl WindowPainter<TestBackend> for Failing {
            fn paint(
                &mut self,
                _: &WindowTree,
                _: WindowId,
                _: &mut PaintContext<'_, TestBackend>,
            ) -> Result<(), RenderError> {
                Err(RenderError::PartialTriangle { vertex_count: 1 })
            }
        }

        let mut s = scene();
        let changes = s.tree.evaluate();
        let result = draw_tree(
            &mut s.tree,
            &mut s.renderer,
            &mut Failing,
            &mut s.cache,
            &changes,
        );
        assert!(result.is_err());
        assert_eq!(s.renderer.queue().clip_depth(), 0);
        assert!(s.cache.is_empty());
    }
}
