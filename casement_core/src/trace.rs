// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the window tree and the renderer.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! window tree and renderer call as things happen. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects per-frame counters while a frame is being
//! drawn and produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`BatchFlushedEvent`] and
//!   [`BufferGrownEvent`] plus the corresponding `TraceSink` methods.

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How the capture slot changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaptureChange {
    /// A window took the slot.
    Captured,
    /// The holder released the slot and it became empty.
    Released,
    /// The holder released the slot and a previous holder got it back.
    Restored,
    /// The slot was cleared by activation of another window or destruction.
    Revoked,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a window is allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowCreatedEvent {
    /// Slot index of the new window.
    pub window: u32,
    /// Generation of the slot.
    pub generation: u32,
}

/// Emitted when a window slot is freed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowDestroyedEvent {
    /// Slot index of the destroyed window.
    pub window: u32,
    /// Number of destroyed-by-parent descendants destroyed along with it.
    pub cascaded: u32,
}

/// Emitted when a window is attached to or detached from a parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentChangedEvent {
    /// Slot index of the child.
    pub window: u32,
    /// Previous parent slot, if any.
    pub old_parent: Option<u32>,
    /// New parent slot, if any.
    pub new_parent: Option<u32>,
}

/// Emitted when a window moves within its parent's z-order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZOrderChangedEvent {
    /// Slot index of the moved window.
    pub window: u32,
    /// New position among its siblings, back (0) to front.
    pub position: u32,
}

/// Emitted whenever the capture slot changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureChangedEvent {
    /// Previous holder slot.
    pub old: Option<u32>,
    /// New holder slot.
    pub new: Option<u32>,
    /// Kind of change.
    pub change: CaptureChange,
}

/// Emitted when a window becomes active or inactive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivationChangedEvent {
    /// Slot index of the window.
    pub window: u32,
    /// Whether it is now active.
    pub active: bool,
}

/// Emitted after a window event has been fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventFiredEvent<'a> {
    /// Slot index of the window the event belongs to; `None` for events fired
    /// on a free-standing set.
    pub window: Option<u32>,
    /// Event name.
    pub name: &'a str,
    /// How many subscribers reported handling it.
    pub handled_count: u32,
}

/// Marks the beginning of a rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Number of batches queued when the frame started.
    pub queued_batches: u32,
}

/// Marks the end of a rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEndEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Emitted when a batch is handed to the backend.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchFlushedEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Position of the batch in the queue.
    pub batch_index: u32,
    /// Raw texture id, or `None` for untextured geometry.
    pub texture: Option<u32>,
    /// Number of vertices drawn.
    pub vertex_count: u32,
}

/// Emitted when a geometry batch grows its vertex buffer.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferGrownEvent {
    /// Capacity before growth.
    pub old_capacity: u32,
    /// Capacity after growth.
    pub new_capacity: u32,
}

/// Emitted when a geometry batch fails to grow and resets itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferGrowthFailedEvent {
    /// Vertex count that was requested.
    pub required: u64,
    /// Capacity the batch held before it reset.
    pub old_capacity: u32,
}

/// Per-frame counters produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Batches submitted to the backend.
    pub batches: u32,
    /// Vertices submitted to the backend.
    pub vertices: u64,
    /// Windows visited by the draw path.
    pub windows_drawn: u32,
    /// Windows whose geometry was replayed from the cache.
    pub cache_hits: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the window tree and the renderer.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a window is created.
    fn on_window_created(&mut self, e: &WindowCreatedEvent) {
        _ = e;
    }

    /// Called when a window is destroyed.
    fn on_window_destroyed(&mut self, e: &WindowDestroyedEvent) {
        _ = e;
    }

    /// Called when a window's parent changes.
    fn on_parent_changed(&mut self, e: &ParentChangedEvent) {
        _ = e;
    }

    /// Called when a window changes z-order.
    fn on_z_order_changed(&mut self, e: &ZOrderChangedEvent) {
        _ = e;
    }

    /// Called when the capture slot changes.
    fn on_capture_changed(&mut self, e: &CaptureChangedEvent) {
        _ = e;
    }

    /// Called when a window is activated or deactivated.
    fn on_activation_changed(&mut self, e: &ActivationChangedEvent) {
        _ = e;
    }

    /// Called after a window event fired.
    fn on_event_fired(&mut self, e: &EventFiredEvent<'_>) {
        _ = e;
    }

    /// Called when the renderer starts flushing a frame.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called when the renderer finished flushing a frame.
    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        _ = e;
    }

    /// Called when a geometry batch failed to grow.
    fn on_buffer_growth_failed(&mut self, e: &BufferGrowthFailedEvent) {
        _ = e;
    }

    /// Called with a per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called for each flushed batch (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        _ = e;
    }

    /// Called when a vertex buffer grows (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_buffer_grown(&mut self, e: &BufferGrownEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`WindowCreatedEvent`].
    #[inline]
    pub fn window_created(&mut self, e: &WindowCreatedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_window_created(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`WindowDestroyedEvent`].
    #[inline]
    pub fn window_destroyed(&mut self, e: &WindowDestroyedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_window_destroyed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ParentChangedEvent`].
    #[inline]
    pub fn parent_changed(&mut self, e: &ParentChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_parent_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ZOrderChangedEvent`].
    #[inline]
    pub fn z_order_changed(&mut self, e: &ZOrderChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_z_order_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CaptureChangedEvent`].
    #[inline]
    pub fn capture_changed(&mut self, e: &CaptureChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_capture_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ActivationChangedEvent`].
    #[inline]
    pub fn activation_changed(&mut self, e: &ActivationChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_activation_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EventFiredEvent`].
    #[inline]
    pub fn event_fired(&mut self, e: &EventFiredEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_event_fired(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEndEvent`].
    #[inline]
    pub fn frame_end(&mut self, e: &FrameEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BufferGrowthFailedEvent`].
    #[inline]
    pub fn buffer_growth_failed(&mut self, e: &BufferGrowthFailedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_buffer_growth_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`BatchFlushedEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn batch_flushed(&mut self, e: &BatchFlushedEvent) {
        if let Some(s) = &mut self.sink {
            s.on_batch_flushed(e);
        }
    }

    /// Emits a [`BufferGrownEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn buffer_grown(&mut self, e: &BufferGrownEvent) {
        if let Some(s) = &mut self.sink {
            s.on_buffer_grown(e);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects per-frame counters and produces a [`FrameSummary`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameSummaryBuilder {
    summary: FrameSummary,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for `frame_index`.
    #[must_use]
    pub fn new(frame_index: u64) -> Self {
        Self {
            summary: FrameSummary {
                frame_index,
                ..FrameSummary::default()
            },
        }
    }

    /// Records one flushed batch of `vertices` vertices.
    pub fn record_batch(&mut self, vertices: usize) {
        self.summary.batches = self.summary.batches.saturating_add(1);
        self.summary.vertices = self.summary.vertices.saturating_add(vertices as u64);
    }

    /// Records one window visited by the draw path.
    pub fn record_window(&mut self, from_cache: bool) {
        self.summary.windows_drawn = self.summary.windows_drawn.saturating_add(1);
        if from_cache {
            self.summary.cache_hits = self.summary.cache_hits.saturating_add(1);
        }
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        self.summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_window_created(&WindowCreatedEvent {
            window: 0,
            generation: 0,
        });
        sink.on_capture_changed(&CaptureChangedEvent {
            old: None,
            new: Some(1),
            change: CaptureChange::Captured,
        });
        sink.on_frame_summary(&FrameSummary::default());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.window_created(&WindowCreatedEvent {
            window: 3,
            generation: 1,
        });
        tracer.frame_end(&FrameEndEvent { frame_index: 9 });
    }

    #[test]
    fn summary_builder_counts() {
        let mut builder = FrameSummaryBuilder::new(42);
        builder.record_batch(6);
        builder.record_batch(12);
        builder.record_window(false);
        builder.record_window(true);
        builder.record_window(true);

        let summary = builder.finish();
        assert_eq!(summary.frame_index, 42);
        assert_eq!(summary.batches, 2);
        assert_eq!(summary.vertices, 18);
        assert_eq!(summary.windows_drawn, 3);
        assert_eq!(summary.cache_hits, 2);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::String;
        use alloc::vec::Vec;

        struct RecordingSink {
            fired: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_event_fired(&mut self, e: &EventFiredEvent<'_>) {
                self.fired.push(e.name.into());
            }
        }

        let mut sink = RecordingSink { fired: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.event_fired(&EventFiredEvent {
            window: Some(0),
            name: "Shown",
            handled_count: 0,
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.fired, ["Shown"]);
    }
}
