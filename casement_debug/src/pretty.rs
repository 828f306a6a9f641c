// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use casement_core::trace::{
    ActivationChangedEvent, BatchFlushedEvent, BufferGrownEvent, BufferGrowthFailedEvent,
    CaptureChange, CaptureChangedEvent, EventFiredEvent, FrameBeginEvent, FrameEndEvent,
    FrameSummary, ParentChangedEvent, TraceSink, WindowCreatedEvent, WindowDestroyedEvent,
    ZOrderChangedEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Formats an optional slot index as `#n` or `-`.
struct Slot(Option<u32>);

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(idx) => write!(f, "#{idx}"),
            None => f.write_str("-"),
        }
    }
}

fn change_name(change: CaptureChange) -> &'static str {
    match change {
        CaptureChange::Captured => "captured",
        CaptureChange::Released => "released",
        CaptureChange::Restored => "restored",
        CaptureChange::Revoked => "revoked",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_window_created(&mut self, e: &WindowCreatedEvent) {
        let _ = writeln!(
            self.writer,
            "[window:new] #{} gen={}",
            e.window, e.generation,
        );
    }

    fn on_window_destroyed(&mut self, e: &WindowDestroyedEvent) {
        let _ = writeln!(
            self.writer,
            "[window:destroy] #{} cascaded={}",
            e.window, e.cascaded,
        );
    }

    fn on_parent_changed(&mut self, e: &ParentChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[parent] #{} {} -> {}",
            e.window,
            Slot(e.old_parent),
            Slot(e.new_parent),
        );
    }

    fn on_z_order_changed(&mut self, e: &ZOrderChangedEvent) {
        let _ = writeln!(self.writer, "[z] #{} pos={}", e.window, e.position);
    }

    fn on_capture_changed(&mut self, e: &CaptureChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[capture] {} {} -> {}",
            change_name(e.change),
            Slot(e.old),
            Slot(e.new),
        );
    }

    fn on_activation_changed(&mut self, e: &ActivationChangedEvent) {
        let state = if e.active { "on" } else { "off" };
        let _ = writeln!(self.writer, "[active] #{} {state}", e.window);
    }

    fn on_event_fired(&mut self, e: &EventFiredEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[event] {} on {} handled={}",
            e.name,
            Slot(e.window),
            e.handled_count,
        );
    }

    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame:begin] frame={} batches={}",
            e.frame_index, e.queued_batches,
        );
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        let _ = writeln!(self.writer, "[frame:end] frame={}", e.frame_index);
    }

    fn on_buffer_growth_failed(&mut self, e: &BufferGrowthFailedEvent) {
        let _ = writeln!(
            self.writer,
            "[buffer] FAILED required={} capacity={}",
            e.required, e.old_capacity,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} batches={} vertices={} windows={} cached={}",
            s.frame_index, s.batches, s.vertices, s.windows_drawn, s.cache_hits,
        );
    }

    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        let _ = writeln!(
            self.writer,
            "[batch] frame={} #{} texture={} vertices={}",
            e.frame_index,
            e.batch_index,
            Slot(e.texture),
            e.vertex_count,
        );
    }

    fn on_buffer_grown(&mut self, e: &BufferGrownEvent) {
        let _ = writeln!(
            self.writer,
            "[buffer] grown {} -> {}",
            e.old_capacity, e.new_capacity,
        );
    }
}
