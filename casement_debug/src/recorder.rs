// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! shared `Vec<u8>` as little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Event names are stored as a `u32` byte length followed by UTF-8 bytes.
//! Every other field has a fixed size.

use std::cell::RefCell;
use std::rc::Rc;

use casement_core::trace::{
    ActivationChangedEvent, BatchFlushedEvent, BufferGrownEvent, BufferGrowthFailedEvent,
    CaptureChange, CaptureChangedEvent, EventFiredEvent, FrameBeginEvent, FrameEndEvent,
    FrameSummary, ParentChangedEvent, TraceSink, WindowCreatedEvent, WindowDestroyedEvent,
    ZOrderChangedEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_WINDOW_CREATED: u8 = 1;
const TAG_WINDOW_DESTROYED: u8 = 2;
const TAG_PARENT_CHANGED: u8 = 3;
const TAG_Z_ORDER_CHANGED: u8 = 4;
const TAG_CAPTURE_CHANGED: u8 = 5;
const TAG_ACTIVATION_CHANGED: u8 = 6;
const TAG_EVENT_FIRED: u8 = 7;
const TAG_FRAME_BEGIN: u8 = 8;
const TAG_FRAME_END: u8 = 9;
const TAG_BATCH_FLUSHED: u8 = 10;
const TAG_BUFFER_GROWN: u8 = 11;
const TAG_BUFFER_GROWTH_FAILED: u8 = 12;
const TAG_FRAME_SUMMARY: u8 = 13;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
///
/// Cloning yields another handle onto the same buffer.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded bytes.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Decodes everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        decode(&self.buf.borrow()).collect()
    }

    /// Number of recorded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }

    /// Discards all recorded bytes, for every handle.
    pub fn clear(&self) {
        self.buf.borrow_mut().clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&self, v: u8) {
        self.buf.borrow_mut().push(v);
    }

    fn write_u32(&self, v: u32) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&self, v: u64) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u32(&self, v: Option<u32>) {
        self.write_u8(u8::from(v.is_some()));
        self.write_u32(v.unwrap_or(0));
    }

    fn write_str(&self, s: &str) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "event names are short identifiers"
        )]
        let len = s.len().min(u32::MAX as usize) as u32;
        self.write_u32(len);
        self.buf
            .borrow_mut()
            .extend_from_slice(&s.as_bytes()[..len as usize]);
    }
}

fn capture_change_code(change: CaptureChange) -> u8 {
    match change {
        CaptureChange::Captured => 0,
        CaptureChange::Released => 1,
        CaptureChange::Restored => 2,
        CaptureChange::Revoked => 3,
    }
}

impl TraceSink for RecorderSink {
    fn on_window_created(&mut self, e: &WindowCreatedEvent) {
        self.write_u8(TAG_WINDOW_CREATED);
        self.write_u32(e.window);
        self.write_u32(e.generation);
    }

    fn on_window_destroyed(&mut self, e: &WindowDestroyedEvent) {
        self.write_u8(TAG_WINDOW_DESTROYED);
        self.write_u32(e.window);
        self.write_u32(e.cascaded);
    }

    fn on_parent_changed(&mut self, e: &ParentChangedEvent) {
        self.write_u8(TAG_PARENT_CHANGED);
        self.write_u32(e.window);
        self.write_option_u32(e.old_parent);
        self.write_option_u32(e.new_parent);
    }

    fn on_z_order_changed(&mut self, e: &ZOrderChangedEvent) {
        self.write_u8(TAG_Z_ORDER_CHANGED);
        self.write_u32(e.window);
        self.write_u32(e.position);
    }

    fn on_capture_changed(&mut self, e: &CaptureChangedEvent) {
        self.write_u8(TAG_CAPTURE_CHANGED);
        self.write_option_u32(e.old);
        self.write_option_u32(e.new);
        self.write_u8(capture_change_code(e.change));
    }

    fn on_activation_changed(&mut self, e: &ActivationChangedEvent) {
        self.write_u8(TAG_ACTIVATION_CHANGED);
        self.write_u32(e.window);
        self.write_u8(u8::from(e.active));
    }

    fn on_event_fired(&mut self, e: &EventFiredEvent<'_>) {
        self.write_u8(TAG_EVENT_FIRED);
        self.write_option_u32(e.window);
        self.write_u32(e.handled_count);
        self.write_str(e.name);
    }

    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_u32(e.queued_batches);
    }

    fn on_frame_end(&mut self, e: &FrameEndEvent) {
        self.write_u8(TAG_FRAME_END);
        self.write_u64(e.frame_index);
    }

    fn on_buffer_growth_failed(&mut self, e: &BufferGrowthFailedEvent) {
        self.write_u8(TAG_BUFFER_GROWTH_FAILED);
        self.write_u64(e.required);
        self.write_u32(e.old_capacity);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u32(s.batches);
        self.write_u64(s.vertices);
        self.write_u32(s.windows_drawn);
        self.write_u32(s.cache_hits);
    }

    fn on_batch_flushed(&mut self, e: &BatchFlushedEvent) {
        self.write_u8(TAG_BATCH_FLUSHED);
        self.write_u64(e.frame_index);
        self.write_u32(e.batch_index);
        self.write_option_u32(e.texture);
        self.write_u32(e.vertex_count);
    }

    fn on_buffer_grown(&mut self, e: &BufferGrownEvent) {
        self.write_u8(TAG_BUFFER_GROWN);
        self.write_u32(e.old_capacity);
        self.write_u32(e.new_capacity);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
///
/// Events carrying a borrowed name own it here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A window was allocated.
    WindowCreated {
        /// Slot index.
        window: u32,
        /// Slot generation.
        generation: u32,
    },
    /// A window and `cascaded` descendants were destroyed.
    WindowDestroyed {
        /// Slot index.
        window: u32,
        /// Descendants destroyed with it.
        cascaded: u32,
    },
    /// A window was re-parented.
    ParentChanged {
        /// Slot index.
        window: u32,
        /// Previous parent.
        old_parent: Option<u32>,
        /// New parent.
        new_parent: Option<u32>,
    },
    /// A window moved within its sibling list.
    ZOrderChanged {
        /// Slot index.
        window: u32,
        /// New position among siblings.
        position: u32,
    },
    /// The capture slot changed.
    CaptureChanged {
        /// Previous holder.
        old: Option<u32>,
        /// New holder.
        new: Option<u32>,
        /// Kind of change.
        change: CaptureChange,
    },
    /// A window was activated or deactivated.
    ActivationChanged {
        /// Slot index.
        window: u32,
        /// New state.
        active: bool,
    },
    /// A named event was fired.
    EventFired {
        /// Owning window, or `None` for the global set.
        window: Option<u32>,
        /// Event name.
        name: String,
        /// Subscribers that reported the event handled.
        handled_count: u32,
    },
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`FrameEndEvent`].
    FrameEnd(FrameEndEvent),
    /// A [`BatchFlushedEvent`].
    BatchFlushed(BatchFlushedEvent),
    /// A [`BufferGrownEvent`].
    BufferGrown(BufferGrownEvent),
    /// A [`BufferGrowthFailedEvent`].
    BufferGrowthFailed(BufferGrowthFailedEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        let v = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_u8()?;
        let val = self.read_u32()?;
        Some((present != 0).then_some(val))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        if self.remaining() < len {
            return None;
        }
        let s = core::str::from_utf8(&self.data[self.pos..self.pos + len]).ok()?;
        self.pos += len;
        Some(s.to_owned())
    }

    fn read_capture_change(&mut self) -> Option<CaptureChange> {
        Some(match self.read_u8()? {
            0 => CaptureChange::Captured,
            1 => CaptureChange::Released,
            2 => CaptureChange::Restored,
            _ => CaptureChange::Revoked,
        })
    }

    fn decode_event_fired(&mut self) -> Option<RecordedEvent> {
        let window = self.read_option_u32()?;
        let handled_count = self.read_u32()?;
        let name = self.read_string()?;
        Some(RecordedEvent::EventFired {
            window,
            name,
            handled_count,
        })
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            batches: self.read_u32()?,
            vertices: self.read_u64()?,
            windows_drawn: self.read_u32()?,
            cache_hits: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_WINDOW_CREATED => Some(RecordedEvent::WindowCreated {
                window: self.read_u32()?,
                generation: self.read_u32()?,
            }),
            TAG_WINDOW_DESTROYED => Some(RecordedEvent::WindowDestroyed {
                window: self.read_u32()?,
                cascaded: self.read_u32()?,
            }),
            TAG_PARENT_CHANGED => Some(RecordedEvent::ParentChanged {
                window: self.read_u32()?,
                old_parent: self.read_option_u32()?,
                new_parent: self.read_option_u32()?,
            }),
            TAG_Z_ORDER_CHANGED => Some(RecordedEvent::ZOrderChanged {
                window: self.read_u32()?,
                position: self.read_u32()?,
            }),
            TAG_CAPTURE_CHANGED => Some(RecordedEvent::CaptureChanged {
                old: self.read_option_u32()?,
                new: self.read_option_u32()?,
                change: self.read_capture_change()?,
            }),
            TAG_ACTIVATION_CHANGED => Some(RecordedEvent::ActivationChanged {
                window: self.read_u32()?,
                active: self.read_u8()? != 0,
            }),
            TAG_EVENT_FIRED => self.decode_event_fired(),
            TAG_FRAME_BEGIN => Some(RecordedEvent::FrameBegin(FrameBeginEvent {
                frame_index: self.read_u64()?,
                queued_batches: self.read_u32()?,
            })),
            TAG_FRAME_END => Some(RecordedEvent::FrameEnd(FrameEndEvent {
                frame_index: self.read_u64()?,
            })),
            TAG_BATCH_FLUSHED => Some(RecordedEvent::BatchFlushed(BatchFlushedEvent {
                frame_index: self.read_u64()?,
                batch_index: self.read_u32()?,
                texture: self.read_option_u32()?,
                vertex_count: self.read_u32()?,
            })),
            TAG_BUFFER_GROWN => Some(RecordedEvent::BufferGrown(BufferGrownEvent {
                old_capacity: self.read_u32()?,
                new_capacity: self.read_u32()?,
            })),
            TAG_BUFFER_GROWTH_FAILED => {
                Some(RecordedEvent::BufferGrowthFailed(BufferGrowthFailedEvent {
                    required: self.read_u64()?,
                    old_capacity: self.read_u32()?,
                }))
            }
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> FrameSummary {
        FrameSummary {
            frame_index: 3,
            batches: 4,
            vertices: 24,
            windows_drawn: 2,
            cache_hits: 1,
        }
    }

    #[test]
    fn clones_share_one_buffer() {
        let reader = RecorderSink::new();
        let mut writer = reader.clone();
        writer.on_frame_end(&FrameEndEvent { frame_index: 9 });

        assert_eq!(reader.len(), 9);
        assert_eq!(
            reader.events(),
            [RecordedEvent::FrameEnd(FrameEndEvent { frame_index: 9 })]
        );

        reader.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn event_names_survive_recording() {
        let mut sink = RecorderSink::new();
        sink.on_event_fired(&EventFiredEvent {
            window: Some(5),
            name: "MouseEnters",
            handled_count: 2,
        });
        sink.on_event_fired(&EventFiredEvent {
            window: None,
            name: "",
            handled_count: 0,
        });

        let events = sink.events();
        assert_eq!(
            events,
            [
                RecordedEvent::EventFired {
                    window: Some(5),
                    name: "MouseEnters".into(),
                    handled_count: 2,
                },
                RecordedEvent::EventFired {
                    window: None,
                    name: String::new(),
                    handled_count: 0,
                },
            ]
        );
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let mut sink = RecorderSink::new();
        sink.on_window_created(&WindowCreatedEvent {
            window: 0,
            generation: 1,
        });
        sink.on_capture_changed(&CaptureChangedEvent {
            old: None,
            new: Some(0),
            change: CaptureChange::Captured,
        });
        sink.on_batch_flushed(&BatchFlushedEvent {
            frame_index: 3,
            batch_index: 0,
            texture: None,
            vertex_count: 6,
        });
        sink.on_frame_summary(&sample_summary());

        let events = sink.events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1],
            RecordedEvent::CaptureChanged {
                old: None,
                new: Some(0),
                change: CaptureChange::Captured,
            }
        );
        match &events[2] {
            RecordedEvent::BatchFlushed(e) => {
                assert_eq!(e.texture, None);
                assert_eq!(e.vertex_count, 6);
            }
            other => panic!("expected BatchFlushed, got {other:?}"),
        }
        assert_eq!(events[3], RecordedEvent::FrameSummary(sample_summary()));
    }

    #[test]
    fn truncated_buffer_stops_iteration() {
        let mut sink = RecorderSink::new();
        sink.on_frame_summary(&sample_summary());
        sink.on_frame_summary(&sample_summary());

        let bytes = sink.bytes();
        let truncated = &bytes[..bytes.len() - 3];
        assert_eq!(decode(truncated).count(), 1);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        assert_eq!(decode(&[0xFF, 1, 2, 3]).count(), 0);
    }
}
