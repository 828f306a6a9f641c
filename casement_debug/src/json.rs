// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes them as a JSON array. Each element has a `seq` (position in
//! the recording), a `name`, a `cat` (`Tree`, `Event`, `Frame` or `Buffer`)
//! and an `args` object holding the event fields.

use std::io::{self, Write};

use serde_json::{Value, json};

use casement_core::trace::CaptureChange;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .enumerate()
        .map(|(seq, recorded)| {
            let (name, cat, args) = describe(&recorded);
            json!({
                "seq": seq,
                "name": name,
                "cat": cat,
                "args": args,
            })
        })
        .collect();

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn describe(recorded: &RecordedEvent) -> (&'static str, &'static str, Value) {
    match recorded {
        RecordedEvent::WindowCreated { window, generation } => (
            "WindowCreated",
            "Tree",
            json!({ "window": window, "generation": generation }),
        ),
        RecordedEvent::WindowDestroyed { window, cascaded } => (
            "WindowDestroyed",
            "Tree",
            json!({ "window": window, "cascaded": cascaded }),
        ),
        RecordedEvent::ParentChanged {
            window,
            old_parent,
            new_parent,
        } => (
            "ParentChanged",
            "Tree",
            json!({
                "window": window,
                "old_parent": old_parent,
                "new_parent": new_parent,
            }),
        ),
        RecordedEvent::ZOrderChanged { window, position } => (
            "ZOrderChanged",
            "Tree",
            json!({ "window": window, "position": position }),
        ),
        RecordedEvent::CaptureChanged { old, new, change } => (
            "CaptureChanged",
            "Tree",
            json!({
                "old": old,
                "new": new,
                "change": change_name(*change),
            }),
        ),
        RecordedEvent::ActivationChanged { window, active } => (
            "ActivationChanged",
            "Tree",
            json!({ "window": window, "active": active }),
        ),
        RecordedEvent::EventFired {
            window,
            name,
            handled_count,
        } => (
            "EventFired",
            "Event",
            json!({
                "window": window,
                "event": name,
                "handled_count": handled_count,
            }),
        ),
        RecordedEvent::FrameBegin(e) => (
            "FrameBegin",
            "Frame",
            json!({
                "frame_index": e.frame_index,
                "queued_batches": e.queued_batches,
            }),
        ),
        RecordedEvent::FrameEnd(e) => (
            "FrameEnd",
            "Frame",
            json!({ "frame_index": e.frame_index }),
        ),
        RecordedEvent::BatchFlushed(e) => (
            "BatchFlushed",
            "Frame",
            json!({
                "frame_index": e.frame_index,
                "batch_index": e.batch_index,
                "texture": e.texture,
                "vertex_count": e.vertex_count,
            }),
        ),
        RecordedEvent::FrameSummary(s) => (
            "FrameSummary",
            "Frame",
            json!({
                "frame_index": s.frame_index,
                "batches": s.batches,
                "vertices": s.vertices,
                "windows_drawn": s.windows_drawn,
                "cache_hits": s.cache_hits,
            }),
        ),
        RecordedEvent::BufferGrown(e) => (
            "BufferGrown",
            "Buffer",
            json!({
                "old_capacity": e.old_capacity,
                "new_capacity": e.new_capacity,
            }),
        ),
        RecordedEvent::BufferGrowthFailed(e) => (
            "BufferGrowthFailed",
            "Buffer",
            json!({
                "required": e.required,
                "old_capacity": e.old_capacity,
            }),
        ),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use casement_core::trace::{
        BufferGrowthFailedEvent, EventFiredEvent, FrameBeginEvent, FrameEndEvent,
        ParentChangedEvent, TraceSink,
    };

    fn export_to_values(rec: &RecorderSink) -> Vec<Value> {
        let mut out = Vec::new();
        export(&rec.bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_begin(&FrameBeginEvent {
            frame_index: 1,
            queued_batches: 3,
        });
        rec.on_event_fired(&EventFiredEvent {
            window: Some(2),
            name: "StartRender",
            handled_count: 0,
        });
        rec.on_frame_end(&FrameEndEvent { frame_index: 1 });

        let events = export_to_values(&rec);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["name"], "FrameBegin");
        assert_eq!(events[0]["args"]["queued_batches"], 3);
        assert_eq!(events[1]["cat"], "Event");
        assert_eq!(events[1]["args"]["event"], "StartRender");
        assert_eq!(events[2]["seq"], 2);
    }

    #[test]
    fn absent_parents_export_as_null() {
        let mut rec = RecorderSink::new();
        rec.on_parent_changed(&ParentChangedEvent {
            window: 4,
            old_parent: None,
            new_parent: Some(1),
        });

        let events = export_to_values(&rec);
        assert!(events[0]["args"]["old_parent"].is_null());
        assert_eq!(events[0]["args"]["new_parent"], 1);
    }

    #[test]
    fn growth_failures_land_in_buffer_category() {
        let mut rec = RecorderSink::new();
        rec.on_buffer_growth_failed(&BufferGrowthFailedEvent {
            required: 1 << 40,
            old_capacity: 12,
        });

        let events = export_to_values(&rec);
        assert_eq!(events[0]["cat"], "Buffer");
        assert_eq!(events[0]["args"]["required"], 1_u64 << 40);
    }

    #[test]
    fn empty_recording_is_an_empty_array() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]");
    }
}
