// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input capture.
//!
//! The tree holds a single capture slot. A window that acquires capture while
//! its restore-old-capture setting is on pushes the previous holder onto a
//! LIFO stack; releasing it later pops that entry and gives capture back.
//! Without the setting, acquiring capture evicts the previous holder and
//! everything waiting on the stack.

use super::id::{INVALID, WindowId};
use super::names::WindowEvent;
use super::store::WindowTree;
use crate::trace::{CaptureChange, CaptureChangedEvent};

impl WindowTree {
    /// Returns the window currently holding capture.
    #[must_use]
    pub fn capture_window(&self) -> Option<WindowId> {
        self.handle_opt(self.capture)
    }

    /// Returns whether `id` holds capture.
    #[must_use]
    pub fn is_captured_by(&self, id: WindowId) -> bool {
        self.validate(id);
        self.capture == id.idx
    }

    /// Gives `id` input capture.
    ///
    /// Returns `false` (and changes nothing) if the window is hidden or
    /// disabled. Capturing again while already holding capture succeeds
    /// without side effects.
    pub fn capture_input(&mut self, id: WindowId) -> bool {
        self.validate(id);
        let idx = id.idx;
        if !self.can_activate_at(idx) {
            return false;
        }
        if self.capture == idx {
            return true;
        }

        let previous = self.capture;
        if self.flags[idx as usize].restore_old_capture {
            self.capture_stack.push((idx, previous));
            self.capture = idx;
        } else {
            self.capture = idx;
            if previous != INVALID {
                self.revoke_capture_chain(previous);
                if self.flags[previous as usize].active && !self.is_ancestor_at(previous, idx) {
                    self.deactivate_at(previous, idx);
                }
            }
        }

        self.tracer().capture_changed(&CaptureChangedEvent {
            old: Some(previous).filter(|&p| p != INVALID),
            new: Some(idx),
            change: CaptureChange::Captured,
        });
        self.notify(idx, WindowEvent::CaptureGained, None);
        true
    }

    /// Releases capture held by `id`.
    ///
    /// Does nothing unless `id` holds capture. If `id` acquired capture with
    /// restore-old-capture set, the window it took capture from gets it back
    /// and is brought to the front; otherwise the slot becomes empty. `id`
    /// receives `CaptureLost`.
    pub fn release_input(&mut self, id: WindowId) {
        self.validate(id);
        if self.capture == id.idx {
            self.release_at(id.idx);
        }
    }

    /// Sets restore-old-capture on the window and all of its descendants.
    pub fn set_restore_old_capture(&mut self, id: WindowId, restore: bool) {
        self.validate(id);
        self.set_restore_old_capture_at(id.idx, restore);
    }

    // -- Internal helpers --

    fn set_restore_old_capture_at(&mut self, idx: u32, restore: bool) {
        self.flags[idx as usize].restore_old_capture = restore;
        for child in self.child_indices(idx) {
            self.set_restore_old_capture_at(child, restore);
        }
    }

    fn release_at(&mut self, idx: u32) {
        let restored = match self.capture_stack.last() {
            Some(&(pusher, previous)) if pusher == idx => {
                self.capture_stack.pop();
                previous
            }
            _ => INVALID,
        };
        self.capture = restored;
        let change = if restored == INVALID {
            CaptureChange::Released
        } else {
            CaptureChange::Restored
        };
        self.tracer().capture_changed(&CaptureChangedEvent {
            old: Some(idx),
            new: Some(restored).filter(|&r| r != INVALID),
            change,
        });
        if restored != INVALID {
            self.move_to_front_at(restored);
        }
        self.notify(idx, WindowEvent::CaptureLost, None);
    }

    /// Tells `holder`, which no longer has capture, and every window still
    /// waiting on the restore stack that they lost capture; empties the stack.
    pub(crate) fn revoke_capture_chain(&mut self, holder: u32) {
        let stack = core::mem::take(&mut self.capture_stack);
        self.notify(holder, WindowEvent::CaptureLost, None);
        for &(_, previous) in stack.iter().rev() {
            if previous != INVALID && previous != holder {
                self.notify(previous, WindowEvent::CaptureLost, None);
            }
        }
    }

    /// Removes every trace of `idx` from the capture state before the window
    /// is destroyed.
    pub(crate) fn forget_capture(&mut self, idx: u32) {
        if self.capture == idx {
            self.release_at(idx);
        }
        let own_previous = self
            .capture_stack
            .iter()
            .rev()
            .find(|&&(pusher, _)| pusher == idx)
            .map_or(INVALID, |&(_, previous)| previous);
        self.capture_stack.retain(|&(pusher, _)| pusher != idx);
        for entry in &mut self.capture_stack {
            if entry.1 == idx {
                entry.1 = own_previous;
            }
        }
    }
}
