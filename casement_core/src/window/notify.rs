// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window event sets and dispatch.
//!
//! Every firing on a window's set is first mirrored to the tree-wide global
//! set under `Window/<name>`, when the global set has such an event.

use alloc::format;

use super::id::{INVALID, WindowId};
use super::names::WindowEvent;
use super::store::WindowTree;
use crate::error::GuiError;
use crate::event::{Connection, EventArgs, EventSet, Group};
use crate::trace::EventFiredEvent;

impl WindowTree {
    /// Returns the window's event set.
    #[must_use]
    pub fn event_set(&self, id: WindowId) -> &EventSet {
        self.validate(id);
        &self.events[id.idx as usize]
    }

    /// Returns the window's event set for adding, removing or muting events.
    pub fn event_set_mut(&mut self, id: WindowId) -> &mut EventSet {
        self.validate(id);
        &mut self.events[id.idx as usize]
    }

    /// Returns the tree-wide set that mirrors every window event.
    #[must_use]
    pub fn global_events(&self) -> &EventSet {
        &self.global_events
    }

    /// Mutable access to the global set.
    pub fn global_events_mut(&mut self) -> &mut EventSet {
        &mut self.global_events
    }

    /// Subscribes to an event of one window.
    ///
    /// Returns [`GuiError::UnknownEvent`] if the window has no such event.
    pub fn subscribe_event<F>(
        &mut self,
        id: WindowId,
        name: &str,
        subscriber: F,
    ) -> Result<Connection, GuiError>
    where
        F: Fn(&mut EventArgs) -> bool + 'static,
    {
        self.event_set_mut(id).subscribe_event(name, subscriber)
    }

    /// Subscribes to an event of one window in an explicit group.
    pub fn subscribe_event_grouped<F>(
        &mut self,
        id: WindowId,
        name: &str,
        group: Group,
        subscriber: F,
    ) -> Result<Connection, GuiError>
    where
        F: Fn(&mut EventArgs) -> bool + 'static,
    {
        self.event_set_mut(id)
            .subscribe_event_grouped(name, group, subscriber)
    }

    /// Fires `name` on the window.
    ///
    /// `args.window` is filled in with `id` if unset.
    ///
    /// Returns [`GuiError::UnknownEvent`] if the window has no such event.
    pub fn fire_event(
        &mut self,
        id: WindowId,
        name: &str,
        args: &mut EventArgs,
    ) -> Result<(), GuiError> {
        self.validate(id);
        if args.window.is_none() {
            args.window = Some(id);
        }
        self.dispatch(id.idx, name, args)
    }

    /// Fires `name` on the window, then on each ancestor in turn until a
    /// subscriber handles it. Ancestors without the event are skipped.
    ///
    /// Returns [`GuiError::UnknownEvent`] if the starting window has no such
    /// event.
    pub fn fire_event_bubbling(
        &mut self,
        id: WindowId,
        name: &str,
        args: &mut EventArgs,
    ) -> Result<(), GuiError> {
        self.fire_event(id, name, args)?;
        let mut cur = self.parent[id.idx as usize];
        while !args.handled && cur != INVALID {
            if self.events[cur as usize].is_event_present(name) {
                self.dispatch(cur, name, args)?;
            }
            cur = self.parent[cur as usize];
        }
        Ok(())
    }

    /// Fires a built-in notification on `idx`.
    ///
    /// The event may have been removed from the window's set by the user, so
    /// a missing event is ignored.
    pub(crate) fn notify(&mut self, idx: u32, event: WindowEvent, other: Option<u32>) {
        let mut args =
            EventArgs::for_window(self.handle(idx)).with_other(other.map(|o| self.handle(o)));
        _ = self.dispatch(idx, event.name(), &mut args);
    }

    fn dispatch(&mut self, idx: u32, name: &str, args: &mut EventArgs) -> Result<(), GuiError> {
        if !self.events[idx as usize].is_event_present(name) {
            return Err(GuiError::UnknownEvent(name.into()));
        }
        let global = format!("{}{}", WindowEvent::GLOBAL_NAMESPACE, name);
        if self.global_events.is_event_present(&global) {
            self.global_events.fire_event(&global, args)?;
        }
        self.events[idx as usize].fire_event(name, args)?;

        let handled_count = args.handled_count;
        self.tracer().event_fired(&EventFiredEvent {
            window: Some(idx),
            name,
            handled_count,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;
    use crate::window::TreeConfig;

    fn tree() -> WindowTree {
        WindowTree::new(TreeConfig::small())
    }

    #[test]
    fn global_set_sees_firings_before_the_window() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();

        let l = Rc::clone(&log);
        let _ = tree
            .subscribe_event(w, "TextChanged", move |_| {
                l.borrow_mut().push("local");
                false
            })
            .unwrap();
        let l = Rc::clone(&log);
        let _ = tree
            .global_events_mut()
            .subscribe_event("Window/TextChanged", move |args| {
                assert!(args.window.is_some(), "global args carry the window");
                l.borrow_mut().push("global");
                false
            })
            .unwrap();

        tree.set_text(w, "hi");
        assert_eq!(*log.borrow(), ["global", "local"]);

        tree.event_set_mut(w).set_muted(true);
        tree.set_text(w, "again");
        assert_eq!(
            *log.borrow(),
            ["global", "local", "global"],
            "muting the window does not mute the global set"
        );
    }

    #[test]
    fn custom_events_fire_and_report_unknown_names() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        tree.event_set_mut(w).add_event("Clicked").unwrap();
        let _ = tree.subscribe_event(w, "Clicked", |_| true).unwrap();

        let mut args = EventArgs::new();
        tree.fire_event(w, "Clicked", &mut args).unwrap();
        assert!(args.handled);
        assert_eq!(args.window, Some(w));

        assert_eq!(
            tree.fire_event(w, "Nope", &mut EventArgs::new()),
            Err(GuiError::UnknownEvent("Nope".into()))
        );
    }

    #[test]
    fn bubbling_stops_at_first_handler() {
        let mut tree = tree();
        let g = tree.create_window("DefaultWindow", "g").unwrap();
        let p = tree.create_window("DefaultWindow", "p").unwrap();
        let c = tree.create_window("DefaultWindow", "c").unwrap();
        tree.add_child(g, p).unwrap();
        tree.add_child(p, c).unwrap();

        let hits: Rc<RefCell<Vec<&'static str>>> = Rc::default();
        for (w, tag, handles) in [(c, "c", false), (p, "p", true), (g, "g", true)] {
            tree.event_set_mut(w).add_event("Wheel").unwrap();
            let h = Rc::clone(&hits);
            let _ = tree
                .subscribe_event(w, "Wheel", move |_| {
                    h.borrow_mut().push(tag);
                    handles
                })
                .unwrap();
        }

        let mut args = EventArgs::new();
        tree.fire_event_bubbling(c, "Wheel", &mut args).unwrap();
        assert_eq!(*hits.borrow(), ["c", "p"]);
        assert_eq!(args.window, Some(c), "origin window is preserved");
    }

    #[test]
    fn connections_go_inert_when_the_window_dies() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        let conn = tree.subscribe_event(w, "Shown", |_| false).unwrap();
        assert!(conn.connected());
        tree.destroy_window(w);
        assert!(!conn.connected());
        conn.disconnect();
    }

    #[test]
    fn removed_builtin_event_is_skipped_quietly() {
        let mut tree = tree();
        let w = tree.create_window("DefaultWindow", "w").unwrap();
        tree.event_set_mut(w).remove_event("Hidden");
        tree.hide(w);
        assert!(!tree.is_visible(w));
    }
}
