// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events and event sets.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use super::args::EventArgs;
use super::connection::Connection;
use crate::error::{GuiError, ObjectKind};

/// A subscriber callable.
///
/// Returns `true` to report that it handled the event.
pub type Subscriber = Rc<dyn Fn(&mut EventArgs) -> bool>;

/// Ordering tag for subscribers of one event.
///
/// Lower groups run first. Subscribers added without an explicit group use
/// [`Group::DEFAULT`], which sorts after every explicit group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group(pub u32);

impl Group {
    /// Group used by [`EventSet::subscribe_event`].
    pub const DEFAULT: Self = Self(u32::MAX);
}

impl Default for Group {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `(group, insertion sequence)`: the ordering key of a subscriber.
pub(super) type SlotKey = (Group, u64);

/// Subscriber storage shared between an [`Event`] and its [`Connection`]s.
#[derive(Default)]
pub(crate) struct SubscriberList {
    slots: BTreeMap<SlotKey, Subscriber>,
    next_seq: u64,
}

impl SubscriberList {
    fn insert(&mut self, group: Group, subscriber: Subscriber) -> SlotKey {
        let key = (group, self.next_seq);
        self.next_seq += 1;
        self.slots.insert(key, subscriber);
        key
    }

    pub(super) fn contains(&self, key: SlotKey) -> bool {
        self.slots.contains_key(&key)
    }

    pub(super) fn remove(&mut self, key: SlotKey) {
        self.slots.remove(&key);
    }
}

/// A single named event and its subscribers.
pub struct Event {
    name: String,
    subscribers: Rc<RefCell<SubscriberList>>,
}

impl Event {
    /// Creates an event with no subscribers.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            subscribers: Rc::default(),
        }
    }

    /// Returns the event's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().slots.len()
    }

    /// Adds a subscriber in `group`.
    pub fn subscribe(&self, group: Group, subscriber: Subscriber) -> Connection {
        let key = self.subscribers.borrow_mut().insert(group, subscriber);
        Connection::new(Rc::downgrade(&self.subscribers), key)
    }

    /// Invokes every subscriber in group, then insertion, order.
    ///
    /// The subscriber list is snapshotted first, so subscribers may connect or
    /// disconnect (themselves or others) while the event is firing. Subscribers
    /// added during the firing are not invoked by it; subscribers removed
    /// during the firing are not invoked after their removal.
    pub fn fire(&self, args: &mut EventArgs) {
        let snapshot: Vec<(SlotKey, Subscriber)> = self
            .subscribers
            .borrow()
            .slots
            .iter()
            .map(|(key, sub)| (*key, Rc::clone(sub)))
            .collect();

        for (key, subscriber) in snapshot {
            if !self.subscribers.borrow().contains(key) {
                continue;
            }
            if (*subscriber)(args) {
                args.mark_handled();
            }
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A collection of uniquely named [`Event`]s.
///
/// Dropping the set drops every event; outstanding [`Connection`]s then
/// become inert.
#[derive(Default)]
pub struct EventSet {
    events: BTreeMap<String, Event>,
    muted: bool,
}

impl EventSet {
    /// Creates an empty, unmuted event set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new event.
    ///
    /// Returns [`GuiError::AlreadyExists`] if `name` is already registered.
    pub fn add_event(&mut self, name: &str) -> Result<(), GuiError> {
        if self.events.contains_key(name) {
            return Err(GuiError::already_exists(ObjectKind::Event, name));
        }
        self.events.insert(name.into(), Event::new(name));
        Ok(())
    }

    /// Removes an event, invalidating all of its connections.
    ///
    /// Does nothing if no event is registered under `name`.
    pub fn remove_event(&mut self, name: &str) {
        self.events.remove(name);
    }

    /// Removes every event.
    pub fn remove_all_events(&mut self) {
        self.events.clear();
    }

    /// Returns whether an event named `name` is registered.
    #[must_use]
    pub fn is_event_present(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    /// Returns an iterator over the registered event names, in sorted order.
    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }

    /// Returns the event registered under `name`.
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    /// Subscribes `subscriber` to `name` in [`Group::DEFAULT`].
    ///
    /// Returns [`GuiError::UnknownEvent`] if `name` is not registered.
    pub fn subscribe_event<F>(&mut self, name: &str, subscriber: F) -> Result<Connection, GuiError>
    where
        F: Fn(&mut EventArgs) -> bool + 'static,
    {
        self.subscribe_event_grouped(name, Group::DEFAULT, subscriber)
    }

    /// Subscribes `subscriber` to `name` in `group`.
    ///
    /// Returns [`GuiError::UnknownEvent`] if `name` is not registered.
    pub fn subscribe_event_grouped<F>(
        &mut self,
        name: &str,
        group: Group,
        subscriber: F,
    ) -> Result<Connection, GuiError>
    where
        F: Fn(&mut EventArgs) -> bool + 'static,
    {
        let event = self
            .events
            .get(name)
            .ok_or_else(|| GuiError::UnknownEvent(name.into()))?;
        Ok(event.subscribe(group, Rc::new(subscriber)))
    }

    /// Fires the event `name`.
    ///
    /// Every live subscriber runs, regardless of whether an earlier one
    /// marked `args` handled. A muted set validates the name but invokes
    /// nobody.
    ///
    /// Returns [`GuiError::UnknownEvent`] if `name` is not registered.
    pub fn fire_event(&self, name: &str, args: &mut EventArgs) -> Result<(), GuiError> {
        let event = self
            .events
            .get(name)
            .ok_or_else(|| GuiError::UnknownEvent(name.into()))?;
        if !self.muted {
            event.fire(args);
        }
        Ok(())
    }

    /// Mutes or unmutes the whole set.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Returns whether the set is muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl fmt::Debug for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSet")
            .field("events", &self.events.len())
            .field("muted", &self.muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::event::ScopedConnection;

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn add_event_rejects_duplicates() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        assert_eq!(
            set.add_event("Foo"),
            Err(GuiError::already_exists(ObjectKind::Event, "Foo"))
        );
    }

    #[test]
    fn subscribers_run_in_insertion_order() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let log = recorder();

        let l = Rc::clone(&log);
        let _a = set
            .subscribe_event("Foo", move |_| {
                l.borrow_mut().push("A");
                false
            })
            .unwrap();
        let l = Rc::clone(&log);
        let _b = set
            .subscribe_event("Foo", move |_| {
                l.borrow_mut().push("B");
                false
            })
            .unwrap();

        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        assert_eq!(*log.borrow(), vec!["A", "B"]);
    }

    #[test]
    fn groups_order_before_insertion() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let log = recorder();

        for (label, group) in [
            ("default", Group::DEFAULT),
            ("g5", Group(5)),
            ("g1-first", Group(1)),
            ("g1-second", Group(1)),
        ] {
            let l = Rc::clone(&log);
            let _ = set
                .subscribe_event_grouped("Foo", group, move |_| {
                    l.borrow_mut().push(label);
                    false
                })
                .unwrap();
        }

        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["g1-first", "g1-second", "g5", "default"]
        );
    }

    #[test]
    fn handled_does_not_stop_siblings() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let calls = Rc::new(Cell::new(0));

        for handles in [true, false, true] {
            let c = Rc::clone(&calls);
            let _ = set
                .subscribe_event("Foo", move |_| {
                    c.set(c.get() + 1);
                    handles
                })
                .unwrap();
        }

        let mut args = EventArgs::new();
        set.fire_event("Foo", &mut args).unwrap();
        assert_eq!(calls.get(), 3, "every subscriber must run");
        assert!(args.handled);
        assert_eq!(args.handled_count, 2);
    }

    #[test]
    fn unknown_event_is_an_error() {
        let mut set = EventSet::new();
        assert_eq!(
            set.fire_event("Nope", &mut EventArgs::new()),
            Err(GuiError::UnknownEvent("Nope".into()))
        );
        assert!(matches!(
            set.subscribe_event("Nope", |_| false),
            Err(GuiError::UnknownEvent(_))
        ));
    }

    #[test]
    fn disconnected_subscriber_is_never_invoked() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let conn = set
            .subscribe_event("Foo", move |_| {
                c.set(c.get() + 1);
                false
            })
            .unwrap();

        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        conn.disconnect();
        assert!(!conn.connected());
        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        assert_eq!(calls.get(), 1);

        // Idempotent.
        conn.disconnect();
    }

    #[test]
    fn disconnect_after_set_dropped_is_noop() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let conn = set.subscribe_event("Foo", |_| false).unwrap();
        assert!(conn.connected());
        drop(set);
        assert!(!conn.connected());
        conn.disconnect();
        conn.disconnect();
    }

    #[test]
    fn remove_event_invalidates_connections() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let conn = set.subscribe_event("Foo", |_| false).unwrap();
        set.remove_event("Foo");
        assert!(!conn.connected());
        conn.disconnect();

        // Re-adding under the same name does not revive the old connection.
        set.add_event("Foo").unwrap();
        assert!(!conn.connected());
        assert_eq!(set.event("Foo").unwrap().subscriber_count(), 0);

        // Removing an absent event is a no-op.
        set.remove_event("Bar");
    }

    #[test]
    fn subscriber_disconnecting_a_later_one_suppresses_it() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let log = recorder();
        let victim: Rc<RefCell<Option<Connection>>> = Rc::new(RefCell::new(None));

        let v = Rc::clone(&victim);
        let l = Rc::clone(&log);
        let _first = set
            .subscribe_event("Foo", move |_| {
                l.borrow_mut().push("first");
                if let Some(c) = v.borrow().as_ref() {
                    c.disconnect();
                }
                false
            })
            .unwrap();
        let l = Rc::clone(&log);
        let second = set
            .subscribe_event("Foo", move |_| {
                l.borrow_mut().push("second");
                false
            })
            .unwrap();
        *victim.borrow_mut() = Some(second);

        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn scoped_connection_disconnects_on_drop() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        {
            let _scoped = ScopedConnection::new(
                set.subscribe_event("Foo", move |_| {
                    c.set(c.get() + 1);
                    false
                })
                .unwrap(),
            );
            set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        }
        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn muted_set_invokes_nobody() {
        let mut set = EventSet::new();
        set.add_event("Foo").unwrap();
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let _conn = set
            .subscribe_event("Foo", move |_| {
                c.set(c.get() + 1);
                false
            })
            .unwrap();

        set.set_muted(true);
        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        assert!(set.fire_event("Bar", &mut EventArgs::new()).is_err());
        set.set_muted(false);
        set.fire_event("Foo", &mut EventArgs::new()).unwrap();
        assert_eq!(calls.get(), 1);
    }
}
