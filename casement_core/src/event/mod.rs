// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named, multi-subscriber notification channels.
//!
//! An [`EventSet`] maps event names to [`Event`]s. Each event owns an ordered
//! collection of subscribers, where each subscriber is a closure plus a
//! [`Group`] tag. Firing an event runs every live subscriber in group order,
//! then in subscription order within a group.
//!
//! # Connections
//!
//! Subscribing returns a [`Connection`], the caller's only handle on that
//! subscription. A connection holds a weak back-reference into the event's
//! subscriber list and never keeps the event alive:
//!
//! - [`Connection::disconnect`] removes the subscriber; it is idempotent.
//! - Once the event (or the whole set) has been removed or dropped, the
//!   connection is inert and disconnecting is a no-op.
//! - [`ScopedConnection`] disconnects automatically on drop.
//!
//! # Handled flag
//!
//! Subscribers receive a mutable [`EventArgs`]. Returning `true` (or setting
//! [`EventArgs::handled`]) marks the event as handled. This never stops the
//! remaining subscribers of the same firing; it is a signal to the caller,
//! which uses it to decide whether to keep propagating up a window hierarchy
//! (see [`WindowTree::fire_event_bubbling`](crate::window::WindowTree::fire_event_bubbling)).
//!
//! Everything here is single-threaded: the shared subscriber lists use
//! `Rc`/`RefCell`, so event sets are neither `Send` nor `Sync`.

mod args;
mod connection;
mod set;

pub use args::EventArgs;
pub use connection::{Connection, ScopedConnection};
pub use set::{Event, EventSet, Group, Subscriber};
