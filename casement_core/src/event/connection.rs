// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscription handles.

use alloc::rc::Weak;
use core::cell::RefCell;
use core::fmt;

use super::set::{SlotKey, SubscriberList};

/// Handle on a single subscription.
///
/// Holds only a weak reference into the event's subscriber list, so it never
/// extends the lifetime of the event or its set. Cloning yields another handle
/// on the same subscription.
#[derive(Clone)]
pub struct Connection {
    list: Weak<RefCell<SubscriberList>>,
    key: SlotKey,
}

impl Connection {
    pub(super) fn new(list: Weak<RefCell<SubscriberList>>, key: SlotKey) -> Self {
        Self { list, key }
    }

    /// Returns whether the subscription is still registered.
    ///
    /// Becomes `false` after [`disconnect`](Self::disconnect), or once the
    /// owning event or event set is gone.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.list
            .upgrade()
            .is_some_and(|list| list.borrow().contains(self.key))
    }

    /// Removes the subscription.
    ///
    /// Safe to call any number of times, including after the event or event
    /// set has been destroyed; in those cases nothing happens.
    pub fn disconnect(&self) {
        if let Some(list) = self.list.upgrade() {
            list.borrow_mut().remove(self.key);
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("group", &self.key.0)
            .field("seq", &self.key.1)
            .field("connected", &self.connected())
            .finish()
    }
}

/// A [`Connection`] that disconnects when dropped.
#[derive(Debug)]
pub struct ScopedConnection(Option<Connection>);

impl ScopedConnection {
    /// Wraps `connection` so it is disconnected on drop.
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self(Some(connection))
    }

    /// Returns whether the wrapped subscription is still registered.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.0.as_ref().is_some_and(Connection::connected)
    }

    /// Disconnects immediately.
    pub fn disconnect(&mut self) {
        if let Some(c) = self.0.take() {
            c.disconnect();
        }
    }

    /// Gives up scoped ownership, returning the plain connection.
    #[must_use]
    pub fn release(mut self) -> Option<Connection> {
        self.0.take()
    }
}

impl From<Connection> for ScopedConnection {
    fn from(connection: Connection) -> Self {
        Self::new(connection)
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
