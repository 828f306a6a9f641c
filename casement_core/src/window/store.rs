// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays window storage: allocation, registry and factories.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Insets;
use understory_dirty::{CycleHandling, DirtyTracker};

use super::config::TreeConfig;
use super::factory::{DefaultWindowFactory, WindowFactory};
use super::id::{INVALID, WindowId};
use super::names::WindowEvent;
use crate::dim::UVector2;
use crate::dirty;
use crate::error::{GuiError, ObjectKind};
use crate::event::EventSet;
use crate::property::{Property, builtin_properties};
use crate::trace::{TraceSink, Tracer, WindowCreatedEvent, WindowDestroyedEvent};

/// Per-window boolean settings.
///
/// These are the window's *own* settings. Effective values that depend on
/// ancestors are available through [`WindowTree::is_visible`],
/// [`WindowTree::is_disabled`] and [`WindowTree::is_active`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowFlags {
    /// Whether the window itself is shown.
    pub visible: bool,
    /// Whether the window itself is enabled.
    pub enabled: bool,
    /// Whether the window holds activation among its siblings.
    pub active: bool,
    /// Whether the parent's effective alpha is applied.
    pub inherits_alpha: bool,
    /// Whether the window is clipped to its parent's inner rect.
    pub clipped_by_parent: bool,
    /// Whether destroying the parent destroys this window too.
    pub destroyed_by_parent: bool,
    /// Whether the window stays in front of normal siblings.
    pub always_on_top: bool,
    /// Whether z-order operations move the window.
    pub z_order_change_enabled: bool,
    /// Whether releasing capture restores the previous holder.
    pub restore_old_capture: bool,
    /// Whether hit-testing for input targets looks through the window.
    pub mouse_pass_through: bool,
}

impl Default for WindowFlags {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            active: false,
            inherits_alpha: true,
            clipped_by_parent: true,
            destroyed_by_parent: true,
            always_on_top: false,
            z_order_change_enabled: true,
            restore_old_capture: false,
            mouse_pass_through: false,
        }
    }
}

/// Struct-of-arrays storage for all windows of one GUI instance.
///
/// Windows are addressed by [`WindowId`] handles. Internally, each window
/// occupies a slot in parallel arrays. Destroyed windows are recycled via a
/// free list, and generation counters prevent stale handle access: using a
/// handle after its window was destroyed panics.
///
/// The tree is the explicit context that owns everything a GUI instance
/// shares: the name registry, the window factories, the capture slot, the
/// built-in property descriptors and the global event set. Several trees may
/// coexist.
pub struct WindowTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Identity --
    pub(crate) name: Vec<String>,
    pub(crate) type_name: Vec<String>,
    pub(crate) numeric_id: Vec<u32>,
    pub(crate) text: Vec<String>,

    // -- Geometry --
    pub(crate) position: Vec<UVector2>,
    pub(crate) size: Vec<UVector2>,
    pub(crate) chrome: Vec<Insets>,

    // -- State --
    pub(crate) flags: Vec<WindowFlags>,
    pub(crate) alpha: Vec<f32>,

    // -- Per-window collections --
    pub(crate) events: Vec<EventSet>,
    pub(crate) properties: Vec<BTreeMap<String, Rc<dyn Property>>>,
    pub(crate) user_strings: Vec<BTreeMap<String, String>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Shared state --
    pub(crate) registry: BTreeMap<String, u32>,
    pub(crate) factories: BTreeMap<String, Rc<dyn WindowFactory>>,
    pub(crate) builtin_properties: Vec<Rc<dyn Property>>,
    pub(crate) global_events: EventSet,
    pub(crate) capture: u32,
    /// `(pusher, previous holder)`; `previous` may be [`INVALID`].
    pub(crate) capture_stack: Vec<(u32, u32)>,
    pub(crate) modal_target: u32,
    pub(crate) config: TreeConfig,
    pub(crate) auto_name_counter: u64,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) draw_order: Vec<u32>,
    pub(crate) draw_order_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_created: Vec<u32>,
    pub(crate) pending_destroyed: Vec<u32>,

    pub(crate) trace_sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for WindowTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowTree")
            .field("windows", &self.window_count())
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("capture", &self.capture_window())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for WindowTree {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl WindowTree {
    /// Creates an empty tree with the `DefaultWindow` factory registered.
    #[must_use]
    pub fn new(config: TreeConfig) -> Self {
        let mut global_events = EventSet::new();
        for event in WindowEvent::ALL {
            let name = format!("{}{}", WindowEvent::GLOBAL_NAMESPACE, event.name());
            // Fresh set, names are unique.
            _ = global_events.add_event(&name);
        }

        let mut factories: BTreeMap<String, Rc<dyn WindowFactory>> = BTreeMap::new();
        factories.insert(
            DefaultWindowFactory::TYPE_NAME.into(),
            Rc::new(DefaultWindowFactory),
        );

        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            name: Vec::new(),
            type_name: Vec::new(),
            numeric_id: Vec::new(),
            text: Vec::new(),
            position: Vec::new(),
            size: Vec::new(),
            chrome: Vec::new(),
            flags: Vec::new(),
            alpha: Vec::new(),
            events: Vec::new(),
            properties: Vec::new(),
            user_strings: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            registry: BTreeMap::new(),
            factories,
            builtin_properties: builtin_properties(),
            global_events,
            capture: INVALID,
            capture_stack: Vec::new(),
            modal_target: INVALID,
            config,
            auto_name_counter: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            draw_order: Vec::new(),
            draw_order_dirty: true,
            pending_created: Vec::new(),
            pending_destroyed: Vec::new(),
            trace_sink: None,
        }
    }

    /// Returns the configuration the tree was created with.
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Installs a diagnostics sink.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.trace_sink = Some(sink);
    }

    /// Removes and returns the diagnostics sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace_sink.take()
    }

    pub(crate) fn tracer(&mut self) -> Tracer<'_> {
        match self.trace_sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }

    // -- Factories --

    /// Registers a window factory under its type name.
    ///
    /// Returns [`GuiError::AlreadyExists`] if the type is already registered.
    pub fn add_factory(&mut self, factory: Box<dyn WindowFactory>) -> Result<(), GuiError> {
        let type_name = factory.type_name();
        if self.factories.contains_key(type_name) {
            return Err(GuiError::already_exists(ObjectKind::Factory, type_name));
        }
        self.factories.insert(type_name.into(), Rc::from(factory));
        Ok(())
    }

    /// Unregisters a factory. Existing windows of that type are unaffected.
    pub fn remove_factory(&mut self, type_name: &str) {
        self.factories.remove(type_name);
    }

    /// Returns whether a factory for `type_name` is registered.
    #[must_use]
    pub fn is_factory_present(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    // -- Allocation / registry --

    /// Creates a window of `type_name` called `name`.
    ///
    /// An empty `name` is replaced by a generated unique name. The new window
    /// is a root: visible, enabled, inactive, fully opaque, zero-sized.
    ///
    /// Returns [`GuiError::UnknownObject`] if no factory is registered for
    /// `type_name`, [`GuiError::AlreadyExists`] if `name` is taken, or the
    /// factory's error if it fails to configure the window (in which case
    /// the window is destroyed again).
    pub fn create_window(&mut self, type_name: &str, name: &str) -> Result<WindowId, GuiError> {
        let factory = self
            .factories
            .get(type_name)
            .cloned()
            .ok_or_else(|| GuiError::unknown(ObjectKind::Factory, type_name))?;

        let name = if name.is_empty() {
            self.generate_name()
        } else {
            String::from(name)
        };
        if self.registry.contains_key(&name) {
            return Err(GuiError::already_exists(ObjectKind::Window, &name));
        }

        let id = self.allocate(name, type_name);
        if let Err(err) = factory.configure(self, id) {
            self.destroy_window(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Destroys a window.
    ///
    /// Fires `DestructStart`, releases capture held by the window, then
    /// handles the children: those with destroyed-by-parent set are destroyed
    /// recursively, the others are detached and become roots. Finally the
    /// window is detached from its parent and its [`EventSet`] is dropped,
    /// which turns every outstanding connection into an inert one.
    ///
    /// Every destroyed window is reported to the trace sink, descendants
    /// before their parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_window(&mut self, id: WindowId) {
        self.validate(id);
        self.destroy_at(id.idx);
    }

    /// Destroys every window.
    pub fn destroy_all_windows(&mut self) {
        while let Some(root) = self.roots().first().copied() {
            self.destroy_window(root);
        }
    }

    /// Returns whether the given handle refers to a live window.
    #[must_use]
    pub fn is_alive(&self, id: WindowId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live windows.
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.registry.len()
    }

    /// Looks a window up by name.
    ///
    /// Returns [`GuiError::UnknownObject`] if there is none.
    pub fn get_window(&self, name: &str) -> Result<WindowId, GuiError> {
        self.registry
            .get(name)
            .map(|&idx| self.handle(idx))
            .ok_or_else(|| GuiError::unknown(ObjectKind::Window, name))
    }

    /// Returns whether a window called `name` exists.
    #[must_use]
    pub fn is_window_present(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Renames a window.
    ///
    /// Returns [`GuiError::AlreadyExists`] if another window has `new_name`
    /// and [`GuiError::InvalidOperation`] if `new_name` is empty.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn rename_window(&mut self, id: WindowId, new_name: &str) -> Result<(), GuiError> {
        self.validate(id);
        if new_name.is_empty() {
            return Err(GuiError::InvalidOperation("window names must not be empty"));
        }
        let idx = id.idx as usize;
        if self.name[idx] == new_name {
            return Ok(());
        }
        if self.registry.contains_key(new_name) {
            return Err(GuiError::already_exists(ObjectKind::Window, new_name));
        }
        self.registry.remove(&self.name[idx]);
        self.registry.insert(new_name.into(), id.idx);
        self.name[idx] = new_name.into();
        Ok(())
    }

    // -- Simple attributes --

    /// Returns the window's name.
    #[must_use]
    pub fn name(&self, id: WindowId) -> &str {
        self.validate(id);
        &self.name[id.idx as usize]
    }

    /// Returns the factory type the window was created by.
    #[must_use]
    pub fn type_name(&self, id: WindowId) -> &str {
        self.validate(id);
        &self.type_name[id.idx as usize]
    }

    /// Returns the window's own boolean settings.
    #[must_use]
    pub fn flags(&self, id: WindowId) -> WindowFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    /// Returns the client-assigned numeric id.
    #[must_use]
    pub fn numeric_id(&self, id: WindowId) -> u32 {
        self.validate(id);
        self.numeric_id[id.idx as usize]
    }

    /// Sets the client-assigned numeric id and fires `IDChanged`.
    pub fn set_numeric_id(&mut self, id: WindowId, value: u32) {
        self.validate(id);
        if self.numeric_id[id.idx as usize] == value {
            return;
        }
        self.numeric_id[id.idx as usize] = value;
        self.notify(id.idx, WindowEvent::IdChanged, None);
    }

    /// Returns the window text.
    #[must_use]
    pub fn text(&self, id: WindowId) -> &str {
        self.validate(id);
        &self.text[id.idx as usize]
    }

    /// Sets the window text, requests a redraw and fires `TextChanged`.
    pub fn set_text(&mut self, id: WindowId, text: &str) {
        self.validate(id);
        if self.text[id.idx as usize] == text {
            return;
        }
        self.text[id.idx as usize] = text.into();
        self.dirty.mark(id.idx, dirty::REDRAW);
        self.notify(id.idx, WindowEvent::TextChanged, None);
    }

    /// Returns a user string, if set.
    #[must_use]
    pub fn user_string(&self, id: WindowId, key: &str) -> Option<&str> {
        self.validate(id);
        self.user_strings[id.idx as usize]
            .get(key)
            .map(String::as_str)
    }

    /// Sets a user string.
    pub fn set_user_string(&mut self, id: WindowId, key: &str, value: &str) {
        self.validate(id);
        self.user_strings[id.idx as usize].insert(key.into(), value.into());
    }

    /// Returns the handle of the live window in slot `idx`.
    ///
    /// Slots are what [`draw_order`](Self::draw_order) and
    /// [`TreeChanges`](super::TreeChanges) report.
    #[must_use]
    pub fn window_at(&self, idx: u32) -> Option<WindowId> {
        (idx < self.len && !self.free_list.contains(&idx)).then(|| self.handle(idx))
    }

    /// Requests a redraw of the window's geometry.
    pub fn invalidate(&mut self, id: WindowId) {
        self.validate(id);
        self.dirty.mark(id.idx, dirty::REDRAW);
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: WindowId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale WindowId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Builds the current handle for a live slot.
    pub(crate) fn handle(&self, idx: u32) -> WindowId {
        WindowId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Converts a raw slot (possibly [`INVALID`]) into an optional handle.
    pub(crate) fn handle_opt(&self, idx: u32) -> Option<WindowId> {
        (idx != INVALID).then(|| self.handle(idx))
    }

    fn generate_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", self.config.auto_name_prefix, self.auto_name_counter);
            self.auto_name_counter += 1;
            if !self.registry.contains_key(&name) {
                return name;
            }
        }
    }

    fn allocate(&mut self, name: String, type_name: &str) -> WindowId {
        let properties: BTreeMap<String, Rc<dyn Property>> = self
            .builtin_properties
            .iter()
            .map(|p| (String::from(p.name()), Rc::clone(p)))
            .collect();
        let mut events = EventSet::new();
        for event in WindowEvent::ALL {
            // Fresh set, names are unique.
            _ = events.add_event(event.name());
        }

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; the generation was bumped on destroy.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.name[i].clone_from(&name);
            self.type_name[i] = type_name.into();
            self.numeric_id[i] = 0;
            self.text[i] = String::new();
            self.position[i] = UVector2::ZERO;
            self.size[i] = UVector2::ZERO;
            self.chrome[i] = Insets::ZERO;
            self.flags[i] = WindowFlags::default();
            self.alpha[i] = 1.0;
            self.events[i] = events;
            self.properties[i] = properties;
            self.user_strings[i] = BTreeMap::new();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.name.push(name.clone());
            self.type_name.push(type_name.into());
            self.numeric_id.push(0);
            self.text.push(String::new());
            self.position.push(UVector2::ZERO);
            self.size.push(UVector2::ZERO);
            self.chrome.push(Insets::ZERO);
            self.flags.push(WindowFlags::default());
            self.alpha.push(1.0);
            self.events.push(events);
            self.properties.push(properties);
            self.user_strings.push(BTreeMap::new());
            self.generation.push(0);
            idx
        };

        self.registry.insert(name, idx);
        self.draw_order_dirty = true;
        self.pending_created.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        let generation = self.generation[idx as usize];
        self.tracer().window_created(&WindowCreatedEvent {
            window: idx,
            generation,
        });
        WindowId { idx, generation }
    }

    /// Destroys the window at `idx`; returns how many descendants were
    /// destroyed along with it.
    fn destroy_at(&mut self, idx: u32) -> u32 {
        self.notify(idx, WindowEvent::DestructStart, None);
        self.forget_capture(idx);
        if self.modal_target == idx {
            self.modal_target = INVALID;
        }

        let mut cascaded = 0;
        let children: Vec<u32> = self.child_indices(idx);
        for child in children {
            if self.flags[child as usize].destroyed_by_parent {
                cascaded += 1 + self.destroy_at(child);
            } else {
                self.remove_child_at(idx, child);
            }
        }

        let p = self.parent[idx as usize];
        if p != INVALID {
            self.remove_child_at(p, idx);
        }

        let i = idx as usize;
        self.registry.remove(&self.name[i]);
        self.events[i] = EventSet::new();
        self.properties[i].clear();
        self.user_strings[i].clear();
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;

        self.free_list.push(idx);
        self.draw_order_dirty = true;
        self.pending_destroyed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.tracer().window_destroyed(&WindowDestroyedEvent {
            window: idx,
            cascaded,
        });
        cascaded
    }
}
