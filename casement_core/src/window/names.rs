// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in window event names.

/// Events every window's [`EventSet`](crate::event::EventSet) is created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    /// The pixel size changed.
    Sized,
    /// The position changed.
    Moved,
    /// The text changed.
    TextChanged,
    /// The alpha value changed.
    AlphaChanged,
    /// The numeric id changed.
    IdChanged,
    /// The window became active; `other` is the sibling that lost activation.
    Activated,
    /// The window lost activation; `other` is the window that gained it.
    Deactivated,
    /// The window was shown.
    Shown,
    /// The window was hidden.
    Hidden,
    /// The window was enabled.
    Enabled,
    /// The window was disabled.
    Disabled,
    /// The clipped-by-parent setting changed.
    ClippingChanged,
    /// The destroyed-by-parent setting changed.
    DestroyedByParentChanged,
    /// The inherits-alpha setting changed.
    InheritAlphaChanged,
    /// The always-on-top setting changed.
    AlwaysOnTopChanged,
    /// The window took the capture slot.
    CaptureGained,
    /// The window lost the capture slot.
    CaptureLost,
    /// The draw path is about to paint the window.
    StartRender,
    /// The draw path finished painting the window.
    EndRender,
    /// A child was attached; `other` is the child.
    AddedChild,
    /// A child was detached; `other` is the child.
    RemovedChild,
    /// Destruction of the window has begun.
    DestructStart,
    /// The window's z-order position changed.
    ZChanged,
    /// A property was set through the property interface.
    PropertyChanged,
}

impl WindowEvent {
    /// Every built-in event, in registration order.
    pub const ALL: [Self; 24] = [
        Self::Sized,
        Self::Moved,
        Self::TextChanged,
        Self::AlphaChanged,
        Self::IdChanged,
        Self::Activated,
        Self::Deactivated,
        Self::Shown,
        Self::Hidden,
        Self::Enabled,
        Self::Disabled,
        Self::ClippingChanged,
        Self::DestroyedByParentChanged,
        Self::InheritAlphaChanged,
        Self::AlwaysOnTopChanged,
        Self::CaptureGained,
        Self::CaptureLost,
        Self::StartRender,
        Self::EndRender,
        Self::AddedChild,
        Self::RemovedChild,
        Self::DestructStart,
        Self::ZChanged,
        Self::PropertyChanged,
    ];

    /// Namespace prefix of the mirrored events in the global event set.
    pub const GLOBAL_NAMESPACE: &'static str = "Window/";

    /// The event name as registered in the window's event set.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sized => "Sized",
            Self::Moved => "Moved",
            Self::TextChanged => "TextChanged",
            Self::AlphaChanged => "AlphaChanged",
            Self::IdChanged => "IDChanged",
            Self::Activated => "Activated",
            Self::Deactivated => "Deactivated",
            Self::Shown => "Shown",
            Self::Hidden => "Hidden",
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
            Self::ClippingChanged => "ClippingChanged",
            Self::DestroyedByParentChanged => "DestroyedByParentChanged",
            Self::InheritAlphaChanged => "InheritAlphaChanged",
            Self::AlwaysOnTopChanged => "AlwaysOnTopChanged",
            Self::CaptureGained => "CaptureGained",
            Self::CaptureLost => "CaptureLost",
            Self::StartRender => "StartRender",
            Self::EndRender => "EndRender",
            Self::AddedChild => "AddedChild",
            Self::RemovedChild => "RemovedChild",
            Self::DestructStart => "DestructStart",
            Self::ZChanged => "ZChanged",
            Self::PropertyChanged => "PropertyChanged",
        }
    }
}
