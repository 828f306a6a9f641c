// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Module loading.
//!
//! A module is a named bundle of entry points. An entry point receives the
//! tree and usually registers window factories with it. Dynamic libraries are
//! one way to supply modules; [`StaticModuleLoader`] serves modules linked
//! into the host.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::GuiError;
use crate::window::WindowTree;

/// An entry point exported by a module.
pub type ModuleEntry = fn(&mut WindowTree) -> Result<(), GuiError>;

/// A loaded module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModuleHandle(u32);

/// Errors from a [`ModuleLoader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleLoadError {
    /// No module exists at this path.
    NotFound(String),
    /// The module does not export the symbol.
    SymbolNotFound {
        /// Path the module was loaded from.
        module: String,
        /// Missing symbol name.
        symbol: String,
    },
    /// The handle was never issued or the module was unloaded.
    InvalidHandle,
}

impl fmt::Display for ModuleLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "module '{path}' not found"),
            Self::SymbolNotFound { module, symbol } => {
                write!(f, "module '{module}' has no symbol '{symbol}'")
            }
            Self::InvalidHandle => f.write_str("invalid module handle"),
        }
    }
}

impl core::error::Error for ModuleLoadError {}

/// Loads modules and resolves their entry points.
pub trait ModuleLoader {
    /// Loads the module at `path`.
    fn load(&mut self, path: &str) -> Result<ModuleHandle, ModuleLoadError>;

    /// Looks up an exported entry point.
    fn resolve_symbol(
        &self,
        module: ModuleHandle,
        name: &str,
    ) -> Result<ModuleEntry, ModuleLoadError>;

    /// Unloads a module; its handle becomes invalid.
    fn unload(&mut self, module: ModuleHandle);
}

/// Serves modules registered in-process.
#[derive(Clone, Debug, Default)]
pub struct StaticModuleLoader {
    available: BTreeMap<String, BTreeMap<String, ModuleEntry>>,
    /// Indexed by handle; `None` once unloaded.
    loaded: Vec<Option<String>>,
}

impl StaticModuleLoader {
    /// Creates a loader with no modules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry` as symbol `name` of the module at `path`.
    pub fn register(&mut self, path: &str, name: &str, entry: ModuleEntry) {
        self.available
            .entry(path.into())
            .or_default()
            .insert(name.into(), entry);
    }

    fn path_of(&self, module: ModuleHandle) -> Result<&str, ModuleLoadError> {
        self.loaded
            .get(module.0 as usize)
            .and_then(Option::as_deref)
            .ok_or(ModuleLoadError::InvalidHandle)
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn load(&mut self, path: &str) -> Result<ModuleHandle, ModuleLoadError> {
        if !self.available.contains_key(path) {
            return Err(ModuleLoadError::NotFound(path.into()));
        }
        let handle = u32::try_from(self.loaded.len()).map_err(|_| ModuleLoadError::InvalidHandle)?;
        self.loaded.push(Some(path.into()));
        Ok(ModuleHandle(handle))
    }

    fn resolve_symbol(
        &self,
        module: ModuleHandle,
        name: &str,
    ) -> Result<ModuleEntry, ModuleLoadError> {
        let path = self.path_of(module)?;
        self.available
            .get(path)
            .and_then(|symbols| symbols.get(name))
            .copied()
            .ok_or_else(|| ModuleLoadError::SymbolNotFound {
                module: path.into(),
                symbol: name.into(),
            })
    }

    fn unload(&mut self, module: ModuleHandle) {
        if let Some(slot) = self.loaded.get_mut(module.0 as usize) {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::*;
    use crate::window::{TemplateFactory, TreeConfig};

    fn register_widgets(tree: &mut WindowTree) -> Result<(), GuiError> {
        tree.add_factory(Box::new(
            TemplateFactory::new("Widgets/Panel").with_value("Alpha", "0.75"),
        ))
    }

    #[test]
    fn entry_points_register_factories() {
        let mut loader = StaticModuleLoader::new();
        loader.register("widgets", "register_factories", register_widgets);

        let module = loader.load("widgets").unwrap();
        let entry = loader.resolve_symbol(module, "register_factories").unwrap();
        let mut tree = WindowTree::new(TreeConfig::small());
        entry(&mut tree).unwrap();
        let w = tree.create_window("Widgets/Panel", "p").unwrap();
        assert_eq!(tree.alpha(w), 0.75);
    }

    #[test]
    fn lookup_failures() {
        let mut loader = StaticModuleLoader::new();
        loader.register("widgets", "register_factories", register_widgets);
        assert_eq!(
            loader.load("nope"),
            Err(ModuleLoadError::NotFound("nope".into()))
        );
        let module = loader.load("widgets").unwrap();
        assert!(matches!(
            loader.resolve_symbol(module, "init"),
            Err(ModuleLoadError::SymbolNotFound { .. })
        ));
        loader.unload(module);
        assert!(matches!(
            loader.resolve_symbol(module, "register_factories"),
            Err(ModuleLoadError::InvalidHandle)
        ));
    }
}
