// Copyright 2026 the Casement Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw data loading.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;

/// Errors from a [`ResourceProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceError {
    /// The resource name was empty.
    EmptyName,
    /// Nothing is stored under this name in the group.
    NotFound {
        /// Requested name.
        name: String,
        /// Resource group it was looked up in.
        group: String,
    },
    /// The underlying storage failed.
    Io {
        /// Requested name.
        name: String,
        /// Description from the storage layer.
        message: String,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => f.write_str("resource name must not be empty"),
            Self::NotFound { name, group } => {
                write!(f, "resource '{name}' not found in group '{group}'")
            }
            Self::Io { name, message } => write!(f, "failed to read '{name}': {message}"),
        }
    }
}

impl core::error::Error for ResourceError {}

/// A loaded resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawData {
    name: String,
    bytes: Vec<u8>,
}

impl RawData {
    /// Wraps bytes loaded for `name`.
    #[must_use]
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// The name the data was loaded under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The loaded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Loads named blobs of bytes, grouped into resource groups.
///
/// An empty group name means the provider's default group.
pub trait ResourceProvider {
    /// Loads `name` from `group`.
    fn load_raw_data(&mut self, name: &str, group: &str) -> Result<RawData, ResourceError>;

    /// Returns data obtained from [`load_raw_data`](Self::load_raw_data).
    fn unload_raw_data(&mut self, data: RawData) {
        drop(data);
    }
}

/// Loaded data that is handed back to its provider when dropped.
///
/// ```
/// # use casement_core::collab::{MemoryResourceProvider, RawDataGuard};
/// let mut provider = MemoryResourceProvider::new();
/// provider.insert("", "hello.txt", b"hello".to_vec());
/// {
///     let data = RawDataGuard::load(&mut provider, "hello.txt", "").unwrap();
///     assert_eq!(&*data, b"hello");
/// }
/// assert_eq!(provider.outstanding(), 0);
/// ```
pub struct RawDataGuard<'a, P: ResourceProvider + ?Sized> {
    provider: &'a mut P,
    data: RawData,
}

impl<'a, P: ResourceProvider + ?Sized> RawDataGuard<'a, P> {
    /// Loads `name` from `group` and guards the result.
    pub fn load(provider: &'a mut P, name: &str, group: &str) -> Result<Self, ResourceError> {
        let data = provider.load_raw_data(name, group)?;
        Ok(Self { provider, data })
    }

    /// The guarded data.
    #[must_use]
    pub fn data(&self) -> &RawData {
        &self.data
    }
}

impl<P: ResourceProvider + ?Sized> Deref for RawDataGuard<'_, P> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data().bytes()
    }
}

impl<P: ResourceProvider + ?Sized> Drop for RawDataGuard<'_, P> {
    fn drop(&mut self) {
        let data = core::mem::take(&mut self.data);
        self.provider.unload_raw_data(data);
    }
}

impl<P: ResourceProvider + ?Sized> fmt::Debug for RawDataGuard<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawDataGuard")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// An in-memory provider, keyed by group and name.
///
/// Tracks how many loads have not been unloaded yet.
#[derive(Clone, Debug, Default)]
pub struct MemoryResourceProvider {
    entries: BTreeMap<(String, String), Vec<u8>>,
    default_group: String,
    outstanding: usize,
}

impl MemoryResourceProvider {
    /// Creates an empty provider whose default group is `""`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` under `name` in `group`.
    pub fn insert(&mut self, group: &str, name: &str, bytes: Vec<u8>) {
        self.entries.insert((group.into(), name.into()), bytes);
    }

    /// Sets the group used when a load names no group.
    pub fn set_default_group(&mut self, group: &str) {
        self.default_group = group.into();
    }

    /// Number of loads not yet unloaded.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

impl ResourceProvider for MemoryResourceProvider {
    fn load_raw_data(&mut self, name: &str, group: &str) -> Result<RawData, ResourceError> {
        if name.is_empty() {
            return Err(ResourceError::EmptyName);
        }
        let group = if group.is_empty() {
            self.default_group.as_str()
        } else {
            group
        };
        let bytes = self
            .entries
            .get(&(String::from(group), String::from(name)))
            .ok_or_else(|| ResourceError::NotFound {
                name: name.into(),
                group: group.into(),
            })?;
        self.outstanding += 1;
        Ok(RawData::new(name, bytes.clone()))
    }

    fn unload_raw_data(&mut self, data: RawData) {
        self.outstanding = self.outstanding.saturating_sub(1);
        drop(data);
    }
}

#[cfg(feature = "std")]
pub use directory::DirectoryResourceProvider;

#[cfg(feature = "std")]
mod directory {
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use std::path::PathBuf;

    use super::{RawData, ResourceError, ResourceProvider};

    /// Loads files from disk, mapping each resource group to a directory.
    ///
    /// Names in groups without a directory are resolved relative to the
    /// working directory.
    #[derive(Clone, Debug, Default)]
    pub struct DirectoryResourceProvider {
        groups: BTreeMap<String, PathBuf>,
        default_group: String,
    }

    impl DirectoryResourceProvider {
        /// Creates a provider with no group directories.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Maps `group` to `directory`.
        pub fn set_group_directory(&mut self, group: &str, directory: impl Into<PathBuf>) {
            self.groups.insert(group.into(), directory.into());
        }

        /// Returns the directory of `group`, if any.
        #[must_use]
        pub fn group_directory(&self, group: &str) -> Option<&std::path::Path> {
            self.groups.get(group).map(PathBuf::as_path)
        }

        /// Removes the directory mapping of `group`.
        pub fn clear_group_directory(&mut self, group: &str) {
            self.groups.remove(group);
        }

        /// Sets the group used when a load names no group.
        pub fn set_default_group(&mut self, group: &str) {
            self.default_group = group.into();
        }

        /// The path a load of `name` from `group` reads.
        #[must_use]
        pub fn final_path(&self, name: &str, group: &str) -> PathBuf {
            let group = if group.is_empty() {
                &self.default_group
            } else {
                group
            };
            match self.groups.get(group) {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        }
    }

    impl ResourceProvider for DirectoryResourceProvider {
        fn load_raw_data(&mut self, name: &str, group: &str) -> Result<RawData, ResourceError> {
            if name.is_empty() {
                return Err(ResourceError::EmptyName);
            }
            let path = self.final_path(name, group);
            match std::fs::read(&path) {
                Ok(bytes) => Ok(RawData::new(name, bytes)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    Err(ResourceError::NotFound {
                        name: name.into(),
                        group: group.into(),
                    })
                }
                Err(err) => Err(ResourceError::Io {
                    name: name.into(),
                    message: err.to_string(),
                }),
            }
        }
    }

}
