//! Resource registry for transient display content.
//!
//! The `ResourceRegistry` is the object-URL analogue: it wraps raw bytes
//! (uploaded files, composed documents, thumbnails) in opaque handles that
//! dereference to a locator string usable as an image or iframe source.
//!
//! ## Lifetime rules
//!
//! - A handle is created by `allocate` and released exactly once by
//!   `release`. Release is NOT idempotent: a second release is a
//!   `DoubleRelease` error, and callers are expected to track ownership
//!   transfer so it never happens.
//! - Dereferencing a released handle is `UseAfterRelease`.
//! - Released handles are remembered so misuse is distinguishable from a
//!   handle this registry never allocated (`UnknownHandle`).

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::error::ResourceError;

/// Opaque reference to transient binary content.
///
/// Usable as a display source once dereferenced via
/// [`ResourceRegistry::locator_of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle(pub u32);

impl ResourceHandle {
    /// Create a handle from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Resource({})", self.0)
    }
}

/// A live resource: its bytes, media type, and locator.
#[derive(Clone, Debug)]
struct ResourceEntry {
    bytes: Vec<u8>,
    media_type: String,
    locator: String,
}

/// Tracks live resource handles and their content.
///
/// ## Example
///
/// ```
/// use gallery_engine::resources::ResourceRegistry;
///
/// let mut registry = ResourceRegistry::new(0);
///
/// let handle = registry.allocate(b"<h1>hi</h1>".to_vec(), "text/html").unwrap();
/// let locator = registry.locator_of(handle).unwrap().to_string();
/// assert_eq!(registry.resolve(&locator), Some(&b"<h1>hi</h1>"[..]));
///
/// registry.release(handle).unwrap();
/// assert!(registry.release(handle).is_err()); // double release
/// ```
#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    live: FxHashMap<ResourceHandle, ResourceEntry>,
    released: FxHashSet<ResourceHandle>,
    next_id: u32,
    nonce: u64,
}

impl ResourceRegistry {
    /// Create a registry whose locators are namespaced by `nonce`.
    ///
    /// Sessions pass their ID-generator nonce so locators stay distinct
    /// across sessions.
    #[must_use]
    pub fn new(nonce: u64) -> Self {
        Self {
            nonce,
            ..Self::default()
        }
    }

    /// Wrap raw content in a new live handle.
    ///
    /// Fails with `EmptyContent` for zero-length content and
    /// `UnsupportedMediaType` for anything other than HTML, JavaScript, or
    /// an image type. Both are non-fatal to the caller, which falls back to
    /// a placeholder locator.
    pub fn allocate(
        &mut self,
        bytes: Vec<u8>,
        media_type: &str,
    ) -> Result<ResourceHandle, ResourceError> {
        if bytes.is_empty() {
            return Err(ResourceError::EmptyContent);
        }
        if !is_supported(media_type) {
            return Err(ResourceError::UnsupportedMediaType(media_type.to_string()));
        }

        let handle = ResourceHandle(self.next_id);
        self.next_id += 1;

        let locator = format!("blob:gallery/{:016x}/{}", self.nonce, handle.0);
        log::debug!("allocated {handle} ({media_type}, {} bytes)", bytes.len());

        self.live.insert(
            handle,
            ResourceEntry {
                bytes,
                media_type: media_type.to_string(),
                locator,
            },
        );
        Ok(handle)
    }

    /// Release a handle, invalidating its locator.
    ///
    /// Each handle must be released exactly once. A second release is a
    /// `DoubleRelease` error.
    pub fn release(&mut self, handle: ResourceHandle) -> Result<(), ResourceError> {
        if self.live.remove(&handle).is_some() {
            self.released.insert(handle);
            log::debug!("released {handle}");
            return Ok(());
        }
        if self.released.contains(&handle) {
            Err(ResourceError::DoubleRelease(handle))
        } else {
            Err(ResourceError::UnknownHandle(handle))
        }
    }

    /// Get the dereferenceable locator for a live handle.
    pub fn locator_of(&self, handle: ResourceHandle) -> Result<&str, ResourceError> {
        self.entry(handle).map(|e| e.locator.as_str())
    }

    /// Get the raw bytes behind a live handle.
    pub fn bytes_of(&self, handle: ResourceHandle) -> Result<&[u8], ResourceError> {
        self.entry(handle).map(|e| e.bytes.as_slice())
    }

    /// Get the media type of a live handle.
    pub fn media_type_of(&self, handle: ResourceHandle) -> Result<&str, ResourceError> {
        self.entry(handle).map(|e| e.media_type.as_str())
    }

    /// Dereference a locator string, as an iframe or image would.
    ///
    /// Returns `None` for locators of released resources.
    #[must_use]
    pub fn resolve(&self, locator: &str) -> Option<&[u8]> {
        self.live
            .values()
            .find(|e| e.locator == locator)
            .map(|e| e.bytes.as_slice())
    }

    /// Check if a handle is live.
    #[must_use]
    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains_key(&handle)
    }

    /// Number of live handles.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Release every live handle. Returns how many were released.
    ///
    /// Used by session teardown.
    pub fn release_all(&mut self) -> usize {
        let count = self.live.len();
        for handle in self.live.keys() {
            self.released.insert(*handle);
        }
        self.live.clear();
        if count > 0 {
            log::debug!("released {count} remaining handles");
        }
        count
    }

    fn entry(&self, handle: ResourceHandle) -> Result<&ResourceEntry, ResourceError> {
        match self.live.get(&handle) {
            Some(entry) => Ok(entry),
            None if self.released.contains(&handle) => {
                Err(ResourceError::UseAfterRelease(handle))
            }
            None => Err(ResourceError::UnknownHandle(handle)),
        }
    }
}

/// Media types the registry accepts: HTML, JavaScript, and images.
fn is_supported(media_type: &str) -> bool {
    matches!(
        media_type,
        "text/html" | "application/javascript" | "text/javascript"
    ) || media_type.starts_with("image/")
}
