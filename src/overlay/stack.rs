//! Modal overlay stack with resource-ownership cleanup.
//!
//! Overlays (menu, create-dialog, studio, preview) stack above the main
//! display in LIFO order. Each overlay owns the resource handles allocated
//! on its behalf until they are committed into a game record; closing the
//! overlay releases every handle that was never committed, exactly once.
//!
//! ## State machine
//!
//! Each overlay is single-use: `Open -> Closed`, no reopening. Operating on
//! a closed overlay is an error, never a silent no-op.
//!
//! ## Modal semantics
//!
//! Only the top of the stack accepts input; older overlays are inert while
//! a child is open. `close` and `commit` therefore only apply to the top
//! overlay, which also guarantees a parent can never orphan an open child.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{CardStore, GameRecord};
use crate::core::error::{GalleryError, OverlayError, ResourceError};
use crate::resources::{ResourceHandle, ResourceRegistry};

/// Unique identifier for an overlay instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(pub u32);

impl OverlayId {
    /// Create an overlay ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Overlay({})", self.0)
    }
}

/// What an overlay is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
    /// The create menu (studio / quick upload chooser).
    Menu,
    /// Name-and-thumbnail dialog for an uploaded file.
    CreateDialog,
    /// The content editor with inline preview.
    Studio,
    /// Full-screen preview of a published card's content.
    Preview,
}

impl std::fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OverlayKind::Menu => "menu",
            OverlayKind::CreateDialog => "create-dialog",
            OverlayKind::Studio => "studio",
            OverlayKind::Preview => "preview",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum OverlayState {
    Open,
    Closed,
}

/// One overlay instance and the uncommitted handles it owns.
#[derive(Clone, Debug)]
struct OverlayNode {
    kind: OverlayKind,
    state: OverlayState,
    owned: SmallVec<[ResourceHandle; 2]>,
}

/// The stack of modal overlays.
///
/// ## Example
///
/// ```
/// use gallery_engine::overlay::{OverlayKind, OverlayStack};
/// use gallery_engine::resources::ResourceRegistry;
///
/// let mut overlays = OverlayStack::new();
/// let mut registry = ResourceRegistry::new(0);
///
/// let dialog = overlays.open(OverlayKind::CreateDialog);
/// let thumb = registry.allocate(b"png".to_vec(), "image/png").unwrap();
/// overlays.adopt(dialog, thumb).unwrap();
///
/// // Cancelling the dialog releases the uncommitted thumbnail
/// overlays.close(dialog, &mut registry).unwrap();
/// assert_eq!(registry.live_count(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OverlayStack {
    nodes: FxHashMap<OverlayId, OverlayNode>,
    /// Open overlays, bottom to top.
    order: Vec<OverlayId>,
    next_id: u32,
}

impl OverlayStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new overlay on top of the stack.
    pub fn open(&mut self, kind: OverlayKind) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;

        self.nodes.insert(
            id,
            OverlayNode {
                kind,
                state: OverlayState::Open,
                owned: SmallVec::new(),
            },
        );
        self.order.push(id);
        log::debug!("opened {kind} {id}");
        id
    }

    /// The overlay currently on top, if any.
    #[must_use]
    pub fn top(&self) -> Option<OverlayId> {
        self.order.last().copied()
    }

    /// Number of open overlays.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.order.len()
    }

    /// Check if an overlay is open.
    #[must_use]
    pub fn is_open(&self, id: OverlayId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|n| n.state == OverlayState::Open)
    }

    /// Check if an overlay receives input: open AND on top.
    #[must_use]
    pub fn accepts_input(&self, id: OverlayId) -> bool {
        self.is_open(id) && self.top() == Some(id)
    }

    /// Get an open overlay's kind.
    pub fn kind_of(&self, id: OverlayId) -> Result<OverlayKind, OverlayError> {
        self.node(id).map(|n| n.kind)
    }

    /// Number of uncommitted handles an open overlay owns.
    pub fn owned_count(&self, id: OverlayId) -> Result<usize, OverlayError> {
        self.node(id).map(|n| n.owned.len())
    }

    /// Record a handle as owned by an overlay.
    ///
    /// The handle will be released when the overlay closes, unless it is
    /// first committed into a record or superseded via `release_owned`.
    pub fn adopt(&mut self, id: OverlayId, handle: ResourceHandle) -> Result<(), OverlayError> {
        let node = self.node_mut(id)?;
        if !node.owned.contains(&handle) {
            node.owned.push(handle);
        }
        Ok(())
    }

    /// Release a handle an overlay owns, before the overlay closes.
    ///
    /// This is the supersession path: picking a new thumbnail releases the
    /// old one immediately. Fails with `UnknownHandle` if the overlay does
    /// not own the handle.
    pub fn release_owned(
        &mut self,
        id: OverlayId,
        handle: ResourceHandle,
        registry: &mut ResourceRegistry,
    ) -> Result<(), GalleryError> {
        let node = self.node_mut(id)?;
        let Some(pos) = node.owned.iter().position(|&h| h == handle) else {
            return Err(ResourceError::UnknownHandle(handle).into());
        };
        node.owned.remove(pos);
        registry.release(handle)?;
        Ok(())
    }

    /// Close the top overlay, releasing every handle it still owns.
    ///
    /// Fails with `NotOnTop` if `id` is open but not the top of the stack,
    /// and `Closed` if the overlay was already closed.
    pub fn close(
        &mut self,
        id: OverlayId,
        registry: &mut ResourceRegistry,
    ) -> Result<(), GalleryError> {
        self.require_top(id)?;

        self.order.pop();
        let node = self.nodes.get_mut(&id).ok_or(OverlayError::Unknown(id))?;
        node.state = OverlayState::Closed;

        let kind = node.kind;
        let owned: SmallVec<[ResourceHandle; 2]> = std::mem::take(&mut node.owned);
        for handle in owned {
            // Ownership is tracked here exclusively, so each uncommitted
            // handle is released exactly once.
            registry.release(handle)?;
        }
        log::debug!("closed {kind} {id}");
        Ok(())
    }

    /// Commit a record from the top overlay, then close it.
    ///
    /// Ownership of the record's handles transfers out of the overlay, so
    /// the close that follows will not release them. Any handle the overlay
    /// still owns afterwards (e.g. a picked-but-unused thumbnail) is
    /// released by the close.
    pub fn commit(
        &mut self,
        id: OverlayId,
        record: GameRecord,
        store: &mut CardStore,
        registry: &mut ResourceRegistry,
    ) -> Result<(), GalleryError> {
        self.require_top(id)?;

        for handle in record.handles() {
            if !registry.is_live(handle) {
                return Err(ResourceError::UseAfterRelease(handle).into());
            }
        }

        let node = self.nodes.get_mut(&id).ok_or(OverlayError::Unknown(id))?;
        for handle in record.handles() {
            node.owned.retain(|h| *h != handle);
        }

        log::debug!("committed {} from {id}", record.id);
        store.add(record);
        self.close(id, registry)
    }

    fn node(&self, id: OverlayId) -> Result<&OverlayNode, OverlayError> {
        match self.nodes.get(&id) {
            Some(node) if node.state == OverlayState::Open => Ok(node),
            Some(_) => Err(OverlayError::Closed(id)),
            None => Err(OverlayError::Unknown(id)),
        }
    }

    fn node_mut(&mut self, id: OverlayId) -> Result<&mut OverlayNode, OverlayError> {
        match self.nodes.get_mut(&id) {
            Some(node) if node.state == OverlayState::Open => Ok(node),
            Some(_) => Err(OverlayError::Closed(id)),
            None => Err(OverlayError::Unknown(id)),
        }
    }

    fn require_top(&self, id: OverlayId) -> Result<(), OverlayError> {
        self.node(id)?;
        if self.top() != Some(id) {
            return Err(OverlayError::NotOnTop(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::GameId;

    fn handle(registry: &mut ResourceRegistry) -> ResourceHandle {
        registry.allocate(b"<p>x</p>".to_vec(), "text/html").unwrap()
    }

    #[test]
    fn test_open_close() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let menu = overlays.open(OverlayKind::Menu);
        assert!(overlays.is_open(menu));
        assert_eq!(overlays.top(), Some(menu));
        assert_eq!(overlays.kind_of(menu), Ok(OverlayKind::Menu));

        overlays.close(menu, &mut registry).unwrap();
        assert!(!overlays.is_open(menu));
        assert_eq!(overlays.top(), None);
    }

    #[test]
    fn test_close_releases_owned() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let dialog = overlays.open(OverlayKind::CreateDialog);
        let content = handle(&mut registry);
        let thumb = handle(&mut registry);
        overlays.adopt(dialog, content).unwrap();
        overlays.adopt(dialog, thumb).unwrap();

        overlays.close(dialog, &mut registry).unwrap();

        assert_eq!(registry.live_count(), 0);
        assert!(!registry.is_live(content));
        assert!(!registry.is_live(thumb));
    }

    #[test]
    fn test_commit_transfers_ownership() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);
        let mut store = CardStore::new();

        let dialog = overlays.open(OverlayKind::CreateDialog);
        let content = handle(&mut registry);
        overlays.adopt(dialog, content).unwrap();

        let record = GameRecord::new(GameId::new(1), "Demo").with_content(content);
        overlays.commit(dialog, record, &mut store, &mut registry).unwrap();

        // Committed handle survives the close
        assert!(registry.is_live(content));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all().front().unwrap().content, Some(content));
    }

    #[test]
    fn test_commit_releases_uncommitted_leftovers() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);
        let mut store = CardStore::new();

        let dialog = overlays.open(OverlayKind::CreateDialog);
        let content = handle(&mut registry);
        let unused_thumb = handle(&mut registry);
        overlays.adopt(dialog, content).unwrap();
        overlays.adopt(dialog, unused_thumb).unwrap();

        let record = GameRecord::new(GameId::new(1), "Demo").with_content(content);
        overlays.commit(dialog, record, &mut store, &mut registry).unwrap();

        assert!(registry.is_live(content));
        assert!(!registry.is_live(unused_thumb));
    }

    #[test]
    fn test_commit_dead_handle_is_error() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);
        let mut store = CardStore::new();

        let dialog = overlays.open(OverlayKind::CreateDialog);
        let content = handle(&mut registry);
        registry.release(content).unwrap();

        let record = GameRecord::new(GameId::new(1), "Demo").with_content(content);
        let err = overlays
            .commit(dialog, record, &mut store, &mut registry)
            .unwrap_err();

        assert_eq!(
            err,
            GalleryError::Resource(ResourceError::UseAfterRelease(content))
        );
        assert!(store.is_empty());
        assert!(overlays.is_open(dialog));
    }

    #[test]
    fn test_closed_overlay_operations_fail() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let menu = overlays.open(OverlayKind::Menu);
        overlays.close(menu, &mut registry).unwrap();

        assert_eq!(
            overlays.adopt(menu, ResourceHandle(0)),
            Err(OverlayError::Closed(menu))
        );
        assert_eq!(
            overlays.close(menu, &mut registry),
            Err(GalleryError::Overlay(OverlayError::Closed(menu)))
        );
        assert_eq!(overlays.kind_of(menu), Err(OverlayError::Closed(menu)));
    }

    #[test]
    fn test_unknown_overlay() {
        let overlays = OverlayStack::new();
        let bogus = OverlayId(42);

        assert_eq!(overlays.kind_of(bogus), Err(OverlayError::Unknown(bogus)));
        assert!(!overlays.is_open(bogus));
    }

    #[test]
    fn test_only_top_accepts_input() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let menu = overlays.open(OverlayKind::Menu);
        let studio = overlays.open(OverlayKind::Studio);

        assert!(!overlays.accepts_input(menu));
        assert!(overlays.accepts_input(studio));

        // Closing a non-top overlay is rejected
        assert_eq!(
            overlays.close(menu, &mut registry),
            Err(GalleryError::Overlay(OverlayError::NotOnTop(menu)))
        );

        overlays.close(studio, &mut registry).unwrap();
        assert!(overlays.accepts_input(menu));
    }

    #[test]
    fn test_release_owned_supersession() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let dialog = overlays.open(OverlayKind::CreateDialog);
        let old_thumb = handle(&mut registry);
        overlays.adopt(dialog, old_thumb).unwrap();

        overlays.release_owned(dialog, old_thumb, &mut registry).unwrap();
        assert!(!registry.is_live(old_thumb));
        assert_eq!(overlays.owned_count(dialog), Ok(0));

        // Close must not try to release it again
        overlays.close(dialog, &mut registry).unwrap();
    }

    #[test]
    fn test_release_owned_unowned_handle() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let dialog = overlays.open(OverlayKind::CreateDialog);
        let stray = handle(&mut registry);

        let err = overlays
            .release_owned(dialog, stray, &mut registry)
            .unwrap_err();
        assert_eq!(
            err,
            GalleryError::Resource(ResourceError::UnknownHandle(stray))
        );
        assert!(registry.is_live(stray));
    }

    #[test]
    fn test_adopt_is_deduplicated() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let dialog = overlays.open(OverlayKind::CreateDialog);
        let content = handle(&mut registry);
        overlays.adopt(dialog, content).unwrap();
        overlays.adopt(dialog, content).unwrap();

        assert_eq!(overlays.owned_count(dialog), Ok(1));
        // A duplicate entry would make this close a double release
        overlays.close(dialog, &mut registry).unwrap();
    }

    #[test]
    fn test_nested_stack_order() {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);

        let menu = overlays.open(OverlayKind::Menu);
        let dialog = overlays.open(OverlayKind::CreateDialog);
        let preview = overlays.open(OverlayKind::Preview);

        assert_eq!(overlays.depth(), 3);
        assert_eq!(overlays.top(), Some(preview));

        overlays.close(preview, &mut registry).unwrap();
        assert_eq!(overlays.top(), Some(dialog));
        overlays.close(dialog, &mut registry).unwrap();
        assert_eq!(overlays.top(), Some(menu));
    }
}
