//! Overlay/resource lifecycle integration tests.
//!
//! These verify the central guarantee: every handle allocated within an
//! overlay and not committed is released exactly once when that overlay
//! closes, and committed handles are never released by the closing path.

use proptest::prelude::*;

use gallery_engine::cards::{CardStore, GameRecord};
use gallery_engine::core::{IdGen, OverlayError, ResourceError};
use gallery_engine::overlay::{OverlayKind, OverlayStack};
use gallery_engine::resources::{ResourceHandle, ResourceRegistry};
use gallery_engine::GalleryError;

fn alloc(registry: &mut ResourceRegistry) -> ResourceHandle {
    registry
        .allocate(b"<p>content</p>".to_vec(), "text/html")
        .unwrap()
}

// =============================================================================
// Deterministic scenarios
// =============================================================================

/// Menu -> dialog nesting: each level cleans up its own resources.
#[test]
fn test_nested_cleanup_is_per_overlay() {
    let mut overlays = OverlayStack::new();
    let mut registry = ResourceRegistry::new(0);

    let menu = overlays.open(OverlayKind::Menu);
    let dialog = overlays.open(OverlayKind::CreateDialog);

    let content = alloc(&mut registry);
    overlays.adopt(dialog, content).unwrap();

    overlays.close(dialog, &mut registry).unwrap();
    assert!(!registry.is_live(content));

    // The menu owned nothing; closing it releases nothing further.
    overlays.close(menu, &mut registry).unwrap();
    assert_eq!(registry.live_count(), 0);
}

/// A committed record's handles survive any later overlay activity.
#[test]
fn test_committed_handles_stay_live() {
    let mut overlays = OverlayStack::new();
    let mut registry = ResourceRegistry::new(0);
    let mut store = CardStore::new();
    let mut ids = IdGen::new(1);

    let dialog = overlays.open(OverlayKind::CreateDialog);
    let content = alloc(&mut registry);
    let thumb = registry.allocate(b"png".to_vec(), "image/png").unwrap();
    overlays.adopt(dialog, content).unwrap();
    overlays.adopt(dialog, thumb).unwrap();

    let record = GameRecord::new(ids.next_game(), "Demo")
        .with_content(content)
        .with_thumbnail(thumb);
    overlays
        .commit(dialog, record, &mut store, &mut registry)
        .unwrap();

    assert!(registry.is_live(content));
    assert!(registry.is_live(thumb));

    // A later overlay opening and closing must not touch them.
    let preview = overlays.open(OverlayKind::Preview);
    overlays.close(preview, &mut registry).unwrap();
    assert!(registry.is_live(content));
    assert!(registry.is_live(thumb));
}

/// Operations on a closed overlay are errors, not silent no-ops.
#[test]
fn test_closed_overlay_is_invalid() {
    let mut overlays = OverlayStack::new();
    let mut registry = ResourceRegistry::new(0);
    let mut store = CardStore::new();
    let mut ids = IdGen::new(1);

    let dialog = overlays.open(OverlayKind::CreateDialog);
    overlays.close(dialog, &mut registry).unwrap();

    let record = GameRecord::new(ids.next_game(), "Late");
    let err = overlays
        .commit(dialog, record, &mut store, &mut registry)
        .unwrap_err();
    assert_eq!(err, GalleryError::Overlay(OverlayError::Closed(dialog)));
    assert!(store.is_empty());
}

/// The registry itself refuses a second release of an overlay's handle.
#[test]
fn test_manual_release_then_close_is_double_free() {
    let mut overlays = OverlayStack::new();
    let mut registry = ResourceRegistry::new(0);

    let dialog = overlays.open(OverlayKind::CreateDialog);
    let content = alloc(&mut registry);
    overlays.adopt(dialog, content).unwrap();

    // Releasing behind the stack's back breaks the ownership contract;
    // the close surfaces it as a double release instead of hiding it.
    registry.release(content).unwrap();
    let err = overlays.close(dialog, &mut registry).unwrap_err();
    assert_eq!(
        err,
        GalleryError::Resource(ResourceError::DoubleRelease(content))
    );
}

// =============================================================================
// Release-exactly-once property
// =============================================================================

#[derive(Clone, Copy, Debug)]
enum Step {
    /// Open an overlay and adopt this many fresh handles.
    Open(usize),
    /// Close the top overlay.
    CloseTop,
    /// Commit the top overlay's first owned handle into a record.
    CommitTop,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..4).prop_map(Step::Open),
        Just(Step::CloseTop),
        Just(Step::CommitTop),
    ]
}

proptest! {
    /// For any sequence of open/adopt/close/commit, the handles left live
    /// at the end are exactly the committed ones.
    #[test]
    fn prop_uncommitted_released_exactly_once(
        script in proptest::collection::vec(step_strategy(), 1..40)
    ) {
        let mut overlays = OverlayStack::new();
        let mut registry = ResourceRegistry::new(0);
        let mut store = CardStore::new();
        let mut ids = IdGen::new(99);

        // Open overlays with the handles we adopted into them, bottom to top.
        let mut open: Vec<(gallery_engine::OverlayId, Vec<ResourceHandle>)> = Vec::new();
        let mut committed: Vec<ResourceHandle> = Vec::new();

        for step in script {
            match step {
                Step::Open(n) => {
                    let id = overlays.open(OverlayKind::CreateDialog);
                    let mut owned = Vec::new();
                    for _ in 0..n {
                        let handle = alloc(&mut registry);
                        overlays.adopt(id, handle).unwrap();
                        owned.push(handle);
                    }
                    open.push((id, owned));
                }
                Step::CloseTop => {
                    if let Some((id, owned)) = open.pop() {
                        overlays.close(id, &mut registry).unwrap();
                        for handle in owned {
                            prop_assert!(!registry.is_live(handle));
                        }
                    }
                }
                Step::CommitTop => {
                    if let Some((id, owned)) = open.pop() {
                        let mut record = GameRecord::new(ids.next_game(), "game");
                        if let Some(&first) = owned.first() {
                            record = record.with_content(first);
                            committed.push(first);
                        }
                        overlays.commit(id, record, &mut store, &mut registry).unwrap();
                        for handle in owned.iter().skip(1) {
                            prop_assert!(!registry.is_live(*handle));
                        }
                    }
                }
            }
        }

        while let Some((id, _)) = open.pop() {
            overlays.close(id, &mut registry).unwrap();
        }

        prop_assert_eq!(registry.live_count(), committed.len());
        for handle in committed {
            prop_assert!(registry.is_live(handle));
        }
    }
}
