//! # gallery-engine
//!
//! A headless engine for a client-side game gallery UI: an ordered
//! collection of game cards, an upload/configure/preview workflow built on
//! modal overlays, and - at the core - an ephemeral-resource lifetime
//! manager for uploaded content and thumbnails.
//!
//! ## Design Principles
//!
//! 1. **Explicit ownership transfer**: a resource handle escapes its
//!    overlay's cleanup responsibility only through `commit`. Everything
//!    else is released exactly once when the overlay closes.
//!
//! 2. **Single-use overlays**: each overlay goes `Open -> Closed` once;
//!    operating on a closed overlay is a typed error, never a silent no-op.
//!
//! 3. **Pure projections**: rendering and search never mutate the card
//!    store. Search only toggles visibility.
//!
//! 4. **Configuration over convention**: accepted file types, placeholder
//!    assets, and default names come from `GalleryConfig`.
//!
//! ## Modules
//!
//! - `core`: identifiers, RNG, configuration, error taxonomy
//! - `resources`: resource handles and the registry tracking their lifetime
//! - `cards`: game records and the ordered card store
//! - `overlay`: the modal overlay stack with ownership cleanup
//! - `studio`: content editor, document composer, inline preview
//! - `session`: the process-scoped context wiring it all together

pub mod cards;
pub mod core;
pub mod overlay;
pub mod resources;
pub mod session;
pub mod studio;

// Re-export commonly used types
pub use crate::core::{
    content_media_type, extension_of, stem_of, GalleryConfig, GalleryError, GalleryRng, GameId,
    IdGen, OverlayError, ResourceError,
};

pub use crate::cards::{CardStore, GameRecord};

pub use crate::overlay::{OverlayId, OverlayKind, OverlayStack};

pub use crate::resources::{ResourceHandle, ResourceRegistry};

pub use crate::studio::{compose, ContentKind, StudioState};

pub use crate::session::{
    render_cards, CardView, CreateDialogState, GallerySession, PendingRead, PreviewState,
    TaskQueue,
};
