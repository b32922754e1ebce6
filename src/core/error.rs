//! Error taxonomy for the gallery engine.
//!
//! Three failure classes, mirroring the boundaries they occur at:
//!
//! - [`GalleryError::InputRejected`]: a file with the wrong extension or
//!   media type was offered. Surfaced to the user; no state change.
//! - [`ResourceError`]: allocation or lifetime misuse in the resource
//!   registry. Allocation failures are non-fatal at the thumbnail boundary
//!   (the caller keeps the placeholder); lifetime misuse (double release,
//!   use after release) is an invariant violation.
//! - [`OverlayError`]: operating on a closed, unknown, or non-top overlay.
//!   Invariant violations, returned as errors rather than silently ignored.

use thiserror::Error;

use crate::core::entity::GameId;
use crate::overlay::OverlayId;
use crate::resources::ResourceHandle;

/// Errors from the resource registry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// Allocation was attempted with zero bytes of content.
    #[error("cannot allocate a resource from empty content")]
    EmptyContent,

    /// Allocation was attempted with a media type the registry rejects.
    #[error("unsupported media type `{0}`")]
    UnsupportedMediaType(String),

    /// A handle was released a second time.
    #[error("{0} released twice")]
    DoubleRelease(ResourceHandle),

    /// A released handle was dereferenced.
    #[error("{0} used after release")]
    UseAfterRelease(ResourceHandle),

    /// A handle the registry never allocated.
    #[error("unknown {0}")]
    UnknownHandle(ResourceHandle),
}

/// Errors from the overlay stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OverlayError {
    /// The overlay was already closed. Overlays are single-use.
    #[error("{0} is already closed")]
    Closed(OverlayId),

    /// The overlay was never opened by this stack.
    #[error("unknown {0}")]
    Unknown(OverlayId),

    /// The overlay is open but not on top; only the top overlay accepts
    /// input or may be closed (modal semantics).
    #[error("{0} is not on top of the stack")]
    NotOnTop(OverlayId),
}

/// Top-level error type for session operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// An offered file was rejected at the input boundary.
    #[error("rejected `{name}`: {reason}")]
    InputRejected { name: String, reason: String },

    /// A resource registry failure.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// An overlay lifecycle failure.
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    /// A game ID that is not in the card store.
    #[error("unknown {0}")]
    UnknownGame(GameId),

    /// Preview was requested for a card with no uploaded content.
    #[error("{0} has no previewable content")]
    NoContent(GameId),
}

impl GalleryError {
    /// Convenience constructor for input rejections.
    #[must_use]
    pub fn rejected(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputRejected {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
