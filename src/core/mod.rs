//! Core types: identifiers, RNG, configuration, and errors.

pub mod config;
pub mod entity;
pub mod error;
pub mod rng;

pub use config::{content_media_type, extension_of, stem_of, GalleryConfig};
pub use entity::{GameId, IdGen};
pub use error::{GalleryError, OverlayError, ResourceError};
pub use rng::GalleryRng;
