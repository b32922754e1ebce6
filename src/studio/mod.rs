//! Studio: content editor, document composer, and inline preview.

pub mod composer;
pub mod state;

pub use composer::{compose, ContentKind};
pub use state::StudioState;
