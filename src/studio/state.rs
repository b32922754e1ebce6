//! Studio editor state: content, thumbnail, and the inline preview pane.

use serde::{Deserialize, Serialize};

use crate::cards::GameRecord;
use crate::core::entity::IdGen;
use crate::core::error::ResourceError;
use crate::overlay::OverlayId;
use crate::resources::{ResourceHandle, ResourceRegistry};

use super::composer::{compose, ContentKind};

/// Editor state for one open studio overlay.
///
/// The preview pane is ephemeral: `preview_now` assigns the composed
/// document directly, never through a resource handle, and the pane is
/// discarded with the overlay. Only `save_as_game` allocates a handle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudioState {
    /// The overlay this studio lives in.
    pub overlay: OverlayId,

    /// Name for the saved game.
    pub name: String,

    /// How the editor content is interpreted.
    pub kind: ContentKind,

    /// Raw editor content.
    pub content: String,

    /// Picked thumbnail, owned by the overlay until committed.
    pub thumbnail: Option<ResourceHandle>,

    /// Inline preview pane: the last composed document, if any.
    pub preview: Option<String>,
}

impl StudioState {
    /// Create a fresh studio bound to an overlay.
    pub fn new(overlay: OverlayId, name: impl Into<String>) -> Self {
        Self {
            overlay,
            name: name.into(),
            kind: ContentKind::Markup,
            content: String::new(),
            thumbnail: None,
            preview: None,
        }
    }

    /// Compose the current editor content.
    #[must_use]
    pub fn composed(&self) -> String {
        compose(&self.content, self.kind)
    }

    /// Push the composed document into the inline preview pane.
    pub fn preview_now(&mut self) {
        self.preview = Some(self.composed());
    }

    /// Allocate a handle for the composed document and build a record.
    ///
    /// The record carries the studio's thumbnail if one was picked. The
    /// caller is expected to follow up with `OverlayStack::commit`; until
    /// then the new handle should be adopted by the overlay so a cancel
    /// still cleans it up.
    pub fn save_as_game(
        &self,
        registry: &mut ResourceRegistry,
        ids: &mut IdGen,
    ) -> Result<GameRecord, ResourceError> {
        let document = self.composed();
        let content = registry.allocate(document.into_bytes(), "text/html")?;

        let mut record = GameRecord::new(ids.next_game(), self.name.clone()).with_content(content);
        if let Some(thumb) = self.thumbnail {
            record = record.with_thumbnail(thumb);
        }
        Ok(record)
    }
}
