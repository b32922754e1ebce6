//! The gallery session: one process-scoped context owning all shared state.
//!
//! `GallerySession` wires the registry, card store, and overlay stack
//! together and exposes the user-facing flows: placeholder population,
//! upload + create-dialog, studio editing, preview, and search. All
//! mutation funnels through `&mut self` methods invoked serially, which
//! models the UI's single event loop; asynchronous file reads come back
//! through the task queue and are applied by [`GallerySession::pump`].
//!
//! ## Resource safety
//!
//! Every handle a flow allocates is adopted by the overlay that asked for
//! it, so cancelling any dialog releases its uncommitted handles - both
//! content and thumbnail. The only way a handle outlives its overlay is
//! the commit path.

pub mod tasks;
pub mod view;

pub use tasks::{PendingRead, TaskQueue};
pub use view::{render_cards, CardView};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardStore, GameRecord};
use crate::core::config::{content_media_type, extension_of, stem_of, GalleryConfig};
use crate::core::entity::{GameId, IdGen};
use crate::core::error::{GalleryError, OverlayError};
use crate::core::rng::GalleryRng;
use crate::overlay::{OverlayId, OverlayKind, OverlayStack};
use crate::resources::{ResourceHandle, ResourceRegistry};
use crate::studio::{ContentKind, StudioState};

/// State of one open create-dialog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateDialogState {
    /// The overlay this dialog lives in.
    pub overlay: OverlayId,

    /// Editable game name, pre-filled from the uploaded file's stem.
    pub name: String,

    /// The uploaded content, owned by the overlay until committed.
    pub content: ResourceHandle,

    /// Picked thumbnail, if any.
    pub thumbnail: Option<ResourceHandle>,
}

/// State of one open preview overlay.
///
/// A preview borrows the committed record's locator; it never adopts a
/// handle, so closing it releases nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreviewState {
    /// The overlay this preview lives in.
    pub overlay: OverlayId,

    /// Title shown in the preview header.
    pub title: String,

    /// Locator the preview frame points at.
    pub locator: String,
}

/// The process-scoped gallery context.
///
/// ```
/// use gallery_engine::core::GalleryConfig;
/// use gallery_engine::session::GallerySession;
///
/// let mut session = GallerySession::with_seed(GalleryConfig::new(), 42);
///
/// let dialog = session.begin_upload("demo.html", b"<h1>hi</h1>".to_vec()).unwrap();
/// let game = session.dialog_confirm(dialog).unwrap();
///
/// assert_eq!(session.store().all().front().unwrap().id, game);
/// assert_eq!(session.store().all().front().unwrap().name, "demo");
/// ```
#[derive(Clone, Debug)]
pub struct GallerySession {
    config: GalleryConfig,
    rng: GalleryRng,
    ids: IdGen,
    registry: ResourceRegistry,
    store: CardStore,
    overlays: OverlayStack,
    tasks: TaskQueue,
    dialogs: FxHashMap<OverlayId, CreateDialogState>,
    studios: FxHashMap<OverlayId, StudioState>,
    previews: FxHashMap<OverlayId, PreviewState>,
}

impl GallerySession {
    /// Create a session seeded from system entropy.
    #[must_use]
    pub fn new(config: GalleryConfig) -> Self {
        Self::with_seed(config, rand::random::<u64>())
    }

    /// Create a session with a fixed seed (deterministic IDs and
    /// placeholder data; used by tests).
    #[must_use]
    pub fn with_seed(config: GalleryConfig, seed: u64) -> Self {
        let ids = IdGen::new(seed);
        let registry = ResourceRegistry::new(ids.nonce());
        Self {
            config,
            rng: GalleryRng::new(seed),
            ids,
            registry,
            store: CardStore::new(),
            overlays: OverlayStack::new(),
            tasks: TaskQueue::new(),
            dialogs: FxHashMap::default(),
            studios: FxHashMap::default(),
            previews: FxHashMap::default(),
        }
    }

    /// Seed the store with the initial placeholder cards.
    ///
    /// One "Blank map" followed by numbered maps with random player and
    /// like counts, in reading order.
    pub fn populate_placeholders(&mut self) {
        let players_max = self.config.placeholder_players_max.max(1);
        let likes_max = self.config.placeholder_likes_max.max(1);

        for i in 0..self.config.placeholder_cards {
            let name = if i == 0 {
                "Blank map".to_string()
            } else {
                format!("Map {}", i + 1)
            };
            let record = GameRecord::new(self.ids.next_game(), name).with_popularity(
                self.rng.gen_range(0..players_max),
                self.rng.gen_range(0..likes_max),
            );
            self.store.seed(record);
        }
    }

    /// Tear the session down: close every overlay top-down, then release
    /// every remaining live handle.
    pub fn teardown(&mut self) {
        while let Some(top) = self.overlays.top() {
            if let Err(err) = self.overlays.close(top, &mut self.registry) {
                log::warn!("teardown failed to close {top}: {err}");
                break;
            }
        }
        self.dialogs.clear();
        self.studios.clear();
        self.previews.clear();

        let released = self.registry.release_all();
        if released > 0 {
            log::debug!("teardown released {released} lingering handles");
        }
    }

    // === Menu ===

    /// Open the create menu.
    pub fn open_menu(&mut self) -> OverlayId {
        self.overlays.open(OverlayKind::Menu)
    }

    /// Menu choice: open the studio. Closes the menu first.
    pub fn menu_open_studio(&mut self, menu: OverlayId) -> Result<OverlayId, GalleryError> {
        self.require_input(menu)?;
        self.overlays.close(menu, &mut self.registry)?;
        Ok(self.open_studio())
    }

    /// Menu choice: quick upload. Closes the menu; the caller follows up
    /// with [`GallerySession::begin_upload`] once a file is picked.
    pub fn menu_quick_upload(&mut self, menu: OverlayId) -> Result<(), GalleryError> {
        self.require_input(menu)?;
        self.overlays.close(menu, &mut self.registry)
    }

    // === Upload / create-dialog ===

    /// Accept an uploaded content file and open the create-dialog for it.
    ///
    /// Rejects anything that is not `.html`/`.js` with `InputRejected` and
    /// no state change. The dialog's name field is pre-filled with the
    /// file's stem.
    pub fn begin_upload(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<OverlayId, GalleryError> {
        if !self.config.accepts_content(file_name) {
            return Err(GalleryError::rejected(
                file_name,
                "expected a .html or .js file",
            ));
        }

        let content = self.registry.allocate(bytes, content_media_type(file_name))?;
        let dialog = self.overlays.open(OverlayKind::CreateDialog);
        self.overlays.adopt(dialog, content)?;

        let stem = stem_of(file_name).trim();
        let name = if stem.is_empty() {
            self.config.default_upload_name.clone()
        } else {
            stem.to_string()
        };
        self.dialogs.insert(
            dialog,
            CreateDialogState {
                overlay: dialog,
                name,
                content,
                thumbnail: None,
            },
        );
        Ok(dialog)
    }

    /// Edit the dialog's name field.
    pub fn dialog_set_name(
        &mut self,
        dialog: OverlayId,
        name: impl Into<String>,
    ) -> Result<(), GalleryError> {
        self.require_input(dialog)?;
        let state = self
            .dialogs
            .get_mut(&dialog)
            .ok_or(OverlayError::Unknown(dialog))?;
        state.name = name.into();
        Ok(())
    }

    /// Pick a thumbnail for the dialog.
    ///
    /// Non-image media types are rejected. Allocation failure (e.g. an
    /// empty file) is returned but leaves the dialog unchanged - the
    /// placeholder thumbnail remains. Picking again releases the
    /// previously picked thumbnail immediately.
    pub fn dialog_pick_thumbnail(
        &mut self,
        dialog: OverlayId,
        file_name: &str,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), GalleryError> {
        self.require_input(dialog)?;
        if !self.dialogs.contains_key(&dialog) {
            return Err(OverlayError::Unknown(dialog).into());
        }
        if !media_type.starts_with("image/") {
            return Err(GalleryError::rejected(file_name, "expected an image"));
        }

        let thumb = self.registry.allocate(bytes, media_type)?;
        self.overlays.adopt(dialog, thumb)?;

        let previous = match self.dialogs.get_mut(&dialog) {
            Some(state) => state.thumbnail.replace(thumb),
            None => None,
        };
        if let Some(old) = previous {
            self.overlays.release_owned(dialog, old, &mut self.registry)?;
        }
        Ok(())
    }

    /// Confirm the dialog: publish a card for the uploaded content.
    ///
    /// An empty name falls back to the configured default. The new record
    /// starts with zero players and likes and lands at the front of the
    /// store.
    pub fn dialog_confirm(&mut self, dialog: OverlayId) -> Result<GameId, GalleryError> {
        self.require_input(dialog)?;
        let state = self
            .dialogs
            .get(&dialog)
            .ok_or(OverlayError::Unknown(dialog))?;

        let trimmed = state.name.trim();
        let name = if trimmed.is_empty() {
            self.config.default_upload_name.clone()
        } else {
            trimmed.to_string()
        };

        let mut record = GameRecord::new(self.ids.next_game(), name).with_content(state.content);
        if let Some(thumb) = state.thumbnail {
            record = record.with_thumbnail(thumb);
        }
        let game = record.id;

        self.overlays
            .commit(dialog, record, &mut self.store, &mut self.registry)?;
        self.dialogs.remove(&dialog);
        Ok(game)
    }

    /// Cancel the dialog, releasing the uploaded content and any picked
    /// thumbnail. No record is added.
    pub fn dialog_cancel(&mut self, dialog: OverlayId) -> Result<(), GalleryError> {
        self.require_input(dialog)?;
        self.overlays.close(dialog, &mut self.registry)?;
        self.dialogs.remove(&dialog);
        Ok(())
    }

    // === Studio ===

    /// Open a studio overlay with a fresh editor.
    pub fn open_studio(&mut self) -> OverlayId {
        let overlay = self.overlays.open(OverlayKind::Studio);
        self.studios.insert(
            overlay,
            StudioState::new(overlay, self.config.default_studio_name.clone()),
        );
        overlay
    }

    /// Edit the studio's name field.
    pub fn studio_set_name(
        &mut self,
        studio: OverlayId,
        name: impl Into<String>,
    ) -> Result<(), GalleryError> {
        self.require_input(studio)?;
        let state = self.studio_mut(studio)?;
        state.name = name.into();
        Ok(())
    }

    /// Switch the editor between markup and script.
    pub fn studio_set_kind(
        &mut self,
        studio: OverlayId,
        kind: ContentKind,
    ) -> Result<(), GalleryError> {
        self.require_input(studio)?;
        self.studio_mut(studio)?.kind = kind;
        Ok(())
    }

    /// Replace the editor content.
    pub fn studio_set_content(
        &mut self,
        studio: OverlayId,
        content: impl Into<String>,
    ) -> Result<(), GalleryError> {
        self.require_input(studio)?;
        self.studio_mut(studio)?.content = content.into();
        Ok(())
    }

    /// Start an asynchronous read of a content file into the editor.
    ///
    /// The read completes via [`GallerySession::pump`]; if the studio is
    /// closed before then, the completion is dropped.
    pub fn studio_load_file(
        &mut self,
        studio: OverlayId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), GalleryError> {
        self.require_input(studio)?;
        self.studio_mut(studio)?;
        if !self.config.accepts_content(file_name) {
            return Err(GalleryError::rejected(
                file_name,
                "expected a .html or .js file",
            ));
        }
        self.tasks.push(PendingRead {
            overlay: studio,
            file_name: file_name.to_string(),
            bytes,
        });
        Ok(())
    }

    /// Pick a thumbnail for the studio. Same rules as the dialog path.
    pub fn studio_pick_thumbnail(
        &mut self,
        studio: OverlayId,
        file_name: &str,
        media_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), GalleryError> {
        self.require_input(studio)?;
        self.studio_mut(studio)?;
        if !media_type.starts_with("image/") {
            return Err(GalleryError::rejected(file_name, "expected an image"));
        }

        let thumb = self.registry.allocate(bytes, media_type)?;
        self.overlays.adopt(studio, thumb)?;

        let previous = match self.studios.get_mut(&studio) {
            Some(state) => state.thumbnail.replace(thumb),
            None => None,
        };
        if let Some(old) = previous {
            self.overlays.release_owned(studio, old, &mut self.registry)?;
        }
        Ok(())
    }

    /// Compose the editor content into the inline preview pane.
    pub fn studio_preview(&mut self, studio: OverlayId) -> Result<(), GalleryError> {
        self.require_input(studio)?;
        self.studio_mut(studio)?.preview_now();
        Ok(())
    }

    /// Save the studio content as a new game card.
    pub fn studio_save(&mut self, studio: OverlayId) -> Result<GameId, GalleryError> {
        self.require_input(studio)?;
        {
            let default_name = self.config.default_studio_name.clone();
            let state = self.studio_mut(studio)?;
            let trimmed = state.name.trim().to_string();
            state.name = if trimmed.is_empty() { default_name } else { trimmed };
        }

        let record = {
            let state = self
                .studios
                .get(&studio)
                .ok_or(OverlayError::Unknown(studio))?;
            state.save_as_game(&mut self.registry, &mut self.ids)?
        };

        // Adopt before committing so a failure between the two steps
        // cannot leak the freshly allocated document.
        if let Some(content) = record.content {
            self.overlays.adopt(studio, content)?;
        }
        let game = record.id;
        self.overlays
            .commit(studio, record, &mut self.store, &mut self.registry)?;
        self.studios.remove(&studio);
        Ok(game)
    }

    /// Cancel the studio, discarding the editor and releasing any picked
    /// thumbnail.
    pub fn studio_cancel(&mut self, studio: OverlayId) -> Result<(), GalleryError> {
        self.require_input(studio)?;
        self.overlays.close(studio, &mut self.registry)?;
        self.studios.remove(&studio);
        Ok(())
    }

    /// Apply queued file-read completions in order.
    ///
    /// Completions whose overlay has closed in the meantime are dropped
    /// silently. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(read) = self.tasks.pop() {
            if !self.overlays.is_open(read.overlay) {
                log::debug!(
                    "dropping stale read of `{}` for closed {}",
                    read.file_name,
                    read.overlay
                );
                continue;
            }
            let Some(state) = self.studios.get_mut(&read.overlay) else {
                log::debug!("dropping read of `{}`: no studio on {}", read.file_name, read.overlay);
                continue;
            };

            state.content = String::from_utf8_lossy(&read.bytes).into_owned();
            if let Some(kind) = extension_of(&read.file_name)
                .as_deref()
                .and_then(ContentKind::from_extension)
            {
                state.kind = kind;
            }
            applied += 1;
        }
        applied
    }

    // === Preview / play ===

    /// Open a full-screen preview of a published card's content.
    pub fn open_preview(&mut self, game: GameId) -> Result<OverlayId, GalleryError> {
        let record = self.store.get(game).ok_or(GalleryError::UnknownGame(game))?;
        let content = record.content.ok_or(GalleryError::NoContent(game))?;
        let title = record.name.clone();
        let locator = self.registry.locator_of(content)?.to_string();

        let overlay = self.overlays.open(OverlayKind::Preview);
        self.previews.insert(
            overlay,
            PreviewState {
                overlay,
                title,
                locator,
            },
        );
        Ok(overlay)
    }

    /// Close a preview overlay. Releases nothing: previews borrow the
    /// committed record's locator.
    pub fn close_preview(&mut self, preview: OverlayId) -> Result<(), GalleryError> {
        self.require_input(preview)?;
        self.overlays.close(preview, &mut self.registry)?;
        self.previews.remove(&preview);
        Ok(())
    }

    /// The "enter" action. A stub: returns the launch message only.
    pub fn enter_game(&self, game: GameId) -> Result<String, GalleryError> {
        let record = self.store.get(game).ok_or(GalleryError::UnknownGame(game))?;
        log::info!("enter requested for {}", record.id);
        Ok(format!("Starting map: {} (this is a demo)", record.name))
    }

    // === Rendering / search ===

    /// Render all cards as a pure projection; `query` only toggles the
    /// `visible` flag.
    #[must_use]
    pub fn render_cards(&self, query: &str) -> Vec<CardView> {
        render_cards(&self.store, &self.registry, &self.config, query)
    }

    // === Accessors ===

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// The card store.
    #[must_use]
    pub fn store(&self) -> &CardStore {
        &self.store
    }

    /// The resource registry.
    #[must_use]
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The overlay stack.
    #[must_use]
    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    /// Dialog state for an open create-dialog.
    #[must_use]
    pub fn dialog(&self, id: OverlayId) -> Option<&CreateDialogState> {
        self.dialogs.get(&id)
    }

    /// Studio state for an open studio.
    #[must_use]
    pub fn studio(&self, id: OverlayId) -> Option<&StudioState> {
        self.studios.get(&id)
    }

    /// Preview state for an open preview.
    #[must_use]
    pub fn preview(&self, id: OverlayId) -> Option<&PreviewState> {
        self.previews.get(&id)
    }

    /// Number of file reads still queued.
    #[must_use]
    pub fn pending_reads(&self) -> usize {
        self.tasks.len()
    }

    fn studio_mut(&mut self, id: OverlayId) -> Result<&mut StudioState, OverlayError> {
        self.studios.get_mut(&id).ok_or(OverlayError::Unknown(id))
    }

    /// Closed and non-top overlays never receive input (modal semantics).
    fn require_input(&self, id: OverlayId) -> Result<(), OverlayError> {
        self.overlays.kind_of(id)?;
        if self.overlays.top() != Some(id) {
            return Err(OverlayError::NotOnTop(id));
        }
        Ok(())
    }
}
