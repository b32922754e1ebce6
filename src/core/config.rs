//! Gallery configuration.
//!
//! The engine never hardcodes accepted file types, placeholder assets, or
//! default names - sessions configure them at startup. Defaults match the
//! reference gallery: `.html`/`.js` uploads, eight placeholder cards, a
//! `blank_map.png` fallback thumbnail.

use serde::{Deserialize, Serialize};

/// Configuration for a gallery session.
///
/// Builder-style: start from `GalleryConfig::new()` and override what you
/// need.
///
/// ```
/// use gallery_engine::core::GalleryConfig;
///
/// let config = GalleryConfig::new()
///     .with_placeholder_cards(4)
///     .with_placeholder_thumbnail("empty.png");
///
/// assert!(config.accepts_content("game.html"));
/// assert!(!config.accepts_content("game.zip"));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// File extensions accepted for content uploads (lowercase, no dot).
    pub content_extensions: Vec<String>,

    /// Locator used when a card has no thumbnail.
    pub placeholder_thumbnail: String,

    /// Number of placeholder cards created by `populate_placeholders`.
    pub placeholder_cards: usize,

    /// Fallback name for uploaded games when the dialog name is empty.
    pub default_upload_name: String,

    /// Initial name for a freshly opened studio.
    pub default_studio_name: String,

    /// Exclusive upper bound for placeholder player counts.
    pub placeholder_players_max: u32,

    /// Exclusive upper bound for placeholder like counts.
    pub placeholder_likes_max: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            content_extensions: vec!["html".to_string(), "js".to_string()],
            placeholder_thumbnail: "blank_map.png".to_string(),
            placeholder_cards: 8,
            default_upload_name: "Uploaded map".to_string(),
            default_studio_name: "New map".to_string(),
            placeholder_players_max: 100,
            placeholder_likes_max: 5000,
        }
    }
}

impl GalleryConfig {
    /// Create a configuration with the reference defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted content extensions.
    #[must_use]
    pub fn with_content_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the placeholder thumbnail locator.
    #[must_use]
    pub fn with_placeholder_thumbnail(mut self, locator: impl Into<String>) -> Self {
        self.placeholder_thumbnail = locator.into();
        self
    }

    /// Set the number of placeholder cards.
    #[must_use]
    pub fn with_placeholder_cards(mut self, count: usize) -> Self {
        self.placeholder_cards = count;
        self
    }

    /// Set the fallback name for uploaded games.
    #[must_use]
    pub fn with_default_upload_name(mut self, name: impl Into<String>) -> Self {
        self.default_upload_name = name.into();
        self
    }

    /// Set the initial studio name.
    #[must_use]
    pub fn with_default_studio_name(mut self, name: impl Into<String>) -> Self {
        self.default_studio_name = name.into();
        self
    }

    /// Check whether a file name has an accepted content extension.
    #[must_use]
    pub fn accepts_content(&self, file_name: &str) -> bool {
        match extension_of(file_name) {
            Some(ext) => self.content_extensions.iter().any(|e| *e == ext),
            None => false,
        }
    }
}

/// Extract the lowercase extension of a file name, if any.
#[must_use]
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Extract the stem of a file name (everything before the last dot).
///
/// Returns the whole name when there is no extension.
#[must_use]
pub fn stem_of(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

/// Infer the media type for an accepted content upload.
#[must_use]
pub fn content_media_type(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("js") => "application/javascript",
        _ => "text/html",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_html_and_js() {
        let config = GalleryConfig::new();

        assert!(config.accepts_content("demo.html"));
        assert!(config.accepts_content("script.js"));
        assert!(config.accepts_content("UPPER.HTML"));
        assert!(!config.accepts_content("archive.zip"));
        assert!(!config.accepts_content("noextension"));
    }

    #[test]
    fn test_custom_extensions() {
        let config = GalleryConfig::new().with_content_extensions(["htm"]);

        assert!(config.accepts_content("page.htm"));
        assert!(!config.accepts_content("page.html"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("demo.html"), Some("html".to_string()));
        assert_eq!(extension_of("a.b.JS"), Some("js".to_string()));
        assert_eq!(extension_of("none"), None);
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn test_stem_of() {
        assert_eq!(stem_of("demo.html"), "demo");
        assert_eq!(stem_of("a.b.js"), "a.b");
        assert_eq!(stem_of("none"), "none");
        assert_eq!(stem_of(".hidden"), ".hidden");
    }

    #[test]
    fn test_content_media_type() {
        assert_eq!(content_media_type("demo.html"), "text/html");
        assert_eq!(content_media_type("demo.js"), "application/javascript");
    }
}
