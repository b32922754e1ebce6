//! Document composition for studio content.
//!
//! `compose` is a pure, deterministic string transform: script content is
//! wrapped in a minimal HTML shell with a single embedded script region,
//! markup is used verbatim. No execution happens here.

use serde::{Deserialize, Serialize};

/// What the studio editor holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    /// Raw HTML, used verbatim.
    Markup,
    /// Raw JavaScript, wrapped in the minimal shell.
    Script,
}

impl ContentKind {
    /// Infer the kind from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Markup),
            "js" => Some(Self::Script),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Markup => f.write_str("markup"),
            ContentKind::Script => f.write_str("script"),
        }
    }
}

const SHELL_HEAD: &str =
    "<!doctype html><html><head><meta charset=\"utf-8\"></head><body><div id=\"app\"></div><script>";
const SHELL_TAIL: &str = "</script></body></html>";

/// Turn editor content into a renderable document.
///
/// ```
/// use gallery_engine::studio::{compose, ContentKind};
///
/// let doc = compose("console.log(1)", ContentKind::Script);
/// assert!(doc.contains("<script>console.log(1)</script>"));
///
/// let doc = compose("<h1>hi</h1>", ContentKind::Markup);
/// assert_eq!(doc, "<h1>hi</h1>");
/// ```
#[must_use]
pub fn compose(content: &str, kind: ContentKind) -> String {
    match kind {
        ContentKind::Markup => content.to_string(),
        ContentKind::Script => format!("{SHELL_HEAD}{content}{SHELL_TAIL}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_verbatim() {
        let content = "<html><body>game</body></html>";
        assert_eq!(compose(content, ContentKind::Markup), content);
    }

    #[test]
    fn test_script_wrapped_exactly() {
        let doc = compose("console.log(1)", ContentKind::Script);
        assert_eq!(
            doc,
            "<!doctype html><html><head><meta charset=\"utf-8\"></head>\
             <body><div id=\"app\"></div><script>console.log(1)</script></body></html>"
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            compose("x()", ContentKind::Script),
            compose("x()", ContentKind::Script)
        );
    }

    #[test]
    fn test_empty_script_still_shelled() {
        let doc = compose("", ContentKind::Script);
        assert!(doc.contains("<script></script>"));
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(ContentKind::from_extension("html"), Some(ContentKind::Markup));
        assert_eq!(ContentKind::from_extension("HTM"), Some(ContentKind::Markup));
        assert_eq!(ContentKind::from_extension("js"), Some(ContentKind::Script));
        assert_eq!(ContentKind::from_extension("css"), None);
    }
}
