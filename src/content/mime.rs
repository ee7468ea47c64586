//! MIME type detection based on file extensions.

use std::fmt;
use std::path::Path;

/// Which listener a file is being resolved for. Each one serves a different
/// subset of the known types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    Gemini,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Gemini,
    Html,
    Plain,
    Css,
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
}

const TABLE: &[(&str, MimeType)] = &[
    ("gmi", MimeType::Gemini),
    ("gemini", MimeType::Gemini),
    ("htm", MimeType::Html),
    ("html", MimeType::Html),
    ("txt", MimeType::Plain),
    ("css", MimeType::Css),
    ("png", MimeType::Png),
    ("jpg", MimeType::Jpeg),
    ("jpeg", MimeType::Jpeg),
    ("gif", MimeType::Gif),
    ("webp", MimeType::Webp),
    ("svg", MimeType::Svg),
];

impl MimeType {
    /// Looks up the type for `path` by extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        TABLE
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(ext))
            .map(|(_, mime)| *mime)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::Gemini => "text/gemini",
            MimeType::Html => "text/html",
            MimeType::Plain => "text/plain",
            MimeType::Css => "text/css",
            MimeType::Png => "image/png",
            MimeType::Jpeg => "image/jpeg",
            MimeType::Gif => "image/gif",
            MimeType::Webp => "image/webp",
            MimeType::Svg => "image/svg+xml",
        }
    }

    pub fn is_text(&self) -> bool {
        self.as_str().starts_with("text/")
    }

    /// Whether `listener` may transmit files of this type. Gemini serves
    /// the document formats only; HTTP serves everything in the table.
    pub fn is_servable(&self, listener: Listener) -> bool {
        match listener {
            Listener::Gemini => matches!(self, MimeType::Gemini | MimeType::Html | MimeType::Plain),
            Listener::Http => true,
        }
    }

    /// Value for a `Content-Type` header or a gemini success meta.
    pub fn content_type(&self, charset: &str) -> String {
        if self.is_text() {
            format!("{}; charset={}", self.as_str(), charset)
        } else {
            self.as_str().to_string()
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
