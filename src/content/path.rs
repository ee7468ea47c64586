use std::fmt;
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::Deserialize;

/// Characters escaped when a path segment is written back into a link.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A decoded, normalized request path.
///
/// Segments never contain `/`, and never are `.`, `..` or empty, so joining
/// them onto a directory cannot leave that directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentPath {
    segments: Vec<String>,
}

impl ContentPath {
    /// Decodes and normalizes a raw (percent-encoded) request path.
    ///
    /// Returns `None` when the path is not valid UTF-8 once decoded, contains
    /// a NUL byte, or climbs above the root with `..`.
    pub fn parse(raw: &str) -> Option<Self> {
        let decoded = percent_decode_str(raw).decode_utf8().ok()?;
        if decoded.contains('\0') {
            return None;
        }

        let mut segments: Vec<String> = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop()?;
                }
                s => segments.push(s.to_string()),
            }
        }

        Some(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn starts_with(&self, prefix: &ContentPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Local filesystem path below `root`.
    pub fn to_local(&self, root: &Path) -> PathBuf {
        let mut local = root.to_path_buf();
        local.extend(&self.segments);
        local
    }

    /// Percent-encoded absolute link, e.g. `/docs/a%20b.gmi`.
    pub fn href(&self) -> String {
        if self.is_root() {
            return "/".to_string();
        }
        let mut href = String::new();
        for segment in &self.segments {
            href.push('/');
            href.extend(utf8_percent_encode(segment, SEGMENT));
        }
        href
    }

    /// Like [`href`](Self::href) but always ending in `/`.
    pub fn dir_href(&self) -> String {
        let mut href = self.href();
        if !href.ends_with('/') {
            href.push('/');
        }
        href
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Ordered set of path prefixes treated as nonexistent.
///
/// Prefixes match whole segments: `/private` covers `/private` and
/// `/private/notes.gmi` but not `/privateer.gmi`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct BlockList {
    prefixes: Vec<ContentPath>,
}

impl BlockList {
    pub fn new<I, S>(prefixes: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                ContentPath::parse(p).ok_or_else(|| format!("invalid block prefix {:?}", p))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { prefixes })
    }

    pub fn is_blocked(&self, path: &ContentPath) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl TryFrom<Vec<String>> for BlockList {
    type Error = String;

    fn try_from(prefixes: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(prefixes)
    }
}
