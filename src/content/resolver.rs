use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::content::mime::{Listener, MimeType};
use crate::content::path::{BlockList, ContentPath};

/// Result of resolving a request path against the content tree.
#[derive(Debug)]
pub enum Outcome {
    /// Under a block-list prefix. Rendered exactly like `NotFound`.
    Blocked,
    /// Missing, escaping the root, or not servable on this listener.
    NotFound,
    /// Unexpected filesystem failure.
    ServerError(io::Error),
    Directory(Directory),
    File { local: PathBuf, mime: MimeType },
}

#[derive(Debug, PartialEq, Eq)]
pub enum Directory {
    /// The client should re-request this path.
    Index(ContentPath),
    Listing(Listing),
}

#[derive(Debug, PartialEq, Eq)]
pub struct Listing {
    /// The directory being listed.
    pub path: ContentPath,
    /// Immediate entries, in the order the OS returned them.
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Absolute, percent-encoded link to the entry.
    pub link: String,
    pub is_dir: bool,
}

/// Maps request paths onto the content tree for one listener.
pub struct Resolver<'a> {
    root: &'a Path,
    block: &'a BlockList,
    auto_list: bool,
    listener: Listener,
}

impl<'a> Resolver<'a> {
    pub fn new(root: &'a Path, block: &'a BlockList, auto_list: bool, listener: Listener) -> Self {
        Self {
            root,
            block,
            auto_list,
            listener,
        }
    }

    pub fn from_config(cfg: &'a Config, listener: Listener) -> Self {
        Self::new(&cfg.content, &cfg.block, cfg.auto_list, listener)
    }

    /// Resolves a raw, percent-encoded request path.
    pub async fn resolve(&self, request_path: &str) -> Outcome {
        match ContentPath::parse(request_path) {
            Some(path) => self.resolve_path(&path).await,
            None => {
                tracing::debug!(path = request_path, "Rejected unnormalizable path");
                Outcome::NotFound
            }
        }
    }

    pub async fn resolve_path(&self, path: &ContentPath) -> Outcome {
        if self.block.is_blocked(path) {
            return Outcome::Blocked;
        }

        let local = path.to_local(self.root);
        if !local.starts_with(self.root) {
            return Outcome::NotFound;
        }

        let meta = match tokio::fs::metadata(&local).await {
            Ok(meta) => meta,
            Err(e) if is_missing(&e) => return Outcome::NotFound,
            Err(e) => return Outcome::ServerError(e),
        };

        if meta.is_dir() {
            if !self.auto_list {
                return Outcome::Directory(Directory::Index(path.child("index.gmi")));
            }
            return match list(path, &local).await {
                Ok(listing) => Outcome::Directory(Directory::Listing(listing)),
                Err(e) => Outcome::ServerError(e),
            };
        }

        if !meta.is_file() {
            return Outcome::NotFound;
        }

        match MimeType::from_path(&local) {
            Some(mime) if mime.is_servable(self.listener) => Outcome::File { local, mime },
            _ => Outcome::NotFound,
        }
    }
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

async fn list(path: &ContentPath, local: &Path) -> io::Result<Listing> {
    let mut dir = tokio::fs::read_dir(local).await?;
    let mut entries = Vec::new();

    while let Some(entry) = dir.next_entry().await? {
        // Names that aren't UTF-8 can't be requested back, so leave them out.
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let is_dir = entry.file_type().await?.is_dir();
        let target = path.child(&name);
        let link = if is_dir { target.dir_href() } else { target.href() };

        entries.push(Entry { name, link, is_dir });
    }

    Ok(Listing {
        path: path.clone(),
        entries,
    })
}
