//! Content resolution.
//!
//! Turns a request path into an [`Outcome`] against the sandboxed content
//! root. Both listeners go through the same [`Resolver`]; they differ only in
//! which MIME types they may serve and in how they render the outcome.
//!
//! - **`path`**: decoded, normalized request paths and the block list
//! - **`mime`**: extension table and per-listener servable sets
//! - **`resolver`**: the filesystem lookup itself

pub mod mime;
pub mod path;
pub mod resolver;

pub use mime::{Listener, MimeType};
pub use path::{BlockList, ContentPath};
pub use resolver::{Directory, Entry, Listing, Outcome, Resolver};
