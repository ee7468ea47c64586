//! gemserve - a gemini capsule server with an HTTP gateway
//!
//! Serves a directory tree over the gemini protocol and, optionally, over
//! plain HTTP with gemtext rendered to HTML.

pub mod config;
pub mod content;
pub mod gemini;
pub mod gemtext;
pub mod http;
pub mod server;
