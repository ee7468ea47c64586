//! HTTP gateway.
//!
//! A minimal HTTP/1.1 server exposing the same content tree as the gemini
//! listener. Gemtext files are rendered to HTML on the fly, other servable
//! files are sent as-is, and directories are redirected or listed.
//!
//! # Architecture
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and parsing utilities
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`gateway`**: Maps a request onto the content tree
//! - **`page`**: HTML page shell and directory listings
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received      (malformed → Rejecting → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve and render
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod gateway;
pub mod page;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
