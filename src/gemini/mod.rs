//! Gemini protocol implementation.
//!
//! A client opens a TLS connection, sends one absolute URL terminated by
//! CRLF, and reads back `<status> <meta>\r\n` followed by the body, if any,
//! until the server closes the connection.
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← Buffer bytes until CRLF (max 1024 + 2)
//!        └──────┬───────────┘
//!               │ Line framed (or framing failed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatched     │ ← Parse URL, check host, resolve, write reply
//!        └──────┬───────────┘
//!               │ Reply written
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! - **`request`**: request-line framing and URL validation
//! - **`response`**: status codes and the wire form of a reply
//! - **`respond`**: maps a resolver outcome to a reply
//! - **`connection`**: drives one connection through the states above

pub mod connection;
pub mod request;
pub mod respond;
pub mod response;
