//! Listeners and TLS setup.

pub mod listener;
pub mod tls;
