//! SSE Echo - single-connection Server-Sent Events echo server
//!
//! Core library for socket ownership, request handling and the accept loop.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
pub mod socket;

pub use error::{Error, Result};
