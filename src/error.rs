//! Error types shared by the socket, HTTP and server layers.

use std::os::fd::RawFd;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A socket guard was constructed from a handle that can never be valid.
    #[error("invalid socket handle: {0}")]
    InvalidHandle(RawFd),

    /// A read, write, accept, bind or close failed at the OS boundary.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
