//! Exactly-once ownership of a raw socket descriptor.

use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, IntoRawFd, RawFd};

use tracing::{trace, warn};

use crate::error::{Error, Result};

/// Marks a guard that no longer owns a descriptor.
const RELEASED: RawFd = -1;

/// Owns a raw socket descriptor and closes it when dropped.
///
/// The guard is move-only: moving it transfers the close responsibility, and
/// there is no way to obtain a second owner of the same descriptor. A failed
/// close on drop is logged and swallowed.
#[derive(Debug)]
pub struct SocketGuard {
    fd: RawFd,
}

impl SocketGuard {
    /// Takes ownership of `fd`.
    ///
    /// Returns [`Error::InvalidHandle`] for a negative descriptor.
    pub fn new(fd: RawFd) -> Result<Self> {
        if fd < 0 {
            return Err(Error::InvalidHandle(fd));
        }
        Ok(Self { fd })
    }

    /// Closes the descriptor now and reports the outcome.
    pub fn close(mut self) -> Result<()> {
        let fd = std::mem::replace(&mut self.fd, RELEASED);
        close_fd(fd).map_err(Error::Io)
    }

    /// Reads into `buf` with a single receive call.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        (&*socket2::SockRef::from(self)).read(buf)
    }

    /// Writes from `buf` with a single send call.
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (&*socket2::SockRef::from(self)).write(buf)
    }

    /// Shuts down one or both halves without giving up ownership.
    pub fn shutdown(&self, how: std::net::Shutdown) -> io::Result<()> {
        socket2::SockRef::from(self).shutdown(how)
    }

    pub fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
        socket2::SockRef::from(self).set_nonblocking(nonblocking)
    }
}

fn close_fd(fd: RawFd) -> io::Result<()> {
    trace!(fd, "closing socket");
    if unsafe { libc::close(fd) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        if self.fd == RELEASED {
            return;
        }
        if let Err(e) = close_fd(self.fd) {
            warn!(fd = self.fd, error = %e, "Error closing socket");
        }
        self.fd = RELEASED;
    }
}

impl AsRawFd for SocketGuard {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl AsFd for SocketGuard {
    fn as_fd(&self) -> BorrowedFd<'_> {
        // The descriptor stays open for as long as the guard is borrowed.
        unsafe { BorrowedFd::borrow_raw(self.fd) }
    }
}

impl IntoRawFd for SocketGuard {
    /// Releases ownership without closing the descriptor.
    fn into_raw_fd(mut self) -> RawFd {
        std::mem::replace(&mut self.fd, RELEASED)
    }
}
