//! Raw socket ownership.
//!
//! - **`guard`**: [`SocketGuard`] owns one descriptor and closes it exactly once
//! - **`stream`**: [`SocketStream`] drives a guarded descriptor through tokio's readiness API

pub mod guard;
pub mod stream;

pub use guard::SocketGuard;
pub use stream::SocketStream;
