//! HTTP-like request handling for the echo endpoint.
//!
//! Only the request line is ever looked at. Each connection carries exactly
//! one request and receives exactly one response.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine
//! - **`parser`**: extracts the request line from the first read
//! - **`query`**: lenient query string decoding and parameter lookup
//! - **`request`**: the parsed request line
//! - **`response`**: status line and header serialization
//! - **`sse`**: Server-Sent Events framing
//! - **`writer`**: write-all loop over an async stream
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read
//!        └──────┬──────┘
//!               │ 0 bytes ──────────────────────────┐
//!               ▼                                   │
//!        ┌─────────────┐                            │
//!        │   Routing   │ ← GET + endpoint path?     │
//!        └──────┬──────┘                            │
//!         yes   │   no                              │
//!     ┌─────────┴──────────┐                        │
//!     ▼                    ▼                        │
//! ┌──────────────┐  ┌────────────────────┐          │
//! │ SseResponding│  │ NotFoundResponding │          │
//! └──────┬───────┘  └─────────┬──────────┘          │
//!        ▼                    │                     │
//! ┌──────────────┐            │                     │
//! │   HoldOpen   │            │                     │
//! └──────┬───────┘            │                     │
//!        ▼                    ▼                     ▼
//!        └──────────────► Closed ◄──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sse_echo::config::Config;
//! use sse_echo::http::connection::handle_connection;
//!
//! let cfg = Config::default();
//! let outcome = handle_connection(stream, &cfg).await?;
//! ```

pub mod connection;
pub mod parser;
pub mod query;
pub mod request;
pub mod response;
pub mod sse;
pub mod writer;
