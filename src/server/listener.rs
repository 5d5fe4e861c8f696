use std::io;
use std::net::SocketAddr;
use std::os::fd::AsRawFd;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, debug, error, info, info_span};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::connection::handle_connection;
use crate::socket::SocketStream;

/// The listening socket plus the configuration handed to each connection.
pub struct Server {
    listener: TcpListener,
    config: Config,
}

impl Server {
    /// Creates, configures and binds the listening socket.
    ///
    /// Must be called from within a tokio runtime.
    pub fn bind(cfg: &Config) -> Result<Self> {
        let addr: SocketAddr = cfg.listen_addr.parse().map_err(|e| {
            Error::Config(format!("invalid listen address {:?}: {}", cfg.listen_addr, e))
        })?;

        let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(cfg.backlog)?;
        socket.set_nonblocking(true)?;

        let listener = TcpListener::from_std(socket.into())?;

        Ok(Self {
            listener,
            config: cfg.clone(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts and serves connections one at a time, forever.
    ///
    /// A connection is served to completion, hold-open included, before the
    /// next one is accepted. Failures of a single accept or connection are
    /// logged and never end the loop.
    pub async fn run(&self) -> Result<()> {
        info!(
            address = %self.listener.local_addr()?,
            endpoint = %self.config.endpoint_path,
            "SSE echo server listening"
        );

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    debug!("accept interrupted, retrying");
                    continue;
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    continue;
                }
            };

            self.serve(stream, peer).await;
        }
    }

    async fn serve(&self, stream: TcpStream, peer: SocketAddr) {
        let conn = match stream
            .into_std()
            .map_err(Error::from)
            .and_then(SocketStream::from_tcp)
        {
            Ok(conn) => conn,
            Err(e) => {
                error!(peer = %peer, error = %e, "Failed to take ownership of connection");
                return;
            }
        };

        let fd = conn.as_raw_fd();
        info!(fd, peer = %peer, "Accepted new connection");

        let span = info_span!("client", fd, peer = %peer);
        match handle_connection(conn, &self.config).instrument(span).await {
            Ok(outcome) => debug!(fd, ?outcome, "Connection finished"),
            Err(e) => error!(fd, peer = %peer, error = %e, "Error handling client"),
        }
    }
}

