use anyhow::Context;
use sse_echo::config::Config;
use sse_echo::server::Server;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = match Config::load() {
        Ok(cfg) => {
            init_logging(&cfg.log_level);
            cfg
        }
        Err(e) => {
            init_logging(&Config::default().log_level);
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e).context("failed to load configuration");
        }
    };

    let server = match Server::bind(&cfg) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, address = %cfg.listen_addr, "Server setup failed");
            return Err(e).context("server setup failed");
        }
    };

    let port = match server.local_addr() {
        Ok(addr) => addr.port(),
        Err(e) => {
            tracing::error!(error = %e, "Server setup failed");
            return Err(e).context("server setup failed");
        }
    };
    tracing::info!(
        "Try connecting from a browser with: http://localhost:{}{}?message=Hello",
        port,
        cfg.endpoint_path
    );

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
