use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;
use tracing::{info, warn};

use crate::config::Config;
use crate::gemini;
use crate::http;

/// Pause after a failed accept, so running out of descriptors does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Source of incoming connections.
pub trait Accept: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn accept(&self) -> impl Future<Output = io::Result<(Self::Stream, SocketAddr)>> + Send;
}

impl Accept for TcpListener {
    type Stream = TcpStream;

    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }
}

/// Waits for the next connection. Accept errors are logged and skipped.
async fn next_connection<L: Accept>(listener: &L) -> (L::Stream, SocketAddr) {
    loop {
        match listener.accept().await {
            Ok(conn) => return conn,
            Err(e) => {
                warn!(error = %e, "Accept failed");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

/// Binds the gemini address. Only a failed bind is returned as an error.
pub async fn run_gemini(cfg: Arc<Config>, acceptor: TlsAcceptor) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr).await?;
    info!("Gemini listening on {}", cfg.listen_addr);

    serve_gemini(listener, cfg, acceptor).await;
    Ok(())
}

/// Accepts TLS connections and serves one gemini request on each. Never
/// returns.
pub async fn serve_gemini<L: Accept>(listener: L, cfg: Arc<Config>, acceptor: TlsAcceptor) {
    loop {
        let (socket, peer) = next_connection(&listener).await;
        let acceptor = acceptor.clone();
        let cfg = Arc::clone(&cfg);

        tokio::spawn(async move {
            let stream = match timeout(cfg.request_timeout(), acceptor.accept(socket)).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => {
                    warn!(peer = %peer, error = %e, "TLS handshake failed");
                    return;
                }
                Err(_) => {
                    warn!(peer = %peer, "TLS handshake timed out");
                    return;
                }
            };

            let client_cert = stream.get_ref().1.peer_certificates().is_some();
            info!(peer = %peer, client_cert, "Accepted connection");

            let mut conn = gemini::connection::Connection::new(stream, peer, cfg);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

/// Binds the HTTP gateway address. Only a failed bind is returned as an error.
pub async fn run_http(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.http.listen_addr).await?;
    info!("HTTP gateway listening on {}", cfg.http.listen_addr);

    serve_http(listener, cfg).await;
    Ok(())
}

/// Accepts plain connections for the HTTP gateway. Never returns.
pub async fn serve_http<L: Accept>(listener: L, cfg: Arc<Config>) {
    loop {
        let (socket, peer) = next_connection(&listener).await;
        info!(peer = %peer, "Accepted HTTP connection");

        let cfg = Arc::clone(&cfg);
        tokio::spawn(async move {
            let mut conn = http::connection::Connection::new(socket, peer, cfg);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
