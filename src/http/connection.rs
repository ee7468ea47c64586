use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::Config;
use crate::http::gateway;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::{Method, Request};
use crate::http::writer::{BARE_BAD_REQUEST, ResponseWriter};

pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    config: Arc<Config>,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    /// The request could not be framed; answer with a bare 400 and close.
    Rejecting,
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, config: Arc<Config>) -> Self {
        Self {
            stream,
            peer,
            config,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let limit = self.config.request_timeout();
                    self.state = match timeout(limit, self.read_request()).await {
                        Ok(Ok(Some(req))) => ConnectionState::Processing(req),
                        Ok(Ok(None)) => ConnectionState::Closed,
                        Ok(Err(e)) => {
                            debug!(peer = %self.peer, error = ?e, "HTTP parse error");
                            ConnectionState::Rejecting
                        }
                        Err(_) => {
                            debug!(peer = %self.peer, "Idle timeout");
                            ConnectionState::Closed
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = gateway::handle(&req, &self.config).await;
                    info!(
                        peer = %self.peer,
                        method = ?req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "HTTP request served"
                    );

                    let keep_alive = req.keep_alive();
                    let head_only = req.method == Method::HEAD;
                    let writer = ResponseWriter::new(&response, head_only, keep_alive);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    }
                }

                ConnectionState::Rejecting => {
                    self.stream.write_all(BARE_BAD_REQUEST).await?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        self.stream.shutdown().await?;
        Ok(())
    }

    /// Reads one request. `Ok(None)` when the client closed the connection.
    pub async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    // Remove consumed bytes
                    let _ = self.buffer.split_to(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Err(e),
            }

            match self.stream.read_buf(&mut self.buffer).await {
                Ok(0) => return Ok(None),
                Ok(_) => {}
                Err(e) => {
                    debug!(peer = %self.peer, error = %e, "Read failed");
                    return Ok(None);
                }
            }
        }
    }
}
