use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::Config;
use crate::content::{Listener, Resolver};
use crate::gemini::request::{FrameError, RequestError, parse_request, parse_request_line};
use crate::gemini::respond::respond;
use crate::gemini::response::Response;

/// One gemini connection: a single request, a single response, then close.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    config: Arc<Config>,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    AwaitingRequest,
    /// Framing finished, with either the request line or why it failed.
    Dispatched(Result<String, FrameError>),
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
            buffer: BytesMut::with_capacity(1024),
            state: ConnectionState::AwaitingRequest,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingRequest => {
                    let limit = self.config.request_timeout();
                    self.state = match timeout(limit, self.read_request()).await {
                        Ok(Some(frame)) => ConnectionState::Dispatched(frame),
                        Ok(None) => ConnectionState::Closed,
                        Err(_) => {
                            debug!(peer = %self.peer, "Timed out waiting for request");
                            ConnectionState::Closed
                        }
                    };
                }

                // Never goes back to reading: the state stays Closed.
                ConnectionState::Dispatched(frame) => {
                    let response = dispatch(&self.config, self.peer, frame).await;
                    info!(
                        peer = %self.peer,
                        status = response.status.as_u8(),
                        meta = %response.meta,
                        "Response sent"
                    );
                    self.stream.write_all(response.header().as_bytes()).await?;
                    if let Some(body) = &response.body {
                        self.stream.write_all(body).await?;
                    }
                }

                ConnectionState::Closed => break,
            }
        }

        self.stream.shutdown().await?;
        Ok(())
    }

    /// Reads until a full request line is buffered. `None` if the peer
    /// hung up first.
    async fn read_request(&mut self) -> Option<Result<String, FrameError>> {
        loop {
            match parse_request_line(&self.buffer) {
                Ok(line) => return Some(Ok(line.to_string())),
                Err(FrameError::Incomplete) => {}
                Err(e) => return Some(Err(e)),
            }

            match self.stream.read_buf(&mut self.buffer).await {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    debug!(peer = %self.peer, error = %e, "Read failed");
                    return None;
                }
            }
        }
    }
}

async fn dispatch(config: &Config, peer: SocketAddr, frame: Result<String, FrameError>) -> Response {
    let line = match frame {
        Ok(line) => line,
        Err(e) => {
            info!(peer = %peer, reason = ?e, "Unreadable request");
            return Response::bad_request();
        }
    };
    info!(peer = %peer, request = %line, "Request received");

    let request = match parse_request(&line, &config.host) {
        Ok(request) => request,
        Err(RequestError::Malformed(e)) => {
            debug!(peer = %peer, error = %e, "Malformed URL");
            return Response::bad_request();
        }
        Err(RequestError::HostMismatch(host)) => {
            debug!(peer = %peer, host = ?host, "Refused request for foreign host");
            return Response::proxy_refused();
        }
    };

    let resolver = Resolver::from_config(config, Listener::Gemini);
    let outcome = resolver.resolve(request.path()).await;
    respond(outcome, &config.default_charset).await
}
