use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::handler::RequestHandler;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;

/// One-shot connection: a single read, a single response, then close.
pub struct Connection<S> {
    stream: S,
    handler: Arc<RequestHandler>,
    read_buffer_size: usize,
    state: ConnectionState,
    status: Option<StatusCode>,
}

pub enum ConnectionState {
    Accepted,
    Reading,
    Parsed(Request),
    Resolving(Method, String),
    Responding(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, handler: Arc<RequestHandler>, read_buffer_size: usize) -> Self {
        Self {
            stream,
            handler,
            read_buffer_size,
            state: ConnectionState::Accepted,
            status: None,
        }
    }

    /// Status of the response sent (or attempted) on this connection.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, ConnectionState::Closed)
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Accepted => {
                    self.state = ConnectionState::Reading;
                }

                ConnectionState::Reading => {
                    let buf = self.read_request().await;
                    self.state = ConnectionState::Parsed(self.handler.parse(&buf));
                }

                ConnectionState::Parsed(request) => match self.handler.admit(&request) {
                    Ok((method, path)) => {
                        self.state = ConnectionState::Resolving(method, path.to_string());
                    }
                    Err(e) => {
                        tracing::debug!(
                            method = ?request.method,
                            path = ?request.path,
                            error = %e,
                            "Request rejected"
                        );
                        self.state = self.respond(Response::from_error(&e));
                    }
                },

                ConnectionState::Resolving(method, path) => {
                    let response = self.resolve(method, path).await;
                    self.state = self.respond(response);
                }

                ConnectionState::Responding(mut writer) => {
                    // The state is already Closed; a failed write ends the
                    // connection the same way a successful one does.
                    let written = writer.write_to_stream(&mut self.stream).await;
                    let _ = self.stream.shutdown().await;
                    written?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// The single bounded read. Whatever arrives is the whole request.
    async fn read_request(&mut self) -> BytesMut {
        let mut buf = BytesMut::zeroed(self.read_buffer_size);
        match self.stream.read(&mut buf).await {
            Ok(n) => buf.truncate(n),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read request");
                buf.clear();
            }
        }
        buf
    }

    async fn resolve(&self, method: Method, path: String) -> Response {
        let handler = Arc::clone(&self.handler);
        let target = path.clone();
        let result = tokio::task::spawn_blocking(move || handler.serve(method, &target)).await;

        match result {
            Ok(Ok(response)) => {
                tracing::info!(method = %method, path = %path, status = 200, "Served");
                response
            }
            Ok(Err(e)) => {
                let response = Response::from_error(&e);
                tracing::info!(
                    method = %method,
                    path = %path,
                    status = response.status.as_u16(),
                    error = %e,
                    "Request failed"
                );
                response
            }
            Err(e) => {
                tracing::error!(method = %method, path = %path, error = %e, "Request handler panicked");
                Response::internal_error()
            }
        }
    }

    fn respond(&mut self, response: Response) -> ConnectionState {
        self.status = Some(response.status);
        ConnectionState::Responding(ResponseWriter::new(&response))
    }
}
