use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::files::{ResolveError, Resolver};
use crate::http::parser::{
    decode_head, declared_content_length, find_headers_end, parse_request, ParseError,
    MAX_BODY_BYTES, MAX_HEAD_BYTES,
};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Bytes requested from the socket per read.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Serves exactly one request on a stream, then closes it.
pub struct Connection<S> {
    stream: S,
    resolver: Resolver,
    buffer: BytesMut,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    Reading,
    Parsing(BytesMut),
    Resolving(String),
    Responding(Response),
    Closed,
}

enum ReadOutcome {
    /// The buffer holds a complete request, or all the peer sent before closing.
    Complete,
    /// The peer closed without sending anything.
    Empty,
    /// Framing failed before the request could be parsed.
    Rejected(ParseError),
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, resolver: Resolver) -> Self {
        Self {
            stream,
            resolver,
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            state: ConnectionState::Reading,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Drives the connection to `Closed`.
    ///
    /// The stream is shut down on every exit path; I/O errors are returned
    /// after that.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        self.state = ConnectionState::Closed;
        if let Err(e) = self.stream.shutdown().await {
            debug!("Shutdown after response failed: {}", e);
        }

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Complete => ConnectionState::Parsing(self.buffer.split()),
                        ReadOutcome::Empty => {
                            debug!("Peer closed before sending a request");
                            ConnectionState::Closed
                        }
                        ReadOutcome::Rejected(e) => {
                            ConnectionState::Responding(Self::parse_error_response(&e))
                        }
                    };
                }

                ConnectionState::Parsing(raw) => {
                    self.state = match Self::parse(&raw) {
                        Ok(target) => ConnectionState::Resolving(target),
                        Err(e) => ConnectionState::Responding(Self::parse_error_response(&e)),
                    };
                }

                ConnectionState::Resolving(target) => {
                    let response = self.resolve(&target).await;
                    info!(request_target = %target, status = response.status.as_u16(), "Resolved request");
                    self.state = ConnectionState::Responding(response);
                }

                ConnectionState::Responding(response) => {
                    let mut writer = ResponseWriter::new(&response);
                    debug!(bytes = writer.remaining(), "Sending response");
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Buffers the request head and any body declared by `Content-Length`.
    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            if let Some(end) = find_headers_end(&self.buffer) {
                let declared = decode_head(&self.buffer[..end]).and_then(declared_content_length);
                let body_len = match declared {
                    Ok(len) if len > MAX_BODY_BYTES => {
                        return Ok(ReadOutcome::Rejected(ParseError::TooLarge));
                    }
                    Ok(len) => len,
                    Err(e) => return Ok(ReadOutcome::Rejected(e)),
                };

                let total = end + 4 + body_len;
                if self.buffer.len() >= total {
                    self.buffer.truncate(total);
                    return Ok(ReadOutcome::Complete);
                }
            } else if self.buffer.len() > MAX_HEAD_BYTES {
                return Ok(ReadOutcome::Rejected(ParseError::TooLarge));
            }

            let n = self.stream.read(&mut chunk).await?;

            if n == 0 {
                // Peer half-closed; whatever arrived is the request
                return Ok(if self.buffer.is_empty() {
                    ReadOutcome::Empty
                } else {
                    ReadOutcome::Complete
                });
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }

    fn parse(raw: &[u8]) -> Result<String, ParseError> {
        let head_end = find_headers_end(raw).unwrap_or(raw.len());
        let head = decode_head(&raw[..head_end])?;
        parse_request(head)
    }

    async fn resolve(&self, target: &str) -> Response {
        match self.resolver.resolve(target).await {
            Ok(resource) => {
                let (body, media_type) = resource.into_body();
                Response::ok(body, media_type)
            }
            Err(ResolveError::NotFound(path)) => {
                debug!(path = %path.display(), "Nothing to serve");
                Response::not_found()
            }
            Err(e) => {
                warn!("Failed to resolve {}: {}", target, e);
                Response::internal_error()
            }
        }
    }

    fn parse_error_response(err: &ParseError) -> Response {
        debug!("Rejecting request: {}", err);
        match err {
            ParseError::MethodNotSupported(_) => Response::method_not_allowed(),
            _ => Response::bad_request(),
        }
    }
}
