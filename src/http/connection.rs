use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::http::parser::{find_headers_end, parse_http_request, ParseError, HEADER_TERMINATOR};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::Router;

/// Bytes requested from the socket per read.
const READ_CHUNK: usize = 1024;

/// Every way a connection can end other than the client asking to close it.
///
/// All of these are connection-fatal: the socket is dropped and no response
/// is attempted.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection closed before a complete request header")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0:?}")]
    Malformed(ParseError),

    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

/// One client socket plus the bytes read from it but not yet consumed.
///
/// After every successful [`Connection::get_next_request`] the buffer holds
/// exactly what followed the consumed header terminator: nothing, part of
/// the next header, or further complete pipelined requests.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
        }
    }

    /// Bytes carried over for the next request.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Serves requests until the client closes, sends `Connection: close`,
    /// or a framing or write error occurs.
    ///
    /// Returns `Ok(())` only for a client-requested close.
    pub async fn run(&mut self, router: &Router) -> Result<(), ConnectionError> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    match self.get_next_request().await {
                        Ok(req) => {
                            self.state = ConnectionState::Processing(req);
                        }
                        Err(e) => {
                            self.state = ConnectionState::Closed;
                            return Err(e);
                        }
                    }
                }

                ConnectionState::Processing(req) => {
                    let response = router.process(req).await;
                    tracing::debug!(
                        uri = %req.uri,
                        status = response.status.as_u16(),
                        "request processed"
                    );

                    let keep_alive = req.keep_alive();
                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    let keep_alive = *keep_alive;
                    if let Err(e) = writer.write_to_stream(&mut self.stream).await {
                        self.state = ConnectionState::Closed;
                        return Err(e);
                    }

                    if keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Frames and parses the next request header block.
    ///
    /// No I/O happens when the buffer already holds a complete header, which
    /// is how one read can serve several pipelined requests.
    pub async fn get_next_request(&mut self) -> Result<Request, ConnectionError> {
        let headers_end = loop {
            if let Some(pos) = find_headers_end(&self.buffer) {
                break pos;
            }

            // Read more data
            let mut temp = [0u8; READ_CHUNK];
            let n = self.stream.read(&mut temp).await?;

            if n == 0 {
                return Err(ConnectionError::Closed);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        };

        let consumed = headers_end + HEADER_TERMINATOR.len();
        let request =
            parse_http_request(&self.buffer[..consumed]).map_err(ConnectionError::Malformed)?;

        // Keep only what follows this header block.
        let _ = self.buffer.split_to(consumed);
        Ok(request)
    }

    /// Writes the full response; anything less than every byte is a failure.
    pub async fn write_response(&mut self, response: &Response) -> Result<(), ConnectionError> {
        ResponseWriter::new(response)
            .write_to_stream(&mut self.stream)
            .await
    }
}
