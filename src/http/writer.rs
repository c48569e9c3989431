use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::connection::ConnectionError;
use crate::http::response::Response;

/// Serializes a response: status line, headers, blank line, body.
///
/// `Content-Length` always reflects the body; headers are emitted in name
/// order so output is stable.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        resp.protocol,
        resp.status.as_u16(),
        resp.message()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    let mut headers: Vec<_> = resp
        .headers
        .iter()
        .filter(|(k, _)| !k.eq_ignore_ascii_case("content-length"))
        .collect();
    headers.sort();

    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    buf.extend_from_slice(format!("Content-Length: {}\r\n", resp.body.len()).as_bytes());

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    // Body
    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// Total size of the serialized response.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Writes the whole response. Success means every byte was accepted;
    /// a zero-length write or an I/O error fails the entire response.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> Result<(), ConnectionError>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(ConnectionError::ShortWrite {
                    written: self.written,
                    expected: self.buffer.len(),
                });
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
