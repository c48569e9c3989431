//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 layer: `GET` only, no request bodies, no
//! chunked encoding. Connections are kept alive and requests may be
//! pipelined.
//!
//! # Architecture
//!
//! - **`connection`**: Frames requests off a socket and runs the request-response state machine
//! - **`parser`**: Parses one request header block
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//! - **`escape`**: HTML escaping for user-influenced text
//! - **`url`**: Splits a URI into decoded path and query arguments
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Use buffered bytes, or read until "\r\n\r\n"
//!        └──────┬──────┘
//!               │ Header block framed and parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route to file or query handler
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Connection: close → Closed
//! ```
//!
//! EOF, read or write errors and malformed requests leave the machine
//! directly; the socket is dropped without a response.

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
pub mod escape;
pub mod url;
