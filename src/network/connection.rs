//! Connection Handler
//!
//! Serves a single accepted client: reads length-prefixed request frames,
//! dispatches them, writes response frames. Any failure terminates only
//! this connection; the worker returns to accept.
//!
//! No per-message timeout is enforced: a client that sends a length prefix
//! and then withholds the payload stalls the worker until it disconnects.

use std::io::{BufReader, BufWriter};
use std::os::unix::net::UnixStream;

use crate::dispatch::RequestDispatcher;
use crate::error::{BridgeError, Result};
use crate::protocol::{read_frame, write_frame};

/// Handles a single client connection
pub struct FramedConnection<'d> {
    /// Stream reader (buffered)
    reader: BufReader<UnixStream>,

    /// Stream writer (buffered)
    writer: BufWriter<UnixStream>,

    /// Shared request dispatcher
    dispatcher: &'d RequestDispatcher,
}

impl<'d> FramedConnection<'d> {
    /// Create a connection handler over an accepted stream
    pub fn new(stream: UnixStream, dispatcher: &'d RequestDispatcher) -> Result<Self> {
        // Clone the stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            dispatcher,
        })
    }

    /// Serve the connection (blocking until closed)
    ///
    /// Reads frames in a loop and sends responses. Returns when the client
    /// disconnects or an error occurs.
    pub fn serve(&mut self) -> Result<()> {
        tracing::debug!("client connected");

        loop {
            let payload = match read_frame(&mut self.reader) {
                Ok(payload) => payload,
                Err(BridgeError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("client disconnected: {}", e.kind());
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("error reading frame: {}", e);
                    return Err(e);
                }
            };

            tracing::trace!(len = payload.len(), "frame received");

            let response = self.dispatcher.handle_frame(&payload);

            if let Err(e) = write_frame(&mut self.writer, &response) {
                if let BridgeError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!("client disconnected before response: {}", io_err.kind());
                        return Ok(());
                    }
                }
                tracing::warn!("error writing frame: {}", e);
                return Err(e);
            }
        }
    }
}

/// I/O error kinds that mean the peer went away, as opposed to a fault
fn is_disconnect(kind: std::io::ErrorKind) -> bool {
    matches!(
        kind,
        std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe
    )
}
