//! Request Dispatcher
//!
//! Decodes a frame payload into a request, routes it to the executor, and
//! re-encodes the reply. Like the executor, the dispatcher is total: every
//! payload produces an encoded reply, with faults reduced to wire error
//! codes at this boundary.

use std::sync::Arc;

use crate::config::Config;
use crate::executor::CommandExecutor;
use crate::protocol::{decode_request, encode_reply, ErrorCode, Reply, Request};
use crate::provider::StateProvider;

/// Routes decoded requests to the command executor
pub struct RequestDispatcher {
    executor: CommandExecutor,
}

impl RequestDispatcher {
    pub fn new(provider: Arc<dyn StateProvider>, config: &Config) -> Self {
        Self {
            executor: CommandExecutor::new(provider, config.scan_radius),
        }
    }

    /// Handle one frame payload, producing the response frame payload
    pub fn handle_frame(&self, payload: &[u8]) -> Vec<u8> {
        let reply = match decode_request(payload) {
            Ok(Request::Command(command)) => match self.executor.execute(&command) {
                Ok(response) => Reply::Response(response),
                Err(fault) => Reply::error(fault.report()),
            },
            Ok(Request::Query(query)) => Reply::State(self.executor.snapshot(&query)),
            Err(err) => {
                tracing::warn!("undecodable request payload: {}", err);
                Reply::error(ErrorCode::MalformedRequest)
            }
        };

        encode(&reply)
    }
}

/// Encode a reply, degrading to an encoded opaque error rather than
/// propagating an encoder failure into the connection loop
fn encode(reply: &Reply) -> Vec<u8> {
    match encode_reply(reply) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("failed to encode reply: {}", err);
            encode_reply(&Reply::error(ErrorCode::Unknown)).unwrap_or_default()
        }
    }
}
