//! Fault taxonomy and wire-code mapping
//!
//! Every way a command can fail, as one closed enum, plus the total mapping
//! onto the [`ErrorCode`] reported to clients. Faults are values returned
//! from the executor; they never unwind past the dispatch boundary.

use thiserror::Error;

use crate::protocol::ErrorCode;
use crate::provider::ProviderError;

/// A fault raised while resolving or executing a command
#[derive(Debug, Error)]
pub enum Fault {
    #[error("no active session")]
    NoGame,

    #[error("command requires a target")]
    MissingTarget,

    #[error("command requires block coordinates")]
    MissingBlock,

    #[error("command requires a write payload")]
    MissingWrite,

    #[error("no entity with id {0}")]
    NoSuchEntity(i32),

    #[error("no block kind '{0}'")]
    NoSuchBlock(String),

    #[error("write not supported by this command")]
    Unsupported,

    #[error("write payload kind does not match the command")]
    InvalidWriteType,

    #[error("unrecognized command code {0:#06x}")]
    UnknownCommand(u16),

    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for Fault {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnknownBlockKind(kind) => Fault::NoSuchBlock(kind),
            other => Fault::Provider(other),
        }
    }
}

impl Fault {
    /// Map this fault to its wire code, logging host-side detail.
    ///
    /// The catch-all arm logs the full fault at error level and reports only
    /// the opaque `Unknown` code; internal detail never crosses the wire.
    pub fn report(&self) -> ErrorCode {
        match self {
            Fault::NoGame => ErrorCode::NoGame,
            Fault::MissingTarget | Fault::MissingBlock | Fault::MissingWrite => {
                tracing::debug!("malformed request: {}", self);
                ErrorCode::MalformedRequest
            }
            Fault::NoSuchEntity(id) => {
                tracing::debug!("no such entity {}", id);
                ErrorCode::NoSuchEntity
            }
            Fault::NoSuchBlock(kind) => {
                tracing::debug!("no such block kind '{}'", kind);
                ErrorCode::NoSuchBlock
            }
            Fault::Unsupported => ErrorCode::UnsupportedOperation,
            Fault::InvalidWriteType => ErrorCode::InvalidTypeForWrite,
            Fault::UnknownCommand(code) => {
                tracing::warn!("unknown command code {:#06x}", code);
                ErrorCode::UnknownCommand
            }
            Fault::Provider(err) => {
                tracing::error!("provider fault: {}", err);
                ErrorCode::Unknown
            }
        }
    }
}
