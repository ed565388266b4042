//! Error types for simbridge
//!
//! Provides a unified error type for transport-level operations.
//!
//! Domain faults (missing target, unknown entity, ...) are deliberately NOT
//! represented here: they are answered to the client as a closed
//! [`ErrorCode`](crate::protocol::ErrorCode) and never propagate through
//! this type. See [`crate::executor::Fault`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Unified error type for simbridge transport operations
#[derive(Debug, Error)]
pub enum BridgeError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Frame payload too large: {len} bytes (max {max})")]
    FrameTooLarge { len: u32, max: u32 },

    // -------------------------------------------------------------------------
    // Socket Errors
    // -------------------------------------------------------------------------
    #[error("Failed to bind socket at {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
