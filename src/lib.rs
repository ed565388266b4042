//! # simbridge
//!
//! A local RPC bridge for a long-running simulation host: an external,
//! independent process can observe and mutate live simulation state (player
//! stats, entities, world and block state, chat/control input) over a Unix
//! domain socket, without being linked into or loaded by the host.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Unix Domain Socket                           │
//! │        (one client at a time, others queue at backlog)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ length-prefixed frames
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 FramedConnection                             │
//! │        (read frame / dispatch / write frame loop)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                RequestDispatcher                             │
//! │        (decode, route command vs query, encode)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 CommandExecutor                              │
//! │     (target resolution, read/write semantics, faults)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 StateProvider                                │
//! │          (live simulation state, host-side)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A supervisor owns the bound socket and runs the serving worker plus an
//! independent watchdog that rebinds the socket whenever its backing path
//! disappears, keeping the bridge alive across external reconnect cycles.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod provider;
pub mod executor;
pub mod dispatch;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BridgeError, Result};
pub use config::Config;
pub use dispatch::RequestDispatcher;
pub use executor::{CommandExecutor, Fault};
pub use network::{Bridge, BridgeHandle};
pub use provider::{MemoryProvider, StateProvider};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of simbridge
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
