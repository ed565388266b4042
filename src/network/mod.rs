//! Network layer
//!
//! Socket supervision and per-connection serving.

pub mod connection;
pub mod supervisor;

pub use connection::FramedConnection;
pub use supervisor::{Bridge, BridgeHandle};
