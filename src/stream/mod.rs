//! Streaming session management
//!
//! This module provides the capture → downsample → socket pipeline:
//! - `StreamMachine`: pure state machine over discrete session events
//! - `StreamSession`: async driver owning the capture backend and socket
//!
//! Sessions run `Idle -> Connecting -> Open -> {Closed, Errored}`; terminal
//! states require the caller to build a fresh session.

mod machine;
mod session;

pub use machine::{Action, StreamEvent, StreamMachine, StreamState};
pub use session::{StreamConfig, StreamSession, StreamStats};
