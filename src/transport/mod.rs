//! Transcription transport
//!
//! Client-initiated WebSocket to the transcription endpoint: binary PCM16
//! frames outbound, UTF-8 JSON transcript payloads inbound. A dropped
//! connection ends the session; callers observe the terminal event and start
//! a new session explicitly.

pub mod client;
pub mod messages;

pub use client::{websocket_url, ChannelEvent, ChannelState, WsChannel};
pub use messages::TranscriptPayload;
