// Pure state machine for a transcription streaming session.
//
// Socket and capture callbacks are reduced to discrete input events; each
// event is a pure transition over {state, released flag} that returns the
// side effects the driver must perform. Session semantics stay testable
// without sockets or microphones.

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::audio::{downsample_to_pcm16, SampleBuffer};
use crate::transport::TranscriptPayload;

/// Session lifecycle: `Idle -> Connecting -> Open -> {Closed, Errored}`.
///
/// `Closed` and `Errored` are terminal; a new session always starts fresh
/// at `Idle`. There is no automatic reconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamState {
    Idle,
    Connecting,
    Open,
    Closed,
    Errored,
}

/// Discrete inputs driving the session.
#[derive(Debug)]
pub enum StreamEvent {
    StartRequested,
    SocketOpened,
    BufferCaptured(SampleBuffer),
    MessageReceived(String),
    SocketErrored(String),
    SocketClosed,
    StopRequested,
}

/// Side effects the driver performs after a transition.
#[derive(Debug, PartialEq)]
pub enum Action {
    /// Transmit one downsampled PCM16 frame
    SendFrame(Vec<i16>),
    /// Hand transcript text to the sink
    PublishTranscript(String),
    /// Release capture and socket resources (emitted at most once)
    ReleaseResources,
}

#[derive(Debug)]
pub struct StreamMachine {
    state: StreamState,
    target_sample_rate: u32,
    released: bool,
    frames_forwarded: usize,
    frames_dropped: usize,
}

impl StreamMachine {
    pub fn new(target_sample_rate: u32) -> Self {
        Self {
            state: StreamState::Idle,
            target_sample_rate,
            released: false,
            frames_forwarded: 0,
            frames_dropped: 0,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Buffers downsampled and forwarded while open
    pub fn frames_forwarded(&self) -> usize {
        self.frames_forwarded
    }

    /// Buffers dropped because the session was not open
    pub fn frames_dropped(&self) -> usize {
        self.frames_dropped
    }

    /// Apply one event; returns the side effects to perform, in order.
    pub fn handle(&mut self, event: StreamEvent) -> Vec<Action> {
        match event {
            StreamEvent::StartRequested => {
                if self.state == StreamState::Idle {
                    self.state = StreamState::Connecting;
                } else {
                    warn!("Start requested in {:?} state, ignoring", self.state);
                }
                Vec::new()
            }

            StreamEvent::SocketOpened => {
                if self.state == StreamState::Connecting {
                    debug!("Stream open");
                    self.state = StreamState::Open;
                }
                Vec::new()
            }

            StreamEvent::BufferCaptured(buffer) => {
                if self.state != StreamState::Open {
                    // No buffering or backpressure: anything captured while
                    // the socket is not open is dropped, never queued.
                    self.frames_dropped += 1;
                    debug!("Dropping buffer captured in {:?} state", self.state);
                    return Vec::new();
                }

                let frame = downsample_to_pcm16(
                    &buffer.samples,
                    buffer.sample_rate,
                    self.target_sample_rate,
                );
                self.frames_forwarded += 1;
                vec![Action::SendFrame(frame)]
            }

            StreamEvent::MessageReceived(text) => {
                if self.state != StreamState::Open {
                    return Vec::new();
                }
                match serde_json::from_str::<TranscriptPayload>(&text) {
                    Ok(payload) => {
                        vec![Action::PublishTranscript(
                            payload.transcript.unwrap_or_default(),
                        )]
                    }
                    Err(e) => {
                        // Malformed payloads are logged, never fatal.
                        warn!("Failed to parse transcript message: {}", e);
                        Vec::new()
                    }
                }
            }

            StreamEvent::SocketErrored(reason) => {
                if self.is_terminal() {
                    return Vec::new();
                }
                error!("Stream socket error: {}", reason);
                self.state = StreamState::Errored;
                self.release()
            }

            StreamEvent::SocketClosed => {
                if self.is_terminal() {
                    return Vec::new();
                }
                self.state = StreamState::Closed;
                self.release()
            }

            StreamEvent::StopRequested => {
                if self.state == StreamState::Idle {
                    // Nothing was acquired; stopping an unstarted session is
                    // a no-op.
                    self.state = StreamState::Closed;
                    self.released = true;
                    return Vec::new();
                }
                if !self.is_terminal() {
                    self.state = StreamState::Closed;
                }
                self.release()
            }
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, StreamState::Closed | StreamState::Errored)
    }

    fn release(&mut self) -> Vec<Action> {
        if self.released {
            return Vec::new();
        }
        self.released = true;
        vec![Action::ReleaseResources]
    }
}
