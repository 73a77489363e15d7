use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::machine::{Action, StreamEvent, StreamMachine, StreamState};
use crate::audio::{CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource};
use crate::transcript::TranscriptSink;
use crate::transport::{ChannelEvent, WsChannel};

/// Configuration for a streaming session
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket endpoint of the transcription service
    pub endpoint: String,
    /// Wire sample rate for outbound PCM16 frames
    pub target_sample_rate: u32,
    /// Capture cadence in samples
    pub buffer_samples: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:8000/transcription/ws".to_string(),
            target_sample_rate: 16000,
            buffer_samples: 4096,
        }
    }
}

/// Point-in-time view of a session for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct StreamStats {
    pub state: StreamState,
    pub frames_forwarded: usize,
    pub frames_dropped: usize,
}

type BackendSlot = Arc<Mutex<Option<Box<dyn CaptureBackend>>>>;
type ChannelSlot = Arc<Mutex<Option<WsChannel>>>;

/// One live capture → downsample → socket pipeline.
///
/// Owns one capture backend and one transport channel. At most one active
/// session should exist per process; the HTTP layer enforces the slot.
/// `Closed` and `Errored` sessions are never restarted in place; the
/// caller builds a fresh session.
pub struct StreamSession {
    config: StreamConfig,
    source: CaptureSource,
    sink: Arc<TranscriptSink>,
    machine: Arc<Mutex<StreamMachine>>,
    backend: BackendSlot,
    channel: ChannelSlot,
    pump_handle: Mutex<Option<JoinHandle<()>>>,
    recv_handle: Mutex<Option<JoinHandle<()>>>,
}

impl StreamSession {
    pub fn new(config: StreamConfig, source: CaptureSource, sink: Arc<TranscriptSink>) -> Self {
        let machine = StreamMachine::new(config.target_sample_rate);
        Self {
            config,
            source,
            sink,
            machine: Arc::new(Mutex::new(machine)),
            backend: Arc::new(Mutex::new(None)),
            channel: Arc::new(Mutex::new(None)),
            pump_handle: Mutex::new(None),
            recv_handle: Mutex::new(None),
        }
    }

    /// Start streaming: connect the socket, then start capture.
    ///
    /// Starting an already-running session is a no-op; two microphone
    /// handles are never open at once. Permission denial aborts the start
    /// and tears down whatever was acquired.
    pub async fn start(&self) -> Result<()> {
        {
            let mut machine = self.machine.lock().await;
            if machine.state() != StreamState::Idle {
                warn!("Stream session already started ({:?})", machine.state());
                return Ok(());
            }
            machine.handle(StreamEvent::StartRequested);
        }

        info!("Starting stream session: {}", self.config.endpoint);

        // Socket first: a session that cannot reach the endpoint never
        // touches the microphone.
        let (channel, events) = match WsChannel::connect(&self.config.endpoint).await {
            Ok(pair) => pair,
            Err(e) => {
                self.machine
                    .lock()
                    .await
                    .handle(StreamEvent::SocketErrored(format!("{:#}", e)));
                return Err(e).context("Failed to open transcription socket");
            }
        };

        let mut backend = CaptureBackendFactory::create(
            self.source.clone(),
            CaptureConfig {
                buffer_samples: self.config.buffer_samples,
            },
        )?;

        let buffers = match backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                channel.close();
                self.machine.lock().await.handle(StreamEvent::StopRequested);
                return Err(e).context("Failed to start audio capture");
            }
        };

        *self.backend.lock().await = Some(backend);
        *self.channel.lock().await = Some(channel);

        // The handshake completed above, so the socket is open before any
        // capture buffer can arrive.
        self.machine.lock().await.handle(StreamEvent::SocketOpened);

        *self.pump_handle.lock().await = Some(self.spawn_pump(buffers));
        *self.recv_handle.lock().await = Some(self.spawn_recv(events));

        info!("Stream session open");
        Ok(())
    }

    /// Stop streaming and release resources. Safe to call from any state;
    /// double-stop is a no-op.
    pub async fn stop(&self) -> Result<()> {
        let actions = self.machine.lock().await.handle(StreamEvent::StopRequested);

        if actions
            .iter()
            .any(|a| matches!(a, Action::ReleaseResources))
        {
            Self::release(&self.backend, &self.channel).await;
            info!("Stream session stopped");
        }

        Self::reap(&self.pump_handle).await;
        Self::reap(&self.recv_handle).await;

        Ok(())
    }

    pub async fn state(&self) -> StreamState {
        self.machine.lock().await.state()
    }

    pub async fn stats(&self) -> StreamStats {
        let machine = self.machine.lock().await;
        StreamStats {
            state: machine.state(),
            frames_forwarded: machine.frames_forwarded(),
            frames_dropped: machine.frames_dropped(),
        }
    }

    /// Capture buffers → machine → socket, in arrival order.
    fn spawn_pump(&self, mut buffers: mpsc::Receiver<crate::audio::SampleBuffer>) -> JoinHandle<()> {
        let machine = Arc::clone(&self.machine);
        let channel = Arc::clone(&self.channel);

        tokio::spawn(async move {
            while let Some(buffer) = buffers.recv().await {
                let actions = machine.lock().await.handle(StreamEvent::BufferCaptured(buffer));
                for action in actions {
                    if let Action::SendFrame(frame) = action {
                        if let Some(channel) = channel.lock().await.as_ref() {
                            channel.send_frame(&frame);
                        }
                    }
                }
            }
            debug!("Capture stream ended");
        })
    }

    /// Socket events → machine → sink; performs the release the machine
    /// orders when the socket dies underneath the session.
    fn spawn_recv(&self, mut events: mpsc::Receiver<ChannelEvent>) -> JoinHandle<()> {
        let machine = Arc::clone(&self.machine);
        let sink = Arc::clone(&self.sink);
        let backend = Arc::clone(&self.backend);
        let channel = Arc::clone(&self.channel);

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let stream_event = match event {
                    ChannelEvent::Message(text) => StreamEvent::MessageReceived(text),
                    ChannelEvent::Errored(reason) => StreamEvent::SocketErrored(reason),
                    ChannelEvent::Closed => StreamEvent::SocketClosed,
                };

                let actions = machine.lock().await.handle(stream_event);
                let mut terminal = false;
                for action in actions {
                    match action {
                        Action::PublishTranscript(text) => sink.publish(&text),
                        Action::ReleaseResources => {
                            Self::release(&backend, &channel).await;
                            terminal = true;
                        }
                        Action::SendFrame(_) => {}
                    }
                }
                if terminal {
                    break;
                }
            }
            debug!("Socket event stream ended");
        })
    }

    /// Release acquired resources in reverse order: capture graph first,
    /// then the socket. Slots are taken, so a second call finds nothing:
    /// double-release is a no-op and a partially-initialized session tears
    /// down cleanly.
    async fn release(backend: &BackendSlot, channel: &ChannelSlot) {
        if let Some(mut backend) = backend.lock().await.take() {
            if let Err(e) = backend.stop().await {
                error!("Failed to stop capture backend: {}", e);
            }
        }
        if let Some(channel) = channel.lock().await.take() {
            channel.close();
        }
    }

    async fn reap(slot: &Mutex<Option<JoinHandle<()>>>) {
        if let Some(mut handle) = slot.lock().await.take() {
            if tokio::time::timeout(Duration::from_secs(1), &mut handle)
                .await
                .is_err()
            {
                handle.abort();
            }
        }
    }
}
