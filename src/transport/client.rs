use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::audio::pcm16_to_bytes;

/// Observable channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Open,
    Closed,
    Errored,
}

impl ChannelState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ChannelState::Open,
            1 => ChannelState::Closed,
            _ => ChannelState::Errored,
        }
    }
}

/// Inbound channel events surfaced to the session driver.
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// One received text message, expected to be a transcript payload
    Message(String),
    /// The peer closed the connection or the stream ended
    Closed,
    /// The socket failed; the session must be restarted explicitly
    Errored(String),
}

/// Binary-mode socket to the transcription endpoint.
///
/// Outbound PCM16 frames are transmitted only while the channel is open;
/// anything sent in another state is dropped, never queued. There is no
/// retry or reconnection policy.
pub struct WsChannel {
    outbound: mpsc::Sender<Vec<u8>>,
    close_tx: Mutex<Option<oneshot::Sender<()>>>,
    state: Arc<AtomicU8>,
    frames_sent: Arc<AtomicUsize>,
    frames_dropped: Arc<AtomicUsize>,
}

impl WsChannel {
    /// Connect to the endpoint; the channel is open once this returns.
    ///
    /// Returns the channel plus the receiver of its inbound events.
    pub async fn connect(url: &str) -> Result<(Self, mpsc::Receiver<ChannelEvent>)> {
        let (ws_stream, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        info!("Transcription socket connected: {}", url);

        let (mut write, mut read) = ws_stream.split();
        let state = Arc::new(AtomicU8::new(ChannelState::Open as u8));
        let (event_tx, event_rx) = mpsc::channel(64);
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<Vec<u8>>(64);
        let (close_tx, mut close_rx) = oneshot::channel::<()>();

        // Writer: forward queued frames until closed, then say goodbye.
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    maybe = outbound_rx.recv() => match maybe {
                        Some(bytes) => {
                            if let Err(e) = write.send(Message::Binary(bytes)).await {
                                warn!("Failed to send audio frame: {}", e);
                                break;
                            }
                        }
                        None => break,
                    },
                    _ = &mut close_rx => break,
                }
            }
            let _ = write.send(Message::Close(None)).await;
        });

        // Reader: surface text messages and the terminal close/error event.
        let reader_state = Arc::clone(&state);
        tokio::spawn(async move {
            let mut terminal = None;
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if event_tx.send(ChannelEvent::Message(text)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        terminal = Some(ChannelEvent::Closed);
                        break;
                    }
                    Ok(_) => {} // binary/ping/pong from the peer are ignored
                    Err(e) => {
                        error!("Transcription socket error: {}", e);
                        terminal = Some(ChannelEvent::Errored(e.to_string()));
                        break;
                    }
                }
            }

            let terminal = terminal.unwrap_or(ChannelEvent::Closed);
            let next = match &terminal {
                ChannelEvent::Errored(_) => ChannelState::Errored,
                _ => ChannelState::Closed,
            };
            // Keep the first terminal state; only an open channel moves.
            let _ = reader_state.compare_exchange(
                ChannelState::Open as u8,
                next as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
            let _ = event_tx.send(terminal).await;
        });

        Ok((
            Self {
                outbound: outbound_tx,
                close_tx: Mutex::new(Some(close_tx)),
                state,
                frames_sent: Arc::new(AtomicUsize::new(0)),
                frames_dropped: Arc::new(AtomicUsize::new(0)),
            },
            event_rx,
        ))
    }

    pub fn state(&self) -> ChannelState {
        ChannelState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Send one PCM16 frame. Frames are dropped, not queued, unless the
    /// channel is open.
    pub fn send_frame(&self, samples: &[i16]) {
        if self.state() != ChannelState::Open {
            self.frames_dropped.fetch_add(1, Ordering::Relaxed);
            debug!("Dropping audio frame: channel not open");
            return;
        }

        match self.outbound.try_send(pcm16_to_bytes(samples)) {
            Ok(()) => {
                self.frames_sent.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.frames_dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to queue audio frame: {}", e);
            }
        }
    }

    /// Close the channel. Idempotent.
    pub fn close(&self) {
        let taken = match self.close_tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(tx) = taken {
            info!("Closing transcription socket");
            let _ = tx.send(());
            let _ = self.state.compare_exchange(
                ChannelState::Open as u8,
                ChannelState::Closed as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
        }
    }

    pub fn frames_sent(&self) -> usize {
        self.frames_sent.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> usize {
        self.frames_dropped.load(Ordering::Relaxed)
    }
}

/// Build the transcription endpoint URL from a backend base URL.
///
/// http(s) schemes are rewritten to ws(s); an already-websocket URL passes
/// through unchanged.
pub fn websocket_url(backend_url: &str, path: &str) -> Result<Url> {
    let ws_base = backend_url
        .replace("https://", "wss://")
        .replace("http://", "ws://");

    let joined = format!("{}{}", ws_base.trim_end_matches('/'), path);
    Url::parse(&joined).with_context(|| format!("Invalid transcription endpoint: {}", joined))
}
