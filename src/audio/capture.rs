use anyhow::Result;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// One buffer of native-rate mono samples from the capture graph.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Native sample rate in Hz
    pub sample_rate: u32,
}

/// Configuration for capture backends
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Samples per delivered buffer (capture cadence)
    pub buffer_samples: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            buffer_samples: 4096,
        }
    }
}

/// Microphone access was refused by the user or the platform.
///
/// Surfaced through `anyhow` so callers can downcast and abort session start
/// without retrying.
#[derive(Debug)]
pub struct PermissionDenied(pub String);

impl fmt::Display for PermissionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "microphone permission denied: {}", self.0)
    }
}

impl std::error::Error for PermissionDenied {}

/// Audio capture backend trait
///
/// Implementations:
/// - Microphone: cpal input device (`mic` feature)
/// - Scripted: fixed buffer list for tests and demos
#[async_trait::async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive native-rate buffers
    async fn start(&mut self) -> Result<mpsc::Receiver<SampleBuffer>>;

    /// Stop capturing audio. Idempotent.
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Microphone input (requires the `mic` feature)
    Microphone,
    /// Scripted buffers (tests, demos)
    Scripted(Vec<SampleBuffer>),
}

/// Capture backend factory
pub struct CaptureBackendFactory;

impl CaptureBackendFactory {
    /// Create a capture backend for the given source
    pub fn create(source: CaptureSource, config: CaptureConfig) -> Result<Box<dyn CaptureBackend>> {
        match source {
            CaptureSource::Microphone => {
                #[cfg(feature = "mic")]
                {
                    let backend = super::mic::MicBackend::new(config)?;
                    Ok(Box::new(backend))
                }

                #[cfg(not(feature = "mic"))]
                {
                    let _ = config;
                    anyhow::bail!("Microphone capture requires the `mic` feature")
                }
            }

            CaptureSource::Scripted(buffers) => Ok(Box::new(ScriptedBackend::new(buffers))),
        }
    }
}

/// Plays a fixed list of buffers, optionally at a steady cadence.
///
/// Stands in for the processing graph when no audio hardware is available.
pub struct ScriptedBackend {
    buffers: Vec<SampleBuffer>,
    interval: Option<Duration>,
    running: Arc<AtomicBool>,
}

impl ScriptedBackend {
    pub fn new(buffers: Vec<SampleBuffer>) -> Self {
        Self {
            buffers,
            interval: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pace buffer delivery instead of sending everything at once.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

#[async_trait::async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<SampleBuffer>> {
        let (tx, rx) = mpsc::channel(16);
        let buffers = self.buffers.clone();
        let interval = self.interval;
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        info!("Scripted capture started: {} buffers", buffers.len());

        tokio::spawn(async move {
            for buffer in buffers {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                if let Some(delay) = interval {
                    tokio::time::sleep(delay).await;
                }
                if tx.send(buffer).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
