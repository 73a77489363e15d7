// Microphone capture backend built on cpal.
//
// cpal streams are not Send, so the stream lives on a dedicated worker
// thread; buffers cross into the async world over a tokio mpsc channel.

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use super::capture::{CaptureBackend, CaptureConfig, PermissionDenied, SampleBuffer};

pub struct MicBackend {
    config: CaptureConfig,
    running: Arc<AtomicBool>,
    worker: Option<std::thread::JoinHandle<()>>,
}

impl MicBackend {
    pub fn new(config: CaptureConfig) -> Result<Self> {
        Ok(Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<SampleBuffer>> {
        if self.running.swap(true, Ordering::SeqCst) {
            anyhow::bail!("Microphone backend already capturing");
        }

        let (tx, rx) = mpsc::channel(16);
        let (ready_tx, ready_rx) = oneshot::channel::<Result<u32>>();
        let running = Arc::clone(&self.running);
        let buffer_samples = self.config.buffer_samples;

        let worker = std::thread::spawn(move || {
            run_input_stream(buffer_samples, tx, running, ready_tx);
        });

        match ready_rx.await {
            Ok(Ok(sample_rate)) => {
                info!(
                    "Microphone capture started ({}Hz, {} samples per buffer)",
                    sample_rate, buffer_samples
                );
                self.worker = Some(worker);
                Ok(rx)
            }
            Ok(Err(e)) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = worker.join();
                anyhow::bail!("Microphone worker exited before reporting status")
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(worker) = self.worker.take() {
            let _ = tokio::task::spawn_blocking(move || worker.join()).await;
        }
        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

/// Worker-thread body: open the default input device, fold interleaved
/// channels down to mono, and deliver fixed-size buffers until stopped.
fn run_input_stream(
    buffer_samples: usize,
    tx: mpsc::Sender<SampleBuffer>,
    running: Arc<AtomicBool>,
    ready_tx: oneshot::Sender<Result<u32>>,
) {
    let host = cpal::default_host();

    let device = match host.default_input_device() {
        Some(d) => d,
        None => {
            let _ = ready_tx.send(Err(anyhow::Error::new(PermissionDenied(
                "no input device available".to_string(),
            ))));
            return;
        }
    };

    let supported = match device.default_input_config() {
        Ok(c) => c,
        Err(e) => {
            // The platform refusing to hand out the device configuration is
            // how a denied microphone permission manifests here.
            let _ = ready_tx.send(Err(anyhow::Error::new(PermissionDenied(e.to_string()))));
            return;
        }
    };

    if supported.sample_format() != cpal::SampleFormat::F32 {
        let _ = ready_tx.send(Err(anyhow::anyhow!(
            "Unsupported input sample format: {:?}",
            supported.sample_format()
        )));
        return;
    }

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels().max(1) as usize;
    let stream_config = supported.config();

    let mut pending: Vec<f32> = Vec::with_capacity(buffer_samples);

    let stream = match device.build_input_stream(
        &stream_config,
        move |data: &[f32], _| {
            for frame in data.chunks(channels) {
                let sum: f32 = frame.iter().sum();
                pending.push(sum / channels as f32);
                if pending.len() >= buffer_samples {
                    let samples =
                        std::mem::replace(&mut pending, Vec::with_capacity(buffer_samples));
                    if tx.blocking_send(SampleBuffer {
                        samples,
                        sample_rate,
                    })
                    .is_err()
                    {
                        // Receiver gone; remaining audio is dropped.
                        return;
                    }
                }
            }
        },
        |err| warn!("Microphone stream error: {}", err),
        None,
    ) {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(e).context("Failed to build input stream"));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(e).context("Failed to start input stream"));
        return;
    }

    let _ = ready_tx.send(Ok(sample_rate));

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(50));
    }

    drop(stream);
}
