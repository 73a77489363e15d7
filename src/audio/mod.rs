pub mod capture;
pub mod downsample;
pub mod wav;

#[cfg(feature = "mic")]
pub mod mic;

pub use capture::{
    CaptureBackend, CaptureBackendFactory, CaptureConfig, CaptureSource, PermissionDenied,
    SampleBuffer, ScriptedBackend,
};
pub use downsample::{downsample_to_pcm16, pcm16_to_bytes};
pub use wav::encode_wav_pcm16;
