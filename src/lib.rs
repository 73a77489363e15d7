pub mod audio;
pub mod auth;
pub mod chat;
pub mod config;
pub mod http;
pub mod registry;
pub mod stream;
pub mod transcript;
pub mod transport;

pub use audio::{
    downsample_to_pcm16, encode_wav_pcm16, CaptureBackend, CaptureBackendFactory, CaptureConfig,
    CaptureSource, PermissionDenied, SampleBuffer,
};
pub use chat::{Avatar, ChatMessage, ChatStore, MessageKind, Sender, UploadedFile};
pub use config::Config;
pub use http::{create_router, AppState};
pub use registry::{create_registry_router, BackendSlot, RegistryClient};
pub use stream::{StreamConfig, StreamMachine, StreamSession, StreamState};
pub use transcript::{TranscriptMode, TranscriptSink, LISTENING_PLACEHOLDER};
pub use transport::{websocket_url, ChannelEvent, ChannelState, TranscriptPayload, WsChannel};
