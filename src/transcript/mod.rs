pub mod sink;

pub use sink::{TranscriptMode, TranscriptSink, LISTENING_PLACEHOLDER};
