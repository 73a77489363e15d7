// Tests for configuration loading and defaults

use avatar_chat::transcript::TranscriptMode;
use avatar_chat::Config;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("avatar-chat.toml");
    fs::write(
        &path,
        r#"
[service]
name = "avatar-chat"

[service.http]
bind = "127.0.0.1"
port = 8080

[audio]
buffer_samples = 2048

[transcription]
backend_url = "ws://localhost:9000"
registry_url = "http://127.0.0.1:8787/"
target_sample_rate = 16000
transcript_mode = "append"
"#,
    )
    .unwrap();

    let cfg = Config::load(path.with_extension("").to_str().unwrap()).unwrap();
    assert_eq!(cfg.service.name, "avatar-chat");
    assert_eq!(cfg.service.http.bind, "127.0.0.1");
    assert_eq!(cfg.service.http.port, 8080);
    assert_eq!(cfg.audio.buffer_samples, 2048);
    assert_eq!(
        cfg.transcription.backend_url.as_deref(),
        Some("ws://localhost:9000")
    );
    assert_eq!(cfg.transcription.transcript_mode, TranscriptMode::Append);
    // Unspecified fields keep their defaults.
    assert_eq!(cfg.transcription.ws_path, "/transcription/ws");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("minimal.toml");
    fs::write(
        &path,
        r#"
[service]
name = "avatar-chat"

[service.http]
bind = "0.0.0.0"
port = 9090
"#,
    )
    .unwrap();

    let cfg = Config::load(path.with_extension("").to_str().unwrap()).unwrap();
    assert_eq!(cfg.audio.buffer_samples, 4096);
    assert_eq!(cfg.transcription.target_sample_rate, 16000);
    assert_eq!(cfg.transcription.transcript_mode, TranscriptMode::Replace);
    assert!(cfg.transcription.backend_url.is_none());
    assert!(cfg.transcription.registry_url.is_none());
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::load("config/does-not-exist").is_err());
}
