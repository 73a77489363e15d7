use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::watch;
use tracing::debug;

/// Display value substituted while no speech has been recognized yet.
pub const LISTENING_PLACEHOLDER: &str = "Listening...";

/// How delivered transcript text folds into the current value.
///
/// Source variants disagree on this, so the policy is explicit
/// configuration rather than a baked-in behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptMode {
    /// Each delivered transcript overwrites the previous one.
    #[default]
    Replace,
    /// Delivered transcripts are joined into one growing current value.
    Append,
}

/// Single-latest-value projection of the transcript stream.
///
/// Not a transcript log: subscribers observe only the latest display value.
/// Empty or whitespace-only input maps to [`LISTENING_PLACEHOLDER`] for
/// display and is never recorded as a delivered transcript.
pub struct TranscriptSink {
    mode: TranscriptMode,
    display_tx: watch::Sender<String>,
    delivered: RwLock<Option<String>>,
}

impl TranscriptSink {
    pub fn new(mode: TranscriptMode) -> Self {
        let (display_tx, _) = watch::channel(LISTENING_PLACEHOLDER.to_string());
        Self {
            mode,
            display_tx,
            delivered: RwLock::new(None),
        }
    }

    /// Fold raw transcript text into the projection and republish it to all
    /// subscribers.
    pub fn publish(&self, raw: &str) {
        let trimmed = raw.trim();

        let display_value = if trimmed.is_empty() {
            LISTENING_PLACEHOLDER.to_string()
        } else {
            let mut delivered = match self.delivered.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let next = match (self.mode, delivered.as_deref()) {
                (TranscriptMode::Append, Some(previous)) => format!("{} {}", previous, trimmed),
                _ => trimmed.to_string(),
            };
            *delivered = Some(next.clone());
            next
        };

        debug!("Transcript update: {}", display_value);
        self.display_tx.send_replace(display_value);
    }

    /// Subscribe to display updates. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display_tx.subscribe()
    }

    /// Latest display value (placeholder included).
    pub fn latest_display(&self) -> String {
        self.display_tx.borrow().clone()
    }

    /// Latest delivered transcript, if any speech has been recognized.
    pub fn latest_transcript(&self) -> Option<String> {
        match self.delivered.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_map_to_placeholder() {
        let sink = TranscriptSink::new(TranscriptMode::Replace);

        sink.publish("");
        assert_eq!(sink.latest_display(), LISTENING_PLACEHOLDER);
        assert_eq!(sink.latest_transcript(), None);

        sink.publish("   ");
        assert_eq!(sink.latest_display(), LISTENING_PLACEHOLDER);
        assert_eq!(sink.latest_transcript(), None);
    }

    #[test]
    fn test_text_passes_through_unchanged() {
        let sink = TranscriptSink::new(TranscriptMode::Replace);
        sink.publish("hello");
        assert_eq!(sink.latest_display(), "hello");
        assert_eq!(sink.latest_transcript(), Some("hello".to_string()));
    }

    #[test]
    fn test_placeholder_never_becomes_delivered_transcript() {
        let sink = TranscriptSink::new(TranscriptMode::Replace);
        sink.publish("hi");
        sink.publish("");

        // Display falls back to the placeholder, the delivered value stays.
        assert_eq!(sink.latest_display(), LISTENING_PLACEHOLDER);
        assert_eq!(sink.latest_transcript(), Some("hi".to_string()));
    }

    #[test]
    fn test_replace_mode_keeps_only_latest_value() {
        let sink = TranscriptSink::new(TranscriptMode::Replace);
        sink.publish("first");
        sink.publish("second");
        assert_eq!(sink.latest_transcript(), Some("second".to_string()));
    }

    #[test]
    fn test_append_mode_joins_delivered_text() {
        let sink = TranscriptSink::new(TranscriptMode::Append);
        sink.publish("hello");
        sink.publish("world");
        assert_eq!(sink.latest_transcript(), Some("hello world".to_string()));

        // The placeholder is display-only even in append mode.
        sink.publish(" ");
        assert_eq!(sink.latest_transcript(), Some("hello world".to_string()));
    }

    #[tokio::test]
    async fn test_subscribers_see_updates_in_order() {
        let sink = TranscriptSink::new(TranscriptMode::Replace);
        let mut rx = sink.subscribe();
        assert_eq!(*rx.borrow_and_update(), LISTENING_PLACEHOLDER);

        sink.publish("");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), LISTENING_PLACEHOLDER);

        sink.publish("hi");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "hi");
    }
}
