use tokio::sync::RwLock;

/// Single-slot, in-memory store of the currently published backend URL.
///
/// Initial state is empty; contents do not survive a restart. The slot is
/// passed into the request handler explicitly rather than held as ambient
/// process state.
#[derive(Debug, Default)]
pub struct BackendSlot {
    url: RwLock<Option<String>>,
}

impl BackendSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<String> {
        self.url.read().await.clone()
    }

    pub async fn set(&self, url: String) {
        *self.url.write().await = Some(url);
    }

    pub async fn clear(&self) {
        *self.url.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_slot_starts_empty_and_round_trips() {
        let slot = BackendSlot::new();
        assert_eq!(slot.get().await, None);

        slot.set("https://backend.example".to_string()).await;
        assert_eq!(slot.get().await, Some("https://backend.example".to_string()));

        slot.set("https://other.example".to_string()).await;
        assert_eq!(slot.get().await, Some("https://other.example".to_string()));

        slot.clear().await;
        assert_eq!(slot.get().await, None);
    }
}
