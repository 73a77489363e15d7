use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use super::avatar::{Avatar, UploadedFile};
use super::message::{ChatMessage, MessageKind};
use super::responder;

/// In-memory chat state: avatars and their message histories.
///
/// Nothing is persisted; state is lost on restart by design.
#[derive(Debug, Default)]
pub struct ChatStore {
    avatars: HashMap<Uuid, Avatar>,
    messages: HashMap<Uuid, Vec<ChatMessage>>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_avatar(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Avatar {
        let avatar = Avatar::new(name, description);
        info!("Created avatar: {} ({})", avatar.name, avatar.id);
        self.avatars.insert(avatar.id, avatar.clone());
        avatar
    }

    pub fn avatar(&self, id: Uuid) -> Option<&Avatar> {
        self.avatars.get(&id)
    }

    /// All avatars, oldest first
    pub fn list_avatars(&self) -> Vec<Avatar> {
        let mut avatars: Vec<Avatar> = self.avatars.values().cloned().collect();
        avatars.sort_by_key(|a| a.created_at);
        avatars
    }

    /// Delete an avatar and its message history. Returns false if unknown.
    pub fn delete_avatar(&mut self, id: Uuid) -> bool {
        let removed = self.avatars.remove(&id).is_some();
        if removed {
            self.messages.remove(&id);
            info!("Deleted avatar {}", id);
        }
        removed
    }

    pub fn messages(&self, avatar_id: Uuid) -> Option<&[ChatMessage]> {
        if !self.avatars.contains_key(&avatar_id) {
            return None;
        }
        Some(
            self.messages
                .get(&avatar_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        )
    }

    /// Append a user message and the avatar's stub reply; returns both.
    pub fn post_message(
        &mut self,
        avatar_id: Uuid,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Option<(ChatMessage, ChatMessage)> {
        let avatar = self.avatars.get(&avatar_id)?;
        let content = content.into();

        let reply_text = match &kind {
            MessageKind::Text => responder::text_reply(avatar, &content),
            MessageKind::Voice { .. } => responder::voice_reply(avatar),
        };

        let user_message = ChatMessage::user(content, kind);
        let reply = ChatMessage::avatar(reply_text);

        let history = self.messages.entry(avatar_id).or_default();
        history.push(user_message.clone());
        history.push(reply.clone());

        Some((user_message, reply))
    }

    /// Attach uploaded files to an avatar's knowledge base and append the
    /// upload notice to its history. Images and documents are split by
    /// content type; there is no stub reply for uploads.
    pub fn upload_files(
        &mut self,
        avatar_id: Uuid,
        files: Vec<UploadedFile>,
    ) -> Option<ChatMessage> {
        let avatar = self.avatars.get_mut(&avatar_id)?;

        let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        for file in files {
            if file.is_image() {
                avatar.images.push(file.name);
            } else {
                avatar.documents.push(file.name);
            }
        }

        let notice = ChatMessage::system(responder::upload_notice(&names));
        self.messages
            .entry(avatar_id)
            .or_default()
            .push(notice.clone());

        Some(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::Sender;

    #[test]
    fn test_post_message_appends_user_message_and_reply() {
        let mut store = ChatStore::new();
        let avatar = store.create_avatar("Ada", "mathematician");

        let (message, reply) = store
            .post_message(avatar.id, "hello there", MessageKind::Text)
            .unwrap();

        assert_eq!(message.sender, Sender::User);
        assert_eq!(reply.sender, Sender::Avatar);
        assert!(reply.content.contains("I'm Ada"));
        assert!(reply.content.contains("\"hello there\""));
        assert!(reply.content.contains("0 documents and 0 images"));

        assert_eq!(store.messages(avatar.id).unwrap().len(), 2);
    }

    #[test]
    fn test_voice_message_gets_voice_reply() {
        let mut store = ChatStore::new();
        let avatar = store.create_avatar("Ada", "");

        let (message, reply) = store
            .post_message(
                avatar.id,
                "[Voice Message]",
                MessageKind::Voice {
                    wav_base64: "UklGRg==".to_string(),
                },
            )
            .unwrap();

        assert!(matches!(message.kind, MessageKind::Voice { .. }));
        assert!(reply.content.contains("voice message"));
        assert!(reply.content.contains("As Ada"));
    }

    #[test]
    fn test_uploads_split_by_content_type_and_feed_replies() {
        let mut store = ChatStore::new();
        let avatar = store.create_avatar("Ada", "");

        let notice = store
            .upload_files(
                avatar.id,
                vec![
                    UploadedFile {
                        name: "notes.pdf".to_string(),
                        content_type: "application/pdf".to_string(),
                    },
                    UploadedFile {
                        name: "photo.png".to_string(),
                        content_type: "image/png".to_string(),
                    },
                ],
            )
            .unwrap();

        assert_eq!(notice.sender, Sender::System);
        assert_eq!(notice.content, "Uploaded 2 file(s): notes.pdf, photo.png");

        let avatar = store.avatar(avatar.id).unwrap();
        assert_eq!(avatar.documents, vec!["notes.pdf"]);
        assert_eq!(avatar.images, vec!["photo.png"]);

        // Knowledge-base counts show up in later replies.
        let (_, reply) = store
            .post_message(avatar.id, "hi", MessageKind::Text)
            .unwrap();
        assert!(reply.content.contains("1 documents and 1 images"));
    }

    #[test]
    fn test_delete_avatar_drops_history() {
        let mut store = ChatStore::new();
        let avatar = store.create_avatar("Ada", "");
        store
            .post_message(avatar.id, "hi", MessageKind::Text)
            .unwrap();

        assert!(store.delete_avatar(avatar.id));
        assert!(store.messages(avatar.id).is_none());
        assert!(!store.delete_avatar(avatar.id));
    }

    #[test]
    fn test_post_to_unknown_avatar_is_none() {
        let mut store = ChatStore::new();
        assert!(store
            .post_message(Uuid::new_v4(), "hi", MessageKind::Text)
            .is_none());
    }
}
