// Hard-coded reply strings standing in for real inference.

use super::avatar::Avatar;

pub fn text_reply(avatar: &Avatar, message: &str) -> String {
    format!(
        "Hello! I'm {}. I received your message: \"{}\". I have access to {} documents and {} images to help answer your questions.",
        avatar.name,
        message,
        avatar.documents.len(),
        avatar.images.len()
    )
}

pub fn voice_reply(avatar: &Avatar) -> String {
    format!(
        "I received your voice message! As {}, I would process your audio and respond accordingly. I have {} documents and {} images in my knowledge base.",
        avatar.name,
        avatar.documents.len(),
        avatar.images.len()
    )
}

pub fn upload_notice(file_names: &[String]) -> String {
    format!(
        "Uploaded {} file(s): {}",
        file_names.len(),
        file_names.join(", ")
    )
}
