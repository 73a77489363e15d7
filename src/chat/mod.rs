//! Chat domain: avatars, messages, and the stub responder
//!
//! Pure UI-state value objects with no durability: everything lives in
//! memory and is lost on restart. Replies are hard-coded strings, not real
//! inference.

mod avatar;
mod message;
mod responder;
mod store;

pub use avatar::{Avatar, UploadedFile};
pub use message::{ChatMessage, MessageKind, Sender};
pub use store::ChatStore;
