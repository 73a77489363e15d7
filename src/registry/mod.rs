//! Backend-URL registry
//!
//! A trivial relay: one process-memory slot holding the currently published
//! backend URL, exposed over a single HTTP endpoint so frontends can find
//! the transcription backend. No persistence, no multi-tenancy.

pub mod client;
pub mod http;
pub mod store;

pub use client::RegistryClient;
pub use http::create_registry_router;
pub use store::BackendSlot;
