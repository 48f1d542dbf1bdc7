//! # Memories Store
//!
//! A per-user, keyed memory store for AI agents.
//!
//! Records live in a single SQLite table keyed by (username, key); values
//! are arbitrary JSON, tagged and timestamped. The engine exposes five
//! actions — store, retrieve, list, search, delete — behind one dispatch
//! call that always replies with a string, so an agent can wire it up as a
//! callable tool without a separate error channel.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use memories_store::{Config, MemoryRequest, MemoryStore};
//!
//! let store = MemoryStore::new(Config::default())?;
//!
//! let reply = store.execute(MemoryRequest {
//!     action: "store".into(),
//!     username: Some("alice".into()),
//!     key: Some("fav_lang".into()),
//!     value: Some(serde_json::json!("Rust")),
//!     tags: Some(vec!["#code".into()]),
//!     ..Default::default()
//! });
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use memory::{MemoryRecord, MemoryRequest, MemoryStore};
