//! Memory records and the store engine that dispatches actions over them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;

/// A single stored memory, as returned to callers.
///
/// The internal row id and the owning username are deliberately absent: the
/// id is storage identity only, and every response is already scoped to one
/// username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Key identifying the memory within its username
    pub key: String,

    /// The stored value: any JSON shape, opaque to the engine
    pub value: Value,

    /// Free-form categorization tags, in the order they were stored
    pub tags: Vec<String>,

    /// Set once, at the first store for this (username, key)
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Set on every store, including overwrites
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Response body for `list` and `search`
#[derive(Debug, Serialize)]
struct MemoryListing {
    count: usize,
    memories: Vec<MemoryRecord>,
}

/// A single tool invocation.
///
/// Which fields are required depends on the action; the engine validates and
/// reports omissions in-band rather than rejecting the request structurally.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryRequest {
    /// One of `store`, `retrieve`, `list`, `search`, `delete`
    pub action: String,

    /// Namespace for the operation; falls back to the configured default
    #[serde(default)]
    pub username: Option<String>,

    /// Memory key (store/retrieve/delete)
    #[serde(default)]
    pub key: Option<String>,

    /// Value to store (store only). JSON `null` counts as absent.
    #[serde(default)]
    pub value: Option<Value>,

    /// Tags to attach (store only); absent means no tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Substring to look for in keys (search only)
    #[serde(default)]
    pub search_query: Option<String>,
}

/// The store engine: owns the record schema and dispatches the five actions.
///
/// Every invocation goes through [`MemoryStore::execute`], which always
/// returns a string. Successful reads serialize to pretty JSON; failures are
/// reported in the same channel with an `Error: ` prefix, and "nothing
/// matched" outcomes are plain informational messages. Nothing escapes the
/// dispatch boundary as a Rust error.
pub struct MemoryStore {
    config: Config,
    sqlite: SqliteStorage,
}

impl MemoryStore {
    /// Create a new memory store, initializing storage under the configured path
    pub fn new(config: Config) -> Result<Self> {
        config.ensure_dirs()?;
        let sqlite = SqliteStorage::new(&config)?;

        Ok(Self { config, sqlite })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one action and render the outcome as the tool's reply.
    ///
    /// The caller's channel has no separate error signal, so failures are
    /// prefixed with `Error: ` and not-found outcomes stay plain messages.
    pub fn execute(&self, request: MemoryRequest) -> String {
        tracing::debug!(
            action = %request.action,
            username = request.username.as_deref().unwrap_or("<default>"),
            key = request.key.as_deref().unwrap_or(""),
            "executing memory action"
        );

        match self.dispatch(&request) {
            Ok(reply) => reply,
            Err(Error::NotFound(message)) => message,
            Err(e) => {
                tracing::warn!(action = %request.action, error = %e, "memory action failed");
                format!("Error: {e}")
            }
        }
    }

    fn dispatch(&self, request: &MemoryRequest) -> Result<String> {
        let username = self.resolve_username(request);

        match request.action.as_str() {
            "store" => self.store(&username, request),
            "retrieve" => self.retrieve(&username, request),
            "list" => self.list(&username),
            "search" => self.search(&username, request),
            "delete" => self.delete(&username, request),
            other => Err(Error::unknown_action(other)),
        }
    }

    /// An absent or empty username falls back to the configured default
    fn resolve_username(&self, request: &MemoryRequest) -> String {
        request
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.config.default_username)
            .to_string()
    }

    fn store(&self, username: &str, request: &MemoryRequest) -> Result<String> {
        let key = required_key(request, "Key is required for storing memories")?;
        let value = request
            .value
            .as_ref()
            .ok_or_else(|| Error::validation("Value is required for storing memories"))?;

        let value_blob = serde_json::to_vec(value)
            .map_err(|e| Error::serialization(format!("value is not serializable: {e}")))?;
        let tags = request.tags.clone().unwrap_or_default();
        let tags_json = serde_json::to_string(&tags)
            .map_err(|e| Error::serialization(format!("tags are not serializable: {e}")))?;

        let now = Utc::now().to_rfc3339();
        self.sqlite.upsert(username, key, &value_blob, &tags_json, &now)?;

        Ok(format!("Memory stored with key: {key} for user: {username}"))
    }

    fn retrieve(&self, username: &str, request: &MemoryRequest) -> Result<String> {
        let key = required_key(request, "Key is required for retrieving memories")?;

        match self.sqlite.get(username, key)? {
            Some(record) => render_json(&record),
            None => Err(Error::not_found(format!(
                "Memory not found with key: {key} for user: {username}"
            ))),
        }
    }

    fn list(&self, username: &str) -> Result<String> {
        let memories = self.sqlite.list(username)?;

        if memories.is_empty() {
            return Err(Error::not_found(format!(
                "No memories stored for user: {username}"
            )));
        }

        render_json(&MemoryListing {
            count: memories.len(),
            memories,
        })
    }

    fn search(&self, username: &str, request: &MemoryRequest) -> Result<String> {
        let query = request
            .search_query
            .as_deref()
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::validation("search_query is required for search action"))?;

        let memories = self.sqlite.search(username, query)?;

        if memories.is_empty() {
            return Err(Error::not_found(format!(
                "No memories found matching: '{query}'"
            )));
        }

        render_json(&MemoryListing {
            count: memories.len(),
            memories,
        })
    }

    fn delete(&self, username: &str, request: &MemoryRequest) -> Result<String> {
        let key = required_key(request, "Key is required for deleting memories")?;

        if !self.sqlite.delete(username, key)? {
            return Err(Error::not_found(format!(
                "Memory not found with key: {key} for user: {username}"
            )));
        }

        Ok(format!("Memory deleted with key: {key} for user: {username}"))
    }
}

fn required_key<'a>(request: &'a MemoryRequest, message: &str) -> Result<&'a str> {
    request
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::validation(message))
}

fn render_json<T: Serialize>(payload: &T) -> Result<String> {
    serde_json::to_string_pretty(payload)
        .map_err(|e| Error::serialization(format!("response is not serializable: {e}")))
}
