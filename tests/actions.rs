//! End-to-end run through the five actions against a real database file

use memories_store::{Config, MemoryRequest, MemoryStore};
use serde_json::{json, Value};

fn request(fields: Value) -> MemoryRequest {
    serde_json::from_value(fields).unwrap()
}

#[test]
fn memory_lifecycle_over_one_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_db_path(dir.path().join("memories.db"));
    let store = MemoryStore::new(config.clone()).unwrap();

    let reply = store.execute(request(json!({
        "action": "store",
        "username": "alice",
        "key": "fav_lang",
        "value": "Go",
        "tags": ["#code"]
    })));
    assert_eq!(reply, "Memory stored with key: fav_lang for user: alice");

    let reply = store.execute(request(json!({
        "action": "retrieve",
        "username": "alice",
        "key": "fav_lang"
    })));
    let record: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(record["value"], "Go");
    assert_eq!(record["tags"], json!(["#code"]));
    assert_eq!(record["createdAt"], record["updatedAt"]);

    std::thread::sleep(std::time::Duration::from_millis(10));
    store.execute(request(json!({
        "action": "store",
        "username": "alice",
        "key": "fav_lang",
        "value": "Rust",
        "tags": ["#code"]
    })));

    let reply = store.execute(request(json!({
        "action": "retrieve",
        "username": "alice",
        "key": "fav_lang"
    })));
    let record: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(record["value"], "Rust");
    assert!(record["updatedAt"].as_str() > record["createdAt"].as_str());

    let reply = store.execute(request(json!({
        "action": "search",
        "username": "alice",
        "search_query": "fav"
    })));
    let listing: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["memories"][0]["key"], "fav_lang");

    let reply = store.execute(request(json!({
        "action": "delete",
        "username": "alice",
        "key": "fav_lang"
    })));
    assert_eq!(reply, "Memory deleted with key: fav_lang for user: alice");

    let reply = store.execute(request(json!({
        "action": "retrieve",
        "username": "alice",
        "key": "fav_lang"
    })));
    assert_eq!(reply, "Memory not found with key: fav_lang for user: alice");

    // state survives a fresh engine over the same file
    store.execute(request(json!({
        "action": "store",
        "username": "alice",
        "key": "editor",
        "value": {"name": "helix", "version": 25}
    })));
    drop(store);

    let reopened = MemoryStore::new(config).unwrap();
    let reply = reopened.execute(request(json!({
        "action": "retrieve",
        "username": "alice",
        "key": "editor"
    })));
    let record: Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(record["value"], json!({"name": "helix", "version": 25}));
}
