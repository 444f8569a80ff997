//! Integration Tests for the Namespaced Cache
//!
//! Exercises the full public API against the in-memory remote store,
//! including degradation when the store is offline and isolation while
//! installation mode is active.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use tiered_cache::{
    CacheError, FixedSession, InMemoryStore, InstallMode, NamespacedCache, NoSession, UserScope,
    WriteOutcome,
};

// == Helper Functions ==

fn new_cache(store: Arc<InMemoryStore>) -> NamespacedCache {
    NamespacedCache::new(
        "site1",
        store,
        Arc::new(FixedSession::new("alice")),
        InstallMode::new(),
    )
    .expect("valid namespace")
}

// == Write Visibility ==

#[tokio::test]
async fn test_set_value_immediately_visible() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let cache = new_cache(store);

    let outcome = cache.set_value("doc", json!({"title": "home"}), None).await?;
    assert_eq!(outcome, WriteOutcome::Full);

    let value = cache.get_value("doc", None).await?;
    assert_eq!(value, Some(json!({"title": "home"})));
    Ok(())
}

#[tokio::test]
async fn test_set_value_visible_even_when_remote_down() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store.set_offline(true);
    let cache = new_cache(store);

    let outcome = cache.set_value("doc", json!(42), None).await?;
    assert_eq!(outcome, WriteOutcome::LocalOnly);

    assert_eq!(cache.get_value("doc", None).await?, Some(json!(42)));
    Ok(())
}

// == Remote Fallback ==

#[tokio::test]
async fn test_round_trip_with_remote_permanently_down() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store.set_offline(true);
    let cache = new_cache(store.clone());

    cache.set_value("a", json!("x"), None).await?;
    cache.set_value("b", json!([1, 2]), None).await?;

    assert_eq!(cache.get_value("a", None).await?, Some(json!("x")));
    assert_eq!(cache.get_value("b", None).await?, Some(json!([1, 2])));
    assert!(store.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_second_instance_reads_through_remote() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let writer = new_cache(store.clone());
    writer.set_value("shared", json!("payload"), None).await?;

    // A fresh instance with an empty local map finds the value remotely.
    let reader = new_cache(store);
    assert_eq!(reader.get_value("shared", None).await?, Some(json!("payload")));
    Ok(())
}

// == Generator Protocol ==

#[tokio::test]
async fn test_generator_invoked_exactly_once_on_true_miss() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let cache = new_cache(store);
    let runs = AtomicU32::new(0);

    let value = cache
        .get_or_generate("expensive", None, || {
            runs.fetch_add(1, Ordering::SeqCst);
            json!({"computed": true})
        })
        .await?;
    assert_eq!(value, Some(json!({"computed": true})));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    // The persisted value answers later reads; the generator stays at
    // one invocation.
    let value = cache
        .get_or_generate("expensive", None, || {
            runs.fetch_add(1, Ordering::SeqCst);
            json!({"computed": false})
        })
        .await?;
    assert_eq!(value, Some(json!({"computed": true})));
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    assert_eq!(
        cache.get_value("expensive", None).await?,
        Some(json!({"computed": true}))
    );
    Ok(())
}

#[tokio::test]
async fn test_generated_value_written_through_to_remote() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let cache = new_cache(store.clone());

    cache.get_or_generate("gen", None, || json!(7)).await?;

    assert_eq!(store.raw(b"site1|gen"), Some(b"7".to_vec()));
    Ok(())
}

#[tokio::test]
async fn test_generator_skipped_after_negative_marker() -> Result<()> {
    let cache = new_cache(Arc::new(InMemoryStore::new()));

    // A generator-less miss records that the key has no value.
    assert_eq!(cache.get_value("ghost", None).await?, None);

    // The marker answers the next read; the generator never runs.
    let value = cache
        .get_or_generate("ghost", None, || panic!("generator must not run"))
        .await?;
    assert_eq!(value, None);
    Ok(())
}

// == Installation Mode ==

#[tokio::test]
async fn test_install_mode_makes_no_remote_calls() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let install_mode = InstallMode::new();
    install_mode.set(true);
    let cache = NamespacedCache::new(
        "site1",
        store.clone(),
        Arc::new(FixedSession::new("alice")),
        install_mode,
    )?;

    cache.set_value("a", json!(1), None).await?;
    cache.get_value("a", None).await?;
    cache.get_value("missing", None).await?;
    cache.get_or_generate("gen", None, || json!(2)).await?;
    cache.get_all("a").await?;
    cache.delete_value(["a"], None).await?;
    cache.delete_keys("gen").await;

    assert_eq!(store.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_install_mode_operations_work_locally() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let install_mode = InstallMode::new();
    install_mode.set(true);
    let cache = NamespacedCache::new(
        "site1",
        store,
        Arc::new(FixedSession::new("alice")),
        install_mode,
    )?;

    let outcome = cache.set_value("doc", json!("local"), None).await?;
    assert_eq!(outcome, WriteOutcome::LocalOnly);
    assert_eq!(cache.get_value("doc", None).await?, Some(json!("local")));

    cache.delete_value(["doc"], None).await?;
    assert_eq!(cache.get_value("doc", None).await?, None);
    Ok(())
}

// == Prefix Operations ==

#[tokio::test]
async fn test_delete_keys_removes_all_matching() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let cache = new_cache(store.clone());

    cache.set_value("a:1", json!("x"), None).await?;
    cache.set_value("a:2", json!("y"), None).await?;
    cache.set_value("b:1", json!("z"), None).await?;

    cache.delete_keys("a:").await;

    assert_eq!(cache.get_value("a:1", None).await?, None);
    assert_eq!(cache.get_value("a:2", None).await?, None);
    assert_eq!(cache.get_value("b:1", None).await?, Some(json!("z")));
    assert_eq!(store.raw(b"site1|a:1"), None);
    assert_eq!(store.raw(b"site1|a:2"), None);
    Ok(())
}

#[tokio::test]
async fn test_delete_keys_with_remote_down_clears_local() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store.set_offline(true);
    let cache = new_cache(store);

    cache.set_value("a:1", json!(1), None).await?;
    cache.set_value("a:2", json!(2), None).await?;

    cache.delete_keys("a:").await;

    assert_eq!(cache.get_value("a:1", None).await?, None);
    assert_eq!(cache.get_value("a:2", None).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_get_all_keyed_by_matched_key() -> Result<()> {
    let cache = new_cache(Arc::new(InMemoryStore::new()));

    cache.set_value("doc:1", json!("one"), None).await?;
    cache.set_value("doc:2", json!("two"), None).await?;
    cache.set_value("note:1", json!("other"), None).await?;

    let values = cache.get_all("doc:").await?;

    assert_eq!(values.len(), 2);
    assert_eq!(values.get("site1|doc:1"), Some(&json!("one")));
    assert_eq!(values.get("site1|doc:2"), Some(&json!("two")));
    Ok(())
}

#[tokio::test]
async fn test_get_all_empty_prefix_match() -> Result<()> {
    let cache = new_cache(Arc::new(InMemoryStore::new()));

    let values = cache.get_all("nothing:").await?;
    assert!(values.is_empty());
    Ok(())
}

// == User Scoping ==

#[tokio::test]
async fn test_user_scopes_do_not_collide() -> Result<()> {
    let cache = new_cache(Arc::new(InMemoryStore::new()));
    let alice = UserScope::named("alice");
    let bob = UserScope::named("bob");

    cache.set_value("k", json!(1), Some(&alice)).await?;
    cache.set_value("k", json!(2), Some(&bob)).await?;

    assert_eq!(cache.get_value("k", Some(&alice)).await?, Some(json!(1)));
    assert_eq!(cache.get_value("k", Some(&bob)).await?, Some(json!(2)));
    Ok(())
}

#[tokio::test]
async fn test_current_scope_uses_session_user() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let cache = new_cache(store.clone());

    cache
        .set_value("prefs", json!("mine"), Some(&UserScope::Current))
        .await?;

    // Stored under the session user's derived key.
    assert!(store.raw(b"site1|user:alice:prefs").is_some());
    assert_eq!(
        cache
            .get_value("prefs", Some(&UserScope::named("alice")))
            .await?,
        Some(json!("mine"))
    );
    Ok(())
}

#[tokio::test]
async fn test_current_scope_without_session_errors() {
    let cache = NamespacedCache::new(
        "site1",
        Arc::new(InMemoryStore::new()),
        Arc::new(NoSession),
        InstallMode::new(),
    )
    .unwrap();

    let result = cache
        .set_value("prefs", json!(1), Some(&UserScope::Current))
        .await;
    assert!(matches!(result, Err(CacheError::Session(_))));

    let result = cache.get_value("prefs", Some(&UserScope::Current)).await;
    assert!(matches!(result, Err(CacheError::Session(_))));

    let result = cache
        .delete_value(["prefs"], Some(&UserScope::Current))
        .await;
    assert!(matches!(result, Err(CacheError::Session(_))));
}

// == Degradation Details ==

#[tokio::test]
async fn test_offline_delete_is_best_effort() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let cache = new_cache(store.clone());

    cache.set_value("doc", json!("v1"), None).await?;
    store.set_offline(true);

    // Delete succeeds locally; the remote copy is out of reach.
    cache.delete_value(["doc"], None).await?;
    assert_eq!(cache.get_value("doc", None).await?, None);
    assert!(store.raw(b"site1|doc").is_some());

    store.set_offline(false);

    // A fresh instance still sees the stale remote copy.
    let other = new_cache(store);
    assert_eq!(other.get_value("doc", None).await?, Some(json!("v1")));
    Ok(())
}

#[tokio::test]
async fn test_corrupt_remote_value_is_an_error_not_a_miss() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store.insert_raw(&b"site1|doc"[..], &b"{broken"[..]);
    let cache = new_cache(store);

    let result = cache.get_value("doc", None).await;
    assert!(matches!(result, Err(CacheError::Codec(_))));
    Ok(())
}

#[tokio::test]
async fn test_stats_expose_degraded_operations() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store.set_offline(true);
    let cache = new_cache(store);

    cache.set_value("a", json!(1), None).await?;

    let stats = cache.stats().await;
    assert_eq!(stats.degraded, 1);
    assert_eq!(stats.total_entries, 1);
    Ok(())
}
