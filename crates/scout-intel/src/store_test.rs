use super::*;
use scout_core::testing::sales_card;

#[test]
fn test_get_before_put_is_none() {
    let store = CardStore::new(None);
    assert!(store.get().is_none());
    assert!(store.fingerprint().is_none());
}

#[test]
fn test_put_installs_and_get_shares() {
    let store = CardStore::new(None);
    let installed = store.put(sales_card());
    let fetched = store.get().unwrap();
    assert!(Arc::ptr_eq(&installed, &fetched));
    assert_eq!(store.fingerprint().unwrap(), installed.reflection_hash);
}

#[test]
fn test_put_supersedes_previous_card() {
    let store = CardStore::new(None);
    let first = store.put(sales_card());
    let mut newer = sales_card();
    newer.reflection_hash = "newerhash".to_string();
    store.put(newer);
    // Old readers keep their snapshot; new readers see the new card.
    assert_eq!(first.reflection_hash, "fixturehash0000");
    assert_eq!(store.get().unwrap().reflection_hash, "newerhash");
}

#[test]
fn test_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = CardStore::new(Some(dir.path().to_path_buf()));
    let card = sales_card();
    let fingerprint = card.connection_fingerprint.clone();
    store.put(card);

    let reloaded = store.load_cached(&fingerprint).expect("cache hit");
    let original = store.get().unwrap();
    assert_eq!(reloaded.reflection_hash, original.reflection_hash);
    assert_eq!(reloaded.tables.len(), original.tables.len());
    assert_eq!(reloaded.edges, original.edges);
}

#[test]
fn test_load_cached_missing_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = CardStore::new(Some(dir.path().to_path_buf()));
    assert!(store.load_cached("nope").is_none());
}

#[test]
fn test_version_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = CardStore::new(Some(dir.path().to_path_buf()));
    let card = sales_card();
    let fingerprint = card.connection_fingerprint.clone();
    store.put(card);

    let path = dir
        .path()
        .join(format!("schema-card-{fingerprint}.json"));
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, text.replace("\"format_version\": 1", "\"format_version\": 99")).unwrap();
    assert!(store.load_cached(&fingerprint).is_none());
}
