//! Backend gateway integration tests against an in-process stub

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use lens_gateway::{BackendGateway, CapturedPhoto, Error, PhotoCache, StoredPhoto};

mod common;
use common::{BackendStub, HintStubMode, spawn_backend_stub};

fn stored_photo(bytes: Vec<u8>) -> StoredPhoto {
    StoredPhoto::from_capture(
        CapturedPhoto::new(bytes, "image/jpeg", "photo.jpg"),
        "user-1",
    )
}

#[tokio::test]
async fn test_give_hint_returns_backend_hint() {
    let BackendStub {
        base_url,
        hint_hits,
        ..
    } = spawn_backend_stub(HintStubMode::Hint).await;

    let gateway = BackendGateway::new(&base_url);
    let hint = gateway.give_hint("give hint", "give hint").await.unwrap();

    assert_eq!(hint, "**Check** the `edges` first 💡");
    assert_eq!(hint_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_give_hint_falls_back_when_field_missing() {
    let BackendStub { base_url, .. } = spawn_backend_stub(HintStubMode::EmptyBody).await;

    let gateway = BackendGateway::new(&base_url);
    let hint = gateway.give_hint("help", "help").await.unwrap();

    assert_eq!(hint, "Here's a hint to help you with your problem!");
}

#[tokio::test]
async fn test_give_hint_surfaces_server_error() {
    let BackendStub { base_url, .. } = spawn_backend_stub(HintStubMode::Fail).await;

    let gateway = BackendGateway::new(&base_url);
    let result = gateway.give_hint("hint", "hint").await;

    assert!(matches!(result, Err(Error::Backend(_))));
}

#[tokio::test]
async fn test_give_hint_surfaces_transport_error() {
    let gateway = BackendGateway::new("http://127.0.0.1:1");
    let result = gateway.give_hint("hint", "hint").await;

    assert!(matches!(result, Err(Error::Http(_))));
}

#[tokio::test]
async fn test_analyze_photo_posts_encoded_image() {
    let BackendStub {
        base_url,
        analyze_hits,
        ..
    } = spawn_backend_stub(HintStubMode::Hint).await;

    let gateway = BackendGateway::new(&base_url);
    let full_text = gateway
        .analyze_photo(&stored_photo(vec![1, 2, 3]))
        .await
        .unwrap();

    // 3 raw bytes encode to 4 base64 chars; the stub echoes the length back
    assert_eq!(full_text, "decoded 4 chars");
    assert_eq!(analyze_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_store_triggers_detached_analysis() {
    let BackendStub {
        base_url,
        analyze_hits,
        ..
    } = spawn_backend_stub(HintStubMode::Hint).await;

    let cache = PhotoCache::new(Arc::new(BackendGateway::new(&base_url)));
    cache
        .store("user-1", CapturedPhoto::new(vec![9, 9], "image/jpeg", "p.jpg"))
        .await;

    // Analysis is fire-and-forget; poll briefly for the detached task
    for _ in 0..50 {
        if analyze_hits.load(Ordering::SeqCst) == 1 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("analysis request never arrived");
}
