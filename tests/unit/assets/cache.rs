use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;
use crate::assets::decode::PreparedImage;

fn tiny() -> ImageHandle {
    Arc::new(PreparedImage::from_premul_rgba8(&[0, 0, 0, 255], 1, 1).unwrap())
}

#[tokio::test]
async fn concurrent_callers_share_one_load() {
    let cache = Arc::new(AssetCache::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);
        tasks.push(tokio::spawn(async move {
            cache
                .get_or_load("/assets/brand/logo.png", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok(tiny())
                })
                .await
        }));
    }
    for t in tasks {
        assert!(t.await.unwrap().is_ok());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn failures_are_memoized_too() {
    let cache = AssetCache::new();
    let calls = AtomicUsize::new(0);
    for _ in 0..3 {
        let out = cache
            .get_or_load("/missing.png", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LoadError::Fetch {
                    url: "/missing.png".to_string(),
                    reason: "404".to_string(),
                })
            })
            .await;
        assert!(out.is_err());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(cache.peek("/missing.png"), Some(Err(_))));
}

#[tokio::test]
async fn distinct_urls_load_separately() {
    let cache = AssetCache::new();
    assert!(cache.is_empty());
    cache.get_or_load("/a.png", || async { Ok(tiny()) }).await.unwrap();
    cache.get_or_load("/b.png", || async { Ok(tiny()) }).await.unwrap();
    assert_eq!(cache.len(), 2);
    assert!(cache.peek("/c.png").is_none());
}
