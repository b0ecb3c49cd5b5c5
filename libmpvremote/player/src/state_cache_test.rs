use pretty_assertions::assert_eq;

use super::StateCache;
use crate::dto::snapshot::PlayerSnapshot;

#[tokio::test]
async fn starts_empty() {
    let cache = StateCache::new();

    assert_eq!(PlayerSnapshot::default(), cache.get().await);
}

#[tokio::test]
async fn merges_field_by_field() {
    let cache = StateCache::new();
    cache
        .update(&PlayerSnapshot {
            pause: Some(true),
            volume: Some(80),
            filename: Some(Some("a.mkv".to_owned())),
            ..Default::default()
        })
        .await;
    cache
        .update(&PlayerSnapshot {
            volume: Some(30),
            filename: Some(None),
            ..Default::default()
        })
        .await;

    assert_eq!(
        PlayerSnapshot {
            pause: Some(true),
            volume: Some(30),
            filename: Some(None),
            ..Default::default()
        },
        cache.get().await
    );
}
