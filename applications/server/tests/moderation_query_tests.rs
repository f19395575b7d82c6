//! Moderation queues through `ModerationQueryService`
//!
//! Covers:
//! - Queues never leak records of another status
//! - Pending queues are moderator-only
//! - Newest-first ordering and paging
//! - Single and per-owner lookups

mod common;

use artbridge_core::{ArtistError, ArtistStatus, ArtistStore, PageRequest};
use common::fixtures::{moderator, owner, stranger, OWNER_ID};
use common::TestApp;

/// One record in each status, created in the order of `ArtistStatus::ALL`
async fn seed_every_status(app: &TestApp) {
    for status in ArtistStatus::ALL {
        let artist = app.create(&owner(), status.as_str()).await;
        app.store.set_status(artist.id, status).await.unwrap();
    }
}

#[tokio::test]
async fn test_queues_are_partitioned_by_status() {
    let app = TestApp::new().await;
    seed_every_status(&app).await;
    seed_every_status(&app).await;

    let moderation = &app.state.moderation;
    let page = PageRequest::default();

    let queues = [
        (ArtistStatus::Ok, moderation.list_published(page).await.unwrap()),
        (
            ArtistStatus::UploadPending,
            moderation.list_upload_pending(&moderator(), page).await.unwrap(),
        ),
        (
            ArtistStatus::RevisionPending,
            moderation.list_revision_pending(&moderator(), page).await.unwrap(),
        ),
        (
            ArtistStatus::DeletePending,
            moderation.list_delete_pending(&moderator(), page).await.unwrap(),
        ),
    ];

    for (status, queue) in queues {
        assert_eq!(queue.total_elements, 2, "{status}");
        assert!(queue.content.iter().all(|a| a.status == status), "{status}");
    }
}

#[tokio::test]
async fn test_pending_queues_are_moderator_only() {
    let app = TestApp::new().await;
    seed_every_status(&app).await;

    let moderation = &app.state.moderation;
    let page = PageRequest::default();

    for actor in [owner(), stranger()] {
        let results = [
            moderation.list_upload_pending(&actor, page).await,
            moderation.list_revision_pending(&actor, page).await,
            moderation.list_delete_pending(&actor, page).await,
        ];
        for result in results {
            assert!(matches!(result, Err(ArtistError::Unauthorized(_))));
        }
    }

    let published = moderation
        .list_by_status(&stranger(), ArtistStatus::Ok, page)
        .await
        .unwrap();
    assert_eq!(published.total_elements, 1);
}

#[tokio::test]
async fn test_queue_is_newest_first_and_paged() {
    let app = TestApp::new().await;
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(app.create(&owner(), &format!("artist{i}")).await.id);
    }
    ids.reverse();

    let moderation = &app.state.moderation;
    let first = moderation
        .list_upload_pending(&moderator(), PageRequest::new(0, 2))
        .await
        .unwrap();
    let last = moderation
        .list_upload_pending(&moderator(), PageRequest::new(2, 2))
        .await
        .unwrap();

    assert_eq!(first.total_elements, 5);
    assert_eq!(first.total_pages(), 3);
    assert!(first.has_next());
    assert_eq!(
        first.content.iter().map(|a| a.id).collect::<Vec<_>>(),
        ids[..2].to_vec()
    );
    assert_eq!(last.content.len(), 1);
    assert_eq!(last.content[0].id, ids[4]);
    assert!(!last.has_next());
}

#[tokio::test]
async fn test_delete_pending_never_shows_other_records() {
    let app = TestApp::new().await;
    let kept = app.create(&owner(), "kept").await;
    let leaving = app.create(&owner(), "leaving").await;

    app.state.artists.approve(kept.id, &moderator()).await.unwrap();
    app.state
        .artists
        .request_delete(leaving.id, &owner())
        .await
        .unwrap();

    let queue = app
        .state
        .moderation
        .list_delete_pending(&moderator(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(queue.content.len(), 1);
    assert_eq!(queue.content[0].id, leaving.id);
}

#[tokio::test]
async fn test_find_one_and_find_owned_by() {
    let app = TestApp::new().await;
    let mine = app.create(&owner(), "mine").await;
    app.create(&stranger(), "theirs").await;

    let moderation = &app.state.moderation;
    assert_eq!(moderation.find_one(mine.id).await.unwrap(), mine);
    assert!(matches!(
        moderation.find_one(999).await,
        Err(ArtistError::NotFound { .. })
    ));

    let owned = moderation.find_owned_by(OWNER_ID).await.unwrap();
    assert_eq!(owned, vec![mine]);
    assert!(moderation.find_owned_by(404).await.unwrap().is_empty());
}
