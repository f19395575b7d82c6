//! Integration tests for the artists vertical slice
//!
//! Covers:
//! - Insert with store-assigned ids and embedded owner
//! - Profile and status writes
//! - Owner-name overwrite semantics
//! - Status queues: isolation, newest-first ordering, paging
//! - Lookup by owner


use artbridge_core::types::*;
use artbridge_core::ArtistStore;
use test_helpers::*;

#[tokio::test]
async fn test_create_and_get_artist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let mut new = new_artist("Hokusai", 42, ArtistStatus::UploadPending);
    new.profile.info = Some("Painter of the Great Wave".to_string());
    new.profile.artwork_title = Some("The Great Wave off Kanagawa".to_string());

    let artist = artbridge_storage::artists::create(pool, new)
        .await
        .expect("Failed to create artist");

    assert!(artist.id > 0);
    assert_eq!(artist.status, ArtistStatus::UploadPending);
    assert_eq!(artist.owner.id, 42);
    assert_eq!(artist.owner.login, "member42");
    assert!(!artist.created_at.is_empty());

    let retrieved = artbridge_storage::artists::get_by_id(pool, artist.id)
        .await
        .expect("Failed to get artist")
        .expect("Artist not found");

    assert_eq!(retrieved, artist);
}

#[tokio::test]
async fn test_get_missing_artist_returns_none() {
    let test_db = TestDb::new().await;

    let missing = test_db.store().get(9999).await.unwrap();
    assert!(missing.is_none());
    assert!(!test_db.store().exists(9999).await.unwrap());
}

#[tokio::test]
async fn test_update_profile_replaces_payload_and_status() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let artist = create_test_artist(test_db.pool(), "Old", 1, ArtistStatus::Ok).await;

    let mut profile = ArtistProfile::new("New");
    profile.career = Some("Sculptor".to_string());

    let updated = store
        .update_profile(artist.id, &profile, ArtistStatus::RevisionPending)
        .await
        .unwrap()
        .expect("artist should exist");

    assert_eq!(updated.profile, profile);
    assert_eq!(updated.status, ArtistStatus::RevisionPending);
    assert_eq!(updated.owner, artist.owner);
    assert_eq!(updated.created_at, artist.created_at);
}

#[tokio::test]
async fn test_writes_to_missing_artist_return_none() {
    let test_db = TestDb::new().await;
    let store = test_db.store();

    let profile = ArtistProfile::new("Nobody");
    assert!(store
        .update_profile(404, &profile, ArtistStatus::RevisionPending)
        .await
        .unwrap()
        .is_none());
    assert!(store.set_status(404, ArtistStatus::Ok).await.unwrap().is_none());
    assert!(!store.set_owner_name(404, "Ghost").await.unwrap());
    assert!(!store.delete(404).await.unwrap());
}

#[tokio::test]
async fn test_set_status_leaves_profile_untouched() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let artist = create_test_artist(test_db.pool(), "Monet", 3, ArtistStatus::UploadPending).await;

    let approved = store
        .set_status(artist.id, ArtistStatus::Ok)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(approved.status, ArtistStatus::Ok);
    assert_eq!(approved.profile, artist.profile);
    assert_eq!(approved.owner, artist.owner);
}

#[tokio::test]
async fn test_set_owner_name_is_an_overwrite() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let artist = create_test_artist(test_db.pool(), "Klimt", 5, ArtistStatus::Ok).await;

    assert!(store.set_owner_name(artist.id, "Gustav").await.unwrap());
    let first = store.get(artist.id).await.unwrap().unwrap();
    assert_eq!(first.owner.name, "Gustav");
    assert_eq!(first.owner.login, "member5");
    assert_eq!(first.status, ArtistStatus::Ok);

    // Same value again: nothing is rewritten
    assert!(!store.set_owner_name(artist.id, "Gustav").await.unwrap());
    let second = store.get(artist.id).await.unwrap().unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_delete_removes_record() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let artist = create_test_artist(test_db.pool(), "Gone", 1, ArtistStatus::DeletePending).await;

    assert!(store.delete(artist.id).await.unwrap());
    assert!(store.get(artist.id).await.unwrap().is_none());
    assert!(!store.delete(artist.id).await.unwrap());
}

#[tokio::test]
async fn test_delete_leaves_siblings_of_the_same_owner() {
    let test_db = TestDb::new().await;
    let store = test_db.store();
    let gone = create_test_artist(test_db.pool(), "Gone", 4, ArtistStatus::DeletePending).await;
    let kept = create_test_artist(test_db.pool(), "Kept", 4, ArtistStatus::Ok).await;

    assert!(store.delete(gone.id).await.unwrap());

    let owned = store.find_owned_by(4).await.unwrap();
    assert_eq!(owned, vec![kept]);
}

#[tokio::test]
async fn test_find_by_status_is_isolated_and_newest_first() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let store = test_db.store();

    let mut delete_pending = Vec::new();
    for (i, status) in [
        ArtistStatus::DeletePending,
        ArtistStatus::Ok,
        ArtistStatus::DeletePending,
        ArtistStatus::UploadPending,
        ArtistStatus::RevisionPending,
        ArtistStatus::DeletePending,
    ]
    .into_iter()
    .enumerate()
    {
        let artist = create_test_artist(pool, &format!("artist-{i}"), 1, status).await;
        if status == ArtistStatus::DeletePending {
            delete_pending.push(artist.id);
        }
    }

    let page = store
        .find_by_status(ArtistStatus::DeletePending, PageRequest::new(0, 10))
        .await
        .unwrap();

    delete_pending.reverse();
    let ids: Vec<ArtistId> = page.content.iter().map(|a| a.id).collect();
    assert_eq!(ids, delete_pending);
    assert_eq!(page.total_elements, 3);
    assert!(page
        .content
        .iter()
        .all(|a| a.status == ArtistStatus::DeletePending));
}

#[tokio::test]
async fn test_find_by_status_pages() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let store = test_db.store();

    for i in 0..5 {
        create_test_artist(pool, &format!("published-{i}"), 1, ArtistStatus::Ok).await;
    }

    let first = store
        .find_by_status(ArtistStatus::Ok, PageRequest::new(0, 2))
        .await
        .unwrap();
    let last = store
        .find_by_status(ArtistStatus::Ok, PageRequest::new(2, 2))
        .await
        .unwrap();

    assert_eq!(first.content.len(), 2);
    assert_eq!(first.content[0].profile.name, "published-4");
    assert_eq!(first.total_pages(), 3);
    assert!(first.has_next());

    assert_eq!(last.content.len(), 1);
    assert_eq!(last.content[0].profile.name, "published-0");
    assert!(!last.has_next());
}

#[tokio::test]
async fn test_find_owned_by_returns_every_record_of_the_owner() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let store = test_db.store();

    create_test_artist(pool, "a", 7, ArtistStatus::UploadPending).await;
    create_test_artist(pool, "b", 7, ArtistStatus::Ok).await;
    create_test_artist(pool, "c", 9, ArtistStatus::Ok).await;
    create_test_artist(pool, "d", 7, ArtistStatus::DeletePending).await;

    let owned = store.find_owned_by(7).await.unwrap();
    let names: Vec<&str> = owned.iter().map(|a| a.profile.name.as_str()).collect();
    assert_eq!(names, vec!["d", "b", "a"]);

    assert!(store.find_owned_by(8).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_info_is_rejected_by_schema() {
    let test_db = TestDb::new().await;

    let mut new = new_artist("Verbose", 1, ArtistStatus::UploadPending);
    new.profile.info = Some("x".repeat(ArtistProfile::MAX_INFO_LEN + 1));

    let result = artbridge_storage::artists::create(test_db.pool(), new).await;
    assert!(result.is_err());
}
