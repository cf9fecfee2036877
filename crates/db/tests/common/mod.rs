//! Repository scenarios shared by the in-memory and Postgres test suites.
//!
//! Each scenario takes a fresh [`Repositories`] bundle, so both backends are
//! held to exactly the same observable behavior.

#![allow(dead_code)]

use assert_matches::assert_matches;
use beatmarket_core::error::CoreError;
use beatmarket_core::pagination::PageRequest;
use beatmarket_core::types::DbId;
use beatmarket_db::entity::Filter;
use beatmarket_db::models::artist::{Artist, CreateArtist};
use beatmarket_db::models::beat::{Beat, CreateBeat, UpdateBeat};
use beatmarket_db::models::license::{CreateLicense, License, UpdateLicense};
use beatmarket_db::models::user::{CreateUser, UpdateUser};
use beatmarket_db::repositories::{
    delete_owned, fetch_page, resolve_profile_id, update_owned, Repositories,
};
use beatmarket_db::DbError;
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn new_user(email: &str) -> CreateUser {
    CreateUser {
        username: email.split('@').next().unwrap_or(email).to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        picture_url: None,
        birthday: NaiveDate::from_ymd_opt(1999, 4, 20).unwrap(),
        roles: vec!["user".to_string()],
        tags: vec![],
    }
}

pub fn new_license(user_id: DbId, title: &str, price: &str) -> CreateLicense {
    CreateLicense {
        title: title.to_string(),
        description: Some("basic lease".to_string()),
        price: price.to_string(),
        file_url: None,
        prod_by: None,
        playlist_id: None,
        beat_pack_id: None,
        user_id,
    }
}

pub fn new_beat(user_id: DbId, title: &str) -> CreateBeat {
    CreateBeat {
        title: title.to_string(),
        description: None,
        picture_url: None,
        file_url: format!("/media/audio/{title}.mp3"),
        co_prod: None,
        prod_by: None,
        user_id,
    }
}

pub async fn seed_user(repos: &Repositories, email: &str) -> DbId {
    repos.users.create(&new_user(email)).await.unwrap()
}

fn core(err: DbError) -> CoreError {
    match err {
        DbError::Core(e) => e,
        DbError::Database(e) => panic!("expected a domain error, got database error: {e}"),
    }
}

fn ids<T>(items: &[T], id: impl Fn(&T) -> DbId) -> Vec<DbId> {
    items.iter().map(id).collect()
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// Five seeded rows: the first page of two is the two newest, the third page
/// holds the oldest, and the count is independent of the page.
pub async fn paging_is_newest_first(repos: Repositories) {
    let owner = seed_user(&repos, "paging@example.com").await;
    let mut created = Vec::new();
    for i in 1..=5 {
        let id = repos
            .licenses
            .create(&new_license(owner, &format!("L{i}"), "10"))
            .await
            .unwrap();
        created.push(id);
    }
    assert_eq!(created, vec![1, 2, 3, 4, 5]);

    let first = fetch_page(&*repos.licenses, &PageRequest::new(0, 2).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(ids(&first.items, |l: &License| l.id), vec![5, 4]);
    assert_eq!(first.total, 5);
    assert!(first.has_next);
    assert!(!first.has_previous);

    let last = fetch_page(&*repos.licenses, &PageRequest::new(4, 2).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(ids(&last.items, |l: &License| l.id), vec![1]);
    assert_eq!(last.total, 5);
    assert_eq!(last.page, 2);
    assert!(!last.has_next);
    assert!(last.has_previous);
}

pub async fn start_past_total_is_empty_with_real_total(repos: Repositories) {
    let owner = seed_user(&repos, "past@example.com").await;
    for i in 0..3 {
        repos
            .beats
            .create(&new_beat(owner, &format!("b{i}")))
            .await
            .unwrap();
    }

    let page = fetch_page(&*repos.beats, &PageRequest::new(10, 5).unwrap(), None)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
    assert!(page.has_previous);
    assert!(!page.has_next);
}

pub async fn empty_collection_has_no_neighbours(repos: Repositories) {
    let page = fetch_page(&*repos.beats, &PageRequest::new(0, 10).unwrap(), None)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
    assert!(!page.has_next);
    assert!(!page.has_previous);
}

/// Pages never exceed `size`, stay strictly id-descending, and the count
/// grows by exactly one per create with a single writer.
pub async fn pages_are_bounded_and_count_is_monotonic(repos: Repositories) {
    let owner = seed_user(&repos, "mono@example.com").await;
    let mut previous = repos.beats.count(None).await.unwrap();

    for i in 0..7 {
        repos
            .beats
            .create(&new_beat(owner, &format!("m{i}")))
            .await
            .unwrap();
        let now = repos.beats.count(None).await.unwrap();
        assert_eq!(now, previous + 1);
        previous = now;
    }

    for (start, size) in [(0, 1), (0, 3), (2, 3), (5, 3), (6, 10), (0, 100)] {
        let page = PageRequest::new(start, size).unwrap();
        let items = repos.beats.list_page(&page, None).await.unwrap();
        assert!(items.len() as i64 <= size);
        assert!(
            items.windows(2).all(|w| w[0].id > w[1].id),
            "page ({start}, {size}) is not id-descending"
        );
    }
}

pub async fn filters_scope_pages_and_counts(repos: Repositories) {
    let alice = seed_user(&repos, "alice@example.com").await;
    let bob = seed_user(&repos, "bob@example.com").await;
    for i in 0..3 {
        repos.beats.create(&new_beat(alice, &format!("a{i}"))).await.unwrap();
    }
    repos.beats.create(&new_beat(bob, "b0")).await.unwrap();

    let mine = Filter::owner(alice);
    let page = fetch_page(&*repos.beats, &PageRequest::new(0, 2).unwrap(), Some(&mine))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|b: &Beat| b.user_id == alice));
    assert_eq!(repos.beats.count(None).await.unwrap(), 4);

    let bad = Filter::eq("title", "a0");
    assert_matches!(
        repos.beats.count(Some(&bad)).await.map_err(core),
        Err(CoreError::Validation(_))
    );
}

// ---------------------------------------------------------------------------
// Create / update / delete
// ---------------------------------------------------------------------------

/// create -> read -> partial update -> read -> owner delete -> NotFound.
pub async fn license_lifecycle(repos: Repositories) {
    let owner = seed_user(&repos, "seller@example.com").await;

    let id = repos
        .licenses
        .create(&new_license(owner, "A", "10"))
        .await
        .unwrap();
    let created = repos.licenses.get_by_id(id).await.unwrap();
    assert_eq!(created.title, "A");
    assert_eq!(created.price, "10");
    assert_eq!(created.created_at, created.updated_at);

    let update = UpdateLicense {
        price: Some("20".to_string()),
        ..Default::default()
    };
    assert_eq!(repos.licenses.update(id, &update).await.unwrap(), id);

    let updated = repos.licenses.get_by_id(id).await.unwrap();
    assert_eq!(updated.title, "A");
    assert_eq!(updated.price, "20");
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.created_at, created.created_at);

    assert!(repos.licenses.delete(id, owner).await.unwrap());
    assert_matches!(
        repos.licenses.get_by_id(id).await.map_err(core),
        Err(CoreError::NotFound { entity: "License", .. })
    );
}

pub async fn partial_update_keeps_other_fields(repos: Repositories) {
    let owner = seed_user(&repos, "partial@example.com").await;
    let mut input = new_beat(owner, "original");
    input.description = Some("moody".to_string());
    input.co_prod = Some("friend".to_string());
    input.prod_by = Some("me".to_string());
    let id = repos.beats.create(&input).await.unwrap();
    let before = repos.beats.get_by_id(id).await.unwrap();

    let update = UpdateBeat {
        title: Some("renamed".to_string()),
        ..Default::default()
    };
    repos.beats.update(id, &update).await.unwrap();

    let after = repos.beats.get_by_id(id).await.unwrap();
    assert_eq!(after.title, "renamed");
    assert_eq!(after.description, before.description);
    assert_eq!(after.picture_url, before.picture_url);
    assert_eq!(after.file_url, before.file_url);
    assert_eq!(after.co_prod, before.co_prod);
    assert_eq!(after.prod_by, before.prod_by);
    assert_eq!(after.user_id, before.user_id);
    assert_eq!(after.is_available, before.is_available);
    assert_eq!(after.created_at, before.created_at);
}

pub async fn empty_update_changes_nothing(repos: Repositories) {
    let owner = seed_user(&repos, "noop@example.com").await;
    let id = repos.beats.create(&new_beat(owner, "still")).await.unwrap();
    let before = repos.beats.get_by_id(id).await.unwrap();

    repos.beats.update(id, &UpdateBeat::default()).await.unwrap();

    let after = repos.beats.get_by_id(id).await.unwrap();
    assert_eq!(after.updated_at, before.updated_at);
}

pub async fn update_missing_row_is_not_found(repos: Repositories) {
    let update = UpdateBeat {
        title: Some("ghost".to_string()),
        ..Default::default()
    };
    assert_matches!(
        repos.beats.update(404, &update).await.map_err(core),
        Err(CoreError::NotFound { id: 404, .. })
    );
    assert_matches!(
        repos.beats.update(404, &UpdateBeat::default()).await.map_err(core),
        Err(CoreError::NotFound { id: 404, .. })
    );
}

pub async fn mismatched_owner_delete_is_a_noop(repos: Repositories) {
    let owner = seed_user(&repos, "owner@example.com").await;
    let other = seed_user(&repos, "other@example.com").await;
    let id = repos.beats.create(&new_beat(owner, "keep")).await.unwrap();

    assert!(!repos.beats.delete(id, other).await.unwrap());

    let still_there = repos.beats.get_by_id(id).await.unwrap();
    assert_eq!(still_there.title, "keep");
    assert_eq!(still_there.user_id, owner);
}

/// Owner-checked helpers tell a foreign row apart from a missing one.
pub async fn owner_checks_distinguish_forbidden_from_not_found(repos: Repositories) {
    let owner = seed_user(&repos, "mine@example.com").await;
    let intruder = seed_user(&repos, "intruder@example.com").await;
    let id = repos.beats.create(&new_beat(owner, "guarded")).await.unwrap();
    let update = UpdateBeat {
        title: Some("hijacked".to_string()),
        ..Default::default()
    };

    assert_matches!(
        update_owned::<Beat, _>(&*repos.beats, id, intruder, &update)
            .await
            .map_err(core),
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        delete_owned::<Beat, _>(&*repos.beats, id, intruder)
            .await
            .map_err(core),
        Err(CoreError::Forbidden(_))
    );
    assert_matches!(
        delete_owned::<Beat, _>(&*repos.beats, 999, owner)
            .await
            .map_err(core),
        Err(CoreError::NotFound { .. })
    );
    assert_eq!(repos.beats.get_by_id(id).await.unwrap().title, "guarded");

    update_owned::<Beat, _>(&*repos.beats, id, owner, &update)
        .await
        .unwrap();
    delete_owned::<Beat, _>(&*repos.beats, id, owner).await.unwrap();
    assert_matches!(
        repos.beats.get_by_id(id).await.map_err(core),
        Err(CoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Soft delete, deactivation and profile resolution
// ---------------------------------------------------------------------------

pub async fn soft_deleted_users_disappear(repos: Repositories) {
    let keep = seed_user(&repos, "keep@example.com").await;
    let gone = seed_user(&repos, "gone@example.com").await;

    assert!(repos.users.delete(gone, gone).await.unwrap());
    assert!(!repos.users.delete(gone, gone).await.unwrap());

    assert_matches!(
        repos.users.get_by_id(gone).await.map_err(core),
        Err(CoreError::NotFound { entity: "User", .. })
    );
    assert_eq!(repos.users.count(None).await.unwrap(), 1);
    let listed = repos
        .users
        .list_page(&PageRequest::first_max(), None)
        .await
        .unwrap();
    assert_eq!(ids(&listed, |u| u.id), vec![keep]);

    let update = UpdateUser {
        username: Some("zombie".to_string()),
        ..Default::default()
    };
    assert_matches!(
        repos.users.update(gone, &update).await.map_err(core),
        Err(CoreError::NotFound { .. })
    );

    // The email is free again once its owner is deleted.
    repos.users.create(&new_user("gone@example.com")).await.unwrap();
}

pub async fn profiles_resolve_until_deactivated(repos: Repositories) {
    let user = seed_user(&repos, "artist@example.com").await;
    let loner = seed_user(&repos, "loner@example.com").await;
    let artist_id = repos
        .artists
        .create(&CreateArtist {
            user_id: user,
            description: Some("lofi".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(
        resolve_profile_id::<Artist, _>(&*repos.artists, user).await.unwrap(),
        artist_id
    );
    assert_matches!(
        resolve_profile_id::<Artist, _>(&*repos.artists, loner)
            .await
            .map_err(core),
        Err(CoreError::NotFoundBy { entity: "Artist", column: "user_id", .. })
    );

    delete_owned::<Artist, _>(&*repos.artists, artist_id, user)
        .await
        .unwrap();

    assert_matches!(
        resolve_profile_id::<Artist, _>(&*repos.artists, user)
            .await
            .map_err(core),
        Err(CoreError::NotFoundBy { .. })
    );
    assert_eq!(repos.artists.count(None).await.unwrap(), 0);
}

pub async fn find_by_ids_skips_unknown_and_retired(repos: Repositories) {
    let a = seed_user(&repos, "a@example.com").await;
    let b = seed_user(&repos, "b@example.com").await;
    let c = seed_user(&repos, "c@example.com").await;
    repos.users.delete(b, b).await.unwrap();

    let found = repos.users.find_by_ids(&[a, b, c, 9_999]).await.unwrap();
    assert_eq!(ids(&found, |u| u.id), vec![c, a]);
    assert!(repos.users.find_by_ids(&[]).await.unwrap().is_empty());
}
