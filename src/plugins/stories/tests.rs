use chrono::Duration;
use uuid::Uuid;

use crate::plugins::auth::principal::Principal;
use crate::plugins::stories::feed::FeedBuilder;
use crate::plugins::stories::models::CreateStory;
use crate::plugins::stories::store::{DynStoryStore, InMemoryStoryStore, StoreError, StoryStore};
use crate::plugins::stories::views::ViewTracker;

fn principal(username: &str) -> Principal {
    Principal {
        id: Uuid::new_v4(),
        username: username.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        avatar: String::new(),
    }
}

fn text_story(content: &str) -> CreateStory {
    CreateStory { content: content.to_string(), ..Default::default() }
}

#[tokio::test]
async fn create_sets_24h_expiry_and_defaults() {
    let store = InMemoryStoryStore::new();
    let story = store.create(principal("alice"), CreateStory::default()).await.unwrap();

    assert_eq!(story.expires_at, story.created_at + Duration::hours(24));
    assert!(story.views.is_empty());
    assert_eq!(story.media_type, "text");
    assert_eq!(story.background_color, "#3498db");
    assert_eq!(story.text_color, "#ffffff");
}

#[tokio::test]
async fn list_active_honours_ttl_boundary() {
    let store = InMemoryStoryStore::new();
    let story = store.create(principal("alice"), text_story("hi")).await.unwrap();

    let just_before = story.created_at + Duration::hours(23) + Duration::minutes(59);
    let just_after = story.created_at + Duration::hours(24) + Duration::minutes(1);

    let active = store.list_active(just_before).await.unwrap();
    assert_eq!(active.len(), 1);

    let expired = store.list_active(just_after).await.unwrap();
    assert!(expired.is_empty());

    // expired stories are filtered, not purged
    assert!(store.find_by_id(story.id).await.is_ok());
}

#[tokio::test]
async fn marking_viewed_twice_is_idempotent() {
    let store: DynStoryStore = InMemoryStoryStore::shared();
    let tracker = ViewTracker::new(store.clone());
    let story = store.create(principal("alice"), text_story("hi")).await.unwrap();
    let viewer = Uuid::new_v4();

    assert_eq!(tracker.mark_viewed(story.id, viewer).await.unwrap(), 1);
    assert_eq!(tracker.mark_viewed(story.id, viewer).await.unwrap(), 1);

    let other = Uuid::new_v4();
    assert_eq!(tracker.mark_viewed(story.id, other).await.unwrap(), 2);

    let stored = store.find_by_id(story.id).await.unwrap();
    assert_eq!(stored.views, vec![viewer, other]);
}

#[tokio::test]
async fn marking_unknown_story_is_not_found() {
    let tracker = ViewTracker::new(InMemoryStoryStore::shared());
    let err = tracker.mark_viewed(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound);
}

#[tokio::test]
async fn only_the_author_may_delete() {
    let store = InMemoryStoryStore::new();
    let alice = principal("alice");
    let story = store.create(alice.clone(), text_story("hi")).await.unwrap();

    let err = store.delete(story.id, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, StoreError::NotAuthor);
    // failed delete leaves the store unchanged
    assert!(store.find_by_id(story.id).await.is_ok());

    store.delete(story.id, alice.id).await.unwrap();
    assert_eq!(store.find_by_id(story.id).await.unwrap_err(), StoreError::NotFound);
}

#[tokio::test]
async fn delete_unknown_story_is_not_found() {
    let store = InMemoryStoryStore::new();
    let err = store.delete(Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound);
}

#[tokio::test]
async fn feed_groups_by_author_in_first_seen_order() {
    let store: DynStoryStore = InMemoryStoryStore::shared();
    let feed = FeedBuilder::new(store.clone());
    let alice = principal("alice");
    let bob = principal("bob");

    // interleaved insertion
    let a1 = store.create(alice.clone(), text_story("a1")).await.unwrap();
    let b1 = store.create(bob.clone(), text_story("b1")).await.unwrap();
    let a2 = store.create(alice.clone(), text_story("a2")).await.unwrap();

    let groups = feed.build_feed(chrono::Utc::now()).await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].author.id, alice.id);
    assert_eq!(groups[1].author.id, bob.id);

    // no group is empty, no group mixes authors
    for group in &groups {
        assert!(!group.stories.is_empty());
        assert!(group.stories.iter().all(|s| s.author.id == group.author.id));
    }

    // scan (insertion) order within a group
    let ids: Vec<_> = groups[0].stories.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a1.id, a2.id]);
    assert_eq!(groups[1].stories[0].id, b1.id);
}

#[tokio::test]
async fn feed_is_empty_when_no_active_stories() {
    let feed = FeedBuilder::new(InMemoryStoryStore::shared());
    let groups = feed.build_feed(chrono::Utc::now()).await.unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn user_feed_filters_to_one_author() {
    let store: DynStoryStore = InMemoryStoryStore::shared();
    let feed = FeedBuilder::new(store.clone());
    let alice = principal("alice");
    let bob = principal("bob");

    store.create(alice.clone(), text_story("a1")).await.unwrap();
    store.create(bob.clone(), text_story("b1")).await.unwrap();
    store.create(alice.clone(), text_story("a2")).await.unwrap();

    let stories = feed.build_user_feed(alice.id, chrono::Utc::now()).await.unwrap();
    assert_eq!(stories.len(), 2);
    assert!(stories.iter().all(|s| s.author.id == alice.id));
}
