use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::plugins::auth::principal::Principal;
use crate::plugins::stories::models::{CreateStory, Story};

/// Stories live for 24 hours.
pub const STORY_TTL_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("story not found")]
    NotFound,
    #[error("requester is not the story author")]
    NotAuthor,
}

/// Storage abstraction for stories. The in-memory implementation below serves
/// demo scale; a persistence backend substitutes here without touching callers.
#[async_trait]
pub trait StoryStore: Send + Sync + 'static {
    async fn create(&self, author: Principal, req: CreateStory) -> Result<Story, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Story, StoreError>;

    /// All stories with `expires_at > now`, in insertion order. Expired
    /// stories are filtered here, not purged (lazy expiry).
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Story>, StoreError>;

    /// Deletes `id` on behalf of `requester`. Only the author may delete;
    /// the store is unchanged on failure.
    async fn delete(&self, id: Uuid, requester: Uuid) -> Result<(), StoreError>;

    /// Adds `viewer` to the story's view set if absent. Idempotent; returns
    /// the view count either way.
    async fn add_view(&self, id: Uuid, viewer: Uuid) -> Result<u64, StoreError>;
}

pub type DynStoryStore = Arc<dyn StoryStore>;

pub struct InMemoryStoryStore {
    stories: parking_lot::RwLock<Vec<Story>>,
}

impl InMemoryStoryStore {
    pub fn new() -> Self {
        Self { stories: parking_lot::RwLock::new(Vec::new()) }
    }

    pub fn shared() -> DynStoryStore {
        Arc::new(Self::new())
    }
}

impl Default for InMemoryStoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn create(&self, author: Principal, req: CreateStory) -> Result<Story, StoreError> {
        let now = Utc::now();
        let story = Story {
            id: Uuid::new_v4(),
            author: author.into(),
            content: req.content,
            media_url: req.media_url,
            media_type: req.media_type,
            background_color: req.background_color,
            text_color: req.text_color,
            views: Vec::new(),
            created_at: now,
            expires_at: now + Duration::hours(STORY_TTL_HOURS),
        };
        self.stories.write().push(story.clone());
        Ok(story)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Story, StoreError> {
        self.stories
            .read()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Story>, StoreError> {
        Ok(self
            .stories
            .read()
            .iter()
            .filter(|s| s.is_active(now))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid, requester: Uuid) -> Result<(), StoreError> {
        let mut stories = self.stories.write();
        let idx = stories.iter().position(|s| s.id == id).ok_or(StoreError::NotFound)?;
        if stories[idx].author.id != requester {
            return Err(StoreError::NotAuthor);
        }
        stories.remove(idx);
        Ok(())
    }

    async fn add_view(&self, id: Uuid, viewer: Uuid) -> Result<u64, StoreError> {
        let mut stories = self.stories.write();
        let story = stories.iter_mut().find(|s| s.id == id).ok_or(StoreError::NotFound)?;
        if !story.views.contains(&viewer) {
            story.views.push(viewer);
        }
        Ok(story.views.len() as u64)
    }
}
