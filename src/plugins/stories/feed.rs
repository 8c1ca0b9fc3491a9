use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::plugins::stories::models::{Story, StoryGroup};
use crate::plugins::stories::store::{DynStoryStore, StoreError};

/// Builds story feeds from the active-story scan. No pagination, no caching;
/// the feed is recomputed in full on every call.
#[derive(Clone)]
pub struct FeedBuilder {
    store: DynStoryStore,
}

impl FeedBuilder {
    pub fn new(store: DynStoryStore) -> Self {
        Self { store }
    }

    /// Groups active stories by author. Group order is first-seen author
    /// order in the scan; within a group, stories keep scan order, which is
    /// insertion order since the store appends.
    pub async fn build_feed(&self, now: DateTime<Utc>) -> Result<Vec<StoryGroup>, StoreError> {
        let active = self.store.list_active(now).await?;
        let mut groups: Vec<StoryGroup> = Vec::new();
        for story in active {
            match groups.iter_mut().find(|g| g.author.id == story.author.id) {
                Some(group) => group.stories.push(story),
                None => groups.push(StoryGroup {
                    author: story.author.clone(),
                    stories: vec![story],
                }),
            }
        }
        Ok(groups)
    }

    /// A single author's active stories, same ordering rule as the feed.
    pub async fn build_user_feed(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<Story>, StoreError> {
        let active = self.store.list_active(now).await?;
        Ok(active.into_iter().filter(|s| s.author.id == user_id).collect())
    }
}
