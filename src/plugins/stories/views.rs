use uuid::Uuid;

use crate::plugins::stories::store::{DynStoryStore, StoreError};

/// Records per-viewer view state on stories. Marking is idempotent: the
/// first call by a viewer grows the story's view set, repeats are no-ops,
/// and the updated count is returned either way.
#[derive(Clone)]
pub struct ViewTracker {
    store: DynStoryStore,
}

impl ViewTracker {
    pub fn new(store: DynStoryStore) -> Self {
        Self { store }
    }

    pub async fn mark_viewed(&self, story_id: Uuid, viewer_id: Uuid) -> Result<u64, StoreError> {
        self.store.add_view(story_id, viewer_id).await
    }
}
