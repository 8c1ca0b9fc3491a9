use axum::routing::{delete, get, post};
use axum::{middleware, Extension, Router};

use crate::kernel::Plugin;
use crate::plugins::auth::middleware::require_principal;
use crate::plugins::auth::principal::DynPrincipalResolver;
use crate::plugins::stories::feed::FeedBuilder;
use crate::plugins::stories::handlers::*;
use crate::plugins::stories::store::DynStoryStore;
use crate::plugins::stories::views::ViewTracker;

pub struct StoriesPlugin {
    store: DynStoryStore,
    resolver: DynPrincipalResolver,
}

impl StoriesPlugin {
    pub fn new(store: DynStoryStore, resolver: DynPrincipalResolver) -> Self {
        Self { store, resolver }
    }
}

#[async_trait::async_trait]
impl Plugin for StoriesPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_story))
            .route("/feed", get(feed))
            .route("/user/:user_id", get(user_stories))
            .route("/:story_id/view", post(view_story))
            .route("/:story_id/analytics", get(story_analytics))
            .route("/:story_id", delete(delete_story))
            .layer(middleware::from_fn(require_principal))
            .layer(Extension(self.store.clone()))
            .layer(Extension(FeedBuilder::new(self.store.clone())))
            .layer(Extension(ViewTracker::new(self.store.clone())))
            .layer(Extension(self.resolver.clone()))
    }

    fn name(&self) -> &'static str {
        "stories"
    }

    async fn on_start(&self) {
        tracing::info!("stories plugin started");
    }
}
