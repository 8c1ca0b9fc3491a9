use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::auth::principal::Principal;
use crate::plugins::stories::feed::FeedBuilder;
use crate::plugins::stories::models::{
    CreateStory, DeleteResponse, Story, StoryAnalytics, StoryGroup, ViewResponse,
};
use crate::plugins::stories::store::DynStoryStore;
use crate::plugins::stories::views::ViewTracker;

pub async fn create_story(
    Extension(store): Extension<DynStoryStore>,
    principal: Principal,
    Json(payload): Json<CreateStory>,
) -> Result<(StatusCode, Json<Story>), AppError> {
    let story = store.create(principal, payload).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

pub async fn feed(
    Extension(feed): Extension<FeedBuilder>,
    _principal: Principal,
) -> Result<Json<Vec<StoryGroup>>, AppError> {
    let groups = feed.build_feed(Utc::now()).await?;
    Ok(Json(groups))
}

pub async fn user_stories(
    Extension(feed): Extension<FeedBuilder>,
    _principal: Principal,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Story>>, AppError> {
    let stories = feed.build_user_feed(user_id, Utc::now()).await?;
    Ok(Json(stories))
}

pub async fn view_story(
    Extension(tracker): Extension<ViewTracker>,
    principal: Principal,
    Path(story_id): Path<Uuid>,
) -> Result<Json<ViewResponse>, AppError> {
    let views = tracker.mark_viewed(story_id, principal.id).await?;
    Ok(Json(ViewResponse { message: "Story viewed".to_string(), views }))
}

pub async fn delete_story(
    Extension(store): Extension<DynStoryStore>,
    principal: Principal,
    Path(story_id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    store.delete(story_id, principal.id).await?;
    Ok(Json(DeleteResponse { message: "Story deleted successfully".to_string() }))
}

/// Author-only view analytics for a single story.
pub async fn story_analytics(
    Extension(store): Extension<DynStoryStore>,
    principal: Principal,
    Path(story_id): Path<Uuid>,
) -> Result<Json<StoryAnalytics>, AppError> {
    let story = store.find_by_id(story_id).await?;
    if story.author.id != principal.id {
        return Err(AppError::forbidden("notAuthorizedToViewAnalytics"));
    }
    Ok(Json(StoryAnalytics {
        story_id: story.id,
        view_count: story.views.len() as u64,
        viewers: story.views,
        created_at: story.created_at,
        expires_at: story.expires_at,
    }))
}
