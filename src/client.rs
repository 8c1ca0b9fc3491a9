//! HTTP client plumbing for the stories API: typed calls mirroring the
//! server surface, a `ViewSink` adapter for playback, and a periodic feed
//! poller that is cancelled on teardown.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

use crate::playback::ViewSink;
use crate::plugins::stories::models::{CreateStory, Story, StoryGroup, ViewResponse};

/// Default refresh interval for the feed poller.
pub const FEED_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct StoriesClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl StoriesClient {
    /// `base_url` is the API origin, e.g. `http://127.0.0.1:5000`. Media URLs
    /// in responses are server-relative and are resolved against it.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    pub async fn create_story(&self, req: &CreateStory) -> anyhow::Result<Story> {
        let resp = self
            .request(reqwest::Method::POST, "/stories")
            .json(req)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn fetch_feed(&self) -> anyhow::Result<Vec<StoryGroup>> {
        let resp = self
            .request(reqwest::Method::GET, "/stories/feed")
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn fetch_user_stories(&self, user_id: Uuid) -> anyhow::Result<Vec<Story>> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/stories/user/{user_id}"))
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    pub async fn view_story(&self, story_id: Uuid) -> anyhow::Result<u64> {
        let resp = self
            .request(reqwest::Method::POST, &format!("/stories/{story_id}/view"))
            .send()
            .await?
            .error_for_status()?;
        let body: ViewResponse = resp.json().await?;
        Ok(body.views)
    }

    pub async fn delete_story(&self, story_id: Uuid) -> anyhow::Result<()> {
        self.request(reqwest::Method::DELETE, &format!("/stories/{story_id}"))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Resolves a server-relative media path against the API origin.
    pub fn media_url(&self, relative: &str) -> String {
        format!("{}{}", self.base_url, relative)
    }
}

#[async_trait]
impl ViewSink for StoriesClient {
    async fn mark_viewed(&self, story_id: Uuid) -> anyhow::Result<u64> {
        self.view_story(story_id).await
    }
}

/// Refreshes the story feed on a fixed interval and publishes the latest
/// snapshot. Fetch failures are logged and the last good snapshot is kept.
/// The polling task is aborted on `stop` or drop.
pub struct FeedPoller {
    rx: watch::Receiver<Vec<StoryGroup>>,
    handle: tokio::task::JoinHandle<()>,
}

impl FeedPoller {
    pub fn start(client: StoriesClient, every: Duration) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                match client.fetch_feed().await {
                    Ok(groups) => {
                        let _ = tx.send(groups);
                    }
                    Err(e) => tracing::warn!(error = %e, "feed refresh failed"),
                }
            }
        });
        Self { rx, handle }
    }

    /// Latest feed snapshot; empty until the first successful fetch.
    pub fn latest(&self) -> Vec<StoryGroup> {
        self.rx.borrow().clone()
    }

    /// Waits until the snapshot changes.
    pub async fn changed(&mut self) -> anyhow::Result<()> {
        self.rx.changed().await?;
        Ok(())
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for FeedPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
