use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plugins::auth::principal::Principal;

/// Snapshot of the creating principal, embedded in each story.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub avatar: String,
}

impl From<Principal> for Author {
    fn from(p: Principal) -> Self {
        Author {
            id: p.id,
            username: p.username,
            first_name: p.first_name,
            last_name: p.last_name,
            avatar: p.avatar,
        }
    }
}

/// A time-limited content unit. Immutable after creation except for the
/// append-only `views` set and deletion by its author.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Story {
    pub id: Uuid,
    pub author: Author,
    pub content: String,
    #[serde(rename = "mediaUrl")]
    pub media_url: String,
    #[serde(rename = "mediaType")]
    pub media_type: String,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "textColor")]
    pub text_color: String,
    /// Viewer ids, set semantics: a viewer appears at most once.
    pub views: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl Story {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

fn default_media_type() -> String {
    "text".to_string()
}

fn default_background_color() -> String {
    "#3498db".to_string()
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

/// Story creation payload. Every field is optional; creation never fails for
/// an authenticated author. `media_url` is an already-uploaded server-relative
/// path supplied by the upload collaborator.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateStory {
    #[serde(default)]
    pub content: String,
    #[serde(rename = "mediaUrl", default)]
    pub media_url: String,
    #[serde(rename = "mediaType", default = "default_media_type")]
    pub media_type: String,
    #[serde(rename = "backgroundColor", default = "default_background_color")]
    pub background_color: String,
    #[serde(rename = "textColor", default = "default_text_color")]
    pub text_color: String,
}

impl Default for CreateStory {
    fn default() -> Self {
        CreateStory {
            content: String::new(),
            media_url: String::new(),
            media_type: default_media_type(),
            background_color: default_background_color(),
            text_color: default_text_color(),
        }
    }
}

/// One author's active stories as rendered together in a feed. Derived per
/// request, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoryGroup {
    pub author: Author,
    pub stories: Vec<Story>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ViewResponse {
    pub message: String,
    pub views: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StoryAnalytics {
    #[serde(rename = "storyId")]
    pub story_id: Uuid,
    #[serde(rename = "viewCount")]
    pub view_count: u64,
    pub viewers: Vec<Uuid>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}
