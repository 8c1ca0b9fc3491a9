#![allow(dead_code)]

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

use social_api_kernel::kernel::{build_app, Plugin};
use social_api_kernel::plugins::auth::{
    JwtPrincipalResolver, StaticUserDirectory, UserProfile,
};
use social_api_kernel::plugins::health::HealthPlugin;
use social_api_kernel::plugins::stories::store::{DynStoryStore, InMemoryStoryStore};
use social_api_kernel::plugins::stories::StoriesPlugin;

pub const JWT_SECRET: &str = "social-test-secret";

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: usize,
}

pub fn mint_token(user_id: Uuid) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let claims = Claims { sub: user_id.to_string(), exp };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token")
}

pub fn expired_token(user_id: Uuid) -> String {
    let exp = (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp() as usize;
    let claims = Claims { sub: user_id.to_string(), exp };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token")
}

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

pub fn test_user(username: &str) -> TestUser {
    let id = Uuid::new_v4();
    TestUser { id, username: username.to_string(), token: mint_token(id) }
}

fn directory_for(users: &[&TestUser]) -> StaticUserDirectory {
    let mut map = HashMap::new();
    for user in users {
        map.insert(
            user.id,
            UserProfile {
                username: user.username.clone(),
                first_name: user.username.clone(),
                last_name: "Test".to_string(),
                avatar: String::new(),
            },
        );
    }
    StaticUserDirectory::new(map)
}

/// Spawns the app on an ephemeral port with a fresh in-memory store and a JWT
/// resolver knowing the given users. Returns the base url, the server handle
/// and the store for direct assertions.
pub async fn spawn_app(users: &[&TestUser]) -> anyhow::Result<(String, tokio::task::JoinHandle<()>, DynStoryStore)> {
    let store = InMemoryStoryStore::shared();
    let resolver = JwtPrincipalResolver::shared(JWT_SECRET, Arc::new(directory_for(users)));
    let stories_plugin = StoriesPlugin::new(store.clone(), resolver);
    let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(HealthPlugin), Box::new(stories_plugin)];

    let app = build_app(&plugins, None).await;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{}", addr), server_handle, store))
}
