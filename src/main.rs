mod client;
mod http_error;
mod kernel;
mod playback;
mod plugins;

use axum::Router;
use dotenvy::dotenv;
use kernel::{build_app, Plugin};
use plugins::auth::{JwtPrincipalResolver, StaticUserDirectory, UserProfile};
use plugins::health::HealthPlugin;
use plugins::metrics::MetricsPlugin;
use plugins::stories::store::InMemoryStoryStore;
use plugins::stories::StoriesPlugin;
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

/// Demo user directory standing in for an external user service.
fn demo_directory() -> StaticUserDirectory {
    let mut users = HashMap::new();
    users.insert(
        Uuid::parse_str("00000000-0000-0000-0000-000000000001").expect("demo uuid"),
        UserProfile {
            username: "johndoe".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            avatar: String::new(),
        },
    );
    StaticUserDirectory::new(users)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "secret".to_string());

    let store = InMemoryStoryStore::shared();
    let resolver = JwtPrincipalResolver::shared(jwt_secret, Arc::new(demo_directory()));

    let stories_plugin = StoriesPlugin::new(store, resolver);
    let metrics_plugin = MetricsPlugin::new();
    let plugins_vec: Vec<Box<dyn Plugin>> =
        vec![Box::new(HealthPlugin), Box::new(stories_plugin)];

    let plugin_names: Vec<&'static str> = plugins_vec.iter().map(|p| p.name()).collect();
    tracing::info!("mounting plugins: {:?}", plugin_names);

    let mut app: Router = build_app(&plugins_vec, Some(metrics_plugin.clone())).await;

    // expose metrics at /metrics (not instrumented to avoid double-counting)
    app = app.nest("/metrics", metrics_plugin.router());

    let port: u16 = env::var("PORT").ok().and_then(|s| s.parse().ok()).unwrap_or(5000);
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            for p in plugins_vec.iter() {
                p.on_shutdown().await;
            }
        })
        .await?;

    Ok(())
}
