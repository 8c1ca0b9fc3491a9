use async_trait::async_trait;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::plugins::metrics::MetricsPlugin;

#[async_trait]
pub trait Plugin: Send + Sync {
    async fn router(&self) -> Router;

    fn name(&self) -> &'static str;
    /// Optional lifecycle hook called when the kernel starts.
    async fn on_start(&self) {}
    /// Optional lifecycle hook called on shutdown.
    async fn on_shutdown(&self) {}
}

/// Builds the application router by mounting each plugin under `/{plugin.name()}`.
/// When a metrics plugin is supplied, every mounted route is instrumented with
/// the request counter and latency histogram.
pub async fn build_app(plugins: &Vec<Box<dyn Plugin>>, metrics: Option<MetricsPlugin>) -> Router {
    let mut app = Router::new();

    for plugin in plugins.iter() {
        info!("starting plugin {}", plugin.name());
        plugin.on_start().await;
        let router = plugin.router().await;
        // mount plugin under its name to namespace routes
        app = app.nest(&format!("/{}", plugin.name()), router);
    }

    if let Some(m) = metrics {
        app = app.layer(middleware::from_fn(move |req: Request, next: Next| {
            let m = m.clone();
            async move {
                let method = req.method().to_string();
                let path = req.uri().path().to_string();
                let start = Instant::now();
                let resp: Response = next.run(req).await;
                let status = resp.status().as_u16().to_string();
                m.request_counter
                    .with_label_values(&[&method, &path, &status])
                    .inc();
                m.request_duration
                    .with_label_values(&[&method, &path])
                    .observe(start.elapsed().as_secs_f64());
                resp
            }
        }));
    }

    // permissive CORS for local dev
    app.layer(CorsLayer::permissive())
}
