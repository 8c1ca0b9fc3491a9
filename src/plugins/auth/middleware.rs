use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use crate::http_error::AppError;
use crate::plugins::auth::principal::DynPrincipalResolver;

pub async fn require_principal(
    Extension(resolver): Extension<DynPrincipalResolver>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_hdr = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("missing authorization", "missing_token"))?;
    if !auth_hdr.starts_with("Bearer ") {
        return Err(AppError::unauthorized("invalid authorization header", "invalid_token"));
    }
    let token = &auth_hdr[7..];
    let principal = resolver.resolve(token).await?;
    // insert into extensions for handlers to use
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
