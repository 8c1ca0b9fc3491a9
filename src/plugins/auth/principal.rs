use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::http_error::AppError;

/// Resolved caller identity, inserted into request extensions by
/// `require_principal` and extracted by handlers.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub avatar: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("missing authorization", "missing_token"))
    }
}

/// Profile fields attached to a resolved user id.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
}

/// Lookup of profile data for an authenticated user id. Pluggable so a real
/// user service can replace the static demo directory.
pub trait UserDirectory: Send + Sync + 'static {
    fn lookup(&self, id: Uuid) -> Option<UserProfile>;
}

pub type DynUserDirectory = Arc<dyn UserDirectory>;

pub struct StaticUserDirectory {
    users: HashMap<Uuid, UserProfile>,
}

impl StaticUserDirectory {
    pub fn new(users: HashMap<Uuid, UserProfile>) -> Self {
        Self { users }
    }

    pub fn empty() -> Self {
        Self { users: HashMap::new() }
    }
}

impl UserDirectory for StaticUserDirectory {
    fn lookup(&self, id: Uuid) -> Option<UserProfile> {
        self.users.get(&id).cloned()
    }
}

/// Turns a bearer token into a `Principal`. Token issuance belongs to an
/// external collaborator; this capability only verifies and resolves.
#[async_trait]
pub trait PrincipalResolver: Send + Sync + 'static {
    async fn resolve(&self, token: &str) -> Result<Principal, AppError>;
}

pub type DynPrincipalResolver = Arc<dyn PrincipalResolver>;

#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// HS256 JWT resolver: the `sub` claim carries the user id, profile fields
/// come from the directory. Unknown ids still resolve, with a placeholder
/// profile, matching the original's permissive mock lookup.
pub struct JwtPrincipalResolver {
    secret: String,
    directory: DynUserDirectory,
}

impl JwtPrincipalResolver {
    pub fn new(secret: impl Into<String>, directory: DynUserDirectory) -> Self {
        Self { secret: secret.into(), directory }
    }

    pub fn shared(secret: impl Into<String>, directory: DynUserDirectory) -> DynPrincipalResolver {
        Arc::new(Self::new(secret, directory))
    }
}

#[async_trait]
impl PrincipalResolver for JwtPrincipalResolver {
    async fn resolve(&self, token: &str) -> Result<Principal, AppError> {
        let validation = jsonwebtoken::Validation::default();
        let token_data = jsonwebtoken::decode::<Claims>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::unauthorized("invalid token", "invalid_token"))?;
        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::unauthorized("invalid token subject", "invalid_token"))?;

        let profile = self.directory.lookup(user_id).unwrap_or(UserProfile {
            username: format!("user-{}", &user_id.to_string()[..8]),
            first_name: String::new(),
            last_name: String::new(),
            avatar: String::new(),
        });

        Ok(Principal {
            id: user_id,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            avatar: profile.avatar,
        })
    }
}
