//! Authentication service implementation
//!
//! This service handles sign-in against the external identity provider
//! (Google ID tokens verified via the tokeninfo endpoint), issuing and
//! verifying the API's own session tokens, and resolving a bearer token to
//! the caller's identity on every request. Authorization everywhere else is
//! a plain id comparison against the `AuthContext` this service produces.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::database::repositories::UserRepository;
use crate::models::user::{User, UserType};
use crate::services::redis::RedisService;
use crate::utils::errors::{AppError, Result};

/// Authenticated caller identity, threaded explicitly through every
/// service operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i64,
    pub user_type: UserType,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    /// Admin gate for moderation operations
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Admin access required".to_string(),
            ))
        }
    }
}

/// Claims carried by an API session token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    email: String,
    iat: i64,
    exp: i64,
}

/// Successful response from Google's tokeninfo endpoint. Google reports
/// `email_verified` as a string.
#[derive(Debug, Deserialize)]
struct GoogleTokenInfo {
    aud: String,
    email: String,
    email_verified: String,
    name: Option<String>,
    picture: Option<String>,
}

/// Authentication service for sign-in and per-request identity resolution
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    redis_service: RedisService,
    http_client: Client,
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(
        user_repository: UserRepository,
        redis_service: RedisService,
        settings: Settings,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("GatherNest/1.0")
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            user_repository,
            redis_service,
            http_client,
            settings,
        })
    }

    /// Exchange a Google ID token for an API session token, creating the
    /// user on first sign-in. Emails on the configured admin list are
    /// promoted to ADMIN here.
    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<(User, String)> {
        let token_info = self.verify_google_token(id_token).await?;

        let user_type = if self
            .settings
            .auth
            .admin_emails
            .iter()
            .any(|email| email.eq_ignore_ascii_case(&token_info.email))
        {
            UserType::Admin
        } else {
            UserType::User
        };

        let user = self
            .user_repository
            .upsert_by_email(
                &token_info.email,
                token_info.name,
                token_info.picture,
                user_type,
            )
            .await?;

        self.cache_user(&user).await;

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, user_type = user.user_type.as_str(), "User signed in");

        Ok((user, token))
    }

    /// Resolve a bearer token to the caller's identity. The user row is
    /// looked up through the Redis cache first; a cache outage degrades to
    /// a database read, never to an auth failure.
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let claims = self.verify_token(token)?;

        let user = match self.load_cached_user(claims.sub).await {
            Some(user) => user,
            None => {
                let user = self
                    .user_repository
                    .find_by_id(claims.sub)
                    .await?
                    .ok_or(AppError::Unauthenticated)?;
                self.cache_user(&user).await;
                user
            }
        };

        Ok(AuthContext {
            user_id: user.id,
            user_type: user.user_type,
        })
    }

    /// Sign an API session token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::minutes(self.settings.auth.token_ttl_minutes))
                .timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify signature and expiry of a session token. Any failure is an
    /// authentication failure, not an internal error.
    fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!(error = %e, "Session token rejected");
            AppError::Unauthenticated
        })?;

        Ok(data.claims)
    }

    /// Verify a Google ID token against the tokeninfo endpoint
    async fn verify_google_token(&self, id_token: &str) -> Result<GoogleTokenInfo> {
        let response = self
            .http_client
            .get(&self.settings.auth.google_tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Identity provider rejected token");
            return Err(AppError::Unauthenticated);
        }

        let token_info: GoogleTokenInfo = response.json().await?;

        if token_info.aud != self.settings.auth.google_client_id {
            warn!(aud = %token_info.aud, "ID token issued for a different client");
            return Err(AppError::Unauthenticated);
        }

        if token_info.email_verified != "true" {
            warn!(email = %token_info.email, "Unverified email in ID token");
            return Err(AppError::Unauthenticated);
        }

        Ok(token_info)
    }

    async fn load_cached_user(&self, user_id: i64) -> Option<User> {
        match self.redis_service.get::<User>(&user_key(user_id)).await {
            Ok(user) => user,
            Err(e) => {
                warn!(user_id = user_id, error = %e, "User cache read failed, falling back to database");
                None
            }
        }
    }

    async fn cache_user(&self, user: &User) {
        if let Err(e) = self.redis_service.set(&user_key(user.id), user, None).await {
            warn!(user_id = user.id, error = %e, "Failed to cache user");
        }
    }

    /// Drop a user from the cache after a role or profile change
    pub async fn invalidate_user(&self, user_id: i64) {
        if let Err(e) = self.redis_service.delete(&user_key(user_id)).await {
            warn!(user_id = user_id, error = %e, "Failed to invalidate cached user");
        }
    }
}

fn user_key(user_id: i64) -> String {
    format!("user:{}", user_id)
}
