//! User repository implementation

use crate::models::user::{CreateUserRequest, UpdateUserRequest, User, UserType};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, avatar_url, user_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, name, avatar_url, user_type, created_at, updated_at
            "#,
        )
        .bind(request.email)
        .bind(request.name)
        .bind(request.avatar_url)
        .bind(request.user_type.unwrap_or(UserType::User))
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, avatar_url, user_type, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, avatar_url, user_type, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user on first sign-in, or refresh the profile fields on a
    /// returning one. Never demotes an existing admin.
    pub async fn upsert_by_email(
        &self,
        email: &str,
        name: Option<String>,
        avatar_url: Option<String>,
        user_type: UserType,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, avatar_url, user_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (email) DO UPDATE
            SET name = COALESCE(EXCLUDED.name, users.name),
                avatar_url = COALESCE(EXCLUDED.avatar_url, users.avatar_url),
                user_type = CASE
                    WHEN users.user_type = 'ADMIN' THEN users.user_type
                    ELSE EXCLUDED.user_type
                END,
                updated_at = EXCLUDED.updated_at
            RETURNING id, email, name, avatar_url, user_type, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(avatar_url)
        .bind(user_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user profile
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                avatar_url = COALESCE($3, avatar_url),
                user_type = COALESCE($4, user_type),
                updated_at = $5
            WHERE id = $1
            RETURNING id, email, name, avatar_url, user_type, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.name)
        .bind(request.avatar_url)
        .bind(request.user_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
