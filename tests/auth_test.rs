//! Sign-in and identity resolution integration tests
//!
//! Google's tokeninfo endpoint is mocked with wiremock; Redis is left
//! unreachable on purpose to exercise the cache-degraded path.

mod helpers;

use assert_matches::assert_matches;
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use GatherNest::config::Settings;
use GatherNest::models::user::UserType;
use GatherNest::services::{AuthService, RedisService};
use GatherNest::utils::errors::AppError;
use helpers::TestDatabase;

const CLIENT_ID: &str = "gathernest-test.apps.googleusercontent.com";

fn test_settings(tokeninfo_url: String) -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
    settings.auth.google_client_id = CLIENT_ID.to_string();
    settings.auth.google_tokeninfo_url = tokeninfo_url;
    settings.auth.admin_emails = vec!["moderator@example.com".to_string()];
    // Nothing listens here; user lookups must fall back to the database.
    settings.redis.url = "redis://127.0.0.1:6399".to_string();
    settings
}

fn auth_service(db: &TestDatabase, settings: Settings) -> AuthService {
    let redis = RedisService::new(settings.clone()).unwrap();
    AuthService::new(db.service().users, redis, settings).unwrap()
}

async fn mock_tokeninfo(server: &MockServer, id_token: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .and(query_param("id_token", id_token))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
#[serial]
async fn test_sign_in_creates_user_and_token_round_trips() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let server = MockServer::start().await;
    let service = auth_service(&db, test_settings(format!("{}/tokeninfo", server.uri())));

    mock_tokeninfo(
        &server,
        "valid-token",
        json!({
            "aud": CLIENT_ID,
            "email": "casey@example.com",
            "email_verified": "true",
            "name": "Casey",
            "picture": "https://example.com/casey.png",
        }),
    )
    .await;

    let (user, token) = service.sign_in_with_google("valid-token").await.unwrap();
    assert_eq!(user.email, "casey@example.com");
    assert_eq!(user.user_type, UserType::User);

    // The issued bearer token resolves back to the same identity.
    let context = service.authenticate(&token).await.unwrap();
    assert_eq!(context.user_id, user.id);
    assert_eq!(context.user_type, UserType::User);

    // A second sign-in reuses the row.
    let (again, _) = service.sign_in_with_google("valid-token").await.unwrap();
    assert_eq!(again.id, user.id);
}

#[tokio::test]
#[serial]
async fn test_admin_emails_are_promoted() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let server = MockServer::start().await;
    let service = auth_service(&db, test_settings(format!("{}/tokeninfo", server.uri())));

    mock_tokeninfo(
        &server,
        "admin-token",
        json!({
            "aud": CLIENT_ID,
            "email": "moderator@example.com",
            "email_verified": "true",
        }),
    )
    .await;

    let (user, _) = service.sign_in_with_google("admin-token").await.unwrap();
    assert_eq!(user.user_type, UserType::Admin);
}

#[tokio::test]
#[serial]
async fn test_foreign_audience_is_rejected() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let server = MockServer::start().await;
    let service = auth_service(&db, test_settings(format!("{}/tokeninfo", server.uri())));

    mock_tokeninfo(
        &server,
        "foreign-token",
        json!({
            "aud": "someone-else.apps.googleusercontent.com",
            "email": "casey@example.com",
            "email_verified": "true",
        }),
    )
    .await;

    let err = service.sign_in_with_google("foreign-token").await.unwrap_err();
    assert_matches!(err, AppError::Unauthenticated);
    assert_eq!(db.service().users.count().await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_unverified_email_is_rejected() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let server = MockServer::start().await;
    let service = auth_service(&db, test_settings(format!("{}/tokeninfo", server.uri())));

    mock_tokeninfo(
        &server,
        "unverified-token",
        json!({
            "aud": CLIENT_ID,
            "email": "casey@example.com",
            "email_verified": "false",
        }),
    )
    .await;

    let err = service
        .sign_in_with_google("unverified-token")
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Unauthenticated);
}

#[tokio::test]
#[serial]
async fn test_provider_rejection_becomes_unauthenticated() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let server = MockServer::start().await;
    let service = auth_service(&db, test_settings(format!("{}/tokeninfo", server.uri())));

    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_token"
        })))
        .mount(&server)
        .await;

    let err = service.sign_in_with_google("expired-token").await.unwrap_err();
    assert_matches!(err, AppError::Unauthenticated);
}

#[tokio::test]
#[serial]
async fn test_garbage_bearer_tokens_are_rejected() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let server = MockServer::start().await;
    let service = auth_service(&db, test_settings(format!("{}/tokeninfo", server.uri())));

    let err = service.authenticate("not-a-jwt").await.unwrap_err();
    assert_matches!(err, AppError::Unauthenticated);
}
