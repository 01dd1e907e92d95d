//! Test data builders
//!
//! Helper functions for seeding users, events and bookings through the
//! same repositories production code uses.

use chrono::{NaiveDate, NaiveTime};
use fake::faker::name::en::Name;
use fake::Fake;
use uuid::Uuid;
use GatherNest::database::DatabaseService;
use GatherNest::models::booking::Booking;
use GatherNest::models::event::{CreateEventRequest, Event, EventCategory, EventStatus};
use GatherNest::models::user::{CreateUserRequest, UpdateUserRequest, User, UserType};
use GatherNest::services::auth::AuthContext;

/// Create a user with a unique email
pub async fn create_test_user(db: &DatabaseService) -> User {
    let name: String = Name().fake();
    db.users
        .create(CreateUserRequest {
            email: format!("user-{}@example.com", Uuid::new_v4()),
            name: Some(name),
            avatar_url: None,
            user_type: None,
        })
        .await
        .expect("Failed to create test user")
}

/// Create an ADMIN user
pub async fn create_admin_user(db: &DatabaseService) -> User {
    let user = create_test_user(db).await;
    db.users
        .update(
            user.id,
            UpdateUserRequest {
                user_type: Some(UserType::Admin),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to promote test admin")
}

/// Caller identity for a seeded user
pub fn auth_context(user: &User) -> AuthContext {
    AuthContext {
        user_id: user.id,
        user_type: user.user_type,
    }
}

/// A reasonable event creation request
pub fn event_request(seats: i32) -> CreateEventRequest {
    CreateEventRequest {
        name: "Board Games Evening".to_string(),
        description: "Bring your favorite game and meet the neighbors.".to_string(),
        category: EventCategory::GamesNight,
        event_date: NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
        event_time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
        location: "Community Hall".to_string(),
        address: Some("12 Elm Street".to_string()),
        maps_link: None,
        seats,
        host_name: Some("Sam".to_string()),
        host_whatsapp: Some("+1 555 010 4477".to_string()),
        image_url: None,
    }
}

/// Create an event owned by `host`, still in `created` status
pub async fn create_test_event(db: &DatabaseService, host: &User, seats: i32) -> Event {
    let mut tx = db.pool.begin().await.expect("Failed to begin transaction");
    let event = db
        .events
        .create(&mut tx, host.id, event_request(seats))
        .await
        .expect("Failed to create test event");
    tx.commit().await.expect("Failed to commit test event");
    event
}

/// Create an event and move it straight to `approved`
pub async fn create_approved_event(db: &DatabaseService, host: &User, seats: i32) -> Event {
    let event = create_test_event(db, host, seats).await;
    db.events
        .set_status(event.id, EventStatus::Approved)
        .await
        .expect("Failed to approve test event")
}

/// Place a PENDING booking directly through the repository
pub async fn create_test_booking(
    db: &DatabaseService,
    event: &Event,
    user: &User,
    number_of_people: i32,
) -> Booking {
    db.bookings
        .create(event.id, user.id, number_of_people)
        .await
        .expect("Failed to create test booking")
}
