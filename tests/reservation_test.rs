//! Reservation lifecycle integration tests
//!
//! Covers the capacity and uniqueness invariants, the optimistic-create /
//! authoritative-confirm split, ownership enforcement and the concurrent
//! confirmation behavior.

mod helpers;

use assert_matches::assert_matches;
use futures::future::join_all;
use GatherNest::models::booking::{BookingStatus, CreateBookingRequest};
use GatherNest::services::ReservationService;
use GatherNest::utils::errors::AppError;
use helpers::test_data::{
    auth_context, create_approved_event, create_test_booking, create_test_user,
};
use helpers::TestDatabase;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_requests_oversubscribe_but_confirmation_enforces_capacity() {
    // Scenario: seats=2; two requests totalling 3 people are both admitted
    // while pending, and only the first fits at confirmation time.
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user_x = create_test_user(&db.service()).await;
    let user_y = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 2).await;

    let booking_x = service
        .create_booking(
            &auth_context(&user_x),
            CreateBookingRequest { event_id: event.id, number_of_people: 2 },
        )
        .await
        .unwrap();
    let booking_y = service
        .create_booking(
            &auth_context(&user_y),
            CreateBookingRequest { event_id: event.id, number_of_people: 1 },
        )
        .await
        .unwrap();

    assert_eq!(booking_x.status, BookingStatus::Pending);
    assert_eq!(booking_y.status, BookingStatus::Pending);

    let confirmed = service
        .set_booking_status(&auth_context(&host), booking_x.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let err = service
        .set_booking_status(&auth_context(&host), booking_y.id, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::CapacityExceeded { requested: 1, available: 0 });

    assert_eq!(db.service().bookings.confirmed_seats(event.id).await.unwrap(), 2);
}

#[tokio::test]
#[serial]
async fn test_creation_rejected_once_confirmed_seats_are_gone() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user_x = create_test_user(&db.service()).await;
    let user_y = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 2).await;

    let booking = create_test_booking(&db.service(), &event, &user_x, 2).await;
    service
        .set_booking_status(&auth_context(&host), booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();

    let err = service
        .create_booking(
            &auth_context(&user_y),
            CreateBookingRequest { event_id: event.id, number_of_people: 1 },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AppError::CapacityExceeded { .. });
}

#[tokio::test]
#[serial]
async fn test_double_booking_is_a_conflict() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 10).await;

    service
        .create_booking(
            &auth_context(&user),
            CreateBookingRequest { event_id: event.id, number_of_people: 1 },
        )
        .await
        .unwrap();

    let err = service
        .create_booking(
            &auth_context(&user),
            CreateBookingRequest { event_id: event.id, number_of_people: 2 },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AppError::DuplicateBooking { .. });
}

#[tokio::test]
#[serial]
async fn test_cancellation_frees_capacity() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user_x = create_test_user(&db.service()).await;
    let user_y = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 2).await;

    let booking_x = create_test_booking(&db.service(), &event, &user_x, 2).await;
    service
        .set_booking_status(&auth_context(&host), booking_x.id, BookingStatus::Confirmed)
        .await
        .unwrap();

    service
        .set_booking_status(&auth_context(&host), booking_x.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(db.service().bookings.confirmed_seats(event.id).await.unwrap(), 0);

    let booking_y = service
        .create_booking(
            &auth_context(&user_y),
            CreateBookingRequest { event_id: event.id, number_of_people: 2 },
        )
        .await
        .unwrap();
    let confirmed = service
        .set_booking_status(&auth_context(&host), booking_y.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);
}

#[tokio::test]
#[serial]
async fn test_non_host_cannot_change_booking_state() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let stranger = create_test_user(&db.service()).await;
    let user = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 4).await;
    let booking = create_test_booking(&db.service(), &event, &user, 2).await;

    for status in [BookingStatus::Confirmed, BookingStatus::Cancelled] {
        let err = service
            .set_booking_status(&auth_context(&stranger), booking.id, status)
            .await
            .unwrap_err();
        assert_matches!(err, AppError::PermissionDenied(_));
    }

    // The booking's own creator has no authority over its state either.
    let err = service
        .set_booking_status(&auth_context(&user), booking.id, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::PermissionDenied(_));
}

#[tokio::test]
#[serial]
async fn test_reconfirming_does_not_double_count() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 2).await;
    let booking = create_test_booking(&db.service(), &event, &user, 2).await;

    service
        .set_booking_status(&auth_context(&host), booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    // Re-confirming with the full seat pool already used must succeed and
    // leave the total untouched.
    let reconfirmed = service
        .set_booking_status(&auth_context(&host), booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();

    assert_eq!(reconfirmed.status, BookingStatus::Confirmed);
    assert_eq!(db.service().bookings.confirmed_seats(event.id).await.unwrap(), 2);
}

#[tokio::test]
#[serial]
async fn test_cancelled_bookings_stay_cancelled() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 4).await;
    let booking = create_test_booking(&db.service(), &event, &user, 2).await;

    service
        .set_booking_status(&auth_context(&host), booking.id, BookingStatus::Cancelled)
        .await
        .unwrap();

    let err = service
        .set_booking_status(&auth_context(&host), booking.id, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::InvalidStateTransition { .. });
}

#[tokio::test]
#[serial]
async fn test_pending_is_not_a_valid_target_state() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 4).await;
    let booking = create_test_booking(&db.service(), &event, &user, 2).await;

    let err = service
        .set_booking_status(&auth_context(&host), booking.id, BookingStatus::Pending)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::InvalidInput(_));
}

#[tokio::test]
#[serial]
async fn test_booking_validation_errors() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let user = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 4).await;

    let err = service
        .create_booking(
            &auth_context(&user),
            CreateBookingRequest { event_id: event.id, number_of_people: 0 },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AppError::InvalidInput(_));

    let err = service
        .create_booking(
            &auth_context(&user),
            CreateBookingRequest { event_id: event.id + 999, number_of_people: 1 },
        )
        .await
        .unwrap_err();
    assert_matches!(err, AppError::EventNotFound { .. });

    let err = service
        .set_booking_status(&auth_context(&host), 424242, BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::BookingNotFound { .. });
}

#[tokio::test]
#[serial]
async fn test_concurrent_confirmations_never_oversell() {
    // Four pending bookings of 2 seats each against a 5 seat event: any
    // interleaving may confirm exactly two of them.
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 5).await;

    let mut booking_ids = Vec::new();
    for _ in 0..4 {
        let attendee = create_test_user(&db.service()).await;
        let booking = create_test_booking(&db.service(), &event, &attendee, 2).await;
        booking_ids.push(booking.id);
    }

    let host_context = auth_context(&host);
    let results = join_all(booking_ids.iter().map(|&booking_id| {
        let service = service.clone();
        async move {
            service
                .set_booking_status(&host_context, booking_id, BookingStatus::Confirmed)
                .await
        }
    }))
    .await;

    let confirmed = results.iter().filter(|r| r.is_ok()).count();
    let rejected: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();

    assert_eq!(confirmed, 2, "exactly the subset that fits must win");
    assert_eq!(rejected.len(), 2);
    for err in rejected {
        assert_matches!(err, AppError::CapacityExceeded { .. });
    }

    let total = db.service().bookings.confirmed_seats(event.id).await.unwrap();
    assert!(total <= 5, "capacity invariant violated: {} > 5", total);
    assert_eq!(total, 4);
}

#[tokio::test]
#[serial]
async fn test_host_views_and_user_views() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();
    let service = ReservationService::new(db.service());

    let host = create_test_user(&db.service()).await;
    let stranger = create_test_user(&db.service()).await;
    let user = create_test_user(&db.service()).await;
    let event = create_approved_event(&db.service(), &host, 6).await;
    create_test_booking(&db.service(), &event, &user, 2).await;

    // Host sees every booking with requester details.
    let (listed_event, bookings) = service
        .list_event_bookings(&auth_context(&host), event.id)
        .await
        .unwrap();
    assert_eq!(listed_event.id, event.id);
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].user_email, user.email);

    // Nobody else does.
    let err = service
        .list_event_bookings(&auth_context(&stranger), event.id)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::PermissionDenied(_));

    // The requester sees their booking joined with event display fields.
    let mine = service.list_user_bookings(&auth_context(&user)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].event_name, event.name);
    assert_eq!(mine[0].host_whatsapp, event.host_whatsapp);

    // The host dashboard is only served to the host themself.
    let dashboard = service
        .list_host_bookings(&auth_context(&host), host.id)
        .await
        .unwrap();
    assert_eq!(dashboard.len(), 1);

    let err = service
        .list_host_bookings(&auth_context(&stranger), host.id)
        .await
        .unwrap_err();
    assert_matches!(err, AppError::PermissionDenied(_));
}
