//! Booking-engine tests against a live Postgres instance.
//!
//! Gated behind LIVE_INTEGRATION_TESTS=true with DATABASE_URL pointing at a
//! disposable database; every test is a no-op otherwise.

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, AppointmentStatus, BookAppointmentRequest};
use appointment_cell::services::booking::BookingService;
use doctor_cell::services::availability::AvailabilityService;

fn should_run_live_tests() -> bool {
    std::env::var("LIVE_INTEGRATION_TESTS").unwrap_or_default() == "true"
}

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when LIVE_INTEGRATION_TESTS=true");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to live test database");

    shared_database::run_schema(&pool).await.expect("apply schema");
    pool
}

/// Insert a doctor with an 08:00-16:00 window of 30-minute slots on every
/// weekday, so tests are independent of the calendar.
async fn seed_doctor(pool: &PgPool) -> Uuid {
    let (doctor_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO doctors (full_name, specialty, phone_number, description) \
         VALUES ('Dr. Live Test', 'general', '555-0100', 'live test doctor') \
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("insert doctor");

    for day in 0..7 {
        sqlx::query(
            "INSERT INTO schedules \
                 (doctor_id, day_of_week, start_time, end_time, slot_duration_minutes) \
             VALUES ($1, $2, '08:00:00', '16:00:00', 30)",
        )
        .bind(doctor_id)
        .bind(day)
        .execute(pool)
        .await
        .expect("insert schedule");
    }

    doctor_id
}

fn request(
    user_id: Uuid,
    doctor_id: Uuid,
    date: NaiveDate,
    start: (u32, u32),
    end: (u32, u32),
) -> BookAppointmentRequest {
    BookAppointmentRequest {
        user_id,
        doctor_id,
        appointment_date: date,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        reason: "live test".to_string(),
    }
}

#[tokio::test]
async fn booking_enforces_all_three_invariants() {
    if !should_run_live_tests() {
        return;
    }

    let pool = test_pool().await;
    let service = BookingService::new(&pool);
    let doctor_id = seed_doctor(&pool).await;
    let date = NaiveDate::from_ymd_opt(2031, 3, 3).unwrap();

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // First booking succeeds
    let appointment = service
        .book_appointment(request(alice, doctor_id, date, (9, 0), (9, 30)))
        .await
        .expect("first booking succeeds");
    assert_eq!(appointment.status, AppointmentStatus::Scheduled);

    // Same user, same doctor, same date: duplicate
    let result = service
        .book_appointment(request(alice, doctor_id, date, (10, 0), (10, 30)))
        .await;
    assert_matches!(result, Err(AppointmentError::DuplicateBooking));

    // Another user, exact same slot: conflict
    let result = service
        .book_appointment(request(bob, doctor_id, date, (9, 0), (9, 30)))
        .await;
    assert_matches!(result, Err(AppointmentError::SlotConflict));

    // Another user, overlapping interval: still a conflict
    let result = service
        .book_appointment(request(bob, doctor_id, date, (9, 15), (9, 45)))
        .await;
    assert_matches!(result, Err(AppointmentError::SlotConflict));

    // Outside the schedule window
    let result = service
        .book_appointment(request(bob, doctor_id, date, (7, 0), (7, 30)))
        .await;
    assert_matches!(result, Err(AppointmentError::OutsideSchedule));
}

#[tokio::test]
async fn cancelling_frees_the_slot_and_the_user() {
    if !should_run_live_tests() {
        return;
    }

    let pool = test_pool().await;
    let service = BookingService::new(&pool);
    let doctor_id = seed_doctor(&pool).await;
    let date = NaiveDate::from_ymd_opt(2031, 3, 4).unwrap();

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let appointment = service
        .book_appointment(request(alice, doctor_id, date, (11, 0), (11, 30)))
        .await
        .expect("booking succeeds");

    let cancelled = service
        .cancel_appointment(appointment.id)
        .await
        .expect("cancel succeeds");
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    // Cancelled appointments no longer block the slot
    service
        .book_appointment(request(bob, doctor_id, date, (11, 0), (11, 30)))
        .await
        .expect("slot reusable after cancellation");

    // Nor do they count as the user's active appointment
    service
        .book_appointment(request(alice, doctor_id, date, (12, 0), (12, 30)))
        .await
        .expect("user can rebook after cancellation");

    // A second cancellation is an invalid transition
    let result = service.cancel_appointment(cancelled.id).await;
    assert_matches!(result, Err(AppointmentError::InvalidStatusTransition(_)));
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_have_a_single_winner() {
    if !should_run_live_tests() {
        return;
    }

    let pool = test_pool().await;
    let doctor_id = seed_doctor(&pool).await;
    let date = NaiveDate::from_ymd_opt(2031, 3, 5).unwrap();

    let first = BookingService::new(&pool);
    let second = BookingService::new(&pool);

    let (a, b) = tokio::join!(
        first.book_appointment(request(Uuid::new_v4(), doctor_id, date, (14, 0), (14, 30))),
        second.book_appointment(request(Uuid::new_v4(), doctor_id, date, (14, 0), (14, 30))),
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one concurrent booking must win");

    let loser = if a.is_ok() { b } else { a };
    assert_matches!(loser, Err(AppointmentError::SlotConflict));
}

#[tokio::test]
async fn available_slots_shrink_as_bookings_land() {
    if !should_run_live_tests() {
        return;
    }

    let pool = test_pool().await;
    let booking = BookingService::new(&pool);
    let availability = AvailabilityService::new(&pool);
    let doctor_id = seed_doctor(&pool).await;
    let date = NaiveDate::from_ymd_opt(2031, 3, 6).unwrap();

    let before = availability
        .available_slots_for_date(doctor_id, date)
        .await
        .expect("slots before booking");
    assert_eq!(before.len(), 16); // 08:00-16:00 in 30-minute steps

    booking
        .book_appointment(request(Uuid::new_v4(), doctor_id, date, (9, 0), (9, 30)))
        .await
        .expect("booking succeeds");

    let after = availability
        .available_slots_for_date(doctor_id, date)
        .await
        .expect("slots after booking");

    assert_eq!(after.len(), 15);
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    assert!(after.iter().all(|slot| slot.start_time != nine));
}
