use assert_matches::assert_matches;

use appointment_cell::models::{AppointmentError, AppointmentStatus};
use appointment_cell::services::lifecycle::AppointmentLifecycleService;

#[test]
fn scheduled_can_only_become_cancelled() {
    let service = AppointmentLifecycleService::new();

    assert_eq!(
        service.get_valid_transitions(&AppointmentStatus::Scheduled),
        vec![AppointmentStatus::Cancelled]
    );

    assert!(service
        .validate_status_transition(&AppointmentStatus::Scheduled, &AppointmentStatus::Cancelled)
        .is_ok());
}

#[test]
fn cancelled_is_terminal() {
    let service = AppointmentLifecycleService::new();

    assert!(service
        .get_valid_transitions(&AppointmentStatus::Cancelled)
        .is_empty());

    let result = service
        .validate_status_transition(&AppointmentStatus::Cancelled, &AppointmentStatus::Scheduled);

    assert_matches!(
        result,
        Err(AppointmentError::InvalidStatusTransition(AppointmentStatus::Cancelled))
    );
}

#[test]
fn re_cancelling_is_rejected() {
    let service = AppointmentLifecycleService::new();

    let result = service
        .validate_status_transition(&AppointmentStatus::Cancelled, &AppointmentStatus::Cancelled);

    assert_matches!(result, Err(AppointmentError::InvalidStatusTransition(_)));
}

#[test]
fn status_round_trips_through_text() {
    assert_eq!(AppointmentStatus::Scheduled.as_str(), "scheduled");
    assert_eq!(
        "cancelled".parse::<AppointmentStatus>().unwrap(),
        AppointmentStatus::Cancelled
    );
    assert!("confirmed".parse::<AppointmentStatus>().is_err());
}
