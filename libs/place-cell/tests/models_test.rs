use place_cell::models::PlaceStatus;

#[test]
fn parent_submissions_enter_moderation() {
    assert_eq!(PlaceStatus::initial_for_role(Some("parent")), PlaceStatus::Pending);
}

#[test]
fn other_roles_bypass_moderation() {
    assert_eq!(PlaceStatus::initial_for_role(Some("admin")), PlaceStatus::Approved);
    assert_eq!(PlaceStatus::initial_for_role(Some("doctor")), PlaceStatus::Approved);
    assert_eq!(PlaceStatus::initial_for_role(None), PlaceStatus::Approved);
}

#[test]
fn only_pending_can_become_approved() {
    assert!(PlaceStatus::Pending.can_transition_to(&PlaceStatus::Approved));

    // No transition is defined out of approved
    assert!(!PlaceStatus::Approved.can_transition_to(&PlaceStatus::Approved));
    assert!(!PlaceStatus::Approved.can_transition_to(&PlaceStatus::Pending));
    assert!(!PlaceStatus::Pending.can_transition_to(&PlaceStatus::Pending));
}

#[test]
fn status_round_trips_through_text() {
    assert_eq!(PlaceStatus::Pending.as_str(), "pending");
    assert_eq!("approved".parse::<PlaceStatus>().unwrap(), PlaceStatus::Approved);
    assert!("rejected".parse::<PlaceStatus>().is_err());
}
