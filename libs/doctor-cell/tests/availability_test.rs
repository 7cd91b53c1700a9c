use chrono::{NaiveDate, NaiveTime};

use doctor_cell::models::{AvailableSlot, BookedInterval, ScheduleWindow};
use doctor_cell::services::availability::{generate_slots, weekday_index};

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn window(start: NaiveTime, end: NaiveTime, duration: i32) -> ScheduleWindow {
    ScheduleWindow {
        start_time: start,
        end_time: end,
        slot_duration_minutes: duration,
    }
}

fn booked(start: NaiveTime, end: NaiveTime) -> BookedInterval {
    BookedInterval {
        start_time: start,
        end_time: end,
    }
}

#[test]
fn monday_morning_window_yields_eight_slots() {
    let slots = generate_slots(&window(t(8, 0), t(12, 0), 30), &[]);

    assert_eq!(slots.len(), 8);
    assert_eq!(
        slots[0],
        AvailableSlot {
            start_time: t(8, 0),
            end_time: t(8, 30)
        }
    );
    assert_eq!(
        slots[7],
        AvailableSlot {
            start_time: t(11, 30),
            end_time: t(12, 0)
        }
    );
}

#[test]
fn booked_interval_excludes_its_slot() {
    let slots = generate_slots(&window(t(8, 0), t(12, 0), 30), &[booked(t(9, 0), t(9, 30))]);

    assert_eq!(slots.len(), 7);
    assert!(slots.iter().all(|slot| slot.start_time != t(9, 0)));
}

#[test]
fn booked_interval_spanning_two_slots_excludes_both() {
    let slots = generate_slots(&window(t(8, 0), t(12, 0), 30), &[booked(t(9, 0), t(10, 0))]);

    assert_eq!(slots.len(), 6);
    assert!(slots.iter().all(|slot| slot.start_time != t(9, 0)));
    assert!(slots.iter().all(|slot| slot.start_time != t(9, 30)));
}

#[test]
fn slots_never_leave_the_window() {
    // 8:00-9:15 with 30-minute slots: the 9:00-9:30 tail would overrun
    let slots = generate_slots(&window(t(8, 0), t(9, 15), 30), &[]);

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].end_time, t(9, 0));
}

#[test]
fn duration_longer_than_window_yields_nothing() {
    let slots = generate_slots(&window(t(8, 0), t(8, 30), 45), &[]);

    assert!(slots.is_empty());
}

#[test]
fn fully_booked_window_yields_nothing() {
    let slots = generate_slots(&window(t(8, 0), t(9, 0), 30), &[booked(t(8, 0), t(9, 0))]);

    assert!(slots.is_empty());
}

#[test]
fn generation_is_stateless_across_calls() {
    let w = window(t(8, 0), t(12, 0), 30);
    let b = vec![booked(t(10, 0), t(10, 30))];

    let first = generate_slots(&w, &b);
    let second = generate_slots(&w, &b);

    assert_eq!(first, second);
}

#[test]
fn slot_count_matches_window_arithmetic() {
    // floor((end - start) / duration) slots when nothing is booked
    let slots = generate_slots(&window(t(9, 0), t(17, 0), 45), &[]);

    assert_eq!(slots.len(), (8 * 60) / 45);
}

#[test]
fn weekday_index_is_zero_based_on_sunday() {
    assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()), 0); // Sunday
    assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()), 1); // Monday
    assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap()), 6); // Saturday
}
