use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::{AvailableSlot, BookedInterval, DoctorError, Schedule, ScheduleWindow};

/// Map a calendar date to the schedule weekday convention
/// (0 = Sunday, 1 = Monday, etc.).
pub fn weekday_index(date: NaiveDate) -> i32 {
    match date.weekday() {
        Weekday::Sun => 0,
        Weekday::Mon => 1,
        Weekday::Tue => 2,
        Weekday::Wed => 3,
        Weekday::Thu => 4,
        Weekday::Fri => 5,
        Weekday::Sat => 6,
    }
}

fn minutes_from_midnight(time: NaiveTime) -> i32 {
    (time.num_seconds_from_midnight() / 60) as i32
}

fn time_from_minutes(minutes: i32) -> NaiveTime {
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0).unwrap()
}

/// Generate the ordered bookable slots for one schedule window.
///
/// Slots start at the window's start time, step by the slot duration, and
/// stop once a slot's end would pass the window's end. A slot is dropped
/// when its start falls inside a booked [start, end) interval. The result
/// is recomputed per call; nothing is retained between calls.
pub fn generate_slots(window: &ScheduleWindow, booked: &[BookedInterval]) -> Vec<AvailableSlot> {
    let duration = window.slot_duration_minutes;
    if duration <= 0 {
        return Vec::new();
    }

    let end = minutes_from_midnight(window.end_time);
    let mut current = minutes_from_midnight(window.start_time);
    let mut slots = Vec::new();

    while current + duration <= end {
        let slot_end = current + duration;

        let occupied = booked.iter().any(|interval| {
            let booked_start = minutes_from_midnight(interval.start_time);
            let booked_end = minutes_from_midnight(interval.end_time);
            current >= booked_start && current < booked_end
        });

        if !occupied {
            slots.push(AvailableSlot {
                start_time: time_from_minutes(current),
                end_time: time_from_minutes(slot_end),
            });
        }

        current = slot_end;
    }

    slots
}

pub struct AvailabilityService {
    pool: PgPool,
}

impl AvailabilityService {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Compute the free slots for a doctor on a specific date. Surfaces
    /// `NoScheduleForDay` when the doctor has no window on that weekday;
    /// the generator is never invoked in that case.
    pub async fn available_slots_for_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AvailableSlot>, DoctorError> {
        let day = weekday_index(date);
        debug!(
            "Calculating available slots for doctor {} on {} (day {})",
            doctor_id, date, day
        );

        let schedule: Option<Schedule> = sqlx::query_as(
            "SELECT * FROM schedules WHERE doctor_id = $1 AND day_of_week = $2",
        )
        .bind(doctor_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let schedule = schedule.ok_or(DoctorError::NoScheduleForDay)?;

        let booked: Vec<BookedInterval> = sqlx::query_as(
            "SELECT start_time, end_time FROM appointments \
             WHERE doctor_id = $1 AND appointment_date = $2 AND status <> 'cancelled' \
             ORDER BY start_time",
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        let slots = generate_slots(&schedule.window(), &booked);
        debug!("Found {} available slots", slots.len());

        Ok(slots)
    }
}
