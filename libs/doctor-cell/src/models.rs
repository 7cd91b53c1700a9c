use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: String,
    pub phone_number: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub full_name: String,
    pub specialty: String,
    pub phone_number: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDoctorRequest {
    pub full_name: String,
    pub specialty: String,
    pub phone_number: String,
    pub description: String,
}

/// A doctor's recurring availability window for one day of the week.
/// At most one row exists per (doctor_id, day_of_week).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Schedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    pub fn window(&self) -> ScheduleWindow {
        ScheduleWindow {
            start_time: self.start_time,
            end_time: self.end_time,
            slot_duration_minutes: self.slot_duration_minutes,
        }
    }
}

/// The slice of a schedule the slot generator works on.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
}

/// A booked [start, end) interval loaded from the appointments relation.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct BookedInterval {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleRequest {
    pub doctor_id: Uuid,
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateScheduleRequest {
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_duration_minutes: i32,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Schedule not found")]
    ScheduleNotFound,

    #[error("No schedule for the requested day")]
    NoScheduleForDay,

    #[error("Schedule already exists for the given doctor and day")]
    ScheduleExists,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
