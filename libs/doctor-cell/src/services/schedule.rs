use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::is_unique_violation;

use crate::models::{CreateScheduleRequest, DoctorError, Schedule, UpdateScheduleRequest};

pub struct ScheduleService {
    pool: PgPool,
}

impl ScheduleService {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create_schedule(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<Schedule, DoctorError> {
        debug!(
            "Creating schedule for doctor {} on day {}",
            request.doctor_id, request.day_of_week
        );

        validate_schedule_fields(
            request.day_of_week,
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
        )?;

        // Check for an existing window on the same weekday before inserting;
        // the unique constraint on (doctor_id, day_of_week) backs this up.
        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM schedules WHERE doctor_id = $1 AND day_of_week = $2",
        )
        .bind(request.doctor_id)
        .bind(request.day_of_week)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(DoctorError::ScheduleExists);
        }

        let schedule: Schedule = sqlx::query_as(
            "INSERT INTO schedules \
                 (doctor_id, day_of_week, start_time, end_time, slot_duration_minutes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(request.doctor_id)
        .bind(request.day_of_week)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.slot_duration_minutes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DoctorError::ScheduleExists
            } else {
                DoctorError::DatabaseError(e.to_string())
            }
        })?;

        info!("Schedule {} created", schedule.id);
        Ok(schedule)
    }

    pub async fn update_schedule(
        &self,
        schedule_id: Uuid,
        request: UpdateScheduleRequest,
    ) -> Result<Schedule, DoctorError> {
        debug!("Updating schedule {}", schedule_id);

        validate_schedule_fields(
            request.day_of_week,
            request.start_time,
            request.end_time,
            request.slot_duration_minutes,
        )?;

        let schedule: Option<Schedule> = sqlx::query_as(
            "UPDATE schedules \
             SET day_of_week = $1, start_time = $2, end_time = $3, \
                 slot_duration_minutes = $4, updated_at = now() \
             WHERE id = $5 \
             RETURNING *",
        )
        .bind(request.day_of_week)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.slot_duration_minutes)
        .bind(schedule_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DoctorError::ScheduleExists
            } else {
                DoctorError::DatabaseError(e.to_string())
            }
        })?;

        schedule.ok_or(DoctorError::ScheduleNotFound)
    }

    pub async fn delete_schedule(&self, schedule_id: Uuid) -> Result<(), DoctorError> {
        debug!("Deleting schedule {}", schedule_id);

        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(schedule_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DoctorError::ScheduleNotFound);
        }

        info!("Schedule {} deleted", schedule_id);
        Ok(())
    }

    pub async fn schedules_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Schedule>, DoctorError> {
        let schedules: Vec<Schedule> = sqlx::query_as(
            "SELECT * FROM schedules WHERE doctor_id = $1 ORDER BY day_of_week, start_time",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        Ok(schedules)
    }
}

fn validate_schedule_fields(
    day_of_week: i32,
    start_time: chrono::NaiveTime,
    end_time: chrono::NaiveTime,
    slot_duration_minutes: i32,
) -> Result<(), DoctorError> {
    if !(0..=6).contains(&day_of_week) {
        return Err(DoctorError::ValidationError(
            "Day of week must be between 0 (Sunday) and 6 (Saturday)".to_string(),
        ));
    }

    if start_time >= end_time {
        return Err(DoctorError::ValidationError(
            "Start time must be before end time".to_string(),
        ));
    }

    if slot_duration_minutes <= 0 {
        return Err(DoctorError::ValidationError(
            "Slot duration must be positive".to_string(),
        ));
    }

    Ok(())
}
