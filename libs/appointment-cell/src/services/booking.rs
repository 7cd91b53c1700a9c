use chrono::NaiveTime;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::services::availability::weekday_index;
use shared_database::is_unique_violation;

use crate::models::{
    Appointment, AppointmentError, AppointmentRow, AppointmentStatus, BookAppointmentRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct BookingService {
    pool: PgPool,
    lifecycle_service: AppointmentLifecycleService,
}

impl BookingService {
    pub fn new(pool: &PgPool) -> Self {
        Self {
            pool: pool.clone(),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Validate and persist a new appointment.
    ///
    /// The whole check-then-insert sequence runs in one transaction that
    /// first row-locks the doctor's schedule window for the requested
    /// weekday, serialising concurrent bookings per (doctor, date). The
    /// partial unique index on (doctor_id, appointment_date, start_time)
    /// backstops the conflict check.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for user {} with doctor {} on {}",
            request.user_id, request.doctor_id, request.appointment_date
        );

        if request.start_time >= request.end_time {
            return Err(AppointmentError::ValidationError(
                "Start time must be before end time".to_string(),
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        // Step 1: lock the schedule window for this weekday. Concurrent
        // booking attempts for the same doctor/date queue up here.
        let day = weekday_index(request.appointment_date);
        let window: Option<(NaiveTime, NaiveTime)> = sqlx::query_as(
            "SELECT start_time, end_time FROM schedules \
             WHERE doctor_id = $1 AND day_of_week = $2 \
             FOR UPDATE",
        )
        .bind(request.doctor_id)
        .bind(day)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        // Step 2: one active appointment per user/doctor/date
        let duplicate: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM appointments \
             WHERE user_id = $1 AND doctor_id = $2 AND appointment_date = $3 \
               AND status <> 'cancelled' \
             LIMIT 1",
        )
        .bind(request.user_id)
        .bind(request.doctor_id)
        .bind(request.appointment_date)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if duplicate.is_some() {
            warn!(
                "User {} already has an active appointment with doctor {} on {}",
                request.user_id, request.doctor_id, request.appointment_date
            );
            return Err(AppointmentError::DuplicateBooking);
        }

        // Step 3: the requested interval must lie within the locked window
        let Some((window_start, window_end)) = window else {
            return Err(AppointmentError::OutsideSchedule);
        };

        if window_start > request.start_time || window_end < request.end_time {
            return Err(AppointmentError::OutsideSchedule);
        }

        // Step 4: no active appointment may overlap the requested interval
        let conflict: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM appointments \
             WHERE doctor_id = $1 AND appointment_date = $2 \
               AND status <> 'cancelled' \
               AND start_time < $3 AND end_time > $4 \
             LIMIT 1",
        )
        .bind(request.doctor_id)
        .bind(request.appointment_date)
        .bind(request.end_time)
        .bind(request.start_time)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if conflict.is_some() {
            warn!(
                "Slot conflict for doctor {} on {} at {}",
                request.doctor_id, request.appointment_date, request.start_time
            );
            return Err(AppointmentError::SlotConflict);
        }

        // Step 5: insert and commit
        let row: AppointmentRow = sqlx::query_as(
            "INSERT INTO appointments \
                 (user_id, doctor_id, appointment_date, start_time, end_time, reason, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(request.user_id)
        .bind(request.doctor_id)
        .bind(request.appointment_date)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(&request.reason)
        .bind(AppointmentStatus::Scheduled.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppointmentError::SlotConflict
            } else {
                AppointmentError::DatabaseError(e.to_string())
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} booked successfully", row.id);
        row.into_appointment()
    }

    /// Cancel an appointment via the status transition table.
    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment: {}", appointment_id);

        let current = self.get_appointment(appointment_id).await?;

        self.lifecycle_service
            .validate_status_transition(&current.status, &AppointmentStatus::Cancelled)?;

        let row: Option<AppointmentRow> = sqlx::query_as(
            "UPDATE appointments SET status = $1, updated_at = now() \
             WHERE id = $2 \
             RETURNING *",
        )
        .bind(AppointmentStatus::Cancelled.as_str())
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = row.ok_or(AppointmentError::NotFound)?;

        info!("Appointment {} cancelled", appointment_id);
        row.into_appointment()
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        let row: Option<AppointmentRow> =
            sqlx::query_as("SELECT * FROM appointments WHERE id = $1")
                .bind(appointment_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        row.ok_or(AppointmentError::NotFound)?.into_appointment()
    }

    pub async fn appointments_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(
            "SELECT * FROM appointments WHERE user_id = $1 \
             ORDER BY appointment_date, start_time",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(AppointmentRow::into_appointment).collect()
    }

    pub async fn appointments_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let doctor: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if doctor.is_none() {
            return Err(AppointmentError::DoctorNotFound);
        }

        let rows: Vec<AppointmentRow> = sqlx::query_as(
            "SELECT * FROM appointments WHERE doctor_id = $1 \
             ORDER BY appointment_date, start_time",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(AppointmentRow::into_appointment).collect()
    }

    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        debug!("Deleting appointment: {}", appointment_id);

        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(appointment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }
}
