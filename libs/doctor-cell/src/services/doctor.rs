use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, UpdateDoctorRequest};

pub struct DoctorService {
    pool: PgPool,
}

impl DoctorService {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor {}", request.full_name);

        validate_doctor_fields(
            &request.full_name,
            &request.specialty,
            &request.phone_number,
            &request.description,
        )?;

        let doctor: Doctor = sqlx::query_as(
            "INSERT INTO doctors (full_name, specialty, phone_number, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&request.full_name)
        .bind(&request.specialty)
        .bind(&request.phone_number)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!("Doctor {} created", doctor.id);
        Ok(doctor)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor {}", doctor_id);

        validate_doctor_fields(
            &request.full_name,
            &request.specialty,
            &request.phone_number,
            &request.description,
        )?;

        let doctor: Option<Doctor> = sqlx::query_as(
            "UPDATE doctors \
             SET full_name = $1, specialty = $2, phone_number = $3, description = $4, \
                 updated_at = now() \
             WHERE id = $5 \
             RETURNING *",
        )
        .bind(&request.full_name)
        .bind(&request.specialty)
        .bind(&request.phone_number)
        .bind(&request.description)
        .bind(doctor_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        doctor.ok_or(DoctorError::NotFound)
    }

    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        debug!("Deleting doctor {}", doctor_id);

        let result = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DoctorError::NotFound);
        }

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        let doctor: Option<Doctor> = sqlx::query_as("SELECT * FROM doctors WHERE id = $1")
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        doctor.ok_or(DoctorError::NotFound)
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        let doctors: Vec<Doctor> = sqlx::query_as("SELECT * FROM doctors ORDER BY full_name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        Ok(doctors)
    }
}

fn validate_doctor_fields(
    full_name: &str,
    specialty: &str,
    phone_number: &str,
    description: &str,
) -> Result<(), DoctorError> {
    if full_name.trim().is_empty()
        || specialty.trim().is_empty()
        || phone_number.trim().is_empty()
        || description.trim().is_empty()
    {
        return Err(DoctorError::ValidationError(
            "All fields are required".to_string(),
        ));
    }

    Ok(())
}
