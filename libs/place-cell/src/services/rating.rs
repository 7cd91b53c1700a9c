use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::is_unique_violation;

use crate::models::{PlaceError, Rating};

pub struct RatingService {
    pool: PgPool,
}

impl RatingService {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    /// Record a user's rating for a place. One rating per (place, user);
    /// the primary key backs the pre-insert check.
    pub async fn create_rating(
        &self,
        place_id: Uuid,
        user_id: Uuid,
        rating_value: i32,
    ) -> Result<Rating, PlaceError> {
        debug!("Creating rating for place {} by user {}", place_id, user_id);

        validate_rating_value(rating_value)?;
        self.ensure_place_exists(place_id).await?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT place_id FROM ratings WHERE place_id = $1 AND user_id = $2",
        )
        .bind(place_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        if existing.is_some() {
            return Err(PlaceError::DuplicateRating);
        }

        let rating: Rating = sqlx::query_as(
            "INSERT INTO ratings (place_id, user_id, rating_value) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(place_id)
        .bind(user_id)
        .bind(rating_value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PlaceError::DuplicateRating
            } else {
                PlaceError::DatabaseError(e.to_string())
            }
        })?;

        info!("Rating recorded for place {} by user {}", place_id, user_id);
        Ok(rating)
    }

    /// Overwrite an existing rating; never creates one implicitly.
    pub async fn update_rating(
        &self,
        place_id: Uuid,
        user_id: Uuid,
        rating_value: i32,
    ) -> Result<Rating, PlaceError> {
        debug!("Updating rating for place {} by user {}", place_id, user_id);

        validate_rating_value(rating_value)?;

        let rating: Option<Rating> = sqlx::query_as(
            "UPDATE ratings SET rating_value = $1, updated_at = now() \
             WHERE place_id = $2 AND user_id = $3 \
             RETURNING *",
        )
        .bind(rating_value)
        .bind(place_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        rating.ok_or(PlaceError::RatingNotFound)
    }

    /// Arithmetic mean of a place's ratings, or None when it has none.
    pub async fn average_rating(&self, place_id: Uuid) -> Result<Option<f64>, PlaceError> {
        let average: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(rating_value)::DOUBLE PRECISION FROM ratings WHERE place_id = $1",
        )
        .bind(place_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        Ok(average)
    }

    async fn ensure_place_exists(&self, place_id: Uuid) -> Result<(), PlaceError> {
        let place: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM places WHERE id = $1")
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        if place.is_none() {
            return Err(PlaceError::NotFound);
        }

        Ok(())
    }
}

fn validate_rating_value(rating_value: i32) -> Result<(), PlaceError> {
    if !(1..=5).contains(&rating_value) {
        return Err(PlaceError::ValidationError(
            "Rating value must be between 1 and 5".to_string(),
        ));
    }

    Ok(())
}
