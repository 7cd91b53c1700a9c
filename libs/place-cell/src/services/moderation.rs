use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use notification_cell::Mailer;

use crate::models::{
    Place, PlaceDetails, PlaceError, PlaceRow, PlaceStatus, SubmitPlaceRequest, UpdatePlaceRequest,
};

pub struct ModerationService {
    pool: PgPool,
    mailer: Mailer,
}

impl ModerationService {
    pub fn new(pool: &PgPool, mailer: Mailer) -> Self {
        Self {
            pool: pool.clone(),
            mailer,
        }
    }

    /// Persist a submitted place together with its service links and photo
    /// rows in one transaction. Submissions from the "parent" role start
    /// out pending; any other role is listed immediately.
    pub async fn submit_place(
        &self,
        owner_user_id: Uuid,
        role: Option<&str>,
        request: SubmitPlaceRequest,
    ) -> Result<PlaceDetails, PlaceError> {
        debug!("Submitting place {} for user {}", request.name, owner_user_id);

        validate_place_fields(
            &request.name,
            &request.classification,
            &request.region,
            &request.city,
            &request.location,
        )?;

        let status = PlaceStatus::initial_for_role(role);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        let row: PlaceRow = sqlx::query_as(
            "INSERT INTO places \
                 (owner_user_id, name, classification, region, city, location, description, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(owner_user_id)
        .bind(&request.name)
        .bind(&request.classification)
        .bind(&request.region)
        .bind(&request.city)
        .bind(&request.location)
        .bind(&request.description)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        for service_id in &request.service_ids {
            sqlx::query("INSERT INTO place_services (place_id, service_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(service_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;
        }

        for (position, photo_url) in request.photo_urls.iter().enumerate() {
            sqlx::query(
                "INSERT INTO place_photos (place_id, photo_url, position) VALUES ($1, $2, $3)",
            )
            .bind(row.id)
            .bind(photo_url)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        info!("Place {} submitted with status {}", row.id, status);

        let place = row.into_place()?;
        Ok(PlaceDetails {
            photo_urls: request.photo_urls,
            service_ids: request.service_ids,
            place,
        })
    }

    /// Transition a pending place to approved and notify the owner. The
    /// notification is best-effort; a send failure never undoes the
    /// committed transition.
    pub async fn confirm_place(&self, place_id: Uuid) -> Result<Place, PlaceError> {
        debug!("Confirming place {}", place_id);

        let place = self.get_place_record(place_id).await?;

        if !place.status.can_transition_to(&PlaceStatus::Approved) {
            warn!(
                "Invalid place status transition attempted: {} -> approved",
                place.status
            );
            return Err(PlaceError::InvalidStatusTransition(place.status));
        }

        let row: Option<PlaceRow> = sqlx::query_as(
            "UPDATE places SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
        )
        .bind(PlaceStatus::Approved.as_str())
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        let approved = row.ok_or(PlaceError::NotFound)?.into_place()?;

        info!("Place {} approved", place_id);

        match self.owner_email(approved.owner_user_id).await {
            Some(address) => {
                let body = format!(
                    "Your place \"{}\" has been approved and is now listed.",
                    approved.name
                );
                if let Err(e) = self.mailer.send(&address, "Place approved", &body).await {
                    warn!("Failed to send approval notification: {}", e);
                }
            }
            None => warn!(
                "No contact address for owner {}, skipping approval notification",
                approved.owner_user_id
            ),
        }

        Ok(approved)
    }

    /// Reject a submission: look up the owner first, then remove the place
    /// and every dependent row in one transaction, then notify. The cascade
    /// always completes regardless of the notification outcome.
    pub async fn reject_place(&self, place_id: Uuid) -> Result<(), PlaceError> {
        debug!("Rejecting place {}", place_id);

        let place = self.get_place_record(place_id).await?;

        let address = self
            .owner_email(place.owner_user_id)
            .await
            .ok_or(PlaceError::NotFound)?;

        self.cascade_delete(place_id).await?;

        info!("Place {} rejected and removed", place_id);

        let body = format!("Your place \"{}\" was not approved for listing.", place.name);
        if let Err(e) = self.mailer.send(&address, "Place rejected", &body).await {
            warn!("Failed to send rejection notification: {}", e);
        }

        Ok(())
    }

    /// Owner- or admin-initiated removal: the same cascade as rejection,
    /// without notification, regardless of status.
    pub async fn delete_place(&self, place_id: Uuid) -> Result<(), PlaceError> {
        debug!("Deleting place {}", place_id);

        self.get_place_record(place_id).await?;
        self.cascade_delete(place_id).await?;

        info!("Place {} deleted", place_id);
        Ok(())
    }

    pub async fn update_place(
        &self,
        place_id: Uuid,
        request: UpdatePlaceRequest,
    ) -> Result<PlaceDetails, PlaceError> {
        debug!("Updating place {}", place_id);

        validate_place_fields(
            &request.name,
            &request.classification,
            &request.region,
            &request.city,
            &request.location,
        )?;

        self.get_place_record(place_id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        let row: Option<PlaceRow> = sqlx::query_as(
            "UPDATE places \
             SET name = $1, classification = $2, region = $3, city = $4, \
                 location = $5, description = $6, updated_at = now() \
             WHERE id = $7 \
             RETURNING *",
        )
        .bind(&request.name)
        .bind(&request.classification)
        .bind(&request.region)
        .bind(&request.city)
        .bind(&request.location)
        .bind(&request.description)
        .bind(place_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        let row = row.ok_or(PlaceError::NotFound)?;

        // Replace the photo set only when new photos were supplied
        if let Some(photo_urls) = &request.photo_urls {
            sqlx::query("DELETE FROM place_photos WHERE place_id = $1")
                .bind(place_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

            for (position, photo_url) in photo_urls.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO place_photos (place_id, photo_url, position) VALUES ($1, $2, $3)",
                )
                .bind(place_id)
                .bind(photo_url)
                .bind(position as i32)
                .execute(&mut *tx)
                .await
                .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        info!("Place {} updated", place_id);

        let place = row.into_place()?;
        self.attach_details(place).await
    }

    pub async fn get_place(&self, place_id: Uuid) -> Result<PlaceDetails, PlaceError> {
        let place = self.get_place_record(place_id).await?;
        self.attach_details(place).await
    }

    pub async fn list_pending_places(&self) -> Result<Vec<PlaceDetails>, PlaceError> {
        self.list_by_status(PlaceStatus::Pending).await
    }

    pub async fn list_approved_places(&self) -> Result<Vec<PlaceDetails>, PlaceError> {
        self.list_by_status(PlaceStatus::Approved).await
    }

    pub async fn list_places_by_classification(
        &self,
        classification: &str,
    ) -> Result<Vec<PlaceDetails>, PlaceError> {
        let rows: Vec<PlaceRow> = sqlx::query_as(
            "SELECT * FROM places WHERE classification = $1 ORDER BY created_at",
        )
        .bind(classification)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        if rows.is_empty() {
            return Err(PlaceError::NotFound);
        }

        let mut places = Vec::with_capacity(rows.len());
        for row in rows {
            places.push(self.attach_details(row.into_place()?).await?);
        }

        Ok(places)
    }

    // Private helper methods

    async fn get_place_record(&self, place_id: Uuid) -> Result<Place, PlaceError> {
        let row: Option<PlaceRow> = sqlx::query_as("SELECT * FROM places WHERE id = $1")
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        row.ok_or(PlaceError::NotFound)?.into_place()
    }

    async fn list_by_status(&self, status: PlaceStatus) -> Result<Vec<PlaceDetails>, PlaceError> {
        let rows: Vec<PlaceRow> = sqlx::query_as(
            "SELECT * FROM places WHERE status = $1 ORDER BY created_at",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        let mut places = Vec::with_capacity(rows.len());
        for row in rows {
            places.push(self.attach_details(row.into_place()?).await?);
        }

        Ok(places)
    }

    async fn attach_details(&self, place: Place) -> Result<PlaceDetails, PlaceError> {
        let photo_urls: Vec<(String,)> = sqlx::query_as(
            "SELECT photo_url FROM place_photos WHERE place_id = $1 ORDER BY position",
        )
        .bind(place.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        let service_ids: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT service_id FROM place_services WHERE place_id = $1",
        )
        .bind(place.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        Ok(PlaceDetails {
            place,
            photo_urls: photo_urls.into_iter().map(|(url,)| url).collect(),
            service_ids: service_ids.into_iter().map(|(id,)| id).collect(),
        })
    }

    async fn owner_email(&self, owner_user_id: Uuid) -> Option<String> {
        let result: Result<Option<(String,)>, sqlx::Error> =
            sqlx::query_as("SELECT email FROM users WHERE id = $1")
                .bind(owner_user_id)
                .fetch_optional(&self.pool)
                .await;

        match result {
            Ok(row) => row.map(|(email,)| email),
            Err(e) => {
                warn!("Owner lookup failed for {}: {}", owner_user_id, e);
                None
            }
        }
    }

    /// Delete ratings, photos, service links, then the place itself, all
    /// within one transaction.
    async fn cascade_delete(&self, place_id: Uuid) -> Result<(), PlaceError> {
        let mut tx: Transaction<'_, Postgres> = self
            .pool
            .begin()
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM ratings WHERE place_id = $1")
            .bind(place_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM place_photos WHERE place_id = $1")
            .bind(place_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM place_services WHERE place_id = $1")
            .bind(place_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(place_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PlaceError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| PlaceError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

fn validate_place_fields(
    name: &str,
    classification: &str,
    region: &str,
    city: &str,
    location: &str,
) -> Result<(), PlaceError> {
    if name.trim().is_empty()
        || classification.trim().is_empty()
        || region.trim().is_empty()
        || city.trim().is_empty()
        || location.trim().is_empty()
    {
        return Err(PlaceError::ValidationError(
            "All fields are required".to_string(),
        ));
    }

    Ok(())
}
