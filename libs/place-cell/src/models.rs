use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceStatus {
    Pending,
    Approved,
}

impl PlaceStatus {
    /// Submissions from the "parent" role enter moderation; any other role
    /// bypasses it.
    pub fn initial_for_role(role: Option<&str>) -> Self {
        if role == Some("parent") {
            PlaceStatus::Pending
        } else {
            PlaceStatus::Approved
        }
    }

    /// The only defined transition is pending -> approved; rejection is
    /// terminal-by-deletion and never produces a stored state.
    pub fn can_transition_to(&self, next: &PlaceStatus) -> bool {
        matches!((self, next), (PlaceStatus::Pending, PlaceStatus::Approved))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceStatus::Pending => "pending",
            PlaceStatus::Approved => "approved",
        }
    }
}

impl fmt::Display for PlaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlaceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PlaceStatus::Pending),
            "approved" => Ok(PlaceStatus::Approved),
            other => Err(format!("Unknown place status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub classification: String,
    pub region: String,
    pub city: String,
    pub location: String,
    pub description: String,
    pub status: PlaceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row shape; status is TEXT in the store and parsed into the enum on
/// the way out.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceRow {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub classification: String,
    pub region: String,
    pub city: String,
    pub location: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaceRow {
    pub fn into_place(self) -> Result<Place, PlaceError> {
        let status = self.status.parse().map_err(PlaceError::DatabaseError)?;

        Ok(Place {
            id: self.id,
            owner_user_id: self.owner_user_id,
            name: self.name,
            classification: self.classification,
            region: self.region,
            city: self.city,
            location: self.location,
            description: self.description,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// A place with its ordered photo URLs and service ids attached.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceDetails {
    #[serde(flatten)]
    pub place: Place,
    pub photo_urls: Vec<String>,
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitPlaceRequest {
    pub name: String,
    pub classification: String,
    pub region: String,
    pub city: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlaceRequest {
    pub name: String,
    pub classification: String,
    pub region: String,
    pub city: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// When present, the existing photo rows are replaced wholesale.
    pub photo_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Rating {
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub rating_value: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingRequest {
    pub rating_value: i32,
}

#[derive(Error, Debug)]
pub enum PlaceError {
    #[error("Place not found")]
    NotFound,

    #[error("A rating for this place already exists")]
    DuplicateRating,

    #[error("Rating not found")]
    RatingNotFound,

    #[error("Place cannot be modified in current status: {0}")]
    InvalidStatusTransition(PlaceStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
