//! Domain data shapes shared across layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::category::Category;
use crate::error::{Result, TravelokiError};

/// A published, searchable point of interest. Immutable once published
/// except by explicit admin delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
}

/// Arguments for publishing an attraction; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttraction {
    pub name: String,
    pub description: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
}

/// Lifecycle of a user-submitted recommendation. Pending resolves to exactly
/// one of the terminal states, once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationState {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RecommendationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecommendationState::Pending => "pending",
            RecommendationState::Approved => "approved",
            RecommendationState::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A user-submitted candidate attraction awaiting moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
    pub submitted_by: String,
    pub state: RecommendationState,
    pub created_at: DateTime<Utc>,
}

/// Arguments for creating a pending recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecommendation {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
    pub submitted_by: String,
}

/// A transient position fix. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of the directory partitioned by category, in storage insertion
/// order. This is also the wire shape of the list-attractions payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttractionSet {
    pub food: Vec<Attraction>,
    pub fun: Vec<Attraction>,
    pub hotels: Vec<Attraction>,
}

impl AttractionSet {
    pub fn in_category(&self, category: Category) -> &[Attraction] {
        match category {
            Category::Food => &self.food,
            Category::Fun => &self.fun,
            Category::Hotels => &self.hotels,
        }
    }

    pub fn push(&mut self, attraction: Attraction) {
        match attraction.category {
            Category::Food => self.food.push(attraction),
            Category::Fun => self.fun.push(attraction),
            Category::Hotels => self.hotels.push(attraction),
        }
    }

    pub fn len(&self) -> usize {
        self.food.len() + self.fun.len() + self.hotels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An authenticated caller as resolved by the auth provider. Admin is a
/// binary capability flag; the core never inspects credentials itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

/// Validate a coordinate pair: finite, lat in [-90, 90], lng in [-180, 180].
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<()> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(TravelokiError::Validation(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(TravelokiError::Validation(format!(
            "Latitude {lat} out of range [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(TravelokiError::Validation(format!(
            "Longitude {lng} out of range [-180, 180]"
        )));
    }
    Ok(())
}
