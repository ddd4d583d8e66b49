//! Moderation workflow for user-submitted recommendations.
//!
//! A submission enters as a Pending record and resolves exactly once, to
//! Approved (materialized into the directory) or Rejected (retired). All
//! administrator actions fail closed when the caller lacks the admin
//! capability, and destructive ones additionally require the caller to have
//! confirmed the action at its own boundary.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::category::{Category, CategoryIds};
use crate::domain::{
    validate_coordinates, Attraction, Identity, NewAttraction, NewRecommendation, Recommendation,
    RecommendationState,
};
use crate::error::{Result, TravelokiError};
use crate::storage::DirectoryStore;

/// Payload for a user submission or an admin direct-create.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    "food".to_string()
}

pub struct ModerationService {
    store: Arc<dyn DirectoryStore>,
    category_ids: CategoryIds,
}

impl ModerationService {
    pub fn new(store: Arc<dyn DirectoryStore>, category_ids: CategoryIds) -> Self {
        Self {
            store,
            category_ids,
        }
    }

    fn require_admin(&self, actor: &Identity) -> Result<()> {
        if actor.is_admin {
            Ok(())
        } else {
            warn!("{} attempted an administrator action", actor.username);
            Err(TravelokiError::Unauthorized)
        }
    }

    fn validate_payload(&self, payload: &SubmissionPayload) -> Result<()> {
        if payload.name.trim().is_empty() {
            return Err(TravelokiError::Validation("Name is required".to_string()));
        }
        if payload.description.trim().is_empty() {
            return Err(TravelokiError::Validation(
                "Description is required".to_string(),
            ));
        }
        validate_coordinates(payload.lat, payload.lng)
    }

    /// Resolve a category name the way the storage schema does: known names
    /// map to their category, anything else falls back alongside the
    /// fallback identifier.
    fn resolve_category(&self, name: &str) -> (Category, u32) {
        let category = Category::parse(name).unwrap_or(Category::Food);
        (category, self.category_ids.resolve(name))
    }

    /// Name for a storage-schema category identifier, for callers that carry
    /// the numeric id across the wire.
    pub fn category_name_for(&self, id: u32) -> String {
        self.category_ids.name_for(id)
    }

    /// Create a Pending recommendation from an authenticated user.
    pub async fn submit(
        &self,
        payload: SubmissionPayload,
        submitter: &Identity,
    ) -> Result<Recommendation> {
        self.validate_payload(&payload)?;
        let (category, _) = self.resolve_category(&payload.category);

        let rec = self
            .store
            .create_recommendation(NewRecommendation {
                name: payload.name,
                description: payload.description,
                address: payload.address,
                lat: payload.lat,
                lng: payload.lng,
                category,
                submitted_by: submitter.username.clone(),
            })
            .await?;

        info!(
            "Recommendation '{}' submitted by {} ({})",
            rec.name, submitter.username, rec.id
        );
        Ok(rec)
    }

    /// Publish a Pending recommendation as an attraction under the given
    /// category. The Pending check and the state flip are one atomic store
    /// operation, so a concurrent approve or reject on the same id observes
    /// `InvalidTransition` instead of double-publishing.
    pub async fn approve(
        &self,
        id: Uuid,
        category_name: &str,
        actor: &Identity,
        confirmed: bool,
    ) -> Result<Attraction> {
        self.require_admin(actor)?;
        if !confirmed {
            return Err(TravelokiError::Validation(
                "Approval requires confirmation".to_string(),
            ));
        }

        let (category, category_id) = self.resolve_category(category_name);
        let rec = self
            .store
            .resolve_recommendation(id, RecommendationState::Approved)
            .await?;

        let attraction = self
            .store
            .insert_attraction(NewAttraction {
                name: rec.name,
                description: rec.description,
                address: rec.address,
                lat: rec.lat,
                lng: rec.lng,
                category,
            })
            .await?;

        info!(
            "Approved recommendation {} as attraction {} (category {} / id {})",
            id, attraction.id, category, category_id
        );
        Ok(attraction)
    }

    /// Retire a Pending recommendation. Same single-shot rule as `approve`.
    pub async fn reject(&self, id: Uuid, actor: &Identity, confirmed: bool) -> Result<()> {
        self.require_admin(actor)?;
        if !confirmed {
            return Err(TravelokiError::Validation(
                "Rejection requires confirmation".to_string(),
            ));
        }

        self.store
            .resolve_recommendation(id, RecommendationState::Rejected)
            .await?;
        info!("Rejected recommendation {}", id);
        Ok(())
    }

    /// All Pending recommendations, in submission order.
    pub async fn list_pending(&self, actor: &Identity) -> Result<Vec<Recommendation>> {
        self.require_admin(actor)?;
        self.store.list_pending().await
    }

    /// Administrator bypass: publish directly without a Pending record.
    pub async fn create_direct(
        &self,
        payload: SubmissionPayload,
        actor: &Identity,
    ) -> Result<Attraction> {
        self.require_admin(actor)?;
        self.validate_payload(&payload)?;
        let (category, _) = self.resolve_category(&payload.category);

        let attraction = self
            .store
            .insert_attraction(NewAttraction {
                name: payload.name,
                description: payload.description,
                address: payload.address,
                lat: payload.lat,
                lng: payload.lng,
                category,
            })
            .await?;

        info!(
            "Attraction '{}' created directly by {} ({})",
            attraction.name, actor.username, attraction.id
        );
        Ok(attraction)
    }

    /// Permanent removal of a published attraction. Irreversible; the caller
    /// owns the confirmation dialog.
    pub async fn delete_published(
        &self,
        id: Uuid,
        actor: &Identity,
        confirmed: bool,
    ) -> Result<()> {
        self.require_admin(actor)?;
        if !confirmed {
            return Err(TravelokiError::Validation(
                "Deletion requires confirmation".to_string(),
            ));
        }

        self.store.delete_attraction(id).await?;
        debug!("Attraction {} deleted by {}", id, actor.username);
        Ok(())
    }
}
