use crate::category::Category;
use crate::domain::{
    Attraction, AttractionSet, NewAttraction, NewRecommendation, Recommendation,
    RecommendationState,
};
use crate::error::{Result, TravelokiError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Storage trait for the attraction directory and the moderation queue.
///
/// Implementations must guarantee atomic single-record insert/delete and an
/// atomic pending-state transition so that concurrent moderation actions on
/// one record cannot both succeed.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    // Attraction operations
    async fn list_attractions(&self) -> Result<AttractionSet>;
    async fn get_attraction(&self, id: Uuid) -> Result<Option<Attraction>>;
    async fn insert_attraction(&self, attraction: NewAttraction) -> Result<Attraction>;
    async fn delete_attraction(&self, id: Uuid) -> Result<()>;

    // Recommendation operations
    async fn create_recommendation(&self, rec: NewRecommendation) -> Result<Recommendation>;
    async fn get_recommendation(&self, id: Uuid) -> Result<Option<Recommendation>>;
    async fn list_pending(&self) -> Result<Vec<Recommendation>>;

    /// Compare-and-set transition from `Pending` to `target`. Returns the
    /// updated record, `InvalidTransition` if the record already resolved,
    /// `NotFound` if the id is unknown.
    async fn resolve_recommendation(
        &self,
        id: Uuid,
        target: RecommendationState,
    ) -> Result<Recommendation>;
}

/// In-memory store for development and testing. Attractions keep insertion
/// order within each category; search ordering depends on it.
pub struct InMemoryDirectory {
    attractions: Arc<Mutex<AttractionSet>>,
    recommendations: Arc<Mutex<Vec<Recommendation>>>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            attractions: Arc::new(Mutex::new(AttractionSet::default())),
            recommendations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-populate the directory, e.g. from the seed section of the config.
    pub fn seeded(seed: Vec<NewAttraction>) -> Self {
        let store = Self::new();
        {
            let mut attractions = store.attractions.lock().unwrap();
            for entry in seed {
                attractions.push(materialize(entry));
            }
        }
        store
    }
}

fn materialize(new: NewAttraction) -> Attraction {
    Attraction {
        id: Uuid::new_v4(),
        name: new.name,
        description: new.description,
        address: new.address,
        lat: new.lat,
        lng: new.lng,
        category: new.category,
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn list_attractions(&self) -> Result<AttractionSet> {
        let attractions = self.attractions.lock().unwrap();
        Ok(attractions.clone())
    }

    async fn get_attraction(&self, id: Uuid) -> Result<Option<Attraction>> {
        let attractions = self.attractions.lock().unwrap();
        let found = Category::priority_order()
            .iter()
            .flat_map(|c| attractions.in_category(*c))
            .find(|a| a.id == id)
            .cloned();
        Ok(found)
    }

    async fn insert_attraction(&self, new: NewAttraction) -> Result<Attraction> {
        let attraction = materialize(new);

        let mut attractions = self.attractions.lock().unwrap();
        attractions.push(attraction.clone());

        debug!(
            "Inserted attraction: {} ({}) with id {}",
            attraction.name, attraction.category, attraction.id
        );
        Ok(attraction)
    }

    async fn delete_attraction(&self, id: Uuid) -> Result<()> {
        let mut attractions = self.attractions.lock().unwrap();

        for category in Category::priority_order() {
            let list = match category {
                Category::Food => &mut attractions.food,
                Category::Fun => &mut attractions.fun,
                Category::Hotels => &mut attractions.hotels,
            };
            if let Some(pos) = list.iter().position(|a| a.id == id) {
                let removed = list.remove(pos);
                debug!("Deleted attraction: {} with id {}", removed.name, id);
                return Ok(());
            }
        }

        Err(TravelokiError::NotFound(format!("attraction {id}")))
    }

    async fn create_recommendation(&self, rec: NewRecommendation) -> Result<Recommendation> {
        let recommendation = Recommendation {
            id: Uuid::new_v4(),
            name: rec.name,
            description: rec.description,
            address: rec.address,
            lat: rec.lat,
            lng: rec.lng,
            category: rec.category,
            submitted_by: rec.submitted_by,
            state: RecommendationState::Pending,
            created_at: Utc::now(),
        };

        let mut recommendations = self.recommendations.lock().unwrap();
        recommendations.push(recommendation.clone());

        debug!(
            "Created recommendation: {} with id {}",
            recommendation.name, recommendation.id
        );
        Ok(recommendation)
    }

    async fn get_recommendation(&self, id: Uuid) -> Result<Option<Recommendation>> {
        let recommendations = self.recommendations.lock().unwrap();
        Ok(recommendations.iter().find(|r| r.id == id).cloned())
    }

    async fn list_pending(&self) -> Result<Vec<Recommendation>> {
        let recommendations = self.recommendations.lock().unwrap();
        // Insertion order is submission order, which keeps the listing stable.
        Ok(recommendations
            .iter()
            .filter(|r| r.state == RecommendationState::Pending)
            .cloned()
            .collect())
    }

    async fn resolve_recommendation(
        &self,
        id: Uuid,
        target: RecommendationState,
    ) -> Result<Recommendation> {
        let mut recommendations = self.recommendations.lock().unwrap();
        let record = recommendations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| TravelokiError::NotFound(format!("recommendation {id}")))?;

        if record.state != RecommendationState::Pending {
            return Err(TravelokiError::InvalidTransition {
                id,
                state: record.state,
            });
        }

        record.state = target;
        debug!("Resolved recommendation {} to {}", id, target);
        Ok(record.clone())
    }
}
