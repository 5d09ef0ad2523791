//! Score aggregation over stored records

use std::sync::Arc;

use super::error::QueryError;
use crate::store::TelemetryStore;

#[derive(Clone)]
pub struct AggregationService {
    store: Arc<dyn TelemetryStore>,
}

impl AggregationService {
    pub fn new(store: Arc<dyn TelemetryStore>) -> Self {
        Self { store }
    }

    /// Mean behavior score of a vehicle; 0 when it has no records
    pub async fn average_score(&self, vehicle_id: &str) -> Result<f64, QueryError> {
        let summary = self.store.score_summary(vehicle_id).await?;

        if summary.count == 0 {
            return Ok(0.0);
        }
        Ok(summary.sum / summary.count as f64)
    }
}
