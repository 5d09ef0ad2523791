//! Driving-behavior core
//!
//! Validation, event detection, heading, scoring and the ingestion pipeline
//! that composes them, plus score aggregation over the store.

pub mod error;
pub mod validator;
pub mod detector;
pub mod heading;
pub mod scorer;
pub mod pipeline;
pub mod aggregation;
pub mod service;

pub use error::{IngestionError, QueryError, StorageError, ValidationError};
pub use validator::SampleValidator;
pub use detector::{EventDetector, EventFlags, EventThresholds};
pub use heading::{heading_degrees, HeadingCalculator};
pub use scorer::BehaviorScorer;
pub use pipeline::IngestionPipeline;
pub use aggregation::AggregationService;
pub use service::BehaviorService;
