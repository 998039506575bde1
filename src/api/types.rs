//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::db::DebrisStore;
use crate::pipeline::SubmissionPipeline;

/// Shared context for all routes. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<SubmissionPipeline>,
    pub store: Arc<DebrisStore>,
}

impl AppState {
    pub fn new(pipeline: Arc<SubmissionPipeline>, store: Arc<DebrisStore>) -> Self {
        Self { pipeline, store }
    }
}
