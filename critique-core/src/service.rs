//! Seam to the remote review service.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;

/// The remote review service: one possibly slow, possibly failing call.
///
/// Implementations return the raw JSON response; its shape is not trusted and
/// goes through [`crate::normalize::normalize`] before anything renders it.
#[async_trait]
pub trait ReviewService: Send + Sync {
    async fn submit_for_review(&self, code: &str, model_id: &str) -> Result<Value, ServiceError>;
}
