//! Database models for donor location records.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::RequestId;

/// Database entity model.
///
/// One row is inserted per successful confirmation; rows are never mutated
/// or deleted by this service.
#[derive(Debug, Clone, FromRow)]
pub struct DonorLocation {
    pub id: Uuid,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub captured_at: DateTime<Utc>,
    pub mobile_number: Option<String>,
    pub donor_id: String,
    pub request_id: Option<RequestId>,
    pub token: Option<String>,
}

/// Request for creating a donor location record
#[derive(Debug, Clone)]
pub struct DonorLocationCreateDBRequest {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub mobile_number: Option<String>,
    pub donor_id: String,
    pub request_id: Option<RequestId>,
    pub token: Option<String>,
}
