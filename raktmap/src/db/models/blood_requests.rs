//! Database models for blood requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::{HospitalId, RequestId};

/// Lifecycle state of a blood request.
///
/// `active` requests accept confirmations. Once a request leaves `active`
/// (to `fulfilled` or `expired`) it never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Active,
    Fulfilled,
    Expired,
}

/// Database entity model
#[derive(Debug, Clone, FromRow)]
pub struct BloodRequest {
    pub id: RequestId,
    pub hospital_id: Option<HospitalId>,
    pub blood_group: String,
    pub quantity: i32,
    pub confirmed_units: i32,
    pub urgency: Option<String>,
    pub required_by: Option<DateTime<Utc>>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl BloodRequest {
    /// A request with no deadline never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.required_by.is_some_and(|deadline| now > deadline)
    }

    pub fn is_full(&self) -> bool {
        self.confirmed_units >= self.quantity
    }
}

/// Request for creating a blood request (hospital-facing tooling)
#[derive(Debug, Clone)]
pub struct BloodRequestCreateDBRequest {
    pub hospital_id: Option<Uuid>,
    pub blood_group: String,
    pub quantity: i32,
    pub urgency: Option<String>,
    pub required_by: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(quantity: i32, confirmed: i32, required_by: Option<DateTime<Utc>>) -> BloodRequest {
        BloodRequest {
            id: Uuid::new_v4(),
            hospital_id: None,
            blood_group: "O+".to_string(),
            quantity,
            confirmed_units: confirmed,
            urgency: None,
            required_by,
            status: RequestStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_when_confirmed_reaches_quantity() {
        assert!(!request(3, 2, None).is_full());
        assert!(request(3, 3, None).is_full());
        assert!(request(3, 4, None).is_full());
    }

    #[test]
    fn expired_only_past_deadline() {
        let now = Utc::now();
        assert!(request(1, 0, Some(now - Duration::minutes(1))).is_expired(now));
        assert!(!request(1, 0, Some(now + Duration::minutes(1))).is_expired(now));
    }

    #[test]
    fn missing_deadline_never_expires() {
        assert!(!request(1, 0, None).is_expired(Utc::now()));
    }
}
