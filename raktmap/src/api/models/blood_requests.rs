//! Wire models for the blood request and confirmation endpoints.
//!
//! Field names are camelCase on the wire; the donor-facing frontend and the
//! SMS link tokens predate this service, so the JSON contract is fixed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db::models::blood_requests::{BloodRequest, RequestStatus},
    types::{HospitalId, RequestId},
};

/// Full blood request document, returned only while the request is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestResponse {
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

impl From<BloodRequest> for BloodRequestResponse {
    fn from(request: BloodRequest) -> Self {
        Self {
            id: request.id,
            hospital_id: request.hospital_id,
            blood_group: request.blood_group,
            quantity: request.quantity,
            confirmed_units: request.confirmed_units,
            urgency: request.urgency,
            required_by: request.required_by,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

/// Suppressed response once a request is no longer accepting donors.
/// Remaining capacity and deadline are intentionally not disclosed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedView {
    pub status: String,
    pub message: String,
}

impl ClosedView {
    pub fn new() -> Self {
        Self {
            status: "closed".to_string(),
            message: "Blood request fulfilled. Thank you.".to_string(),
        }
    }
}

impl Default for ClosedView {
    fn default() -> Self {
        Self::new()
    }
}

/// What `GET /api/bloodrequest/{id}` returns: either the open document or
/// the closed view.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BloodRequestView {
    Open(BloodRequestResponse),
    Closed(ClosedView),
}

/// Creation payload for hospital-facing tooling.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequestCreate {
    pub hospital_id: Option<HospitalId>,
    pub blood_group: String,
    pub quantity: i32,
    pub urgency: Option<String>,
    pub required_by: Option<DateTime<Utc>>,
}

/// Donor confirmation payload.
///
/// Coordinates are required but `0.0` is a legitimate value; validation
/// happens in the handler so the error is a proper 400 rather than a
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmDonation {
    pub request_id: Option<RequestId>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy: Option<f64>,
    pub mobile_number: Option<String>,
    pub token: Option<String>,
}

/// Payload suitable for encoding into a scannable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrData {
    pub donor_id: String,
    pub mobile_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<RequestId>,
    pub token: Option<String>,
}

/// Successful confirmation response.
///
/// `distance_km` and `within_geofence` are informational; a confirmation is
/// never rejected on distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    pub message: String,
    pub donor_id: String,
    pub qr_data: QrData,
    pub distance_km: f64,
    pub within_geofence: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_view_serializes_with_fixed_status() {
        let json = serde_json::to_value(ClosedView::new()).unwrap();
        assert_eq!(json["status"], "closed");
        assert!(json["message"].as_str().unwrap().contains("Thank you"));
    }

    #[test]
    fn confirm_payload_accepts_camel_case() {
        let body: ConfirmDonation = serde_json::from_str(
            r#"{"requestId":"550e8400-e29b-41d4-a716-446655440000","latitude":22.6,"longitude":72.8,"mobileNumber":"9999999999"}"#,
        )
        .unwrap();
        assert!(body.request_id.is_some());
        assert_eq!(body.latitude, Some(22.6));
        assert_eq!(body.mobile_number.as_deref(), Some("9999999999"));
        assert!(body.token.is_none());
    }
}
