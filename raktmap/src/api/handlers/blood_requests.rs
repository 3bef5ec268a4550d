//! Handlers for blood request lookup, creation, and donor confirmation.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use tracing::instrument;

use crate::{
    AppState,
    api::models::blood_requests::{
        BloodRequestCreate, BloodRequestResponse, BloodRequestView, ClosedView, ConfirmDonation, ConfirmResponse, QrData,
    },
    db::{
        errors::DbError,
        handlers::{BloodRequests, DonorLocations},
        models::{
            blood_requests::{BloodRequestCreateDBRequest, RequestStatus},
            donor_locations::DonorLocationCreateDBRequest,
        },
    },
    errors::Error,
    geo, ids,
    types::{RequestId, abbrev_uuid},
};

/// GET /api/bloodrequest/{id}
///
/// Derives the display status from the current time and counters, persists
/// inferred transitions (active -> fulfilled, active -> expired), and
/// suppresses the document behind the closed view once the request stops
/// accepting donors. The closed check is evaluated independently of whether
/// a write happened, so repeated GETs are idempotent.
#[instrument(skip(state), fields(request_id = %abbrev_uuid(&id)))]
pub async fn get_blood_request(State(state): State<AppState>, Path(id): Path<RequestId>) -> Result<Json<BloodRequestView>, Error> {
    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut requests = BloodRequests::new(&mut conn);

    let Some(request) = requests.get_by_id(id).await? else {
        return Err(Error::NotFound {
            resource: "blood request".to_string(),
            id: id.to_string(),
        });
    };

    let now = Utc::now();
    let is_full = request.is_full();
    let is_expired = request.is_expired(now);

    if request.status == RequestStatus::Active {
        if is_full {
            requests.mark_fulfilled(id).await?;
        } else if is_expired {
            requests.mark_expired(id).await?;
        }
    }

    if request.status != RequestStatus::Active || is_full || is_expired {
        return Ok(Json(BloodRequestView::Closed(ClosedView::new())));
    }

    Ok(Json(BloodRequestView::Open(request.into())))
}

/// POST /api/bloodrequest
///
/// Creation endpoint for hospital-facing tooling. Requests enter the system
/// `active` with zero confirmed units.
#[instrument(skip(state, payload))]
pub async fn create_blood_request(
    State(state): State<AppState>,
    Json(payload): Json<BloodRequestCreate>,
) -> Result<(StatusCode, Json<BloodRequestResponse>), Error> {
    if payload.quantity < 1 {
        return Err(Error::Validation {
            message: "quantity must be at least 1".to_string(),
        });
    }
    if payload.blood_group.trim().is_empty() {
        return Err(Error::Validation {
            message: "bloodGroup is required".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;
    let mut requests = BloodRequests::new(&mut conn);

    let created = requests
        .create(&BloodRequestCreateDBRequest {
            hospital_id: payload.hospital_id,
            blood_group: payload.blood_group,
            quantity: payload.quantity,
            urgency: payload.urgency,
            required_by: payload.required_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// POST /api/bloodrequest/confirm, POST /api/save-location
///
/// A donor's atomic claim against one unit of an open request. The
/// check-and-increment happens in a single conditional database update
/// ([`BloodRequests::try_confirm_unit`]); on success a donor location
/// record is inserted and a QR payload returned.
#[instrument(skip(state, payload))]
pub async fn confirm_donation(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmDonation>,
) -> Result<Json<ConfirmResponse>, Error> {
    let (latitude, longitude) = match (payload.latitude, payload.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(Error::Validation {
                message: "Coordinates required".to_string(),
            });
        }
    };
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::Validation {
            message: "Coordinates out of range".to_string(),
        });
    }
    let Some(request_id) = payload.request_id else {
        return Err(Error::Validation {
            message: "requestId is required".to_string(),
        });
    };

    let mut conn = state.db.acquire().await.map_err(DbError::from)?;

    // Single atomic compare-and-increment; also flips status to fulfilled
    // when the last unit is claimed.
    let now = Utc::now();
    let updated = BloodRequests::new(&mut conn).try_confirm_unit(request_id, now).await?;
    let Some(request) = updated else {
        return Err(Error::Conflict {
            message: "Blood request already fulfilled or expired.".to_string(),
        });
    };

    // Geofence is informational only: the unit is already claimed and a
    // donor outside the radius is still counted.
    let geofence = &state.config.geofence;
    let distance_km = geo::haversine_distance_km(geofence.latitude, geofence.longitude, latitude, longitude);
    let within_geofence = distance_km <= geofence.radius_km;
    if !within_geofence {
        tracing::warn!(
            request_id = %abbrev_uuid(&request_id),
            distance_km,
            radius_km = geofence.radius_km,
            "donor confirmed from outside the geofence"
        );
    }

    let mut donors = DonorLocations::new(&mut conn);
    let donor_id = donors
        .generate_unique_donor_id(state.config.donor_ids.max_attempts, ids::generate_donor_id)
        .await?;

    let address = format!(
        "Mobile: {} - Current Location: {}, {}",
        payload.mobile_number.as_deref().unwrap_or("-"),
        latitude,
        longitude
    );
    let location = donors
        .create(&DonorLocationCreateDBRequest {
            address,
            latitude,
            longitude,
            accuracy: payload.accuracy,
            mobile_number: payload.mobile_number.clone(),
            donor_id: donor_id.clone(),
            request_id: Some(request_id),
            token: payload.token.clone(),
        })
        .await?;

    tracing::info!(
        request_id = %abbrev_uuid(&request_id),
        donor_id = %donor_id,
        confirmed_units = request.confirmed_units,
        quantity = request.quantity,
        "donation confirmed"
    );

    Ok(Json(ConfirmResponse {
        message: "Saved".to_string(),
        donor_id: donor_id.clone(),
        qr_data: QrData {
            donor_id,
            mobile_number: payload.mobile_number,
            latitude,
            longitude,
            timestamp: location.captured_at,
            request_id: Some(request_id),
            token: payload.token,
        },
        distance_km,
        within_geofence,
    }))
}
