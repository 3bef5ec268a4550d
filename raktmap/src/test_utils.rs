//! Shared helpers for the HTTP handler tests.
//!
//! All helpers take the `#[sqlx::test]`-provided pool so every test runs
//! against its own freshly migrated database.

use axum_test::TestServer;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::blood_requests::{BloodRequest, RequestStatus};
use crate::{AppState, Config, build_router};

/// Build a test server over the full application router with default
/// configuration.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let state = AppState {
        db: pool,
        config: Config::default(),
    };
    let router = build_router(state).expect("failed to build router");
    TestServer::new(router).expect("failed to start test server")
}

/// Insert a blood request row directly, bypassing the API.
pub async fn seed_request(
    pool: &PgPool,
    quantity: i32,
    confirmed_units: i32,
    status: RequestStatus,
    required_by: Option<DateTime<Utc>>,
) -> Uuid {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO blood_requests (blood_group, quantity, confirmed_units, urgency, required_by, status)
        VALUES ('O+', $1, $2, 'high', $3, $4)
        RETURNING id
        "#,
    )
    .bind(quantity)
    .bind(confirmed_units)
    .bind(required_by)
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("failed to seed blood request")
}

/// Fetch a blood request row as stored.
pub async fn fetch_request(pool: &PgPool, id: Uuid) -> BloodRequest {
    sqlx::query_as::<_, BloodRequest>("SELECT * FROM blood_requests WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("failed to fetch blood request")
}

/// Count stored donor location records.
pub async fn count_donor_locations(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donor_locations")
        .fetch_one(pool)
        .await
        .expect("failed to count donor locations")
}
