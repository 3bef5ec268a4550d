//! Database repository for blood requests.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;

use crate::{
    db::{
        errors::Result,
        models::blood_requests::{BloodRequest, BloodRequestCreateDBRequest},
    },
    types::RequestId,
};

const COLUMNS: &str = "id, hospital_id, blood_group, quantity, confirmed_units, urgency, required_by, status, created_at";

pub struct BloodRequests<'c> {
    db: &'c mut PgConnection,
}

impl<'c> BloodRequests<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), err)]
    pub async fn create(&mut self, request: &BloodRequestCreateDBRequest) -> Result<BloodRequest> {
        let query = format!(
            "INSERT INTO blood_requests (hospital_id, blood_group, quantity, urgency, required_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        let created = sqlx::query_as::<_, BloodRequest>(&query)
            .bind(request.hospital_id)
            .bind(&request.blood_group)
            .bind(request.quantity)
            .bind(&request.urgency)
            .bind(request.required_by)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: RequestId) -> Result<Option<BloodRequest>> {
        let query = format!("SELECT {COLUMNS} FROM blood_requests WHERE id = $1");

        let request = sqlx::query_as::<_, BloodRequest>(&query)
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(request)
    }

    /// Atomically claim one unit of an open request.
    ///
    /// This single conditional update is the concurrency core of the whole
    /// service: the match predicate and the increment execute as one
    /// statement, so under concurrent confirmation attempts at most
    /// `quantity` of them can succeed and none can land on an inactive or
    /// past-deadline request. Must never be replaced by a read-then-write
    /// sequence.
    ///
    /// The `fulfilled` transition on reaching capacity is folded into the
    /// same statement, so there is no window where a full request is still
    /// `active`. A NULL `required_by` fails the deadline predicate and the
    /// request cannot be confirmed against.
    ///
    /// Returns the post-update row, or `None` if the match failed (already
    /// full, not active, or past deadline).
    #[instrument(skip(self), err)]
    pub async fn try_confirm_unit(&mut self, id: RequestId, now: DateTime<Utc>) -> Result<Option<BloodRequest>> {
        let query = format!(
            "UPDATE blood_requests
             SET confirmed_units = confirmed_units + 1,
                 status = CASE WHEN confirmed_units + 1 >= quantity
                               THEN 'fulfilled'::request_status
                               ELSE status END
             WHERE id = $1
               AND status = 'active'
               AND confirmed_units < quantity
               AND required_by >= $2
             RETURNING {COLUMNS}"
        );

        let updated = sqlx::query_as::<_, BloodRequest>(&query)
            .bind(id)
            .bind(now)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(updated)
    }

    /// Transition an `active` request to `fulfilled`. Returns whether a row
    /// changed; a request that already left `active` is untouched.
    #[instrument(skip(self), err)]
    pub async fn mark_fulfilled(&mut self, id: RequestId) -> Result<bool> {
        let result = sqlx::query("UPDATE blood_requests SET status = 'fulfilled' WHERE id = $1 AND status = 'active'")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Transition an `active` request to `expired`. Returns whether a row
    /// changed.
    #[instrument(skip(self), err)]
    pub async fn mark_expired(&mut self, id: RequestId) -> Result<bool> {
        let result = sqlx::query("UPDATE blood_requests SET status = 'expired' WHERE id = $1 AND status = 'active'")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
