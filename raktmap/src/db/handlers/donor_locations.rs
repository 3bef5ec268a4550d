//! Database repository for donor location records.

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::{
    errors::{DbError, Result},
    models::donor_locations::{DonorLocation, DonorLocationCreateDBRequest},
};

const COLUMNS: &str = "id, address, latitude, longitude, accuracy, captured_at, mobile_number, donor_id, request_id, token";

pub struct DonorLocations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> DonorLocations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(donor_id = %request.donor_id), err)]
    pub async fn create(&mut self, request: &DonorLocationCreateDBRequest) -> Result<DonorLocation> {
        let query = format!(
            "INSERT INTO donor_locations
                 (address, latitude, longitude, accuracy, mobile_number, donor_id, request_id, token)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );

        let created = sqlx::query_as::<_, DonorLocation>(&query)
            .bind(&request.address)
            .bind(request.latitude)
            .bind(request.longitude)
            .bind(request.accuracy)
            .bind(&request.mobile_number)
            .bind(&request.donor_id)
            .bind(request.request_id)
            .bind(&request.token)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(created)
    }

    #[instrument(skip(self), err)]
    pub async fn donor_id_exists(&mut self, donor_id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM donor_locations WHERE donor_id = $1)")
            .bind(donor_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(exists)
    }

    /// Draw candidates from `generate` until one not present in the store
    /// is found. Callers pass [`crate::ids::generate_donor_id`].
    ///
    /// The loop is capped at `max_attempts`: with an 8-character suffix over
    /// a 36-symbol alphabet a collision is astronomically unlikely, so
    /// exhausting the cap means something is systematically wrong and is
    /// reported as an error rather than spinning forever.
    ///
    /// The unique index on `donor_id` remains the final arbiter if two
    /// concurrent generations race to the same candidate.
    #[instrument(skip(self, generate), err)]
    pub async fn generate_unique_donor_id(&mut self, max_attempts: u32, mut generate: impl FnMut() -> String) -> Result<String> {
        for _ in 0..max_attempts {
            let candidate = generate();
            if !self.donor_id_exists(&candidate).await? {
                return Ok(candidate);
            }
        }

        Err(DbError::Other(anyhow::anyhow!(
            "failed to generate a unique donor id after {max_attempts} attempts"
        )))
    }
}
