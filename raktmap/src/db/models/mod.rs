//! Database record models matching table schemas.
//!
//! Each struct corresponds to a table row and derives `sqlx::FromRow` for
//! query results. Database models are distinct from the API models in
//! [`crate::api::models`] so the storage schema and the wire contract can
//! evolve independently.

pub mod blood_requests;
pub mod donor_locations;
