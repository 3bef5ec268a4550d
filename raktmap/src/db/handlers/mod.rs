//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection, provides strongly-typed
//! operations for one entity, and returns domain models from
//! [`crate::db::models`].
//!
//! - [`BloodRequests`]: blood request lookup, status transitions, and the
//!   atomic confirmation increment
//! - [`DonorLocations`]: donor record inserts and donor-id uniqueness

pub mod blood_requests;
pub mod donor_locations;

pub use blood_requests::BloodRequests;
pub use donor_locations::DonorLocations;
