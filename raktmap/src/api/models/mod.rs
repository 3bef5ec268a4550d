//! API request and response data models.
//!
//! These structures define the public wire contract. They are distinct from
//! the database models so the API representation and the storage schema can
//! evolve independently; the wire format uses camelCase field names,
//! matching what the donor-facing frontend expects.

pub mod blood_requests;
