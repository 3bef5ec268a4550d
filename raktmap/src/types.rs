//! Common type definitions.
//!
//! Entity IDs are UUIDs wrapped in type aliases for readability:
//!
//! - [`RequestId`]: Blood request identifier
//! - [`HospitalId`]: Hospital reference (owned by hospital-facing tooling)
//!
//! Donor identifiers are *not* UUIDs; they are short generated tokens, see
//! [`crate::ids`].

use uuid::Uuid;

// Type aliases for IDs
pub type RequestId = Uuid;
pub type HospitalId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}
