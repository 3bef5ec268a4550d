//! Donor identifier generation.
//!
//! Donor identifiers are short human-quotable tokens (printed on the QR
//! payload and read back over the phone), not security credentials: a fixed
//! `DON` prefix followed by eight uppercase-alphanumeric characters, e.g.
//! `DON4B7X9K2A`. Generation is pure and stateless; uniqueness against the
//! store is enforced by the caller's existence-check loop in
//! [`crate::db::handlers::DonorLocations::generate_unique_donor_id`].

use rand::Rng;

/// Fixed prefix for all donor identifiers.
pub const DONOR_ID_PREFIX: &str = "DON";

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 8;

/// Generate a candidate donor identifier: `DON` + 8 uniformly random
/// uppercase-alphanumeric characters.
pub fn generate_donor_id() -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(DONOR_ID_PREFIX.len() + SUFFIX_LEN);
    id.push_str(DONOR_ID_PREFIX);
    for _ in 0..SUFFIX_LEN {
        let idx = rng.random_range(0..ALPHABET.len());
        id.push(ALPHABET[idx] as char);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_prefix_and_length() {
        let id = generate_donor_id();
        assert!(id.starts_with(DONOR_ID_PREFIX));
        assert_eq!(id.len(), DONOR_ID_PREFIX.len() + SUFFIX_LEN);
    }

    #[test]
    fn suffix_stays_within_alphabet() {
        for _ in 0..100 {
            let id = generate_donor_id();
            let suffix = &id[DONOR_ID_PREFIX.len()..];
            assert!(suffix.bytes().all(|b| ALPHABET.contains(&b)), "bad id {id}");
        }
    }

    #[test]
    fn consecutive_ids_differ() {
        // 36^8 values; a repeat here would indicate a broken RNG hookup.
        let a = generate_donor_id();
        let b = generate_donor_id();
        assert_ne!(a, b);
    }
}
