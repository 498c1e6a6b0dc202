//! Compute hash over the inputs that determine a profile.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::record::ProfileRow;

/// Canonical hash input. Field order is fixed by the struct.
#[derive(Serialize)]
struct HashInput<'a> {
    birth_date: Option<&'a str>,
    birth_time: Option<&'a str>,
    iana_time_zone: Option<&'a str>,
    fold: Option<u8>,
    birth_lat: Option<f64>,
    birth_lng: Option<f64>,
    strict: bool,
}

/// Hex SHA-256 of the birth fields plus the strict-mode flag.
pub fn compute_hash(row: &ProfileRow, strict: bool) -> Result<String, serde_json::Error> {
    let input = HashInput {
        birth_date: row.birth_date.as_deref(),
        birth_time: if row.birth_time_unknown {
            None
        } else {
            row.birth_time.as_deref()
        },
        iana_time_zone: row.iana_time_zone.as_deref(),
        fold: row.fold,
        birth_lat: row.birth_lat,
        birth_lng: row.birth_lng,
        strict,
    };
    let bytes = serde_json::to_vec(&input)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> ProfileRow {
        ProfileRow {
            birth_date: Some("1980-06-24".into()),
            birth_time: Some("15:20".into()),
            iana_time_zone: Some("Europe/Berlin".into()),
            birth_lat: Some(52.3759),
            birth_lng: Some(9.732),
            ..ProfileRow::new("s")
        }
    }

    #[test]
    fn stable_and_hex() {
        let a = compute_hash(&row(), true).unwrap();
        assert_eq!(a, compute_hash(&row(), true).unwrap());
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn sensitive_to_inputs_and_policy() {
        let base = compute_hash(&row(), true).unwrap();
        assert_ne!(base, compute_hash(&row(), false).unwrap());
        let mut r = row();
        r.fold = Some(1);
        assert_ne!(base, compute_hash(&r, true).unwrap());
    }

    #[test]
    fn ignores_stored_outputs() {
        let mut r = row();
        r.compute_hash = Some("x".into());
        r.result = Some(serde_json::json!({"a": 1}));
        assert_eq!(compute_hash(&row(), true).unwrap(), compute_hash(&r, true).unwrap());
    }
}
