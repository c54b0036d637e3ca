//! Canonical request hashing
//!
//! Two retries of the same logical write must produce the same digest, and
//! any change to a significant field must produce a different one. The
//! digest covers `{amount, assetTypeId, reference}` with keys in
//! lexicographic order; `initiated_by` and `metadata` are deliberately
//! excluded, so retries differing only there are treated as duplicates.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// SHA-256 hex digest over the canonical encoding of the significant
/// write-request fields.
pub fn hash_request(asset_type_id: Uuid, amount: Decimal, reference: &str) -> String {
    // Single JSON text form, keys sorted: amount < assetTypeId < reference.
    let canonical = format!(
        r#"{{"amount":"{}","assetTypeId":"{}","reference":{}}}"#,
        canonical_amount(amount),
        asset_type_id,
        serde_json::Value::String(reference.to_owned()),
    );

    hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Canonical amount rendering: no trailing zeros, no exponent.
///
/// "500", "500.0" and "500.00000000" all hash identically.
fn canonical_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn asset() -> Uuid {
        Uuid::from_u128(0x1234_5678_9abc_def0)
    }

    #[test]
    fn test_digest_is_64_hex_chars() {
        let digest = hash_request(asset(), Decimal::from(500), "PAY-1");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_equivalent_amounts_hash_identically() {
        let plain = hash_request(asset(), Decimal::from_str("500").unwrap(), "PAY-1");
        let scaled = hash_request(asset(), Decimal::from_str("500.00000000").unwrap(), "PAY-1");
        let fractional = hash_request(asset(), Decimal::from_str("500.0").unwrap(), "PAY-1");

        assert_eq!(plain, scaled);
        assert_eq!(plain, fractional);
    }

    #[test]
    fn test_any_significant_field_changes_digest() {
        let base = hash_request(asset(), Decimal::from(500), "PAY-1");

        assert_ne!(base, hash_request(asset(), Decimal::from(600), "PAY-1"));
        assert_ne!(base, hash_request(asset(), Decimal::from(500), "PAY-2"));
        assert_ne!(
            base,
            hash_request(Uuid::from_u128(42), Decimal::from(500), "PAY-1")
        );
    }

    #[test]
    fn test_reference_is_json_escaped() {
        // A reference containing quotes must not corrupt the canonical form
        let tricky = hash_request(asset(), Decimal::from(1), r#"PAY-"1""#);
        let plain = hash_request(asset(), Decimal::from(1), "PAY-1");
        assert_ne!(tricky, plain);
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = hash_request(asset(), Decimal::from_str("12.34500000").unwrap(), "ORD-77");
        let b = hash_request(asset(), Decimal::from_str("12.345").unwrap(), "ORD-77");
        assert_eq!(a, b);
    }
}
