//! Property-based tests using proptest
//!
//! These tests check the request validation rules and the identifier
//! encoding against randomized inputs.

use cloudapi::constants::{DISK_MAX_SIZE, MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use cloudapi::disk::{DiskCreate, DiskDelete, DiskMetrics, DiskMetricsTimeRange};
use cloudapi::service_account::ServiceAccountCreate;
use cloudapi::{Error, Id, Validate};
use proptest::prelude::*;

/// Names matching the name pattern, within the length bounds
fn arb_valid_name() -> impl Strategy<Value = String> {
    let max_middle = MAX_NAME_LENGTH - 2;
    let min_middle = MIN_NAME_LENGTH.saturating_sub(2);
    (
        "[a-z]",
        proptest::collection::vec(
            prop_oneof![Just('-'), proptest::char::range('a', 'z'), proptest::char::range('0', '9')],
            min_middle..=max_middle,
        ),
        "[a-z0-9]",
    )
        .prop_map(|(first, middle, last)| {
            let middle: String = middle.into_iter().collect();
            format!("{}{}{}", first, middle, last)
        })
}

fn disk_create(name: String, size: i64) -> DiskCreate {
    DiskCreate {
        location: "bkk".into(),
        project: "acme".into(),
        name,
        size,
    }
}

fn size_errors(err: &Error) -> usize {
    err.validation_errors()
        .map(|errs| errs.field("size").len())
        .unwrap_or(0)
}

proptest! {
    /// Every pattern-valid, in-bounds name with an in-range size passes
    #[test]
    fn valid_disk_create_accepted(name in arb_valid_name(), size in 1..=DISK_MAX_SIZE) {
        let mut m = disk_create(name, size);
        prop_assert!(m.validate().is_ok());
    }

    /// Surrounding whitespace never changes the outcome
    #[test]
    fn padded_names_are_trimmed(name in arb_valid_name(), pad in "[ \t]{0,3}") {
        let mut m = disk_create(format!("{}{}{}", pad, name, pad), 1);
        prop_assert!(m.validate().is_ok());
        prop_assert_eq!(m.name, name);
    }

    /// Size violations are reported exactly outside [1, DISK_MAX_SIZE]
    #[test]
    fn disk_size_bounds(size in -10i64..=(DISK_MAX_SIZE + 10)) {
        let result = disk_create("data".into(), size).validate();
        let in_range = (1..=DISK_MAX_SIZE).contains(&size);
        match result {
            Ok(()) => prop_assert!(in_range),
            Err(err) => {
                prop_assert!(!in_range);
                prop_assert_eq!(size_errors(&err), 1);
            }
        }
    }

    /// Names starting with a digit or a hyphen are rejected
    #[test]
    fn bad_leading_character_rejected(first in "[0-9-]", rest in "[a-z]{2,10}") {
        let mut m = disk_create(format!("{}{}", first, rest), 1);
        prop_assert!(m.validate().is_err());
    }

    /// Over-long names are rejected on the non-aggregated path
    #[test]
    fn disk_delete_long_name(extra in 1usize..20) {
        let mut m = DiskDelete {
            location: "bkk".into(),
            project: "acme".into(),
            name: "a".repeat(MAX_NAME_LENGTH + extra),
        };
        let err = m.validate().unwrap_err();
        let is_invalid_name = matches!(err, Error::InvalidField { field: "name" });
        prop_assert!(is_invalid_name, "unexpected error: {:?}", err);
    }

    /// Only the seven supported windows pass
    #[test]
    fn metrics_time_range(token in "[0-9]{1,2}[hdm]") {
        let mut m = DiskMetrics {
            location: "bkk".into(),
            project: "acme".into(),
            name: "data".into(),
            time_range: DiskMetricsTimeRange::from(token.as_str()),
        };
        let supported = ["1h", "6h", "12h", "1d", "2d", "7d", "30d"].contains(&token.as_str());
        prop_assert_eq!(m.validate().is_ok(), supported);
    }

    /// SID length must be within [3, 20]
    #[test]
    fn sid_length_bounds(len in 1usize..=30) {
        let mut m = ServiceAccountCreate {
            project: "acme".into(),
            sid: "a".repeat(len),
            name: "Deploy Bot".into(),
            description: String::new(),
        };
        prop_assert_eq!(m.validate().is_ok(), (3..=20).contains(&len));
    }

    /// Identifiers survive JSON encoding regardless of magnitude
    #[test]
    fn id_round_trip(n in any::<i64>()) {
        let encoded = serde_json::to_string(&Id::new(n)).unwrap();
        prop_assert_eq!(&encoded, &format!("\"{}\"", n));
        prop_assert_eq!(Id::decode(encoded.as_bytes()).unwrap(), Id::new(n));
    }

    /// Bare numbers decode to the same identifier as their quoted form
    #[test]
    fn id_accepts_bare_numbers(n in any::<i64>()) {
        let bare = Id::decode(n.to_string().as_bytes()).unwrap();
        let quoted = Id::decode(format!("\"{}\"", n).as_bytes()).unwrap();
        prop_assert_eq!(bare, quoted);
    }
}

#[test]
fn sid_edge_lengths() {
    for (len, ok) in [(2, false), (3, true), (20, true), (21, false)] {
        let mut m = ServiceAccountCreate {
            project: "acme".into(),
            sid: "s".repeat(len),
            name: "Deploy Bot".into(),
            description: String::new(),
        };
        assert_eq!(m.validate().is_ok(), ok, "sid length {}", len);
    }
}

#[test]
fn id_precision_guard() {
    let id = Id::new(9_007_199_254_740_993);
    let encoded = serde_json::to_vec(&id).unwrap();
    assert_eq!(Id::decode(&encoded).unwrap().as_i64(), 9_007_199_254_740_993);
}
