//! Shared limits and syntax patterns
//!
//! Bounds and regular expressions reused by the disk and service-account
//! request validators.

use regex::Regex;
use std::sync::LazyLock;

/// Minimum length of a resource name, in characters
pub const MIN_NAME_LENGTH: usize = 3;

/// Maximum length of a resource name, in characters
pub const MAX_NAME_LENGTH: usize = 27;

/// Largest disk that can be requested, in GiB
pub const DISK_MAX_SIZE: i64 = 20;

/// Service-account id length bounds, in characters
pub const SID_MIN_LENGTH: usize = 3;
pub const SID_MAX_LENGTH: usize = 20;

/// Service-account display names may be longer than resource names
pub const SERVICE_ACCOUNT_NAME_MAX_LENGTH: usize = 60;

/// Lowercase letter first, then letters, digits or hyphens, no trailing hyphen
pub const RE_VALID_NAME_STR: &str = r"^[a-z](?:[-a-z0-9]*[a-z0-9])?$";

/// Same shape as resource names; length is bounded separately
pub const RE_VALID_SID_STR: &str = r"^[a-z](?:[-a-z0-9]*[a-z0-9])?$";

pub static RE_VALID_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(RE_VALID_NAME_STR).expect("RE_VALID_NAME_STR is a valid regex pattern")
});

pub static RE_VALID_SID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(RE_VALID_SID_STR).expect("RE_VALID_SID_STR is a valid regex pattern")
});
