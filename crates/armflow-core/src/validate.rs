//! Field validators
//!
//! Pure checks used by resource schemas before any remote call is made.
//! Each returns a [`ValidationError`] keyed by the field name.

use crate::error::ValidationError;
use crate::id::ResourceId;
use regex::Regex;
use std::sync::LazyLock;

type Result = std::result::Result<(), ValidationError>;

static STORAGE_ACCOUNT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]{3,24}$").expect("valid regex"));
static STORAGE_SHARE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([a-z0-9]|-[a-z0-9]){1,61}[a-z0-9]?$").expect("valid regex"));
static RESOURCE_GROUP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\w._()]{1,90}$").expect("valid regex"));
static DATA_SHARE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w{2,90}$").expect("valid regex"));
static DATA_SET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]{2,90}$").expect("valid regex"));
static MAINTENANCE_CONFIGURATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,126}[A-Za-z0-9_]?$").expect("valid regex"));

pub fn is_uuid(value: &str, key: &str) -> Result {
    uuid::Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new(key, format!("{value:?} is not a valid UUID")))
}

pub fn no_empty_strings(value: &str, key: &str) -> Result {
    if value.trim().is_empty() {
        return Err(ValidationError::new(key, "must not be empty"));
    }
    Ok(())
}

pub fn storage_account_name(value: &str, key: &str) -> Result {
    if !STORAGE_ACCOUNT_NAME.is_match(value) {
        return Err(ValidationError::new(
            key,
            "can only consist of lowercase letters and numbers, and must be between 3 and 24 characters long",
        ));
    }
    Ok(())
}

/// Share names are 3-63 characters of lowercase letters, numbers and single hyphens,
/// starting and ending with a letter or number.
pub fn storage_share_name(value: &str, key: &str) -> Result {
    if value.len() < 3 || value.len() > 63 {
        return Err(ValidationError::new(
            key,
            "must be between 3 and 63 characters long",
        ));
    }
    if !STORAGE_SHARE_NAME.is_match(value) || value.ends_with('-') || value.contains("--") {
        return Err(ValidationError::new(
            key,
            "only lowercase alphanumeric characters and single hyphens are allowed, and it must start and end with a letter or number",
        ));
    }
    Ok(())
}

pub fn resource_group_name(value: &str, key: &str) -> Result {
    if !RESOURCE_GROUP_NAME.is_match(value) {
        return Err(ValidationError::new(
            key,
            "may only contain alphanumeric characters, dash, underscores, parentheses and periods, and be between 1 and 90 characters",
        ));
    }
    if value.ends_with('.') {
        return Err(ValidationError::new(key, "cannot end in a period"));
    }
    Ok(())
}

pub fn data_share_name(value: &str, key: &str) -> Result {
    if !DATA_SHARE_NAME.is_match(value) {
        return Err(ValidationError::new(
            key,
            "can only contain alphanumeric characters and _, and must be between 2 and 90 characters long",
        ));
    }
    Ok(())
}

pub fn data_set_name(value: &str, key: &str) -> Result {
    if !DATA_SET_NAME.is_match(value) {
        return Err(ValidationError::new(
            key,
            "can only contain alphanumeric characters, - and _, and must be between 2 and 90 characters long",
        ));
    }
    Ok(())
}

pub fn maintenance_configuration_name(value: &str, key: &str) -> Result {
    if !MAINTENANCE_CONFIGURATION_NAME.is_match(value) {
        return Err(ValidationError::new(
            key,
            "must start with a letter or number, contain only letters, numbers, `_`, `.` and `-`, and be at most 128 characters long",
        ));
    }
    Ok(())
}

pub fn string_in_slice(value: &str, key: &str, allowed: &[&str], ignore_case: bool) -> Result {
    let found = allowed.iter().any(|a| {
        if ignore_case {
            a.eq_ignore_ascii_case(value)
        } else {
            *a == value
        }
    });
    if !found {
        return Err(ValidationError::new(
            key,
            format!("expected one of [{}], got {value:?}", allowed.join(", ")),
        ));
    }
    Ok(())
}

/// Validate that `value` is a `T` id, using the strict parser.
pub fn resource_id<T: ResourceId>(value: &str, key: &str) -> Result {
    T::parse(value)
        .map(|_| ())
        .map_err(|e| ValidationError::new(key, e.to_string()))
}
