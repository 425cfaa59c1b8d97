//! Individual field generators.
//!
//! Each generator draws from the caller's seeded RNG so a user's fields are
//! fully determined by the generator seed and the record index.

pub mod address;
pub mod email;
pub mod name;

/// Remove characters that would break the unquoted CSV export.
pub(crate) fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != ',' && *c != '\n' && *c != '\r')
        .collect::<String>()
        .trim()
        .to_string()
}
