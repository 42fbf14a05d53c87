//! Generic component versions used by `added_in` tags.

use crate::error::{ConvertError, Result};

/// Parses a generic version such as `v1.19`, `1.19.0` or `v1.20.0-beta.1`.
///
/// At least major and minor are required; a missing patch is taken as 0.
pub fn parse_generic(input: &str) -> Result<semver::Version> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let (core, extra) = match trimmed.find(|c: char| c == '-' || c == '+') {
        Some(i) => trimmed.split_at(i),
        None => (trimmed, ""),
    };

    let parts: Vec<&str> = core.split('.').collect();
    let numeric = parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if parts.len() < 2 || parts.len() > 3 || !numeric {
        return Err(ConvertError::malformed(format!(
            "illegal version string {:?}",
            input
        )));
    }

    let padded = format!(
        "{}.{}.{}{}",
        parts[0],
        parts[1],
        parts.get(2).copied().unwrap_or("0"),
        extra
    );
    semver::Version::parse(&padded)
        .map_err(|e| ConvertError::malformed(format!("illegal version string {:?}: {}", input, e)))
}
