//! Canonical forms for identity fields.
//!
//! Two values that identify the same person must normalize to the same
//! string. Normalizers never fail; a value that cannot be normalized is
//! treated as absent.

use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use phonenumber::{Mode, country};
use regex::Regex;

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D").expect("Invalid non-digit regex"));

/// Lowercases and trims an email address.
///
/// Returns `None` when nothing is left.
pub fn normalize_email(raw: &str) -> Option<String> {
    let normalized = raw.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}

/// Normalizes a phone number to E.164.
///
/// Numbers without a country prefix are read in `region`. Anything that
/// does not parse into a valid number falls back to its digits only, so
/// `"555-123-4567"` and `"5551234567"` still compare equal. Returns `None`
/// when the value holds no digits at all.
pub fn normalize_phone(raw: &str, region: Option<country::Id>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Parser panics degrade to the digits-only form like any other parse failure.
    let parsed = panic::catch_unwind(AssertUnwindSafe(|| phonenumber::parse(region, trimmed)));
    if let Ok(Ok(number)) = parsed
        && phonenumber::is_valid(&number)
    {
        return Some(number.format().mode(Mode::E164).to_string());
    }

    digits_only(trimmed)
}

fn digits_only(raw: &str) -> Option<String> {
    let digits = NON_DIGITS.replace_all(raw, "");
    (!digits.is_empty()).then(|| digits.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  John.Doe@Example.COM "),
            Some("john.doe@example.com".to_string())
        );
        assert_eq!(normalize_email("   "), None);
        assert_eq!(normalize_email(""), None);
    }

    #[test]
    fn test_us_formats_normalize_identically() {
        let region = Some(country::Id::US);
        let dashed = normalize_phone("555-123-4567", region);
        let plain = normalize_phone("5551234567", region);

        assert!(dashed.is_some());
        assert_eq!(dashed, plain);
    }

    #[test]
    fn test_valid_number_formats_as_e164() {
        let region = Some(country::Id::US);
        assert_eq!(
            normalize_phone("(201) 555-0123", region),
            Some("+12015550123".to_string())
        );
        assert_eq!(
            normalize_phone("+1 201 555 0123", region),
            Some("+12015550123".to_string())
        );
    }

    #[test]
    fn test_invalid_number_falls_back_to_digits() {
        assert_eq!(
            normalize_phone("ext. 12-34", Some(country::Id::US)),
            Some("1234".to_string())
        );
        assert_eq!(normalize_phone("12-34", None), Some("1234".to_string()));
    }

    #[test]
    fn test_phone_without_digits_is_absent() {
        assert_eq!(normalize_phone("n/a", Some(country::Id::US)), None);
        assert_eq!(normalize_phone("  ", Some(country::Id::US)), None);
    }
}
