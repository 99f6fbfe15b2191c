//! Small input checks shared by registration and entity forms.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid regex"));

/// Loose email shape check: something, `@`, something, `.`, something.
///
/// Matches anywhere in the input, so surrounding text is tolerated.
pub fn is_valid_email(input: &str) -> bool {
    EMAIL_SHAPE.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compiles() {
        assert_eq!(LazyLock::force(&EMAIL_SHAPE).as_str(), r"\S+@\S+\.\S+");
    }

    #[test]
    fn test_accepts_common_addresses() {
        assert!(is_valid_email("vet@clinic.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("vet"));
        assert!(!is_valid_email("vet@clinic"));
        assert!(!is_valid_email("@."));
        assert!(!is_valid_email("vet @clinic.com"));
    }
}
