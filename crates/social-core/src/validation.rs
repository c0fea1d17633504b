//! Input format checks shared by the services.

use std::sync::OnceLock;

use regex::Regex;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = concat!(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@",
            r"[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
            r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Local part from the permitted character class, then dot-separated domain
/// labels of up to 63 characters that neither start nor end with `-`.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test@example.es"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(is_valid_email("user@localhost"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("orlmicron"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user@-example.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("user@example.com."));
    }
}
