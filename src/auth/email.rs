//! Email address check used by the login form.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^[a-z0-9.]+@[a-z0-9]+\.[a-z]+(\.[a-z]+)?$")
        .case_insensitive(true)
        .build()
        .expect("email pattern compiles")
});

/// `local@domain.tld`, optionally with a second suffix (`.com.br`).
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_addresses() {
        for email in [
            "player@games.com",
            "first.last@studio.io",
            "ADMIN@Example.COM",
            "dev42@mail.com.br",
            "a@b.c",
        ] {
            assert!(is_valid_email(email), "{email} should pass");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for email in [
            "bad-email",
            "player.games.com",
            "player@games",
            "player@games.",
            "@games.com",
            "player@games.com.br.pt",
            "player+tag@games.com",
            "player@my-games.com",
            "play er@games.com",
            " player@games.com",
            "player@games.c0m",
            "",
        ] {
            assert!(!is_valid_email(email), "{email} should fail");
        }
    }
}
