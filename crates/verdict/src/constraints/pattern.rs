//! Pattern-matching constraints.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap()
});

// ============================================================================
// MATCHES
// ============================================================================

crate::constraint! {
    /// Passes when the string matches a caller-supplied regular expression.
    ///
    /// Takes a prebuilt [`Regex`] so pattern compilation errors surface where
    /// the pattern is written, not inside the rule chain.
    pub Matches { pattern: Regex } for str;
    rule(self, value) { self.pattern.is_match(value) }
    message(self, value) { "Value does not match the required pattern" }
}

// ============================================================================
// EMAIL ADDRESS
// ============================================================================

crate::constraint! {
    /// Passes when the string looks like an email address.
    ///
    /// Uses a pragmatic HTML5-style pattern rather than full RFC 5322.
    pub EmailAddress { pattern: Regex } for str;
    rule(self, value) { self.pattern.is_match(value) }
    message(self, value) { "Not a valid email address" }
    new() {
        Self {
            pattern: EMAIL_REGEX.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::constraints::Constraint;

    #[test]
    fn matches_uses_the_supplied_pattern() {
        let atom = Matches::new(Regex::new(r"^\d{3}-\d{4}$").unwrap());
        assert_eq!(atom.check("123-4567"), None);
        assert_eq!(
            atom.check("1234567").as_deref(),
            Some("Value does not match the required pattern"),
        );
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last@sub.example.co", true)]
    #[case("user+tag@example.com", true)]
    #[case("", false)]
    #[case("invalid", false)]
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("user@.com", false)]
    fn email_address_cases(#[case] input: &str, #[case] valid: bool) {
        let outcome = EmailAddress::new().check(input);
        assert_eq!(outcome.is_none(), valid, "input: {input:?}");
        if !valid {
            assert_eq!(outcome.as_deref(), Some("Not a valid email address"));
        }
    }
}
