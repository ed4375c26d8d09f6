//! String emptiness and length constraints.
//!
//! Lengths are measured in Unicode scalar values (`chars().count()`), not
//! bytes, so multi-byte text is counted the way users perceive it.

// ============================================================================
// NOT EMPTY
// ============================================================================

crate::constraint! {
    /// Passes when the string contains at least one non-whitespace character.
    ///
    /// Whitespace-only strings count as empty.
    pub NotEmpty for str;
    rule(value) { !value.trim().is_empty() }
    message(value) { "Value cannot be empty" }
}

// ============================================================================
// LENGTH
// ============================================================================

crate::constraint! {
    /// Passes when the character count lies within `min..=max`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub Length { min: usize, max: usize } for str;
    rule(self, value) {
        let count = value.chars().count();
        count >= self.min && count <= self.max
    }
    message(self, value) {
        format!(
            "Value must be between {} and {} characters long",
            self.min, self.max,
        )
    }
}

// ============================================================================
// MIN LENGTH
// ============================================================================

crate::constraint! {
    /// Passes when the character count is at least `min`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinLength { min: usize } for str;
    rule(self, value) { value.chars().count() >= self.min }
    message(self, value) {
        format!("Value must be at least {} characters long", self.min)
    }
}

// ============================================================================
// MAX LENGTH
// ============================================================================

crate::constraint! {
    /// Passes when the character count is at most `max`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxLength { max: usize } for str;
    rule(self, value) { value.chars().count() <= self.max }
    message(self, value) {
        format!("Value must be no more than {} characters long", self.max)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Constraint;

    #[test]
    fn not_empty_rejects_whitespace_only_strings() {
        assert_eq!(NotEmpty.check("hello"), None);
        assert_eq!(NotEmpty.check(" x "), None);
        assert_eq!(NotEmpty.check("").as_deref(), Some("Value cannot be empty"));
        assert_eq!(NotEmpty.check(" \t\n").as_deref(), Some("Value cannot be empty"));
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let atom = Length::new(2, 4);
        assert!(atom.check("a").is_some());
        assert_eq!(atom.check("ab"), None);
        assert_eq!(atom.check("abcd"), None);
        assert_eq!(
            atom.check("abcde").as_deref(),
            Some("Value must be between 2 and 4 characters long"),
        );
    }

    #[test]
    fn lengths_count_chars_not_bytes() {
        // Four scalar values, far more than four bytes.
        let atom = MaxLength::new(4);
        assert_eq!(atom.check("дом!"), None);

        let min = MinLength::new(5);
        assert_eq!(
            min.check("дом!").as_deref(),
            Some("Value must be at least 5 characters long"),
        );
    }

    #[test]
    fn min_and_max_report_their_own_bounds() {
        assert_eq!(
            MinLength::new(3).check("ab").as_deref(),
            Some("Value must be at least 3 characters long"),
        );
        assert_eq!(
            MaxLength::new(3).check("abcd").as_deref(),
            Some("Value must be no more than 3 characters long"),
        );
    }
}
