//! Presence validation for payloads.
//!
//! A field is present when it is "truthy": strings must be non-empty and
//! numbers must be finite and non-zero. Zero can be admitted through
//! [`ValidationRules::allow_zero`]; NaN and infinities never can, since they
//! have no JSON representation and would not survive a round trip through
//! the file store.

use crate::domain::error::DomainError;

/// Knobs for payload validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationRules {
    /// Treat `0` as a legitimate numeric value instead of an empty field.
    pub allow_zero: bool,
}

impl ValidationRules {
    pub fn text_present(&self, value: &str) -> bool {
        !value.is_empty()
    }

    pub fn number_present(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.allow_zero || value != 0.0
    }
}

/// Input shape that can be checked before touching any store.
pub trait Validate {
    /// Returns `true` when every required field is present under `rules`.
    fn fields_present(&self, rules: &ValidationRules) -> bool;

    fn validate(&self, rules: &ValidationRules) -> Result<(), DomainError> {
        if self.fields_present(rules) {
            Ok(())
        } else {
            Err(DomainError::empty_fields())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, false, false)]
    #[case(-0.0, false, false)]
    #[case(f64::NAN, false, false)]
    #[case(0.0, true, true)]
    #[case(f64::NAN, true, false)]
    #[case(f64::INFINITY, false, false)]
    #[case(f64::NEG_INFINITY, false, false)]
    #[case(f64::INFINITY, true, false)]
    #[case(-3.5, false, true)]
    #[case(42.0, false, true)]
    fn given_number_when_checking_presence_then_follows_rules(
        #[case] value: f64,
        #[case] allow_zero: bool,
        #[case] expected: bool,
    ) {
        let rules = ValidationRules { allow_zero };
        assert_eq!(rules.number_present(value), expected);
    }

    #[rstest]
    #[case("", false)]
    #[case(" ", true)]
    #[case("Oak", true)]
    fn given_text_when_checking_presence_then_only_empty_is_missing(
        #[case] value: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(ValidationRules::default().text_present(value), expected);
    }
}
