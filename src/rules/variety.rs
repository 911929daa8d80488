//! Character variety rules - uppercase, lowercase, digits, special chars.
//!
//! Character classes are ASCII only: `É` is not uppercase and `٣` is not a
//! digit for these rules.

use secrecy::{ExposeSecret, SecretString};

use super::{Rule, RuleCheckResult};
use crate::config::HeuristicConfig;

/// Characters accepted by the `special_chars` rule.
pub const SPECIAL_CHARS: &str = r#"!@#$%^&*(),.?":{}|<>"#;

fn any_char(password: &SecretString, pred: impl Fn(char) -> bool) -> bool {
    password.expose_secret().chars().any(pred)
}

pub fn uppercase_rule(password: &SecretString, config: &HeuristicConfig) -> RuleCheckResult {
    let passed = any_char(password, |c| c.is_ascii_uppercase());
    RuleCheckResult::new(Rule::Uppercase, passed, config)
}

pub fn lowercase_rule(password: &SecretString, config: &HeuristicConfig) -> RuleCheckResult {
    let passed = any_char(password, |c| c.is_ascii_lowercase());
    RuleCheckResult::new(Rule::Lowercase, passed, config)
}

pub fn digits_rule(password: &SecretString, config: &HeuristicConfig) -> RuleCheckResult {
    let passed = any_char(password, |c| c.is_ascii_digit());
    RuleCheckResult::new(Rule::Digits, passed, config)
}

/// Passes if the password contains one of [`SPECIAL_CHARS`].
pub fn special_chars_rule(password: &SecretString, config: &HeuristicConfig) -> RuleCheckResult {
    let passed = any_char(password, |c| SPECIAL_CHARS.contains(c));
    RuleCheckResult::new(Rule::SpecialChars, passed, config)
}
