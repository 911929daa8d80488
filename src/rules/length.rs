//! Length rule - checks password minimum length.

use secrecy::{ExposeSecret, SecretString};

use super::{Rule, RuleCheckResult};
use crate::config::HeuristicConfig;

/// Checks that the password has at least `config.min_length` characters.
///
/// Length is counted in Unicode scalar values, not bytes.
pub fn length_rule(password: &SecretString, config: &HeuristicConfig) -> RuleCheckResult {
    let passed = password.expose_secret().chars().count() >= config.min_length;
    RuleCheckResult::new(Rule::Length, passed, config)
}
