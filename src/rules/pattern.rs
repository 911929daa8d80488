//! Pattern rules - detects common words, sequential and repeated characters.

use secrecy::{ExposeSecret, SecretString};

use super::{Rule, RuleCheckResult};
use crate::config::HeuristicConfig;

/// Weak tokens rejected anywhere in the lowercased password.
pub const COMMON_PATTERNS: [&str; 10] = [
    "123456", "password", "qwerty", "abc123", "admin", "welcome", "letmein", "monkey",
    "sunshine", "princess",
];

const ALPHA_RUN: &str = "abcdefghijklmnopqrstuvwxyz";
// `890` is a run, `901` is not.
const DIGIT_RUN: &str = "01234567890";

const RUN_LENGTH: usize = 3;

/// Fails if the lowercased password contains any of [`COMMON_PATTERNS`].
pub fn common_patterns_rule(password: &SecretString, config: &HeuristicConfig) -> RuleCheckResult {
    let lowered = password.expose_secret().to_lowercase();
    let found = COMMON_PATTERNS.iter().any(|p| lowered.contains(p));
    RuleCheckResult::new(Rule::CommonPatterns, !found, config)
}

/// Fails on any three consecutive letters (`abc`..`xyz`) or digits
/// (`012`..`890`). Runs do not wrap around.
pub fn sequential_chars_rule(
    password: &SecretString,
    config: &HeuristicConfig,
) -> RuleCheckResult {
    let chars: Vec<char> = password.expose_secret().to_lowercase().chars().collect();

    let found = chars.windows(RUN_LENGTH).any(|window| {
        let window: String = window.iter().collect();
        ALPHA_RUN.contains(&window) || DIGIT_RUN.contains(&window)
    });

    RuleCheckResult::new(Rule::SequentialChars, !found, config)
}

/// Fails if any character appears three or more times in a row.
pub fn repeated_chars_rule(password: &SecretString, config: &HeuristicConfig) -> RuleCheckResult {
    let chars: Vec<char> = password.expose_secret().chars().collect();

    let found = chars
        .windows(RUN_LENGTH)
        .any(|w| w[0] == w[1] && w[1] == w[2]);

    RuleCheckResult::new(Rule::RepeatedChars, !found, config)
}
