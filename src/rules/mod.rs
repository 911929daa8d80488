//! Heuristic rules
//!
//! Each rule checks one independent aspect of a password and always yields a
//! verdict, whatever the input.

mod length;
mod pattern;
mod variety;

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

use crate::config::HeuristicConfig;

pub use length::length_rule;
pub use pattern::{
    common_patterns_rule, repeated_chars_rule, sequential_chars_rule, COMMON_PATTERNS,
};
pub use variety::{digits_rule, lowercase_rule, special_chars_rule, uppercase_rule, SPECIAL_CHARS};

/// Signature shared by every rule function.
pub type RuleFn = fn(&SecretString, &HeuristicConfig) -> RuleCheckResult;

/// The heuristic rules, declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    Length,
    Uppercase,
    Lowercase,
    Digits,
    SpecialChars,
    CommonPatterns,
    SequentialChars,
    RepeatedChars,
}

impl Rule {
    /// All rules in evaluation order.
    pub const ALL: [Rule; 8] = [
        Rule::Length,
        Rule::Uppercase,
        Rule::Lowercase,
        Rule::Digits,
        Rule::SpecialChars,
        Rule::CommonPatterns,
        Rule::SequentialChars,
        Rule::RepeatedChars,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Rule::Length => "length",
            Rule::Uppercase => "uppercase",
            Rule::Lowercase => "lowercase",
            Rule::Digits => "digits",
            Rule::SpecialChars => "special_chars",
            Rule::CommonPatterns => "common_patterns",
            Rule::SequentialChars => "sequential_chars",
            Rule::RepeatedChars => "repeated_chars",
        }
    }

    /// The function implementing this rule.
    pub fn check_fn(self) -> RuleFn {
        match self {
            Rule::Length => length_rule,
            Rule::Uppercase => uppercase_rule,
            Rule::Lowercase => lowercase_rule,
            Rule::Digits => digits_rule,
            Rule::SpecialChars => special_chars_rule,
            Rule::CommonPatterns => common_patterns_rule,
            Rule::SequentialChars => sequential_chars_rule,
            Rule::RepeatedChars => repeated_chars_rule,
        }
    }

    /// Checklist message for this rule. Only `length` depends on the config.
    pub fn message(self, config: &HeuristicConfig) -> String {
        match self {
            Rule::Length => format!(
                "Password should be at least {} characters long.",
                config.min_length
            ),
            Rule::Uppercase => "Password should contain at least one uppercase letter.".to_string(),
            Rule::Lowercase => "Password should contain at least one lowercase letter.".to_string(),
            Rule::Digits => "Password should contain at least one digit.".to_string(),
            Rule::SpecialChars => {
                "Password should contain at least one special character.".to_string()
            }
            Rule::CommonPatterns => {
                "Password should not contain common patterns or words.".to_string()
            }
            Rule::SequentialChars => {
                "Password should not contain sequential characters.".to_string()
            }
            Rule::RepeatedChars => "Password should not contain repeated characters.".to_string(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown rule: {0}")]
pub struct ParseRuleError(pub String);

impl FromStr for Rule {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.name() == s)
            .ok_or_else(|| ParseRuleError(s.to_string()))
    }
}

/// Verdict of a single rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCheckResult {
    pub passed: bool,
    pub message: String,
}

impl RuleCheckResult {
    pub(crate) fn new(rule: Rule, passed: bool, config: &HeuristicConfig) -> Self {
        Self {
            passed,
            message: rule.message(config),
        }
    }
}
