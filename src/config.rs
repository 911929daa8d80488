//! Heuristic configuration.

use crate::rules::Rule;

/// Default minimum password length, in characters.
pub const DEFAULT_MIN_LENGTH: usize = 8;

/// Enables rules and sets thresholds for [`evaluate`](crate::evaluate).
///
/// A `require_*`/`check_*` flag set to `false` removes the matching rule from
/// the report entirely; it is not reported as passed. The `length` rule has no
/// flag and is always evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicConfig {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digits: bool,
    pub require_special: bool,
    pub check_common_patterns: bool,
    pub check_sequential: bool,
    pub check_repeated: bool,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            require_uppercase: true,
            require_lowercase: true,
            require_digits: true,
            require_special: true,
            check_common_patterns: true,
            check_sequential: true,
            check_repeated: true,
        }
    }
}

impl HeuristicConfig {
    /// Returns whether `rule` takes part in evaluation.
    pub fn is_enabled(&self, rule: Rule) -> bool {
        match rule {
            Rule::Length => true,
            Rule::Uppercase => self.require_uppercase,
            Rule::Lowercase => self.require_lowercase,
            Rule::Digits => self.require_digits,
            Rule::SpecialChars => self.require_special,
            Rule::CommonPatterns => self.check_common_patterns,
            Rule::SequentialChars => self.check_sequential,
            Rule::RepeatedChars => self.check_repeated,
        }
    }

    /// Turns off the flag backing `rule`. Disabling `length` is a no-op.
    pub fn disable(&mut self, rule: Rule) {
        match rule {
            Rule::Length => {}
            Rule::Uppercase => self.require_uppercase = false,
            Rule::Lowercase => self.require_lowercase = false,
            Rule::Digits => self.require_digits = false,
            Rule::SpecialChars => self.require_special = false,
            Rule::CommonPatterns => self.check_common_patterns = false,
            Rule::SequentialChars => self.check_sequential = false,
            Rule::RepeatedChars => self.check_repeated = false,
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }
}
