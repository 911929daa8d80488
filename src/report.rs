//! Heuristic report - ordered rule verdicts.

use crate::rules::{Rule, RuleCheckResult};

/// Verdicts of every enabled rule, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeuristicReport {
    entries: Vec<(Rule, RuleCheckResult)>,
}

impl HeuristicReport {
    /// Appends a verdict. Rules must be pushed in [`Rule::ALL`] order, once each.
    pub(crate) fn push(&mut self, rule: Rule, result: RuleCheckResult) {
        debug_assert!(
            self.entries.last().is_none_or(|(last, _)| *last < rule),
            "rule {} pushed out of order",
            rule
        );
        self.entries.push((rule, result));
    }

    pub fn get(&self, rule: Rule) -> Option<&RuleCheckResult> {
        self.entries
            .iter()
            .find(|(r, _)| *r == rule)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rule, &RuleCheckResult)> {
        self.entries.iter().map(|(rule, result)| (*rule, result))
    }

    pub fn rules(&self) -> impl Iterator<Item = Rule> + '_ {
        self.entries.iter().map(|(rule, _)| *rule)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn passed_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.passed_count()
    }

    pub fn failed_rules(&self) -> Vec<Rule> {
        self.entries
            .iter()
            .filter(|(_, r)| !r.passed)
            .map(|(rule, _)| *rule)
            .collect()
    }

    pub fn all_passed(&self) -> bool {
        self.entries.iter().all(|(_, r)| r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeuristicConfig;

    fn result(rule: Rule, passed: bool) -> RuleCheckResult {
        RuleCheckResult::new(rule, passed, &HeuristicConfig::default())
    }

    #[test]
    fn test_counts_and_failed_rules() {
        let mut report = HeuristicReport::default();
        report.push(Rule::Length, result(Rule::Length, true));
        report.push(Rule::Digits, result(Rule::Digits, false));
        report.push(Rule::RepeatedChars, result(Rule::RepeatedChars, false));

        assert_eq!(report.len(), 3);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 2);
        assert_eq!(report.failed_rules(), vec![Rule::Digits, Rule::RepeatedChars]);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_get_missing_rule() {
        let mut report = HeuristicReport::default();
        report.push(Rule::Length, result(Rule::Length, true));

        assert!(report.get(Rule::Length).is_some());
        assert!(report.get(Rule::Uppercase).is_none());
    }

    #[test]
    fn test_empty_report() {
        let report = HeuristicReport::default();
        assert!(report.is_empty());
        assert!(report.all_passed());
        assert_eq!(report.failed_count(), 0);
    }
}
