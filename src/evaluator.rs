//! Heuristic evaluator - runs every enabled rule and collects the checklist.

use secrecy::SecretString;

use crate::config::HeuristicConfig;
use crate::report::HeuristicReport;
use crate::rules::Rule;

/// Evaluates a password against the heuristic rules.
///
/// Every enabled rule is run, in [`Rule::ALL`] order, whether or not an
/// earlier one failed. Rules disabled in `config` are absent from the report.
///
/// # Arguments
/// * `password` - The password to evaluate
/// * `config` - Rule flags and thresholds
pub fn evaluate(password: &SecretString, config: &HeuristicConfig) -> HeuristicReport {
    let mut report = HeuristicReport::default();

    for rule in Rule::ALL {
        if !config.is_enabled(rule) {
            continue;
        }
        let result = (rule.check_fn())(password, config);

        #[cfg(feature = "tracing")]
        tracing::trace!(rule = rule.name(), passed = result.passed, "rule evaluated");

        report.push(rule, result);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        evaluated = report.len(),
        failed = report.failed_count(),
        "heuristic evaluation finished"
    );

    report
}
