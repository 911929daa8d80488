//! Password auditing library
//!
//! This library audits passwords with three independent signals: a
//! heuristic rule checklist, a breach-fingerprint lookup and a pluggable
//! strength classifier.
//!
//! # Features
//!
//! - `async` (default): Enables batch auditing with cancellation support
//! - `tracing`: Enables logging via tracing crate
//! - `cli`: Builds the interactive `pwd-audit` binary
//!
//! # Environment Variables
//!
//! - `PWD_BREACH_CORPUS_PATH`: Custom path to the breach fingerprint file
//!   (default: `./assets/breached-fingerprints.txt`)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pwd_audit::{
//!     train_classifier, Auditor, BreachChecker, FingerprintSet, HeuristicConfig, TrainingSet,
//! };
//! use secrecy::SecretString;
//!
//! // Build shared state once at startup
//! let corpus = FingerprintSet::from_env().unwrap_or_else(|_| FingerprintSet::builtin());
//! let checker = Arc::new(BreachChecker::new(Arc::new(corpus)));
//! let trained = train_classifier(&TrainingSet::default()).expect("Failed to train");
//! println!("Held-out accuracy: {:?}", trained.accuracy);
//!
//! let auditor = Auditor::new(HeuristicConfig::default(), checker)
//!     .with_classifier(Arc::new(trained.adapter));
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let audit = auditor.audit(&password);
//!
//! for (rule, result) in audit.heuristics.iter() {
//!     println!("{}: {}", rule, result.passed);
//! }
//! println!("Verdict: {}", audit.verdict);
//! ```

// Internal modules
mod audit;
mod breach;
mod classifier;
mod config;
mod evaluator;
mod report;
mod rules;

// Public API
pub use audit::{combine, Auditor, PasswordAudit, Verdict};
pub use breach::{
    corpus_path, BreachChecker, BreachError, BreachRecord, BreachSource, BreachStatus,
    DigestAlgorithm, FingerprintSet, CORPUS_PATH_ENV, RANGE_PREFIX_LEN,
};
pub use classifier::{
    train_classifier, train_classifier_with, CentroidModel, Classification, Classifier,
    ClassifierAdapter, ClassifierError, DatasetError, SequenceModel, StrengthClass,
    TrainedClassifier, TrainingSet, Vocabulary, SPLIT_SEED, TEST_FRACTION, UNKNOWN_INDEX,
};
pub use config::{HeuristicConfig, DEFAULT_MIN_LENGTH};
pub use evaluator::evaluate;
pub use report::HeuristicReport;
pub use rules::{ParseRuleError, Rule, RuleCheckResult, COMMON_PATTERNS, SPECIAL_CHARS};

#[cfg(feature = "async")]
pub use audit::audit_batch_tx;
