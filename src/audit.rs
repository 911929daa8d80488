//! Password audit - combines heuristics, breach status and classification.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::breach::{BreachChecker, BreachStatus};
use crate::classifier::{Classification, Classifier, StrengthClass};
use crate::config::HeuristicConfig;
use crate::evaluator::evaluate;
use crate::report::HeuristicReport;

/// Overall assessment of a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Found in a breach corpus.
    Compromised,
    Weak,
    Strong,
}

impl Verdict {
    pub const fn description(self) -> &'static str {
        match self {
            Verdict::Compromised => "VERY WEAK - Password has been compromised",
            Verdict::Weak => "WEAK - Consider a stronger password",
            Verdict::Strong => "STRONG - Good password choice",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of auditing one password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordAudit {
    pub heuristics: HeuristicReport,
    pub breach: BreachStatus,
    /// `None` when no classifier is configured or it failed.
    pub classification: Option<Classification>,
    pub verdict: Verdict,
}

impl PasswordAudit {
    /// `false` if the verdict was reached without the breach or classifier
    /// signal. A `Strong` verdict is then not proof of safety.
    pub fn is_conclusive(&self) -> bool {
        self.breach != BreachStatus::Unknown && self.classification.is_some()
    }
}

/// Combines the three signals into a verdict.
///
/// - breached: `Compromised`
/// - classified `Weak`, or more than one rule failed: `Weak`
/// - otherwise: `Strong`
pub fn combine(
    heuristics: &HeuristicReport,
    breach: BreachStatus,
    classification: Option<&Classification>,
) -> Verdict {
    if breach.is_breached() {
        return Verdict::Compromised;
    }
    let classified_weak = classification.is_some_and(|c| c.class == StrengthClass::Weak);
    if classified_weak || heuristics.failed_count() > 1 {
        Verdict::Weak
    } else {
        Verdict::Strong
    }
}

/// Runs every check on a password.
#[derive(Clone)]
pub struct Auditor {
    config: HeuristicConfig,
    breach: Arc<BreachChecker>,
    classifier: Option<Arc<dyn Classifier>>,
}

impl fmt::Debug for Auditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auditor")
            .field("config", &self.config)
            .field("breach", &self.breach)
            .field("classifier", &self.classifier.is_some())
            .finish()
    }
}

impl Auditor {
    pub fn new(config: HeuristicConfig, breach: Arc<BreachChecker>) -> Self {
        Self {
            config,
            breach,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    pub fn audit(&self, password: &SecretString) -> PasswordAudit {
        let heuristics = evaluate(password, &self.config);
        let breach = self.breach.status(password);

        let classification = self.classifier.as_ref().and_then(|c| match c.classify(password) {
            Ok(classification) => Some(classification),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Classifier failed, falling back to heuristics: {}", _e);
                None
            }
        });

        let verdict = combine(&heuristics, breach, classification.as_ref());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            failed_rules = heuristics.failed_count(),
            breach = ?breach,
            classified = classification.is_some(),
            verdict = ?verdict,
            "password audited"
        );

        PasswordAudit {
            heuristics,
            breach,
            classification,
            verdict,
        }
    }
}

/// Audits a batch of passwords and sends each result via channel.
///
/// The token is checked before each password; on cancellation the remaining
/// passwords are skipped and results already sent stay valid. Returns the
/// number of audits sent.
#[cfg(feature = "async")]
pub async fn audit_batch_tx(
    auditor: Arc<Auditor>,
    passwords: Vec<SecretString>,
    token: CancellationToken,
    tx: mpsc::Sender<PasswordAudit>,
) -> usize {
    #[cfg(feature = "tracing")]
    tracing::info!("batch audit of {} passwords is about to start...", passwords.len());

    let mut sent = 0;
    for password in passwords {
        if token.is_cancelled() {
            #[cfg(feature = "tracing")]
            tracing::info!("Batch audit cancelled after {} passwords", sent);
            break;
        }

        let audit = auditor.audit(&password);

        if let Err(_e) = tx.send(audit).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Failed to send password audit result: {}", _e);
            break;
        }
        sent += 1;

        tokio::task::yield_now().await;
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breach::FingerprintSet;
    use crate::classifier::{train_classifier, ClassifierError, TrainingSet};
    use crate::rules::Rule;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn builtin_auditor() -> Auditor {
        let checker = BreachChecker::new(Arc::new(FingerprintSet::builtin()));
        Auditor::new(HeuristicConfig::default(), Arc::new(checker))
    }

    struct AlwaysWeak;

    impl Classifier for AlwaysWeak {
        fn classify(&self, _password: &SecretString) -> Result<Classification, ClassifierError> {
            Ok(Classification {
                class: StrengthClass::Weak,
                confidence: 0.9,
            })
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn classify(&self, _password: &SecretString) -> Result<Classification, ClassifierError> {
            Err(ClassifierError::Unavailable("not loaded".to_string()))
        }
    }

    #[test]
    fn test_breached_password_is_compromised() {
        let audit = builtin_auditor().audit(&secret("password"));

        assert_eq!(audit.breach, BreachStatus::Breached);
        assert_eq!(audit.verdict, Verdict::Compromised);
    }

    #[test]
    fn test_strong_without_classifier_is_inconclusive() {
        let audit = builtin_auditor().audit(&secret("Xk9#mQ2!vL"));

        assert_eq!(audit.verdict, Verdict::Strong);
        assert!(audit.classification.is_none());
        assert!(!audit.is_conclusive());
    }

    #[test]
    fn test_single_failed_rule_is_still_strong() {
        let audit = builtin_auditor().audit(&secret("Aa1!aaaa"));

        assert_eq!(audit.heuristics.failed_rules(), vec![Rule::RepeatedChars]);
        assert_eq!(audit.verdict, Verdict::Strong);
    }

    #[test]
    fn test_two_failed_rules_is_weak() {
        let audit = builtin_auditor().audit(&secret("qmzrtkwpQ"));
        assert_eq!(audit.verdict, Verdict::Weak);
    }

    #[test]
    fn test_weak_classification_is_weak() {
        let auditor = builtin_auditor().with_classifier(Arc::new(AlwaysWeak));
        let audit = auditor.audit(&secret("Xk9#mQ2!vL"));

        assert_eq!(audit.verdict, Verdict::Weak);
        assert!(audit.is_conclusive());
    }

    #[test]
    fn test_broken_classifier_falls_back() {
        let auditor = builtin_auditor().with_classifier(Arc::new(Broken));
        let audit = auditor.audit(&secret("Xk9#mQ2!vL"));

        assert!(audit.classification.is_none());
        assert_eq!(audit.verdict, Verdict::Strong);
    }

    #[test]
    fn test_empty_corpus_is_unknown() {
        let checker = BreachChecker::new(Arc::new(FingerprintSet::empty()));
        let auditor = Auditor::new(HeuristicConfig::default(), Arc::new(checker))
            .with_classifier(Arc::new(train_classifier(&TrainingSet::default()).unwrap().adapter));

        let audit = auditor.audit(&secret("password"));
        assert_eq!(audit.breach, BreachStatus::Unknown);
        assert_ne!(audit.verdict, Verdict::Compromised);
        assert!(!audit.is_conclusive());
    }

    #[test]
    fn test_verdict_descriptions() {
        assert_eq!(
            Verdict::Compromised.to_string(),
            "VERY WEAK - Password has been compromised"
        );
        assert_eq!(Verdict::Strong.to_string(), "STRONG - Good password choice");
    }
}

#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;
    use crate::breach::FingerprintSet;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn builtin_auditor() -> Arc<Auditor> {
        let checker = BreachChecker::new(Arc::new(FingerprintSet::builtin()));
        Arc::new(Auditor::new(HeuristicConfig::default(), Arc::new(checker)))
    }

    #[tokio::test]
    async fn test_audit_batch_tx_sends_all() {
        let (tx, mut rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        let passwords = vec![secret("password"), secret("Xk9#mQ2!vL")];

        let sent = audit_batch_tx(builtin_auditor(), passwords, token, tx).await;
        assert_eq!(sent, 2);

        let first = rx.recv().await.expect("Should receive first audit");
        let second = rx.recv().await.expect("Should receive second audit");
        assert_eq!(first.verdict, Verdict::Compromised);
        assert_eq!(second.verdict, Verdict::Strong);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_audit_batch_tx_cancelled() {
        let (tx, mut rx) = mpsc::channel(4);
        let token = CancellationToken::new();
        token.cancel();

        let sent = audit_batch_tx(builtin_auditor(), vec![secret("password")], token, tx).await;

        assert_eq!(sent, 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_audit_batch_tx_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        let sent = audit_batch_tx(
            builtin_auditor(),
            vec![secret("password"), secret("123456")],
            CancellationToken::new(),
            tx,
        )
        .await;

        assert_eq!(sent, 0);
    }
}
