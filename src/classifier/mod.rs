//! Strength classification
//!
//! The aggregator only sees the [`Classifier`] trait. [`ClassifierAdapter`]
//! turns any [`SequenceModel`] over encoded passwords into a classifier.

mod centroid;
mod dataset;
mod vocabulary;

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use centroid::{
    train_classifier, train_classifier_with, CentroidModel, TrainedClassifier, SPLIT_SEED,
    TEST_FRACTION,
};
pub use dataset::{DatasetError, TrainingSet};
pub use vocabulary::{Vocabulary, UNKNOWN_INDEX};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("No training samples")]
    NoSamples,
    #[error("Model returned invalid probabilities: {0:?}")]
    InvalidProbabilities([f32; 3]),
    #[error("Model not available: {0}")]
    Unavailable(String),
}

/// Coarse strength class predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrengthClass {
    Weak,
    Moderate,
    Strong,
}

impl StrengthClass {
    pub const ALL: [StrengthClass; 3] = [
        StrengthClass::Weak,
        StrengthClass::Moderate,
        StrengthClass::Strong,
    ];

    /// Class index used in training labels.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn label(self) -> &'static str {
        match self {
            StrengthClass::Weak => "Weak",
            StrengthClass::Moderate => "Moderate",
            StrengthClass::Strong => "Strong",
        }
    }
}

impl fmt::Display for StrengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A predicted class and its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub class: StrengthClass,
    /// In `[0, 1]`.
    pub confidence: f32,
}

/// Maps a password to a strength class.
pub trait Classifier: Send + Sync {
    fn classify(&self, password: &SecretString) -> Result<Classification, ClassifierError>;
}

/// A model over fixed-length encoded passwords.
pub trait SequenceModel: Send + Sync {
    /// Returns the probability of each class, in [`StrengthClass::ALL`] order.
    fn predict(&self, sequence: &[u32]) -> Result<[f32; 3], ClassifierError>;
}

/// Encodes passwords with a [`Vocabulary`] and runs a [`SequenceModel`].
#[derive(Debug, Clone)]
pub struct ClassifierAdapter<M> {
    model: M,
    vocabulary: Vocabulary,
    max_length: usize,
}

impl<M: SequenceModel> ClassifierAdapter<M> {
    /// `vocabulary` and `max_length` must be the ones the model was trained with.
    pub fn new(model: M, vocabulary: Vocabulary, max_length: usize) -> Self {
        Self {
            model,
            vocabulary,
            max_length,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: SequenceModel> Classifier for ClassifierAdapter<M> {
    fn classify(&self, password: &SecretString) -> Result<Classification, ClassifierError> {
        let sequence = self
            .vocabulary
            .encode(password.expose_secret(), self.max_length);
        let probabilities = self.model.predict(&sequence)?;

        if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(ClassifierError::InvalidProbabilities(probabilities));
        }

        // First maximum wins ties.
        let (best, confidence) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold((0, f32::MIN), |acc, (idx, p)| if p > acc.1 { (idx, p) } else { acc });

        let class = StrengthClass::from_index(best)
            .ok_or(ClassifierError::InvalidProbabilities(probabilities))?;

        Ok(Classification {
            class,
            confidence: confidence.clamp(0.0, 1.0),
        })
    }
}
