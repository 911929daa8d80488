//! Nearest-centroid reference model.
//!
//! Each class is summarised by the mean feature vector of its training
//! samples. Features are a per-index character histogram plus a weighted
//! fill ratio, both normalised by the sequence length. Probabilities are a
//! softmax over negative distances to each centroid.

use secrecy::SecretString;

use super::{
    Classifier, ClassifierAdapter, ClassifierError, SequenceModel, StrengthClass, TrainingSet,
    UNKNOWN_INDEX,
};

const LENGTH_WEIGHT: f32 = 4.0;
const TEMPERATURE: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CentroidModel {
    vocabulary_size: usize,
    /// `None` for classes without training samples.
    centroids: [Option<Vec<f32>>; 3],
}

impl CentroidModel {
    /// Fits centroids from encoded sequences and their labels.
    pub fn fit<'a, I>(samples: I, vocabulary_size: usize) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = (&'a [u32], StrengthClass)>,
    {
        let dims = vocabulary_size + 1;
        let mut sums: [Vec<f32>; 3] = std::array::from_fn(|_| vec![0.0; dims]);
        let mut counts = [0usize; 3];

        for (sequence, class) in samples {
            let features = features(sequence, vocabulary_size);
            let slot = class.index();
            for (sum, value) in sums[slot].iter_mut().zip(features) {
                *sum += value;
            }
            counts[slot] += 1;
        }

        if counts.iter().all(|&n| n == 0) {
            return Err(ClassifierError::NoSamples);
        }

        let centroids = std::array::from_fn(|slot| {
            (counts[slot] > 0).then(|| {
                sums[slot]
                    .iter()
                    .map(|sum| sum / counts[slot] as f32)
                    .collect()
            })
        });

        Ok(Self {
            vocabulary_size,
            centroids,
        })
    }
}

fn features(sequence: &[u32], vocabulary_size: usize) -> Vec<f32> {
    // [fill ratio, histogram of indices 1..=vocabulary_size]
    let mut features = vec![0.0; vocabulary_size + 1];
    if sequence.is_empty() {
        return features;
    }
    let scale = 1.0 / sequence.len() as f32;

    let mut filled = 0usize;
    for &idx in sequence {
        if idx == UNKNOWN_INDEX {
            continue;
        }
        filled += 1;
        if let Some(slot) = features.get_mut(idx as usize) {
            *slot += scale;
        }
    }
    features[0] = filled as f32 * scale * LENGTH_WEIGHT;
    features
}

fn distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

impl SequenceModel for CentroidModel {
    fn predict(&self, sequence: &[u32]) -> Result<[f32; 3], ClassifierError> {
        let features = features(sequence, self.vocabulary_size);

        let logits: [Option<f32>; 3] = std::array::from_fn(|slot| {
            self.centroids[slot]
                .as_ref()
                .map(|centroid| -distance(&features, centroid) * TEMPERATURE)
        });

        let max = logits
            .iter()
            .flatten()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        if !max.is_finite() {
            return Err(ClassifierError::Unavailable("model has no centroids".to_string()));
        }

        let exps: [f32; 3] = std::array::from_fn(|slot| logits[slot].map_or(0.0, |l| (l - max).exp()));
        let total: f32 = exps.iter().sum();

        Ok(exps.map(|e| e / total))
    }
}

/// Share of the dataset held out to measure accuracy.
pub const TEST_FRACTION: f64 = 0.2;

/// Seed of the train/test shuffle.
pub const SPLIT_SEED: u64 = 42;

/// A trained adapter and its accuracy on the held-out samples.
#[derive(Debug, Clone)]
pub struct TrainedClassifier {
    pub adapter: ClassifierAdapter<CentroidModel>,
    /// `None` when the dataset was too small to hold anything out.
    pub accuracy: Option<f32>,
}

/// Trains the reference classifier on `dataset`, holding out
/// [`TEST_FRACTION`] of it (shuffled with [`SPLIT_SEED`]) for evaluation.
pub fn train_classifier(dataset: &TrainingSet) -> Result<TrainedClassifier, ClassifierError> {
    train_classifier_with(dataset, TEST_FRACTION, SPLIT_SEED)
}

/// Same as [`train_classifier`] with an explicit split.
///
/// The adapter carries the vocabulary and maximum length of the whole
/// dataset, so inference encodes passwords exactly as training did; only
/// the model is fitted on the training part.
pub fn train_classifier_with(
    dataset: &TrainingSet,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainedClassifier, ClassifierError> {
    let vocabulary = dataset.vocabulary();
    let max_length = dataset.max_length();
    let (train, test) = dataset.split(test_fraction, seed);

    let encoded: Vec<(Vec<u32>, StrengthClass)> = train
        .samples()
        .iter()
        .map(|(pwd, class)| (vocabulary.encode(pwd, max_length), *class))
        .collect();

    let model = CentroidModel::fit(
        encoded.iter().map(|(seq, class)| (seq.as_slice(), *class)),
        vocabulary.len(),
    )?;
    let adapter = ClassifierAdapter::new(model, vocabulary, max_length);
    let accuracy = accuracy(&adapter, &test);

    #[cfg(feature = "tracing")]
    tracing::info!(
        train = train.len(),
        test = test.len(),
        vocabulary = adapter.vocabulary().len(),
        max_length,
        ?accuracy,
        "Classifier trained"
    );

    Ok(TrainedClassifier { adapter, accuracy })
}

fn accuracy(adapter: &ClassifierAdapter<CentroidModel>, test: &TrainingSet) -> Option<f32> {
    if test.is_empty() {
        return None;
    }
    let correct = test
        .samples()
        .iter()
        .filter(|(pwd, class)| {
            let pwd = SecretString::new(pwd.clone().into());
            matches!(adapter.classify(&pwd), Ok(c) if c.class == *class)
        })
        .count();
    Some(correct as f32 / test.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[test]
    fn test_fit_without_samples() {
        let result = CentroidModel::fit(std::iter::empty::<(&[u32], StrengthClass)>(), 4);
        assert_eq!(result, Err(ClassifierError::NoSamples));
    }

    #[test]
    fn test_empty_dataset_cannot_train() {
        let dataset = TrainingSet::new(Vec::new());
        assert!(matches!(
            train_classifier(&dataset),
            Err(ClassifierError::NoSamples)
        ));
    }

    #[test]
    fn test_held_out_accuracy() {
        let trained = train_classifier(&TrainingSet::default()).unwrap();
        let accuracy = trained.accuracy.expect("default set holds out samples");
        assert!((0.0..=1.0).contains(&accuracy));

        let again = train_classifier(&TrainingSet::default()).unwrap();
        assert_eq!(again.accuracy, trained.accuracy);
        assert_eq!(again.adapter.model(), trained.adapter.model());
    }

    #[test]
    fn test_model_fitted_on_training_part_only() {
        let dataset = TrainingSet::default();
        let trained = train_classifier(&dataset).unwrap();

        let (train, _) = dataset.split(TEST_FRACTION, SPLIT_SEED);
        let vocabulary = dataset.vocabulary();
        let encoded: Vec<_> = train
            .samples()
            .iter()
            .map(|(pwd, class)| (vocabulary.encode(pwd, dataset.max_length()), *class))
            .collect();
        let expected =
            CentroidModel::fit(encoded.iter().map(|(s, c)| (s.as_slice(), *c)), vocabulary.len())
                .unwrap();

        assert_eq!(trained.adapter.model(), &expected);
        assert_eq!(trained.adapter.vocabulary().len(), vocabulary.len());
    }

    #[test]
    fn test_single_sample_has_no_accuracy() {
        let dataset = TrainingSet::new([("abc".to_string(), StrengthClass::Weak)]);
        let trained = train_classifier(&dataset).unwrap();
        assert_eq!(trained.accuracy, None);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let adapter = train_classifier(&TrainingSet::default()).unwrap().adapter;
        let sequence = adapter.vocabulary().encode("Secure$456", adapter.max_length());

        let probs = adapter.model().predict(&sequence).unwrap();
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_class_without_samples_gets_zero() {
        let adapter = train_classifier(&TrainingSet::default()).unwrap().adapter;
        let sequence = adapter.vocabulary().encode("anything", adapter.max_length());

        let probs = adapter.model().predict(&sequence).unwrap();
        assert_eq!(probs[StrengthClass::Moderate.index()], 0.0);
    }

    #[test]
    fn test_builtin_model_separates_short_and_long() {
        let adapter = train_classifier(&TrainingSet::default()).unwrap().adapter;

        let weak = adapter.classify(&secret("password")).unwrap();
        assert_eq!(weak.class, StrengthClass::Weak);
        assert!((0.0..=1.0).contains(&weak.confidence));

        let strong = adapter.classify(&secret("Th1sIsV3ryStr0ng!")).unwrap();
        assert_eq!(strong.class, StrengthClass::Strong);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let adapter = train_classifier(&TrainingSet::default()).unwrap().adapter;
        let pwd = secret("Xk9#mQ2!vL");
        assert_eq!(adapter.classify(&pwd), adapter.classify(&pwd));
    }
}
