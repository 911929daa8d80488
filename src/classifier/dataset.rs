//! Labelled training passwords and their CSV persistence.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::{StrengthClass, Vocabulary};

const CSV_HEADER: &str = "password,strength";

const BUILTIN_SAMPLES: [(&str, StrengthClass); 19] = [
    ("123456", StrengthClass::Weak),
    ("password", StrengthClass::Weak),
    ("qwerty", StrengthClass::Weak),
    ("admin123", StrengthClass::Weak),
    ("letmein!", StrengthClass::Weak),
    ("P@ssw0rd2023", StrengthClass::Strong),
    ("Secure$456", StrengthClass::Strong),
    ("MyStr0ngPass!", StrengthClass::Strong),
    ("abc123", StrengthClass::Weak),
    ("welcome", StrengthClass::Weak),
    ("monkey", StrengthClass::Weak),
    ("sunshine", StrengthClass::Weak),
    ("princess", StrengthClass::Weak),
    ("football", StrengthClass::Weak),
    ("C0mpl3xP@$$w0rd", StrengthClass::Strong),
    ("Sup3rS3cur3P@ss!", StrengthClass::Strong),
    ("R@nd0m$tr1ng2023", StrengthClass::Strong),
    ("Th1sIsV3ryStr0ng!", StrengthClass::Strong),
    ("N0tE@syT0Gu3ss!", StrengthClass::Strong),
];

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to access dataset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid dataset row {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
    #[error("Got {passwords} passwords but {strengths} strengths")]
    LengthMismatch { passwords: usize, strengths: usize },
    #[error("Passwords containing line breaks cannot be stored")]
    UnsupportedPassword,
}

/// Passwords labelled with their expected strength class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSet {
    samples: Vec<(String, StrengthClass)>,
}

impl Default for TrainingSet {
    /// The built-in sample set.
    fn default() -> Self {
        Self::new(
            BUILTIN_SAMPLES
                .iter()
                .map(|(pwd, class)| (pwd.to_string(), *class)),
        )
    }
}

impl TrainingSet {
    pub fn new<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = (String, StrengthClass)>,
    {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn samples(&self) -> &[(String, StrengthClass)] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Appends labelled passwords. Nothing is added on a length mismatch.
    pub fn add_passwords(
        &mut self,
        passwords: Vec<String>,
        strengths: Vec<StrengthClass>,
    ) -> Result<(), DatasetError> {
        if passwords.len() != strengths.len() {
            return Err(DatasetError::LengthMismatch {
                passwords: passwords.len(),
                strengths: strengths.len(),
            });
        }
        self.samples.extend(passwords.into_iter().zip(strengths));
        Ok(())
    }

    /// Vocabulary over every sample, in sample order.
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from_passwords(self.samples.iter().map(|(pwd, _)| pwd))
    }

    /// Length in characters of the longest sample.
    pub fn max_length(&self) -> usize {
        self.samples
            .iter()
            .map(|(pwd, _)| pwd.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Shuffles the samples with `seed` and holds out `ceil(len * test_fraction)`
    /// of them, keeping at least one training sample. Returns `(train, test)`.
    pub fn split(&self, test_fraction: f64, seed: u64) -> (TrainingSet, TrainingSet) {
        let mut indices: Vec<usize> = (0..self.samples.len()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test, train) = indices.split_at(test_count(self.samples.len(), test_fraction));
        let pick = |idx: &[usize]| TrainingSet::new(idx.iter().map(|&i| self.samples[i].clone()));
        (pick(train), pick(test))
    }

    /// Reads a `password,strength` CSV file. `strength` is the class index.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::FileNotFound(path.to_path_buf()));
        }
        let set = Self::parse_csv(&std::fs::read_to_string(path)?)?;

        #[cfg(feature = "tracing")]
        tracing::info!("Training set loaded: {} samples from {:?}", set.len(), path);

        Ok(set)
    }

    /// Writes the samples as a `password,strength` CSV file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DatasetError> {
        std::fs::write(path, self.to_csv()?)?;
        Ok(())
    }

    fn parse_csv(content: &str) -> Result<Self, DatasetError> {
        let mut lines = content.lines().enumerate();
        match lines.next() {
            Some((_, header)) if header.trim() == CSV_HEADER => {}
            _ => {
                return Err(DatasetError::InvalidRow {
                    line: 1,
                    reason: format!("expected header {:?}", CSV_HEADER),
                });
            }
        }

        let mut samples = Vec::new();
        for (idx, row) in lines {
            let line = idx + 1;
            if row.is_empty() {
                continue;
            }
            let (password, strength) = split_row(row).ok_or_else(|| DatasetError::InvalidRow {
                line,
                reason: "expected a password and a strength column".to_string(),
            })?;
            let class = strength
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(StrengthClass::from_index)
                .ok_or_else(|| DatasetError::InvalidRow {
                    line,
                    reason: format!("invalid strength {:?}", strength),
                })?;
            samples.push((password, class));
        }
        Ok(Self { samples })
    }

    fn to_csv(&self) -> Result<String, DatasetError> {
        let mut out = String::new();
        out.push_str(CSV_HEADER);
        out.push('\n');
        for (password, class) in &self.samples {
            if password.contains(['\n', '\r']) {
                return Err(DatasetError::UnsupportedPassword);
            }
            let _ = writeln!(out, "{},{}", quote_field(password), class.index());
        }
        Ok(out)
    }
}

/// Splits a row into its password and strength fields. A password wrapped in
/// double quotes may contain commas, with `""` standing for one quote.
/// Unquoted passwords run up to the last comma.
fn split_row(row: &str) -> Option<(String, &str)> {
    let Some(quoted) = row.strip_prefix('"') else {
        let (password, strength) = row.rsplit_once(',')?;
        return Some((password.to_string(), strength));
    };

    let mut password = String::new();
    let mut chars = quoted.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c != '"' {
            password.push(c);
            continue;
        }
        if quoted[idx + 1..].starts_with('"') {
            password.push('"');
            chars.next();
            continue;
        }
        // closing quote must be followed by the separator
        return quoted[idx + 1..]
            .strip_prefix(',')
            .map(|strength| (password, strength));
    }
    None
}

fn quote_field(password: &str) -> Cow<'_, str> {
    if password.contains([',', '"']) {
        Cow::Owned(format!("\"{}\"", password.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(password)
    }
}

fn test_count(len: usize, test_fraction: f64) -> usize {
    if len < 2 {
        return 0;
    }
    let wanted = (len as f64 * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    wanted.min(len - 1)
}
