//! Breach corpus management
//!
//! Loads and queries the set of known-breached password fingerprints.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::BreachError;

/// Environment variable overriding the corpus location.
pub const CORPUS_PATH_ENV: &str = "PWD_BREACH_CORPUS_PATH";

const DEFAULT_CORPUS_PATH: &str = "./assets/breached-fingerprints.txt";

/// Number of hex characters sent in a k-anonymity range query.
pub const RANGE_PREFIX_LEN: usize = 5;

const BUILTIN_CORPUS: &str = include_str!("../../assets/breached-fingerprints.txt");

/// A store of breached fingerprints queried by [`BreachChecker`](super::BreachChecker).
///
/// Implementors backed by a remote k-anonymity service only need [`range`]:
/// the default [`contains`] sends the first [`RANGE_PREFIX_LEN`] characters
/// and matches the returned suffixes locally, so the full fingerprint never
/// leaves the process.
///
/// [`range`]: BreachSource::range
/// [`contains`]: BreachSource::contains
pub trait BreachSource: Send + Sync {
    /// Returns the suffixes of every known fingerprint starting with `prefix`.
    fn range(&self, prefix: &str) -> Result<Vec<String>, BreachError>;

    /// Returns whether `fingerprint` (hex) is known. Anything that is not a
    /// hex string longer than the range prefix is never known.
    fn contains(&self, fingerprint: &str) -> Result<bool, BreachError> {
        if fingerprint.len() <= RANGE_PREFIX_LEN
            || !fingerprint.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Ok(false);
        }
        let (prefix, suffix) = fingerprint.split_at(RANGE_PREFIX_LEN);
        Ok(self
            .range(prefix)?
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(suffix)))
    }

    /// Returns `false` when the source holds no data, so a miss proves nothing.
    fn is_available(&self) -> bool {
        true
    }
}

/// Immutable in-memory set of breached fingerprints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintSet {
    fingerprints: HashSet<String>,
}

/// Returns the corpus file path.
///
/// Priority:
/// 1. Environment variable `PWD_BREACH_CORPUS_PATH`
/// 2. Default path `./assets/breached-fingerprints.txt`
pub fn corpus_path() -> PathBuf {
    std::env::var(CORPUS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CORPUS_PATH))
}

fn entries(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

impl FingerprintSet {
    /// A corpus with no entries. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The corpus shipped with the crate.
    pub fn builtin() -> Self {
        let fingerprints = entries(BUILTIN_CORPUS)
            .map(|(_, line)| line.to_ascii_lowercase())
            .collect();
        Self { fingerprints }
    }

    /// Builds a corpus from hex fingerprints, normalised to lowercase.
    ///
    /// # Errors
    ///
    /// Returns [`BreachError::InvalidFingerprint`] for a non-hex entry; `line`
    /// is its 1-based position.
    pub fn from_fingerprints<I, S>(fingerprints: I) -> Result<Self, BreachError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::new();
        for (idx, fp) in fingerprints.into_iter().enumerate() {
            set.insert(normalize(idx + 1, fp.as_ref())?);
        }
        Ok(Self { fingerprints: set })
    }

    /// Parses corpus text: one fingerprint per line, blank lines and `#`
    /// comments ignored.
    pub fn parse(content: &str) -> Result<Self, BreachError> {
        let mut set = HashSet::new();
        for (line, entry) in entries(content) {
            set.insert(normalize(line, entry)?);
        }
        Ok(Self { fingerprints: set })
    }

    /// Loads the corpus from the path given by [`corpus_path`].
    pub fn from_env() -> Result<Self, BreachError> {
        Self::load(corpus_path())
    }

    /// Loads the corpus from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File has no entries
    /// - An entry is not hex
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BreachError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Breach corpus load FAILED: FileNotFound {:?}", path);
            return Err(BreachError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let set = Self::parse(&content)?;

        if set.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Breach corpus load FAILED: Empty file {:?}", path);
            return Err(BreachError::EmptyFile);
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Breach corpus loaded: {} fingerprints from {:?}", set.len(), path);

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Exact membership test, case-insensitive.
    pub fn contains_fingerprint(&self, fingerprint: &str) -> bool {
        self.fingerprints.contains(&fingerprint.to_ascii_lowercase())
    }
}

fn normalize(line: usize, value: &str) -> Result<String, BreachError> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BreachError::InvalidFingerprint {
            line,
            value: value.to_string(),
        });
    }
    Ok(value.to_ascii_lowercase())
}

impl BreachSource for FingerprintSet {
    fn range(&self, prefix: &str) -> Result<Vec<String>, BreachError> {
        let prefix = prefix.to_ascii_lowercase();
        Ok(self
            .fingerprints
            .iter()
            .filter_map(|fp| fp.strip_prefix(prefix.as_str()))
            .map(str::to_string)
            .collect())
    }

    fn contains(&self, fingerprint: &str) -> Result<bool, BreachError> {
        Ok(self.contains_fingerprint(fingerprint))
    }

    fn is_available(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::set_var(key, value); }
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::remove_var(key); }
    }

    fn setup_with_tempfile(lines: &[&str]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        for line in lines {
            writeln!(temp_file, "{}", line).expect("Failed to write");
        }
        temp_file
    }

    /// Serves `range` only, like a remote k-anonymity endpoint.
    struct RangeOnly(FingerprintSet);

    impl BreachSource for RangeOnly {
        fn range(&self, prefix: &str) -> Result<Vec<String>, BreachError> {
            self.0.range(prefix)
        }
    }

    #[test]
    #[serial]
    fn test_corpus_path_default() {
        remove_env(CORPUS_PATH_ENV);

        let path = corpus_path();
        assert_eq!(path, PathBuf::from("./assets/breached-fingerprints.txt"));
    }

    #[test]
    #[serial]
    fn test_corpus_path_from_env() {
        let custom_path = "/custom/path/corpus.txt";
        set_env(CORPUS_PATH_ENV, custom_path);

        let path = corpus_path();
        assert_eq!(path, PathBuf::from(custom_path));

        remove_env(CORPUS_PATH_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_file_not_found() {
        set_env(CORPUS_PATH_ENV, "/nonexistent/path/corpus.txt");

        let result = FingerprintSet::from_env();
        match result {
            Err(BreachError::FileNotFound(_)) => {}
            _ => panic!("Expected FileNotFound error"),
        }

        remove_env(CORPUS_PATH_ENV);
    }

    #[test]
    #[serial]
    fn test_from_env_success() {
        let temp_file = setup_with_tempfile(&[
            "# sha1",
            "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8",
            "",
            "7c4a8d09ca3762af61e59520943dc26494f8941b",
        ]);
        set_env(CORPUS_PATH_ENV, temp_file.path().to_str().unwrap());

        let set = FingerprintSet::from_env().expect("corpus should load");
        assert_eq!(set.len(), 2);
        assert!(set.contains_fingerprint("5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8"));

        remove_env(CORPUS_PATH_ENV);
    }

    #[test]
    fn test_load_empty_file() {
        let temp_file = setup_with_tempfile(&["# nothing here", ""]);

        let result = FingerprintSet::load(temp_file.path());
        assert!(matches!(result, Err(BreachError::EmptyFile)));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let result = FingerprintSet::parse("abc123\nnot-a-digest\n");
        assert!(matches!(
            result,
            Err(BreachError::InvalidFingerprint { line: 2, .. })
        ));
    }

    #[test]
    fn test_from_fingerprints_rejects_empty_entry() {
        let result = FingerprintSet::from_fingerprints(["abcdef", " "]);
        assert!(matches!(
            result,
            Err(BreachError::InvalidFingerprint { line: 2, .. })
        ));
    }

    #[test]
    fn test_builtin_corpus_is_valid() {
        let builtin = FingerprintSet::builtin();
        let parsed = FingerprintSet::parse(BUILTIN_CORPUS).expect("builtin corpus must parse");

        assert_eq!(builtin, parsed);
        assert!(!builtin.is_empty());
    }

    #[test]
    fn test_range_returns_suffixes() {
        let set = FingerprintSet::from_fingerprints([
            "5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8",
            "5baa6ffff",
            "7c4a8d09ca3762af61e59520943dc26494f8941b",
        ])
        .unwrap();

        let mut suffixes = set.range("5BAA6").unwrap();
        suffixes.sort();
        assert_eq!(
            suffixes,
            vec!["1e4c9b93f3f0682250b6cf8331b7ee68fd8".to_string(), "ffff".to_string()]
        );
    }

    #[test]
    fn test_default_contains_uses_range() {
        let source = RangeOnly(FingerprintSet::builtin());

        assert!(
            source
                .contains("5baa61e4c9b93f3f0682250b6cf8331b7ee68fd8")
                .unwrap()
        );
        assert!(
            !source
                .contains("5baa61e4c9b93f3f0682250b6cf8331b7ee68fd9")
                .unwrap()
        );
        assert!(!source.contains("5baa6").unwrap());
    }

    #[test]
    fn test_default_contains_rejects_non_hex() {
        let source = RangeOnly(FingerprintSet::builtin());

        // byte 5 falls inside a multi-byte char
        assert!(!source.contains("ééééé").unwrap());
        assert!(!source.contains("5baa6zzzz").unwrap());
        assert!(!source.contains("5baa6 1e4c9b93f3f0682250b6cf8331b7ee68fd8").unwrap());
    }

    #[test]
    fn test_empty_set_is_unavailable() {
        assert!(!FingerprintSet::empty().is_available());
        assert!(FingerprintSet::builtin().is_available());
    }
}
