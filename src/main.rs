//! Interactive password auditor.
//!
//! Reads one password per line from standard input and prints the heuristic
//! checklist, classifier result, breach status and overall verdict. Enter `q`
//! to quit.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pwd_audit::{
    corpus_path, train_classifier, Auditor, BreachChecker, BreachStatus, FingerprintSet,
    HeuristicConfig, PasswordAudit, Rule, TrainingSet, DEFAULT_MIN_LENGTH,
};

const QUIT: &str = "q";

#[derive(Parser)]
#[command(name = "pwd-audit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Password strength checker", long_about = None)]
struct Cli {
    /// Breach fingerprint file (default: built-in corpus)
    #[arg(long, env = "PWD_BREACH_CORPUS_PATH")]
    corpus: Option<PathBuf>,

    /// Labelled `password,strength` CSV used to train the classifier
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Run without the strength classifier
    #[arg(long)]
    no_classifier: bool,

    /// Run without the breach check (status is always unknown)
    #[arg(long)]
    no_breach_check: bool,

    /// Minimum password length
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
    min_length: usize,

    /// Skip a heuristic rule (repeatable), e.g. `--disable sequential_chars`
    #[arg(long = "disable", value_name = "RULE")]
    disabled: Vec<Rule>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(io::stderr).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .try_init()
            .ok();
    }
}

/// Loads the corpus; a missing or broken file leaves the breach check unknown.
fn load_corpus(path: Option<&Path>) -> FingerprintSet {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = corpus_path();
            if !default.exists() {
                info!("Using built-in breach corpus");
                return FingerprintSet::builtin();
            }
            default
        }
    };

    match FingerprintSet::load(&path) {
        Ok(set) => set,
        Err(e) => {
            warn!("Breach check disabled, corpus unusable: {}", e);
            FingerprintSet::empty()
        }
    }
}

fn build_auditor(cli: &Cli) -> Result<Auditor> {
    let mut config = HeuristicConfig::default().with_min_length(cli.min_length);
    for rule in &cli.disabled {
        config.disable(*rule);
    }

    let corpus = if cli.no_breach_check {
        info!("Breach check disabled");
        FingerprintSet::empty()
    } else {
        load_corpus(cli.corpus.as_deref())
    };
    let checker = BreachChecker::new(Arc::new(corpus));
    let auditor = Auditor::new(config, Arc::new(checker));

    if cli.no_classifier {
        return Ok(auditor);
    }

    let dataset = match &cli.dataset {
        Some(path) => TrainingSet::load(path)
            .with_context(|| format!("Failed to load training set {}", path.display()))?,
        None => TrainingSet::default(),
    };

    match train_classifier(&dataset) {
        Ok(trained) => {
            match trained.accuracy {
                Some(accuracy) => info!("Classifier held-out accuracy: {:.2}", accuracy),
                None => info!("Training set too small to measure classifier accuracy"),
            }
            Ok(auditor.with_classifier(Arc::new(trained.adapter)))
        }
        Err(e) => {
            warn!("Classifier unavailable, using heuristics and breach check only: {}", e);
            Ok(auditor)
        }
    }
}

fn render(audit: &PasswordAudit, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nPassword Strength Analysis:")?;
    match &audit.classification {
        Some(c) => writeln!(
            out,
            "ML Model Assessment: {} (confidence: {:.2})",
            c.class, c.confidence
        )?,
        None => writeln!(out, "ML Model Assessment: unavailable")?,
    }

    writeln!(out, "\nHeuristic Checks:")?;
    for (rule, result) in audit.heuristics.iter() {
        let status = if result.passed { "✓" } else { "✗" };
        writeln!(out, " {} {}: {}", status, rule, result.message)?;
    }

    let breach = match audit.breach {
        BreachStatus::Breached => "Password found in data breaches!",
        BreachStatus::NotFound => "No breaches found.",
        BreachStatus::Unknown => "Breach status unknown.",
    };
    writeln!(out, "\nBreach Check: {}", breach)?;

    writeln!(out, "\nOVERALL ASSESSMENT: {}", audit.verdict)?;
    if !audit.is_conclusive() {
        writeln!(out, "(based on partial signals)")?;
    }
    Ok(())
}

fn strip_line_ending(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    line
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json, level);

    let auditor = build_auditor(&cli)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Password Strength Checker")?;
    writeln!(out, "========================")?;

    loop {
        write!(out, "\nEnter a password to check (or '{}' to quit): ", QUIT)?;
        out.flush()?;

        let mut raw = Vec::new();
        if input.read_until(b'\n', &mut raw).context("Failed to read input")? == 0 {
            break;
        }

        let line = match String::from_utf8(strip_line_ending(raw)) {
            Ok(line) => line,
            Err(_) => {
                writeln!(out, "Input is not valid UTF-8, try again.")?;
                continue;
            }
        };
        if line.eq_ignore_ascii_case(QUIT) {
            break;
        }

        let password = SecretString::new(line.into());
        let audit = auditor.audit(&password);
        render(&audit, &mut out)?;
    }

    Ok(())
}
