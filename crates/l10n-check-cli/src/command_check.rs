use std::fs;
use std::path::PathBuf;

use l10n_check_core::{AnalyzeOptions, Diagnostics, Encoding, ParseOptions, analyze};
use rayon::prelude::*;
use thiserror::Error;

use crate::config::load_config_or_default;
use crate::error::CliError;
use crate::report::{
    CheckReport, ComparisonReport, FileReport, UnreadableFile, render_comparison,
    render_diagnostics, render_summary,
};
use crate::source::{SourceFile, load_sources};

#[derive(Debug, Error)]
pub enum CheckCommandError {
    #[error("config error: {0}")]
    Config(#[from] CliError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub files: Vec<PathBuf>,
    pub config_path: PathBuf,
    pub verbose: bool,
    pub no_warnings: bool,
    pub same_values: bool,
    pub encoding: Option<Encoding>,
    pub json_path: Option<PathBuf>,
}

#[derive(Debug)]
pub struct CheckOutcome {
    pub output: String,
    pub report: CheckReport,
}

impl CheckOutcome {
    pub fn has_faults(&self) -> bool {
        self.report.faults > 0
    }
}

/// Parses every file, validates each one, then compares the first file
/// against every other file.
pub fn run_check(options: &CheckOptions) -> Result<CheckOutcome, CheckCommandError> {
    let config = load_config_or_default(&options.config_path)?;
    let encoding = match options.encoding {
        Some(encoding) => encoding,
        None => config.encoding()?,
    };
    let verbose = options.verbose || config.verbose;
    let no_warnings = options.no_warnings || config.no_warnings;
    let analyze_options = AnalyzeOptions {
        same_values: options.same_values || config.same_values,
    };

    tracing::info!(files = options.files.len(), %encoding, "checking properties files");
    let mut output = String::new();
    let mut report = CheckReport::default();
    let mut sources: Vec<SourceFile> = Vec::with_capacity(options.files.len());
    for result in load_sources(&options.files, &ParseOptions { encoding }) {
        match result {
            Ok(source) => sources.push(source),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable file");
                output.push_str(&format!("{err}\n"));
                report.unreadable.push(UnreadableFile {
                    path: err.path().to_string(),
                    error: err.to_string(),
                });
                report.faults += 1;
            }
        }
    }

    for source in &sources {
        output.push_str(&render_summary(&source.store, verbose));
    }
    output.push('\n');

    for source in &sources {
        let (text, shown) = render_diagnostics(&source.diagnostics, no_warnings);
        output.push_str(&text);
        output.push('\n');
        report.faults += shown;
        report
            .files
            .push(FileReport::new(&source.store, &source.diagnostics));
    }

    if let Some((master, others)) = sources.split_first() {
        let comparisons: Vec<ComparisonReport> = others
            .par_iter()
            .map(|other| {
                let mut diagnostics =
                    Diagnostics::new(format!("{} vs {}", master.path, other.path));
                let summary = analyze(
                    &master.store,
                    &other.store,
                    &analyze_options,
                    &mut diagnostics,
                );
                ComparisonReport::new(&master.store, &other.store, &summary, &diagnostics)
            })
            .collect();
        for comparison in comparisons {
            output.push_str(&render_comparison(&comparison));
            report.faults += comparison.empty_mismatches
                + comparison.missing_in_other
                + comparison.missing_in_master
                + comparison.same_values;
            report.comparisons.push(comparison);
        }
    }

    if let Some(json_path) = &options.json_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(json_path, json)?;
    }

    tracing::info!(faults = report.faults, "check finished");
    Ok(CheckOutcome { output, report })
}

#[cfg(test)]
mod tests {
    use super::{CheckOptions, run_check};
    use l10n_check_core::Encoding;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("l10n_check_{name}_{nanos}"));
        fs::create_dir_all(&path).expect("dir");
        path
    }

    fn options(dir: &Path, files: Vec<PathBuf>) -> CheckOptions {
        CheckOptions {
            files,
            config_path: dir.join("l10n-check.toml"),
            verbose: false,
            no_warnings: false,
            same_values: false,
            encoding: None,
            json_path: None,
        }
    }

    #[test]
    fn clean_files_have_no_faults() {
        let dir = temp_dir("check_clean");
        let en = dir.join("en.properties");
        let de = dir.join("de.properties");
        fs::write(&en, "greeting = Hello\nfarewell = Bye\n").expect("write");
        fs::write(&de, "greeting = Hallo\nfarewell = Tschuess\n").expect("write");

        let outcome = run_check(&options(&dir, vec![en, de])).expect("check");
        assert!(!outcome.has_faults());
        assert_eq!(outcome.report.files.len(), 2);
        assert_eq!(outcome.report.comparisons.len(), 1);
        assert!(outcome.output.contains("no warnings or errors"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn reports_missing_keys_and_writes_json() {
        let dir = temp_dir("check_missing");
        let en = dir.join("en.properties");
        let fr = dir.join("fr.properties");
        fs::write(&en, "x = 1\ny = 2\n").expect("write");
        fs::write(&fr, "x = un\n").expect("write");
        let json_path = dir.join("report.json");

        let mut opts = options(&dir, vec![en, fr]);
        opts.json_path = Some(json_path.clone());
        let outcome = run_check(&opts).expect("check");
        assert!(outcome.has_faults());
        assert_eq!(outcome.report.faults, 1);
        assert_eq!(outcome.report.comparisons[0].missing_in_other, 1);
        assert!(outcome.output.contains("key 'y' in"));

        let contents = fs::read_to_string(&json_path).expect("read");
        let value: serde_json::Value = serde_json::from_str(&contents).expect("json");
        assert_eq!(value["faults"], serde_json::Value::from(1));
        assert_eq!(
            value["comparisons"][0]["diagnostics"][0]["code"],
            serde_json::Value::from("L10N100")
        );

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn config_enables_same_value_check() {
        let dir = temp_dir("check_config");
        fs::write(dir.join("l10n-check.toml"), "same_values = true\n").expect("config");
        let en = dir.join("en.properties");
        let nl = dir.join("nl.properties");
        fs::write(&en, "ok = OK\n").expect("write");
        fs::write(&nl, "ok = ok\n").expect("write");

        let outcome = run_check(&options(&dir, vec![en, nl])).expect("check");
        assert_eq!(outcome.report.comparisons[0].same_values, 1);
        assert!(outcome.has_faults());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unreadable_file_is_a_fault() {
        let dir = temp_dir("check_unreadable");
        let en = dir.join("en.properties");
        fs::write(&en, "a = b\n").expect("write");
        let missing = dir.join("missing.properties");

        let mut opts = options(&dir, vec![en, missing]);
        opts.encoding = Some(Encoding::Utf8);
        let outcome = run_check(&opts).expect("check");
        assert_eq!(outcome.report.unreadable.len(), 1);
        assert_eq!(outcome.report.faults, 1);
        assert!(outcome.output.contains("could not open/read file"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn no_warnings_hides_parse_warnings() {
        let dir = temp_dir("check_nowarn");
        let en = dir.join("en.properties");
        fs::write(&en, "a = 1\na = 2\n").expect("write");

        let mut opts = options(&dir, vec![en]);
        let outcome = run_check(&opts).expect("check");
        assert_eq!(outcome.report.faults, 1);

        opts.no_warnings = true;
        let outcome = run_check(&opts).expect("check");
        assert!(!outcome.has_faults());
        assert!(outcome.output.contains("no errors"));

        fs::remove_dir_all(&dir).ok();
    }
}
