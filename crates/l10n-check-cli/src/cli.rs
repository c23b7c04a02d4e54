use std::path::PathBuf;

use l10n_check_core::Encoding;
use thiserror::Error;

use crate::command_check::{CheckCommandError, CheckOptions, run_check};
use crate::config::DEFAULT_CONFIG_PATH;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum CliAppError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Check(#[from] CheckCommandError),
}

/// How the process should exit once a run finished without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Clean,
    Faults,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Clean => 0,
            ExitStatus::Faults => 2,
        }
    }
}

pub fn run() -> Result<ExitStatus, CliAppError> {
    let options = parse_check_options(std::env::args().skip(1).collect())?;
    let outcome = run_check(&options)?;
    print!("{}", outcome.output);
    if outcome.has_faults() {
        Ok(ExitStatus::Faults)
    } else {
        Ok(ExitStatus::Clean)
    }
}

fn parse_check_options(args: Vec<String>) -> Result<CheckOptions, CliAppError> {
    let mut files = Vec::new();
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut verbose = false;
    let mut no_warnings = false;
    let mut same_values = false;
    let mut encoding = None;
    let mut json_path = None;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            "-nowarn" | "--nowarn" => no_warnings = true,
            "-sameval" | "--sameval" => same_values = true,
            "--encoding" => {
                let value = next_value("--encoding", &mut iter)?;
                let parsed = value.parse::<Encoding>().map_err(|_| {
                    CliAppError::Usage(format!("unknown encoding '{value}'\n\n{}", usage()))
                })?;
                encoding = Some(parsed);
            }
            "--config" => config_path = PathBuf::from(next_value("--config", &mut iter)?),
            "--json" => json_path = Some(PathBuf::from(next_value("--json", &mut iter)?)),
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            flag if flag.starts_with('-') => return Err(CliAppError::Usage(usage())),
            file => files.push(PathBuf::from(file)),
        }
    }
    if files.is_empty() {
        return Err(CliAppError::Usage(usage()));
    }
    Ok(CheckOptions {
        files,
        config_path,
        verbose,
        no_warnings,
        same_values,
        encoding,
        json_path,
    })
}

fn next_value(flag: &str, iter: &mut impl Iterator<Item = String>) -> Result<String, CliAppError> {
    iter.next()
        .ok_or_else(|| CliAppError::Usage(format!("{flag} requires a value\n\n{}", usage())))
}

fn usage() -> String {
    format!(
        "l10n-check version {VERSION}\nusage:\n  l10n-check [options] <file> [<file> ...]\n\noptions:\n  -v, --verbose          list every record of every file\n  --nowarn               do not print warnings\n  --sameval              report keys which have the same value\n  --encoding <name>      latin1 (default) or utf-8\n  --config <path>        config file (default {DEFAULT_CONFIG_PATH})\n  --json <path>          also write a JSON report\n\nThe first file is compared against every other file."
    )
}

#[cfg(test)]
mod tests {
    use super::{CliAppError, ExitStatus, parse_check_options};
    use l10n_check_core::Encoding;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_files_and_flags() {
        let options = parse_check_options(args(&[
            "-v",
            "--sameval",
            "messages.properties",
            "--encoding",
            "utf-8",
            "messages_de.properties",
        ]))
        .expect("options");
        assert!(options.verbose);
        assert!(options.same_values);
        assert!(!options.no_warnings);
        assert_eq!(options.encoding, Some(Encoding::Utf8));
        assert_eq!(options.files.len(), 2);
        assert!(options.config_path.ends_with("l10n-check.toml"));
    }

    #[test]
    fn accepts_single_dash_legacy_flags() {
        let options =
            parse_check_options(args(&["-nowarn", "-sameval", "a.properties"])).expect("options");
        assert!(options.no_warnings);
        assert!(options.same_values);
    }

    #[test]
    fn parses_json_and_config_paths() {
        let options = parse_check_options(args(&[
            "--config",
            "ci/l10n.toml",
            "--json",
            "out/report.json",
            "a.properties",
        ]))
        .expect("options");
        assert!(options.config_path.ends_with("ci/l10n.toml"));
        assert!(
            options
                .json_path
                .expect("json path")
                .ends_with("report.json")
        );
    }

    #[test]
    fn requires_at_least_one_file() {
        let err = parse_check_options(args(&["-v"])).expect_err("usage");
        assert!(matches!(err, CliAppError::Usage(_)));
    }

    #[test]
    fn rejects_unknown_flags_and_encodings() {
        assert!(parse_check_options(args(&["--bogus", "a.properties"])).is_err());
        assert!(parse_check_options(args(&["--encoding", "koi8", "a.properties"])).is_err());
        assert!(parse_check_options(args(&["a.properties", "--json"])).is_err());
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitStatus::Clean.code(), 0);
        assert_eq!(ExitStatus::Faults.code(), 2);
    }
}
