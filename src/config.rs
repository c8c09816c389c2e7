//! Command-line configuration
//!
//! Every option can also come from a `PLAYTTY_*` environment variable. The
//! parsed [`Cli`] is turned into interpreter [`Limits`] and the
//! [`PlaygroundConfig`] the page starts from.

use crate::interpreter::constants::{
    DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_OUTPUT_LEN, DEFAULT_MAX_STEPS, DEFAULT_MAX_STRING_LEN,
};
use crate::interpreter::Limits;
use crate::playground::state::{Language, PlaygroundConfig, ThemeMode};
use clap::Parser;
use log::LevelFilter;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Deepest call nesting the CLI accepts; the evaluation thread's stack is sized for it
pub const MAX_CALL_DEPTH_CEILING: usize = 4096;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "playtty",
    version,
    about = "A terminal coding playground with a sandboxed script evaluator"
)]
pub struct Cli {
    /// Preload the editor with the contents of this file
    pub file: Option<PathBuf>,

    /// Initial color theme
    #[arg(long, env = "PLAYTTY_THEME", value_enum, default_value_t = ThemeMode::Light)]
    pub theme: ThemeMode,

    /// Statements, loop iterations and calls one Run may perform
    #[arg(long, env = "PLAYTTY_MAX_STEPS", default_value_t = DEFAULT_MAX_STEPS)]
    pub max_steps: u64,

    /// Deepest allowed nesting of function calls
    #[arg(
        long,
        env = "PLAYTTY_MAX_CALL_DEPTH",
        default_value_t = DEFAULT_MAX_CALL_DEPTH,
        value_parser = parse_call_depth
    )]
    pub max_call_depth: usize,

    /// Longest string (bytes) a script may build
    #[arg(long, env = "PLAYTTY_MAX_STRING_LEN", default_value_t = DEFAULT_MAX_STRING_LEN)]
    pub max_string_len: usize,

    /// Bytes console.log may capture per Run
    #[arg(long, env = "PLAYTTY_MAX_OUTPUT_LEN", default_value_t = DEFAULT_MAX_OUTPUT_LEN)]
    pub max_output_len: usize,

    /// Where log records are written
    #[arg(long, env = "PLAYTTY_LOG_FILE", default_value = "playtty.log")]
    pub log_file: PathBuf,

    /// Log filter (off, error, warn, info, debug, trace)
    #[arg(long, env = "PLAYTTY_LOG_LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Evaluate FILE once, print the output and exit
    #[arg(long, requires = "file")]
    pub run: bool,
}

fn parse_call_depth(raw: &str) -> Result<usize, String> {
    let depth: usize = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if depth == 0 || depth > MAX_CALL_DEPTH_CEILING {
        return Err(format!(
            "call depth must be between 1 and {}",
            MAX_CALL_DEPTH_CEILING
        ));
    }
    Ok(depth)
}

impl Cli {
    pub fn limits(&self) -> Limits {
        Limits {
            max_steps: self.max_steps,
            max_call_depth: self.max_call_depth,
            max_string_len: self.max_string_len,
            max_output_len: self.max_output_len,
        }
    }

    /// Editor text from FILE, if one was given
    pub fn initial_code(&self) -> io::Result<Option<String>> {
        match &self.file {
            Some(path) => fs::read_to_string(path).map(Some),
            None => Ok(None),
        }
    }

    pub fn playground_config(&self) -> io::Result<PlaygroundConfig> {
        Ok(PlaygroundConfig {
            language: Language::JavaScript,
            theme: self.theme,
            initial_code: self.initial_code()?,
            limits: self.limits(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("playtty").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]).unwrap();
        assert_eq!(cli.limits(), Limits::default());
        assert_eq!(cli.theme, ThemeMode::Light);
        assert_eq!(cli.log_level, LevelFilter::Info);
        assert_eq!(cli.log_file, PathBuf::from("playtty.log"));
        assert!(!cli.run);
        assert_eq!(cli.playground_config().unwrap(), PlaygroundConfig::default());
    }

    #[test]
    fn test_flags_override_limits() {
        let cli = parse(&[
            "--max-steps",
            "500",
            "--max-call-depth",
            "32",
            "--max-string-len",
            "64",
            "--max-output-len",
            "128",
            "--theme",
            "dark",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let limits = cli.limits();
        assert_eq!(limits.max_steps, 500);
        assert_eq!(limits.max_call_depth, 32);
        assert_eq!(limits.max_string_len, 64);
        assert_eq!(limits.max_output_len, 128);
        assert_eq!(cli.theme, ThemeMode::Dark);
        assert_eq!(cli.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_call_depth_is_bounded() {
        assert!(parse(&["--max-call-depth", "0"]).is_err());
        assert!(parse(&["--max-call-depth", "4097"]).is_err());
        assert!(parse(&["--max-call-depth", "deep"]).is_err());
        assert_eq!(parse(&["--max-call-depth", "4096"]).unwrap().max_call_depth, 4096);
    }

    #[test]
    fn test_run_requires_file() {
        assert!(parse(&["--run"]).is_err());
        assert!(parse(&["--run", "solution.js"]).unwrap().run);
    }

    #[test]
    fn test_file_preloads_editor() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "console.log('from file')").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&[path.as_str()]).unwrap();
        let config = cli.playground_config().unwrap();
        assert_eq!(config.initial_code.as_deref(), Some("console.log('from file')"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.js");
        let cli = parse(&[missing.to_str().unwrap()]).unwrap();
        assert!(cli.playground_config().is_err());
    }
}
