// CLI parsing into playground configuration

use clap::Parser;
use playtty::config::Cli;
use playtty::playground::state::{PageState, ThemeMode};
use playtty::runner::run_code;
use std::io::Write;

#[test]
fn test_file_and_limits_drive_the_page() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "let n = 0;").unwrap();
    writeln!(file, "while (true) {{ n++; }}").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let cli = Cli::try_parse_from(["playtty", "--max-steps", "100", "--theme", "dark", path.as_str()])
        .unwrap();
    let config = cli.playground_config().unwrap();

    let state = PageState::new(&config);
    assert_eq!(state.theme, ThemeMode::Dark);
    assert!(state.code.starts_with("let n = 0;"));
    assert!(state.submit_enabled);

    let report = run_code(&state.code, &config.limits);
    assert_eq!(report.output, "Error: Execution step limit exceeded (100 steps)");
}

#[test]
fn test_unknown_theme_is_rejected() {
    assert!(Cli::try_parse_from(["playtty", "--theme", "sepia"]).is_err());
}
