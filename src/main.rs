// playtty: terminal coding playground with a sandboxed script evaluator

use std::fs::OpenOptions;
use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use playtty::config::Cli;
use playtty::runner::run_code;
use playtty::ui::App;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli
        .playground_config()
        .context("failed to read the initial code file")?;

    if cli.run {
        let source = config.initial_code.unwrap_or_default();
        let report = run_code(&source, &config.limits);
        log::info!("headless run finished in {} steps", report.steps);
        println!("{}", report.output());
        if report.is_error() {
            std::process::exit(1);
        }
        return Ok(());
    }

    log::info!("starting playground (theme {:?})", config.theme);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal event loop failed")?;
    log::info!("playground closed");
    Ok(())
}

/// Logs go to a file so they never draw over the TUI
fn init_logging(cli: &Cli) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .try_init()
        .context("failed to initialise logging")?;
    Ok(())
}
