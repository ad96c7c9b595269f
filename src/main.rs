use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use taxform::app::App;
use taxform::terminal::{Terminal, TerminalEvent};
use taxform::{AppError, FieldState, FlatForm, FormConfig, FormState};

#[derive(Debug, Parser)]
#[command(name = "taxform", version, about = "Username, country and tax identifier form")]
struct Cli {
    /// YAML file with `countries` and `submit_delay_ms`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs here. The interactive form discards logs otherwise.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Fill the form interactively (default).
    Run,
    /// Validate values without a terminal UI and print a JSON report.
    Check {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long = "tax-id", default_value = "")]
        tax_id: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    is_valid: bool,
    fields: IndexMap<&'static str, &'a FieldState>,
    data: FlatForm,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let interactive = !matches!(cli.command, Some(CliCommand::Check { .. }));
    init_logging(cli.log_file.as_deref(), interactive)?;

    let config = match cli.config.as_deref() {
        Some(path) => FormConfig::load(path)?,
        None => FormConfig::default(),
    };

    match cli.command {
        Some(CliCommand::Check {
            username,
            country,
            tax_id,
        }) => check(&config, &username, &country, &tax_id),
        Some(CliCommand::Run) | None => {
            run_interactive(config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| AppError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if interactive => builder.with_writer(io::sink).init(),
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn check(
    config: &FormConfig,
    username: &str,
    country: &str,
    tax_id: &str,
) -> Result<ExitCode, AppError> {
    let form = FormState::fill(config, username, country, tax_id);
    let report = CheckReport {
        is_valid: form.is_valid(),
        fields: form
            .fields()
            .map(|(name, field)| (name.as_str(), field))
            .collect(),
        data: form.flatten(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if report.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_interactive(config: FormConfig) -> Result<(), AppError> {
    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;

    let result = event_loop(&mut terminal, config);

    terminal.finish()?;
    terminal.show_cursor()?;
    terminal.exit_raw_mode()?;

    result
}

fn event_loop(terminal: &mut Terminal, config: FormConfig) -> Result<(), AppError> {
    let mut app = App::new(config);
    let mut render_requested = true;

    loop {
        match terminal.poll_event(Duration::from_millis(80))? {
            TerminalEvent::Key(key_event) => {
                app.handle_key(key_event);
                render_requested = true;
            }
            TerminalEvent::Resize { .. } => {
                render_requested = true;
            }
            TerminalEvent::Tick => {}
        }

        if app.tick() {
            render_requested = true;
        }

        if app.should_exit() {
            break;
        }

        if render_requested {
            terminal.draw(&app.view())?;
            render_requested = false;
        }
    }

    Ok(())
}
