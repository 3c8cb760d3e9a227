use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zcalc::ui::{Palette, render_history, render_result};
use zcalc::{Config, FileStore, MemoryStore, Session, StateStore, evaluate_expression};

/// Scientific calculator with persistent history.
///
/// Pass an expression to evaluate it once, or run without arguments for an
/// interactive prompt.
#[derive(Parser, Debug)]
#[command(name = "zcalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Expression to evaluate, e.g. `2^10` or `sin(30) + 5!`
    #[arg(value_name = "EXPR", trailing_var_arg = true, allow_hyphen_values = true)]
    expression: Vec<String>,

    /// Config file (default: <config dir>/zcalc/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for history and theme (overrides the config file)
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Keep history and theme in memory only
    #[arg(long)]
    no_persist: bool,

    /// Do not record one-shot results in history
    #[arg(long)]
    no_history: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

const HELP: &str = "\
Enter an expression to calculate it. Commands:
  :history         show history (newest first)
  :load N          load history entry N
  :clear-history   delete all history
  :theme           switch between dark and light
  :clear           clear input and result
  :quit            exit";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "zcalc=debug" } else { "zcalc=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = Some(dir);
    }

    let expression = cli.expression.join(" ");

    if !expression.trim().is_empty() && cli.no_history {
        return Ok(evaluate_once(&expression, &config));
    }

    if cli.no_persist {
        let session = Session::open(MemoryStore::new(), config);
        return dispatch(session, &expression);
    }

    let data_dir = config.resolved_data_dir();
    let store = FileStore::open(&data_dir);
    tracing::debug!("Using state file {}", store.path().display());
    dispatch(Session::open(store, config), &expression)
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => match Config::default_path() {
            Some(path) => Config::load(&path).context("loading default config"),
            None => Ok(Config::default()),
        },
    }
}

fn dispatch<S: StateStore>(mut session: Session<S>, expression: &str) -> Result<ExitCode> {
    if expression.trim().is_empty() {
        repl(&mut session)?;
        return Ok(ExitCode::SUCCESS);
    }

    session.set_input(expression);
    match session.calculate() {
        Some(outcome) if outcome.is_success() => {
            println!("{}", outcome.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(outcome) => {
            println!("{}", outcome.display());
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

fn evaluate_once(expression: &str, config: &Config) -> ExitCode {
    match evaluate_expression(expression, &config.error_marker) {
        Some(outcome) => {
            println!("{}", outcome.display());
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        None => ExitCode::SUCCESS,
    }
}

fn repl<S: StateStore>(session: &mut Session<S>) -> Result<()> {
    let color = io::stdout().is_terminal();
    let mut palette = Palette::new(session.theme(), color);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "{}", palette.prompt())?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("reading input")? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(command) = line.strip_prefix(':') else {
            session.set_input(line);
            session.calculate();
            if let Some(rendered) = render_result(session, &palette) {
                writeln!(stdout, "{}", rendered)?;
            }
            continue;
        };

        let mut parts = command.split_whitespace();
        match parts.next().unwrap_or_default() {
            "q" | "quit" | "exit" => break,
            "history" | "h" => {
                let empty = &session.config().empty_history;
                for row in render_history(session.history(), empty, &palette) {
                    writeln!(stdout, "{}", row)?;
                }
            }
            "load" => {
                let index = parts.next().and_then(|n| n.parse::<usize>().ok());
                match index.and_then(|i| session.load_from_history(i).cloned()) {
                    Some(entry) => {
                        writeln!(stdout, "{}", palette.expression(&session.display_input()))?;
                        if let Some(rendered) = render_result(session, &palette) {
                            writeln!(stdout, "{}", rendered)?;
                        }
                        tracing::debug!(expression = %entry.expression, "loaded history entry");
                    }
                    None => writeln!(stdout, "{}", palette.error("no such history entry"))?,
                }
            }
            "clear-history" => {
                session.clear_history();
                writeln!(stdout, "{}", palette.muted(&session.config().empty_history))?;
            }
            "theme" => {
                let theme = session.toggle_theme();
                palette = Palette::new(theme, color);
                writeln!(stdout, "{}", palette.muted(&format!("theme: {}", theme)))?;
            }
            "clear" | "c" => session.clear_input(),
            "help" | "?" => writeln!(stdout, "{}", HELP)?,
            other => writeln!(stdout, "{}", palette.error(&format!("unknown command ':{}'", other)))?,
        }
    }

    Ok(())
}
