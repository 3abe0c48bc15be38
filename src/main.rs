mod actions;
mod app;
mod context;
mod events;
mod logging;
mod persistence;
mod state;
mod ui;

use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::{
    ExecutableCommand,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use calc_base::config::{ClientConfig, set_active_theme};
use calc_base::constants::ERRORS_DIR;

use app::App;
use context::AppContext;
use persistence::load_settings;
use state::State;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = ClientConfig::from_env();

    if let Err(e) = logging::init(&config) {
        eprintln!("logging disabled: {}", e);
    }

    // One-shot evaluation: calc-client eval "<expr>"
    if args.len() >= 2 && args[1] == "eval" {
        return run_eval(config, &args[2..]);
    }

    install_panic_hook(config.store_dir.clone());

    let settings = load_settings(&config.store_dir);
    set_active_theme(&settings.active_theme);
    let ctx = AppContext::from_config(config)?;
    tracing::info!(base_url = %ctx.config.base_url, authenticated = ctx.auth.is_authenticated(), "starting");

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(State::new(calc_base::config::active_theme_id()), ctx);
    let outcome = app.run(&mut terminal);

    // Cleanup
    disable_raw_mode()?;
    io::stdout().execute(DisableBracketedPaste)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    outcome
}

/// Restore the terminal and append the panic to `{store}/errors/panic.log`.
fn install_panic_hook(store_dir: PathBuf) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableBracketedPaste);
        let _ = io::stdout().execute(LeaveAlternateScreen);

        let error_dir = store_dir.join(ERRORS_DIR);
        let _ = std::fs::create_dir_all(&error_dir);
        let ts = chrono::Utc::now().to_rfc3339();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("[{}] {}\n\n{}\n\n---\n", ts, info, backtrace);
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(error_dir.join("panic.log"))
            .and_then(|mut f| f.write_all(msg.as_bytes()));

        default_hook(info);
    }));
}

/// Run one submit/poll lifecycle and print the outcome.
/// Usage: calc-client eval "<expression>"
fn run_eval(config: ClientConfig, args: &[String]) -> io::Result<()> {
    let expression = args.join(" ");
    if expression.trim().is_empty() {
        eprintln!("Usage: calc-client eval \"<expression>\"");
        std::process::exit(2);
    }

    let ctx = AppContext::from_config(config)?;
    let mut evaluation = ctx.evaluation();
    evaluation.set_expression(&expression);
    evaluation.send_blocking();

    let snap = evaluation.snapshot();
    match (snap.result, snap.error) {
        (Some(result), _) => {
            println!("{} = {}", expression, result);
            Ok(())
        }
        (None, Some(err)) => {
            eprintln!("{}: {}", snap.phase.label(), err);
            std::process::exit(1);
        }
        (None, None) => {
            eprintln!("{}: no result", snap.phase.label());
            std::process::exit(1);
        }
    }
}
