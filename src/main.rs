mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use keycalc::calculator::{CalculatorEngine, Snapshot};
use keycalc::config::Config;
use keycalc::keys::parse_keys;
use keycalc::ui::{Session, render_keypad, terminal_bell};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries only the display.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keycalc=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?.apply_env();
    if let Some(precision) = cli.precision {
        config.engine.division_precision = precision;
    }
    tracing::debug!(?config, "Starting keycalc");

    let mut engine = CalculatorEngine::with_precision(config.engine.division_precision);
    if config.feedback.bell {
        engine.set_on_key(terminal_bell());
    }

    match cli.command.unwrap_or(Commands::Repl { no_keypad: false }) {
        Commands::Keys => println!("{}", render_keypad()),
        Commands::Eval { keys } => {
            let input = keys.join(" ");
            let keys = parse_keys(&input).with_context(|| format!("Invalid keys: {}", input))?;
            engine.handle_keys(keys);

            if cli.json {
                let snapshot = Snapshot::capture(&engine);
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("{}", engine.display());
            }
        }
        Commands::Repl { no_keypad } => {
            let stdout = std::io::stdout().lock();
            let mut session = Session::new(engine, stdout)
                .with_json(cli.json)
                .with_copy_on_equals(config.display.copy_on_equals);

            if config.display.show_keypad && !no_keypad {
                session.print_banner()?;
            }
            session.run(std::io::stdin().lock())?;
        }
    }

    Ok(())
}
