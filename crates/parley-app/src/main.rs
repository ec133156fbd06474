//! Parley binary: composition root and interactive REPL.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Wire collaborators, registry, validators and sessions
//! 4. Read typed intents from stdin until quit, EOF or Ctrl-C

mod cli;
mod input;

use std::io::Write;

use clap::Parser;
use parley_action::Services;
use parley_chat::SessionManager;
use parley_core::config::ParleyConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use crate::cli::CliArgs;
use crate::input::{Command, InputParser, USAGE};

const GOODBYE: &str = "Goodbye! Thanks for chatting!";
const ERROR_REPLY: &str = "I'm sorry, I encountered an error. Please try again.";

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "You: ")?;
    stdout.flush()
}

/// Run one parsed command against the current session.
fn execute(
    manager: &SessionManager,
    session: &mut Uuid,
    command: Command,
    bot: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    Ok(match command {
        Command::Empty | Command::Quit => None,
        Command::Slots => Some(serde_json::to_string_pretty(&manager.slots(*session)?)?),
        Command::Log => Some(serde_json::to_string_pretty(
            &manager.mutation_log(*session)?,
        )?),
        Command::Reset => {
            // A session that is already gone still gets a fresh one.
            if let Err(e) = manager.end_session(*session) {
                tracing::warn!(session_id = %session, error = %e, "Could not end session");
            }
            *session = manager.create_session()?;
            Some(format!("{}: Starting over. What can I do for you?", bot))
        }
        Command::Turn(turn) => manager
            .handle(*session, &turn)?
            .response
            .map(|response| format!("{}: {}", bot, response)),
    })
}

/// Output for one command. Failures are logged and answered with an apology
/// so the conversation keeps going.
fn reply_to(
    manager: &SessionManager,
    session: &mut Uuid,
    command: Command,
    bot: &str,
) -> Option<String> {
    match execute(manager, session, command, bot) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(session_id = %session, error = %e, "Command failed");
            Some(format!("{}: {}", bot, ERROR_REPLY))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Loaded before tracing so the config file can set the level;
    // the outcome is reported once the subscriber is up.
    let config_file = args.resolve_config_path();
    let (mut config, load_error) = match ParleyConfig::load(&config_file) {
        Ok(config) => (config, None),
        Err(e) => (ParleyConfig::default(), Some(e)),
    };
    if let Some(seed) = args.seed {
        config.assistant.random_seed = Some(seed);
    }

    // Tracing. RUST_LOG > --log-level > [general].log_level
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Parley v{}", env!("CARGO_PKG_VERSION"));
    match load_error {
        None => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Some(e) if config_file.exists() => {
            tracing::warn!(path = %config_file.display(), error = %e, "Invalid configuration, using defaults")
        }
        Some(_) => tracing::info!(path = %config_file.display(), "No configuration file, using defaults"),
    }

    let services = Services::system(&config);
    let manager = SessionManager::from_config(&config, services);
    tracing::info!(
        intents = manager.dispatcher().registry().len(),
        "Action registry ready"
    );
    let parser = InputParser::new()?;
    let bot = config.assistant.bot_name.clone();

    let mut session = manager.create_session()?;
    println!(
        "{}: Hi! I'm {}. Type 'help' to see what I can do, or 'quit' to leave.",
        bot, bot
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else {
            println!("{}: {}", bot, GOODBYE);
            break;
        };

        match parser.parse(&line) {
            Ok(Command::Quit) => {
                println!("{}: {}", bot, GOODBYE);
                break;
            }
            Ok(command) => {
                if let Some(output) = reply_to(&manager, &mut session, command, &bot) {
                    println!("{}", output);
                }
            }
            Err(e) => {
                println!("{}", e);
                println!("{}", USAGE);
            }
        }
    }

    if let Err(e) = manager.end_session(session) {
        tracing::warn!(session_id = %session, error = %e, "Could not end session");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::types::TurnInput;

    fn manager() -> SessionManager {
        let config = ParleyConfig::default();
        SessionManager::from_config(&config, Services::system(&config))
    }

    #[test]
    fn test_turn_reply_is_prefixed_with_bot_name() {
        let manager = manager();
        let mut session = manager.create_session().unwrap();
        let reply = reply_to(
            &manager,
            &mut session,
            Command::Turn(TurnInput::new("help")),
            "Parley",
        );
        assert!(reply.unwrap().starts_with("Parley: "));
    }

    #[test]
    fn test_failed_turn_answers_with_apology() {
        let manager = manager();
        let mut session = Uuid::new_v4();
        let reply = reply_to(
            &manager,
            &mut session,
            Command::Turn(TurnInput::new("help")),
            "Parley",
        );
        assert_eq!(reply, Some(format!("Parley: {}", ERROR_REPLY)));

        let reply = reply_to(&manager, &mut session, Command::Slots, "Parley");
        assert_eq!(reply, Some(format!("Parley: {}", ERROR_REPLY)));
    }

    #[test]
    fn test_reset_recovers_from_missing_session() {
        let manager = manager();
        let mut session = Uuid::new_v4();
        let stale = session;
        let reply = reply_to(&manager, &mut session, Command::Reset, "Parley");
        assert!(reply.unwrap().contains("Starting over"));
        assert_ne!(session, stale);
        assert!(manager.slots(session).is_ok());
    }

    #[test]
    fn test_silent_turn_prints_nothing() {
        let manager = manager();
        let mut session = manager.create_session().unwrap();
        let reply = reply_to(
            &manager,
            &mut session,
            Command::Turn(TurnInput::new("session_start")),
            "Parley",
        );
        assert!(reply.is_none());
    }
}
