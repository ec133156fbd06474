//! REPL line parser.
//!
//! Intents are typed explicitly since no language understanding happens
//! here:
//!
//! ```text
//! <intent> [name=value | name="quoted value"]... [: free utterance]
//! ```
//!
//! e.g. `book_appointment time=3pm person="Dr. Lee"` or
//! `faq: what are your hours?`.

use parley_core::types::TurnInput;
use regex::Regex;

pub const USAGE: &str = "Usage: <intent> [name=value | name=\"quoted value\"]... [: utterance]\n\
Examples:\n  get_weather location=\"New York\"\n  book_appointment time=3pm date=tomorrow\n  faq: what are your hours?\n\
Commands: /slots, /log, /reset, help, quit";

const QUIT_WORDS: &[&str] = &["quit", "exit", "bye", "q"];

/// One parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Quit,
    Slots,
    Log,
    Reset,
    Turn(TurnInput),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("expected an intent name")]
    MissingIntent,
    #[error("unexpected input near '{0}'")]
    Unexpected(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

pub struct InputParser {
    head: Regex,
    arg: Regex,
}

impl InputParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            head: Regex::new(r"^(?P<intent>[A-Za-z_][\w.\-]*)(?P<rest>.*)$")?,
            arg: Regex::new(r#"^\s*(?P<name>\w+)=(?:"(?P<quoted>[^"]*)"|(?P<bare>[^\s"]+))"#)?,
        })
    }

    pub fn parse(&self, line: &str) -> Result<Command, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }
        if QUIT_WORDS.contains(&line.to_lowercase().as_str()) {
            return Ok(Command::Quit);
        }
        if let Some(command) = line.strip_prefix('/') {
            return match command.trim() {
                "slots" => Ok(Command::Slots),
                "log" => Ok(Command::Log),
                "reset" => Ok(Command::Reset),
                other => Err(InputError::UnknownCommand(other.to_string())),
            };
        }

        let caps = self.head.captures(line).ok_or(InputError::MissingIntent)?;
        let mut turn = TurnInput::new(&caps["intent"]);
        let mut rest = caps.name("rest").map_or("", |m| m.as_str());

        while let Some(arg) = self.arg.captures(rest) {
            let value = arg
                .name("quoted")
                .or_else(|| arg.name("bare"))
                .map_or("", |m| m.as_str());
            turn = turn.with_entity(&arg["name"], value);
            rest = &rest[arg.get(0).map_or(0, |m| m.end())..];
        }

        let rest = rest.trim();
        if let Some(utterance) = rest.strip_prefix(':') {
            let utterance = utterance.trim();
            if !utterance.is_empty() {
                turn = turn.with_utterance(utterance);
            }
        } else if !rest.is_empty() {
            return Err(InputError::Unexpected(rest.to_string()));
        }

        Ok(Command::Turn(turn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, InputError> {
        InputParser::new().unwrap().parse(line)
    }

    fn turn(line: &str) -> TurnInput {
        match parse(line).unwrap() {
            Command::Turn(turn) => turn,
            other => panic!("expected a turn, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_intent() {
        assert_eq!(turn("get_time"), TurnInput::new("get_time"));
        assert_eq!(turn("  help  "), TurnInput::new("help"));
    }

    #[test]
    fn test_entities_bare_and_quoted() {
        let t = turn(r#"book_appointment time=10:30 person="Dr. Lee" date=tomorrow"#);
        assert_eq!(
            t,
            TurnInput::new("book_appointment")
                .with_entity("time", "10:30")
                .with_entity("person", "Dr. Lee")
                .with_entity("date", "tomorrow")
        );
    }

    #[test]
    fn test_utterance_after_colon() {
        assert_eq!(
            turn("faq: what are your hours?"),
            TurnInput::new("faq").with_utterance("what are your hours?")
        );
        assert_eq!(
            turn("chitchat topic=fun : tell me a joke"),
            TurnInput::new("chitchat")
                .with_entity("topic", "fun")
                .with_utterance("tell me a joke")
        );
        assert_eq!(turn("faq:"), TurnInput::new("faq"));
    }

    #[test]
    fn test_dotted_intent_names() {
        assert_eq!(turn("weather.get"), TurnInput::new("weather.get"));
    }

    #[test]
    fn test_special_lines() {
        assert_eq!(parse(""), Ok(Command::Empty));
        assert_eq!(parse("QUIT"), Ok(Command::Quit));
        assert_eq!(parse("bye"), Ok(Command::Quit));
        assert_eq!(parse("/slots"), Ok(Command::Slots));
        assert_eq!(parse("/log"), Ok(Command::Log));
        assert_eq!(parse("/reset"), Ok(Command::Reset));
        assert_eq!(
            parse("/nope"),
            Err(InputError::UnknownCommand("nope".to_string()))
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(parse("123abc"), Err(InputError::MissingIntent));
        assert_eq!(
            parse("hello there"),
            Err(InputError::Unexpected("there".to_string()))
        );
        assert_eq!(
            parse(r#"get_weather location="Oslo"#),
            Err(InputError::Unexpected(r#"location="Oslo"#.to_string()))
        );
    }
}
