/// ----- COMMANDS -----
/// Parses one line of whitespace separated tokens into a dispatcher command.
/// Tokens are case sensitive; anything that does not parse is reported
/// back to the caller as a `CommandError`.

use shared_resources::config::NUM_CABINS;
use shared_resources::level::{Level, LevelError};

pub const HELP_TEXT: &str = include_str!("../../resources/help.msg");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelAction {
    Call,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CabinButton {
    Open,
    Close,
    CallDispatcher,
    Level(Level),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Level { level: Level, action: LevelAction },
    Cabin { cabin: usize, button: CabinButton },
    Board(BoardFormat),
    Help,
    Quit,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("No command given, type `help` for the list of commands")]
    Empty,
    #[error("Unknown caller: {0}")]
    UnknownCaller(String),
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("Incorrect level parameter: {token} ({reason})")]
    InvalidLevel { token: String, reason: LevelError },
    #[error("Level action was not specified or specified incorrectly: {0}")]
    LevelAction(String),
    #[error("Incorrect cabin parameter: {0}")]
    InvalidCabin(String),
    #[error("Incorrect cabin action: {0}, expected --press-button")]
    CabinAction(String),
    #[error("Incorrect cabin button: {token} ({reason})")]
    InvalidButton { token: String, reason: LevelError },
    #[error("Unexpected argument: {0}")]
    Unexpected(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let command = match tokens.next().ok_or(CommandError::Empty)? {
            "level" => {
                let token = tokens.next().ok_or(CommandError::Missing("level number"))?;
                let level = parse_level(token)
                    .map_err(|reason| CommandError::InvalidLevel { token: token.to_string(), reason })?;
                let action = match tokens.next() {
                    Some("--call") => LevelAction::Call,
                    Some("--status") => LevelAction::Status,
                    Some(other) => return Err(CommandError::LevelAction(other.to_string())),
                    None => return Err(CommandError::Missing("level action (--call or --status)")),
                };
                Command::Level { level, action }
            },
            "cabin" => {
                let token = tokens.next().ok_or(CommandError::Missing("cabin number"))?;
                let cabin = token
                    .parse::<usize>()
                    .ok()
                    .filter(|id| *id < NUM_CABINS)
                    .ok_or_else(|| CommandError::InvalidCabin(token.to_string()))?;
                match tokens.next() {
                    Some("--press-button") => {},
                    Some(other) => return Err(CommandError::CabinAction(other.to_string())),
                    None => return Err(CommandError::Missing("cabin action (--press-button)")),
                }
                let button = match tokens.next().ok_or(CommandError::Missing("cabin button"))? {
                    "open" => CabinButton::Open,
                    "close" => CabinButton::Close,
                    "call-dispatcher" => CabinButton::CallDispatcher,
                    token => CabinButton::Level(
                        parse_level(token)
                            .map_err(|reason| CommandError::InvalidButton { token: token.to_string(), reason })?,
                    ),
                };
                Command::Cabin { cabin, button }
            },
            "board" => match tokens.next() {
                None => Command::Board(BoardFormat::Table),
                Some("--json") => Command::Board(BoardFormat::Json),
                Some(other) => return Err(CommandError::Unexpected(other.to_string())),
            },
            "help" => Command::Help,
            "quit" => Command::Quit,
            other => return Err(CommandError::UnknownCaller(other.to_string())),
        };

        match tokens.next() {
            Some(extra) => Err(CommandError::Unexpected(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_level(token: &str) -> Result<Level, LevelError> {
    token.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(num: u8) -> Level {
        Level::new(num).unwrap()
    }

    #[test]
    fn parses_level_commands() {
        assert_eq!(
            Command::parse("level 3 --call"),
            Ok(Command::Level { level: level(3), action: LevelAction::Call }),
        );
        assert_eq!(
            Command::parse("  level 20   --status "),
            Ok(Command::Level { level: level(20), action: LevelAction::Status }),
        );
    }

    #[test]
    fn parses_cabin_buttons() {
        let button = |line: &str| match Command::parse(line) {
            Ok(Command::Cabin { button, .. }) => button,
            other => panic!("unexpected parse result {:?}", other),
        };
        assert_eq!(button("cabin 0 --press-button open"), CabinButton::Open);
        assert_eq!(button("cabin 1 --press-button close"), CabinButton::Close);
        assert_eq!(button("cabin 1 --press-button call-dispatcher"), CabinButton::CallDispatcher);
        assert_eq!(button("cabin 0 --press-button 14"), CabinButton::Level(level(14)));
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("board"), Ok(Command::Board(BoardFormat::Table)));
        assert_eq!(Command::parse("board --json"), Ok(Command::Board(BoardFormat::Json)));
    }

    #[test]
    fn reports_bad_levels() {
        assert_eq!(
            Command::parse("level 21 --call"),
            Err(CommandError::InvalidLevel { token: "21".to_string(), reason: LevelError::OutOfRange("21".to_string()) }),
        );
        assert!(matches!(
            Command::parse("level two --status"),
            Err(CommandError::InvalidLevel { reason: LevelError::NotANumber(_), .. })
        ));
        assert_eq!(Command::parse("level 4"), Err(CommandError::Missing("level action (--call or --status)")));
        assert_eq!(Command::parse("level 4 --open"), Err(CommandError::LevelAction("--open".to_string())));
    }

    #[test]
    fn reports_bad_cabin_input() {
        assert_eq!(Command::parse("cabin 2 --press-button open"), Err(CommandError::InvalidCabin("2".to_string())));
        assert_eq!(Command::parse("cabin x --press-button open"), Err(CommandError::InvalidCabin("x".to_string())));
        assert_eq!(Command::parse("cabin 0 --push open"), Err(CommandError::CabinAction("--push".to_string())));
        assert_eq!(Command::parse("cabin 0 --press-button"), Err(CommandError::Missing("cabin button")));
        assert!(matches!(
            Command::parse("cabin 1 --press-button upstairs"),
            Err(CommandError::InvalidButton { reason: LevelError::NotANumber(_), .. })
        ));
        assert!(matches!(
            Command::parse("cabin 1 --press-button 0"),
            Err(CommandError::InvalidButton { reason: LevelError::OutOfRange(ref num), .. }) if num == "0"
        ));
    }

    #[test]
    fn reports_unknown_and_trailing_tokens() {
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(Command::parse("Level 3 --call"), Err(CommandError::UnknownCaller("Level".to_string())));
        assert_eq!(Command::parse("quit now"), Err(CommandError::Unexpected("now".to_string())));
    }

    #[test]
    fn error_messages_name_the_bad_token() {
        let err = Command::parse("level 0 --call").unwrap_err();
        assert_eq!(err.to_string(), "Incorrect level parameter: 0 (level 0 is outside of 1..=20)");
        let err = Command::parse("level 99999999999999999999 --status").unwrap_err();
        assert!(err.to_string().ends_with("(level 99999999999999999999 is outside of 1..=20)"));
    }

    #[test]
    fn help_lists_every_command() {
        for command in ["level <N> --call", "--status", "--press-button", "board", "help", "quit"] {
            assert!(HELP_TEXT.contains(command), "help text is missing {}", command);
        }
    }
}
