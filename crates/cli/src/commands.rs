//! The REPL's command grammar.

use std::fmt;
use std::str::FromStr;

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { name: String, host: String, port: u16 },
    Remove { name: String },
    Put { key: String, value: String },
    Get { key: String },
    Describe,
    Help,
    Quit,
}

/// The human-readable result of running a `Command`, printed to stdout by
/// the REPL loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Text(String),
    Quit,
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Text(text) => write!(f, "{text}"),
            CommandResult::Quit => write!(f, "bye"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("wrong number of arguments for '{command}': expected {expected}")]
    WrongArity { command: String, expected: &'static str },
    #[error("invalid port '{0}'")]
    InvalidPort(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (head, rest) = words.split_first().ok_or(ParseCommandError::Empty)?;

        match *head {
            "add" => match rest {
                [name, host, port] => {
                    let port = port
                        .parse::<u16>()
                        .map_err(|_| ParseCommandError::InvalidPort((*port).to_string()))?;
                    Ok(Command::Add {
                        name: name.to_string(),
                        host: host.to_string(),
                        port,
                    })
                }
                _ => Err(ParseCommandError::WrongArity {
                    command: "add".to_string(),
                    expected: "<name> <host> <port>",
                }),
            },
            "remove" => match rest {
                [name] => Ok(Command::Remove { name: name.to_string() }),
                _ => Err(ParseCommandError::WrongArity {
                    command: "remove".to_string(),
                    expected: "<name>",
                }),
            },
            "put" => match rest {
                [key, value] => Ok(Command::Put {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
                _ => Err(ParseCommandError::WrongArity {
                    command: "put".to_string(),
                    expected: "<key> <value>",
                }),
            },
            "get" => match rest {
                [key] => Ok(Command::Get { key: key.to_string() }),
                _ => Err(ParseCommandError::WrongArity {
                    command: "get".to_string(),
                    expected: "<key>",
                }),
            },
            "describe" if rest.is_empty() => Ok(Command::Describe),
            "help" if rest.is_empty() => Ok(Command::Help),
            "quit" | "exit" if rest.is_empty() => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  add <name> <host> <port>   join a node to the ring
  remove <name>               remove a node from the ring
  put <key> <value>           write a key (replicated to primary + secondary)
  get <key>                   read a key (fails over to secondary on error)
  describe                    list nodes and their keys
  help                        show this message
  quit | exit                 leave the REPL";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add() {
        assert_eq!(
            "add m1 10.0.0.1 7001".parse::<Command>().unwrap(),
            Command::Add {
                name: "m1".to_string(),
                host: "10.0.0.1".to_string(),
                port: 7001,
            }
        );
    }

    #[test]
    fn parses_remove_put_get() {
        assert_eq!(
            "remove m1".parse::<Command>().unwrap(),
            Command::Remove { name: "m1".to_string() }
        );
        assert_eq!(
            "put k v".parse::<Command>().unwrap(),
            Command::Put { key: "k".to_string(), value: "v".to_string() }
        );
        assert_eq!(
            "get k".parse::<Command>().unwrap(),
            Command::Get { key: "k".to_string() }
        );
    }

    #[test]
    fn parses_nullary_commands() {
        assert_eq!("describe".parse::<Command>().unwrap(), Command::Describe);
        assert_eq!("help".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("quit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_bad_arity_and_unknown_commands() {
        assert!(matches!(
            "add m1".parse::<Command>(),
            Err(ParseCommandError::WrongArity { .. })
        ));
        assert!(matches!(
            "frobnicate".parse::<Command>(),
            Err(ParseCommandError::Unknown(_))
        ));
        assert!(matches!("".parse::<Command>(), Err(ParseCommandError::Empty)));
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(matches!(
            "add m1 10.0.0.1 notaport".parse::<Command>(),
            Err(ParseCommandError::InvalidPort(_))
        ));
    }
}
