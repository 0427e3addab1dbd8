//! Text input adapter.
//!
//! Turns one line typed by the player into either a game [`Intent`] or a
//! meta command handled by the client itself. Names keep the case they were
//! typed in; the engine matches them case-insensitively.

use std::str::FromStr;

use rpg_core::{Direction, Intent};
use thiserror::Error;

/// Slot used by `save` and `load` without an argument.
pub const DEFAULT_SLOT: &str = "quicksave";

pub const HELP: &[&str] = &[
    "move <n|s|e|w>, attack <name>, examine <name>, talk <name>, wait",
    "use <item> [on <target>], cast <ability> [on <target>]",
    "pickup <item>, equip <item>, drop <item>, choose <n>",
    "save [slot], load [slot], saves, status, help, quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Game(Intent),
    Save(String),
    Load(String),
    /// List saved slots.
    Saves,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Type a command, or 'help'.")]
    Empty,

    #[error("Unknown command '{0}'. Type 'help' for a list.")]
    Unknown(String),

    #[error("'{verb}' needs {what}.")]
    MissingArgument {
        verb: &'static str,
        what: &'static str,
    },

    #[error("'{0}' is not a direction. Use n, s, e or w.")]
    BadDirection(String),

    #[error("'{0}' is not an option number.")]
    BadOption(String),
}

/// Parses one input line.
///
/// While a conversation is open a bare number picks that option.
pub fn parse(line: &str, in_conversation: bool) -> Result<Command, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((verb, args)) = words.split_first() else {
        return Err(ParseError::Empty);
    };
    let verb = verb.to_ascii_lowercase();

    if in_conversation && args.is_empty() && verb.parse::<usize>().is_ok() {
        return choose(&verb);
    }

    let command = match verb.as_str() {
        "move" | "go" => {
            let word = args.first().ok_or(ParseError::MissingArgument {
                verb: "move",
                what: "a direction",
            })?;
            let direction = Direction::from_str(word)
                .map_err(|_| ParseError::BadDirection(word.to_string()))?;
            Command::Game(Intent::Move(direction))
        }
        "attack" => Command::Game(Intent::Attack {
            target: rest(args, "attack", "a target")?,
        }),
        "examine" | "look" => Command::Game(Intent::Examine {
            target: rest(args, "examine", "a target")?,
        }),
        "talk" => Command::Game(Intent::Talk {
            target: rest(args, "talk", "someone to talk to")?,
        }),
        "use" => {
            let (item, target) = split_target(args, "use", "an item")?;
            Command::Game(Intent::Use { item, target })
        }
        "cast" => {
            let (ability, target) = split_target(args, "cast", "an ability")?;
            Command::Game(Intent::Cast { ability, target })
        }
        "choose" => {
            let word = args.first().ok_or(ParseError::MissingArgument {
                verb: "choose",
                what: "an option number",
            })?;
            return choose(word);
        }
        "pickup" | "get" => Command::Game(Intent::Pickup {
            item: rest(args, "pickup", "an item")?,
        }),
        "equip" => Command::Game(Intent::Equip {
            item: rest(args, "equip", "an item")?,
        }),
        "drop" => Command::Game(Intent::Drop {
            item: rest(args, "drop", "an item")?,
        }),
        "wait" => Command::Game(Intent::Wait),
        "save" => Command::Save(slot(args)),
        "load" => Command::Load(slot(args)),
        "saves" => Command::Saves,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(ParseError::Unknown(verb)),
    };
    Ok(command)
}

fn rest(args: &[&str], verb: &'static str, what: &'static str) -> Result<String, ParseError> {
    if args.is_empty() {
        return Err(ParseError::MissingArgument { verb, what });
    }
    Ok(args.join(" "))
}

/// Splits `<name> [on <target>]` at the last `on`.
fn split_target(
    args: &[&str],
    verb: &'static str,
    what: &'static str,
) -> Result<(String, Option<String>), ParseError> {
    let split = args
        .iter()
        .rposition(|w| w.eq_ignore_ascii_case("on"))
        .filter(|&i| i > 0 && i + 1 < args.len());
    match split {
        Some(i) => Ok((args[..i].join(" "), Some(args[i + 1..].join(" ")))),
        None => Ok((rest(args, verb, what)?, None)),
    }
}

fn slot(args: &[&str]) -> String {
    args.first().copied().unwrap_or(DEFAULT_SLOT).to_string()
}

/// Options are shown from 1; intents index from 0.
fn choose(word: &str) -> Result<Command, ParseError> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Command::Game(Intent::Choose { index: n - 1 })),
        _ => Err(ParseError::BadOption(word.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(line: &str) -> Intent {
        match parse(line, false) {
            Ok(Command::Game(intent)) => intent,
            other => panic!("{line:?} parsed to {other:?}"),
        }
    }

    #[test]
    fn directions_accept_short_and_long_forms() {
        assert_eq!(game("move n"), Intent::Move(Direction::North));
        assert_eq!(game("MOVE East"), Intent::Move(Direction::East));
        assert_eq!(game("go left"), Intent::Move(Direction::West));
        assert_eq!(
            parse("move x", false),
            Err(ParseError::BadDirection("x".into()))
        );
    }

    #[test]
    fn multi_word_names_are_joined() {
        assert_eq!(
            game("equip Aethelgard Plate"),
            Intent::Equip {
                item: "Aethelgard Plate".into()
            }
        );
        assert_eq!(
            game("examine ancient statue"),
            Intent::Examine {
                target: "ancient statue".into()
            }
        );
    }

    #[test]
    fn use_and_cast_split_on_target() {
        assert_eq!(
            game("use Poison Dart on Kane"),
            Intent::Use {
                item: "Poison Dart".into(),
                target: Some("Kane".into())
            }
        );
        assert_eq!(
            game("cast Healing Light"),
            Intent::Cast {
                ability: "Healing Light".into(),
                target: None
            }
        );
        assert_eq!(
            game("cast Shield Bash on Goblin Chief"),
            Intent::Cast {
                ability: "Shield Bash".into(),
                target: Some("Goblin Chief".into())
            }
        );
    }

    #[test]
    fn options_are_one_based() {
        assert_eq!(game("choose 1"), Intent::Choose { index: 0 });
        assert_eq!(
            parse("2", true),
            Ok(Command::Game(Intent::Choose { index: 1 }))
        );
        assert_eq!(parse("0", true), Err(ParseError::BadOption("0".into())));
        assert!(matches!(parse("2", false), Err(ParseError::Unknown(_))));
    }

    #[test]
    fn meta_commands() {
        assert_eq!(parse("save", false), Ok(Command::Save(DEFAULT_SLOT.into())));
        assert_eq!(parse("load slot2", false), Ok(Command::Load("slot2".into())));
        assert_eq!(parse("quit", false), Ok(Command::Quit));
        assert_eq!(parse("   ", false), Err(ParseError::Empty));
        assert_eq!(
            parse("attack", false),
            Err(ParseError::MissingArgument {
                verb: "attack",
                what: "a target"
            })
        );
    }
}
