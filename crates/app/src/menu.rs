use std::fmt;

use revise_core::model::SelectionPolicy;

use crate::console::TerminalConsole;

#[derive(Debug)]
pub enum MenuError {
    NotANumber { raw: String },
    UnknownChoice(i64),
    NoCheckpoints,
    UnknownCheckpoint { raw: String },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::NotANumber { raw } => write!(f, "expected a number, got {raw:?}"),
            MenuError::UnknownChoice(n) => write!(f, "unknown menu choice: {n}"),
            MenuError::NoCheckpoints => write!(f, "there are no checkpoints to resume"),
            MenuError::UnknownCheckpoint { raw } => write!(f, "no checkpoint at index {raw:?}"),
        }
    }
}

impl std::error::Error for MenuError {}

/// Top-level menu entries, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Resume,
    All,
    LastSession,
    LastNDays,
    ByFirstCharacter,
    FromMistakes,
}

impl MenuChoice {
    fn from_number(n: i64) -> Option<Self> {
        match n {
            0 => Some(Self::Resume),
            1 => Some(Self::All),
            2 => Some(Self::LastSession),
            3 => Some(Self::LastNDays),
            4 => Some(Self::ByFirstCharacter),
            5 => Some(Self::FromMistakes),
            _ => None,
        }
    }
}

/// What the user asked the program to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Resume(String),
    Revise(SelectionPolicy),
}

pub fn parse_number(raw: &str) -> Result<i64, MenuError> {
    raw.trim().parse().map_err(|_| MenuError::NotANumber {
        raw: raw.to_owned(),
    })
}

/// Parse the menu number. Resuming needs at least one checkpoint.
pub fn parse_choice(raw: &str, has_checkpoints: bool) -> Result<MenuChoice, MenuError> {
    let n = parse_number(raw)?;
    match MenuChoice::from_number(n) {
        Some(MenuChoice::Resume) if !has_checkpoints => Err(MenuError::NoCheckpoints),
        Some(choice) => Ok(choice),
        None => Err(MenuError::UnknownChoice(n)),
    }
}

/// The first non-blank character typed, if any.
#[must_use]
pub fn parse_character(raw: &str) -> Option<char> {
    raw.trim().chars().next()
}

pub fn pick_checkpoint(raw: &str, names: &[String]) -> Result<String, MenuError> {
    parse_number(raw)
        .ok()
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| names.get(i).cloned())
        .ok_or_else(|| MenuError::UnknownCheckpoint {
            raw: raw.to_owned(),
        })
}

/// Show the menu and collect everything needed to start or resume a session.
pub fn prompt_request(
    console: &mut TerminalConsole,
    checkpoints: &[String],
) -> Result<Request, Box<dyn std::error::Error>> {
    console.clear()?;
    if !checkpoints.is_empty() {
        console.say("0: Resume checkpoint")?;
    }
    console.say("1: Revise entire database")?;
    console.say("2: Revise last session")?;
    console.say("3: Revise last N days")?;
    console.say("4: Challenge yourself")?;
    console.say("5: Learn from mistakes")?;

    let raw = console.read_line("\nEnter your choice: ")?;
    let choice = parse_choice(&raw, !checkpoints.is_empty())?;
    console.clear()?;

    let request = match choice {
        MenuChoice::Resume => {
            for (i, name) in checkpoints.iter().enumerate() {
                console.say(format!("{i}: {name}"))?;
            }
            let raw = console.read_line("\nEnter your choice: ")?;
            Request::Resume(pick_checkpoint(&raw, checkpoints)?)
        }
        MenuChoice::All => Request::Revise(SelectionPolicy::All),
        MenuChoice::LastSession => Request::Revise(SelectionPolicy::LastSession),
        MenuChoice::LastNDays => {
            let raw = console.read_line("\nEnter the value of N: ")?;
            Request::Revise(SelectionPolicy::LastNDays(parse_number(&raw)?))
        }
        MenuChoice::ByFirstCharacter => {
            let raw = console.read_line("\nEnter a character: ")?;
            Request::Revise(SelectionPolicy::ByFirstCharacter(parse_character(&raw)))
        }
        MenuChoice::FromMistakes => Request::Revise(SelectionPolicy::FromMistakes),
    };

    console.clear()?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_map_to_choices() {
        assert_eq!(parse_choice("1", false).unwrap(), MenuChoice::All);
        assert_eq!(parse_choice(" 5\n", false).unwrap(), MenuChoice::FromMistakes);
        assert_eq!(parse_choice("0", true).unwrap(), MenuChoice::Resume);
    }

    #[test]
    fn resume_without_checkpoints_is_rejected() {
        assert!(matches!(
            parse_choice("0", false),
            Err(MenuError::NoCheckpoints)
        ));
    }

    #[test]
    fn bad_menu_input_is_rejected() {
        assert!(matches!(parse_choice("6", true), Err(MenuError::UnknownChoice(6))));
        assert!(matches!(
            parse_choice("two", true),
            Err(MenuError::NotANumber { .. })
        ));
    }

    #[test]
    fn character_is_first_non_blank() {
        assert_eq!(parse_character("  apple"), Some('a'));
        assert_eq!(parse_character("   "), None);
    }

    #[test]
    fn checkpoint_index_must_exist() {
        let names = vec!["monday".to_owned(), "tuesday".to_owned()];
        assert_eq!(pick_checkpoint("1", &names).unwrap(), "tuesday");
        assert!(pick_checkpoint("2", &names).is_err());
        assert!(pick_checkpoint("-1", &names).is_err());
        assert!(pick_checkpoint("x", &names).is_err());
    }
}
