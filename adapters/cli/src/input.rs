use std::num::NonZeroUsize;

use shifting_maze_core::{Direction, StageIndex};

/// Commands a player may type at the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HostCommand {
    Move(Direction),
    Undo,
    Redo,
    ResetStage,
    SelectStage(StageIndex),
    ListStages,
    Help,
    Quit,
}

/// Reasons a prompt line cannot be understood.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("unknown command `{0}`, type `help` for the list of commands")]
    Unknown(String),
    #[error("`stage` expects a stage number starting at 1, found `{0}`")]
    InvalidStage(String),
}

pub(crate) const HELP: &str = "\
commands:
  w/a/s/d    move north/west/south/east
  u          undo the last move
  y          redo the last undone move
  r          restart the current stage
  stage N    play stage N
  stages     list stages and their lock state
  help       show this list
  q          quit";

/// Parses a prompt line, returning `None` for blank input.
pub(crate) fn parse_command(line: &str) -> Result<Option<HostCommand>, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "w" => HostCommand::Move(Direction::North),
        "a" => HostCommand::Move(Direction::West),
        "s" => HostCommand::Move(Direction::South),
        "d" => HostCommand::Move(Direction::East),
        "u" | "undo" => HostCommand::Undo,
        "y" | "redo" => HostCommand::Redo,
        "r" | "reset" => HostCommand::ResetStage,
        "stages" => HostCommand::ListStages,
        "h" | "help" | "?" => HostCommand::Help,
        "q" | "quit" | "exit" => HostCommand::Quit,
        "stage" => {
            let argument = words.next().unwrap_or_default();
            let number = argument
                .parse::<NonZeroUsize>()
                .map_err(|_| InputError::InvalidStage(argument.to_owned()))?;
            HostCommand::SelectStage(StageIndex::new(number.get() - 1))
        }
        _ => return Err(InputError::Unknown(line.trim().to_owned())),
    };

    if words.next().is_some() {
        return Err(InputError::Unknown(line.trim().to_owned()));
    }
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_directions() {
        assert_eq!(
            parse_command("w"),
            Ok(Some(HostCommand::Move(Direction::North)))
        );
        assert_eq!(
            parse_command(" A "),
            Ok(Some(HostCommand::Move(Direction::West)))
        );
        assert_eq!(
            parse_command("s"),
            Ok(Some(HostCommand::Move(Direction::South)))
        );
        assert_eq!(
            parse_command("d"),
            Ok(Some(HostCommand::Move(Direction::East)))
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \t"), Ok(None));
    }

    #[test]
    fn stage_numbers_are_one_based() {
        assert_eq!(
            parse_command("stage 1"),
            Ok(Some(HostCommand::SelectStage(StageIndex::FIRST)))
        );
        assert_eq!(
            parse_command("stage 3"),
            Ok(Some(HostCommand::SelectStage(StageIndex::new(2))))
        );
        assert_eq!(
            parse_command("stage 0"),
            Err(InputError::InvalidStage("0".to_owned()))
        );
        assert_eq!(
            parse_command("stage"),
            Err(InputError::InvalidStage(String::new()))
        );
    }

    #[test]
    fn unknown_and_trailing_words_are_rejected() {
        assert_eq!(
            parse_command("jump"),
            Err(InputError::Unknown("jump".to_owned()))
        );
        assert_eq!(
            parse_command("w w"),
            Err(InputError::Unknown("w w".to_owned()))
        );
    }
}
