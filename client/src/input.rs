use std::str::FromStr;

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Place(usize),
    Undo,
    Reset,
    Quit,
}

impl FromStr for InputCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_ascii_lowercase();
        match trimmed.as_str() {
            "u" | "undo" => Ok(InputCommand::Undo),
            "r" | "reset" => Ok(InputCommand::Reset),
            "q" | "quit" | "exit" => Ok(InputCommand::Quit),
            other => other
                .parse::<usize>()
                .map(InputCommand::Place)
                .map_err(|_| format!("Unknown command {:?}: type a cell 0-8, u, r or q", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("4".parse(), Ok(InputCommand::Place(4)));
        assert_eq!(" 12 ".parse(), Ok(InputCommand::Place(12)));
        assert_eq!("U".parse(), Ok(InputCommand::Undo));
        assert_eq!("reset".parse(), Ok(InputCommand::Reset));
        assert_eq!("q".parse(), Ok(InputCommand::Quit));
        assert!("-1".parse::<InputCommand>().is_err());
        assert!("".parse::<InputCommand>().is_err());
    }
}
