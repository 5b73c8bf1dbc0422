use std::{fmt, str::FromStr};

use bracket_geometry::prelude::Point;

use crate::error::CommandError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// One player action. Answer indices are zero-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Interact,
    UseStairs,
    Exit,
    Answer(usize),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let command = raw.trim().to_lowercase();
        let parsed = match command.as_str() {
            "up" | "w" => Command::Move(Direction::Up),
            "down" | "s" => Command::Move(Direction::Down),
            "left" | "a" => Command::Move(Direction::Left),
            "right" | "d" => Command::Move(Direction::Right),
            "interact" | "i" => Command::Interact,
            "stairs" | "use" | ">" | "<" => Command::UseStairs,
            "exit" | "esc" => Command::Exit,
            "1" | "2" | "3" | "4" => {
                let digit = command
                    .parse::<usize>()
                    .map_err(|_| CommandError::UnknownCommand(command.clone()))?;
                Command::Answer(digit - 1)
            }
            _ => return Err(CommandError::UnknownCommand(command)),
        };
        Ok(parsed)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move(direction) => f.write_str(direction.as_str()),
            Command::Interact => f.write_str("interact"),
            Command::UseStairs => f.write_str("stairs"),
            Command::Exit => f.write_str("exit"),
            Command::Answer(index) => write!(f, "{}", index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_trimmed_and_case_insensitive() {
        assert_eq!(" W ".parse(), Ok(Command::Move(Direction::Up)));
        assert_eq!("Right".parse(), Ok(Command::Move(Direction::Right)));
        assert_eq!("I".parse(), Ok(Command::Interact));
        assert_eq!("<".parse(), Ok(Command::UseStairs));
        assert_eq!("ESC".parse(), Ok(Command::Exit));
        assert_eq!("2".parse(), Ok(Command::Answer(1)));
    }

    #[test]
    fn unknown_input_is_reported_lowercased() {
        assert_eq!(
            "Jump".parse::<Command>(),
            Err(CommandError::UnknownCommand("jump".into()))
        );
        assert_eq!(
            "5".parse::<Command>().unwrap_err().to_string(),
            "Unknown command: 5"
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for command in [
            Command::Move(Direction::Left),
            Command::Interact,
            Command::UseStairs,
            Command::Exit,
            Command::Answer(3),
        ] {
            assert_eq!(command.to_string().parse(), Ok(command));
        }
    }
}
