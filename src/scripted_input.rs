use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

use log::debug;

use crate::game::Game;

/// A queue of command strings read from a script. Blank lines and `#` comments are skipped.
pub struct ScriptedInput {
    commands: Vec<String>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut commands = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            commands.push(trimmed.to_string());
        }
        Ok(Self {
            commands,
            cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn next_command(&mut self) -> Option<&str> {
        let command = self.commands.get(self.cursor)?;
        self.cursor += 1;
        Some(command.as_str())
    }
}

/// Feeds every scripted command to `game`, printing the command, its result and
/// the resulting snapshot as JSON. Returns how many commands succeeded.
pub fn run_script<W: Write>(
    game: &mut Game,
    script: &mut ScriptedInput,
    out: &mut W,
) -> io::Result<usize> {
    let mut succeeded = 0;
    while let Some(command) = script.next_command() {
        let command = command.to_string();
        let result = game.process_command(&command);
        debug!("script: {command} -> {}", result.success);
        if result.success {
            succeeded += 1;
        }
        writeln!(out, "> {command}")?;
        writeln!(out, "success: {}", result.success)?;
        writeln!(out, "info: {}", result.message)?;
        let snapshot = serde_json::to_string(&game.snapshot()).map_err(io::Error::other)?;
        writeln!(out, "{snapshot}")?;
        if game.is_game_over() || game.is_won() {
            break;
        }
    }
    Ok(succeeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GameConfig, data::Content};

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let raw = "# warm up\n\n  right \nd\n   # trailing\ni\n";
        let mut script = ScriptedInput::from_reader(raw.as_bytes()).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.next_command(), Some("right"));
        assert_eq!(script.next_command(), Some("d"));
        assert_eq!(script.next_command(), Some("i"));
        assert_eq!(script.next_command(), None);
    }

    #[test]
    fn run_prints_result_and_snapshot_per_command() {
        let mut game = Game::new(GameConfig::fixed(42), Content::builtin()).unwrap();
        let mut script = ScriptedInput::from_reader("right\njump\n".as_bytes()).unwrap();
        let mut out = Vec::new();
        let succeeded = run_script(&mut game, &mut script, &mut out).unwrap();
        assert_eq!(succeeded, 1);

        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "> right");
        assert_eq!(lines[1], "success: true");
        assert_eq!(lines[2], "info: moved right");
        let snapshot: serde_json::Value = serde_json::from_str(lines[3]).unwrap();
        assert_eq!(snapshot["player_pos"][0], 6);
        assert_eq!(lines[5], "success: false");
        assert_eq!(lines[6], "info: Unknown command: jump");
    }
}
