mod render;

use std::{
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use clap::Parser;
use log::info;
use neuraldive::{
    CommandResult, Content, Game, GameConfig,
    scripted_input::{ScriptedInput, run_script},
};
use render::{
    draw_conversation, draw_ending, draw_entities, draw_hud, draw_log, draw_map, draw_reading,
};

const MAP_ORIGIN: Point = Point { x: 2, y: 5 };
const LOG_PANEL_START: i32 = 41;
const LOG_MAX_ENTRIES: usize = 8;
/// Frames between two wandering steps.
const WANDER_EVERY_FRAMES: u64 = 6;
/// Seed used by `--fixed` and headless runs when none is given.
const FIXED_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(name = "neuraldive", about = "Descend through the layers of a neural network")]
struct Args {
    /// Seed for placement, shuffling and wandering.
    #[arg(long)]
    seed: Option<u64>,
    /// Authored NPC positions and question order.
    #[arg(long)]
    fixed: bool,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    height: Option<i32>,
    /// JSON file with a `GameConfig`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON content pack replacing the built-in NPCs and questions.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Run commands from a file (`-` for stdin) without opening a terminal.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Shuffle question and answer order even in fixed mode.
    #[arg(long)]
    shuffle: bool,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            // Headless runs default to the reproducible layout.
            None if self.fixed || self.script.is_some() => GameConfig::fixed(FIXED_SEED),
            None => GameConfig::default(),
        };
        if self.fixed {
            config.random_placement = false;
            config.shuffle_conversations = false;
        }
        if self.shuffle {
            config.shuffle_conversations = true;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.width.is_some() || self.height.is_some() {
            let width = self.width.unwrap_or(config.map_width);
            let height = self.height.unwrap_or(config.map_height);
            config = config.with_dimensions(width, height);
        }
        Ok(config)
    }

    fn content(&self) -> Result<Content> {
        match &self.content {
            Some(path) => Content::from_path(path)
                .with_context(|| format!("loading content {}", path.display())),
            None => Ok(Content::builtin()),
        }
    }
}

struct NeuralDiveState {
    game: Game,
    frame: u64,
    message_log: Vec<String>,
}

impl NeuralDiveState {
    fn new(game: Game) -> Self {
        let message_log = vec![game.message().to_string()];
        Self {
            game,
            frame: 0,
            message_log,
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn run(&mut self, command: &str) -> CommandResult {
        let result = self.game.process_command(command);
        self.push_log_entry(result.message.clone());
        result
    }

    /// Tries `first`, then `fallback` when `first` fails outside a conversation.
    fn run_with_fallback(&mut self, first: &str, fallback: &str) {
        let result = self.game.process_command(first);
        if result.success || self.game.in_conversation() {
            self.push_log_entry(result.message);
        } else {
            self.run(fallback);
        }
    }

    fn handle_input(&mut self, ctx: &mut BTerm) {
        let Some(key) = ctx.key else {
            return;
        };

        if self.game.is_game_over() || self.game.is_won() {
            if matches!(key, VirtualKeyCode::Q | VirtualKeyCode::Escape) {
                ctx.quit();
            }
            return;
        }

        if self.game.reading().is_some() {
            self.run("exit");
            return;
        }

        if self.game.in_conversation() {
            match key {
                VirtualKeyCode::Key1 => self.run("1"),
                VirtualKeyCode::Key2 => self.run("2"),
                VirtualKeyCode::Key3 => self.run("3"),
                VirtualKeyCode::Key4 => self.run("4"),
                VirtualKeyCode::Escape | VirtualKeyCode::X => self.run("exit"),
                _ => return,
            };
            return;
        }

        match key {
            VirtualKeyCode::Up | VirtualKeyCode::W => {
                self.run("up");
            }
            VirtualKeyCode::Down | VirtualKeyCode::S => {
                self.run("down");
            }
            VirtualKeyCode::Left | VirtualKeyCode::A => {
                self.run("left");
            }
            VirtualKeyCode::Right | VirtualKeyCode::D => {
                self.run("right");
            }
            VirtualKeyCode::Period | VirtualKeyCode::Comma => self.run_with_fallback("stairs", "interact"),
            VirtualKeyCode::I | VirtualKeyCode::Space | VirtualKeyCode::Return => {
                self.run_with_fallback("interact", "stairs")
            }
            VirtualKeyCode::Q => ctx.quit(),
            _ => {}
        }
    }

    fn draw_scene(&mut self, ctx: &mut BTerm) {
        draw_hud(ctx, &self.game, self.frame);
        draw_map(ctx, self.game.map(), MAP_ORIGIN);
        draw_entities(ctx, &self.game, MAP_ORIGIN);
        draw_log(ctx, &self.message_log, LOG_PANEL_START);
        draw_reading(ctx, &self.game);
        draw_conversation(ctx, &self.game);
        draw_ending(ctx, &self.game);
    }
}

impl GameState for NeuralDiveState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        self.frame = self.frame.wrapping_add(1);
        if self.frame % WANDER_EVERY_FRAMES == 0 {
            self.game.tick();
        }
        ctx.cls();
        self.draw_scene(ctx);
    }
}

fn run_headless(game: &mut Game, path: &Path) -> Result<()> {
    let mut script = if path.as_os_str() == "-" {
        ScriptedInput::from_reader(BufReader::new(io::stdin().lock()))
            .context("reading script from stdin")?
    } else {
        ScriptedInput::from_file(path)
            .with_context(|| format!("reading script {}", path.display()))?
    };
    let mut out = io::stdout().lock();
    writeln!(out, "# {}", serde_json::to_string(&game.snapshot())?)?;
    let succeeded = run_script(game, &mut script, &mut out).context("running script")?;
    info!("{succeeded}/{} scripted commands succeeded", script.len());
    writeln!(out, "# {}", serde_json::to_string(&game.final_stats())?)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.game_config()?;
    let content = args.content()?;
    let mut game = Game::new(config, content).context("starting game")?;

    if let Some(path) = &args.script {
        return run_headless(&mut game, path);
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Neural Dive")
        .build()
        .map_err(|e| anyhow!("{e}"))?;
    main_loop(context, NeuralDiveState::new(game)).map_err(|e| anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(args: &[&str]) -> GameConfig {
        let args = Args::parse_from(std::iter::once("neuraldive").chain(args.iter().copied()));
        args.game_config().unwrap()
    }

    #[test]
    fn single_dimension_keeps_the_other_default() {
        let config = config_for(&["--width", "60"]);
        assert_eq!((config.map_width, config.map_height), (60, 25));

        let config = config_for(&["--fixed", "--height", "30"]);
        assert_eq!((config.map_width, config.map_height), (50, 30));
        assert!(!config.random_placement);
    }

    #[test]
    fn script_runs_default_to_the_fixed_layout() {
        let config = config_for(&["--script", "moves.txt", "--seed", "7"]);
        assert!(!config.random_placement);
        assert_eq!(config.seed, Some(7));
    }
}
