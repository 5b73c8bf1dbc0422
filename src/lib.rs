//! Neural Dive: a turn-based descent through three neural layers, driven by
//! string commands and trivia conversations with the NPCs that live there.

pub mod command;
pub mod config;
pub mod conversation;
pub mod data;
pub mod ecs;
pub mod error;
pub mod game;
pub mod map;
pub mod placement;
pub mod progression;
pub mod scripted_input;

pub use command::{Command, Direction};
pub use config::GameConfig;
pub use data::Content;
pub use error::{CommandError, ContentError};
pub use game::{CommandResult, FinalStats, Game, GameSnapshot};
