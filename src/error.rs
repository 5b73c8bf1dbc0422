use std::path::PathBuf;

use thiserror::Error;

/// Problems with a content pack or config file. These surface before play starts.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("NPC '{npc}' references unknown question '{question}'")]
    MissingQuestion { npc: String, question: String },
    #[error("question '{question}' must have exactly one correct answer, found {correct}")]
    AmbiguousQuestion { question: String, correct: usize },
    #[error("NPC '{0}' is defined more than once")]
    DuplicateNpc(String),
    #[error("{context} names unknown NPC '{npc}'")]
    UnknownNpc { context: String, npc: String },
}

/// Local, recoverable command failures. The `Display` text is the message shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Not in a conversation.")]
    NotConversing,
    #[error("You're in a conversation. Answer or press ESC to exit.")]
    InConversation,
    #[error("Invalid answer choice.")]
    InvalidChoice { index: usize, available: usize },
    #[error("Blocked by firewall!")]
    Blocked,
    #[error("Gate locked! Requires [{knowledge}] knowledge.")]
    GateLocked { knowledge: String },
    /// The unlock consumes the move; the player stays put this turn.
    #[error("Gate unlocked with [{knowledge}] knowledge!")]
    GateUnlocked { knowledge: String },
    #[error("No one nearby to interact with. Look for NPCs or Terminals (T).")]
    NothingNearby,
    #[error("{0}: I have nothing to say.")]
    NothingToSay(String),
    #[error("No stairs here. Stand on stairs (> or <) and press Enter.")]
    NoStairs,
    #[error("No deeper layers exist.")]
    NoDeeperFloor,
    #[error("This is the top layer.")]
    TopFloor,
    #[error("Cannot descend! Complete conversations with: {}", .missing.join(", "))]
    FloorIncomplete { missing: Vec<String> },
    #[error("Nothing to close.")]
    NothingToClose,
}
