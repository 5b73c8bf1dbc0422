//! The game controller: owns every piece of state and turns commands into
//! `(success, message)` results.

use std::collections::BTreeSet;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;

use crate::{
    command::{Command, Direction},
    config::{ARRIVAL_FROM_ABOVE, ARRIVAL_FROM_BELOW, GameConfig, PLAYER_START},
    conversation::{AnswerOutcome, Conversation, ConversationEngine, InteractOutcome},
    data::Content,
    ecs::{
        EcsWorld, Interactable, NpcView,
        components::{Gate, InfoPoint, StairDirection},
    },
    error::{CommandError, ContentError},
    map::FloorMap,
    placement::{PlacementRequest, populate},
    progression::{FloorRequirements, GateCheck, PlayerProgress, QuestTracker, check_gate},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
}

impl CommandResult {
    pub fn ok<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<CommandError> for CommandResult {
    fn from(err: CommandError) -> Self {
        CommandResult::failed(err.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NpcSnapshot {
    pub x: i32,
    pub y: i32,
    pub name: String,
}

/// Introspection view for tests and headless runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub player_pos: (i32, i32),
    pub npcs: Vec<NpcSnapshot>,
    pub message: String,
    pub coherence: i32,
    pub max_coherence: i32,
    pub knowledge_modules: Vec<String>,
    pub in_conversation: bool,
    pub conversation_npc: Option<String>,
    pub reading: Option<String>,
    pub current_floor: u32,
    pub quest_active: bool,
    pub quest_completed_npcs: Vec<String>,
    pub game_over: bool,
    pub game_won: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FinalStats {
    pub started_at: DateTime<Utc>,
    pub time_played_secs: f64,
    pub questions_answered: u32,
    pub questions_correct: u32,
    pub questions_wrong: u32,
    pub accuracy: f32,
    pub npcs_completed: usize,
    pub knowledge_modules: usize,
    pub final_coherence: i32,
    pub current_floor: u32,
    pub score: i64,
}

pub struct Game {
    config: GameConfig,
    content: Content,
    requirements: FloorRequirements,
    rng: RandomNumberGenerator,
    floor: u32,
    map: FloorMap,
    ecs: EcsWorld,
    conversations: ConversationEngine,
    progress: PlayerProgress,
    reading: Option<InfoPoint>,
    message: String,
    game_won: bool,
    started_at: DateTime<Utc>,
}

impl Game {
    pub fn new(config: GameConfig, content: Content) -> Result<Self, ContentError> {
        content.validate()?;
        let mut rng = match config.seed {
            Some(seed) => RandomNumberGenerator::seeded(seed),
            None => RandomNumberGenerator::new(),
        };
        let ecs_seed = config.seed.unwrap_or_else(|| rng.next_u64());

        let conversations =
            ConversationEngine::from_content(&content, config.shuffle_conversations, &mut rng);
        let progress = PlayerProgress::new(
            &config.tuning,
            QuestTracker::new(content.quest_targets.iter().cloned()),
        );
        let map = FloorMap::build(config.map_width, config.map_height, 1);
        let start = map.landing_point(PLAYER_START);
        let ecs = EcsWorld::new(start, 1, config.wander.clone(), ecs_seed);

        let mut game = Self {
            requirements: content.requirements(),
            message: format!(
                "Welcome to Neural Dive! Descend through {} neural layers.",
                config.max_floors
            ),
            config,
            content,
            rng,
            floor: 1,
            map,
            ecs,
            conversations,
            progress,
            reading: None,
            game_won: false,
            started_at: Utc::now(),
        };
        game.populate_floor(start);
        info!(
            "new game: seed {:?}, {} placement, {} floors",
            game.config.seed,
            if game.config.random_placement { "random" } else { "fixed" },
            game.config.max_floors
        );
        Ok(game)
    }

    /// Parses and runs one command string.
    pub fn process_command(&mut self, raw: &str) -> CommandResult {
        match raw.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                let result = CommandResult::from(err);
                self.message = result.message.clone();
                result
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> CommandResult {
        debug!("command {command} on floor {}", self.floor);
        let outcome = match command {
            Command::Move(direction) => self.move_player(direction),
            Command::Interact => self.interact(),
            Command::UseStairs => self.use_stairs(),
            Command::Exit => self.exit_conversation(),
            Command::Answer(index) => self.answer(index),
        };
        let result = outcome.unwrap_or_else(CommandResult::from);
        self.message = result.message.clone();
        result
    }

    pub fn move_player(&mut self, direction: Direction) -> Result<CommandResult, CommandError> {
        if self.conversations.is_active() {
            return Err(CommandError::InConversation);
        }
        let from = self.ecs.player_point();
        let delta = direction.delta();
        let target = Point::new(from.x + delta.x, from.y + delta.y);

        let progress = &self.progress;
        match self.ecs.with_gate_at(target, |gate| check_gate(gate, progress)) {
            Some(GateCheck::Locked(knowledge)) => {
                return Err(CommandError::GateLocked { knowledge });
            }
            Some(GateCheck::Unlocked(knowledge)) => {
                return Err(CommandError::GateUnlocked { knowledge });
            }
            Some(GateCheck::Open) | None => {}
        }

        if !self.map.is_walkable(target) {
            return Err(CommandError::Blocked);
        }

        self.ecs.set_player_position(target, self.floor);
        if let Some(direction) = self.ecs.stairs_at(target) {
            return Ok(CommandResult::ok(format!(
                "Standing on stairs {}. Press Space or >/< to use.",
                direction.as_str()
            )));
        }
        Ok(CommandResult::ok(format!("moved {}", direction.as_str())))
    }

    pub fn interact(&mut self) -> Result<CommandResult, CommandError> {
        if self.conversations.is_active() {
            return Err(CommandError::InConversation);
        }
        let nearest = self
            .ecs
            .nearest_interactable(self.ecs.player_point())
            .ok_or(CommandError::NothingNearby)?;

        match nearest {
            Interactable::Npc(name) => self.interact_npc(&name),
            Interactable::InfoPoint(info) => {
                let message = format!("Reading: {}", info.title);
                debug!("opened info point {}", info.id);
                self.reading = Some(info);
                Ok(CommandResult::ok(message))
            }
            Interactable::Stairs(_) => self.use_stairs(),
        }
    }

    fn interact_npc(&mut self, name: &str) -> Result<CommandResult, CommandError> {
        let outcome = self
            .conversations
            .interact(name, &mut self.progress, &self.config.tuning)?;
        let message = match outcome {
            InteractOutcome::Started { greeting } | InteractOutcome::QuestBriefing { greeting } => {
                greeting
            }
            InteractOutcome::Restored { amount } => {
                format!("{name}: Your coherence has been restored. [+{amount} Coherence]")
            }
            InteractOutcome::AlreadyCompleted => {
                format!("{name}: You have proven yourself. We have nothing more to discuss.")
            }
            InteractOutcome::QuestProgress { remaining } => {
                format!("{name}: Seek these guardians still: {}", remaining.join(", "))
            }
            InteractOutcome::QuestFulfilled { bonus } => format!(
                "{name}: You have completed my quest! The knowledge is yours. \
                 [Quest Complete! +{bonus} Coherence]"
            ),
            InteractOutcome::QuestAlreadyRewarded => {
                format!("{name}: Your quest is complete. Nothing more is asked of you.")
            }
        };
        Ok(CommandResult::ok(message))
    }

    pub fn use_stairs(&mut self) -> Result<CommandResult, CommandError> {
        if self.conversations.is_active() {
            return Err(CommandError::InConversation);
        }
        match self.ecs.stairs_at(self.ecs.player_point()) {
            Some(StairDirection::Down) => self.descend(),
            Some(StairDirection::Up) => self.ascend(),
            None => Err(CommandError::NoStairs),
        }
    }

    fn descend(&mut self) -> Result<CommandResult, CommandError> {
        if self.floor >= self.config.max_floors {
            return Err(CommandError::NoDeeperFloor);
        }
        let conversations = &self.conversations;
        let missing = self
            .requirements
            .incomplete(self.floor, |name| conversations.is_completed(name));
        if !missing.is_empty() {
            return Err(CommandError::FloorIncomplete { missing });
        }
        self.change_floor(self.floor + 1, ARRIVAL_FROM_ABOVE);
        Ok(CommandResult::ok(format!(
            "Descended to Neural Layer {}",
            self.floor
        )))
    }

    fn ascend(&mut self) -> Result<CommandResult, CommandError> {
        if self.floor <= 1 {
            return Err(CommandError::TopFloor);
        }
        self.change_floor(self.floor - 1, ARRIVAL_FROM_BELOW);
        Ok(CommandResult::ok(format!(
            "Ascended to Neural Layer {}",
            self.floor
        )))
    }

    fn change_floor(&mut self, floor: u32, arrival: Point) {
        self.floor = floor;
        self.map = FloorMap::build(self.config.map_width, self.config.map_height, floor);
        self.reading = None;
        let arrival = self.map.landing_point(arrival);
        self.ecs.clear_floor();
        self.ecs.set_player_position(arrival, floor);
        self.populate_floor(arrival);
        info!("entered floor {floor} at {arrival:?}");
    }

    fn populate_floor(&mut self, player: Point) {
        let request = PlacementRequest {
            map: &self.map,
            content: &self.content,
            max_floors: self.config.max_floors,
            random: self.config.random_placement,
            player,
            rules: &self.config.placement,
        };
        let population = populate(&request, self.floor, &mut self.rng);
        self.ecs.spawn_floor(self.floor, &population);
    }

    pub fn answer(&mut self, index: usize) -> Result<CommandResult, CommandError> {
        let outcome = self
            .conversations
            .answer(index, &mut self.progress, &self.config.tuning)?;
        let result = match outcome {
            AnswerOutcome::Correct {
                npc_name,
                response,
                gain,
                reward,
                finished,
            } => {
                let mut message = format!("{response}\n\n[+{gain} Coherence]");
                if let Some(token) = reward {
                    message.push_str(&format!("\n[Gained: {token}]"));
                }
                if finished {
                    message.push_str(&format!(
                        "\n\n{npc_name}: You have proven your worth. I grant you passage."
                    ));
                    self.check_victory(&npc_name);
                }
                CommandResult::ok(message)
            }
            AnswerOutcome::Incorrect {
                response,
                penalty,
                enemy,
                collapsed,
                ..
            } => {
                let mut message = if enemy {
                    format!("{response}\n\n[CRITICAL ERROR! -{penalty} Coherence]")
                } else {
                    format!("{response}\n\n[-{penalty} Coherence]")
                };
                if collapsed {
                    message.push_str("\n\n[SYSTEM FAILURE - COHERENCE LOST]");
                }
                CommandResult::failed(message)
            }
            AnswerOutcome::Concluded { npc_name } => {
                self.check_victory(&npc_name);
                CommandResult::ok("Conversation completed!")
            }
        };
        Ok(result)
    }

    fn check_victory(&mut self, npc_name: &str) {
        let victorious = self.floor == self.config.max_floors
            && self.content.npc(npc_name).is_some_and(|def| def.victory);
        if victorious && !self.game_won {
            self.game_won = true;
            info!("{npc_name} defeated, game won");
        }
    }

    pub fn exit_conversation(&mut self) -> Result<CommandResult, CommandError> {
        if self.conversations.exit() {
            return Ok(CommandResult::ok("Conversation ended."));
        }
        if self.reading.take().is_some() {
            return Ok(CommandResult::ok("Terminal closed."));
        }
        Err(CommandError::NothingToClose)
    }

    /// One cosmetic wandering step. Frozen while a conversation is active.
    pub fn tick(&mut self) -> usize {
        if self.conversations.is_active() || !self.config.wander.enabled {
            return 0;
        }
        self.ecs.advance_wander(&self.map)
    }

    pub fn player_position(&self) -> Point {
        self.ecs.player_point()
    }

    pub fn previous_player_position(&self) -> Option<Point> {
        self.ecs.player_previous()
    }

    pub fn npcs(&self) -> Vec<NpcView> {
        self.ecs.npcs()
    }

    pub fn stairs(&self) -> Vec<(Point, StairDirection)> {
        self.ecs.stairs()
    }

    pub fn gates(&self) -> Vec<(Point, Gate)> {
        self.ecs.gates()
    }

    pub fn info_points(&self) -> Vec<(Point, InfoPoint)> {
        self.ecs.info_points()
    }

    pub fn ecs(&self) -> &EcsWorld {
        &self.ecs
    }

    pub fn map(&self) -> &FloorMap {
        &self.map
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn coherence(&self) -> i32 {
        self.progress.coherence.value()
    }

    pub fn max_coherence(&self) -> i32 {
        self.progress.coherence.max()
    }

    pub fn knowledge(&self) -> &BTreeSet<String> {
        &self.progress.knowledge
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn in_conversation(&self) -> bool {
        self.conversations.is_active()
    }

    pub fn conversation_npc(&self) -> Option<&str> {
        self.conversations.active_name()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.conversations.active()
    }

    pub fn conversation(&self, npc_name: &str) -> Option<&Conversation> {
        self.conversations.get(npc_name)
    }

    pub fn reading(&self) -> Option<&InfoPoint> {
        self.reading.as_ref()
    }

    pub fn current_floor(&self) -> u32 {
        self.floor
    }

    pub fn quest_active(&self) -> bool {
        self.progress.quest.is_active()
    }

    pub fn quest_completed_npcs(&self) -> &BTreeSet<String> {
        self.progress.quest.completed_npcs()
    }

    pub fn quest_targets(&self) -> &[String] {
        &self.content.quest_targets
    }

    pub fn is_floor_complete(&self) -> bool {
        self.requirements
            .is_complete(self.floor, |name| self.conversations.is_completed(name))
    }

    /// Coherence ran out. The caller decides what input to allow next.
    pub fn is_game_over(&self) -> bool {
        self.progress.coherence.is_depleted()
    }

    pub fn is_won(&self) -> bool {
        self.game_won
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let player = self.player_position();
        GameSnapshot {
            player_pos: (player.x, player.y),
            npcs: self
                .npcs()
                .into_iter()
                .map(|npc| NpcSnapshot {
                    x: npc.point.x,
                    y: npc.point.y,
                    name: npc.name,
                })
                .collect(),
            message: self.message.clone(),
            coherence: self.coherence(),
            max_coherence: self.max_coherence(),
            knowledge_modules: self.progress.knowledge.iter().cloned().collect(),
            in_conversation: self.in_conversation(),
            conversation_npc: self.conversation_npc().map(str::to_string),
            reading: self.reading.as_ref().map(|info| info.title.clone()),
            current_floor: self.floor,
            quest_active: self.quest_active(),
            quest_completed_npcs: self.quest_completed_npcs().iter().cloned().collect(),
            game_over: self.is_game_over(),
            game_won: self.game_won,
        }
    }

    pub fn final_stats(&self) -> FinalStats {
        let stats = self.progress.stats;
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        let npcs_completed = self.progress.npcs_completed.len();
        let knowledge_modules = self.progress.knowledge.len();
        let coherence = self.coherence();
        let score = i64::from(stats.correct) * 100
            + knowledge_modules as i64 * 50
            + npcs_completed as i64 * 200
            + i64::from(coherence) * 10;
        FinalStats {
            started_at: self.started_at,
            time_played_secs: elapsed.num_milliseconds() as f64 / 1000.0,
            questions_answered: stats.answered,
            questions_correct: stats.correct,
            questions_wrong: stats.wrong,
            accuracy: stats.accuracy(),
            npcs_completed,
            knowledge_modules,
            final_coherence: coherence,
            current_floor: self.floor,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_game() -> Game {
        Game::new(GameConfig::fixed(42), Content::builtin()).unwrap()
    }

    #[test]
    fn starts_on_first_floor_at_spawn() {
        let game = fixed_game();
        assert_eq!(game.current_floor(), 1);
        assert_eq!(game.player_position(), PLAYER_START);
        assert!(game.message().starts_with("Welcome to Neural Dive!"));
        assert!(!game.in_conversation());
        assert_eq!(game.coherence(), 80);
    }

    #[test]
    fn wall_blocks_movement() {
        let mut game = fixed_game();
        for _ in 0..4 {
            assert!(game.process_command("up").success);
        }
        let result = game.process_command("up");
        assert_eq!(result, CommandResult::failed("Blocked by firewall!"));
        assert_eq!(game.player_position(), Point::new(5, 1));
    }

    #[test]
    fn moving_records_previous_position() {
        let mut game = fixed_game();
        let result = game.process_command("d");
        assert_eq!(result, CommandResult::ok("moved right"));
        assert_eq!(game.previous_player_position(), Some(PLAYER_START));
        assert_eq!(game.message(), "moved right");
    }

    #[test]
    fn interacting_with_nothing_fails() {
        let mut game = fixed_game();
        let result = game.process_command("i");
        assert!(!result.success);
        assert!(result.message.starts_with("No one nearby"));
    }

    #[test]
    fn exit_without_anything_open_fails() {
        let mut game = fixed_game();
        assert_eq!(
            game.process_command("esc"),
            CommandResult::failed("Nothing to close.")
        );
    }

    #[test]
    fn answering_outside_conversation_fails() {
        let mut game = fixed_game();
        assert_eq!(
            game.process_command("1"),
            CommandResult::failed("Not in a conversation.")
        );
    }

    #[test]
    fn fresh_game_scores_remaining_coherence() {
        let game = fixed_game();
        let stats = game.final_stats();
        assert_eq!(stats.score, 800);
        assert_eq!(stats.questions_answered, 0);
        assert_eq!(stats.accuracy, 0.0);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let game = fixed_game();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert_eq!(json["current_floor"], 1);
        assert_eq!(json["player_pos"][0], 5);
        assert_eq!(json["in_conversation"], false);
        assert!(json["npcs"].as_array().unwrap().len() >= 3);
    }
}
