use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::info;
use serde::Serialize;

use crate::{config::Tuning, conversation::NpcKind, ecs::components::Gate};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Coherence {
    value: i32,
    max: i32,
}

impl Coherence {
    pub fn new(value: i32, max: i32) -> Self {
        let max = max.max(0);
        Self {
            value: value.clamp(0, max),
            max,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Returns the amount actually gained after capping at `max`.
    pub fn restore(&mut self, amount: i32) -> i32 {
        let before = self.value;
        self.value = (self.value + amount.max(0)).min(self.max);
        self.value - before
    }

    /// Returns the amount actually lost after flooring at zero.
    pub fn drain(&mut self, amount: i32) -> i32 {
        let before = self.value;
        self.value = (self.value - amount.max(0)).max(0);
        before - self.value
    }

    pub fn is_depleted(&self) -> bool {
        self.value == 0
    }

    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.value as f32 / self.max as f32
        }
    }
}

/// The meta-goal handed out by a QUEST NPC: complete every target's conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestTracker {
    targets: BTreeSet<String>,
    completed: BTreeSet<String>,
    active: bool,
    rewarded: bool,
}

impl QuestTracker {
    pub fn new<I: IntoIterator<Item = String>>(targets: I) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn record(&mut self, npc_name: &str) {
        if self.completed.insert(npc_name.to_string()) && self.targets.contains(npc_name) {
            info!(
                "quest target {npc_name} done ({} remaining)",
                self.remaining().len()
            );
        }
    }

    pub fn completed_npcs(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn remaining(&self) -> Vec<String> {
        self.targets.difference(&self.completed).cloned().collect()
    }

    pub fn is_fulfilled(&self) -> bool {
        self.targets.is_subset(&self.completed)
    }

    pub fn is_rewarded(&self) -> bool {
        self.rewarded
    }

    pub fn mark_rewarded(&mut self) {
        self.rewarded = true;
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub answered: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl SessionStats {
    pub fn record(&mut self, correct: bool) {
        self.answered += 1;
        if correct {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }
    }

    pub fn accuracy(&self) -> f32 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f32 / self.answered as f32 * 100.0
        }
    }
}

/// State that persists across floors.
#[derive(Clone, Debug)]
pub struct PlayerProgress {
    pub coherence: Coherence,
    pub knowledge: BTreeSet<String>,
    pub npcs_completed: BTreeSet<String>,
    pub quest: QuestTracker,
    pub stats: SessionStats,
    opinions: HashMap<String, i32>,
}

impl PlayerProgress {
    pub fn new(tuning: &Tuning, quest: QuestTracker) -> Self {
        Self {
            coherence: Coherence::new(tuning.starting_coherence, tuning.max_coherence),
            knowledge: BTreeSet::new(),
            npcs_completed: BTreeSet::new(),
            quest,
            stats: SessionStats::default(),
            opinions: HashMap::new(),
        }
    }

    /// Set union; tokens are never removed.
    pub fn grant_knowledge(&mut self, token: &str) -> bool {
        let fresh = self.knowledge.insert(token.to_string());
        if fresh {
            info!("knowledge gained: {token}");
        }
        fresh
    }

    pub fn has_knowledge(&self, token: &str) -> bool {
        self.knowledge.contains(token)
    }

    pub fn adjust_opinion(&mut self, npc_name: &str, delta: i32) {
        *self.opinions.entry(npc_name.to_string()).or_insert(0) += delta;
    }

    pub fn opinion(&self, npc_name: &str) -> i32 {
        self.opinions.get(npc_name).copied().unwrap_or(0)
    }

    pub fn record_completion(&mut self, npc_name: &str, kind: NpcKind) {
        self.npcs_completed.insert(npc_name.to_string());
        if kind == NpcKind::Specialist {
            self.quest.record(npc_name);
        }
    }
}

/// Required NPC names per floor. Floors without an entry are always complete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FloorRequirements {
    required: BTreeMap<u32, BTreeSet<String>>,
}

impl FloorRequirements {
    pub fn new(required: BTreeMap<u32, BTreeSet<String>>) -> Self {
        Self { required }
    }

    pub fn required(&self, floor: u32) -> impl Iterator<Item = &str> {
        self.required
            .get(&floor)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Required NPCs on `floor` whose conversation is not completed, sorted by name.
    pub fn incomplete<F>(&self, floor: u32, is_completed: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        self.required(floor)
            .filter(|name| !is_completed(*name))
            .map(str::to_string)
            .collect()
    }

    pub fn is_complete<F>(&self, floor: u32, is_completed: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        self.incomplete(floor, is_completed).is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateCheck {
    Open,
    Unlocked(String),
    Locked(String),
}

/// Attempting to step onto a gate. Unlocking is one-way and consumes the attempt.
pub fn check_gate(gate: &mut Gate, progress: &PlayerProgress) -> GateCheck {
    if gate.unlocked {
        return GateCheck::Open;
    }
    if progress.has_knowledge(&gate.required_knowledge) {
        gate.unlocked = true;
        info!("gate requiring {} unlocked", gate.required_knowledge);
        GateCheck::Unlocked(gate.required_knowledge.clone())
    } else {
        GateCheck::Locked(gate.required_knowledge.clone())
    }
}
