//! Per-NPC dialogue and quiz state.
//!
//! Every NPC owns an independent [`Conversation`] cloned out of the content
//! tables at game start. The [`ConversationEngine`] keeps them keyed by NPC
//! name and tracks the single active conversation.

use std::collections::HashMap;

use bracket_random::prelude::RandomNumberGenerator;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ENEMY_WRONG_ANSWER_PENALTY, Tuning},
    data::Content,
    error::CommandError,
    progression::PlayerProgress,
};

fn default_enemy_penalty() -> i32 {
    ENEMY_WRONG_ANSWER_PENALTY
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub correct: bool,
    pub response: String,
    #[serde(default)]
    pub reward_knowledge: Option<String>,
    #[serde(default = "default_enemy_penalty")]
    pub enemy_penalty: i32,
}

impl Answer {
    pub fn new(text: &str, correct: bool, response: &str) -> Self {
        Self {
            text: text.to_string(),
            correct,
            response: response.to_string(),
            reward_knowledge: None,
            enemy_penalty: ENEMY_WRONG_ANSWER_PENALTY,
        }
    }

    pub fn rewarding(mut self, knowledge: &str) -> Self {
        self.reward_knowledge = Some(knowledge.to_string());
        self
    }

    pub fn with_enemy_penalty(mut self, penalty: i32) -> Self {
        self.enemy_penalty = penalty;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub topic: String,
    pub answers: Vec<Answer>,
}

impl Question {
    pub fn correct_answers(&self) -> usize {
        self.answers.iter().filter(|answer| answer.correct).count()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpcKind {
    #[default]
    Specialist,
    Helper,
    Enemy,
    Quest,
}

impl NpcKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NpcKind::Specialist => "specialist",
            NpcKind::Helper => "helper",
            NpcKind::Enemy => "enemy",
            NpcKind::Quest => "quest",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConversationPhase {
    NotStarted,
    GreetingShown,
    AwaitingAnswer(usize),
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    pub npc_name: String,
    pub greeting: String,
    pub questions: Vec<Question>,
    pub kind: NpcKind,
    current_question: usize,
    completed: bool,
    greeted: bool,
    attempts: u32,
}

impl Conversation {
    pub fn new(npc_name: &str, greeting: &str, questions: Vec<Question>, kind: NpcKind) -> Self {
        Self {
            npc_name: npc_name.to_string(),
            greeting: greeting.to_string(),
            questions,
            kind,
            current_question: 0,
            completed: false,
            greeted: false,
            attempts: 0,
        }
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question)
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn phase(&self) -> ConversationPhase {
        if self.completed {
            ConversationPhase::Completed
        } else if !self.greeted {
            ConversationPhase::NotStarted
        } else if self.attempts == 0 {
            ConversationPhase::GreetingShown
        } else {
            ConversationPhase::AwaitingAnswer(self.current_question)
        }
    }

    fn advance(&mut self) {
        self.current_question = (self.current_question + 1).min(self.questions.len());
        if self.current_question >= self.questions.len() {
            self.complete();
        }
    }

    // One-way latch.
    fn complete(&mut self) {
        self.completed = true;
    }

    fn shuffle(&mut self, rng: &mut RandomNumberGenerator) {
        shuffle_in_place(&mut self.questions, rng);
        for question in &mut self.questions {
            shuffle_in_place(&mut question.answers, rng);
        }
    }
}

fn shuffle_in_place<T>(items: &mut [T], rng: &mut RandomNumberGenerator) {
    for i in (1..items.len()).rev() {
        let j = rng.range(0, i as i32 + 1) as usize;
        items.swap(i, j);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractOutcome {
    Started { greeting: String },
    Restored { amount: i32 },
    AlreadyCompleted,
    QuestBriefing { greeting: String },
    QuestProgress { remaining: Vec<String> },
    QuestFulfilled { bonus: i32 },
    QuestAlreadyRewarded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct {
        npc_name: String,
        response: String,
        gain: i32,
        reward: Option<String>,
        finished: bool,
    },
    Incorrect {
        npc_name: String,
        response: String,
        penalty: i32,
        enemy: bool,
        collapsed: bool,
    },
    /// An active conversation that had no questions left to ask.
    Concluded { npc_name: String },
}

#[derive(Clone, Debug, Default)]
pub struct ConversationEngine {
    book: HashMap<String, Conversation>,
    active: Option<String>,
}

impl ConversationEngine {
    /// Deep-copies every NPC's question list out of the content tables.
    pub fn from_content(
        content: &Content,
        shuffle: bool,
        rng: &mut RandomNumberGenerator,
    ) -> Self {
        let mut book = HashMap::new();
        for def in &content.npcs {
            let questions = def
                .questions
                .iter()
                .filter_map(|id| content.questions.get(id).cloned())
                .collect();
            let mut conversation = Conversation::new(&def.name, &def.greeting, questions, def.kind);
            if shuffle {
                conversation.shuffle(rng);
            }
            book.insert(def.name.clone(), conversation);
        }
        Self { book, active: None }
    }

    pub fn from_conversations<I: IntoIterator<Item = Conversation>>(conversations: I) -> Self {
        Self {
            book: conversations
                .into_iter()
                .map(|conversation| (conversation.npc_name.clone(), conversation))
                .collect(),
            active: None,
        }
    }

    pub fn get(&self, npc_name: &str) -> Option<&Conversation> {
        self.book.get(npc_name)
    }

    pub fn is_completed(&self, npc_name: &str) -> bool {
        self.book.get(npc_name).is_some_and(Conversation::is_completed)
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active.as_ref().and_then(|name| self.book.get(name))
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn interact(
        &mut self,
        npc_name: &str,
        progress: &mut PlayerProgress,
        tuning: &Tuning,
    ) -> Result<InteractOutcome, CommandError> {
        if self.active.is_some() {
            return Err(CommandError::InConversation);
        }
        let conversation = self
            .book
            .get_mut(npc_name)
            .ok_or_else(|| CommandError::NothingToSay(npc_name.to_string()))?;

        match conversation.kind {
            NpcKind::Helper if !conversation.completed => {
                let amount = progress.coherence.restore(tuning.helper_restore);
                conversation.greeted = true;
                conversation.complete();
                info!("{npc_name} restored {amount} coherence");
                Ok(InteractOutcome::Restored {
                    amount: tuning.helper_restore,
                })
            }
            NpcKind::Quest => {
                if !conversation.completed {
                    conversation.greeted = true;
                    conversation.complete();
                    progress.quest.activate();
                    info!("quest accepted from {npc_name}");
                    return Ok(InteractOutcome::QuestBriefing {
                        greeting: conversation.greeting.clone(),
                    });
                }
                if progress.quest.is_rewarded() {
                    return Ok(InteractOutcome::QuestAlreadyRewarded);
                }
                if progress.quest.is_fulfilled() {
                    progress.quest.mark_rewarded();
                    progress.coherence.restore(tuning.quest_bonus);
                    info!("quest fulfilled, {npc_name} granted the bonus");
                    Ok(InteractOutcome::QuestFulfilled {
                        bonus: tuning.quest_bonus,
                    })
                } else {
                    Ok(InteractOutcome::QuestProgress {
                        remaining: progress.quest.remaining(),
                    })
                }
            }
            _ if conversation.completed => Ok(InteractOutcome::AlreadyCompleted),
            _ => {
                conversation.greeted = true;
                self.active = Some(npc_name.to_string());
                debug!("conversation with {npc_name} started");
                Ok(InteractOutcome::Started {
                    greeting: conversation.greeting.clone(),
                })
            }
        }
    }

    pub fn answer(
        &mut self,
        choice: usize,
        progress: &mut PlayerProgress,
        tuning: &Tuning,
    ) -> Result<AnswerOutcome, CommandError> {
        let npc_name = self.active.clone().ok_or(CommandError::NotConversing)?;
        let Some(conversation) = self.book.get_mut(&npc_name) else {
            self.active = None;
            return Err(CommandError::NotConversing);
        };

        let Some(question) = conversation.current_question() else {
            conversation.complete();
            self.active = None;
            progress.record_completion(&npc_name, conversation.kind);
            return Ok(AnswerOutcome::Concluded { npc_name });
        };
        let Some(answer) = question.answers.get(choice).cloned() else {
            return Err(CommandError::InvalidChoice {
                index: choice,
                available: question.answers.len(),
            });
        };

        conversation.attempts += 1;
        let enemy = conversation.kind == NpcKind::Enemy;

        if answer.correct {
            progress.coherence.restore(tuning.correct_gain);
            progress.adjust_opinion(&npc_name, 1);
            progress.stats.record(true);
            if let Some(token) = &answer.reward_knowledge {
                progress.grant_knowledge(token);
            }
            conversation.advance();
            let finished = conversation.completed;
            if finished {
                self.active = None;
                progress.record_completion(&npc_name, conversation.kind);
                info!("conversation with {npc_name} completed");
            }
            Ok(AnswerOutcome::Correct {
                npc_name,
                response: answer.response,
                gain: tuning.correct_gain,
                reward: answer.reward_knowledge,
                finished,
            })
        } else {
            let penalty = if enemy {
                answer.enemy_penalty
            } else {
                tuning.wrong_penalty
            };
            progress.coherence.drain(penalty);
            progress.adjust_opinion(&npc_name, -1);
            progress.stats.record(false);
            let collapsed = progress.coherence.is_depleted();
            if collapsed {
                self.active = None;
                info!("coherence lost while talking to {npc_name}");
            }
            Ok(AnswerOutcome::Incorrect {
                npc_name,
                response: answer.response,
                penalty,
                enemy,
                collapsed,
            })
        }
    }

    pub fn exit(&mut self) -> bool {
        self.active.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::QuestTracker;

    fn question(topic: &str, correct: usize, reward: Option<&str>) -> Question {
        Question {
            text: format!("{topic}?"),
            topic: topic.to_string(),
            answers: (0..4)
                .map(|idx| {
                    let answer = Answer::new(&format!("option {idx}"), idx == correct, "reply");
                    match reward {
                        Some(token) if idx == correct => answer.rewarding(token),
                        _ => answer.with_enemy_penalty(40 + idx as i32),
                    }
                })
                .collect(),
        }
    }

    fn progress() -> PlayerProgress {
        PlayerProgress::new(
            &Tuning::default(),
            QuestTracker::new(["ALGO".to_string(), "NET".to_string()]),
        )
    }

    fn engine() -> ConversationEngine {
        let shared = vec![
            question("algorithms", 1, Some("binary_search")),
            question("hashing", 2, None),
        ];
        ConversationEngine::from_conversations([
            Conversation::new("ALGO", "hello", shared.clone(), NpcKind::Specialist),
            Conversation::new("NET", "hi", shared, NpcKind::Specialist),
            Conversation::new("HUNTER", "purge", vec![question("theory", 0, None)], NpcKind::Enemy),
            Conversation::new("HEALER", "rest", Vec::new(), NpcKind::Helper),
            Conversation::new("ORACLE", "seek", Vec::new(), NpcKind::Quest),
        ])
    }

    #[test]
    fn greeting_then_answers_then_completion() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        assert_eq!(engine.get("ALGO").unwrap().phase(), ConversationPhase::NotStarted);

        let outcome = engine.interact("ALGO", &mut progress, &tuning).unwrap();
        assert_eq!(
            outcome,
            InteractOutcome::Started {
                greeting: "hello".into()
            }
        );
        assert_eq!(engine.get("ALGO").unwrap().phase(), ConversationPhase::GreetingShown);

        engine.answer(1, &mut progress, &tuning).unwrap();
        assert_eq!(
            engine.get("ALGO").unwrap().phase(),
            ConversationPhase::AwaitingAnswer(1)
        );
        assert!(progress.knowledge.contains("binary_search"));

        let outcome = engine.answer(2, &mut progress, &tuning).unwrap();
        assert!(matches!(outcome, AnswerOutcome::Correct { finished: true, .. }));
        assert_eq!(engine.get("ALGO").unwrap().phase(), ConversationPhase::Completed);
        assert!(!engine.is_active());
        assert!(progress.quest.completed_npcs().contains("ALGO"));
        assert_eq!(progress.opinion("ALGO"), 2);
    }

    #[test]
    fn npcs_sharing_questions_keep_separate_progress() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        engine.interact("ALGO", &mut progress, &tuning).unwrap();
        engine.answer(1, &mut progress, &tuning).unwrap();
        assert_eq!(engine.get("ALGO").unwrap().current_question_index(), 1);
        assert_eq!(engine.get("NET").unwrap().current_question_index(), 0);
        assert_eq!(engine.get("NET").unwrap().phase(), ConversationPhase::NotStarted);
    }

    #[test]
    fn invalid_choice_leaves_state_untouched() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        engine.interact("ALGO", &mut progress, &tuning).unwrap();
        let before = progress.coherence.value();
        let err = engine.answer(7, &mut progress, &tuning).unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidChoice {
                index: 7,
                available: 4
            }
        );
        assert_eq!(progress.coherence.value(), before);
        assert_eq!(engine.get("ALGO").unwrap().phase(), ConversationPhase::GreetingShown);
        assert_eq!(engine.active_name(), Some("ALGO"));
    }

    #[test]
    fn answering_without_conversation_fails() {
        let mut progress = progress();
        let mut engine = engine();
        assert_eq!(
            engine.answer(0, &mut progress, &Tuning::default()),
            Err(CommandError::NotConversing)
        );
    }

    #[test]
    fn second_conversation_is_refused_while_one_is_active() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        engine.interact("ALGO", &mut progress, &tuning).unwrap();
        assert_eq!(
            engine.interact("NET", &mut progress, &tuning),
            Err(CommandError::InConversation)
        );
        assert_eq!(engine.active_name(), Some("ALGO"));
    }

    #[test]
    fn enemy_uses_answer_specific_penalty() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        engine.interact("HUNTER", &mut progress, &tuning).unwrap();
        let outcome = engine.answer(2, &mut progress, &tuning).unwrap();
        assert!(matches!(
            outcome,
            AnswerOutcome::Incorrect {
                penalty: 42,
                enemy: true,
                ..
            }
        ));
        assert_eq!(progress.coherence.value(), tuning.starting_coherence - 42);
        assert_eq!(progress.opinion("HUNTER"), -1);
    }

    #[test]
    fn enemy_completion_does_not_count_for_quest() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        engine.interact("HUNTER", &mut progress, &tuning).unwrap();
        engine.answer(0, &mut progress, &tuning).unwrap();
        assert!(engine.is_completed("HUNTER"));
        assert!(progress.npcs_completed.contains("HUNTER"));
        assert!(!progress.quest.completed_npcs().contains("HUNTER"));
    }

    #[test]
    fn helper_restores_once_and_never_activates() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        progress.coherence.drain(50);
        let outcome = engine.interact("HEALER", &mut progress, &tuning).unwrap();
        assert_eq!(outcome, InteractOutcome::Restored { amount: 15 });
        assert_eq!(progress.coherence.value(), tuning.starting_coherence - 50 + 15);
        assert!(!engine.is_active());
        assert!(engine.is_completed("HEALER"));

        let outcome = engine.interact("HEALER", &mut progress, &tuning).unwrap();
        assert_eq!(outcome, InteractOutcome::AlreadyCompleted);
        assert_eq!(progress.coherence.value(), tuning.starting_coherence - 50 + 15);
    }

    #[test]
    fn quest_bonus_is_granted_exactly_once() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = engine();
        let briefing = engine.interact("ORACLE", &mut progress, &tuning).unwrap();
        assert!(matches!(briefing, InteractOutcome::QuestBriefing { .. }));
        assert!(progress.quest.is_active());
        assert!(!engine.is_active());

        let outcome = engine.interact("ORACLE", &mut progress, &tuning).unwrap();
        assert_eq!(
            outcome,
            InteractOutcome::QuestProgress {
                remaining: vec!["ALGO".into(), "NET".into()]
            }
        );

        for npc in ["ALGO", "NET"] {
            engine.interact(npc, &mut progress, &tuning).unwrap();
            engine.answer(1, &mut progress, &tuning).unwrap();
            engine.answer(2, &mut progress, &tuning).unwrap();
        }
        progress.coherence.drain(100);
        let outcome = engine.interact("ORACLE", &mut progress, &tuning).unwrap();
        assert_eq!(outcome, InteractOutcome::QuestFulfilled { bonus: 50 });
        assert_eq!(progress.coherence.value(), 50);

        let outcome = engine.interact("ORACLE", &mut progress, &tuning).unwrap();
        assert_eq!(outcome, InteractOutcome::QuestAlreadyRewarded);
        assert_eq!(progress.coherence.value(), 50);
    }

    #[test]
    fn collapse_abandons_but_allows_retry() {
        let tuning = Tuning::default();
        let mut progress = PlayerProgress::new(
            &Tuning {
                starting_coherence: 5,
                ..Tuning::default()
            },
            QuestTracker::default(),
        );
        let mut engine = engine();
        engine.interact("ALGO", &mut progress, &tuning).unwrap();
        let outcome = engine.answer(0, &mut progress, &tuning).unwrap();
        assert!(matches!(outcome, AnswerOutcome::Incorrect { collapsed: true, .. }));
        assert_eq!(progress.coherence.value(), 0);
        assert!(!engine.is_active());
        assert!(!engine.is_completed("ALGO"));
        assert_eq!(engine.get("ALGO").unwrap().current_question_index(), 0);

        engine.interact("ALGO", &mut progress, &tuning).unwrap();
        assert_eq!(engine.active_name(), Some("ALGO"));
    }

    #[test]
    fn empty_specialist_concludes_on_first_answer() {
        let tuning = Tuning::default();
        let mut progress = progress();
        let mut engine = ConversationEngine::from_conversations([Conversation::new(
            "MUTE",
            "...",
            Vec::new(),
            NpcKind::Specialist,
        )]);
        engine.interact("MUTE", &mut progress, &tuning).unwrap();
        let outcome = engine.answer(0, &mut progress, &tuning).unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome::Concluded {
                npc_name: "MUTE".into()
            }
        );
        assert!(engine.is_completed("MUTE"));
        assert!(!engine.is_active());
    }

    #[test]
    fn shuffle_keeps_every_answer() {
        let mut rng = RandomNumberGenerator::seeded(3);
        let mut conversation = Conversation::new(
            "ALGO",
            "hello",
            vec![question("a", 0, None), question("b", 3, None)],
            NpcKind::Specialist,
        );
        conversation.shuffle(&mut rng);
        assert_eq!(conversation.questions.len(), 2);
        for question in &conversation.questions {
            assert_eq!(question.answers.len(), 4);
            assert_eq!(question.correct_answers(), 1);
        }
    }
}
