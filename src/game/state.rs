//! # Quest State Module
//!
//! Central state for one quest session and the transitions that drive it.
//!
//! This is the main coordination point for play: topic submission,
//! generation completion, reading, combat rounds, and the loss/reset
//! semantics. Round resolution is split into two explicitly sequenced steps:
//! [`QuestState::submit_answer`] locks in the round and applies the
//! outcome's health effects, and [`QuestState::resolve_round`] performs the
//! follow-up transition. The machine is fully testable without real time
//! passing.

use crate::config;
use crate::game::{GameEvent, QuestPhase, RoundOutcome, SoundCue};
use crate::generation::GenerationError;
use crate::lesson::{Lesson, Section};
use crate::{QuestError, QuestResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State for one quest session.
///
/// There is exactly one writer (the operations below); the presentation
/// layer reads through the accessor methods. All transitions happen on a
/// single sequential timeline.
///
/// # Examples
///
/// ```
/// use lorequest::{QuestPhase, QuestState};
///
/// let mut state = QuestState::new();
/// assert_eq!(state.phase(), QuestPhase::Input);
///
/// state.submit_topic("Quantum Physics").unwrap();
/// assert_eq!(state.phase(), QuestPhase::Generating);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestState {
    /// Session identifier for log correlation
    session_id: Uuid,
    phase: QuestPhase,
    topic: String,
    lesson: Option<Lesson>,
    current_section: usize,
    player_health: u32,
    ghost_health: u32,
    combat_result: Option<RoundOutcome>,
    selected_answer: Option<usize>,
    last_error: Option<String>,
    completion_signaled: bool,
}

impl QuestState {
    /// Creates a fresh session in the Input phase.
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        debug!("New quest session {}", session_id);
        Self {
            session_id,
            phase: QuestPhase::Input,
            topic: String::new(),
            lesson: None,
            current_section: 0,
            player_health: config::STARTING_HEALTH,
            ghost_health: config::GHOST_HEALTH,
            combat_result: None,
            selected_answer: None,
            last_error: None,
            completion_signaled: false,
        }
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// Session identifier.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current phase.
    pub fn phase(&self) -> QuestPhase {
        self.phase
    }

    /// The submitted topic (preserved across generation failures).
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The active lesson, if generation has succeeded.
    pub fn lesson(&self) -> Option<&Lesson> {
        self.lesson.as_ref()
    }

    /// Zero-based index of the current section.
    pub fn current_section_index(&self) -> usize {
        self.current_section
    }

    /// The current section, if a lesson is active.
    pub fn current_section(&self) -> Option<&Section> {
        self.lesson.as_ref().and_then(|l| l.section(self.current_section))
    }

    /// Player health in hearts.
    pub fn player_health(&self) -> u32 {
        self.player_health
    }

    /// Ghost health for the current encounter (0 or 1).
    pub fn ghost_health(&self) -> u32 {
        self.ghost_health
    }

    /// The locked-in outcome of the current round, if any.
    pub fn combat_result(&self) -> Option<RoundOutcome> {
        self.combat_result
    }

    /// The answer index locked in for the current round, if any.
    pub fn selected_answer(&self) -> Option<usize> {
        self.selected_answer
    }

    /// Message of the last generation failure, for display at topic entry.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// One-based progress for display: `(current, total)`.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.lesson.as_ref().map(Lesson::len).unwrap_or(0);
        (self.current_section + 1, total)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Submits a topic, moving Input to Generating.
    ///
    /// A topic that is empty after trimming does not transition (the caller
    /// normally guards on this before invoking). Submitting outside the
    /// Input phase is a contract violation; rejecting it while a generation
    /// call is in flight is the single-flight guard.
    pub fn submit_topic(&mut self, topic: &str) -> QuestResult<Vec<GameEvent>> {
        if self.phase != QuestPhase::Input {
            return Err(QuestError::InvalidAction(format!(
                "cannot submit a topic during {:?}",
                self.phase
            )));
        }

        let trimmed = topic.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        self.topic = trimmed.to_string();
        self.last_error = None;

        let mut events = Vec::new();
        self.set_phase(QuestPhase::Generating, &mut events);
        Ok(events)
    }

    /// Applies the result of the generation call issued for this session.
    ///
    /// On success the session fields are initialized fresh and the quest
    /// moves to Reading. On failure the quest returns to Input with the
    /// error message exposed for display; the topic and any previous
    /// session fields are untouched.
    pub fn finish_generation(
        &mut self,
        result: Result<Lesson, GenerationError>,
    ) -> QuestResult<Vec<GameEvent>> {
        if self.phase != QuestPhase::Generating {
            return Err(QuestError::InvalidAction(
                "no generation is in flight".to_string(),
            ));
        }

        let mut events = Vec::new();
        match result {
            Ok(lesson) => {
                info!(
                    "Session {}: lesson ready with {} sections",
                    self.session_id,
                    lesson.len()
                );
                self.lesson = Some(lesson);
                self.current_section = 0;
                self.player_health = config::STARTING_HEALTH;
                self.completion_signaled = false;
                self.last_error = None;
                self.clear_round();
                self.set_phase(QuestPhase::Reading, &mut events);
            }
            Err(error) => {
                info!("Session {}: generation failed: {}", self.session_id, error);
                self.last_error = Some(error.to_string());
                self.set_phase(QuestPhase::Input, &mut events);
            }
        }
        Ok(events)
    }

    /// Explicit player action moving Reading to Combat.
    ///
    /// The ghost is restored and any previous round state cleared on entry.
    pub fn face_the_ghost(&mut self) -> QuestResult<Vec<GameEvent>> {
        if self.phase != QuestPhase::Reading {
            return Err(QuestError::InvalidAction(format!(
                "cannot enter combat during {:?}",
                self.phase
            )));
        }

        self.clear_round();
        let mut events = Vec::new();
        self.set_phase(QuestPhase::Combat, &mut events);
        Ok(events)
    }

    /// Locks in an answer for the current combat round.
    ///
    /// Idempotent once a result is set: further calls in the same round are
    /// no-ops regardless of index. A correct answer downs the ghost; a wrong
    /// one costs a heart. The follow-up transition happens in
    /// [`QuestState::resolve_round`].
    pub fn submit_answer(&mut self, index: usize) -> QuestResult<Vec<GameEvent>> {
        if self.phase != QuestPhase::Combat {
            return Err(QuestError::InvalidAction(format!(
                "cannot answer during {:?}",
                self.phase
            )));
        }
        if self.combat_result.is_some() {
            // Answer already locked in for this round.
            return Ok(Vec::new());
        }

        let quiz = &self
            .current_section()
            .ok_or_else(|| QuestError::InvalidState("no active section".to_string()))?
            .quiz;
        if index >= quiz.option_count() {
            return Err(QuestError::InvalidAction(format!(
                "answer index {} out of range",
                index
            )));
        }

        let correct = quiz.is_correct(index);
        self.selected_answer = Some(index);

        let mut events = Vec::new();
        if correct {
            self.combat_result = Some(RoundOutcome::Correct);
            self.ghost_health = 0;
            events.push(GameEvent::SoundCue(SoundCue::Correct));
        } else {
            self.combat_result = Some(RoundOutcome::Wrong);
            self.player_health = self.player_health.saturating_sub(1);
            events.push(GameEvent::SoundCue(SoundCue::Wrong));
        }

        debug!(
            "Session {}: answer {} on section {} -> {:?}",
            self.session_id, index, self.current_section, self.combat_result
        );
        Ok(events)
    }

    /// Performs the transition that follows a locked-in round.
    ///
    /// No-op when no round outcome is pending. After a correct answer the
    /// quest advances (or completes on the final section); after a wrong
    /// answer the same question is retried against a fresh ghost, unless
    /// health ran out, in which case the whole run restarts from the first
    /// section. A restart is a reset, not a terminal state.
    pub fn resolve_round(&mut self) -> QuestResult<Vec<GameEvent>> {
        let Some(outcome) = self.combat_result else {
            return Ok(Vec::new());
        };
        let last_index = self
            .lesson
            .as_ref()
            .ok_or_else(|| QuestError::InvalidState("no active lesson".to_string()))?
            .last_index();

        let mut events = Vec::new();
        match outcome {
            RoundOutcome::Correct => {
                if self.current_section == last_index {
                    events.push(GameEvent::SoundCue(SoundCue::Victory));
                    self.set_phase(QuestPhase::Victory, &mut events);
                    if !self.completion_signaled {
                        self.completion_signaled = true;
                        events.push(GameEvent::QuestCompleted);
                    }
                    info!("Session {}: quest completed", self.session_id);
                } else {
                    self.current_section += 1;
                    self.clear_round();
                    self.set_phase(QuestPhase::Reading, &mut events);
                    events.push(GameEvent::SectionAdvanced {
                        section: self.current_section,
                    });
                }
            }
            RoundOutcome::Wrong => {
                if self.player_health == 0 {
                    self.current_section = 0;
                    self.player_health = config::STARTING_HEALTH;
                    self.clear_round();
                    events.push(GameEvent::SoundCue(SoundCue::Defeat));
                    self.set_phase(QuestPhase::Reading, &mut events);
                    events.push(GameEvent::RunReset);
                    info!("Session {}: health exhausted, run reset", self.session_id);
                } else {
                    // Same question, fresh ghost.
                    self.clear_round();
                }
            }
        }
        Ok(events)
    }

    fn set_phase(&mut self, to: QuestPhase, events: &mut Vec<GameEvent>) {
        let from = self.phase;
        self.phase = to;
        debug!("Session {}: {:?} -> {:?}", self.session_id, from, to);
        events.push(GameEvent::PhaseChanged { from, to });
    }

    fn clear_round(&mut self) {
        self.combat_result = None;
        self.selected_answer = None;
        self.ghost_health = config::GHOST_HEALTH;
    }
}

impl Default for QuestState {
    fn default() -> Self {
        Self::new()
    }
}
