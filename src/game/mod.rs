//! # Game Module
//!
//! Quest state management: the phase machine, per-run session fields, and
//! the events transitions emit for external collaborators.
//!
//! The state machine never talks to rendering or audio. Every operation
//! returns the [`GameEvent`]s it produced; the presentation layer decides
//! what a sound cue or the completion signal looks like.

pub mod state;

pub use state::*;

use crate::config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The phase of a quest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestPhase {
    /// Topic entry
    Input,
    /// A generation call is in flight
    Generating,
    /// The player is reading the current section
    Reading,
    /// The current section's quiz gates progression
    Combat,
    /// Terminal for this run
    Victory,
}

/// Outcome of a locked-in combat round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Correct,
    Wrong,
}

/// Moments the presentation layer may voice.
///
/// Audio synthesis is external; the machine only marks when a cue fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// A correct answer landed
    Correct,
    /// A wrong answer landed
    Wrong,
    /// The final section was cleared
    Victory,
    /// Health ran out and the run restarts
    Defeat,
}

/// Events emitted by state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The quest moved to a new phase
    PhaseChanged { from: QuestPhase, to: QuestPhase },
    /// Play a sound at this moment
    SoundCue(SoundCue),
    /// The player advanced to the given section index
    SectionAdvanced { section: usize },
    /// Health ran out; the run restarted from the first section
    RunReset,
    /// The quest was completed; raised exactly once per run
    QuestCompleted,
}

/// Presentation pacing for the two-stage round resolution.
///
/// The ordering is the contract (reveal the outcome, then advance); the
/// durations are polish. Headless callers use [`PacingConfig::none`] and get
/// identical state mutations with no waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// Pause after an answer locks in, before the outcome effect
    pub reveal_delay: Duration,
    /// Pause after the outcome effect, before the transition
    pub advance_delay: Duration,
}

impl PacingConfig {
    /// Zero-delay pacing for headless and test use.
    pub fn none() -> Self {
        Self {
            reveal_delay: Duration::ZERO,
            advance_delay: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(config::REVEAL_DELAY_MS),
            advance_delay: Duration::from_millis(config::ADVANCE_DELAY_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pacing_orders_reveal_before_advance() {
        let pacing = PacingConfig::default();
        assert_eq!(pacing.reveal_delay, Duration::from_millis(1000));
        assert_eq!(pacing.advance_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_none_pacing_is_zero() {
        let pacing = PacingConfig::none();
        assert!(pacing.reveal_delay.is_zero());
        assert!(pacing.advance_delay.is_zero());
    }

    #[test]
    fn test_game_event_serializes() {
        let event = GameEvent::PhaseChanged {
            from: QuestPhase::Reading,
            to: QuestPhase::Combat,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
