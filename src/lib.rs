//! # Lorequest
//!
//! An educational quiz quest: a topic is expanded by a generative text
//! service into a five-section lesson, and the player escapes by defeating a
//! ghost per section with correct quiz answers.
//!
//! ## Architecture Overview
//!
//! Lorequest is split along the seam between content and play:
//!
//! - **Lesson Model**: the validated five-section lesson structure produced
//!   by one generation call
//! - **Content Pipeline**: prompt construction, the boundary call, and
//!   payload validation/repair
//! - **Quest State**: the phase machine driving reading, combat, health,
//!   retries, and loss/reset semantics
//! - **LLM Boundary**: an opaque request/response trait with a Gemini client
//!   behind it
//!
//! Rendering and audio live outside the crate; state transitions emit
//! [`GameEvent`] values the presentation layer reacts to.

pub mod game;
pub mod generation;
pub mod lesson;
pub mod llm;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use lesson::*;
pub use llm::*;

/// Core error type for the Lorequest engine.
#[derive(thiserror::Error, Debug)]
pub enum QuestError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Result type used throughout the Lorequest codebase.
pub type QuestResult<T> = Result<T, QuestError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Number of sections in a generated lesson
    pub const SECTION_COUNT: usize = 5;

    /// Number of options in each quiz
    pub const QUIZ_OPTION_COUNT: usize = 4;

    /// Player starting health (hearts)
    pub const STARTING_HEALTH: u32 = 3;

    /// Ghost health per combat encounter
    pub const GHOST_HEALTH: u32 = 1;

    /// Pause before revealing the round outcome, in milliseconds
    pub const REVEAL_DELAY_MS: u64 = 1000;

    /// Pause before the post-round transition, in milliseconds
    pub const ADVANCE_DELAY_MS: u64 = 1500;

    /// Default Gemini model used for lesson generation
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
}
