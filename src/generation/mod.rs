//! # Generation Module
//!
//! The content pipeline: prompt construction, the boundary call, and payload
//! validation for generated lessons.
//!
//! One call to [`ContentPipeline::generate`] either succeeds with a fully
//! formed [`Lesson`] or fails with one typed [`GenerationError`]. Nothing is
//! retried internally and nothing is cached; the caller re-invokes for a new
//! attempt.

use crate::config;
use crate::lesson::Lesson;
use crate::llm::TextGenerator;
use log::{debug, info};
use thiserror::Error;

/// Typed failure surfaced by the content pipeline.
///
/// None of these are retryable automatically; recovery happens at the input
/// boundary, where the player resubmits a topic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No API key is configured for the text-generation boundary
    #[error("no API key configured; set GEMINI_API_KEY")]
    MissingCredential,

    /// The boundary call did not succeed
    #[error("generation request failed with status {status}: {message}")]
    Transport { status: u16, message: String },

    /// The boundary succeeded but returned no extractable text
    #[error("generation returned no content")]
    EmptyResponse,

    /// The extracted text is not a valid lesson payload
    #[error("malformed lesson payload: {detail}")]
    MalformedPayload { detail: String },
}

/// Builds the lesson-generation prompt for a topic.
///
/// The prompt pins down everything the parser relies on: exactly five
/// progressively harder sections, four options per quiz, a zero-based
/// correct index, and a bare JSON object with no prose wrapper.
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Create an educational lesson about "{topic}" divided into {sections} sections. Each section should teach something important about the topic, progressing from basics to advanced concepts.

For each section provide:
1. A short title (3-5 words)
2. Educational content (2-3 informative paragraphs explaining key concepts clearly)
3. A multiple choice quiz question with {options} options to test understanding

Format your response as valid JSON only (no markdown, no code blocks):
{{
  "sections": [
    {{
      "title": "Introduction to {topic}",
      "content": "Paragraph 1 explaining basics...\n\nParagraph 2 with more details...",
      "quiz": {{
        "question": "What is the main concept of {topic}?",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "correctAnswer": 0
      }}
    }},
    {{
      "title": "Fundamental Concepts",
      "content": "Detailed explanation...",
      "quiz": {{
        "question": "Which statement is true?",
        "options": ["A", "B", "C", "D"],
        "correctAnswer": 1
      }}
    }},
    {{
      "title": "Core Principles",
      "content": "Core concepts...",
      "quiz": {{
        "question": "How does this principle work?",
        "options": ["A", "B", "C", "D"],
        "correctAnswer": 2
      }}
    }},
    {{
      "title": "Advanced Applications",
      "content": "Advanced topics...",
      "quiz": {{
        "question": "What is an advanced application?",
        "options": ["A", "B", "C", "D"],
        "correctAnswer": 1
      }}
    }},
    {{
      "title": "Expert Knowledge",
      "content": "Expert-level concepts...",
      "quiz": {{
        "question": "What is the expert-level understanding?",
        "options": ["A", "B", "C", "D"],
        "correctAnswer": 3
      }}
    }}
  ]
}}

Make the content educational, accurate, and progressively more challenging. The correctAnswer should be the index (0-{max_index}) of the correct option."#,
        topic = topic,
        sections = config::SECTION_COUNT,
        options = config::QUIZ_OPTION_COUNT,
        max_index = config::QUIZ_OPTION_COUNT - 1,
    )
}

/// The content pipeline: builds the request, calls the boundary, and
/// validates the payload.
pub struct ContentPipeline<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> ContentPipeline<G> {
    /// Creates a pipeline over the given boundary.
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Generates a lesson for the topic.
    ///
    /// The topic must be non-empty after trimming; callers gate on that
    /// before invoking. The only side effect is the outbound boundary call.
    pub async fn generate(&self, topic: &str) -> Result<Lesson, GenerationError> {
        let prompt = build_prompt(topic);
        debug!("Requesting lesson for topic '{}'", topic);

        let text = self.generator.complete(&prompt).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let lesson = Lesson::from_generated_text(&text)?;
        info!(
            "Generated lesson with {} sections for topic '{}'",
            lesson.len(),
            topic
        );
        Ok(lesson)
    }
}
