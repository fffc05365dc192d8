//! # Lesson Module
//!
//! The lesson data model and the validation/repair logic applied to
//! generated payloads.
//!
//! A lesson is produced exactly once per successful generation call and is
//! replaced wholesale when a new topic is submitted; sections are never
//! mutated in place.

use crate::config;
use crate::generation::GenerationError;
use serde::{Deserialize, Serialize};

/// A multiple-choice check attached to a lesson section.
///
/// Invariant: `correct_answer` indexes a valid option. Payloads violating
/// this are rejected during parsing, not silently clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// The question posed to the player
    pub question: String,
    /// Answer options, in presentation order
    pub options: Vec<String>,
    /// Zero-based index of the correct option
    pub correct_answer: usize,
}

impl Quiz {
    /// Checks whether the given option index is the correct answer.
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }

    /// Number of answer options.
    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

/// One teaching unit: a titled block of content with an associated check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Short section title
    pub title: String,
    /// Educational content; may contain paragraph breaks
    pub content: String,
    /// The check gating progression past this section
    pub quiz: Quiz,
}

/// Wire shape of a generated lesson payload.
#[derive(Debug, Serialize, Deserialize)]
struct LessonPayload {
    sections: Vec<Section>,
}

/// The five-section structured output of one generation call.
///
/// Progression through a lesson is strictly sequential: no skipping, no
/// reordering.
///
/// # Examples
///
/// ```
/// use lorequest::Lesson;
///
/// let text = r#"{"sections": [
///   {"title": "A", "content": "a", "quiz": {"question": "?", "options": ["1","2","3","4"], "correctAnswer": 0}},
///   {"title": "B", "content": "b", "quiz": {"question": "?", "options": ["1","2","3","4"], "correctAnswer": 1}},
///   {"title": "C", "content": "c", "quiz": {"question": "?", "options": ["1","2","3","4"], "correctAnswer": 2}},
///   {"title": "D", "content": "d", "quiz": {"question": "?", "options": ["1","2","3","4"], "correctAnswer": 3}},
///   {"title": "E", "content": "e", "quiz": {"question": "?", "options": ["1","2","3","4"], "correctAnswer": 0}}
/// ]}"#;
/// let lesson = Lesson::from_generated_text(text).unwrap();
/// assert_eq!(lesson.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    sections: Vec<Section>,
}

impl Lesson {
    /// Parses and validates a generated payload into a lesson.
    ///
    /// If the text is wrapped in a fenced code block the fence is stripped
    /// first; that is the only repair attempted. No schema coercion, no
    /// guessing of missing fields.
    pub fn from_generated_text(text: &str) -> Result<Self, GenerationError> {
        let normalized = strip_code_fence(text);
        let payload: LessonPayload = serde_json::from_str(normalized)
            .map_err(|e| GenerationError::MalformedPayload {
                detail: e.to_string(),
            })?;
        Self::from_sections(payload.sections)
    }

    /// Validates an already-deserialized section list into a lesson.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self, GenerationError> {
        if sections.is_empty() {
            return Err(malformed("lesson contains no sections"));
        }
        if sections.len() != config::SECTION_COUNT {
            return Err(malformed(format!(
                "expected {} sections, got {}",
                config::SECTION_COUNT,
                sections.len()
            )));
        }

        for (index, section) in sections.iter().enumerate() {
            if section.title.trim().is_empty() {
                return Err(malformed(format!("section {} has an empty title", index)));
            }
            if section.content.trim().is_empty() {
                return Err(malformed(format!("section {} has no content", index)));
            }
            if section.quiz.options.len() != config::QUIZ_OPTION_COUNT {
                return Err(malformed(format!(
                    "section {} quiz has {} options, expected {}",
                    index,
                    section.quiz.options.len(),
                    config::QUIZ_OPTION_COUNT
                )));
            }
            if section.quiz.correct_answer >= section.quiz.options.len() {
                return Err(malformed(format!(
                    "section {} quiz answer index {} is out of range",
                    index, section.quiz.correct_answer
                )));
            }
        }

        Ok(Self { sections })
    }

    /// All sections, in progression order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// A validated lesson is never empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Gets a section by index.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Index of the final section.
    pub fn last_index(&self) -> usize {
        self.sections.len() - 1
    }
}

fn malformed(detail: impl Into<String>) -> GenerationError {
    GenerationError::MalformedPayload {
        detail: detail.into(),
    }
}

/// Strips a surrounding fenced code block from generated text.
///
/// Handles a leading delimiter optionally followed by a language tag
/// (```` ```json ````) and a trailing matching delimiter. Text without a
/// complete fence is returned trimmed but otherwise untouched, so a
/// half-fenced payload fails at the parse step instead of being guessed at.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.trim_end().strip_suffix("```") else {
        return trimmed;
    };
    // The opening delimiter may carry a language tag (```json).
    inner
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(correct: usize) -> Quiz {
        Quiz {
            question: "Which statement is true?".to_string(),
            options: vec![
                "Option A".to_string(),
                "Option B".to_string(),
                "Option C".to_string(),
                "Option D".to_string(),
            ],
            correct_answer: correct,
        }
    }

    fn section(title: &str, correct: usize) -> Section {
        Section {
            title: title.to_string(),
            content: "Paragraph one.\n\nParagraph two.".to_string(),
            quiz: quiz(correct),
        }
    }

    fn five_sections() -> Vec<Section> {
        (0..5).map(|i| section(&format!("Section {}", i), i % 4)).collect()
    }

    #[test]
    fn test_valid_lesson_accepted() {
        let lesson = Lesson::from_sections(five_sections()).unwrap();
        assert_eq!(lesson.len(), 5);
        assert_eq!(lesson.last_index(), 4);
        assert_eq!(lesson.section(0).unwrap().title, "Section 0");
        assert!(lesson.section(5).is_none());
    }

    #[test]
    fn test_zero_sections_rejected() {
        let err = Lesson::from_sections(Vec::new()).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedPayload { .. }));
    }

    #[test]
    fn test_wrong_section_count_rejected() {
        let mut sections = five_sections();
        sections.pop();
        let err = Lesson::from_sections(sections).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedPayload { .. }));
    }

    #[test]
    fn test_out_of_range_answer_rejected() {
        let mut sections = five_sections();
        sections[2].quiz.correct_answer = 4;
        let err = Lesson::from_sections(sections).unwrap_err();
        match err {
            GenerationError::MalformedPayload { detail } => {
                assert!(detail.contains("out of range"), "unexpected detail: {}", detail);
            }
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_option_count_rejected() {
        let mut sections = five_sections();
        sections[0].quiz.options.push("Option E".to_string());
        assert!(Lesson::from_sections(sections).is_err());
    }

    #[test]
    fn test_empty_title_and_content_rejected() {
        let mut sections = five_sections();
        sections[1].title = "   ".to_string();
        assert!(Lesson::from_sections(sections).is_err());

        let mut sections = five_sections();
        sections[3].content = String::new();
        assert!(Lesson::from_sections(sections).is_err());
    }

    #[test]
    fn test_wire_round_trip() {
        let lesson = Lesson::from_sections(five_sections()).unwrap();
        let json = serde_json::to_string(&lesson).unwrap();
        // The wire format uses the camelCase field name.
        assert!(json.contains("correctAnswer"));
        let parsed = Lesson::from_generated_text(&json).unwrap();
        assert_eq!(parsed, lesson);
    }

    #[test]
    fn test_strip_fence_with_language_tag() {
        let text = "```json\n{\"sections\": []}\n```";
        assert_eq!(strip_code_fence(text), "{\"sections\": []}");
    }

    #[test]
    fn test_strip_fence_without_language_tag() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fence(text), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_leaves_plain_text_alone() {
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_half_fenced_text_left_for_parser() {
        // No trailing delimiter: the fence is not stripped, so the parse
        // step reports the payload as malformed.
        let text = "```json\n{\"sections\": []}";
        assert_eq!(strip_code_fence(text), text.trim());
        assert!(Lesson::from_generated_text(text).is_err());
    }

    #[test]
    fn test_fenced_payload_parses() {
        let lesson = Lesson::from_sections(five_sections()).unwrap();
        let fenced = format!("```json\n{}\n```", serde_json::to_string(&lesson).unwrap());
        let parsed = Lesson::from_generated_text(&fenced).unwrap();
        assert_eq!(parsed, lesson);
    }

    #[test]
    fn test_prose_wrapper_rejected() {
        let lesson = Lesson::from_sections(five_sections()).unwrap();
        let wrapped = format!(
            "Here is your lesson!\n{}",
            serde_json::to_string(&lesson).unwrap()
        );
        assert!(Lesson::from_generated_text(&wrapped).is_err());
    }

    #[test]
    fn test_quiz_correctness_check() {
        let q = quiz(2);
        assert!(q.is_correct(2));
        assert!(!q.is_correct(0));
        assert_eq!(q.option_count(), 4);
    }
}
