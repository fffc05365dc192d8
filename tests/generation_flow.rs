//! Integration tests for the content pipeline over a scripted boundary.

use async_trait::async_trait;
use lorequest::{ContentPipeline, GeminiClient, GenerationError, Lesson, Quiz, Section, TextGenerator};

/// Boundary stand-in that replays a fixed response.
struct ScriptedGenerator {
    response: Result<String, GenerationError>,
}

impl ScriptedGenerator {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    fn err(error: GenerationError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.response.clone()
    }
}

fn sample_lesson() -> Lesson {
    let sections = (0..5)
        .map(|i| Section {
            title: format!("Part {}", i),
            content: "First paragraph.\n\nSecond paragraph.".to_string(),
            quiz: Quiz {
                question: "Which statement is true?".to_string(),
                options: vec![
                    "One".to_string(),
                    "Two".to_string(),
                    "Three".to_string(),
                    "Four".to_string(),
                ],
                correct_answer: (i + 1) % 4,
            },
        })
        .collect();
    Lesson::from_sections(sections).expect("fixture lesson is valid")
}

#[tokio::test]
async fn test_valid_payload_round_trips_unchanged() {
    let lesson = sample_lesson();
    let payload = serde_json::to_string(&lesson).expect("serializes");

    let pipeline = ContentPipeline::new(ScriptedGenerator::ok(payload));
    let generated = pipeline.generate("anything").await.expect("generates");

    assert_eq!(generated, lesson);
}

#[tokio::test]
async fn test_fenced_payload_is_repaired() {
    let lesson = sample_lesson();
    let fenced = format!(
        "```json\n{}\n```",
        serde_json::to_string(&lesson).expect("serializes")
    );

    let pipeline = ContentPipeline::new(ScriptedGenerator::ok(fenced));
    let generated = pipeline.generate("anything").await.expect("generates");

    assert_eq!(generated, lesson);
}

#[tokio::test]
async fn test_unparseable_text_is_malformed() {
    let pipeline = ContentPipeline::new(ScriptedGenerator::ok(
        "I'm sorry, I can't produce JSON today.",
    ));
    let err = pipeline.generate("anything").await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_zero_sections_is_malformed() {
    let pipeline = ContentPipeline::new(ScriptedGenerator::ok(r#"{"sections": []}"#));
    let err = pipeline.generate("anything").await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_invalid_answer_index_is_malformed_not_clamped() {
    let lesson = sample_lesson();
    let mut value: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&lesson).expect("serializes")).unwrap();
    value["sections"][4]["quiz"]["correctAnswer"] = serde_json::json!(7);

    let pipeline = ContentPipeline::new(ScriptedGenerator::ok(value.to_string()));
    let err = pipeline.generate("anything").await.unwrap_err();
    assert!(matches!(err, GenerationError::MalformedPayload { .. }));
}

#[tokio::test]
async fn test_blank_text_is_empty_response() {
    let pipeline = ContentPipeline::new(ScriptedGenerator::ok("   \n  "));
    let err = pipeline.generate("anything").await.unwrap_err();
    assert_eq!(err, GenerationError::EmptyResponse);
}

#[tokio::test]
async fn test_transport_error_passes_through() {
    let pipeline = ContentPipeline::new(ScriptedGenerator::err(GenerationError::Transport {
        status: 503,
        message: "model overloaded".to_string(),
    }));
    let err = pipeline.generate("anything").await.unwrap_err();
    assert_eq!(
        err,
        GenerationError::Transport {
            status: 503,
            message: "model overloaded".to_string(),
        }
    );
}

#[tokio::test]
async fn test_missing_credential_without_network_call() {
    // A keyless Gemini client fails before any request is issued; there is
    // no server behind the default URL in tests, so anything but
    // MissingCredential here would mean a network attempt happened.
    let client = GeminiClient::new(None, "gemini-2.0-flash");
    let pipeline = ContentPipeline::new(client);
    let err = pipeline.generate("anything").await.unwrap_err();
    assert_eq!(err, GenerationError::MissingCredential);
}
