//! # Lorequest Main Entry Point
//!
//! Headless terminal front-end: reads a topic, generates a lesson through
//! the Gemini boundary, and drives the quest loop over stdin/stdout.
//!
//! This binary is a caller of the library. It enforces the caller-side
//! contracts: a topic is only submitted when non-empty, the single
//! generation call per submission is awaited inline (single-flight), and
//! answer input is validated against the option range before it reaches the
//! state machine.

use clap::Parser;
use log::info;
use lorequest::{
    config, ContentPipeline, GameEvent, GeminiClient, PacingConfig, QuestError, QuestPhase,
    QuestResult, QuestState, RoundOutcome, Section, SoundCue,
};
use std::io::{self, BufRead, Write};

/// Command line arguments for Lorequest.
#[derive(Parser, Debug)]
#[command(name = "lorequest")]
#[command(about = "An educational quiz quest with LLM-generated lessons")]
#[command(version)]
struct Args {
    /// Topic to study (prompted for interactively if omitted)
    #[arg(short, long)]
    topic: Option<String>,

    /// Display label for the gated destination unlocked on victory
    #[arg(long, default_value = "the archive")]
    site_name: String,

    /// Gemini model used for lesson generation
    #[arg(long, default_value = config::DEFAULT_MODEL)]
    model: String,

    /// Skip the presentation pauses between combat beats
    #[arg(long)]
    fast: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> QuestResult<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.clone()),
    )
    .init();

    info!("Starting Lorequest v{}", lorequest::VERSION);
    run_quest(args).await
}

/// Drives one quest session to completion.
async fn run_quest(args: Args) -> QuestResult<()> {
    let client = GeminiClient::from_env(&args.model);
    let pipeline = ContentPipeline::new(client);
    let pacing = if args.fast {
        PacingConfig::none()
    } else {
        PacingConfig::default()
    };

    let mut state = QuestState::new();
    let mut cli_topic = args.topic.clone();
    let stdin = io::stdin();

    println!("== LEARN TO ESCAPE ==");
    println!(
        "To unlock {}, you must complete an educational quest. Choose your topic wisely...",
        args.site_name
    );

    loop {
        match state.phase() {
            QuestPhase::Input => {
                if let Some(error) = state.last_error() {
                    println!("\n! {}", error);
                }
                let topic = match cli_topic.take() {
                    Some(topic) => topic,
                    None => read_line(&stdin, "\nEnter a topic: ")?,
                };
                if topic.trim().is_empty() {
                    println!("A quest needs a topic.");
                    continue;
                }
                state.submit_topic(&topic)?;
            }

            QuestPhase::Generating => {
                println!("\nSummoning knowledge about \"{}\"...", state.topic());
                // The await here is the single-flight guard: no second
                // generation can be submitted until this one lands.
                let result = pipeline.generate(state.topic()).await;
                state.finish_generation(result)?;
            }

            QuestPhase::Reading => {
                let (current, total) = state.progress();
                let section = current_section(&state)?;
                println!("\n--- Section {} of {} --- {}", current, total, hearts(&state));
                println!("# {}\n", section.title);
                println!("{}", section.content);
                read_line(&stdin, "\n[Enter] FACE THE GHOST ")?;
                state.face_the_ghost()?;
            }

            QuestPhase::Combat => {
                let section = current_section(&state)?;
                println!("\nA ghost bars your way! {}", hearts(&state));
                println!("{}", section.quiz.question);
                for (i, option) in section.quiz.options.iter().enumerate() {
                    println!("  {}. {}", letter(i), option);
                }

                let index = loop {
                    let answer = read_line(&stdin, "Your answer: ")?;
                    match parse_answer(&answer, section.quiz.option_count()) {
                        Some(index) => break index,
                        None => println!("Answer with a letter A-D."),
                    }
                };

                let mut events = state.submit_answer(index)?;
                tokio::time::sleep(pacing.reveal_delay).await;
                match state.combat_result() {
                    Some(RoundOutcome::Correct) => println!("The ghost dissolves!"),
                    Some(RoundOutcome::Wrong) => println!("The ghost cackles. You lose a heart."),
                    None => {}
                }
                tokio::time::sleep(pacing.advance_delay).await;
                events.extend(state.resolve_round()?);
                report_events(&events, &args.site_name);
            }

            QuestPhase::Victory => {
                println!("\nYou have conquered the quest and gained knowledge!");
                break;
            }
        }
    }

    Ok(())
}

/// Prints the lines the state machine's events call for.
fn report_events(events: &[GameEvent], site_name: &str) {
    for event in events {
        match event {
            GameEvent::RunReset => {
                println!("Your hearts are spent. The quest begins anew...");
            }
            GameEvent::QuestCompleted => {
                // The completion signal for the collaborator gating access.
                println!("\n*** VICTORY! The door to {} is now open. ***", site_name);
            }
            GameEvent::SoundCue(SoundCue::Defeat) => {
                println!("(a mournful wail echoes)");
            }
            _ => {}
        }
    }
}

fn current_section(state: &QuestState) -> QuestResult<&Section> {
    state
        .current_section()
        .ok_or_else(|| QuestError::InvalidState("no active section".to_string()))
}

fn hearts(state: &QuestState) -> String {
    "♥".repeat(state.player_health() as usize)
}

fn letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Parses an answer as a letter (A-D) or a one-based number.
fn parse_answer(input: &str, option_count: usize) -> Option<usize> {
    let trimmed = input.trim();
    if trimmed.len() == 1 {
        let c = trimmed.chars().next()?.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            let index = (c as u8 - b'A') as usize;
            return (index < option_count).then_some(index);
        }
        if let Some(digit) = c.to_digit(10) {
            let index = (digit as usize).checked_sub(1)?;
            return (index < option_count).then_some(index);
        }
    }
    None
}

fn read_line(stdin: &io::Stdin, prompt: &str) -> QuestResult<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Err(QuestError::InvalidState("input closed".to_string()));
    }
    Ok(line.trim_end().to_string())
}
