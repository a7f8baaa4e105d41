#![deny(warnings)]

use adaptive_quiz_core::bank::QuestionBank;
use adaptive_quiz_core::config::{
    resolve_max_questions, resolve_string_with_default, resolve_window, AppConfig, Env,
    QuestionBankPath, StdEnv, WindowOverrides, DEFAULT_BANK_PATH, ENV_BANK_PATH,
};
use adaptive_quiz_core::engine::{DetectionOutcome, DifficultyQuizEngine, EngineConfig};
use adaptive_quiz_core::observation::{
    KeywordTextEmotionClassifier, ObservationSource, ScriptedSource, SourceKind, TypedTextSource,
};
use adaptive_quiz_core::quiz::{AnswerPolicy, QuizSession};
use adaptive_quiz_core::sampling::SamplingWindow;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceArg {
    /// Eye-aspect-ratio engagement
    Engagement,
    /// Facial emotion
    Face,
    /// Typed or spoken text emotion
    Text,
}

impl From<SourceArg> for SourceKind {
    fn from(value: SourceArg) -> Self {
        match value {
            SourceArg::Engagement => SourceKind::Engagement,
            SourceArg::Face => SourceKind::FacialEmotion,
            SourceArg::Text => SourceKind::TextEmotion,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "adaptive-quiz")]
#[command(about = "Arithmetic quiz whose difficulty follows the learner's engagement or mood")]
struct Args {
    #[arg(long, value_enum)]
    source: SourceArg,

    #[arg(long)]
    bank: Option<String>,

    #[arg(long)]
    max_questions: Option<usize>,

    /// Comma-separated labels standing in for classifier output. Each label
    /// is one tick, sampled back to back unless window flags are given.
    #[arg(long, conflicts_with = "text")]
    observations: Option<String>,

    /// Text to classify with the keyword emotion classifier
    #[arg(long)]
    text: Option<String>,

    #[arg(long)]
    window_secs: Option<u64>,

    #[arg(long)]
    interval_ms: Option<u64>,

    #[arg(long)]
    attempts: Option<u32>,

    #[arg(long, default_value = "ignore-case")]
    answer_policy: AnswerPolicy,

    /// Print the detection outcome as JSON
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let source = build_source(&args)?;
    let json = args.json;
    let cfg = build_config(args, &env)?;

    tracing::info!(
        source = %cfg.source,
        bank = %cfg.bank_path.as_path().display(),
        max_questions = cfg.max_questions.get(),
        "config loaded"
    );

    let bank = QuestionBank::load(cfg.bank_path.as_path())
        .with_context(|| format!("loading {}", cfg.bank_path.as_path().display()))?;

    let engine = DifficultyQuizEngine::new(
        source,
        cfg.source,
        Arc::new(bank),
        EngineConfig {
            window: cfg.window,
            max_questions: cfg.max_questions.get(),
            answer_policy: cfg.answer_policy,
        },
    );

    let (outcome, session) = engine.run().await;
    report_detection(&outcome, json)?;
    run_quiz(session).await?;

    Ok(())
}

fn build_source(args: &Args) -> anyhow::Result<Box<dyn ObservationSource>> {
    let kind = SourceKind::from(args.source);
    if let Some(labels) = scripted_labels(args) {
        return Ok(Box::new(ScriptedSource::from_labels(labels)));
    }
    if let Some(text) = &args.text {
        if kind != SourceKind::TextEmotion {
            anyhow::bail!("--text only applies to --source text");
        }
        return Ok(Box::new(TypedTextSource::new(
            text.clone(),
            KeywordTextEmotionClassifier::new(),
        )));
    }
    tracing::warn!(source = %kind, "no observation input given, using the default label");
    Ok(Box::new(ScriptedSource::empty()))
}

fn scripted_labels(args: &Args) -> Option<Vec<String>> {
    let list = args.observations.as_deref()?;
    Some(
        list.split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

fn report_detection(outcome: &DetectionOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    match outcome.source {
        SourceKind::Engagement => println!("Your engagement level: {}", outcome.label),
        SourceKind::FacialEmotion | SourceKind::TextEmotion => {
            println!("Detected emotion: {}", outcome.label)
        }
    }
    println!("Difficulty Level: {}", outcome.tier);
    Ok(())
}

async fn run_quiz(mut session: QuizSession) -> anyhow::Result<()> {
    if session.is_empty() {
        println!("No questions available for this difficulty.");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(idx) = session.current_index() {
        if let Some(question) = session.current() {
            println!("Q{}: {}", idx + 1, question.question);
        }
        let Some(line) = lines.next_line().await.context("reading answer")? else {
            tracing::warn!(answered = idx, "input closed before the quiz finished");
            break;
        };
        let outcome = session.submit(&line)?;
        if outcome.correct {
            println!("Correct!");
        } else {
            println!("Incorrect! The correct answer is: {}", outcome.expected);
        }
    }

    if session.is_completed() {
        println!("Quiz Completed! Your Score: {}", session.score());
    } else {
        println!("Quiz stopped. Your Score: {}", session.score());
    }
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let source = SourceKind::from(args.source);
    let scripted = scripted_labels(&args).map(|labels| labels.len());
    let bank_path = QuestionBankPath::new(resolve_string_with_default(
        args.bank,
        ENV_BANK_PATH,
        env,
        DEFAULT_BANK_PATH,
    ))?;
    let max_questions = resolve_max_questions(args.max_questions, env)?;
    let overrides = WindowOverrides {
        duration_secs: args.window_secs,
        interval_ms: args.interval_ms,
        attempts: args.attempts,
    };
    let window = match scripted {
        // canned labels have nothing to wait for
        Some(count) if overrides == WindowOverrides::default() => SamplingWindow::Counted {
            attempts: u32::try_from(count.max(1)).unwrap_or(u32::MAX),
        },
        _ => resolve_window(source, overrides)?,
    };

    Ok(AppConfig {
        source,
        bank_path,
        max_questions,
        window,
        answer_policy: args.answer_policy,
    })
}
