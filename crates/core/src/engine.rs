use crate::bank::QuestionBank;
use crate::difficulty::{map_to_difficulty, DifficultyTier};
use crate::observation::{Observation, ObservationSource, SourceKind};
use crate::quiz::{load_quiz, AnswerPolicy, QuizSession, DEFAULT_MAX_QUESTIONS};
use crate::reduce::reduce;
use crate::sampling::{collect, CancelFlag, SamplingWindow};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LOG_TARGET: &str = "engine";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub window: SamplingWindow,
    pub max_questions: usize,
    pub answer_policy: AnswerPolicy,
}

impl EngineConfig {
    pub fn for_source(kind: SourceKind) -> Self {
        Self {
            window: kind.default_window(),
            max_questions: DEFAULT_MAX_QUESTIONS,
            answer_policy: AnswerPolicy::default(),
        }
    }
}

/// Result of one detection session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionOutcome {
    pub source: SourceKind,
    pub observations: Vec<Observation>,
    pub label: String,
    pub tier: DifficultyTier,
}

impl DetectionOutcome {
    /// Normalizes each label for `kind`, takes the majority and maps it.
    pub fn summarize(kind: SourceKind, observations: Vec<Observation>) -> Self {
        let observations: Vec<Observation> = observations
            .into_iter()
            .map(|o| Observation::new(kind.normalize(o.label())))
            .collect();
        let label = reduce(&observations, kind.default_label());
        let tier = map_to_difficulty(&label, kind.table());
        Self {
            source: kind,
            observations,
            label,
            tier,
        }
    }
}

pub struct DifficultyQuizEngine<S> {
    source: S,
    kind: SourceKind,
    bank: Arc<QuestionBank>,
    config: EngineConfig,
    cancel: CancelFlag,
}

impl<S> DifficultyQuizEngine<S>
where
    S: ObservationSource,
{
    pub fn new(source: S, kind: SourceKind, bank: Arc<QuestionBank>, config: EngineConfig) -> Self {
        Self {
            source,
            kind,
            bank,
            config,
            cancel: CancelFlag::new(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Handle that stops a running [`detect`](Self::detect) early. A
    /// cancellation applies to one detection cycle only.
    pub fn cancel_handle(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub async fn detect(&self) -> DetectionOutcome {
        tracing::info!(target: LOG_TARGET, source = %self.kind, window = ?self.config.window, "detection started");
        let observations = collect(&self.source, self.config.window, &self.cancel).await;
        self.cancel.reset();
        let outcome = DetectionOutcome::summarize(self.kind, observations);
        tracing::info!(
            target: LOG_TARGET,
            label = %outcome.label,
            tier = %outcome.tier,
            observations = outcome.observations.len(),
            "detection complete"
        );
        outcome
    }

    /// A fresh, already started session at the outcome's tier.
    pub fn quiz_for(&self, outcome: &DetectionOutcome) -> QuizSession {
        let questions = load_quiz(&self.bank, outcome.tier, self.config.max_questions);
        QuizSession::started(self.config.answer_policy, questions)
    }

    pub async fn run(&self) -> (DetectionOutcome, QuizSession) {
        let outcome = self.detect().await;
        let session = self.quiz_for(&outcome);
        (outcome, session)
    }
}
