use crate::observation::SourceKind;
use crate::quiz::{AnswerPolicy, DEFAULT_MAX_QUESTIONS};
use crate::sampling::SamplingWindow;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_BANK_PATH: &str = "./math_questions.csv";
pub const ENV_BANK_PATH: &str = "ADAPTIVE_QUIZ_BANK";
pub const ENV_MAX_QUESTIONS: &str = "ADAPTIVE_QUIZ_MAX_QUESTIONS";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionBankPath(PathBuf);

impl QuestionBankPath {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyBankPath);
        }
        Ok(Self(PathBuf::from(v)))
    }

    pub fn as_path(&self) -> &std::path::Path {
        &self.0
    }
}

impl Default for QuestionBankPath {
    fn default() -> Self {
        Self(PathBuf::from(DEFAULT_BANK_PATH))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaxQuestions(usize);

impl MaxQuestions {
    pub fn new(value: usize) -> Result<Self, ConfigError> {
        if value == 0 {
            return Err(ConfigError::ZeroMaxQuestions);
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for MaxQuestions {
    fn default() -> Self {
        Self(DEFAULT_MAX_QUESTIONS)
    }
}

/// Window overrides from the command line. Anything unset falls back to
/// the source's own default window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowOverrides {
    pub duration_secs: Option<u64>,
    pub interval_ms: Option<u64>,
    pub attempts: Option<u32>,
}

pub fn resolve_window(kind: SourceKind, overrides: WindowOverrides) -> Result<SamplingWindow, ConfigError> {
    match kind.default_window() {
        SamplingWindow::Timed { duration, interval } => {
            if overrides.attempts.is_some() {
                return Err(ConfigError::WindowMismatch(kind));
            }
            let duration = overrides
                .duration_secs
                .map(Duration::from_secs)
                .unwrap_or(duration);
            let interval = overrides
                .interval_ms
                .map(Duration::from_millis)
                .unwrap_or(interval);
            if interval.is_zero() {
                return Err(ConfigError::ZeroInterval);
            }
            Ok(SamplingWindow::Timed { duration, interval })
        }
        SamplingWindow::Counted { attempts } => {
            if overrides.duration_secs.is_some() || overrides.interval_ms.is_some() {
                return Err(ConfigError::WindowMismatch(kind));
            }
            let attempts = overrides.attempts.unwrap_or(attempts);
            if attempts == 0 {
                return Err(ConfigError::ZeroAttempts);
            }
            Ok(SamplingWindow::Counted { attempts })
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub source: SourceKind,
    pub bank_path: QuestionBankPath,
    pub max_questions: MaxQuestions,
    pub window: SamplingWindow,
    pub answer_policy: AnswerPolicy,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("question bank path must not be empty")]
    EmptyBankPath,
    #[error("max questions must be > 0")]
    ZeroMaxQuestions,
    #[error("invalid max questions value: {0:?}")]
    InvalidMaxQuestions(String),
    #[error("sampling interval must be > 0 ms")]
    ZeroInterval,
    #[error("sampling attempts must be > 0")]
    ZeroAttempts,
    #[error("window option does not apply to the {0} source")]
    WindowMismatch(SourceKind),
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_max_questions(
    cli_value: Option<usize>,
    env: &impl Env,
) -> Result<MaxQuestions, ConfigError> {
    match cli_value {
        Some(v) => MaxQuestions::new(v),
        None => match env.var(ENV_MAX_QUESTIONS) {
            Some(raw) => {
                let v = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidMaxQuestions(raw.clone()))?;
                MaxQuestions::new(v)
            }
            None => Ok(MaxQuestions::default()),
        },
    }
}
