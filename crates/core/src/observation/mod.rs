mod engagement;
mod face;
mod keyword;
mod scripted;
mod speech;

use crate::difficulty::{DifficultyTable, ENGAGEMENT_TABLE, FACE_EMOTION_TABLE, TEXT_EMOTION_TABLE};
use crate::sampling::SamplingWindow;
use bytes::Bytes;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::{fmt, time::SystemTime};

pub use engagement::{
    classify_engagement, eye_aspect_ratio, EngagementSource, FaceLandmarks, FrameSource,
    LandmarkDetector, Point, DROWSY_EAR_THRESHOLD, ENGAGED_EAR_THRESHOLD, HIGHLY_ENGAGED, LOW_ENGAGEMENT,
    NEUTRAL_ENGAGEMENT,
};
pub use face::{FaceEmotionClassifier, FaceEmotionSource};
pub use keyword::KeywordTextEmotionClassifier;
pub use scripted::ScriptedSource;
pub use speech::{
    AudioCapture, AudioClip, SpeechEmotionSource, TextEmotionClassifier, TranscriptSegment,
    Transcriber, TypedTextSource,
};

/// One label emitted by a classifier during a sampling tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Observation(pub String);

impl Observation {
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Observation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which classifier produced the observations. Decides the default label,
/// the difficulty table and how labels are normalized before lookup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Engagement,
    FacialEmotion,
    TextEmotion,
}

impl SourceKind {
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Engagement => NEUTRAL_ENGAGEMENT,
            Self::FacialEmotion | Self::TextEmotion => "neutral",
        }
    }

    pub fn table(&self) -> &'static DifficultyTable {
        match self {
            Self::Engagement => &ENGAGEMENT_TABLE,
            Self::FacialEmotion => &FACE_EMOTION_TABLE,
            Self::TextEmotion => &TEXT_EMOTION_TABLE,
        }
    }

    pub fn normalize(&self, label: &str) -> String {
        match self {
            Self::TextEmotion => label.trim().to_lowercase(),
            Self::Engagement | Self::FacialEmotion => label.to_owned(),
        }
    }

    pub fn default_window(&self) -> SamplingWindow {
        match self {
            Self::Engagement => SamplingWindow::ENGAGEMENT,
            Self::FacialEmotion => SamplingWindow::FACE_EMOTION,
            Self::TextEmotion => SamplingWindow::SPEECH,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engagement => "engagement",
            Self::FacialEmotion => "facial-emotion",
            Self::TextEmotion => "text-emotion",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub sequence: u64,
    pub captured_at: SystemTime,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservationError {
    #[error("no frame available from capture device")]
    NoFrame,

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("expected at least {expected} landmarks, got {got}")]
    InvalidLandmarks { expected: usize, got: usize },

    #[error("classifier failed: {0}")]
    Classifier(String),

    #[error("could not understand audio")]
    Unintelligible,

    #[error("speech service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("no text to classify")]
    EmptyText,

    #[error("observation source exhausted")]
    Exhausted,
}

/// External classifier seam. Each call is one sampling tick and may yield
/// zero labels (no face in frame) or several (one per face).
pub trait ObservationSource: Send + Sync {
    fn observe(&self) -> BoxFuture<'_, Result<Vec<Observation>, ObservationError>>;
}

impl<T: ObservationSource + ?Sized> ObservationSource for Box<T> {
    fn observe(&self) -> BoxFuture<'_, Result<Vec<Observation>, ObservationError>> {
        (**self).observe()
    }
}
