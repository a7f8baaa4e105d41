use crate::observation::{Observation, ObservationError, ObservationSource};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const LOG_TARGET: &str = "observation::speech";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AudioClip {
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / usize::from(self.channels.max(1));
        if self.sample_rate_hz == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate_hz))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    pub text: String,
    pub audio_duration: Duration,
    pub confidence: Option<f32>,
}

/// Records one utterance from a microphone.
pub trait AudioCapture: Send + Sync {
    fn record_utterance(&self) -> BoxFuture<'_, Result<AudioClip, ObservationError>>;
}

/// Speech-to-text. Returns [`ObservationError::Unintelligible`] when the
/// audio held no recognisable speech and
/// [`ObservationError::ServiceUnavailable`] when the backend can't be reached.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: AudioClip) -> BoxFuture<'_, Result<TranscriptSegment, ObservationError>>;
}

/// Emotion label for free text, from joy/surprise/neutral/sadness/anger/fear/disgust.
pub trait TextEmotionClassifier: Send + Sync {
    fn classify_text(&self, text: String) -> BoxFuture<'_, Result<String, ObservationError>>;
}

pub struct SpeechEmotionSource<A, T, C> {
    capture: A,
    transcriber: T,
    classifier: C,
}

impl<A, T, C> SpeechEmotionSource<A, T, C>
where
    A: AudioCapture,
    T: Transcriber,
    C: TextEmotionClassifier,
{
    pub fn new(capture: A, transcriber: T, classifier: C) -> Self {
        Self {
            capture,
            transcriber,
            classifier,
        }
    }
}

impl<A, T, C> ObservationSource for SpeechEmotionSource<A, T, C>
where
    A: AudioCapture,
    T: Transcriber,
    C: TextEmotionClassifier,
{
    fn observe(&self) -> BoxFuture<'_, Result<Vec<Observation>, ObservationError>> {
        async move {
            let clip = self.capture.record_utterance().await?;
            let transcript = self.transcriber.transcribe(clip).await?;
            tracing::info!(
                target: LOG_TARGET,
                text = %transcript.text,
                duration_ms = transcript.audio_duration.as_millis() as u64,
                "utterance transcribed"
            );
            classify_nonempty(&self.classifier, transcript.text).await
        }
        .boxed()
    }
}

/// Classifies a fixed piece of typed text on every tick.
pub struct TypedTextSource<C> {
    text: String,
    classifier: C,
}

impl<C: TextEmotionClassifier> TypedTextSource<C> {
    pub fn new<S: Into<String>>(text: S, classifier: C) -> Self {
        Self {
            text: text.into(),
            classifier,
        }
    }
}

impl<C: TextEmotionClassifier> ObservationSource for TypedTextSource<C> {
    fn observe(&self) -> BoxFuture<'_, Result<Vec<Observation>, ObservationError>> {
        classify_nonempty(&self.classifier, self.text.clone()).boxed()
    }
}

async fn classify_nonempty<C: TextEmotionClassifier + ?Sized>(
    classifier: &C,
    text: String,
) -> Result<Vec<Observation>, ObservationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ObservationError::EmptyText);
    }
    let label = classifier.classify_text(text.to_owned()).await?;
    Ok(vec![Observation::new(label)])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SilentMic;

    impl AudioCapture for SilentMic {
        fn record_utterance(&self) -> BoxFuture<'_, Result<AudioClip, ObservationError>> {
            async {
                Ok(AudioClip {
                    sample_rate_hz: 16_000,
                    channels: 1,
                    samples: vec![0.0; 16_000],
                })
            }
            .boxed()
        }
    }

    struct CannedTranscriber(Result<&'static str, ObservationError>);

    impl Transcriber for CannedTranscriber {
        fn transcribe(
            &self,
            audio: AudioClip,
        ) -> BoxFuture<'_, Result<TranscriptSegment, ObservationError>> {
            let result = self.0.clone().map(|text| TranscriptSegment {
                text: text.to_owned(),
                audio_duration: audio.duration(),
                confidence: None,
            });
            async move { result }.boxed()
        }
    }

    struct EchoClassifier;

    impl TextEmotionClassifier for EchoClassifier {
        fn classify_text(&self, text: String) -> BoxFuture<'_, Result<String, ObservationError>> {
            async move { Ok(text) }.boxed()
        }
    }

    #[test]
    fn clip_duration_accounts_for_channels() {
        let clip = AudioClip {
            sample_rate_hz: 8_000,
            channels: 2,
            samples: vec![0.0; 16_000],
        };
        assert_eq!(clip.duration(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn transcript_is_classified() {
        let source =
            SpeechEmotionSource::new(SilentMic, CannedTranscriber(Ok("Joy")), EchoClassifier);
        assert_eq!(
            source.observe().await.expect("transcribed"),
            vec![Observation::new("Joy")]
        );
    }

    #[tokio::test]
    async fn unintelligible_speech_is_reported() {
        let source = SpeechEmotionSource::new(
            SilentMic,
            CannedTranscriber(Err(ObservationError::Unintelligible)),
            EchoClassifier,
        );
        assert_eq!(source.observe().await, Err(ObservationError::Unintelligible));
    }

    #[tokio::test]
    async fn offline_service_is_reported() {
        let source = SpeechEmotionSource::new(
            SilentMic,
            CannedTranscriber(Err(ObservationError::ServiceUnavailable("offline".into()))),
            EchoClassifier,
        );
        assert!(matches!(
            source.observe().await,
            Err(ObservationError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn blank_transcript_is_empty_text() {
        let source =
            SpeechEmotionSource::new(SilentMic, CannedTranscriber(Ok("   ")), EchoClassifier);
        assert_eq!(source.observe().await, Err(ObservationError::EmptyText));
    }

    #[tokio::test]
    async fn typed_text_is_trimmed_before_classifying() {
        let source = TypedTextSource::new("  fear  ", EchoClassifier);
        assert_eq!(
            source.observe().await.expect("classified"),
            vec![Observation::new("fear")]
        );
        let empty = TypedTextSource::new("", EchoClassifier);
        assert_eq!(empty.observe().await, Err(ObservationError::EmptyText));
    }
}
