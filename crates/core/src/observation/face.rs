use crate::observation::{Frame, FrameSource, Observation, ObservationError, ObservationSource};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Dominant emotion for each face found in a frame, drawn from
/// happy/sad/angry/fear/surprise/neutral/disgust.
pub trait FaceEmotionClassifier: Send + Sync {
    fn classify_faces(&self, frame: Frame) -> BoxFuture<'_, Result<Vec<String>, ObservationError>>;
}

pub struct FaceEmotionSource<F, C> {
    frames: F,
    classifier: C,
}

impl<F, C> FaceEmotionSource<F, C>
where
    F: FrameSource,
    C: FaceEmotionClassifier,
{
    pub fn new(frames: F, classifier: C) -> Self {
        Self { frames, classifier }
    }
}

impl<F, C> ObservationSource for FaceEmotionSource<F, C>
where
    F: FrameSource,
    C: FaceEmotionClassifier,
{
    fn observe(&self) -> BoxFuture<'_, Result<Vec<Observation>, ObservationError>> {
        async move {
            let frame = self.frames.capture().await?;
            let emotions = self.classifier.classify_faces(frame).await?;
            Ok(emotions.into_iter().map(Observation::new).collect())
        }
        .boxed()
    }
}
