//! Eye-aspect-ratio engagement classifier over 68-point face landmarks.

use crate::observation::{Frame, Observation, ObservationError, ObservationSource};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

pub const LOW_ENGAGEMENT: &str = "Drowsy or Low Engagement";
pub const NEUTRAL_ENGAGEMENT: &str = "Neutral";
pub const HIGHLY_ENGAGED: &str = "Highly Engaged";

/// Average EAR below this reads as drowsy.
pub const DROWSY_EAR_THRESHOLD: f32 = 0.25;
/// Average EAR at or above this reads as highly engaged.
pub const ENGAGED_EAR_THRESHOLD: f32 = 0.3;

const RIGHT_EYE: [usize; 6] = [36, 37, 38, 39, 40, 41];
const LEFT_EYE: [usize; 6] = [42, 43, 44, 45, 46, 47];
const MIN_LANDMARKS: usize = 48;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Landmarks for one detected face in the 68-point layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FaceLandmarks {
    pub points: Vec<Point>,
}

/// Six points around one eye: corners at 0 and 3, lids at 1,2 and 4,5.
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> f32 {
    let a = eye[1].distance(&eye[5]);
    let b = eye[2].distance(&eye[4]);
    let c = eye[0].distance(&eye[3]).max(f32::EPSILON);
    (a + b) / (2.0 * c)
}

fn eye_points(landmarks: &FaceLandmarks, indices: [usize; 6]) -> [Point; 6] {
    indices.map(|i| landmarks.points[i])
}

pub fn classify_engagement(landmarks: &FaceLandmarks) -> Result<&'static str, ObservationError> {
    if landmarks.points.len() < MIN_LANDMARKS {
        return Err(ObservationError::InvalidLandmarks {
            expected: MIN_LANDMARKS,
            got: landmarks.points.len(),
        });
    }

    let left = eye_aspect_ratio(&eye_points(landmarks, LEFT_EYE));
    let right = eye_aspect_ratio(&eye_points(landmarks, RIGHT_EYE));
    let avg = (left + right) / 2.0;
    tracing::trace!(left, right, avg, "eye aspect ratio");

    Ok(if avg < DROWSY_EAR_THRESHOLD {
        LOW_ENGAGEMENT
    } else if avg < ENGAGED_EAR_THRESHOLD {
        NEUTRAL_ENGAGEMENT
    } else {
        HIGHLY_ENGAGED
    })
}

pub trait FrameSource: Send + Sync {
    fn capture(&self) -> BoxFuture<'_, Result<Frame, ObservationError>>;
}

/// Face detector plus landmark predictor; one entry per face found.
pub trait LandmarkDetector: Send + Sync {
    fn detect(&self, frame: Frame) -> BoxFuture<'_, Result<Vec<FaceLandmarks>, ObservationError>>;
}

pub struct EngagementSource<F, D> {
    frames: F,
    detector: D,
}

impl<F, D> EngagementSource<F, D>
where
    F: FrameSource,
    D: LandmarkDetector,
{
    pub fn new(frames: F, detector: D) -> Self {
        Self { frames, detector }
    }
}

impl<F, D> ObservationSource for EngagementSource<F, D>
where
    F: FrameSource,
    D: LandmarkDetector,
{
    fn observe(&self) -> BoxFuture<'_, Result<Vec<Observation>, ObservationError>> {
        async move {
            let frame = self.frames.capture().await?;
            let faces = self.detector.detect(frame).await?;

            let mut out = Vec::with_capacity(faces.len());
            for face in &faces {
                match classify_engagement(face) {
                    Ok(label) => out.push(Observation::new(label)),
                    Err(e) => tracing::warn!(error = %e, "skipping face"),
                }
            }
            Ok(out)
        }
        .boxed()
    }
}
