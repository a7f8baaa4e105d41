use crate::observation::{Observation, ObservationError, ObservationSource};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Replays preset labels, one tick at a time, then reports
/// [`ObservationError::Exhausted`].
pub struct ScriptedSource {
    ticks: Mutex<VecDeque<Vec<Observation>>>,
}

impl ScriptedSource {
    pub fn new(ticks: Vec<Vec<Observation>>) -> Self {
        Self {
            ticks: Mutex::new(ticks.into()),
        }
    }

    /// One label per tick.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            labels
                .into_iter()
                .map(|l| vec![Observation::new(l)])
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub async fn remaining(&self) -> usize {
        self.ticks.lock().await.len()
    }
}

impl ObservationSource for ScriptedSource {
    fn observe(&self) -> BoxFuture<'_, Result<Vec<Observation>, ObservationError>> {
        async move {
            self.ticks
                .lock()
                .await
                .pop_front()
                .ok_or(ObservationError::Exhausted)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_in_order_then_exhausts() {
        let source = ScriptedSource::from_labels(["happy", "sad"]);
        assert_eq!(source.remaining().await, 2);
        assert_eq!(source.observe().await, Ok(vec![Observation::new("happy")]));
        assert_eq!(source.observe().await, Ok(vec![Observation::new("sad")]));
        assert_eq!(source.observe().await, Err(ObservationError::Exhausted));
    }

    #[tokio::test]
    async fn empty_tick_is_not_exhaustion() {
        let source = ScriptedSource::new(vec![Vec::new(), vec![Observation::new("joy")]]);
        assert_eq!(source.observe().await, Ok(Vec::new()));
        assert_eq!(source.observe().await, Ok(vec![Observation::new("joy")]));
    }
}
