use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Tier used for any label a table does not mention.
    pub const FALLBACK: DifficultyTier = DifficultyTier::Medium;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl Default for DifficultyTier {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0:?}")]
pub struct ParseTierError(pub String);

impl FromStr for DifficultyTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseTierError(trimmed.to_owned()))
    }
}

/// Fixed label to tier lookup shipped with each observation source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DifficultyTable {
    entries: &'static [(&'static str, DifficultyTier)],
}

impl DifficultyTable {
    pub const fn new(entries: &'static [(&'static str, DifficultyTier)]) -> Self {
        Self { entries }
    }

    pub fn get(&self, label: &str) -> Option<DifficultyTier> {
        self.entries
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, tier)| *tier)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }
}

pub const ENGAGEMENT_TABLE: DifficultyTable = DifficultyTable::new(&[
    ("Drowsy or Low Engagement", DifficultyTier::Easy),
    ("Neutral", DifficultyTier::Medium),
    ("Highly Engaged", DifficultyTier::Hard),
]);

pub const FACE_EMOTION_TABLE: DifficultyTable = DifficultyTable::new(&[
    ("happy", DifficultyTier::Hard),
    ("sad", DifficultyTier::Medium),
    ("angry", DifficultyTier::Easy),
    ("fear", DifficultyTier::Easy),
    ("surprise", DifficultyTier::Hard),
    ("neutral", DifficultyTier::Medium),
    ("disgust", DifficultyTier::Medium),
]);

pub const TEXT_EMOTION_TABLE: DifficultyTable = DifficultyTable::new(&[
    ("joy", DifficultyTier::Hard),
    ("surprise", DifficultyTier::Hard),
    ("neutral", DifficultyTier::Medium),
    ("sadness", DifficultyTier::Easy),
    ("anger", DifficultyTier::Easy),
    ("fear", DifficultyTier::Medium),
    ("disgust", DifficultyTier::Medium),
]);

/// Case-sensitive lookup; anything unmapped lands on [`DifficultyTier::FALLBACK`].
pub fn map_to_difficulty(label: &str, table: &DifficultyTable) -> DifficultyTier {
    match table.get(label) {
        Some(tier) => tier,
        None => {
            tracing::debug!(label, fallback = %DifficultyTier::FALLBACK, "label not in table");
            DifficultyTier::FALLBACK
        }
    }
}
