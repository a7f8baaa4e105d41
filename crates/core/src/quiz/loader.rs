use crate::bank::{QuestionBank, QuestionRecord};
use crate::difficulty::DifficultyTier;
use rand::Rng;

pub const DEFAULT_MAX_QUESTIONS: usize = 10;

/// Samples up to `max_count` questions at `tier` using the thread-local RNG.
pub fn load_quiz(bank: &QuestionBank, tier: DifficultyTier, max_count: usize) -> Vec<QuestionRecord> {
    load_quiz_with_rng(bank, tier, max_count, &mut rand::rng())
}

/// Uniform sample without replacement, returned in random order. An empty
/// result means the tier has no questions.
pub fn load_quiz_with_rng<R: Rng + ?Sized>(
    bank: &QuestionBank,
    tier: DifficultyTier,
    max_count: usize,
    rng: &mut R,
) -> Vec<QuestionRecord> {
    let matching: Vec<&QuestionRecord> = bank.at_tier(tier).collect();
    let amount = max_count.min(matching.len());

    let picked: Vec<QuestionRecord> = rand::seq::index::sample(rng, matching.len(), amount)
        .into_iter()
        .map(|i| matching[i].clone())
        .collect();

    if picked.is_empty() {
        tracing::warn!(%tier, "no questions available at tier");
    } else {
        tracing::debug!(%tier, available = matching.len(), picked = picked.len(), "quiz loaded");
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn record(q: &str, tier: DifficultyTier) -> QuestionRecord {
        QuestionRecord {
            question: q.to_owned(),
            answer: "0".to_owned(),
            difficulty: tier,
        }
    }

    fn bank_with(easy: usize, medium: usize, hard: usize) -> QuestionBank {
        let mut records = Vec::new();
        for i in 0..easy {
            records.push(record(&format!("easy-{i}"), DifficultyTier::Easy));
        }
        for i in 0..medium {
            records.push(record(&format!("medium-{i}"), DifficultyTier::Medium));
        }
        for i in 0..hard {
            records.push(record(&format!("hard-{i}"), DifficultyTier::Hard));
        }
        QuestionBank::new(records)
    }

    #[test]
    fn returns_all_when_tier_has_fewer_than_max() {
        let bank = bank_with(20, 20, 3);
        let quiz = load_quiz(&bank, DifficultyTier::Hard, DEFAULT_MAX_QUESTIONS);
        assert_eq!(quiz.len(), 3);
        assert!(quiz.iter().all(|q| q.difficulty == DifficultyTier::Hard));
    }

    #[test]
    fn caps_at_max_count_without_duplicates() {
        let bank = bank_with(25, 0, 0);
        let quiz = load_quiz(&bank, DifficultyTier::Easy, 10);
        assert_eq!(quiz.len(), 10);
        let unique: HashSet<_> = quiz.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(unique.len(), 10);
        assert!(quiz.iter().all(|q| q.difficulty == DifficultyTier::Easy));
    }

    #[test]
    fn empty_tier_yields_empty_quiz() {
        let bank = bank_with(5, 0, 5);
        assert!(load_quiz(&bank, DifficultyTier::Medium, 10).is_empty());
        assert!(load_quiz(&QuestionBank::default(), DifficultyTier::Easy, 10).is_empty());
    }

    #[test]
    fn zero_max_count_yields_empty_quiz() {
        let bank = bank_with(5, 5, 5);
        assert!(load_quiz(&bank, DifficultyTier::Easy, 0).is_empty());
    }

    #[test]
    fn seeded_rng_gives_repeatable_selection() {
        let bank = bank_with(0, 30, 0);
        let a = load_quiz_with_rng(&bank, DifficultyTier::Medium, 10, &mut StdRng::seed_from_u64(7));
        let b = load_quiz_with_rng(&bank, DifficultyTier::Medium, 10, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
