use crate::bank::QuestionRecord;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnswerPolicy {
    Exact,
    #[default]
    IgnoreCase,
}

impl AnswerPolicy {
    /// Both sides are trimmed before comparing.
    pub fn matches(&self, submitted: &str, expected: &str) -> bool {
        let submitted = submitted.trim();
        let expected = expected.trim();
        match self {
            Self::Exact => submitted == expected,
            Self::IgnoreCase => submitted.to_lowercase() == expected.to_lowercase(),
        }
    }
}

impl FromStr for AnswerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "ignore-case" | "ignore_case" => Ok(Self::IgnoreCase),
            other => Err(format!("unknown answer policy: {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuizState {
    AwaitingStart,
    Presenting(usize),
    Completed,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub expected: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz has not been started")]
    NotStarted,
    #[error("quiz already started")]
    AlreadyStarted,
    #[error("quiz is completed")]
    Completed,
}

/// Strictly forward quiz: one submission per question, no skipping.
#[derive(Clone, Debug)]
pub struct QuizSession {
    questions: Vec<QuestionRecord>,
    state: QuizState,
    correct: usize,
    policy: AnswerPolicy,
}

impl QuizSession {
    pub fn new(policy: AnswerPolicy) -> Self {
        Self {
            questions: Vec::new(),
            state: QuizState::AwaitingStart,
            correct: 0,
            policy,
        }
    }

    /// Loads the questions and moves to the first one, or straight to
    /// `Completed` when there are none.
    pub fn start(&mut self, questions: Vec<QuestionRecord>) -> Result<QuizState, QuizError> {
        if self.state != QuizState::AwaitingStart {
            return Err(QuizError::AlreadyStarted);
        }
        self.state = if questions.is_empty() {
            QuizState::Completed
        } else {
            QuizState::Presenting(0)
        };
        self.questions = questions;
        Ok(self.state)
    }

    pub fn started(policy: AnswerPolicy, questions: Vec<QuestionRecord>) -> Self {
        let state = if questions.is_empty() {
            QuizState::Completed
        } else {
            QuizState::Presenting(0)
        };
        Self {
            questions,
            state,
            correct: 0,
            policy,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn policy(&self) -> AnswerPolicy {
        self.policy
    }

    pub fn is_completed(&self) -> bool {
        self.state == QuizState::Completed
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question being presented, if any.
    pub fn current(&self) -> Option<&QuestionRecord> {
        match self.state {
            QuizState::Presenting(i) => self.questions.get(i),
            _ => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuizState::Presenting(i) => Some(i),
            _ => None,
        }
    }

    pub fn submit(&mut self, answer: &str) -> Result<AnswerOutcome, QuizError> {
        let idx = match self.state {
            QuizState::AwaitingStart => return Err(QuizError::NotStarted),
            QuizState::Completed => return Err(QuizError::Completed),
            QuizState::Presenting(i) => i,
        };

        let expected = self.questions[idx].answer.trim().to_owned();
        let correct = self.policy.matches(answer, &expected);
        if correct {
            self.correct += 1;
        }

        self.state = if idx + 1 == self.questions.len() {
            QuizState::Completed
        } else {
            QuizState::Presenting(idx + 1)
        };

        tracing::debug!(question = idx + 1, correct, "answer submitted");
        Ok(AnswerOutcome { correct, expected })
    }

    pub fn score(&self) -> Score {
        Score {
            correct: self.correct,
            total: self.questions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::DifficultyTier;

    fn q(question: &str, answer: &str) -> QuestionRecord {
        QuestionRecord {
            question: question.to_owned(),
            answer: answer.to_owned(),
            difficulty: DifficultyTier::Easy,
        }
    }

    #[test]
    fn one_right_one_wrong_scores_one_of_two() {
        let mut session = QuizSession::new(AnswerPolicy::Exact);
        assert_eq!(session.state(), QuizState::AwaitingStart);
        let state = session
            .start(vec![q("2 + 2", "4"), q("3 * 3", "9")])
            .expect("fresh session");
        assert_eq!(state, QuizState::Presenting(0));
        assert_eq!(session.current().map(|r| r.question.as_str()), Some("2 + 2"));

        assert!(session.submit("4").expect("presenting").correct);
        assert_eq!(session.state(), QuizState::Presenting(1));

        let outcome = session.submit("8").expect("presenting");
        assert!(!outcome.correct);
        assert_eq!(outcome.expected, "9");

        assert_eq!(session.state(), QuizState::Completed);
        assert_eq!(session.score(), Score { correct: 1, total: 2 });
        assert_eq!(session.score().to_string(), "1 / 2");
    }

    #[test]
    fn empty_quiz_completes_immediately() {
        let mut session = QuizSession::new(AnswerPolicy::default());
        assert_eq!(session.start(Vec::new()), Ok(QuizState::Completed));
        assert_eq!(session.score(), Score { correct: 0, total: 0 });
        assert!(session.current().is_none());
        assert_eq!(session.submit("anything"), Err(QuizError::Completed));
    }

    #[test]
    fn submit_before_start_is_rejected() {
        let mut session = QuizSession::new(AnswerPolicy::default());
        assert_eq!(session.submit("4"), Err(QuizError::NotStarted));
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = QuizSession::started(AnswerPolicy::default(), vec![q("1 + 1", "2")]);
        assert_eq!(session.start(vec![q("x", "y")]), Err(QuizError::AlreadyStarted));
    }

    #[test]
    fn no_submissions_after_completion() {
        let mut session = QuizSession::started(AnswerPolicy::default(), vec![q("1 + 1", "2")]);
        session.submit("2").expect("presenting");
        assert!(session.is_completed());
        assert_eq!(session.submit("2"), Err(QuizError::Completed));
        assert_eq!(session.score(), Score { correct: 1, total: 1 });
    }

    #[test]
    fn answers_are_trimmed() {
        let mut session = QuizSession::started(AnswerPolicy::Exact, vec![q("1 + 1", " 2 ")]);
        assert!(session.submit("  2\n").expect("presenting").correct);
    }

    #[test]
    fn empty_answer_is_a_miss() {
        let mut session = QuizSession::started(AnswerPolicy::default(), vec![q("1 + 1", "2")]);
        assert!(!session.submit("").expect("presenting").correct);
        assert_eq!(session.score().correct, 0);
    }

    #[test]
    fn policy_controls_case_sensitivity() {
        let questions = vec![q("Capital of France", "Paris")];

        let mut exact = QuizSession::started(AnswerPolicy::Exact, questions.clone());
        assert!(!exact.submit("paris").expect("presenting").correct);

        let mut loose = QuizSession::started(AnswerPolicy::IgnoreCase, questions);
        assert!(loose.submit("PARIS").expect("presenting").correct);
    }

    #[test]
    fn score_never_decreases_and_completes_after_len_submissions() {
        let questions: Vec<_> = (0..5).map(|i| q(&format!("q{i}"), &i.to_string())).collect();
        let mut session = QuizSession::started(AnswerPolicy::default(), questions);
        let answers = ["0", "x", "2", "", "4"];
        let mut last = 0;
        for (n, a) in answers.iter().enumerate() {
            assert!(!session.is_completed(), "completed early at {n}");
            session.submit(a).expect("presenting");
            let now = session.score().correct;
            assert!(now >= last);
            assert!(now <= session.score().total);
            last = now;
        }
        assert!(session.is_completed());
        assert_eq!(session.score(), Score { correct: 3, total: 5 });
    }

    #[test]
    fn policy_parses_from_str() {
        assert_eq!("exact".parse::<AnswerPolicy>(), Ok(AnswerPolicy::Exact));
        assert_eq!("Ignore-Case".parse::<AnswerPolicy>(), Ok(AnswerPolicy::IgnoreCase));
        assert!("fuzzy".parse::<AnswerPolicy>().is_err());
    }
}
