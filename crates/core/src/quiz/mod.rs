mod loader;
mod session;

pub use loader::{load_quiz, load_quiz_with_rng, DEFAULT_MAX_QUESTIONS};
pub use session::{AnswerOutcome, AnswerPolicy, QuizError, QuizSession, QuizState, Score};
