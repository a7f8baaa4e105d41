use crate::observation::{ObservationError, TextEmotionClassifier};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Lexicon-based text emotion classifier, used when no model is wired in.
///
/// Checks emotions in a fixed order and returns the first one with a
/// keyword hit; "neutral" otherwise.
pub struct KeywordTextEmotionClassifier;

const LEXICON: &[(&str, &[&str])] = &[
    ("joy", &["happy", "joy", "excited", "glad", "great", "love"]),
    ("sadness", &["sad", "depressed", "unhappy", "tired", "lonely"]),
    ("anger", &["angry", "mad", "furious", "annoyed", "hate"]),
    ("fear", &["scared", "afraid", "fear", "nervous", "worried"]),
    ("disgust", &["disgust", "disgusting", "gross"]),
    ("surprise", &["surprise", "surprised", "amazing", "wow"]),
];

impl KeywordTextEmotionClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> &'static str {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .collect();

        LEXICON
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| words.contains(k)))
            .map(|(label, _)| *label)
            .unwrap_or("neutral")
    }
}

impl Default for KeywordTextEmotionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEmotionClassifier for KeywordTextEmotionClassifier {
    fn classify_text(&self, text: String) -> BoxFuture<'_, Result<String, ObservationError>> {
        async move { Ok(self.classify(&text).to_owned()) }.boxed()
    }
}
