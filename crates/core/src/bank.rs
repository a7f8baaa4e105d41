use crate::difficulty::DifficultyTier;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

const LOG_TARGET: &str = "bank";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionRecord {
    pub question: String,
    pub answer: String,
    pub difficulty: DifficultyTier,
}

/// Row shape as it appears in the CSV file.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Answers")]
    answers: String,
    #[serde(rename = "Difficulty")]
    difficulty: String,
}

#[derive(thiserror::Error, Debug)]
pub enum BankError {
    #[error("failed to open question bank {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question bank: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unknown difficulty {value:?}")]
    InvalidDifficulty { row: u64, value: String },
}

/// Read-only question bank, loaded once and shared between sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionBank {
    records: Vec<QuestionRecord>,
}

impl QuestionBank {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BankError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let bank = Self::from_reader(file)?;
        tracing::info!(
            target: LOG_TARGET,
            path = %path.display(),
            questions = bank.len(),
            "question bank loaded"
        );
        Ok(bank)
    }

    /// Parses CSV with a `Question,Answers,Difficulty` header. Headers and
    /// fields are trimmed; extra columns are ignored.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, BankError> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw).map_err(csv::Error::from)?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(raw.as_slice());

        let headers = rdr.headers()?.clone();
        let mut records = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record
                .position()
                .map(|pos| record_line(&raw, pos))
                .unwrap_or_default();
            let row: RawRow = record.deserialize(Some(&headers))?;
            let difficulty = row.difficulty.parse::<DifficultyTier>().map_err(|_| {
                BankError::InvalidDifficulty {
                    row: line,
                    value: row.difficulty.clone(),
                }
            })?;
            records.push(QuestionRecord {
                question: row.question,
                answer: row.answers,
                difficulty,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn at_tier(&self, tier: DifficultyTier) -> impl Iterator<Item = &QuestionRecord> {
        self.records.iter().filter(move |r| r.difficulty == tier)
    }

    pub fn count_at_tier(&self, tier: DifficultyTier) -> usize {
        self.at_tier(tier).count()
    }
}

/// The reader stamps a record's position before skipping blank lines, so
/// step over any terminators that sit between that offset and the record.
fn record_line(raw: &[u8], pos: &csv::Position) -> u64 {
    let start = usize::try_from(pos.byte()).map_or(raw.len(), |b| b.min(raw.len()));
    let skipped = raw[start..]
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .filter(|b| **b == b'\n')
        .count();
    pos.line() + skipped as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Question,Answers,Difficulty
What is 2 + 2?,4,Easy
What is 12 * 12?,144,Medium
What is 17 * 23?,391,Hard
What is 3 + 5?,8,easy
";

    #[test]
    fn parses_rows_and_difficulty() {
        let bank = QuestionBank::from_reader(SAMPLE.as_bytes()).expect("valid csv");
        assert_eq!(bank.len(), 4);
        assert_eq!(bank.records()[0].question, "What is 2 + 2?");
        assert_eq!(bank.records()[0].answer, "4");
        assert_eq!(bank.count_at_tier(DifficultyTier::Easy), 2);
        assert_eq!(bank.count_at_tier(DifficultyTier::Medium), 1);
        assert_eq!(bank.count_at_tier(DifficultyTier::Hard), 1);
    }

    #[test]
    fn trims_headers_and_fields() {
        let csv = " Question , Answers ,Difficulty \n  What is 9 - 3? ,  6 , Hard \n";
        let bank = QuestionBank::from_reader(csv.as_bytes()).expect("valid csv");
        assert_eq!(
            bank.records(),
            &[QuestionRecord {
                question: "What is 9 - 3?".to_owned(),
                answer: "6".to_owned(),
                difficulty: DifficultyTier::Hard,
            }]
        );
    }

    #[test]
    fn ignores_extra_columns() {
        let csv = "Id,Question,Answers,Difficulty\n1,What is 1 + 1?,2,Easy\n";
        let bank = QuestionBank::from_reader(csv.as_bytes()).expect("valid csv");
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn unknown_difficulty_names_the_row() {
        let csv = "Question,Answers,Difficulty\nq1,1,Easy\nq2,2,Expert\n";
        let err = QuestionBank::from_reader(csv.as_bytes()).unwrap_err();
        match err {
            BankError::InvalidDifficulty { row, value } => {
                assert_eq!(row, 3);
                assert_eq!(value, "Expert");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_row_counts_blank_lines() {
        let csv = "Question,Answers,Difficulty\n\nq1,1,Easy\nq2,2,Expert\n";
        match QuestionBank::from_reader(csv.as_bytes()).unwrap_err() {
            BankError::InvalidDifficulty { row, .. } => assert_eq!(row, 4),
            other => panic!("unexpected error: {other}"),
        }

        let csv = "Question,Answers,Difficulty\nq1,1,Easy\n\n\nq2,2,Expert\n";
        match QuestionBank::from_reader(csv.as_bytes()).unwrap_err() {
            BankError::InvalidDifficulty { row, .. } => assert_eq!(row, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn error_row_counts_multiline_fields() {
        let csv = "Question,Answers,Difficulty\n\nq1,1,Easy\n\"multi\nline\",2,Easy\nq3,3,Expert\n";
        match QuestionBank::from_reader(csv.as_bytes()).unwrap_err() {
            BankError::InvalidDifficulty { row, value } => {
                assert_eq!(row, 6);
                assert_eq!(value, "Expert");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_column_is_an_error() {
        let csv = "Question,Difficulty\nq1,Easy\n";
        assert!(matches!(
            QuestionBank::from_reader(csv.as_bytes()),
            Err(BankError::Csv(_))
        ));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = QuestionBank::load("/nonexistent/questions.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/questions.csv"));
    }
}
