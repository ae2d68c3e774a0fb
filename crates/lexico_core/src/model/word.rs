//! Word and annotation domain model.
//!
//! # Responsibility
//! - Define the records persisted by the vocabulary store.
//! - Normalize and validate user-provided words before persistence.
//!
//! # Invariants
//! - Stored word text is trimmed and lowercased.
//! - A word carries at most one annotation per annotation type.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned integer identifier of a word row.
pub type WordId = i64;

/// Annotation type holding the primary definition.
pub const MEANING: &str = "meaning";
/// Annotation type holding the pronunciation string.
pub const PRONUNCIATION: &str = "pronunciation";
/// Annotation type holding the part of speech of the first definition.
pub const PART_OF_SPEECH: &str = "part_of_speech";

/// Annotation type shown by `view` when none is requested.
pub const DEFAULT_EXTRA: &str = MEANING;

/// A persisted lexical entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub text: String,
}

/// A typed piece of information about a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Serialized as `type` to match the storage column name.
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl Annotation {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            text: text.into(),
        }
    }
}

/// Write model for saving a word together with its annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWord {
    pub text: String,
    pub annotations: Vec<Annotation>,
}

impl NewWord {
    /// Creates a write model with normalized word text.
    pub fn new(text: &str, annotations: Vec<Annotation>) -> Self {
        Self {
            text: normalize_word(text),
            annotations,
        }
    }

    /// Checks that the record can be persisted.
    pub fn validate(&self) -> Result<(), WordValidationError> {
        if self.text.is_empty() {
            return Err(WordValidationError::EmptyWord);
        }
        if self.text != normalize_word(&self.text) {
            return Err(WordValidationError::NotNormalized);
        }
        if self.annotations.iter().any(|annotation| annotation.kind.trim().is_empty()) {
            return Err(WordValidationError::EmptyAnnotationType);
        }
        Ok(())
    }
}

/// One row of the word listing: a word plus its requested decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub word: Word,
    /// `None` when the word has no annotation of the requested type.
    pub decoration: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordValidationError {
    EmptyWord,
    NotNormalized,
    EmptyAnnotationType,
}

impl Display for WordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWord => write!(f, "word text cannot be empty"),
            Self::NotNormalized => write!(f, "word text must be trimmed and lowercase"),
            Self::EmptyAnnotationType => write!(f, "annotation type cannot be empty"),
        }
    }
}

impl Error for WordValidationError {}

/// Normalizes one word according to storage rules.
pub fn normalize_word(text: &str) -> String {
    text.trim().to_lowercase()
}
