//! Remote dictionary lookup.
//!
//! # Responsibility
//! - Define the lookup contract used by the `add` use-case.
//! - Convert lookup results into storable annotations.
//!
//! # Invariants
//! - A successful lookup carries at least one definition.
//! - `annotations()` yields at most one annotation per type.

use crate::config::ConfigError;
use crate::model::word::{Annotation, NewWord, MEANING, PART_OF_SPEECH, PRONUNCIATION};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod wordnik;

pub use wordnik::WordnikClient;

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup tag pattern must compile"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern must compile"));

/// Lookup contract for a remote dictionary service.
pub trait DictionaryClient {
    fn fetch_word(&self, word: &str) -> Result<WordData, LookupError>;
}

/// One sense of a word as returned by the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub part_of_speech: Option<String>,
    pub text: String,
}

/// Dictionary data for one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordData {
    pub word: String,
    pub definitions: Vec<Definition>,
    pub pronunciations: Vec<String>,
}

impl WordData {
    /// Returns the storable annotations: first meaning, its part of speech
    /// and the first pronunciation.
    pub fn annotations(&self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        if let Some(first) = self.definitions.first() {
            annotations.push(Annotation::new(MEANING, first.text.as_str()));
            if let Some(part_of_speech) = first.part_of_speech.as_deref() {
                annotations.push(Annotation::new(PART_OF_SPEECH, part_of_speech));
            }
        }
        if let Some(pronunciation) = self.pronunciations.first() {
            annotations.push(Annotation::new(PRONUNCIATION, pronunciation.as_str()));
        }
        annotations
    }

    pub fn to_new_word(&self) -> NewWord {
        NewWord::new(&self.word, self.annotations())
    }
}

#[derive(Debug)]
pub enum LookupError {
    Config(ConfigError),
    InvalidEndpoint(String),
    Network(reqwest::Error),
    Unauthorized,
    NotFound { word: String },
    Http { status: u16 },
    InvalidResponse(String),
}

impl LookupError {
    /// Message suitable for end users, without transport details.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) if err.needs_init() => {
                "You need to initialize the application. Run `lexico init`.".to_string()
            }
            Self::Config(_) => "Your configuration could not be read. Kindly retry.".to_string(),
            Self::InvalidEndpoint(_) => {
                "The dictionary address in your configuration is not valid.".to_string()
            }
            Self::Network(_) => {
                "Could not reach the dictionary service. Check your connection and retry."
                    .to_string()
            }
            Self::Unauthorized => {
                "The dictionary service rejected your API key. Run `lexico init` with a valid key."
                    .to_string()
            }
            Self::NotFound { word } => format!("No definition found for `{word}`."),
            Self::Http { status } => {
                format!("The dictionary service returned an error (HTTP {status}). Kindly retry.")
            }
            Self::InvalidResponse(_) => {
                "The dictionary service sent an unexpected response. Kindly retry.".to_string()
            }
        }
    }
}

impl Display for LookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::InvalidEndpoint(url) => write!(f, "invalid dictionary endpoint `{url}`"),
            Self::Network(err) => write!(f, "dictionary request failed: {err}"),
            Self::Unauthorized => write!(f, "dictionary service rejected the API key"),
            Self::NotFound { word } => write!(f, "word `{word}` not found"),
            Self::Http { status } => write!(f, "dictionary service returned HTTP {status}"),
            Self::InvalidResponse(message) => {
                write!(f, "invalid dictionary response: {message}")
            }
        }
    }
}

impl Error for LookupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for LookupError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Strips inline markup (`<xref>`, `<em>`, ...) and collapses whitespace.
pub fn clean_text(value: &str) -> String {
    let without_tags = MARKUP_TAG.replace_all(value, "");
    WHITESPACE_RUN
        .replace_all(without_tags.trim(), " ")
        .into_owned()
}
