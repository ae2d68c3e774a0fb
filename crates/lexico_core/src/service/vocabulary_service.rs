//! Vocabulary use-case service.
//!
//! # Responsibility
//! - Persist dictionary lookups as words with annotations.
//! - Serve the listing and single-word views.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::dictionary::WordData;
use crate::model::word::{Annotation, Word, WordEntry, WordId, DEFAULT_EXTRA};
use crate::repo::vocabulary_repo::{RepoResult, VocabularyRepository};

/// Use-case service wrapper for vocabulary operations.
pub struct VocabularyService<R: VocabularyRepository> {
    repo: R,
}

impl<R: VocabularyRepository> VocabularyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves the storable part of a dictionary lookup.
    ///
    /// # Contract
    /// - Word text is normalized before storage.
    /// - Saving the same word again refreshes its annotations and keeps its id.
    pub fn save_lookup(&mut self, data: &WordData) -> RepoResult<WordId> {
        self.repo.save_word(&data.to_new_word())
    }

    /// Lists all words decorated with the `extra` annotation type.
    ///
    /// A blank `extra` falls back to `meaning`.
    pub fn list_words(&self, extra: &str) -> RepoResult<Vec<WordEntry>> {
        let extra = match extra.trim() {
            "" => DEFAULT_EXTRA,
            value => value,
        };
        self.repo.list_words(extra)
    }

    /// Returns one stored word with all its annotations.
    pub fn describe_word(&self, text: &str) -> RepoResult<Option<(Word, Vec<Annotation>)>> {
        let Some(word) = self.repo.find_word(text)? else {
            return Ok(None);
        };
        let annotations = self.repo.annotations(word.id)?;
        Ok(Some((word, annotations)))
    }
}
