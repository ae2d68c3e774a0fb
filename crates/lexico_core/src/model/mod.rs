//! Vocabulary domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by storage, lookup and display.
//!
//! # Invariants
//! - Every stored word is identified by a store-assigned `WordId`.
//! - Annotations are keyed by `(word_id, type)`.

pub mod word;
