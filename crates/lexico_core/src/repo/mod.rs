//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `NewWord::validate()` before persistence.
//! - Repository APIs surface every storage failure as a `RepoError` value.

pub mod vocabulary_repo;
