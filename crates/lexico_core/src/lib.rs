//! Core domain logic for lexico, a personal vocabulary manager.
//! This crate owns storage, configuration and first-run setup; the CLI
//! crate only wires terminal I/O to it.

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod dictionary;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use bootstrap::{
    current_stage, ApiKeyPrompt, BootstrapError, BootstrapReport, BootstrapStage, Bootstrapper,
    KeyStep,
};
pub use config::{AppConfig, AppPaths, ConfigError, ConfigResult, ConfigStore};
pub use dictionary::{Definition, DictionaryClient, LookupError, WordData, WordnikClient};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::word::{
    normalize_word, Annotation, NewWord, Word, WordEntry, WordId, WordValidationError,
    DEFAULT_EXTRA, MEANING, PART_OF_SPEECH, PRONUNCIATION,
};
pub use repo::vocabulary_repo::{
    RepoError, RepoResult, SqliteVocabularyRepository, VocabularyRepository,
};
pub use service::vocabulary_service::VocabularyService;
