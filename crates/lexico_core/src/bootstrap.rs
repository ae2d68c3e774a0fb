//! First-run setup of the lexico data directory.
//!
//! # Responsibility
//! - Bring the on-disk layout from `Uninitialized` to `Ready` in linear steps.
//! - Report which step failed so the caller can pick an exit status.
//!
//! # Invariants
//! - Every step checks presence first; rerunning on a `Ready` layout changes
//!   nothing on disk.
//! - A failed credential step does not stop the sequence.
//! - Directory, config file and database failures stop the sequence.

use crate::config::{AppPaths, ConfigError, ConfigStore};
use crate::db::{database_exists, initialize_db, DbError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Setup progress, in the order steps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootstrapStage {
    Uninitialized,
    DirectoryReady,
    KeyReady,
    Ready,
}

/// Collaborator that asks the user for a dictionary API key.
pub trait ApiKeyPrompt {
    fn request_api_key(&mut self) -> io::Result<String>;
}

/// Outcome of the credential step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStep {
    AlreadyPresent,
    Saved,
    NotSaved { reason: String },
}

/// What one bootstrap run changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub created_directory: bool,
    pub created_config: bool,
    pub key: KeyStep,
    pub initialized_database: bool,
}

impl BootstrapReport {
    /// Returns whether the run left nothing to do on disk.
    pub fn was_noop(&self) -> bool {
        !self.created_directory
            && !self.created_config
            && self.key == KeyStep::AlreadyPresent
            && !self.initialized_database
    }
}

#[derive(Debug)]
pub enum BootstrapError {
    CreateDirectory { path: PathBuf, source: io::Error },
    CreateConfig(ConfigError),
    InitializeDatabase { path: PathBuf, source: DbError },
}

impl BootstrapError {
    /// Last stage successfully reached before the failure.
    pub fn reached_stage(&self) -> BootstrapStage {
        match self {
            Self::CreateDirectory { .. } | Self::CreateConfig(_) => BootstrapStage::Uninitialized,
            Self::InitializeDatabase { .. } => BootstrapStage::KeyReady,
        }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateDirectory { path, source } => write!(
                f,
                "cannot create application directory `{}`: {source}",
                path.display()
            ),
            Self::CreateConfig(err) => write!(f, "cannot create configuration file: {err}"),
            Self::InitializeDatabase { path, source } => write!(
                f,
                "cannot initialize vocabulary database `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            Self::CreateConfig(err) => Some(err),
            Self::InitializeDatabase { source, .. } => Some(source),
        }
    }
}

/// Reports how far setup has progressed on disk.
pub fn current_stage(paths: &AppPaths) -> BootstrapStage {
    let config = ConfigStore::new(paths);
    if !paths.base_dir().is_dir() || !config.exists() {
        return BootstrapStage::Uninitialized;
    }
    if !config.has_api_key() {
        return BootstrapStage::DirectoryReady;
    }
    if !database_exists(paths.db_file()) {
        return BootstrapStage::KeyReady;
    }
    BootstrapStage::Ready
}

/// Runs the idempotent setup sequence against one data directory.
pub struct Bootstrapper<'a> {
    paths: &'a AppPaths,
    config: ConfigStore,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(paths: &'a AppPaths) -> Self {
        Self {
            paths,
            config: ConfigStore::new(paths),
        }
    }

    pub fn run(&self, prompt: &mut dyn ApiKeyPrompt) -> Result<BootstrapReport, BootstrapError> {
        info!(
            "event=bootstrap module=bootstrap status=start base_dir={}",
            self.paths.base_dir().display()
        );

        let result = self.run_steps(prompt);
        match &result {
            Ok(report) => info!(
                "event=bootstrap module=bootstrap status=ok created_directory={} created_config={} key={:?} initialized_database={}",
                report.created_directory,
                report.created_config,
                report.key,
                report.initialized_database
            ),
            Err(err) => error!(
                "event=bootstrap module=bootstrap status=error stage={:?} error={}",
                err.reached_stage(),
                err
            ),
        }
        result
    }

    fn run_steps(&self, prompt: &mut dyn ApiKeyPrompt) -> Result<BootstrapReport, BootstrapError> {
        let (created_directory, created_config) = self.ensure_directory()?;
        let key = self.ensure_api_key(prompt);
        let initialized_database = self.ensure_database()?;

        Ok(BootstrapReport {
            created_directory,
            created_config,
            key,
            initialized_database,
        })
    }

    fn ensure_directory(&self) -> Result<(bool, bool), BootstrapError> {
        let base_dir = self.paths.base_dir();
        let created_directory = !base_dir.is_dir();
        if created_directory {
            fs::create_dir_all(base_dir).map_err(|source| BootstrapError::CreateDirectory {
                path: base_dir.to_path_buf(),
                source,
            })?;
        }

        let created_config = self
            .config
            .ensure_exists()
            .map_err(BootstrapError::CreateConfig)?;
        Ok((created_directory, created_config))
    }

    fn ensure_api_key(&self, prompt: &mut dyn ApiKeyPrompt) -> KeyStep {
        if self.config.has_api_key() {
            return KeyStep::AlreadyPresent;
        }

        let key = match prompt.request_api_key() {
            Ok(key) => key,
            Err(err) => {
                warn!("event=api_key_prompt module=bootstrap status=error error={err}");
                return KeyStep::NotSaved {
                    reason: err.to_string(),
                };
            }
        };

        match self.config.save_api_key(&key) {
            Ok(()) => KeyStep::Saved,
            Err(err) => KeyStep::NotSaved {
                reason: err.to_string(),
            },
        }
    }

    fn ensure_database(&self) -> Result<bool, BootstrapError> {
        let db_file = self.paths.db_file();
        if database_exists(&db_file) {
            return Ok(false);
        }

        initialize_db(&db_file).map_err(|source| BootstrapError::InitializeDatabase {
            path: db_file,
            source,
        })?;
        Ok(true)
    }
}
