use lexico_core::{
    current_stage, ApiKeyPrompt, AppPaths, BootstrapError, BootstrapStage, Bootstrapper,
    ConfigStore, KeyStep,
};
use std::io;

struct ScriptedPrompt {
    answer: Option<String>,
    calls: usize,
}

impl ScriptedPrompt {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: 0,
        }
    }

    fn failing() -> Self {
        Self {
            answer: None,
            calls: 0,
        }
    }
}

impl ApiKeyPrompt for ScriptedPrompt {
    fn request_api_key(&mut self) -> io::Result<String> {
        self.calls += 1;
        self.answer
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "closed"))
    }
}

fn fresh_paths(root: &tempfile::TempDir) -> AppPaths {
    AppPaths::new(root.path().join(".lexico"))
}

#[test]
fn first_run_reaches_ready() {
    let root = tempfile::tempdir().unwrap();
    let paths = fresh_paths(&root);
    assert_eq!(current_stage(&paths), BootstrapStage::Uninitialized);

    let mut prompt = ScriptedPrompt::answering("k1");
    let report = Bootstrapper::new(&paths).run(&mut prompt).unwrap();

    assert!(report.created_directory);
    assert!(report.created_config);
    assert_eq!(report.key, KeyStep::Saved);
    assert!(report.initialized_database);
    assert_eq!(current_stage(&paths), BootstrapStage::Ready);
    assert_eq!(ConfigStore::new(&paths).load_api_key().unwrap(), "k1");
}

#[test]
fn second_run_is_a_noop_with_identical_state() {
    let root = tempfile::tempdir().unwrap();
    let paths = fresh_paths(&root);

    let mut prompt = ScriptedPrompt::answering("k1");
    Bootstrapper::new(&paths).run(&mut prompt).unwrap();
    let config_before = std::fs::read_to_string(paths.config_file()).unwrap();
    let db_before = std::fs::read(paths.db_file()).unwrap();

    let report = Bootstrapper::new(&paths).run(&mut prompt).unwrap();
    assert!(report.was_noop());
    assert_eq!(prompt.calls, 1);
    assert_eq!(
        std::fs::read_to_string(paths.config_file()).unwrap(),
        config_before
    );
    assert_eq!(std::fs::read(paths.db_file()).unwrap(), db_before);
}

#[test]
fn prompt_failure_is_reported_and_database_still_created() {
    let root = tempfile::tempdir().unwrap();
    let paths = fresh_paths(&root);

    let mut prompt = ScriptedPrompt::failing();
    let report = Bootstrapper::new(&paths).run(&mut prompt).unwrap();

    assert!(matches!(report.key, KeyStep::NotSaved { .. }));
    assert!(report.initialized_database);
    assert_eq!(current_stage(&paths), BootstrapStage::DirectoryReady);

    let mut retry = ScriptedPrompt::answering("k2");
    let report = Bootstrapper::new(&paths).run(&mut retry).unwrap();
    assert_eq!(report.key, KeyStep::Saved);
    assert!(!report.initialized_database);
    assert_eq!(current_stage(&paths), BootstrapStage::Ready);
}

#[test]
fn database_failure_stops_with_exit_code_one() {
    let root = tempfile::tempdir().unwrap();
    let paths = fresh_paths(&root);
    std::fs::create_dir_all(paths.db_file()).unwrap();

    let mut prompt = ScriptedPrompt::answering("k1");
    let err = Bootstrapper::new(&paths).run(&mut prompt).unwrap_err();

    assert!(matches!(err, BootstrapError::InitializeDatabase { .. }));
    assert_eq!(err.reached_stage(), BootstrapStage::KeyReady);
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn directory_failure_is_reported_as_first_stage() {
    let root = tempfile::tempdir().unwrap();
    let blocker = root.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let paths = AppPaths::new(blocker.join(".lexico"));

    let mut prompt = ScriptedPrompt::answering("k1");
    let err = Bootstrapper::new(&paths).run(&mut prompt).unwrap_err();

    assert!(matches!(err, BootstrapError::CreateDirectory { .. }));
    assert_eq!(err.reached_stage(), BootstrapStage::Uninitialized);
    assert_eq!(prompt.calls, 0);
}

#[test]
fn malformed_config_is_repaired_by_rerunning_init() {
    let root = tempfile::tempdir().unwrap();
    let paths = fresh_paths(&root);
    std::fs::create_dir_all(paths.base_dir()).unwrap();
    std::fs::write(paths.config_file(), "{ not json").unwrap();
    assert_eq!(current_stage(&paths), BootstrapStage::DirectoryReady);

    let mut prompt = ScriptedPrompt::answering("k1");
    let report = Bootstrapper::new(&paths).run(&mut prompt).unwrap();

    assert!(!report.created_config);
    assert_eq!(report.key, KeyStep::Saved);
    assert_eq!(prompt.calls, 1);
    assert_eq!(current_stage(&paths), BootstrapStage::Ready);
    assert_eq!(ConfigStore::new(&paths).load_api_key().unwrap(), "k1");
}
