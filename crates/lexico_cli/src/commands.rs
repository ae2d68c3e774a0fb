//! Command handlers behind the `lexico` subcommands.
//!
//! # Responsibility
//! - Map core results to user messages and process exit codes.
//!
//! # Invariants
//! - Only bootstrap failures during `init` produce a non-zero exit code.
//! - Missing configuration or database prints the `lexico init` hint and
//!   exits with 0.

use crate::terminal::Terminal;
use lexico_core::db::open_existing_db;
use lexico_core::render::{render_annotations, render_word, render_word_table};
use lexico_core::{
    normalize_word, ApiKeyPrompt, AppConfig, AppPaths, BootstrapError, Bootstrapper, ConfigStore,
    DictionaryClient, KeyStep, LookupError, RepoResult, SqliteVocabularyRepository,
    VocabularyService, WordData, DEFAULT_EXTRA,
};
use log::{error, info};
use std::io;

pub const EXIT_OK: u8 = 0;

const SIGNUP_HINT: &str = "In order to fetch information, this service requires you to provide \
a Wordnik API key.\nVisit http://www.wordnik.com/signup to sign up.";

/// Runs first-time setup.
pub fn init(paths: &AppPaths, term: &mut dyn Terminal) -> u8 {
    let result = {
        let mut prompt = TerminalKeyPrompt { term: &mut *term };
        Bootstrapper::new(paths).run(&mut prompt)
    };

    match result {
        Ok(report) => {
            match &report.key {
                KeyStep::Saved => term.say("Your API key has been saved successfully.\n"),
                KeyStep::NotSaved { .. } => {
                    term.say("There is some issue with saving your API key. Kindly retry.")
                }
                KeyStep::AlreadyPresent => {}
            }
            term.say(
                "Your personal dictionary has been initialised.\n\
                 In order to learn how to use it, try:\n\n$ lexico --help\n",
            );
            EXIT_OK
        }
        Err(err) => {
            match &err {
                BootstrapError::InitializeDatabase { .. } => term.say(
                    "There is some issue with initializing your dictionary. Kindly retry.",
                ),
                other => term.say(&format!("{other}. Kindly retry.")),
            }
            err.exit_code()
        }
    }
}

/// Looks up a word, saves it and shows its definition.
pub fn add<C, F>(paths: &AppPaths, word: Option<String>, term: &mut dyn Terminal, connect: F) -> u8
where
    C: DictionaryClient,
    F: FnOnce(&AppConfig) -> Result<C, LookupError>,
{
    let word = match word {
        Some(word) => word,
        None => match term.prompt("Enter the word") {
            Ok(word) => word,
            Err(err) => {
                term.say(&format!("Could not read the word: {err}"));
                return EXIT_OK;
            }
        },
    };
    let word = normalize_word(&word);
    if word.is_empty() {
        term.say("Please provide a word to look up.");
        return EXIT_OK;
    }

    let config = match ConfigStore::new(paths).load() {
        Ok(config) => config,
        Err(err) => {
            report_lookup_error(term, &LookupError::Config(err));
            return EXIT_OK;
        }
    };

    let data = match connect(&config).and_then(|client| client.fetch_word(&word)) {
        Ok(data) => data,
        Err(err) => {
            report_lookup_error(term, &err);
            return EXIT_OK;
        }
    };

    save_lookup(paths, &data, term);
    term.show_paged(&render_word(&data));
    EXIT_OK
}

/// Lists saved words with one extra annotation column.
pub fn view(paths: &AppPaths, extra: &str, term: &mut dyn Terminal) -> u8 {
    let extra = match extra.trim() {
        "" => DEFAULT_EXTRA,
        value => value,
    };

    match with_vocabulary(paths, |service| service.list_words(extra)) {
        Ok(entries) => term.show_paged(&render_word_table(&entries, extra)),
        Err(err) if err.is_not_initialized() => say_init_required(term),
        Err(err) => {
            error!("event=word_list module=cli status=error error={err}");
            term.say("There is some issue with reading your dictionary. Kindly retry.");
        }
    }
    EXIT_OK
}

/// Shows everything saved about one word.
pub fn show(paths: &AppPaths, word: &str, term: &mut dyn Terminal) -> u8 {
    match with_vocabulary(paths, |service| service.describe_word(word)) {
        Ok(Some((word, annotations))) => {
            term.show_paged(&render_annotations(&word.text, &annotations))
        }
        Ok(None) => term.say(&format!(
            "`{}` is not in your dictionary. Add it with `lexico add`.",
            normalize_word(word)
        )),
        Err(err) if err.is_not_initialized() => say_init_required(term),
        Err(err) => {
            error!("event=word_show module=cli status=error error={err}");
            term.say("There is some issue with reading your dictionary. Kindly retry.");
        }
    }
    EXIT_OK
}

struct TerminalKeyPrompt<'a> {
    term: &'a mut dyn Terminal,
}

impl ApiKeyPrompt for TerminalKeyPrompt<'_> {
    fn request_api_key(&mut self) -> io::Result<String> {
        self.term.say(SIGNUP_HINT);
        let key = self.term.prompt("Enter your Wordnik API key")?;
        Ok(key.trim().to_string())
    }
}

fn with_vocabulary<T>(
    paths: &AppPaths,
    op: impl FnOnce(&mut VocabularyService<SqliteVocabularyRepository<'_>>) -> RepoResult<T>,
) -> RepoResult<T> {
    let mut conn = open_existing_db(paths.db_file())?;
    let repo = SqliteVocabularyRepository::try_new(&mut conn)?;
    let mut service = VocabularyService::new(repo);
    op(&mut service)
}

fn save_lookup(paths: &AppPaths, data: &WordData, term: &mut dyn Terminal) {
    match with_vocabulary(paths, |service| service.save_lookup(data)) {
        Ok(word_id) => info!("event=word_add module=cli status=ok word_id={word_id}"),
        Err(err) if err.is_not_initialized() => {
            term.say("This word was not saved because your dictionary is not set up.");
            say_init_required(term);
        }
        Err(err) => {
            error!("event=word_add module=cli status=error error={err}");
            term.say("There is some issue with saving this word. Kindly retry.");
        }
    }
}

fn report_lookup_error(term: &mut dyn Terminal, err: &LookupError) {
    info!("event=word_add module=cli status=error error={err}");
    match err {
        LookupError::Config(config_err) if config_err.needs_init() => say_init_required(term),
        other => term.say(&other.user_message()),
    }
}

fn say_init_required(term: &mut dyn Terminal) {
    term.say("You need to initialize the application.");
    term.say("Run:\n\t\t $ lexico init");
}
