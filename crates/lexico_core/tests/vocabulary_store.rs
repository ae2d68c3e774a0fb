use lexico_core::db::open_db_in_memory;
use lexico_core::{
    Annotation, Definition, NewWord, RepoError, SqliteVocabularyRepository, VocabularyRepository,
    VocabularyService, WordData, WordValidationError, MEANING, PRONUNCIATION,
};
use rusqlite::Connection;

fn meaning(text: &str) -> Vec<Annotation> {
    vec![Annotation::new(MEANING, text)]
}

#[test]
fn save_then_list_returns_requested_decoration() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();

    let id = repo
        .save_word(&NewWord::new("lexicon", meaning("a set of words")))
        .unwrap();

    let entries = repo.list_words(MEANING).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].word.id, id);
    assert_eq!(entries[0].word.text, "lexicon");
    assert_eq!(entries[0].decoration.as_deref(), Some("a set of words"));
}

#[test]
fn missing_annotation_type_yields_empty_decoration() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();
    repo.save_word(&NewWord::new("lexicon", meaning("a set of words")))
        .unwrap();

    let entries = repo.list_words(PRONUNCIATION).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].word.text, "lexicon");
    assert_eq!(entries[0].decoration, None);
}

#[test]
fn list_follows_insertion_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();
    for word in ["zephyr", "apple", "mango"] {
        repo.save_word(&NewWord::new(word, meaning(word))).unwrap();
    }

    let words: Vec<String> = repo
        .list_words(MEANING)
        .unwrap()
        .into_iter()
        .map(|entry| entry.word.text)
        .collect();
    assert_eq!(words, vec!["zephyr", "apple", "mango"]);
}

#[test]
fn saving_same_word_again_updates_annotations_in_place() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();

    let first_id = repo
        .save_word(&NewWord::new("Lexicon", meaning("old")))
        .unwrap();
    repo.save_word(&NewWord::new("ox", meaning("a bovine")))
        .unwrap();
    let second_id = repo
        .save_word(&NewWord::new(
            " lexicon ",
            vec![
                Annotation::new(MEANING, "new"),
                Annotation::new(PRONUNCIATION, "lĕk′sĭ-kŏn′"),
            ],
        ))
        .unwrap();

    assert_eq!(first_id, second_id);
    let entries = repo.list_words(MEANING).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].word.text, "lexicon");
    assert_eq!(entries[0].decoration.as_deref(), Some("new"));

    let annotations = repo.annotations(first_id).unwrap();
    assert_eq!(annotations.len(), 2);
}

#[test]
fn failed_annotation_insert_rolls_back_word() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_boom BEFORE INSERT ON vocabulary_info
         WHEN NEW.text = 'boom'
         BEGIN
             SELECT RAISE(ABORT, 'rejected');
         END;",
    )
    .unwrap();
    let mut repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();

    let err = repo
        .save_word(&NewWord::new(
            "fragile",
            vec![
                Annotation::new(MEANING, "fine"),
                Annotation::new(PRONUNCIATION, "boom"),
            ],
        ))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(repo.list_words(MEANING).unwrap().is_empty());
    assert!(repo.find_word("fragile").unwrap().is_none());
}

#[test]
fn invalid_word_is_rejected_before_sql() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();

    let err = repo.save_word(&NewWord::new("   ", Vec::new())).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(WordValidationError::EmptyWord)
    ));
}

#[test]
fn unnormalized_word_is_rejected_before_sql() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();

    let raw = NewWord {
        text: "Lexicon".to_string(),
        annotations: meaning("a set of words"),
    };
    let err = repo.save_word(&raw).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(WordValidationError::NotNormalized)
    ));
    assert!(repo.list_words(MEANING).unwrap().is_empty());
}

#[test]
fn repository_requires_schema() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteVocabularyRepository::try_new(&mut conn)
        .err()
        .expect("bare connection must be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("vocabulary")));
    assert!(err.is_not_initialized());
}

#[test]
fn service_saves_lookup_and_describes_word() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteVocabularyRepository::try_new(&mut conn).unwrap();
    let mut service = VocabularyService::new(repo);

    let data = WordData {
        word: "Lexicon".to_string(),
        definitions: vec![Definition {
            part_of_speech: Some("noun".to_string()),
            text: "a set of words".to_string(),
        }],
        pronunciations: vec!["lĕk′sĭ-kŏn′".to_string()],
    };
    service.save_lookup(&data).unwrap();

    let listed = service.list_words("  ").unwrap();
    assert_eq!(listed[0].decoration.as_deref(), Some("a set of words"));

    let (word, annotations) = service.describe_word("LEXICON").unwrap().unwrap();
    assert_eq!(word.text, "lexicon");
    let kinds: Vec<&str> = annotations
        .iter()
        .map(|annotation| annotation.kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["meaning", "part_of_speech", "pronunciation"]);

    assert!(service.describe_word("missing").unwrap().is_none());
}
