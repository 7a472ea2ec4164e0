use std::collections::HashMap;
use std::fs;
use std::time::{Duration, Instant};

use sightright::exit::ExitStatus;
use sightright::session::batch::{BatchError, select_batch};
use sightright::session::drill::{Control, Session, SessionState};
use sightright::session::input::InputEvent;
use sightright::store::import::import_csv_file;
use sightright::store::phrase_store::PhraseStore;
use sightright::store::schema::{Phrase, PhraseId, ResponseStatus, SampledBatch};
use tempfile::TempDir;

const SPLASH: Duration = Duration::from_millis(70);

fn store_on_disk(dir: &TempDir) -> PhraseStore {
    PhraseStore::open(&dir.path().join("SightRight.db")).unwrap()
}

fn ordered(batch: SampledBatch, order: &[&str]) -> SampledBatch {
    let mut by_text: HashMap<String, Phrase> = batch
        .phrases
        .into_iter()
        .map(|p| (p.text.clone(), p))
        .collect();
    SampledBatch {
        batch_id: batch.batch_id,
        phrases: order.iter().map(|t| by_text.remove(*t).unwrap()).collect(),
    }
}

/// Feed one answer for the current phrase and let the splash run out.
fn answer(session: &mut Session, store: &mut PhraseStore, key: InputEvent, at: Instant) -> Instant {
    assert_eq!(session.state(), SessionState::AcceptInput);
    assert_eq!(session.step(&[key], at, store), Control::Continue);
    let after = at + SPLASH;
    session.step(&[], after, store);
    after
}

#[test]
fn cat_dog_sun_round_is_scored_and_logged() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("words.csv");
    fs::write(&csv, "phrase,list\ncat,animals\ndog,animals\nsun,sky\n").unwrap();

    let mut store = store_on_disk(&dir);
    let summary = import_csv_file(&mut store, &csv).unwrap();
    assert_eq!(summary.added, 3);

    let batch = select_batch(&mut store, 30).unwrap();
    let ids: HashMap<String, PhraseId> = batch
        .phrases
        .iter()
        .map(|p| (p.text.clone(), p.id))
        .collect();
    let batch = ordered(batch, &["cat", "dog", "sun"]);
    let batch_id = batch.batch_id;

    let mut session = Session::new(batch, SPLASH);
    let t0 = Instant::now();
    session.step(&[InputEvent::Other], t0, &mut store);

    let t = answer(&mut session, &mut store, InputEvent::Up, t0 + Duration::from_millis(500));
    let t = answer(&mut session, &mut store, InputEvent::Down, t + Duration::from_millis(900));
    answer(&mut session, &mut store, InputEvent::Right, t + Duration::from_millis(300));

    assert_eq!(session.state(), SessionState::BatchEnd);
    assert_eq!(session.score(), 1);
    assert_eq!(session.attempts(), 2);
    assert_eq!(session.view().score_text, "Score: 1 (50%)");

    let records = store.responses_for_batch(batch_id).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].phrase_id, ids["cat"]);
    assert_eq!(records[0].status, ResponseStatus::Correct);
    assert_eq!(records[0].response_time_ms, 500);
    assert_eq!(records[1].phrase_id, ids["dog"]);
    assert_eq!(records[1].status, ResponseStatus::Incorrect);
    assert_eq!(records[1].response_time_ms, 900);
    assert!(records.iter().all(|r| r.phrase_id != ids["sun"]));
}

#[test]
fn empty_bank_stops_before_any_session() {
    let dir = TempDir::new().unwrap();
    let mut store = store_on_disk(&dir);

    let err = select_batch(&mut store, 30).unwrap_err();
    assert!(matches!(err, BatchError::EmptyBank));
    assert_eq!(ExitStatus::from(&err), ExitStatus::EmptyPhraseBank);
    assert_ne!(ExitStatus::from(&err).code(), ExitStatus::StorageUnavailable.code());
}

#[test]
fn quitting_mid_phrase_leaves_no_record() {
    let dir = TempDir::new().unwrap();
    let mut store = store_on_disk(&dir);
    store.add_phrase("the", "dolch").unwrap();
    store.add_phrase("and", "dolch").unwrap();

    let batch = select_batch(&mut store, 30).unwrap();
    let batch_id = batch.batch_id;
    let mut session = Session::new(batch, SPLASH);
    let t0 = Instant::now();
    session.step(&[InputEvent::Other], t0, &mut store);
    assert_eq!(session.state(), SessionState::AcceptInput);

    let control = session.step(&[InputEvent::Char('q')], t0 + Duration::from_secs(3), &mut store);
    assert_eq!(control, Control::Quit);
    assert!(store.responses_for_batch(batch_id).unwrap().is_empty());
    assert_eq!(ExitStatus::Clean.code(), 0);
}

#[test]
fn batches_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let first = {
        let mut store = store_on_disk(&dir);
        store.add_phrase("said", "dolch").unwrap();
        select_batch(&mut store, 5).unwrap().batch_id
    };

    let mut store = store_on_disk(&dir);
    let second = select_batch(&mut store, 5).unwrap().batch_id;
    assert!(second > first);
}

#[test]
fn disabled_phrases_drop_out_of_later_rounds() {
    let dir = TempDir::new().unwrap();
    let mut store = store_on_disk(&dir);
    let keep = store.add_phrase("can't", "contractions").unwrap();
    let drop = store.add_phrase(r#"the "end""#, "quotes").unwrap();

    store.disable_phrase(drop).unwrap();
    for _ in 0..10 {
        let batch = select_batch(&mut store, 10).unwrap();
        assert_eq!(batch.phrases.len(), 1);
        assert_eq!(batch.phrases[0].id, keep);
        assert_eq!(batch.phrases[0].text, "can't");
    }

    store.delete_phrase(drop).unwrap();
    let listed: Vec<String> = store
        .list_all_phrases()
        .unwrap()
        .into_iter()
        .map(|p| p.text)
        .collect();
    assert_eq!(listed, vec!["can't"]);
}
