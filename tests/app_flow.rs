//! End-to-end flows through App with a stubbed text source, plus the
//! file-backed record store against a temp directory.

use std::cell::RefCell;
use std::rc::Rc;

use labtype::app::{App, AppScreen};
use labtype::config::Config;
use labtype::session::Phase;
use labtype::session::rank::Rank;
use labtype::source::{SourceError, TextSource};
use labtype::store::best::{BestRecord, JsonRecordStore, MemoryRecordStore, RecordStore};

struct StubSource {
    files: Vec<(&'static str, &'static str)>,
    fail_list: bool,
}

impl StubSource {
    fn with_files(files: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            files,
            fail_list: false,
        }
    }

    fn offline() -> Self {
        Self {
            files: Vec::new(),
            fail_list: true,
        }
    }
}

impl TextSource for StubSource {
    fn list_candidates(&mut self) -> Result<Vec<String>, SourceError> {
        if self.fail_list {
            return Err(SourceError::Network("connection refused".to_string()));
        }
        Ok(self.files.iter().map(|(path, _)| path.to_string()).collect())
    }

    fn fetch_content(&mut self, identifier: &str) -> Result<String, SourceError> {
        self.files
            .iter()
            .find(|(path, _)| *path == identifier)
            .map(|(_, content)| content.to_string())
            .ok_or_else(|| SourceError::NotFound(identifier.to_string()))
    }
}

/// Record store that logs every write so tests can assert the best-score
/// update fires exactly once per finished run.
struct CountingStore {
    inner: MemoryRecordStore,
    writes: Rc<RefCell<Vec<(String, BestRecord)>>>,
}

impl RecordStore for CountingStore {
    fn get(&self, key: &str) -> Option<BestRecord> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, record: BestRecord) {
        self.writes.borrow_mut().push((key.to_string(), record));
        self.inner.set(key, record);
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.countdown_secs = 60;
    config.validate();
    config
}

fn app_with(
    files: Vec<(&'static str, &'static str)>,
) -> (App, Rc<RefCell<Vec<(String, BestRecord)>>>) {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let store = CountingStore {
        inner: MemoryRecordStore::new(),
        writes: Rc::clone(&writes),
    };
    let app = App::new(
        test_config(),
        Box::new(StubSource::with_files(files)),
        Box::new(store),
    );
    (app, writes)
}

#[test]
fn picking_a_file_loads_it_into_a_session() {
    let (mut app, _) = app_with(vec![("lab01/a.cpp", "int x;"), ("lab02/b.cpp", "int y;")]);
    assert_eq!(app.screen, AppScreen::Picker);
    assert_eq!(app.candidates.len(), 2);

    app.picker_down();
    app.select_current();

    assert_eq!(app.screen, AppScreen::Typing);
    assert_eq!(app.session.identifier(), Some("lab02/b.cpp"));
    assert_eq!(app.session.reference().iter().collect::<String>(), "int y;");
}

#[test]
fn finishing_a_run_records_the_best_exactly_once() {
    let (mut app, writes) = app_with(vec![("a.cpp", "abc")]);
    app.select_current();

    for ch in "abc".chars() {
        app.type_char(ch);
    }
    assert_eq!(app.session.phase(), Phase::Running);

    app.finish();
    assert_eq!(app.screen, AppScreen::Result);
    assert_eq!(writes.borrow().len(), 1);
    assert_eq!(writes.borrow()[0].0, "a.cpp");

    let outcome = app.outcome.as_ref().unwrap();
    assert!(outcome.new_best);
    assert_eq!(outcome.stats.correct, 3);

    // A second finish is a no-op all the way down.
    app.finish();
    assert_eq!(writes.borrow().len(), 1);
    assert_eq!(app.screen, AppScreen::Result);
}

#[test]
fn a_worse_retry_does_not_touch_the_stored_best() {
    let (mut app, writes) = app_with(vec![("a.cpp", "abcdef")]);
    app.select_current();

    for ch in "abcdef".chars() {
        app.type_char(ch);
    }
    app.finish();
    let first_best = app.outcome.as_ref().unwrap().best;
    assert_eq!(writes.borrow().len(), 1);

    app.retry();
    assert_eq!(app.screen, AppScreen::Typing);
    assert_eq!(app.session.phase(), Phase::Idle);

    // All wrong this time: zero net WPM cannot dominate the stored record.
    for ch in "XXXXXX".chars() {
        app.type_char(ch);
    }
    app.finish();

    let outcome = app.outcome.as_ref().unwrap();
    assert!(!outcome.new_best);
    assert_eq!(outcome.best, first_best);
    assert_eq!(writes.borrow().len(), 1);
}

#[test]
fn countdown_expiry_finishes_and_records_the_run() {
    let (mut app, writes) = app_with(vec![("a.cpp", "abc")]);
    app.select_current();
    app.type_char('a');

    // Drive the session clock past the countdown, then deliver a tick.
    app.session.tick_at(60.0);
    app.tick();

    assert_eq!(app.screen, AppScreen::Result);
    assert_eq!(writes.borrow().len(), 1);
    let outcome = app.outcome.as_ref().unwrap();
    assert!((outcome.elapsed_secs - 60.0).abs() < 1e-9);
    // 1 correct char over a full minute is nowhere near the top tiers.
    assert_eq!(outcome.rank, Rank::Turtle);
}

#[test]
fn abandoning_to_the_picker_clears_the_reference() {
    let (mut app, _) = app_with(vec![("a.cpp", "abc")]);
    app.select_current();
    app.type_char('a');
    app.finish();

    app.back_to_picker();
    assert_eq!(app.screen, AppScreen::Picker);
    assert!(app.session.identifier().is_none());
    assert!(app.session.reference().is_empty());
    assert!(app.outcome.is_none());
}

#[test]
fn failed_listing_puts_the_picker_into_an_error_state() {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let store = CountingStore {
        inner: MemoryRecordStore::new(),
        writes: Rc::clone(&writes),
    };
    let mut app = App::new(
        test_config(),
        Box::new(StubSource::offline()),
        Box::new(store),
    );

    assert!(app.candidates.is_empty());
    let error = app.picker_error.clone().unwrap();
    assert!(error.contains("network"), "unexpected message: {error}");

    // File-dependent actions are disabled while the list is unavailable.
    app.select_current();
    app.select_random();
    assert_eq!(app.screen, AppScreen::Picker);
    assert_eq!(app.session.phase(), Phase::Idle);
}

#[test]
fn fetch_failure_stays_on_the_picker_with_a_message() {
    let (mut app, _) = app_with(vec![("a.cpp", "int x;")]);
    // The stub only knows a.cpp; force an unknown selection.
    app.candidates.push("ghost.cpp".to_string());
    app.picker_down();
    app.select_current();

    assert_eq!(app.screen, AppScreen::Picker);
    assert!(app.picker_error.as_ref().unwrap().contains("ghost.cpp"));
}

#[test]
fn best_records_survive_an_app_restart() {
    let dir = tempfile::TempDir::new().unwrap();

    let files = vec![("a.cpp", "abc")];
    {
        let store = JsonRecordStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = App::new(
            test_config(),
            Box::new(StubSource::with_files(files.clone())),
            Box::new(store),
        );
        app.select_current();
        for ch in "abc".chars() {
            app.type_char(ch);
        }
        app.finish();
        assert!(app.outcome.as_ref().unwrap().new_best);
    }

    // Fresh app over the same store dir: an identical run is not a new best
    // unless it is strictly faster.
    let store = JsonRecordStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let previous = store.get("a.cpp").unwrap();
    assert_eq!(previous.acc, 100.0);

    let mut app = App::new(
        test_config(),
        Box::new(StubSource::with_files(files)),
        Box::new(store),
    );
    app.select_current();
    app.type_char('X');
    app.finish();
    let outcome = app.outcome.as_ref().unwrap();
    assert!(!outcome.new_best);
    assert_eq!(outcome.best, previous);
}
