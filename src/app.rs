use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{COUNTDOWN_PRESETS, Config};
use crate::session::rank::Rank;
use crate::session::stats::StatsSnapshot;
use crate::session::{Phase, Session};
use crate::source::TextSource;
use crate::store::best::{BestRecord, RecordStore};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Picker,
    Typing,
    Result,
}

/// Everything the result screen needs about a finished run.
pub struct RunOutcome {
    pub stats: StatsSnapshot,
    pub elapsed_secs: f64,
    pub rank: Rank,
    pub best: BestRecord,
    pub new_best: bool,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub session: Session,
    pub theme: &'static Theme,
    pub candidates: Vec<String>,
    pub picker_selected: usize,
    pub picker_error: Option<String>,
    pub outcome: Option<RunOutcome>,
    pub should_quit: bool,
    source: Box<dyn TextSource>,
    store: Box<dyn RecordStore>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, source: Box<dyn TextSource>, store: Box<dyn RecordStore>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let session = Session::new(config.countdown_secs, config.finish_policy());

        let mut app = Self {
            screen: AppScreen::Picker,
            config,
            session,
            theme,
            candidates: Vec::new(),
            picker_selected: 0,
            picker_error: None,
            outcome: None,
            should_quit: false,
            source,
            store,
            rng: SmallRng::from_entropy(),
        };
        app.refresh_candidates();
        app
    }

    /// Reload the candidate list from the source. A failure leaves the
    /// picker in an error state with file-dependent actions disabled.
    pub fn refresh_candidates(&mut self) {
        match self.source.list_candidates() {
            Ok(paths) if paths.is_empty() => {
                self.candidates.clear();
                self.picker_error = Some(format!(
                    "No {} files found in {}/{}",
                    self.config.file_extension, self.config.repo_owner, self.config.repo_name
                ));
            }
            Ok(paths) => {
                self.candidates = paths;
                self.picker_selected = 0;
                self.picker_error = None;
            }
            Err(e) => {
                self.candidates.clear();
                self.picker_error = Some(e.to_string());
            }
        }
    }

    pub fn picker_up(&mut self) {
        if !self.candidates.is_empty() {
            self.picker_selected = self
                .picker_selected
                .checked_sub(1)
                .unwrap_or(self.candidates.len() - 1);
        }
    }

    pub fn picker_down(&mut self) {
        if !self.candidates.is_empty() {
            self.picker_selected = (self.picker_selected + 1) % self.candidates.len();
        }
    }

    /// Fetch the selected file and hand it to a fresh session. Fetch
    /// failures surface in the picker instead of switching screens.
    pub fn select_file(&mut self, index: usize) {
        let Some(path) = self.candidates.get(index).cloned() else {
            return;
        };
        match self.source.fetch_content(&path) {
            Ok(text) => {
                self.session.load(&path, &text);
                self.outcome = None;
                self.screen = AppScreen::Typing;
            }
            Err(e) => {
                self.picker_error = Some(e.to_string());
            }
        }
    }

    pub fn select_current(&mut self) {
        self.select_file(self.picker_selected);
    }

    pub fn select_random(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        let index = self.rng.gen_range(0..self.candidates.len());
        self.picker_selected = index;
        self.select_file(index);
    }

    /// Cycle through the countdown presets. Only meaningful between runs;
    /// the session ignores duration changes while running.
    pub fn cycle_countdown(&mut self) {
        let current = self.config.countdown_secs;
        let next = COUNTDOWN_PRESETS
            .iter()
            .position(|&p| p == current)
            .map(|i| COUNTDOWN_PRESETS[(i + 1) % COUNTDOWN_PRESETS.len()])
            .unwrap_or(COUNTDOWN_PRESETS[0]);
        self.config.countdown_secs = next;
        self.session.set_countdown(next);
    }

    pub fn type_char(&mut self, ch: char) {
        self.session.type_char(ch);
        self.complete_if_finished();
    }

    /// Tab is typed as four spaces, matching the tab normalization applied
    /// to fetched text.
    pub fn type_tab(&mut self) {
        for _ in 0..4 {
            self.session.type_char(' ');
        }
        self.complete_if_finished();
    }

    pub fn backspace(&mut self) {
        self.session.backspace();
    }

    /// Periodic update; a tick may expire the countdown and finish the run.
    pub fn tick(&mut self) {
        if self.screen == AppScreen::Typing {
            self.session.tick();
            self.complete_if_finished();
        }
    }

    pub fn finish(&mut self) {
        if self.session.finish() {
            self.complete_run();
        }
    }

    /// Record a run that was auto-finished by the session itself.
    fn complete_if_finished(&mut self) {
        if self.session.phase() == Phase::Finished && self.outcome.is_none() {
            self.complete_run();
        }
    }

    /// Runs once per finished session: derive the rank, merge into the
    /// best-score store, move to the result screen. The `outcome` guard and
    /// the session's idempotent finish keep the store update single-shot.
    fn complete_run(&mut self) {
        let stats = self.session.stats();
        let elapsed = self.session.elapsed_secs();

        let net = stats.net_wpm.max(0.0).round();
        let accuracy = stats.accuracy.clamp(0.0, 100.0);
        let rank = Rank::from_result(net, accuracy);

        let current = BestRecord::from_run(&stats, elapsed);
        let (best, new_best) = match self.session.identifier() {
            Some(id) => {
                let id = id.to_string();
                self.store.merge(&id, current)
            }
            None => (current, false),
        };

        self.outcome = Some(RunOutcome {
            stats,
            elapsed_secs: elapsed,
            rank,
            best,
            new_best,
        });
        self.screen = AppScreen::Result;
    }

    /// Same file, fresh attempt.
    pub fn retry(&mut self) {
        self.session.reset(true);
        self.outcome = None;
        self.screen = AppScreen::Typing;
    }

    /// Abandon the loaded file and go back to the list.
    pub fn back_to_picker(&mut self) {
        self.session.reset(false);
        self.outcome = None;
        self.screen = AppScreen::Picker;
    }
}
