//! Pure statistics over (typed buffer, reference text, elapsed time).

/// Derived metrics for a point in time during a run. Recomputed on demand
/// from the session state, never stored.
///
/// Percentages are raw ratios; display layers clamp to [0, 100].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsSnapshot {
    pub typed_len: usize,
    pub reference_len: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub gross_wpm: f64,
    pub net_wpm: f64,
    pub accuracy: f64,
    pub error_rate: f64,
    pub progress: f64,
}

/// Floor on elapsed minutes so WPM stays finite near t=0.
const MIN_MINUTES: f64 = 0.001;

/// Standard typing convention: one word is five characters.
const CHARS_PER_WORD: f64 = 5.0;

pub fn compute_stats(typed: &[char], reference: &[char], elapsed_secs: f64) -> StatsSnapshot {
    let typed_len = typed.len();
    let reference_len = reference.len();
    let compared = typed_len.min(reference_len);

    let correct = typed
        .iter()
        .zip(reference.iter())
        .filter(|(t, r)| t == r)
        .count();

    // Mismatches within the compared span, plus everything typed past the
    // end of the reference.
    let incorrect = (compared - correct) + typed_len.saturating_sub(reference_len);

    let minutes = (elapsed_secs / 60.0).max(MIN_MINUTES);
    let gross_wpm = (typed_len as f64 / CHARS_PER_WORD) / minutes;
    let net_wpm = (correct as f64 / CHARS_PER_WORD) / minutes;

    let accuracy = if typed_len == 0 {
        100.0
    } else {
        correct as f64 / typed_len as f64 * 100.0
    };
    let error_rate = if typed_len == 0 {
        0.0
    } else {
        incorrect as f64 / typed_len as f64 * 100.0
    };
    let progress = if reference_len == 0 {
        0.0
    } else {
        compared as f64 / reference_len as f64 * 100.0
    };

    StatsSnapshot {
        typed_len,
        reference_len,
        correct,
        incorrect,
        gross_wpm,
        net_wpm,
        accuracy,
        error_rate,
        progress,
    }
}
