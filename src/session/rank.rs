//! Rank tiers for a finished run.

/// Performance tier derived from net WPM and accuracy. Thresholds are
/// checked highest first; the first match wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rank {
    Godlike,
    Beast,
    Fast,
    Dev,
    Junior,
    Turtle,
}

impl Rank {
    pub fn from_result(net_wpm: f64, accuracy: f64) -> Self {
        if net_wpm >= 85.0 && accuracy >= 97.0 {
            Rank::Godlike
        } else if net_wpm >= 70.0 {
            Rank::Beast
        } else if net_wpm >= 55.0 {
            Rank::Fast
        } else if net_wpm >= 40.0 {
            Rank::Dev
        } else if net_wpm >= 25.0 {
            Rank::Junior
        } else {
            Rank::Turtle
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Godlike => "Godlike",
            Rank::Beast => "Beast",
            Rank::Fast => "Fast",
            Rank::Dev => "Dev",
            Rank::Junior => "Junior",
            Rank::Turtle => "Turtle",
        }
    }
}
