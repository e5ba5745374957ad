//! Metric identifiers for the on-screen quantities the tracker follows.

use serde::{Deserialize, Serialize};

/// A named on-screen quantity tracked across runs.
///
/// The cumulative value behind each metric lives in the game and is only
/// observable through OCR; the engine keeps its own last-known copy per
/// metric and never assumes the underlying counter is monotonic (a rebirth
/// resets it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Experience points.
    Xp,
    /// Perk points.
    Pp,
}

impl Metric {
    /// All tracked metrics, in reading order.
    pub const ALL: [Metric; 2] = [Metric::Xp, Metric::Pp];

    /// Short label as it appears on screen and in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Xp => "XP",
            Metric::Pp => "PP",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Metric::Xp.to_string(), "XP");
        assert_eq!(Metric::Pp.to_string(), "PP");
    }

    #[test]
    fn test_reading_order() {
        assert_eq!(Metric::ALL, [Metric::Xp, Metric::Pp]);
    }
}
