//! Best-scores table.

use serde::{Deserialize, Serialize};

/// Number of entries kept in a [`Highscores`] table.
pub const HIGHSCORE_SLOTS: usize = 5;

/// Descending table of the best final scores, always exactly
/// [`HIGHSCORE_SLOTS`] entries long (unused slots hold zero).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct Highscores {
    scores: Vec<u64>,
}

impl Highscores {
    /// Creates a table of empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Scores in descending order.
    #[must_use]
    pub fn scores(&self) -> &[u64] {
        &self.scores
    }

    /// Best score recorded so far.
    #[must_use]
    pub fn best(&self) -> u64 {
        self.scores.first().copied().unwrap_or(0)
    }

    /// Inserts `score`, returning its zero-based rank when it made the table.
    pub fn record(&mut self, score: u64) -> Option<usize> {
        let rank = self.scores.iter().position(|existing| score > *existing)?;
        self.scores.insert(rank, score);
        self.scores.truncate(HIGHSCORE_SLOTS);
        Some(rank)
    }
}

impl Default for Highscores {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u64>> for Highscores {
    fn from(mut scores: Vec<u64>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.resize(HIGHSCORE_SLOTS, 0);
        Self { scores }
    }
}

impl From<Highscores> for Vec<u64> {
    fn from(table: Highscores) -> Self {
        table.scores
    }
}

#[cfg(test)]
mod tests {
    use super::{Highscores, HIGHSCORE_SLOTS};

    #[test]
    fn loaded_tables_are_normalized() {
        let table = Highscores::from(vec![10, 700, 30, 5, 90, 400, 1]);
        assert_eq!(table.scores(), &[700, 400, 90, 30, 10]);

        let short = Highscores::from(vec![3]);
        assert_eq!(short.scores(), &[3, 0, 0, 0, 0]);
    }

    #[test]
    fn record_reports_rank_or_rejection() {
        let mut table = Highscores::from(vec![500, 400, 300, 200, 100]);

        assert_eq!(table.record(450), Some(1));
        assert_eq!(table.scores(), &[500, 450, 400, 300, 200]);
        assert_eq!(table.record(200), None);
        assert_eq!(table.scores().len(), HIGHSCORE_SLOTS);
        assert_eq!(table.best(), 500);
    }
}
