//! Attack-sequence learning.
//!
//! Two signals are kept for every `(previous, latest)` pair of player attacks:
//!
//! - **recent**: how often each id followed that pair inside the bounded
//!   history window
//! - **cumulative**: how often each id followed that pair over the whole
//!   session (the frequency table)
//!
//! They are combined as
//!
//! ```text
//! score(id) = history_weight * recent(id) + cumulative(id)
//! ```
//!
//! The highest score wins. Ties go to the id seen most recently as a
//! follower in the history window, then to the lowest id. When both signals
//! are empty the prediction is a uniformly random id.

use rand::Rng;

use super::frequency::FrequencyTable;
use super::history::AttackHistory;
use crate::attack::AttackId;

const N: usize = AttackId::COUNT;

/// The last three attack ids, oldest first. Starts as `[0, 0, 0]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecencyWindow {
    ids: [AttackId; 3],
}

impl RecencyWindow {
    /// Drops the oldest id and appends `newest`.
    pub fn shift(&mut self, newest: AttackId) {
        self.ids = [self.ids[1], self.ids[2], newest];
    }

    pub fn oldest(&self) -> AttackId {
        self.ids[0]
    }

    pub fn previous(&self) -> AttackId {
        self.ids[1]
    }

    pub fn latest(&self) -> AttackId {
        self.ids[2]
    }

    pub fn ids(&self) -> [AttackId; 3] {
        self.ids
    }
}

/// Where a prediction came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictionSource {
    /// At least one signal matched the current pair.
    Pattern,
    /// No signal matched; the id was drawn uniformly.
    Random,
}

/// Best guess for the player's next attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prediction {
    pub attack: AttackId,
    /// Combined score of `attack` (zero for random guesses).
    pub score: u32,
    pub source: PredictionSource,
}

/// Raw per-id evidence for the pair `(previous, latest)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternSignals {
    pub previous: AttackId,
    pub latest: AttackId,
    /// Followers of the pair inside the history window.
    pub recent: [u32; N],
    /// Followers of the pair over the whole session.
    pub cumulative: [u32; N],
    /// History index of the most recent follower occurrence, per id.
    pub last_seen: [Option<usize>; N],
}

impl PatternSignals {
    pub fn combined(&self, id: AttackId, history_weight: u32) -> u32 {
        history_weight
            .saturating_mul(self.recent[id.index()])
            .saturating_add(self.cumulative[id.index()])
    }

    /// Id with the most history-window matches.
    pub fn top_recent(&self) -> Option<AttackId> {
        self.rank(|id| self.recent[id.index()]).map(|(id, _)| id)
    }

    /// Id with the highest combined score, with that score.
    pub fn best(&self, history_weight: u32) -> Option<(AttackId, u32)> {
        self.rank(|id| self.combined(id, history_weight))
    }

    fn rank(&self, score: impl Fn(AttackId) -> u32) -> Option<(AttackId, u32)> {
        let mut best: Option<(AttackId, u32)> = None;
        for id in AttackId::all() {
            let value = score(id);
            if value == 0 {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_id, best_value)) => {
                    (value, self.last_seen[id.index()])
                        > (best_value, self.last_seen[best_id.index()])
                }
            };
            if better {
                best = Some((id, value));
            }
        }
        best
    }
}

/// Recency window, bounded history and frequency table.
#[derive(Clone, Debug)]
pub struct AttackPredictor {
    window: RecencyWindow,
    history: AttackHistory,
    frequency: FrequencyTable,
    history_weight: u32,
}

impl AttackPredictor {
    /// Minimum history length before predictions are produced.
    pub const MIN_HISTORY: usize = 3;

    pub fn new(history_capacity: usize, history_weight: u32) -> Self {
        Self {
            window: RecencyWindow::default(),
            history: AttackHistory::with_capacity(history_capacity),
            frequency: FrequencyTable::new(),
            history_weight,
        }
    }

    /// Folds one observed attack into all three structures.
    pub fn observe(&mut self, id: AttackId) {
        self.window.shift(id);
        self.frequency
            .record(self.window.oldest(), self.window.previous(), self.window.latest());
        self.history.push(id);
    }

    pub fn is_active(&self) -> bool {
        self.history.len() >= Self::MIN_HISTORY
    }

    /// Evidence for the current `(previous, latest)` pair, once active.
    pub fn signals(&self) -> Option<PatternSignals> {
        if !self.is_active() {
            return None;
        }

        let previous = self.window.previous();
        let latest = self.window.latest();
        let mut recent = [0u32; N];
        let mut last_seen = [None; N];

        let ids: Vec<AttackId> = self.history.iter().collect();
        for (start, triple) in ids.windows(3).enumerate() {
            if triple[0] == previous && triple[1] == latest {
                let follower = triple[2].index();
                recent[follower] += 1;
                last_seen[follower] = Some(start + 2);
            }
        }

        Some(PatternSignals {
            previous,
            latest,
            recent,
            cumulative: self.frequency.row(previous, latest),
            last_seen,
        })
    }

    /// Predicts the next attack, or `None` while fewer than three attacks
    /// have been observed.
    pub fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Prediction> {
        let signals = self.signals()?;
        let prediction = match signals.best(self.history_weight) {
            Some((attack, score)) => Prediction {
                attack,
                score,
                source: PredictionSource::Pattern,
            },
            None => Prediction {
                attack: AttackId::random(rng),
                score: 0,
                source: PredictionSource::Random,
            },
        };
        Some(prediction)
    }

    pub fn window(&self) -> &RecencyWindow {
        &self.window
    }

    pub fn history(&self) -> &AttackHistory {
        &self.history
    }

    pub fn frequency(&self) -> &FrequencyTable {
        &self.frequency
    }

    pub fn history_weight(&self) -> u32 {
        self.history_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn id(raw: u8) -> AttackId {
        AttackId::new(raw).unwrap()
    }

    fn observe_all(predictor: &mut AttackPredictor, raws: &[u8]) {
        for raw in raws {
            predictor.observe(id(*raw));
        }
    }

    #[test]
    fn inactive_below_three_entries() {
        let mut predictor = AttackPredictor::new(50, 2);
        let mut rng = StdRng::seed_from_u64(1);
        observe_all(&mut predictor, &[4, 4]);
        assert!(predictor.predict(&mut rng).is_none());
        predictor.observe(id(4));
        assert!(predictor.predict(&mut rng).is_some());
    }

    #[test]
    fn window_shifts_oldest_out() {
        let mut predictor = AttackPredictor::new(50, 2);
        observe_all(&mut predictor, &[1, 2, 3, 4]);
        assert_eq!(predictor.window().ids(), [id(2), id(3), id(4)]);
        assert_eq!(predictor.frequency().count(id(2), id(3), id(4)), 1);
        // the first observation is counted against the zeroed window
        assert_eq!(predictor.frequency().count(id(0), id(0), id(1)), 1);
    }

    #[test]
    fn repeated_pair_surfaces_latest_follower() {
        let mut predictor = AttackPredictor::new(50, 2);
        observe_all(&mut predictor, &[2, 5, 2, 5, 9, 2, 5]);

        let signals = predictor.signals().unwrap();
        assert_eq!((signals.previous, signals.latest), (id(2), id(5)));
        assert_eq!(signals.recent[2], 1);
        assert_eq!(signals.recent[9], 1);
        assert_eq!(signals.top_recent(), Some(id(9)));

        let mut rng = StdRng::seed_from_u64(3);
        let prediction = predictor.predict(&mut rng).unwrap();
        assert_eq!(prediction.attack, id(9));
        assert_eq!(prediction.source, PredictionSource::Pattern);
        assert_eq!(prediction.score, 2 * 1 + 1);
    }

    #[test]
    fn dominant_follower_wins() {
        let mut predictor = AttackPredictor::new(50, 2);
        observe_all(&mut predictor, &[1, 2, 3, 1, 2, 3, 1, 2, 7, 1, 2]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(predictor.predict(&mut rng).unwrap().attack, id(3));
    }

    #[test]
    fn cumulative_counts_outlive_history_window() {
        // capacity 3: the history forgets, the frequency table does not
        let mut predictor = AttackPredictor::new(3, 2);
        observe_all(&mut predictor, &[10, 11, 12, 20, 21, 22, 10, 11]);

        let signals = predictor.signals().unwrap();
        assert_eq!(signals.recent, [0; N]);
        assert_eq!(signals.cumulative[12], 1);

        let mut rng = StdRng::seed_from_u64(5);
        let prediction = predictor.predict(&mut rng).unwrap();
        assert_eq!(prediction.attack, id(12));
        assert_eq!(prediction.score, 1);
    }

    #[test]
    fn unknown_pair_falls_back_to_random() {
        let mut predictor = AttackPredictor::new(50, 2);
        observe_all(&mut predictor, &[3, 4, 5]);
        let mut rng = StdRng::seed_from_u64(9);
        let prediction = predictor.predict(&mut rng).unwrap();
        assert_eq!(prediction.source, PredictionSource::Random);
        assert_eq!(prediction.score, 0);
        assert!(prediction.attack.index() < N);
    }

    #[test]
    fn history_weight_favours_recent_patterns() {
        // Old habit: (1,2) -> 3 five times, pushed out of a short history.
        // New habit: (1,2) -> 4 twice, still inside the history.
        let mut sequence = Vec::new();
        for _ in 0..5 {
            sequence.extend_from_slice(&[1, 2, 3]);
        }
        sequence.extend_from_slice(&[1, 2, 4, 1, 2, 4, 1, 2]);

        let mut weighted = AttackPredictor::new(8, 4);
        observe_all(&mut weighted, &sequence);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(weighted.predict(&mut rng).unwrap().attack, id(4));

        let mut unweighted = AttackPredictor::new(8, 0);
        observe_all(&mut unweighted, &sequence);
        assert_eq!(unweighted.predict(&mut rng).unwrap().attack, id(3));
    }
}
