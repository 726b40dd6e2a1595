use crate::attack::AttackId;

const N: usize = AttackId::COUNT;

/// All-time counts of `(second_to_last, last, next)` attack triples.
///
/// Stored flattened as `27³` cells; each cell only ever increases.
#[derive(Clone, Debug)]
pub struct FrequencyTable {
    counts: Box<[u32]>,
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            counts: vec![0; N * N * N].into_boxed_slice(),
            total: 0,
        }
    }

    #[inline]
    fn cell(prev2: AttackId, prev1: AttackId, next: AttackId) -> usize {
        (prev2.index() * N + prev1.index()) * N + next.index()
    }

    pub fn record(&mut self, prev2: AttackId, prev1: AttackId, next: AttackId) {
        let cell = &mut self.counts[Self::cell(prev2, prev1, next)];
        *cell = cell.saturating_add(1);
        self.total += 1;
    }

    pub fn count(&self, prev2: AttackId, prev1: AttackId, next: AttackId) -> u32 {
        self.counts[Self::cell(prev2, prev1, next)]
    }

    /// Counts for every possible follower of `(prev2, prev1)`, indexed by
    /// attack id.
    pub fn row(&self, prev2: AttackId, prev1: AttackId) -> [u32; N] {
        let start = Self::cell(prev2, prev1, AttackId::default());
        let mut row = [0; N];
        row.copy_from_slice(&self.counts[start..start + N]);
        row
    }

    /// Number of triples recorded so far.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
