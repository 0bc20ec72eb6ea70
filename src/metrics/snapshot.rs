use crate::policy::arc::StateKind;

/// Point-in-time view of an ARC cache: counters, list sizes and targets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArcStatsSnapshot {
    pub reads: u64,
    pub writes: u64,
    /// Read hits, ghost hits included.
    pub hits: u64,
    pub resident_hits: u64,
    pub ghost_hits: u64,

    // gauges captured at snapshot time
    pub recency_len: usize,
    pub recency_ghost_len: usize,
    pub frequency_len: usize,
    pub frequency_ghost_len: usize,
    pub target_recency: usize,
    pub capacity: usize,
}

impl ArcStatsSnapshot {
    /// Size of the list for `kind`.
    pub fn len_of(&self, kind: StateKind) -> usize {
        match kind {
            StateKind::Recency => self.recency_len,
            StateKind::RecencyGhost => self.recency_ghost_len,
            StateKind::Frequency => self.frequency_len,
            StateKind::FrequencyGhost => self.frequency_ghost_len,
        }
    }

    /// Lines currently cached (Recency + Frequency).
    pub fn resident_len(&self) -> usize {
        self.recency_len + self.frequency_len
    }

    /// Lines remembered only as ghosts.
    pub fn ghost_len(&self) -> usize {
        self.recency_ghost_len + self.frequency_ghost_len
    }

    /// `hits / reads`, ghost hits included; `0.0` before any read.
    pub fn hit_ratio(&self) -> f64 {
        ratio(self.hits, self.reads)
    }

    /// `resident_hits / reads`; the hit ratio a real cache would observe.
    pub fn resident_hit_ratio(&self) -> f64 {
        ratio(self.resident_hits, self.reads)
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
