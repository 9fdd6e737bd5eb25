//! Running counters for the scheduler

/// Counters accumulated over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub ticks: u64,
    pub random_splashes: u64,
    pub user_splashes: u64,
    /// Intervals discarded by the catch-up cap.
    pub dropped: u64,
}

impl TickStats {
    pub fn splashes(&self) -> u64 {
        self.random_splashes + self.user_splashes
    }

    /// Counts accumulated since `earlier` was taken.
    pub fn since(&self, earlier: &TickStats) -> TickStats {
        TickStats {
            ticks: self.ticks - earlier.ticks,
            random_splashes: self.random_splashes - earlier.random_splashes,
            user_splashes: self.user_splashes - earlier.user_splashes,
            dropped: self.dropped - earlier.dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_subtracts_fieldwise() {
        let earlier = TickStats { ticks: 10, random_splashes: 1, user_splashes: 0, dropped: 2 };
        let now = TickStats { ticks: 70, random_splashes: 3, user_splashes: 4, dropped: 2 };
        let delta = now.since(&earlier);
        assert_eq!(delta.ticks, 60);
        assert_eq!(delta.splashes(), 6);
        assert_eq!(delta.dropped, 0);
    }
}
