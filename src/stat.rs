use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub best: usize,
    pub time_us: usize,
    pub expanded_states: usize,
    pub pruned_states: usize,
    pub best_state_entries: usize,
    pub distinct_sets: usize,
}

impl Stats {
    pub(crate) fn print(&self) {
        info!(
            "Best {:?} Time(microseconds) {:?} Expanded states {:?} Pruned states {:?} Best-state entries {:?} Distinct opened sets {:?}",
            self.best,
            self.time_us,
            self.expanded_states,
            self.pruned_states,
            self.best_state_entries,
            self.distinct_sets
        );
    }
}
