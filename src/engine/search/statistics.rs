use log::info;

/// Counters maintained by the search loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStatistics {
    pub num_decisions: u64,
    pub num_conflicts: u64,
    /// Conflicts that unwound more than one world.
    pub num_backjumps: u64,
    pub num_propagations: u64,
    pub num_solutions: u64,
}

impl SearchStatistics {
    pub(crate) fn log(&self) {
        info!("statistic num_decisions={}", self.num_decisions);
        info!("statistic num_conflicts={}", self.num_conflicts);
        info!("statistic num_backjumps={}", self.num_backjumps);
        info!("statistic num_propagations={}", self.num_propagations);
        info!("statistic num_solutions={}", self.num_solutions);
    }
}
