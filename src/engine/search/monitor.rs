use crate::basic_types::Contradiction;

/// Observer of search-loop milestones, invoked synchronously from the search
/// loop.
pub trait SearchMonitor {
    fn on_contradiction(&mut self, contradiction: &Contradiction) {
        let _ = contradiction;
    }

    fn on_solution(&mut self) {}
}
