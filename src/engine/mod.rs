pub mod backtrackable;
pub mod domain_events;
pub(crate) mod domain_store;
pub(crate) mod event_sink;
pub mod explanation;
pub mod propagation;
pub(crate) mod propagator_queue;
pub mod search;
pub mod solver;
#[cfg(test)]
pub(crate) mod test_solver;
pub mod variables;
pub(crate) mod watch_list;

pub use domain_events::DomainEvent;
pub use solver::SolveResult;
pub use solver::Solver;
