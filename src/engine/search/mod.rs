mod brancher;
mod cbj;
mod decision;
mod monitor;
mod statistics;

pub(crate) use brancher::Brancher;
pub(crate) use brancher::InputOrderBrancher;
pub(crate) use cbj::backjump_distance;
pub use decision::Choice;
pub(crate) use decision::Decision;
pub use decision::DecisionId;
pub use monitor::SearchMonitor;
pub use statistics::SearchStatistics;
