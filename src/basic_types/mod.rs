mod contradiction;
mod keyed_vec;
mod trail;
mod usage_error;

pub use contradiction::Conflict;
pub use contradiction::Contradiction;
pub use contradiction::EmptyDomain;
pub use contradiction::Inconsistency;
pub use contradiction::PropagationStatus;
pub use keyed_vec::KeyedVec;
pub use keyed_vec::StorageKey;
pub(crate) use trail::Trail;
pub use usage_error::UsageError;
