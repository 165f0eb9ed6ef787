mod local_id;
mod propagation_context;
mod propagator;
mod propagator_id;
mod store;

pub use local_id::LocalId;
pub use propagation_context::PropagationContext;
pub use propagation_context::PropagationContextMut;
pub use propagator::Entailment;
pub use propagator::Propagator;
pub use propagator_id::PropagatorId;
pub(crate) use store::PropagatorStore;
