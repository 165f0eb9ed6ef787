//! The propagator implementations shipped with the engine.

mod arborescence;
mod dominators;
mod set_min_element;
mod sum_arc_costs;

pub use arborescence::ArborescencesPropagator;
pub use set_min_element::SetMinElementPropagator;
pub use sum_arc_costs::SumArcCostsPropagator;
