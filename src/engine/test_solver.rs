//! Helpers for testing propagators: a [`TestSolver`] sets up domains directly,
//! runs a propagator against them and lets tests inspect the result without
//! going through the full search loop.

use enumset::EnumSet;

use super::backtrackable::Environment;
use super::domain_store::DomainStore;
use crate::basic_types::PropagationStatus;
use crate::engine::explanation::Explanation;
use crate::engine::explanation::ExplanationStore;
use crate::engine::propagation::Entailment;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Propagator;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::IntVariable;
use crate::engine::variables::SetVariable;

/// A container for domains against which a propagator under test runs.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    pub(crate) domains: DomainStore,
    pub(crate) explanations: ExplanationStore,
    pub(crate) environment: Environment,
}

impl TestSolver {
    pub(crate) fn new_int(&mut self, lower_bound: i32, upper_bound: i32) -> IntVariable {
        self.domains.new_int(lower_bound, upper_bound)
    }

    pub(crate) fn new_set(&mut self, elements: impl IntoIterator<Item = i32>) -> SetVariable {
        self.domains.new_set(elements)
    }

    pub(crate) fn new_graph(
        &mut self,
        num_nodes: u32,
        arcs: impl IntoIterator<Item = Arc>,
    ) -> GraphVariable {
        self.domains.new_graph(num_nodes, arcs)
    }

    pub(crate) fn context_mut(&mut self) -> PropagationContextMut<'_> {
        PropagationContextMut::new(
            &mut self.domains,
            &mut self.explanations,
            &mut self.environment,
        )
    }

    pub(crate) fn propagate(&mut self, propagator: &mut dyn Propagator) -> PropagationStatus {
        let mut context = self.context_mut();
        propagator.propagate(&mut context, EnumSet::new())
    }

    pub(crate) fn initialise(&mut self, propagator: &mut dyn Propagator) -> PropagationStatus {
        let mut context = self.context_mut();
        propagator.initialise_at_root(&mut context)
    }

    pub(crate) fn is_entailed(&self, propagator: &dyn Propagator) -> Entailment {
        propagator.is_entailed(PropagationContext::new(&self.domains))
    }

    pub(crate) fn lower_bound(&self, variable: IntVariable) -> i32 {
        self.domains.lower_bound(variable)
    }

    pub(crate) fn upper_bound(&self, variable: IntVariable) -> i32 {
        self.domains.upper_bound(variable)
    }

    pub(crate) fn assert_bounds(&self, variable: IntVariable, lower_bound: i32, upper_bound: i32) {
        assert_eq!(
            (lower_bound, upper_bound),
            (self.lower_bound(variable), self.upper_bound(variable)),
            "bounds of {variable} differ from the expected ones",
        );
    }

    pub(crate) fn set_lower_bound(&mut self, variable: IntVariable, bound: i32) {
        let changed = self
            .domains
            .set_lower_bound(&mut self.explanations, variable, bound, Explanation::new())
            .expect("bound update in test setup should not empty the domain");
        assert!(changed);
    }

    pub(crate) fn set_upper_bound(&mut self, variable: IntVariable, bound: i32) {
        let changed = self
            .domains
            .set_upper_bound(&mut self.explanations, variable, bound, Explanation::new())
            .expect("bound update in test setup should not empty the domain");
        assert!(changed);
    }

    pub(crate) fn add_to_kernel(&mut self, variable: SetVariable, element: i32) {
        let _ = self
            .domains
            .add_to_kernel(&mut self.explanations, variable, element, Explanation::new())
            .expect("kernel addition in test setup should not conflict");
    }

    pub(crate) fn remove_arc(&mut self, variable: GraphVariable, arc: Arc) {
        let _ = self
            .domains
            .remove_arc(&mut self.explanations, variable, arc, Explanation::new())
            .expect("arc removal in test setup should not conflict");
    }

    pub(crate) fn world_push(&mut self) {
        self.domains.world_push();
        self.environment.world_push();
    }

    pub(crate) fn world_pop(&mut self, to_world: u32) {
        self.domains.world_pop(to_world);
        self.environment.world_pop(to_world);
    }
}
