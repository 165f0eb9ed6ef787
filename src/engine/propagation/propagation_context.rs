use crate::basic_types::EmptyDomain;
use crate::engine::backtrackable::BacktrackableInt;
use crate::engine::backtrackable::Environment;
use crate::engine::domain_store::DomainStore;
use crate::engine::explanation::Explanation;
use crate::engine::explanation::ExplanationStore;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::IntVariable;
use crate::engine::variables::SetVariable;
use crate::engine::variables::VariableId;

/// Read-only view of the domains, handed to side-effect-free propagator
/// methods such as entailment checks.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) domains: &'a DomainStore,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(domains: &'a DomainStore) -> Self {
        PropagationContext { domains }
    }
}

/// Mutable view handed to a running propagator: domain reads, narrowing
/// operations (each taking the reason that justifies it), and the propagator's
/// backtrackable cells.
#[derive(Debug)]
pub struct PropagationContextMut<'a> {
    pub(crate) domains: &'a mut DomainStore,
    pub(crate) explanations: &'a mut ExplanationStore,
    pub(crate) environment: &'a mut Environment,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(
        domains: &'a mut DomainStore,
        explanations: &'a mut ExplanationStore,
        environment: &'a mut Environment,
    ) -> Self {
        PropagationContextMut {
            domains,
            explanations,
            environment,
        }
    }

    pub fn as_readonly(&self) -> PropagationContext<'_> {
        PropagationContext {
            domains: self.domains,
        }
    }
}

macro_rules! impl_domain_reads {
    ($context:ident) => {
        impl $context<'_> {
            pub fn lower_bound(&self, variable: IntVariable) -> i32 {
                self.domains.lower_bound(variable)
            }

            pub fn upper_bound(&self, variable: IntVariable) -> i32 {
                self.domains.upper_bound(variable)
            }

            pub fn contains(&self, variable: IntVariable, value: i32) -> bool {
                self.domains.contains(variable, value)
            }

            pub fn is_int_fixed(&self, variable: IntVariable) -> bool {
                self.domains.is_int_fixed(variable)
            }

            pub fn kernel_contains(&self, variable: SetVariable, element: i32) -> bool {
                self.domains.kernel_contains(variable, element)
            }

            pub fn envelope_contains(&self, variable: SetVariable, element: i32) -> bool {
                self.domains.envelope_contains(variable, element)
            }

            pub fn kernel_iter(&self, variable: SetVariable) -> impl Iterator<Item = i32> + '_ {
                self.domains.kernel_iter(variable)
            }

            pub fn envelope_iter(&self, variable: SetVariable) -> impl Iterator<Item = i32> + '_ {
                self.domains.envelope_iter(variable)
            }

            pub fn is_set_fixed(&self, variable: SetVariable) -> bool {
                self.domains.is_set_fixed(variable)
            }

            pub fn num_nodes(&self, variable: GraphVariable) -> u32 {
                self.domains.num_nodes(variable)
            }

            pub fn successors_of(
                &self,
                variable: GraphVariable,
                node: u32,
            ) -> impl Iterator<Item = u32> + '_ {
                self.domains.successors_of(variable, node)
            }

            pub fn predecessors_of(
                &self,
                variable: GraphVariable,
                node: u32,
            ) -> impl Iterator<Item = u32> + '_ {
                self.domains.predecessors_of(variable, node)
            }

            pub fn arc_in_envelope(&self, variable: GraphVariable, arc: Arc) -> bool {
                self.domains.arc_in_envelope(variable, arc)
            }

            pub fn arc_in_kernel(&self, variable: GraphVariable, arc: Arc) -> bool {
                self.domains.arc_in_kernel(variable, arc)
            }

            pub fn kernel_arcs(&self, variable: GraphVariable) -> impl Iterator<Item = Arc> + '_ {
                self.domains.kernel_arcs(variable)
            }

            pub fn is_graph_fixed(&self, variable: GraphVariable) -> bool {
                self.domains.is_graph_fixed(variable)
            }

            /// The narrowings of `variable` since its creation, for use as a
            /// coarse reason.
            pub fn domain_deductions(&self, variable: VariableId) -> Explanation {
                self.domains.domain_deductions(variable)
            }
        }
    };
}

impl_domain_reads!(PropagationContext);
impl_domain_reads!(PropagationContextMut);

impl PropagationContextMut<'_> {
    pub fn set_lower_bound(
        &mut self,
        variable: IntVariable,
        bound: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .set_lower_bound(self.explanations, variable, bound, reason)
    }

    pub fn set_upper_bound(
        &mut self,
        variable: IntVariable,
        bound: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .set_upper_bound(self.explanations, variable, bound, reason)
    }

    pub fn remove_value(
        &mut self,
        variable: IntVariable,
        value: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .remove_value(self.explanations, variable, value, reason)
    }

    pub fn instantiate(
        &mut self,
        variable: IntVariable,
        value: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .instantiate(self.explanations, variable, value, reason)
    }

    pub fn add_to_kernel(
        &mut self,
        variable: SetVariable,
        element: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .add_to_kernel(self.explanations, variable, element, reason)
    }

    pub fn remove_from_envelope(
        &mut self,
        variable: SetVariable,
        element: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .remove_from_envelope(self.explanations, variable, element, reason)
    }

    pub fn enforce_arc(
        &mut self,
        variable: GraphVariable,
        arc: Arc,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .enforce_arc(self.explanations, variable, arc, reason)
    }

    pub fn remove_arc(
        &mut self,
        variable: GraphVariable,
        arc: Arc,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        self.domains
            .remove_arc(self.explanations, variable, arc, reason)
    }

    /// Read a backtrackable cell of the propagator.
    pub fn read_backtrackable(&self, reference: BacktrackableInt) -> i64 {
        self.environment.read(reference)
    }

    /// Write a backtrackable cell of the propagator; the write is undone when
    /// the world it happened in is popped.
    pub fn write_backtrackable(&mut self, reference: BacktrackableInt, value: i64) {
        self.environment.write(reference, value);
    }
}
