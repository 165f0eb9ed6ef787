use super::domain_events::DomainEvent;
use super::event_sink::EventSink;
use crate::basic_types::Conflict;
use crate::basic_types::EmptyDomain;
use crate::basic_types::KeyedVec;
use crate::basic_types::Trail;
use crate::engine::explanation::Deduction;
use crate::engine::explanation::Explanation;
use crate::engine::explanation::ExplanationStore;
use crate::engine::explanation::Fact;
use crate::engine::search::Choice;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphDomain;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::IntVariable;
use crate::engine::variables::IntegerDomain;
use crate::engine::variables::SetDomain;
use crate::engine::variables::SetVariable;
use crate::engine::variables::VariableId;
use crate::quince_asserts::quince_assert_moderate;
use crate::quince_asserts::quince_assert_simple;

#[derive(Debug)]
enum Domain {
    Integer(IntegerDomain),
    Set(SetDomain),
    Graph(GraphDomain),
}

/// One undo entry on the domain trail.
#[derive(Debug, Clone, Copy)]
enum TrailEntry {
    /// Bounds before the narrowing, plus the hole to re-open if the narrowing
    /// punched one.
    Integer {
        variable: VariableId,
        old_lower_bound: i32,
        old_upper_bound: i32,
        hole: Option<i32>,
    },
    KernelAddition {
        variable: VariableId,
        element: i32,
    },
    EnvelopeRemoval {
        variable: VariableId,
        element: i32,
    },
    ArcEnforced {
        variable: VariableId,
        arc: Arc,
    },
    ArcRemoved {
        variable: VariableId,
        arc: Arc,
    },
}

/// Trailed storage for all variable domains, plus the narrowing operations.
///
/// Every successful narrowing pushes its undo entry, fires the matching
/// [`DomainEvent`] into the sink, and records the produced fact with the
/// explanation store, justified by the reason its caller supplied. A narrowing
/// that would empty a domain stores the conflict and returns [`EmptyDomain`]
/// without changing the domain.
#[derive(Debug, Default)]
pub(crate) struct DomainStore {
    domains: KeyedVec<VariableId, Domain>,
    trail: Trail<TrailEntry>,
    events: EventSink,
    conflict: Option<Conflict>,
}

impl DomainStore {
    pub(crate) fn new_int(&mut self, lower_bound: i32, upper_bound: i32) -> IntVariable {
        quince_assert_simple!(lower_bound <= upper_bound);

        self.events.grow();
        IntVariable::new(
            self.domains
                .push(Domain::Integer(IntegerDomain::new(lower_bound, upper_bound))),
        )
    }

    pub(crate) fn new_set(&mut self, elements: impl IntoIterator<Item = i32>) -> SetVariable {
        self.events.grow();
        SetVariable::new(self.domains.push(Domain::Set(SetDomain::new(elements))))
    }

    pub(crate) fn new_graph(
        &mut self,
        num_nodes: u32,
        arcs: impl IntoIterator<Item = Arc>,
    ) -> GraphVariable {
        self.events.grow();
        GraphVariable::new(
            self.domains
                .push(Domain::Graph(GraphDomain::new(num_nodes, arcs))),
        )
    }

    pub(crate) fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = VariableId> {
        self.domains.keys()
    }

    fn integer(&self, variable: IntVariable) -> &IntegerDomain {
        match &self.domains[variable.id()] {
            Domain::Integer(domain) => domain,
            _ => panic!("{variable} is not an integer variable"),
        }
    }

    fn integer_mut(&mut self, variable: IntVariable) -> &mut IntegerDomain {
        match &mut self.domains[variable.id()] {
            Domain::Integer(domain) => domain,
            _ => panic!("{variable} is not an integer variable"),
        }
    }

    fn set(&self, variable: SetVariable) -> &SetDomain {
        match &self.domains[variable.id()] {
            Domain::Set(domain) => domain,
            _ => panic!("{variable} is not a set variable"),
        }
    }

    fn set_mut(&mut self, variable: SetVariable) -> &mut SetDomain {
        match &mut self.domains[variable.id()] {
            Domain::Set(domain) => domain,
            _ => panic!("{variable} is not a set variable"),
        }
    }

    fn graph(&self, variable: GraphVariable) -> &GraphDomain {
        match &self.domains[variable.id()] {
            Domain::Graph(domain) => domain,
            _ => panic!("{variable} is not a graph variable"),
        }
    }

    fn graph_mut(&mut self, variable: GraphVariable) -> &mut GraphDomain {
        match &mut self.domains[variable.id()] {
            Domain::Graph(domain) => domain,
            _ => panic!("{variable} is not a graph variable"),
        }
    }

    // Reading.

    pub(crate) fn lower_bound(&self, variable: IntVariable) -> i32 {
        self.integer(variable).lower_bound
    }

    pub(crate) fn upper_bound(&self, variable: IntVariable) -> i32 {
        self.integer(variable).upper_bound
    }

    pub(crate) fn contains(&self, variable: IntVariable, value: i32) -> bool {
        self.integer(variable).contains(value)
    }

    pub(crate) fn is_int_fixed(&self, variable: IntVariable) -> bool {
        self.integer(variable).is_fixed()
    }

    pub(crate) fn kernel_contains(&self, variable: SetVariable, element: i32) -> bool {
        self.set(variable).kernel.contains(&element)
    }

    pub(crate) fn envelope_contains(&self, variable: SetVariable, element: i32) -> bool {
        self.set(variable).envelope.contains(&element)
    }

    pub(crate) fn kernel_iter(&self, variable: SetVariable) -> impl Iterator<Item = i32> + '_ {
        self.set(variable).kernel.iter().copied()
    }

    pub(crate) fn envelope_iter(&self, variable: SetVariable) -> impl Iterator<Item = i32> + '_ {
        self.set(variable).envelope.iter().copied()
    }

    pub(crate) fn is_set_fixed(&self, variable: SetVariable) -> bool {
        self.set(variable).is_fixed()
    }

    pub(crate) fn num_nodes(&self, variable: GraphVariable) -> u32 {
        self.graph(variable).num_nodes
    }

    pub(crate) fn successors_of(
        &self,
        variable: GraphVariable,
        node: u32,
    ) -> impl Iterator<Item = u32> + '_ {
        self.graph(variable).envelope_successors[node as usize]
            .iter()
            .copied()
    }

    pub(crate) fn predecessors_of(
        &self,
        variable: GraphVariable,
        node: u32,
    ) -> impl Iterator<Item = u32> + '_ {
        self.graph(variable).envelope_predecessors[node as usize]
            .iter()
            .copied()
    }

    pub(crate) fn arc_in_envelope(&self, variable: GraphVariable, arc: Arc) -> bool {
        self.graph(variable).envelope_contains(arc)
    }

    pub(crate) fn arc_in_kernel(&self, variable: GraphVariable, arc: Arc) -> bool {
        self.graph(variable).kernel.contains(&arc)
    }

    pub(crate) fn kernel_arcs(&self, variable: GraphVariable) -> impl Iterator<Item = Arc> + '_ {
        self.graph(variable).kernel.iter().copied()
    }

    pub(crate) fn is_graph_fixed(&self, variable: GraphVariable) -> bool {
        self.graph(variable).is_fixed()
    }

    pub(crate) fn is_fixed(&self, variable: VariableId) -> bool {
        match &self.domains[variable] {
            Domain::Integer(domain) => domain.is_fixed(),
            Domain::Set(domain) => domain.is_fixed(),
            Domain::Graph(domain) => domain.is_fixed(),
        }
    }

    /// The choice to branch on for an unfixed variable: the lower bound for
    /// integers, the smallest envelope element outside the kernel for sets,
    /// the first envelope arc outside the kernel for graphs.
    pub(crate) fn choice_on(&self, variable: VariableId) -> Choice {
        match &self.domains[variable] {
            Domain::Integer(domain) => {
                quince_assert_simple!(!domain.is_fixed());
                Choice::IntAssign {
                    variable: IntVariable::new(variable),
                    value: domain.lower_bound,
                }
            }
            Domain::Set(domain) => {
                let element = domain
                    .envelope
                    .iter()
                    .copied()
                    .find(|element| !domain.kernel.contains(element))
                    .unwrap_or_else(|| panic!("{variable} has no free envelope element"));
                Choice::SetMember {
                    variable: SetVariable::new(variable),
                    element,
                }
            }
            Domain::Graph(domain) => {
                let arc = domain
                    .envelope_successors
                    .iter()
                    .enumerate()
                    .flat_map(|(from, successors)| {
                        successors
                            .iter()
                            .map(move |&to| Arc::new(from as u32, to))
                    })
                    .find(|arc| !domain.kernel.contains(arc))
                    .unwrap_or_else(|| panic!("{variable} has no undecided arc"));
                Choice::GraphArc {
                    variable: GraphVariable::new(variable),
                    arc,
                }
            }
        }
    }

    /// The narrowings of `variable` since its creation, as root facts.
    ///
    /// Used as the coarse reason by propagators whose filtering depends on the
    /// whole current domain rather than on one specific narrowing.
    pub(crate) fn domain_deductions(&self, variable: VariableId) -> Explanation {
        let mut explanation = Explanation::new();

        match &self.domains[variable] {
            Domain::Integer(domain) => {
                if domain.lower_bound > domain.initial_lower_bound {
                    explanation.add(Deduction::Fact(Fact::LowerBound {
                        variable,
                        bound: domain.lower_bound,
                    }));
                }
                if domain.upper_bound < domain.initial_upper_bound {
                    explanation.add(Deduction::Fact(Fact::UpperBound {
                        variable,
                        bound: domain.upper_bound,
                    }));
                }
                for &value in domain
                    .holes
                    .range(domain.lower_bound..=domain.upper_bound)
                {
                    explanation.add(Deduction::Fact(Fact::Removal { variable, value }));
                }
            }
            Domain::Set(domain) => {
                for &element in domain.kernel.iter() {
                    explanation.add(Deduction::Fact(Fact::KernelAddition { variable, element }));
                }
                for &element in domain.initial_envelope.iter() {
                    if !domain.envelope.contains(&element) {
                        explanation
                            .add(Deduction::Fact(Fact::EnvelopeRemoval { variable, element }));
                    }
                }
            }
            Domain::Graph(domain) => {
                for &arc in domain.kernel.iter() {
                    explanation.add(Deduction::Fact(Fact::ArcEnforced { variable, arc }));
                }
                for &arc in domain.initial_arcs.iter() {
                    if !domain.envelope_contains(arc) {
                        explanation.add(Deduction::Fact(Fact::ArcRemoved { variable, arc }));
                    }
                }
            }
        }

        explanation
    }

    // Narrowing.

    fn raise_conflict(
        &mut self,
        variable: VariableId,
        mut explanation: Explanation,
        opposing: Fact,
    ) -> EmptyDomain {
        explanation.add(Deduction::Fact(opposing));
        self.conflict = Some(Conflict {
            variable: Some(variable),
            explanation,
        });
        EmptyDomain
    }

    pub(crate) fn set_lower_bound(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: IntVariable,
        bound: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.integer(variable);

        if bound <= domain.lower_bound {
            return Ok(false);
        }
        if bound > domain.upper_bound {
            let opposing = Fact::UpperBound {
                variable: id,
                bound: domain.upper_bound,
            };
            return Err(self.raise_conflict(id, reason, opposing));
        }

        let old_lower_bound = domain.lower_bound;
        let old_upper_bound = domain.upper_bound;

        // The new bound may land on a hole; slide up to the next live value.
        // It cannot pass the upper bound, which is never a hole.
        let mut new_lower_bound = bound;
        while domain.holes.contains(&new_lower_bound) {
            new_lower_bound += 1;
        }
        quince_assert_moderate!(new_lower_bound <= old_upper_bound);

        self.trail.push(TrailEntry::Integer {
            variable: id,
            old_lower_bound,
            old_upper_bound,
            hole: None,
        });
        self.integer_mut(variable).lower_bound = new_lower_bound;

        self.events.event_occurred(DomainEvent::LowerBound, id);
        if new_lower_bound == old_upper_bound {
            self.events.event_occurred(DomainEvent::Assign, id);
        }

        explanations.store(
            Deduction::Fact(Fact::LowerBound {
                variable: id,
                bound: new_lower_bound,
            }),
            reason,
        );

        Ok(true)
    }

    pub(crate) fn set_upper_bound(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: IntVariable,
        bound: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.integer(variable);

        if bound >= domain.upper_bound {
            return Ok(false);
        }
        if bound < domain.lower_bound {
            let opposing = Fact::LowerBound {
                variable: id,
                bound: domain.lower_bound,
            };
            return Err(self.raise_conflict(id, reason, opposing));
        }

        let old_lower_bound = domain.lower_bound;
        let old_upper_bound = domain.upper_bound;

        let mut new_upper_bound = bound;
        while domain.holes.contains(&new_upper_bound) {
            new_upper_bound -= 1;
        }
        quince_assert_moderate!(new_upper_bound >= old_lower_bound);

        self.trail.push(TrailEntry::Integer {
            variable: id,
            old_lower_bound,
            old_upper_bound,
            hole: None,
        });
        self.integer_mut(variable).upper_bound = new_upper_bound;

        self.events.event_occurred(DomainEvent::UpperBound, id);
        if new_upper_bound == old_lower_bound {
            self.events.event_occurred(DomainEvent::Assign, id);
        }

        explanations.store(
            Deduction::Fact(Fact::UpperBound {
                variable: id,
                bound: new_upper_bound,
            }),
            reason,
        );

        Ok(true)
    }

    pub(crate) fn remove_value(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: IntVariable,
        value: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.integer(variable);

        if !domain.contains(value) {
            return Ok(false);
        }

        let old_lower_bound = domain.lower_bound;
        let old_upper_bound = domain.upper_bound;

        if old_lower_bound == old_upper_bound {
            let mut explanation = reason;
            explanation.add(Deduction::Fact(Fact::LowerBound {
                variable: id,
                bound: value,
            }));
            let opposing = Fact::UpperBound {
                variable: id,
                bound: value,
            };
            return Err(self.raise_conflict(id, explanation, opposing));
        }

        explanations.store(
            Deduction::Fact(Fact::Removal {
                variable: id,
                value,
            }),
            reason.clone(),
        );

        if value == old_lower_bound {
            let changed = self.set_lower_bound(explanations, variable, value + 1, reason)?;
            quince_assert_moderate!(changed);
            self.events.event_occurred(DomainEvent::Removal, id);
            return Ok(true);
        }
        if value == old_upper_bound {
            let changed = self.set_upper_bound(explanations, variable, value - 1, reason)?;
            quince_assert_moderate!(changed);
            self.events.event_occurred(DomainEvent::Removal, id);
            return Ok(true);
        }

        self.trail.push(TrailEntry::Integer {
            variable: id,
            old_lower_bound,
            old_upper_bound,
            hole: Some(value),
        });
        let _ = self.integer_mut(variable).holes.insert(value);
        self.events.event_occurred(DomainEvent::Removal, id);

        Ok(true)
    }

    pub(crate) fn instantiate(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: IntVariable,
        value: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.integer(variable);

        if !domain.contains(value) {
            let opposing = if value < domain.lower_bound {
                Fact::LowerBound {
                    variable: id,
                    bound: domain.lower_bound,
                }
            } else if value > domain.upper_bound {
                Fact::UpperBound {
                    variable: id,
                    bound: domain.upper_bound,
                }
            } else {
                Fact::Removal {
                    variable: id,
                    value,
                }
            };
            return Err(self.raise_conflict(id, reason, opposing));
        }
        if domain.is_fixed() {
            return Ok(false);
        }

        let raised = self.set_lower_bound(explanations, variable, value, reason.clone())?;
        let lowered = self.set_upper_bound(explanations, variable, value, reason)?;
        quince_assert_moderate!(raised || lowered);

        Ok(true)
    }

    pub(crate) fn add_to_kernel(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: SetVariable,
        element: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.set(variable);

        if domain.kernel.contains(&element) {
            return Ok(false);
        }
        if !domain.envelope.contains(&element) {
            let opposing = Fact::EnvelopeRemoval {
                variable: id,
                element,
            };
            return Err(self.raise_conflict(id, reason, opposing));
        }

        let _ = self.set_mut(variable).kernel.insert(element);
        self.trail.push(TrailEntry::KernelAddition {
            variable: id,
            element,
        });
        self.events.event_occurred(DomainEvent::AddToKernel, id);

        explanations.store(
            Deduction::Fact(Fact::KernelAddition {
                variable: id,
                element,
            }),
            reason,
        );

        Ok(true)
    }

    pub(crate) fn remove_from_envelope(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: SetVariable,
        element: i32,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.set(variable);

        if !domain.envelope.contains(&element) {
            return Ok(false);
        }
        if domain.kernel.contains(&element) {
            let opposing = Fact::KernelAddition {
                variable: id,
                element,
            };
            return Err(self.raise_conflict(id, reason, opposing));
        }

        let _ = self.set_mut(variable).envelope.remove(&element);
        self.trail.push(TrailEntry::EnvelopeRemoval {
            variable: id,
            element,
        });
        self.events
            .event_occurred(DomainEvent::RemoveFromEnvelope, id);

        explanations.store(
            Deduction::Fact(Fact::EnvelopeRemoval {
                variable: id,
                element,
            }),
            reason,
        );

        Ok(true)
    }

    pub(crate) fn enforce_arc(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: GraphVariable,
        arc: Arc,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.graph(variable);

        if domain.kernel.contains(&arc) {
            return Ok(false);
        }
        if !domain.envelope_contains(arc) {
            let opposing = Fact::ArcRemoved { variable: id, arc };
            return Err(self.raise_conflict(id, reason, opposing));
        }

        let _ = self.graph_mut(variable).kernel.insert(arc);
        self.trail.push(TrailEntry::ArcEnforced { variable: id, arc });
        self.events.event_occurred(DomainEvent::EnforceArc, id);

        explanations.store(
            Deduction::Fact(Fact::ArcEnforced { variable: id, arc }),
            reason,
        );

        Ok(true)
    }

    pub(crate) fn remove_arc(
        &mut self,
        explanations: &mut ExplanationStore,
        variable: GraphVariable,
        arc: Arc,
        reason: Explanation,
    ) -> Result<bool, EmptyDomain> {
        let id = variable.id();
        let domain = self.graph(variable);

        if !domain.envelope_contains(arc) {
            return Ok(false);
        }
        if domain.kernel.contains(&arc) {
            let opposing = Fact::ArcEnforced { variable: id, arc };
            return Err(self.raise_conflict(id, reason, opposing));
        }

        let graph = self.graph_mut(variable);
        let _ = graph.envelope_successors[arc.from as usize].remove(&arc.to);
        let _ = graph.envelope_predecessors[arc.to as usize].remove(&arc.from);
        self.trail.push(TrailEntry::ArcRemoved { variable: id, arc });
        self.events.event_occurred(DomainEvent::RemoveArc, id);

        explanations.store(
            Deduction::Fact(Fact::ArcRemoved { variable: id, arc }),
            reason,
        );

        Ok(true)
    }

    // Worlds.

    pub(crate) fn current_world(&self) -> u32 {
        self.trail.get_checkpoint() as u32
    }

    pub(crate) fn world_push(&mut self) {
        self.trail.new_checkpoint();
    }

    pub(crate) fn world_pop(&mut self, to_world: u32) {
        assert!(
            to_world <= self.current_world(),
            "cannot pop to world {to_world} from world {}",
            self.current_world()
        );

        if to_world < self.current_world() {
            let entries: Vec<TrailEntry> =
                self.trail.synchronise(to_world as usize).collect();
            for entry in entries {
                self.undo(entry);
            }
        }

        // Undrained events and a stored conflict belong to the abandoned
        // worlds.
        for _ in self.events.drain() {}
        self.conflict = None;
    }

    fn undo(&mut self, entry: TrailEntry) {
        match entry {
            TrailEntry::Integer {
                variable,
                old_lower_bound,
                old_upper_bound,
                hole,
            } => {
                let domain = self.integer_mut(IntVariable::new(variable));
                domain.lower_bound = old_lower_bound;
                domain.upper_bound = old_upper_bound;
                if let Some(value) = hole {
                    let _ = domain.holes.remove(&value);
                }
            }
            TrailEntry::KernelAddition { variable, element } => {
                let _ = self
                    .set_mut(SetVariable::new(variable))
                    .kernel
                    .remove(&element);
            }
            TrailEntry::EnvelopeRemoval { variable, element } => {
                let _ = self
                    .set_mut(SetVariable::new(variable))
                    .envelope
                    .insert(element);
            }
            TrailEntry::ArcEnforced { variable, arc } => {
                let _ = self
                    .graph_mut(GraphVariable::new(variable))
                    .kernel
                    .remove(&arc);
            }
            TrailEntry::ArcRemoved { variable, arc } => {
                let graph = self.graph_mut(GraphVariable::new(variable));
                let _ = graph.envelope_successors[arc.from as usize].insert(arc.to);
                let _ = graph.envelope_predecessors[arc.to as usize].insert(arc.from);
            }
        }
    }

    // Conflicts and events.

    pub(crate) fn take_conflict(&mut self) -> Option<Conflict> {
        self.conflict.take()
    }

    pub(crate) fn drain_events(&mut self) -> Vec<(DomainEvent, VariableId)> {
        self.events.drain().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (DomainStore, ExplanationStore) {
        (DomainStore::default(), ExplanationStore::default())
    }

    #[test]
    fn tightening_a_bound_is_monotone_and_observable() {
        let (mut domains, mut explanations) = store();
        let x = domains.new_int(0, 10);

        let changed = domains
            .set_lower_bound(&mut explanations, x, 4, Explanation::new())
            .unwrap();

        assert!(changed);
        assert_eq!(4, domains.lower_bound(x));

        // Weaker bound is a no-op.
        let changed = domains
            .set_lower_bound(&mut explanations, x, 2, Explanation::new())
            .unwrap();
        assert!(!changed);
        assert_eq!(4, domains.lower_bound(x));
    }

    #[test]
    fn crossing_bounds_is_an_empty_domain_conflict() {
        let (mut domains, mut explanations) = store();
        let x = domains.new_int(0, 5);

        let result = domains.set_lower_bound(&mut explanations, x, 6, Explanation::new());

        assert_eq!(Err(EmptyDomain), result);
        let conflict = domains.take_conflict().unwrap();
        assert_eq!(Some(x.id()), conflict.variable);
        assert!(conflict.explanation.contains(&Deduction::Fact(Fact::UpperBound {
            variable: x.id(),
            bound: 5,
        })));
    }

    #[test]
    fn a_raised_bound_slides_over_holes() {
        let (mut domains, mut explanations) = store();
        let x = domains.new_int(0, 10);

        let _ = domains
            .remove_value(&mut explanations, x, 4, Explanation::new())
            .unwrap();
        let _ = domains
            .set_lower_bound(&mut explanations, x, 4, Explanation::new())
            .unwrap();

        assert_eq!(5, domains.lower_bound(x));
    }

    #[test]
    fn removing_the_last_value_conflicts() {
        let (mut domains, mut explanations) = store();
        let x = domains.new_int(3, 3);

        let result = domains.remove_value(&mut explanations, x, 3, Explanation::new());

        assert_eq!(Err(EmptyDomain), result);
    }

    #[test]
    fn instantiation_fires_assign_and_bound_events() {
        let (mut domains, mut explanations) = store();
        let x = domains.new_int(0, 10);

        let _ = domains
            .instantiate(&mut explanations, x, 7, Explanation::new())
            .unwrap();

        let events = domains.drain_events();
        assert!(events.contains(&(DomainEvent::LowerBound, x.id())));
        assert!(events.contains(&(DomainEvent::UpperBound, x.id())));
        assert!(events.contains(&(DomainEvent::Assign, x.id())));
    }

    #[test]
    fn world_pop_restores_integer_domains() {
        let (mut domains, mut explanations) = store();
        let x = domains.new_int(0, 10);

        domains.world_push();
        let _ = domains
            .set_lower_bound(&mut explanations, x, 3, Explanation::new())
            .unwrap();
        let _ = domains
            .remove_value(&mut explanations, x, 5, Explanation::new())
            .unwrap();
        domains.world_push();
        let _ = domains
            .set_upper_bound(&mut explanations, x, 8, Explanation::new())
            .unwrap();

        domains.world_pop(1);
        assert_eq!(3, domains.lower_bound(x));
        assert_eq!(10, domains.upper_bound(x));
        assert!(!domains.contains(x, 5));

        domains.world_pop(0);
        assert_eq!(0, domains.lower_bound(x));
        assert!(domains.contains(x, 5));
    }

    #[test]
    fn kernel_additions_are_trailed() {
        let (mut domains, mut explanations) = store();
        let s = domains.new_set([1, 2, 3]);

        domains.world_push();
        let _ = domains
            .add_to_kernel(&mut explanations, s, 2, Explanation::new())
            .unwrap();
        assert!(domains.kernel_contains(s, 2));

        domains.world_pop(0);
        assert!(!domains.kernel_contains(s, 2));
        assert!(domains.envelope_contains(s, 2));
    }

    #[test]
    fn adding_a_removed_element_to_the_kernel_conflicts() {
        let (mut domains, mut explanations) = store();
        let s = domains.new_set([1, 2]);

        let _ = domains
            .remove_from_envelope(&mut explanations, s, 2, Explanation::new())
            .unwrap();
        let result = domains.add_to_kernel(&mut explanations, s, 2, Explanation::new());

        assert_eq!(Err(EmptyDomain), result);
    }

    #[test]
    fn removing_a_kernel_element_from_the_envelope_conflicts() {
        let (mut domains, mut explanations) = store();
        let s = domains.new_set([1, 2]);

        let _ = domains
            .add_to_kernel(&mut explanations, s, 1, Explanation::new())
            .unwrap();
        let result = domains.remove_from_envelope(&mut explanations, s, 1, Explanation::new());

        assert_eq!(Err(EmptyDomain), result);
    }

    #[test]
    fn arc_removal_updates_both_adjacency_directions_and_is_trailed() {
        let (mut domains, mut explanations) = store();
        let g = domains.new_graph(3, [Arc::new(0, 1), Arc::new(1, 2)]);

        domains.world_push();
        let _ = domains
            .remove_arc(&mut explanations, g, Arc::new(0, 1), Explanation::new())
            .unwrap();

        assert!(!domains.arc_in_envelope(g, Arc::new(0, 1)));
        assert!(domains.predecessors_of(g, 1).next().is_none());

        domains.world_pop(0);
        assert!(domains.arc_in_envelope(g, Arc::new(0, 1)));
        assert_eq!(vec![0], domains.predecessors_of(g, 1).collect::<Vec<_>>());
    }

    #[test]
    fn domain_deductions_report_only_actual_narrowings() {
        let (mut domains, mut explanations) = store();
        let x = domains.new_int(0, 10);

        assert!(domains.domain_deductions(x.id()).is_empty());

        let _ = domains
            .set_lower_bound(&mut explanations, x, 2, Explanation::new())
            .unwrap();
        let _ = domains
            .remove_value(&mut explanations, x, 5, Explanation::new())
            .unwrap();

        let deductions = domains.domain_deductions(x.id());
        assert!(deductions.contains(&Deduction::Fact(Fact::LowerBound {
            variable: x.id(),
            bound: 2,
        })));
        assert!(deductions.contains(&Deduction::Fact(Fact::Removal {
            variable: x.id(),
            value: 5,
        })));
        assert_eq!(2, deductions.len());
    }
}
