use enumset::enum_set;
use enumset::EnumSet;

use super::dominators::immediate_dominators;
use crate::basic_types::Conflict;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::propagation::Entailment;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Propagator;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::VariableId;
use crate::engine::DomainEvent;

/// Filters a graph variable so that every remaining envelope arc can still be
/// part of an arborescence.
///
/// An auxiliary graph is built from the envelope arcs, with a virtual source
/// pointing at every node that has no envelope predecessor. An arc (x, y) that
/// would run from a node back to one of its dominators closes a cycle on every
/// path from the source and is removed. If the source cannot reach every node,
/// no arborescence exists and the propagator fails.
#[derive(Debug)]
pub struct ArborescencesPropagator {
    graph: GraphVariable,
}

impl ArborescencesPropagator {
    pub fn new(graph: GraphVariable) -> Self {
        ArborescencesPropagator { graph }
    }
}

/// The envelope of `graph` plus a virtual source (index `num_nodes`) with an
/// arc to every node that has no envelope predecessor.
fn auxiliary_graph(context: &PropagationContext<'_>, graph: GraphVariable) -> Vec<Vec<usize>> {
    let num_nodes = context.num_nodes(graph) as usize;

    let mut successors: Vec<Vec<usize>> = (0..num_nodes)
        .map(|node| {
            context
                .successors_of(graph, node as u32)
                .map(|successor| successor as usize)
                .collect()
        })
        .collect();

    let source_arcs = (0..num_nodes)
        .filter(|&node| context.predecessors_of(graph, node as u32).next().is_none())
        .collect();
    successors.push(source_arcs);

    successors
}

/// The envelope arcs that run from a node to one of its dominators.
fn dominated_arcs(
    context: &PropagationContext<'_>,
    graph: GraphVariable,
) -> Result<Vec<Arc>, Conflict> {
    let successors = auxiliary_graph(context, graph);
    let virtual_source = successors.len() - 1;

    let Some(dominators) = immediate_dominators(&successors, virtual_source) else {
        return Err(Conflict {
            variable: Some(graph.id()),
            explanation: context.domain_deductions(graph.id()),
        });
    };

    let mut removable = Vec::new();
    for (from, adjacent) in successors.iter().enumerate().take(virtual_source) {
        for &to in adjacent {
            if dominators.is_dominated_by(from, to) {
                removable.push(Arc {
                    from: from as u32,
                    to: to as u32,
                });
            }
        }
    }
    Ok(removable)
}

impl Propagator for ArborescencesPropagator {
    fn name(&self) -> &str {
        "Arborescences"
    }

    fn priority(&self) -> u32 {
        4
    }

    fn scope(&self) -> Vec<VariableId> {
        vec![self.graph.id()]
    }

    fn event_mask(&self, _local_id: LocalId) -> EnumSet<DomainEvent> {
        enum_set!(DomainEvent::RemoveArc)
    }

    fn propagate(
        &mut self,
        context: &mut PropagationContextMut<'_>,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        let removable = dominated_arcs(&context.as_readonly(), self.graph)
            .map_err(Inconsistency::Conflict)?;

        let reason = context.domain_deductions(self.graph.id());
        for arc in removable {
            let _ = context.remove_arc(self.graph, arc, reason.clone())?;
        }
        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext<'_>) -> Entailment {
        if !context.is_graph_fixed(self.graph) {
            return Entailment::Undefined;
        }

        match dominated_arcs(&context, self.graph) {
            Err(_) => Entailment::False,
            Ok(removable) if !removable.is_empty() => Entailment::False,
            Ok(_) => Entailment::True,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::explanation::Explanation;
    use crate::engine::test_solver::TestSolver;

    fn arcs(pairs: &[(u32, u32)]) -> Vec<Arc> {
        pairs.iter().map(|&(from, to)| Arc { from, to }).collect()
    }

    #[test]
    fn a_diamond_keeps_both_paths_to_the_join() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(4, arcs(&[(0, 1), (0, 2), (1, 3), (2, 3)]));
        let mut propagator = ArborescencesPropagator::new(graph);

        solver.initialise(&mut propagator).unwrap();

        assert!(solver.domains.arc_in_envelope(graph, Arc { from: 1, to: 3 }));
        assert!(solver.domains.arc_in_envelope(graph, Arc { from: 2, to: 3 }));
        assert!(solver.domains.arc_in_envelope(graph, Arc { from: 0, to: 1 }));
        assert!(solver.domains.arc_in_envelope(graph, Arc { from: 0, to: 2 }));
    }

    #[test]
    fn an_arc_back_to_a_dominator_is_removed() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(4, arcs(&[(0, 1), (1, 2), (2, 3), (3, 1)]));
        let mut propagator = ArborescencesPropagator::new(graph);

        solver.propagate(&mut propagator).unwrap();

        assert!(!solver.domains.arc_in_envelope(graph, Arc { from: 3, to: 1 }));
        assert!(solver.domains.arc_in_envelope(graph, Arc { from: 0, to: 1 }));
        assert!(solver.domains.arc_in_envelope(graph, Arc { from: 1, to: 2 }));
        assert!(solver.domains.arc_in_envelope(graph, Arc { from: 2, to: 3 }));
    }

    #[test]
    fn a_graph_where_every_node_has_a_predecessor_fails() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(2, arcs(&[(0, 1), (1, 0)]));
        let mut propagator = ArborescencesPropagator::new(graph);

        let status = solver.propagate(&mut propagator);

        assert!(matches!(status, Err(Inconsistency::Conflict(_))));
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(4, arcs(&[(0, 1), (1, 2), (2, 3), (3, 1)]));
        let mut propagator = ArborescencesPropagator::new(graph);

        solver.propagate(&mut propagator).unwrap();
        let events_before: Vec<_> = solver.domains.drain_events();
        solver.propagate(&mut propagator).unwrap();

        assert!(!events_before.is_empty());
        assert!(solver.domains.drain_events().is_empty());
    }

    #[test]
    fn entailment_is_undefined_until_the_graph_is_fixed() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(3, arcs(&[(0, 1), (1, 2), (0, 2)]));
        let propagator = ArborescencesPropagator::new(graph);

        assert_eq!(Entailment::Undefined, solver.is_entailed(&propagator));
    }

    #[test]
    fn a_fixed_chain_is_entailed() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(3, arcs(&[(0, 1), (1, 2)]));
        let propagator = ArborescencesPropagator::new(graph);

        for arc in arcs(&[(0, 1), (1, 2)]) {
            let _ = solver
                .domains
                .enforce_arc(&mut solver.explanations, graph, arc, Explanation::new())
                .unwrap();
        }

        let context = solver.context_mut();
        assert!(context.arc_in_kernel(graph, Arc { from: 0, to: 1 }));
        assert_eq!(2, context.kernel_arcs(graph).count());

        assert_eq!(Entailment::True, solver.is_entailed(&propagator));
    }

    #[test]
    fn a_fixed_cycle_is_falsified() {
        let mut solver = TestSolver::default();
        let graph = solver.new_graph(2, arcs(&[(0, 1), (1, 0)]));
        let propagator = ArborescencesPropagator::new(graph);

        for arc in arcs(&[(0, 1), (1, 0)]) {
            let _ = solver
                .domains
                .enforce_arc(&mut solver.explanations, graph, arc, Explanation::new())
                .unwrap();
        }

        assert_eq!(Entailment::False, solver.is_entailed(&propagator));
    }
}
