use enumset::enum_set;
use enumset::EnumSet;

use crate::basic_types::Conflict;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::backtrackable::BacktrackableInt;
use crate::engine::backtrackable::Environment;
use crate::engine::explanation::Deduction;
use crate::engine::explanation::Explanation;
use crate::engine::explanation::Fact;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Propagator;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::IntVariable;
use crate::engine::variables::VariableId;
use crate::engine::DomainEvent;

const LOCAL_GRAPH: LocalId = LocalId::from(0);
const LOCAL_OBJECTIVE: LocalId = LocalId::from(1);

/// Bounds an objective variable by the cost of selecting one successor arc per
/// node.
///
/// For every node the cheapest and dearest envelope successor are tracked in
/// backtrackable cells; their sums bound the objective from below and above. An
/// arc is pruned when replacing its node's cheapest successor with it would
/// already push the lower sum past the objective's upper bound. The coarse
/// [`Propagator::propagate`] recomputes the cells from scratch on every wake;
/// [`Propagator::propagate_incremental`] only re-scans nodes whose tracked
/// extremes left the envelope, with identical filtering.
#[derive(Debug)]
pub struct SumArcCostsPropagator {
    graph: GraphVariable,
    objective: IntVariable,
    costs: Vec<Vec<i32>>,
    cheapest_successor: Vec<BacktrackableInt>,
    dearest_successor: Vec<BacktrackableInt>,
    min_sum: BacktrackableInt,
    max_sum: BacktrackableInt,
}

impl SumArcCostsPropagator {
    /// `costs[i][j]` is the cost of the arc from node `i` to node `j`; entries
    /// for arcs outside the initial envelope are never read.
    pub fn new(
        graph: GraphVariable,
        objective: IntVariable,
        costs: Vec<Vec<i32>>,
        environment: &mut Environment,
    ) -> Self {
        let num_nodes = costs.len();
        SumArcCostsPropagator {
            graph,
            objective,
            cheapest_successor: (0..num_nodes).map(|_| environment.make_int(0)).collect(),
            dearest_successor: (0..num_nodes).map(|_| environment.make_int(0)).collect(),
            min_sum: environment.make_int(0),
            max_sum: environment.make_int(0),
            costs,
        }
    }

    /// The cheapest and dearest envelope successor of `node`, or `None` when
    /// the node has no successor left.
    fn cost_extremes(&self, context: &PropagationContext<'_>, node: usize) -> Option<(u32, u32)> {
        let row = &self.costs[node];
        let mut cheapest: Option<u32> = None;
        let mut dearest: Option<u32> = None;

        for successor in context.successors_of(self.graph, node as u32) {
            let cost = row[successor as usize];
            if cheapest.map_or(true, |current| cost < row[current as usize]) {
                cheapest = Some(successor);
            }
            if dearest.map_or(true, |current| cost > row[current as usize]) {
                dearest = Some(successor);
            }
        }
        Some((cheapest?, dearest?))
    }

    fn no_successor_conflict(&self, context: &PropagationContextMut<'_>) -> Inconsistency {
        Inconsistency::Conflict(Conflict {
            variable: Some(self.graph.id()),
            explanation: context.domain_deductions(self.graph.id()),
        })
    }

    /// Apply the objective bounds implied by the current sums, then prune
    /// every arc whose selection would exceed the objective's upper bound.
    fn tighten_and_prune(&self, context: &mut PropagationContextMut<'_>) -> PropagationStatus {
        let min_sum = context.read_backtrackable(self.min_sum) as i32;
        let max_sum = context.read_backtrackable(self.max_sum) as i32;
        let graph_reason = context.domain_deductions(self.graph.id());

        let _ = context.set_lower_bound(self.objective, min_sum, graph_reason.clone())?;
        let _ = context.set_upper_bound(self.objective, max_sum, graph_reason.clone())?;

        let objective_bound = context.upper_bound(self.objective);
        let num_nodes = context.num_nodes(self.graph) as usize;

        let mut removable = Vec::new();
        for node in 0..num_nodes {
            let cheapest = context.read_backtrackable(self.cheapest_successor[node]) as usize;
            let cheapest_cost = self.costs[node][cheapest];

            for successor in context.successors_of(self.graph, node as u32) {
                let cost = self.costs[node][successor as usize];
                if min_sum - objective_bound > cheapest_cost - cost {
                    removable.push(Arc {
                        from: node as u32,
                        to: successor,
                    });
                }
            }
        }

        let mut reason = Explanation::from(Deduction::Fact(Fact::UpperBound {
            variable: self.objective.id(),
            bound: objective_bound,
        }));
        reason.extend_from(&graph_reason);
        for arc in removable {
            let _ = context.remove_arc(self.graph, arc, reason.clone())?;
        }
        Ok(())
    }
}

impl Propagator for SumArcCostsPropagator {
    fn name(&self) -> &str {
        "SumArcCosts"
    }

    fn priority(&self) -> u32 {
        2
    }

    fn scope(&self) -> Vec<VariableId> {
        vec![self.graph.id(), self.objective.id()]
    }

    fn event_mask(&self, local_id: LocalId) -> EnumSet<DomainEvent> {
        if local_id == LOCAL_GRAPH {
            DomainEvent::ANY_GRAPH
        } else {
            enum_set!(DomainEvent::UpperBound | DomainEvent::Assign)
        }
    }

    fn propagate(
        &mut self,
        context: &mut PropagationContextMut<'_>,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        let num_nodes = context.num_nodes(self.graph) as usize;
        let mut min_sum = 0;
        let mut max_sum = 0;

        for node in 0..num_nodes {
            let Some((cheapest, dearest)) = self.cost_extremes(&context.as_readonly(), node)
            else {
                return Err(self.no_successor_conflict(context));
            };

            context.write_backtrackable(self.cheapest_successor[node], i64::from(cheapest));
            context.write_backtrackable(self.dearest_successor[node], i64::from(dearest));
            min_sum += self.costs[node][cheapest as usize];
            max_sum += self.costs[node][dearest as usize];
        }

        context.write_backtrackable(self.min_sum, i64::from(min_sum));
        context.write_backtrackable(self.max_sum, i64::from(max_sum));

        self.tighten_and_prune(context)
    }

    fn propagate_incremental(
        &mut self,
        context: &mut PropagationContextMut<'_>,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        if local_id == LOCAL_GRAPH && events.contains(DomainEvent::RemoveArc) {
            let num_nodes = context.num_nodes(self.graph) as usize;
            let mut min_sum = context.read_backtrackable(self.min_sum) as i32;
            let mut max_sum = context.read_backtrackable(self.max_sum) as i32;

            for node in 0..num_nodes {
                let from = node as u32;
                let cheapest = context.read_backtrackable(self.cheapest_successor[node]) as u32;
                let dearest = context.read_backtrackable(self.dearest_successor[node]) as u32;

                let cheapest_gone =
                    !context.arc_in_envelope(self.graph, Arc { from, to: cheapest });
                let dearest_gone = !context.arc_in_envelope(self.graph, Arc { from, to: dearest });
                if !cheapest_gone && !dearest_gone {
                    continue;
                }

                let Some((new_cheapest, new_dearest)) =
                    self.cost_extremes(&context.as_readonly(), node)
                else {
                    return Err(self.no_successor_conflict(context));
                };

                let row = &self.costs[node];
                min_sum += row[new_cheapest as usize] - row[cheapest as usize];
                max_sum += row[new_dearest as usize] - row[dearest as usize];
                context.write_backtrackable(self.cheapest_successor[node], i64::from(new_cheapest));
                context.write_backtrackable(self.dearest_successor[node], i64::from(new_dearest));
            }

            context.write_backtrackable(self.min_sum, i64::from(min_sum));
            context.write_backtrackable(self.max_sum, i64::from(max_sum));
        }

        self.tighten_and_prune(context)
    }
}
