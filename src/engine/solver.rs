use std::fmt::Debug;
use std::fmt::Formatter;

use enumset::EnumSet;
use log::debug;

use super::backtrackable::Environment;
use super::domain_events::DomainEvent;
use super::domain_store::DomainStore;
use super::propagator_queue::PropagatorQueue;
use super::watch_list::WatchList;
use crate::basic_types::Contradiction;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Inconsistency;
use crate::basic_types::KeyedVec;
use crate::basic_types::UsageError;
use crate::engine::explanation::Deduction;
use crate::engine::explanation::Explanation;
use crate::engine::explanation::ExplanationStore;
use crate::engine::propagation::Entailment;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorId;
use crate::engine::propagation::PropagatorStore;
use crate::engine::search::backjump_distance;
use crate::engine::search::Brancher;
use crate::engine::search::Choice;
use crate::engine::search::Decision;
use crate::engine::search::DecisionId;
use crate::engine::search::InputOrderBrancher;
use crate::engine::search::SearchMonitor;
use crate::engine::search::SearchStatistics;
use crate::engine::variables::Arc;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::IntVariable;
use crate::engine::variables::SetVariable;
use crate::quince_asserts::quince_assert_moderate;

const NUM_PRIORITY_LEVELS: u32 = 5;

/// The result of a [`Solver::solve`] call.
///
/// `Unsatisfiable` means no solution exists beyond those already enumerated;
/// on the first call it means the problem is infeasible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveResult {
    Satisfiable,
    Unsatisfiable,
    LimitReached,
}

/// The propagation-and-search engine.
///
/// Usage: create variables, register propagators, then call [`Solver::solve`].
/// A `Satisfiable` result leaves the domains at the solution; calling
/// [`Solver::solve`] again resumes the search for the next solution.
pub struct Solver {
    domains: DomainStore,
    explanations: ExplanationStore,
    environment: Environment,
    propagators: PropagatorStore,
    watch_list: WatchList,
    queue: PropagatorQueue,
    /// Events accumulated per pending propagator since it last ran.
    pending_events: KeyedVec<PropagatorId, EnumSet<DomainEvent>>,
    decisions: Vec<Decision>,
    next_decision_id: u32,
    brancher: Box<dyn Brancher>,
    monitors: Vec<Box<dyn SearchMonitor>>,
    statistics: SearchStatistics,
    node_limit: Option<u64>,
    fail_limit: Option<u64>,
    started: bool,
    exhausted: bool,
    after_solution: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Solver {
            domains: DomainStore::default(),
            explanations: ExplanationStore::default(),
            environment: Environment::default(),
            propagators: PropagatorStore::default(),
            watch_list: WatchList::default(),
            queue: PropagatorQueue::new(NUM_PRIORITY_LEVELS),
            pending_events: KeyedVec::default(),
            decisions: Vec::new(),
            next_decision_id: 0,
            brancher: Box::new(InputOrderBrancher),
            monitors: Vec::new(),
            statistics: SearchStatistics::default(),
            node_limit: None,
            fail_limit: None,
            started: false,
            exhausted: false,
            after_solution: false,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver::default()
    }

    // Variables and propagators.

    pub fn new_int_variable(&mut self, lower_bound: i32, upper_bound: i32) -> IntVariable {
        self.watch_list.grow();
        self.domains.new_int(lower_bound, upper_bound)
    }

    pub fn new_set_variable(&mut self, elements: impl IntoIterator<Item = i32>) -> SetVariable {
        self.watch_list.grow();
        self.domains.new_set(elements)
    }

    pub fn new_graph_variable(
        &mut self,
        num_nodes: u32,
        arcs: impl IntoIterator<Item = Arc>,
    ) -> GraphVariable {
        self.watch_list.grow();
        self.domains.new_graph(num_nodes, arcs)
    }

    /// The backtrackable environment, for propagators that allocate trailed
    /// cells before registration.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Register a propagator and run its root initialisation.
    ///
    /// An `Err` means the problem is infeasible at the root; the solver is
    /// exhausted from then on.
    pub fn add_propagator(
        &mut self,
        propagator: Box<dyn Propagator>,
    ) -> Result<PropagatorId, Contradiction> {
        let id = self.propagators.alloc(propagator);
        let _ = self.pending_events.push(EnumSet::new());
        self.watch_list.add_watches(id, self.propagators[id].as_ref());

        let status = {
            let mut context = PropagationContextMut::new(
                &mut self.domains,
                &mut self.explanations,
                &mut self.environment,
            );
            self.propagators[id].initialise_at_root(&mut context)
        };

        match status {
            Ok(()) => Ok(id),
            Err(inconsistency) => {
                self.exhausted = true;
                Err(self.contradiction_from(Some(id), inconsistency))
            }
        }
    }

    pub fn add_monitor(&mut self, monitor: Box<dyn SearchMonitor>) {
        self.monitors.push(monitor);
    }

    // Configuration.

    pub fn set_user_explanation(&mut self, retain: bool) {
        self.explanations.set_user_explanation(retain);
    }

    /// The flattened explanation of the most recent contradiction.
    pub fn user_explanation(&self) -> Result<Option<&Explanation>, UsageError> {
        self.explanations.last_explanation()
    }

    pub fn set_node_limit(&mut self, limit: Option<u64>) {
        self.node_limit = limit;
    }

    pub fn set_fail_limit(&mut self, limit: Option<u64>) {
        self.fail_limit = limit;
    }

    // Inspection.

    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Read-only view of the current domains.
    pub fn context(&self) -> PropagationContext<'_> {
        PropagationContext::new(&self.domains)
    }

    pub fn lower_bound(&self, variable: IntVariable) -> i32 {
        self.domains.lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: IntVariable) -> i32 {
        self.domains.upper_bound(variable)
    }

    /// The assigned value of `variable`, when it is fixed.
    pub fn value(&self, variable: IntVariable) -> Option<i32> {
        if self.domains.is_int_fixed(variable) {
            Some(self.domains.lower_bound(variable))
        } else {
            None
        }
    }

    pub fn current_world(&self) -> u32 {
        self.environment.current_world()
    }

    /// Side-effect-free entailment check of a registered propagator.
    pub fn is_entailed(&self, id: PropagatorId) -> Entailment {
        self.propagators[id].is_entailed(PropagationContext::new(&self.domains))
    }

    // Search.

    /// Run the search until a solution, exhaustion, or a limit.
    ///
    /// After `Satisfiable`, the domains hold the solution; the next call
    /// resumes enumeration from there.
    pub fn solve(&mut self) -> SolveResult {
        if self.exhausted {
            return SolveResult::Unsatisfiable;
        }

        if !self.started {
            self.started = true;
            // World 1 is the root: everything below it survives exhaustion.
            self.world_push_all();
        }

        if self.after_solution {
            self.after_solution = false;
            // The refutation justification was prepared when the solution was
            // found; a plain single-level backtrack performs it.
            match self.unwind(1, None) {
                Ok(true) => {}
                Ok(false) => return self.finish_exhausted(),
                Err(contradiction) => {
                    self.note_conflict(&contradiction);
                    if !self.resolve_conflict(contradiction) {
                        return self.finish_exhausted();
                    }
                }
            }
        }

        loop {
            if let Some(limit) = self.node_limit {
                if self.statistics.num_decisions >= limit {
                    self.statistics.log();
                    return SolveResult::LimitReached;
                }
            }
            if let Some(limit) = self.fail_limit {
                if self.statistics.num_conflicts >= limit {
                    self.statistics.log();
                    return SolveResult::LimitReached;
                }
            }

            match self.propagate_to_fixpoint() {
                Ok(()) => {
                    let choice = self.brancher.next_decision(&self.domains);
                    match choice {
                        Some(choice) => {
                            self.statistics.num_decisions += 1;
                            if let Err(contradiction) = self.apply_decision(choice) {
                                self.note_conflict(&contradiction);
                                if !self.resolve_conflict(contradiction) {
                                    return self.finish_exhausted();
                                }
                            }
                        }
                        None => {
                            debug!("solution found in world {}", self.current_world());
                            self.statistics.num_solutions += 1;
                            self.notify_solution();
                            self.prepare_solution_backtrack();
                            self.after_solution = true;
                            self.statistics.log();
                            return SolveResult::Satisfiable;
                        }
                    }
                }
                Err(contradiction) => {
                    self.note_conflict(&contradiction);
                    if !self.resolve_conflict(contradiction) {
                        return self.finish_exhausted();
                    }
                }
            }
        }
    }

    fn finish_exhausted(&mut self) -> SolveResult {
        self.exhausted = true;
        self.statistics.log();
        SolveResult::Unsatisfiable
    }

    // Propagation.

    fn propagate_to_fixpoint(&mut self) -> Result<(), Contradiction> {
        loop {
            self.enqueue_from_events();

            let Some(id) = self.queue.pop() else {
                return Ok(());
            };
            let events = std::mem::take(&mut self.pending_events[id]);

            let status = {
                let mut context = PropagationContextMut::new(
                    &mut self.domains,
                    &mut self.explanations,
                    &mut self.environment,
                );
                self.propagators[id].propagate(&mut context, events)
            };
            self.statistics.num_propagations += 1;

            if let Err(inconsistency) = status {
                self.queue.clear();
                for mask in self.pending_events.iter_mut() {
                    *mask = EnumSet::new();
                }
                let _ = self.domains.drain_events();
                return Err(self.contradiction_from(Some(id), inconsistency));
            }
        }
    }

    fn enqueue_from_events(&mut self) {
        for (event, variable) in self.domains.drain_events() {
            for watcher in self.watch_list.watchers_for(variable, event) {
                let priority = self.propagators[watcher.propagator].priority();
                self.queue.enqueue_propagator(watcher.propagator, priority);
                self.pending_events[watcher.propagator] |= event;
            }
        }
    }

    fn contradiction_from(
        &mut self,
        propagator: Option<PropagatorId>,
        inconsistency: Inconsistency,
    ) -> Contradiction {
        match inconsistency {
            Inconsistency::EmptyDomain => {
                let conflict = self
                    .domains
                    .take_conflict()
                    .expect("an empty domain always stores its conflict");
                Contradiction {
                    propagator,
                    variable: conflict.variable,
                    explanation: conflict.explanation,
                }
            }
            Inconsistency::Conflict(conflict) => Contradiction {
                propagator,
                variable: conflict.variable,
                explanation: conflict.explanation,
            },
        }
    }

    // Decisions and backjumping.

    fn apply_decision(&mut self, choice: Choice) -> Result<(), Contradiction> {
        self.world_push_all();
        let world = self.current_world();
        let id = DecisionId::new(self.next_decision_id);
        self.next_decision_id += 1;

        debug!("decision {id}: {choice} in world {world}");
        self.decisions.push(Decision {
            id,
            world,
            choice,
            has_next: true,
        });

        let reason = Explanation::from(Deduction::BranchLeft {
            decision: id,
            world,
        });
        let result = match choice {
            Choice::IntAssign { variable, value } => {
                self.domains
                    .instantiate(&mut self.explanations, variable, value, reason)
            }
            Choice::SetMember { variable, element } => {
                self.domains
                    .add_to_kernel(&mut self.explanations, variable, element, reason)
            }
            Choice::GraphArc { variable, arc } => {
                self.domains
                    .enforce_arc(&mut self.explanations, variable, arc, reason)
            }
        };

        match result {
            Ok(_) => Ok(()),
            Err(EmptyDomain) => Err(self.contradiction_from(None, Inconsistency::EmptyDomain)),
        }
    }

    /// Flatten, backjump and refute; returns false when the search is
    /// exhausted. A conflict raised by a refutation itself goes around the
    /// loop again.
    fn resolve_conflict(&mut self, contradiction: Contradiction) -> bool {
        let mut current = contradiction;
        loop {
            let flattened = self.explanations.flatten(&current.explanation);
            self.explanations.record_last_explanation(&flattened);

            let distance = backjump_distance(&flattened, self.current_world());
            debug!(
                "conflict in world {}: unwinding {distance} world(s), explanation {flattened}",
                self.current_world()
            );
            if distance > 1 {
                self.statistics.num_backjumps += 1;
            }

            match self.unwind(distance, Some(flattened)) {
                Ok(true) => return true,
                Ok(false) => return false,
                Err(next) => {
                    self.note_conflict(&next);
                    current = next;
                }
            }
        }
    }

    /// Pop one world per step, discarding decisions, until the distance is
    /// spent and a decision with an untried refutation is on top; then refute
    /// it. `Ok(false)` means the unwinding passed the root.
    fn unwind(
        &mut self,
        distance: u32,
        explanation: Option<Explanation>,
    ) -> Result<bool, Contradiction> {
        let mut remaining = i64::from(distance);
        loop {
            if self.decisions.is_empty() {
                self.world_pop_all(0);
                return Ok(false);
            }

            let current = self.current_world();
            self.world_pop_all(current - 1);
            remaining -= 1;

            let top = *self
                .decisions
                .last()
                .expect("the stack was checked to be non-empty");
            if remaining <= 0 && top.has_next {
                return self.refute_top(explanation).map(|()| true);
            }
            let _ = self.decisions.pop();
        }
    }

    /// Refute the top decision. `explanation` justifies the refutation; `None`
    /// keeps the justification already stored (the solution-backtrack path).
    fn refute_top(&mut self, explanation: Option<Explanation>) -> Result<(), Contradiction> {
        let top = self
            .decisions
            .last_mut()
            .expect("refutation requires a decision");
        assert!(
            top.has_next,
            "backjumping landed on the already-refuted decision {}",
            top.id
        );
        top.has_next = false;
        let id = top.id;
        let world = top.world;
        let choice = top.choice;

        let right = Deduction::BranchRight { decision: id };
        if let Some(mut explanation) = explanation {
            // The decision's own positive branch does not justify its
            // refutation.
            explanation.remove(&Deduction::BranchLeft {
                decision: id,
                world,
            });
            self.explanations.store(right, explanation);
        }

        self.world_push_all();
        debug!("refuting {id}: not({choice}) in world {}", self.current_world());

        let reason = Explanation::from(right);
        let result = match choice {
            Choice::IntAssign { variable, value } => {
                self.domains
                    .remove_value(&mut self.explanations, variable, value, reason)
            }
            Choice::SetMember { variable, element } => {
                self.domains
                    .remove_from_envelope(&mut self.explanations, variable, element, reason)
            }
            Choice::GraphArc { variable, arc } => {
                self.domains
                    .remove_arc(&mut self.explanations, variable, arc, reason)
            }
        };

        match result {
            Ok(_) => Ok(()),
            Err(EmptyDomain) => Err(self.contradiction_from(None, Inconsistency::EmptyDomain)),
        }
    }

    /// Justify the upcoming refutation of the deepest unrefuted decision by
    /// the positive branches on the path to it, so later conflicts citing the
    /// refutation still reach those decisions.
    fn prepare_solution_backtrack(&mut self) {
        let Some(anchor_index) = self.decisions.iter().rposition(|d| d.has_next) else {
            return;
        };

        let anchor = self.decisions[anchor_index];
        let justification: Explanation = self.decisions[..anchor_index]
            .iter()
            .filter(|decision| decision.has_next)
            .map(|decision| Deduction::BranchLeft {
                decision: decision.id,
                world: decision.world,
            })
            .collect();

        self.explanations.store(
            Deduction::BranchRight {
                decision: anchor.id,
            },
            justification,
        );
    }

    fn note_conflict(&mut self, contradiction: &Contradiction) {
        self.statistics.num_conflicts += 1;
        let mut monitors = std::mem::take(&mut self.monitors);
        for monitor in monitors.iter_mut() {
            monitor.on_contradiction(contradiction);
        }
        self.monitors = monitors;
    }

    fn notify_solution(&mut self) {
        let mut monitors = std::mem::take(&mut self.monitors);
        for monitor in monitors.iter_mut() {
            monitor.on_solution();
        }
        self.monitors = monitors;
    }

    // Worlds.

    fn world_push_all(&mut self) {
        self.domains.world_push();
        self.environment.world_push();
    }

    fn world_pop_all(&mut self, to_world: u32) {
        self.domains.world_pop(to_world);
        self.environment.world_pop(to_world);
        quince_assert_moderate!(self.domains.current_world() == self.environment.current_world());
    }
}

impl Debug for Solver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("num_variables", &self.domains.num_variables())
            .field("num_propagators", &self.propagators.num_propagators())
            .field("world", &self.current_world())
            .field("num_decisions_on_stack", &self.decisions.len())
            .finish_non_exhaustive()
    }
}
