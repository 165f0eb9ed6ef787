use enumset::EnumSet;

use crate::basic_types::Conflict;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatus;
use crate::engine::explanation::Explanation;
use crate::engine::explanation::Fact;
use crate::engine::propagation::Entailment;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::PropagationContext;
use crate::engine::propagation::PropagationContextMut;
use crate::engine::propagation::Propagator;
use crate::engine::variables::IntVariable;
use crate::engine::variables::SetVariable;
use crate::engine::variables::VariableId;
use crate::engine::DomainEvent;

const LOCAL_SET: LocalId = LocalId::from(0);

/// Channels an integer variable to the minimum weight among the members of a
/// set variable.
///
/// The weight of an element is the element itself, or its entry in a supplied
/// table indexed from `offset`. Kernel members cap `min` from above; envelope
/// elements whose weight is below `min`'s lower bound can never be the minimum
/// and are removed; the smallest weight left in the envelope caps `min` from
/// below.
#[derive(Debug)]
pub struct SetMinElementPropagator {
    set: SetVariable,
    min: IntVariable,
    weights: Option<Vec<i32>>,
    offset: i32,
}

impl SetMinElementPropagator {
    /// Weights are the elements themselves.
    pub fn new(set: SetVariable, min: IntVariable) -> Self {
        SetMinElementPropagator {
            set,
            min,
            weights: None,
            offset: 0,
        }
    }

    /// Element `j` weighs `weights[j - offset]`; elements outside the table
    /// are removed from the envelope.
    pub fn with_weights(set: SetVariable, min: IntVariable, weights: Vec<i32>, offset: i32) -> Self {
        SetMinElementPropagator {
            set,
            min,
            weights: Some(weights),
            offset,
        }
    }

    fn weight(&self, element: i32) -> i32 {
        match &self.weights {
            Some(weights) => weights[(element - self.offset) as usize],
            None => element,
        }
    }

    fn in_table(&self, element: i32) -> bool {
        match &self.weights {
            Some(weights) => {
                let index = element - self.offset;
                index >= 0 && (index as usize) < weights.len()
            }
            None => true,
        }
    }
}

impl Propagator for SetMinElementPropagator {
    fn name(&self) -> &str {
        "SetMinElement"
    }

    fn priority(&self) -> u32 {
        1
    }

    fn scope(&self) -> Vec<VariableId> {
        vec![self.set.id(), self.min.id()]
    }

    fn event_mask(&self, local_id: LocalId) -> EnumSet<DomainEvent> {
        if local_id == LOCAL_SET {
            DomainEvent::ANY_SET
        } else {
            DomainEvent::INT_BOUNDS | DomainEvent::Assign
        }
    }

    fn propagate(
        &mut self,
        context: &mut PropagationContextMut<'_>,
        _events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        let kernel: Vec<i32> = context.kernel_iter(self.set).collect();
        for element in kernel {
            let reason = Explanation::from(Fact::KernelAddition {
                variable: self.set.id(),
                element,
            });
            let _ = context.set_upper_bound(self.min, self.weight(element), reason)?;
        }

        let lower_bound = context.lower_bound(self.min);
        let envelope: Vec<i32> = context.envelope_iter(self.set).collect();
        for element in envelope {
            if !self.in_table(element) {
                let _ = context.remove_from_envelope(self.set, element, Explanation::new())?;
                continue;
            }
            if self.weight(element) < lower_bound && !context.kernel_contains(self.set, element) {
                let reason = Explanation::from(Fact::LowerBound {
                    variable: self.min.id(),
                    bound: lower_bound,
                });
                let _ = context.remove_from_envelope(self.set, element, reason)?;
            }
        }

        let smallest = context
            .envelope_iter(self.set)
            .map(|element| self.weight(element))
            .min();
        let Some(smallest) = smallest else {
            return Err(Inconsistency::Conflict(Conflict {
                variable: Some(self.set.id()),
                explanation: context.domain_deductions(self.set.id()),
            }));
        };

        let reason = context.domain_deductions(self.set.id());
        let _ = context.set_lower_bound(self.min, smallest, reason)?;
        Ok(())
    }

    fn is_entailed(&self, context: PropagationContext<'_>) -> Entailment {
        let lower_bound = context.lower_bound(self.min);
        let kernel_violated = context
            .kernel_iter(self.set)
            .any(|element| !self.in_table(element) || self.weight(element) < lower_bound);
        if kernel_violated {
            return Entailment::False;
        }

        let smallest = context
            .envelope_iter(self.set)
            .filter(|&element| self.in_table(element))
            .map(|element| self.weight(element))
            .min();
        match smallest {
            None => Entailment::False,
            Some(weight) if weight > context.upper_bound(self.min) => Entailment::False,
            Some(weight) => {
                if context.is_set_fixed(self.set) && context.is_int_fixed(self.min) {
                    if context.lower_bound(self.min) == weight {
                        Entailment::True
                    } else {
                        Entailment::False
                    }
                } else {
                    Entailment::Undefined
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn kernel_members_cap_the_minimum_from_above() {
        let mut solver = TestSolver::default();
        let set = solver.new_set(0..=3);
        let min = solver.new_int(-5, 5);
        solver.add_to_kernel(set, 1);
        let mut propagator = SetMinElementPropagator::new(set, min);

        solver.propagate(&mut propagator).unwrap();

        solver.assert_bounds(min, 0, 1);
        assert!(solver.domains.envelope_contains(set, 2));
        assert!(solver.domains.envelope_contains(set, 3));
    }

    #[test]
    fn a_kernel_member_below_the_lower_bound_is_a_conflict() {
        let mut solver = TestSolver::default();
        let set = solver.new_set(0..=3);
        let min = solver.new_int(2, 5);
        solver.add_to_kernel(set, 1);
        let mut propagator = SetMinElementPropagator::new(set, min);

        let status = solver.propagate(&mut propagator);

        assert!(matches!(status, Err(Inconsistency::EmptyDomain)));
    }

    #[test]
    fn envelope_elements_below_the_lower_bound_are_removed() {
        let mut solver = TestSolver::default();
        let set = solver.new_set(0..=3);
        let min = solver.new_int(2, 5);
        solver.add_to_kernel(set, 3);
        let mut propagator = SetMinElementPropagator::new(set, min);

        solver.propagate(&mut propagator).unwrap();

        assert!(!solver.domains.envelope_contains(set, 0));
        assert!(!solver.domains.envelope_contains(set, 1));
        solver.assert_bounds(min, 2, 3);
    }

    #[test]
    fn a_weight_table_replaces_the_identity_weights() {
        let mut solver = TestSolver::default();
        let set = solver.new_set(1..=3);
        let min = solver.new_int(3, 10);
        let mut propagator = SetMinElementPropagator::with_weights(set, min, vec![5, 1, 7], 1);

        solver.propagate(&mut propagator).unwrap();

        assert!(!solver.domains.envelope_contains(set, 2));
        solver.assert_bounds(min, 5, 10);
    }

    #[test]
    fn an_empty_envelope_is_a_conflict() {
        let mut solver = TestSolver::default();
        let set = solver.new_set(std::iter::empty::<i32>());
        let min = solver.new_int(0, 10);
        let mut propagator = SetMinElementPropagator::new(set, min);

        let status = solver.propagate(&mut propagator);

        assert!(matches!(status, Err(Inconsistency::Conflict(_))));
    }

    #[test]
    fn a_consistent_fixed_pair_is_entailed() {
        let mut solver = TestSolver::default();
        let set = solver.new_set([2, 4]);
        let min = solver.new_int(2, 2);
        solver.add_to_kernel(set, 2);
        solver.add_to_kernel(set, 4);
        let propagator = SetMinElementPropagator::new(set, min);

        assert_eq!(Entailment::True, solver.is_entailed(&propagator));
    }

    #[test]
    fn an_unreachable_upper_bound_falsifies_the_constraint() {
        let mut solver = TestSolver::default();
        let set = solver.new_set([7, 9]);
        let min = solver.new_int(0, 5);
        let propagator = SetMinElementPropagator::new(set, min);

        assert_eq!(Entailment::False, solver.is_entailed(&propagator));
    }

    #[test]
    fn entailment_is_undefined_while_the_set_is_open() {
        let mut solver = TestSolver::default();
        let set = solver.new_set(0..=3);
        let min = solver.new_int(0, 3);
        let propagator = SetMinElementPropagator::new(set, min);

        assert_eq!(Entailment::Undefined, solver.is_entailed(&propagator));
    }
}
