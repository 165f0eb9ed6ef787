use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::basic_types::KeyedVec;

/// Owns the registered propagators, indexed by [`PropagatorId`].
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

impl PropagatorStore {
    pub(crate) fn alloc(&mut self, propagator: Box<dyn Propagator>) -> PropagatorId {
        self.propagators.push(propagator)
    }

    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = Box<dyn Propagator>;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        &self.propagators[index]
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        &mut self.propagators[index]
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|propagator| propagator.name()))
            .finish()
    }
}
