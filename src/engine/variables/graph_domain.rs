use std::collections::BTreeSet;
use std::fmt::Display;
use std::fmt::Formatter;

/// A directed arc between two nodes of a graph variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Arc {
    pub from: u32,
    pub to: u32,
}

impl Arc {
    pub fn new(from: u32, to: u32) -> Self {
        Arc { from, to }
    }
}

impl Display for Arc {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// A directed-graph domain over a fixed node count: the kernel holds arcs
/// known to be in the graph, the envelope holds arcs that may still be.
///
/// The envelope is kept as successor and predecessor adjacency so propagators
/// can iterate either direction without scanning all arcs. Invariant: the
/// kernel is a subset of the envelope, and both adjacency directions agree.
#[derive(Clone, Debug)]
pub(crate) struct GraphDomain {
    pub(crate) num_nodes: u32,
    pub(crate) envelope_successors: Vec<BTreeSet<u32>>,
    pub(crate) envelope_predecessors: Vec<BTreeSet<u32>>,
    pub(crate) kernel: BTreeSet<Arc>,
    pub(crate) initial_arcs: Vec<Arc>,
}

impl GraphDomain {
    pub(crate) fn new(num_nodes: u32, arcs: impl IntoIterator<Item = Arc>) -> Self {
        let mut envelope_successors = vec![BTreeSet::new(); num_nodes as usize];
        let mut envelope_predecessors = vec![BTreeSet::new(); num_nodes as usize];
        let mut initial_arcs = Vec::new();

        for arc in arcs {
            if envelope_successors[arc.from as usize].insert(arc.to) {
                let _ = envelope_predecessors[arc.to as usize].insert(arc.from);
                initial_arcs.push(arc);
            }
        }

        GraphDomain {
            num_nodes,
            envelope_successors,
            envelope_predecessors,
            kernel: BTreeSet::new(),
            initial_arcs,
        }
    }

    pub(crate) fn envelope_contains(&self, arc: Arc) -> bool {
        self.envelope_successors[arc.from as usize].contains(&arc.to)
    }

    pub(crate) fn num_envelope_arcs(&self) -> usize {
        self.envelope_successors
            .iter()
            .map(|successors| successors.len())
            .sum()
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.kernel.len() == self.num_envelope_arcs()
    }
}
