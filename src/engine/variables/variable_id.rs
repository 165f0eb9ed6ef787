use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::StorageKey;

/// An identifier in the single id space shared by all variable kinds.
///
/// The watch list, the scope of a propagator, and explanations all refer to
/// variables through this untyped id; the typed handles below are thin
/// wrappers used by the narrowing interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    pub id: u32,
}

impl VariableId {
    pub(crate) fn new(id: u32) -> Self {
        VariableId { id }
    }
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// Handle to an integer variable with interval-plus-holes domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntVariable {
    id: VariableId,
}

impl IntVariable {
    pub(crate) fn new(id: VariableId) -> Self {
        IntVariable { id }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }
}

impl Display for IntVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Handle to a set variable with kernel/envelope domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SetVariable {
    id: VariableId,
}

impl SetVariable {
    pub(crate) fn new(id: VariableId) -> Self {
        SetVariable { id }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }
}

impl Display for SetVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Handle to a directed-graph variable with kernel/envelope arc sets over a
/// fixed node count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphVariable {
    id: VariableId,
}

impl GraphVariable {
    pub(crate) fn new(id: VariableId) -> Self {
        GraphVariable { id }
    }

    pub fn id(&self) -> VariableId {
        self.id
    }
}

impl Display for GraphVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
