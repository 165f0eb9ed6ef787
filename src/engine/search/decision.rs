use std::fmt::Display;
use std::fmt::Formatter;

use crate::engine::variables::Arc;
use crate::engine::variables::GraphVariable;
use crate::engine::variables::IntVariable;
use crate::engine::variables::SetVariable;

/// A monotonically increasing decision identifier; ids are never reused, so a
/// deduction referring to a discarded decision can never be confused with a
/// later one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecisionId(u32);

impl DecisionId {
    pub(crate) fn new(id: u32) -> Self {
        DecisionId(id)
    }
}

impl Display for DecisionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// The choice a decision branches on. The positive branch applies the choice;
/// the refutation excludes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    IntAssign { variable: IntVariable, value: i32 },
    SetMember { variable: SetVariable, element: i32 },
    GraphArc { variable: GraphVariable, arc: Arc },
}

impl Display for Choice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Choice::IntAssign { variable, value } => write!(f, "{variable} = {value}"),
            Choice::SetMember { variable, element } => write!(f, "{element} in {variable}"),
            Choice::GraphArc { variable, arc } => write!(f, "{variable} has {arc}"),
        }
    }
}

/// A node of the decision tree. The root is not represented: it is the empty
/// decision stack, and it is never refuted.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Decision {
    pub(crate) id: DecisionId,
    /// The world the positive branch was applied in.
    pub(crate) world: u32,
    pub(crate) choice: Choice,
    /// True while the refutation has not been tried yet.
    pub(crate) has_next: bool,
}
