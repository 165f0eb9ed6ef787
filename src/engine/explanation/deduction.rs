use std::fmt::Display;
use std::fmt::Formatter;

use crate::engine::search::DecisionId;
use crate::engine::variables::Arc;
use crate::engine::variables::VariableId;

/// An atomic domain narrowing, phrased over the untyped variable id space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fact {
    LowerBound { variable: VariableId, bound: i32 },
    UpperBound { variable: VariableId, bound: i32 },
    Removal { variable: VariableId, value: i32 },
    KernelAddition { variable: VariableId, element: i32 },
    EnvelopeRemoval { variable: VariableId, element: i32 },
    ArcEnforced { variable: VariableId, arc: Arc },
    ArcRemoved { variable: VariableId, arc: Arc },
}

/// An atomic unit of reasoning tracked by the explanation store.
///
/// `BranchLeft` is the positive branch of a decision and is never justified by
/// anything else: flattening stops at it. `BranchRight` is the refutation of a
/// decision; conflict-based backjumping stores a justification for it when the
/// refutation happens. A `Fact` is justified by whatever reason the narrowing
/// that produced it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Deduction {
    BranchLeft { decision: DecisionId, world: u32 },
    BranchRight { decision: DecisionId },
    Fact(Fact),
}

impl From<Fact> for Deduction {
    fn from(fact: Fact) -> Self {
        Deduction::Fact(fact)
    }
}

impl Display for Fact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Fact::LowerBound { variable, bound } => write!(f, "[{variable} >= {bound}]"),
            Fact::UpperBound { variable, bound } => write!(f, "[{variable} <= {bound}]"),
            Fact::Removal { variable, value } => write!(f, "[{variable} != {value}]"),
            Fact::KernelAddition { variable, element } => write!(f, "[{element} in {variable}]"),
            Fact::EnvelopeRemoval { variable, element } => {
                write!(f, "[{element} notin {variable}]")
            }
            Fact::ArcEnforced { variable, arc } => write!(f, "[{variable} has {arc}]"),
            Fact::ArcRemoved { variable, arc } => write!(f, "[{variable} drops {arc}]"),
        }
    }
}

impl Display for Deduction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Deduction::BranchLeft { decision, world } => write!(f, "{decision}@{world}"),
            Deduction::BranchRight { decision } => write!(f, "!{decision}"),
            Deduction::Fact(fact) => write!(f, "{fact}"),
        }
    }
}
