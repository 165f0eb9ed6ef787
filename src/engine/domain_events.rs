use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// A change to a variable domain, as observed by the watch list.
///
/// The first four events are raised by integer domains, the next two by set
/// domains, the last two by graph domains. `Assign` is raised in addition to
/// the bound event that fixed the domain.
#[derive(Debug, EnumSetType)]
pub enum DomainEvent {
    /// The lower bound of an integer variable was tightened.
    LowerBound,
    /// The upper bound of an integer variable was tightened.
    UpperBound,
    /// A value strictly inside the bounds of an integer variable was removed.
    Removal,
    /// An integer variable became fixed.
    Assign,
    /// An element was added to the kernel of a set variable.
    AddToKernel,
    /// An element was removed from the envelope of a set variable.
    RemoveFromEnvelope,
    /// An arc was added to the kernel of a graph variable.
    EnforceArc,
    /// An arc was removed from the envelope of a graph variable.
    RemoveArc,
}

impl DomainEvent {
    /// Lower and upper bound tightening (but not other value removal).
    pub const INT_BOUNDS: EnumSet<DomainEvent> =
        enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound);
    /// Every integer domain event.
    pub const ANY_INT: EnumSet<DomainEvent> = enum_set!(
        DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
            | DomainEvent::Assign
    );
    /// Every set domain event.
    pub const ANY_SET: EnumSet<DomainEvent> =
        enum_set!(DomainEvent::AddToKernel | DomainEvent::RemoveFromEnvelope);
    /// Every graph domain event.
    pub const ANY_GRAPH: EnumSet<DomainEvent> =
        enum_set!(DomainEvent::EnforceArc | DomainEvent::RemoveArc);
}
