use std::collections::BTreeSet;

/// An integer domain stored as bounds plus explicit holes strictly inside the
/// bounds.
///
/// Invariant: `lower_bound <= upper_bound`, the bounds themselves are never in
/// `holes`, and every hole lies strictly between the bounds. Operations that
/// would violate this raise an empty-domain conflict instead.
#[derive(Clone, Debug)]
pub(crate) struct IntegerDomain {
    pub(crate) lower_bound: i32,
    pub(crate) upper_bound: i32,
    pub(crate) holes: BTreeSet<i32>,
    pub(crate) initial_lower_bound: i32,
    pub(crate) initial_upper_bound: i32,
}

impl IntegerDomain {
    pub(crate) fn new(lower_bound: i32, upper_bound: i32) -> Self {
        IntegerDomain {
            lower_bound,
            upper_bound,
            holes: BTreeSet::new(),
            initial_lower_bound: lower_bound,
            initial_upper_bound: upper_bound,
        }
    }

    pub(crate) fn contains(&self, value: i32) -> bool {
        value >= self.lower_bound && value <= self.upper_bound && !self.holes.contains(&value)
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}
