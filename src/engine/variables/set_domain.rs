use std::collections::BTreeSet;

/// A set domain: the kernel holds elements known to be in the set, the
/// envelope holds elements that may still be in the set.
///
/// Invariant: `kernel` is a subset of `envelope`. The domain is fixed once the
/// two coincide.
#[derive(Clone, Debug)]
pub(crate) struct SetDomain {
    pub(crate) kernel: BTreeSet<i32>,
    pub(crate) envelope: BTreeSet<i32>,
    pub(crate) initial_envelope: Vec<i32>,
}

impl SetDomain {
    pub(crate) fn new(elements: impl IntoIterator<Item = i32>) -> Self {
        let envelope: BTreeSet<i32> = elements.into_iter().collect();
        let initial_envelope = envelope.iter().copied().collect();

        SetDomain {
            kernel: BTreeSet::new(),
            envelope,
            initial_envelope,
        }
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.kernel.len() == self.envelope.len()
    }
}
