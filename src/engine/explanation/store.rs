use fnv::FnvHashMap;
use fnv::FnvHashSet;

use super::Deduction;
use super::Explanation;
use crate::basic_types::UsageError;
use crate::quince_asserts::quince_assert_extreme;
use crate::quince_asserts::quince_assert_moderate;

/// Maps deductions to the explanations that justify them.
///
/// Every successful narrowing stores the fact it produced against the reason
/// its caller supplied; refutations store their justification when
/// conflict-based backjumping performs them. Positive decision branches
/// (`BranchLeft`) are never justified and act as the roots of flattening.
#[derive(Debug, Default)]
pub struct ExplanationStore {
    justifications: FnvHashMap<Deduction, Explanation>,
    retain_user_explanation: bool,
    last_explanation: Option<Explanation>,
}

impl ExplanationStore {
    /// Record `explanation` as the justification of `deduction`, replacing any
    /// earlier justification (a re-derivation supersedes the stale one).
    pub(crate) fn store(&mut self, deduction: Deduction, explanation: Explanation) {
        quince_assert_moderate!(!matches!(deduction, Deduction::BranchLeft { .. }));

        let _ = self.justifications.insert(deduction, explanation);
    }

    pub fn justification(&self, deduction: &Deduction) -> Option<&Explanation> {
        self.justifications.get(deduction)
    }

    /// Resolve every justified deduction in `explanation` into the root
    /// deductions it ultimately rests on.
    ///
    /// Justifications only ever cite deductions made strictly earlier, so the
    /// expansion is acyclic; the visited set makes termination unconditional
    /// even on a corrupted store.
    pub fn flatten(&self, explanation: &Explanation) -> Explanation {
        let mut result = Explanation::new();
        let mut visited: FnvHashSet<Deduction> = FnvHashSet::default();
        let mut worklist: Vec<Deduction> = explanation.iter().copied().collect();

        while let Some(deduction) = worklist.pop() {
            if !visited.insert(deduction) {
                continue;
            }

            match self.justifications.get(&deduction) {
                Some(justification) => worklist.extend(justification.iter().copied()),
                None => result.add(deduction),
            }
        }

        quince_assert_extreme!(result
            .iter()
            .all(|deduction| !self.justifications.contains_key(deduction)));
        result
    }

    pub(crate) fn set_user_explanation(&mut self, retain: bool) {
        self.retain_user_explanation = retain;
        if !retain {
            self.last_explanation = None;
        }
    }

    /// Called at contradiction time with the flattened explanation.
    pub(crate) fn record_last_explanation(&mut self, explanation: &Explanation) {
        if self.retain_user_explanation {
            self.last_explanation = Some(explanation.clone());
        }
    }

    /// The flattened explanation of the most recent contradiction, or `None`
    /// when no contradiction has happened yet.
    pub fn last_explanation(&self) -> Result<Option<&Explanation>, UsageError> {
        if !self.retain_user_explanation {
            return Err(UsageError::UserExplanationsDisabled);
        }

        Ok(self.last_explanation.as_ref())
    }
}
