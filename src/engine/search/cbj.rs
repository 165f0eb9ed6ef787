use crate::engine::explanation::Deduction;
use crate::engine::explanation::Explanation;

/// How many worlds to unwind for a conflict whose flattened explanation is
/// `explanation`, raised in `current_world`.
///
/// The target is one world above the deepest decision implicated by the
/// explanation; at least one world is always popped. An explanation without
/// any decision yields a distance past the root, which the caller reads as
/// exhaustion: such an explanation is a proof of infeasibility.
pub(crate) fn backjump_distance(explanation: &Explanation, current_world: u32) -> u32 {
    let mut deepest = 0;
    for deduction in explanation.iter() {
        if let Deduction::BranchLeft { world, .. } = deduction {
            deepest = deepest.max(world + 1);
        }
    }

    (1 + i64::from(current_world) - i64::from(deepest)).max(1) as u32
}
