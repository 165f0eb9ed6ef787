use super::Choice;
use crate::engine::domain_store::DomainStore;

/// Supplies the next decision, or `None` when every variable is fixed (which
/// the search loop reads as a solution).
pub(crate) trait Brancher {
    fn next_decision(&mut self, domains: &DomainStore) -> Option<Choice>;
}

/// The default strategy of the original engine: first unfixed variable in
/// creation order; smallest value for integers, smallest free element for
/// sets, first undecided arc for graphs.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct InputOrderBrancher;

impl Brancher for InputOrderBrancher {
    fn next_decision(&mut self, domains: &DomainStore) -> Option<Choice> {
        domains
            .variables()
            .find(|&variable| !domains.is_fixed(variable))
            .map(|variable| domains.choice_on(variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::explanation::Explanation;
    use crate::engine::explanation::ExplanationStore;
    use crate::engine::variables::Arc;

    #[test]
    fn fixed_variables_are_skipped() {
        let mut domains = DomainStore::default();
        let mut explanations = ExplanationStore::default();
        let x = domains.new_int(3, 3);
        let y = domains.new_int(0, 5);
        let _ = x;

        let mut brancher = InputOrderBrancher;
        let choice = brancher.next_decision(&domains).unwrap();

        assert_eq!(
            Choice::IntAssign {
                variable: y,
                value: 0
            },
            choice
        );

        let _ = domains
            .instantiate(&mut explanations, y, 0, Explanation::new())
            .unwrap();
        assert_eq!(None, brancher.next_decision(&domains));
    }

    #[test]
    fn set_choices_branch_on_the_smallest_free_element() {
        let mut domains = DomainStore::default();
        let mut explanations = ExplanationStore::default();
        let s = domains.new_set([2, 4, 6]);

        let _ = domains
            .add_to_kernel(&mut explanations, s, 2, Explanation::new())
            .unwrap();

        let mut brancher = InputOrderBrancher;
        assert_eq!(
            Some(Choice::SetMember {
                variable: s,
                element: 4
            }),
            brancher.next_decision(&domains)
        );
    }

    #[test]
    fn graph_choices_branch_on_the_first_undecided_arc() {
        let mut domains = DomainStore::default();
        let mut explanations = ExplanationStore::default();
        let g = domains.new_graph(2, [Arc::new(0, 1), Arc::new(1, 0)]);

        let _ = domains
            .enforce_arc(&mut explanations, g, Arc::new(0, 1), Explanation::new())
            .unwrap();

        let mut brancher = InputOrderBrancher;
        assert_eq!(
            Some(Choice::GraphArc {
                variable: g,
                arc: Arc::new(1, 0)
            }),
            brancher.next_decision(&domains)
        );
    }
}
