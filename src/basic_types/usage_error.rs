use thiserror::Error;

/// Errors caused by calling into the engine in an unsupported way. These are
/// programming errors of the caller, not infeasibility of the problem.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    #[error(
        "user explanations are not retained; \
         enable them with `Solver::set_user_explanation(true)` before solving"
    )]
    UserExplanationsDisabled,
}
