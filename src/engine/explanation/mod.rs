mod deduction;
mod explanation;
mod store;

pub use deduction::Deduction;
pub use deduction::Fact;
pub use explanation::Explanation;
pub use store::ExplanationStore;
