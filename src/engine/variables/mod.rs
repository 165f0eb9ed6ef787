mod graph_domain;
mod integer_domain;
mod set_domain;
mod variable_id;

pub use graph_domain::Arc;
pub(crate) use graph_domain::GraphDomain;
pub(crate) use integer_domain::IntegerDomain;
pub(crate) use set_domain::SetDomain;
pub use variable_id::GraphVariable;
pub use variable_id::IntVariable;
pub use variable_id::SetVariable;
pub use variable_id::VariableId;
