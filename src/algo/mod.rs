/// Table-based learners
pub mod tabular;

pub use tabular::{TdAgent, TdAgentConfig, ValueTable};
