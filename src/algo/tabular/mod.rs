pub mod td;
pub mod value_table;

pub use td::{TdAgent, TdAgentConfig};
pub use value_table::ValueTable;
