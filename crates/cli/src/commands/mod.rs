pub mod model;
pub mod observations;
pub mod serve;

pub use model::{run_predict, run_status, run_train};
pub use observations::{run_add, run_import, run_list};
pub use serve::run_serve;
