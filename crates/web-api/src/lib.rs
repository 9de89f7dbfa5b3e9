pub mod error;
pub mod handlers;
pub mod health;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{MessageResponse, TrainResponse};
pub use health::HealthResponse;
pub use server::ApiServer;
