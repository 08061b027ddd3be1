pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod principal;
pub mod recruitment;
pub mod store;
pub mod telemetry;
pub mod users;

pub use context::{api_router, ServiceContext};
pub use error::{AppError, ErrorCode, ServiceError};
pub use principal::Principal;
