pub mod auth;
pub mod response;

pub use auth::{ensure_write_role, jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
