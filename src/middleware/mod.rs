pub mod auth;
pub mod response;

pub use auth::{access_middleware, CurrentIdentity, MaybeIdentity, RequestIdentity};
pub use response::{ApiResponse, ApiResult};
