pub mod json;
pub mod response;

pub use json::JsonBody;
pub use response::{ApiResponse, ApiResult};
