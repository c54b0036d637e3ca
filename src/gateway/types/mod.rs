pub mod response;

pub use response::{ApiError, ApiResponse, ApiResult, error_codes, ok};
