mod types;

pub use types::{AppError, AppResult, ErrorReport, GENERIC_ERROR_MESSAGE};
