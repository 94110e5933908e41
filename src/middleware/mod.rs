pub mod error_handler;
pub mod logging;

pub use error_handler::*;
pub use logging::*;
