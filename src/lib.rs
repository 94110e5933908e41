//! Lexdraft legal assistant service
//!
//! Drafts legal documents and answers legal questions through a remote
//! language model, and extracts text from uploaded PDF files.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use state::AppState;
