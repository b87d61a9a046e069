pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod server;

pub use crate::config::Config;
pub use crate::error::{AppError, AppResult, StartupError};
pub use crate::server::{create_app, AppState};
