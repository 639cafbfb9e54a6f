pub use crate::{config::Config, AppState, Result};

pub use axum::http::StatusCode;
