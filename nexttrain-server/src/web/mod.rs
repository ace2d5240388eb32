//! Web layer: JSON endpoints over the resolver, caches and directory.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
