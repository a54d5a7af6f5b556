pub mod config;
pub mod logging;
pub mod responses;
pub mod state;

pub use config::{Backend, Config};
pub use state::AppState;
