pub mod config;
pub mod logging;

// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

pub use config::Config;
pub use handlers::{Dashboard, build_client, resolve_config, spinner_callback};
