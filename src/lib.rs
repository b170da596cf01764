// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod community;
pub mod config;
pub mod diary;
pub mod error;
pub mod facilities;
pub mod logging;
pub mod position;
pub mod runtime;
pub mod seed;
pub mod store;
pub mod toast;
pub mod util;
pub mod walk;
