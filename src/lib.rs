pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use config::GatewayConfig;
pub use server::GatewayServer;
pub use utils::error::{GatewayError, Result};
