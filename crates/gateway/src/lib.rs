pub mod config;
pub mod http_server;
pub mod process;
mod service_config;
mod state;

pub use service_config::Config as ServiceConfig;
pub use state::{ServiceState, StateSetupError};
