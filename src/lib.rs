mod domain;
mod interfaces;
mod infrastructure;
pub mod client;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, fallback, use_cases};
pub use interfaces::{handlers, routes};
pub use infrastructure::{http, store};

use settings::{AppConfig, ConfigSummary};
use store::RemoteStoreGateway;
use use_cases::{contact::ContactHandler, resources::ResourceHandler};

pub struct AppState {
    pub resource_handler: ResourceHandler,
    pub contact_handler: ContactHandler,
    pub gateway: RemoteStoreGateway,
    pub config_summary: ConfigSummary,
}

impl AppState {
    pub fn new(config: &AppConfig, gateway: RemoteStoreGateway) -> Self {
        AppState {
            resource_handler: ResourceHandler::new(gateway.clone()),
            contact_handler: ContactHandler::new(gateway.clone()),
            gateway,
            config_summary: config.summary(),
        }
    }
}
