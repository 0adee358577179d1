pub mod configuration;
pub mod domain;
pub mod provider_client;
pub mod routes;
pub mod startup;
pub mod telemetry;

pub use configuration::get_configuration;
pub use provider_client::ProviderClient;
pub use startup::{Application, run};
pub use telemetry::{get_subscriber, init_subscriber};
