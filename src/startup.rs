use crate::configuration::{RelayConfig, Settings};
use crate::provider_client::ProviderClient;
use crate::routes::{
    contact_preflight, form_config, health_check, multipart_form_config, submit_contact,
};
use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web::Data};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let provider_client = configuration.provider.client()?;
        let relay_config = configuration.provider.relay_config();
        if relay_config.access_key().is_none() {
            tracing::warn!(
                "No provider access key is configured; contact submissions will be refused"
            );
        }

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, provider_client, relay_config)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    provider_client: ProviderClient,
    relay_config: RelayConfig,
) -> Result<Server, std::io::Error> {
    let provider_client = Data::new(provider_client);
    let relay_config = Data::new(relay_config);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(DefaultHeaders::new().add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")))
            .wrap(TracingLogger::default())
            .app_data(form_config())
            .app_data(multipart_form_config())
            .app_data(provider_client.clone())
            .app_data(relay_config.clone())
            .service(health_check)
            .service(submit_contact)
            .service(contact_preflight)
    })
    .listen(listener)?
    .run();
    Ok(server)
}
