use crate::configuration::RelayConfig;
use crate::domain::{ContactFormData, ContactSubmission};
use crate::provider_client::{OutboundProviderRequest, ProviderClient};
use crate::routes::contact_form::ContactFormBody;
use crate::routes::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpResponse, ResponseError, options, post, web};
use anyhow::Context;

const GENERIC_DELIVERY_FAILURE: &str = "Failed to send message";

#[derive(thiserror::Error)]
pub enum RelayError {
    #[error("All fields are required")]
    ValidationError(String),
    #[error("The submission is too large")]
    PayloadTooLarge,
    #[error("Server configuration error")]
    ConfigurationError,
    #[error("{0}")]
    DeliveryError(String),
    #[error("Failed to send message")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(serde::Serialize)]
struct SuccessBody {
    success: bool,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::ConfigurationError
            | RelayError::DeliveryError(_)
            | RelayError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            RelayError::UnexpectedError(e) => Some(format!("{:#}", e)),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
            details,
        })
    }
}

#[tracing::instrument(
    name = "Relaying a contact form submission",
    skip(form, provider_client, relay_config),
    fields(sender_email = %form.email, sender_name = %form.name, topic = %form.topic)
)]
#[post("/api/contact")]
pub async fn submit_contact(
    form: ContactFormBody,
    provider_client: web::Data<ProviderClient>,
    relay_config: web::Data<RelayConfig>,
) -> Result<HttpResponse, RelayError> {
    relay_submission(form.into_inner(), &provider_client, &relay_config)
        .await
        .inspect_err(|e| tracing::error!(error.cause_chain = ?e, "Contact form submission failed"))?;
    tracing::info!("Contact form submission delivered");
    Ok(HttpResponse::Ok().json(SuccessBody { success: true }))
}

#[options("/api/contact")]
pub async fn contact_preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .insert_header((
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .finish()
}

/// Validates one submission and hands it to the provider.
///
/// Nothing leaves the process unless the form is complete and an access key
/// is configured.
pub async fn relay_submission(
    form: ContactFormData,
    provider_client: &ProviderClient,
    relay_config: &RelayConfig,
) -> Result<(), RelayError> {
    let submission = ContactSubmission::try_from(form).map_err(RelayError::ValidationError)?;

    let access_key = relay_config
        .access_key()
        .ok_or(RelayError::ConfigurationError)?;

    let request =
        OutboundProviderRequest::new(access_key, &submission, &relay_config.site_identifier);

    let result = provider_client
        .submit(&request)
        .await
        .context("Failed to deliver the submission to the provider")?;

    if result.success {
        Ok(())
    } else {
        Err(RelayError::DeliveryError(
            result
                .message
                .unwrap_or_else(|| GENERIC_DELIVERY_FAILURE.to_string()),
        ))
    }
}
