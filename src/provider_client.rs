use crate::domain::ContactSubmission;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the form-delivery provider's submission API.
pub struct ProviderClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ProviderClient {
    /// Without a `timeout` the transport default applies.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Posts one submission to the provider and decodes its verdict.
    ///
    /// The provider reports rejections as a JSON body on a non-2xx status,
    /// so the body is decoded whatever the status code is.
    pub async fn submit(
        &self,
        request: &OutboundProviderRequest<'_>,
    ) -> Result<ProviderResult, reqwest::Error> {
        let url = format!("{}/submit", self.base_url);
        self.http_client
            .post(&url)
            .header("Accept", "application/json")
            .form(request)
            .send()
            .await?
            .json::<ProviderResult>()
            .await
    }
}

#[derive(Serialize)]
pub struct OutboundProviderRequest<'a> {
    access_key: &'a str,
    name: &'a str,
    email: &'a str,
    subject: String,
    message: &'a str,
}

impl<'a> OutboundProviderRequest<'a> {
    pub fn new(
        access_key: &'a SecretBox<String>,
        submission: &'a ContactSubmission,
        site_identifier: &str,
    ) -> Self {
        Self {
            access_key: access_key.expose_secret(),
            name: submission.name(),
            email: submission.email(),
            subject: format!("[{}] {}", site_identifier, submission.topic()),
            message: submission.message(),
        }
    }

    #[cfg(test)]
    fn subject(&self) -> &str {
        &self.subject
    }
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct ProviderResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
