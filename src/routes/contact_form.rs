use crate::domain::ContactFormData;
use crate::routes::RelayError;
use actix_multipart::form::text::Text;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, web};
use std::future::Future;
use std::pin::Pin;

/// Largest contact form body accepted, in either encoding.
pub const MAX_FORM_BYTES: usize = 256 * 1024;

pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().limit(MAX_FORM_BYTES)
}

pub fn multipart_form_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(MAX_FORM_BYTES)
        .memory_limit(MAX_FORM_BYTES)
}

#[derive(MultipartForm)]
struct MultipartContactForm {
    name: Option<Text<String>>,
    email: Option<Text<String>>,
    topic: Option<Text<String>>,
    message: Option<Text<String>>,
}

impl From<MultipartContactForm> for ContactFormData {
    fn from(form: MultipartContactForm) -> Self {
        let text = |field: Option<Text<String>>| field.map(|text| text.0).unwrap_or_default();
        Self {
            name: text(form.name),
            email: text(form.email),
            topic: text(form.topic),
            message: text(form.message),
        }
    }
}

/// Contact form fields decoded from either a urlencoded or a multipart body.
#[derive(Debug)]
pub struct ContactFormBody(pub ContactFormData);

impl ContactFormBody {
    pub fn into_inner(self) -> ContactFormData {
        self.0
    }
}

impl std::ops::Deref for ContactFormBody {
    type Target = ContactFormData;

    fn deref(&self) -> &ContactFormData {
        &self.0
    }
}

impl FromRequest for ContactFormBody {
    type Error = RelayError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let mut payload = payload.take();
        Box::pin(async move {
            let form = if is_multipart(&req) {
                MultipartForm::<MultipartContactForm>::from_request(&req, &mut payload)
                    .await
                    .map(|form| form.into_inner().into())
            } else {
                web::Form::<ContactFormData>::from_request(&req, &mut payload)
                    .await
                    .map(web::Form::into_inner)
            };
            form.map(ContactFormBody).map_err(|e| {
                if e.as_response_error().status_code() == StatusCode::PAYLOAD_TOO_LARGE {
                    RelayError::PayloadTooLarge
                } else {
                    // Undecodable bodies are treated as if every field were missing.
                    RelayError::ValidationError(e.to_string())
                }
            })
        })
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}
