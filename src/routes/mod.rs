mod contact;
mod contact_form;
pub mod health_check;

pub use contact::{RelayError, contact_preflight, relay_submission, submit_contact};
pub use contact_form::{ContactFormBody, form_config, multipart_form_config};
pub use health_check::*;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
