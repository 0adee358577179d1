use validator::Validate;

/// Raw fields of the contact form, exactly as the browser sent them.
/// An absent field is read as an empty string.
#[derive(serde::Deserialize, Debug, Default)]
#[serde(default)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub topic: String,
    pub message: String,
}

/// A contact form submission with every field present.
///
/// Values are kept verbatim: no trimming and no email format check,
/// the provider is trusted with both.
#[derive(Debug, Validate)]
pub struct ContactSubmission {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1))]
    email: String,
    #[validate(length(min = 1))]
    topic: String,
    #[validate(length(min = 1))]
    message: String,
}

impl ContactSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<ContactFormData> for ContactSubmission {
    type Error = String;

    fn try_from(form: ContactFormData) -> Result<Self, Self::Error> {
        let submission = Self {
            name: form.name,
            email: form.email,
            topic: form.topic,
            message: form.message,
        };
        match submission.validate() {
            Ok(_) => Ok(submission),
            Err(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .into_keys()
                    .map(|field| field.to_string())
                    .collect();
                fields.sort();
                Err(format!("Missing required fields: {}", fields.join(", ")))
            }
        }
    }
}
