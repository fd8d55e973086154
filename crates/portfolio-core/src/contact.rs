use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Default chat-app number the form forwards to.
pub const DEFAULT_CHAT_NUMBER: &str = "15555550123";
/// How long a success or error banner stays up, in milliseconds.
pub const FORM_STATUS_TTL_MS: f64 = 3_000.0;

const CHAT_BASE_URL: &str = "https://wa.me/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 3] = [ContactField::Name, ContactField::Email, ContactField::Message];

    /// Parse the `name` attribute of a form input.
    pub fn from_input_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(ContactField::Name),
            "email" => Some(ContactField::Email),
            "message" => Some(ContactField::Message),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Message => "message",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("field `{}` is required", .0.as_str())]
    MissingField(ContactField),
    #[error("chat number must be digits only, got `{0}`")]
    InvalidNumber(String),
}

/// Values of the three contact inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Message => &self.message,
        }
    }

    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        match ContactField::ALL
            .into_iter()
            .find(|f| self.field(*f).trim().is_empty())
        {
            Some(field) => Err(ContactError::MissingField(field)),
            None => Ok(()),
        }
    }

    /// Pre-filled message body.
    pub fn message_text(&self) -> String {
        format!(
            "Hola, soy {} ({}).\n\n{}",
            self.name.trim(),
            self.email.trim(),
            self.message.trim()
        )
    }

    /// `https://wa.me/<number>?text=<message>` for this form.
    pub fn chat_link(&self, number: &str) -> Result<String, ContactError> {
        self.validate()?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ContactError::InvalidNumber(number.to_string()));
        }
        Ok(format!(
            "{CHAT_BASE_URL}{number}?text={}",
            urlencoding::encode(&self.message_text())
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Success,
    Error,
}

/// Form values plus the transient submit banner.
#[derive(Debug, Clone, Default)]
pub struct ContactState {
    form: ContactForm,
    status: Option<(FormStatus, f64)>,
}

impl ContactState {
    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    /// Validate and build the chat link.
    ///
    /// On success the fields are cleared. Either way the banner is stamped
    /// with `now_ms` and expires after [`FORM_STATUS_TTL_MS`].
    pub fn submit(&mut self, number: &str, now_ms: f64) -> Result<String, ContactError> {
        match self.form.chat_link(number) {
            Ok(link) => {
                debug!("contact form submitted");
                self.form.clear();
                self.status = Some((FormStatus::Success, now_ms));
                Ok(link)
            }
            Err(e) => {
                warn!(error = %e, "contact form rejected");
                self.status = Some((FormStatus::Error, now_ms));
                Err(e)
            }
        }
    }

    /// Banner to show at `now_ms`, if it has not expired.
    pub fn status(&self, now_ms: f64) -> Option<FormStatus> {
        let (status, at) = self.status?;
        (now_ms - at < FORM_STATUS_TTL_MS).then_some(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            message: "¿Hablamos de un proyecto?".into(),
        }
    }

    #[test]
    fn missing_field_is_reported_in_order() {
        let mut form = filled();
        form.set_field(ContactField::Email, "   ");
        assert_eq!(form.validate(), Err(ContactError::MissingField(ContactField::Email)));
        form.set_field(ContactField::Name, "");
        assert_eq!(form.validate(), Err(ContactError::MissingField(ContactField::Name)));
    }

    #[test]
    fn chat_link_encodes_message() {
        let link = filled()
            .chat_link("15555550123")
            .expect("form is complete");
        assert!(link.starts_with("https://wa.me/15555550123?text="));
        assert!(link.contains("Hola%2C%20soy%20Ana%20%28ana%40example.com%29."));
        assert!(link.contains("%0A%0A"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn chat_link_rejects_bad_number() {
        assert_eq!(
            filled().chat_link("+1 555"),
            Err(ContactError::InvalidNumber("+1 555".into()))
        );
        assert!(filled().chat_link("").is_err());
    }

    #[test]
    fn input_names_map_to_fields() {
        assert_eq!(ContactField::from_input_name("message"), Some(ContactField::Message));
        assert_eq!(ContactField::from_input_name("phone"), None);
    }

    #[test]
    fn successful_submit_clears_form() {
        let mut state = ContactState::default();
        for field in ContactField::ALL {
            state.set_field(field, filled().field(field));
        }
        assert!(state.submit(DEFAULT_CHAT_NUMBER, 1_000.0).is_ok());
        assert_eq!(state.form(), &ContactForm::default());
        assert_eq!(state.status(1_500.0), Some(FormStatus::Success));
    }

    #[test]
    fn failed_submit_keeps_input() {
        let mut state = ContactState::default();
        state.set_field(ContactField::Name, "Ana");
        assert!(state.submit(DEFAULT_CHAT_NUMBER, 0.0).is_err());
        assert_eq!(state.form().name, "Ana");
        assert_eq!(state.status(10.0), Some(FormStatus::Error));
    }

    #[test]
    fn status_expires() {
        let mut state = ContactState::default();
        let _ = state.submit(DEFAULT_CHAT_NUMBER, 0.0);
        assert!(state.status(2_999.0).is_some());
        assert!(state.status(3_000.0).is_none());
    }
}
