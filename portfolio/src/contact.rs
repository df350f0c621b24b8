use crate::models::Notice;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_ENDPOINT: &str = "https://formsubmit.co/ajax/ekizulfarrachman@gmail.com";

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Invalid form: {0}")]
    Invalid(&'static str),
    #[error("A submission is already in flight")]
    Busy,
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Relay returned {0}")]
    Status(u16),
}

impl ContactError {
    /// The notice shown to the visitor for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            ContactError::Invalid(reason) => Notice::error("Incomplete Form", *reason),
            ContactError::Busy => Notice::info("Sending message...", "Please wait"),
            ContactError::Transport(_) | ContactError::Status(_) => {
                Notice::error("Oops!", "Something went wrong. Please try again later.")
            }
        }
    }
}

/// Body posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "_template")]
    pub template: &'static str,
    #[serde(rename = "_captcha")]
    pub captcha: &'static str,
}

#[async_trait]
pub trait ContactRelay: Send + Sync {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), ContactError>;
}

/// Posts messages to a FormSubmit AJAX endpoint.
pub struct FormSubmitRelay {
    client: Client,
    endpoint: String,
}

impl FormSubmitRelay {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        FormSubmitRelay {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ContactRelay for FormSubmitRelay {
    async fn deliver(&self, message: &ContactMessage) -> Result<(), ContactError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Site-wide in-flight flag: one contact submission at a time.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    in_flight: AtomicBool,
}

impl SubmissionGate {
    pub fn try_begin(&self) -> Result<SubmissionPermit<'_>, ContactError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ContactError::Busy)?;
        Ok(SubmissionPermit { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Held for the duration of one submission; dropping it reopens the gate.
#[derive(Debug)]
pub struct SubmissionPermit<'a> {
    gate: &'a SubmissionGate,
}

impl Drop for SubmissionPermit<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}

/// Outcome of a relayed submission and the form as it stands afterwards.
#[derive(Debug, Serialize)]
pub struct ContactReply {
    pub notice: Notice,
    pub form: ContactForm,
}

/// Contact form fields plus the in-flight flag that blocks re-submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(skip)]
    submitting: bool,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ContactForm {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            submitting: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn validate(&self) -> Result<(), ContactError> {
        if [&self.name, &self.email, &self.message]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ContactError::Invalid("Please fill in all fields."));
        }
        if !self.email.contains('@') {
            return Err(ContactError::Invalid("Please enter a valid email address."));
        }
        Ok(())
    }

    /// Marks the form as in flight and builds the relay body.
    pub fn begin_submit(&mut self) -> Result<ContactMessage, ContactError> {
        if self.submitting {
            return Err(ContactError::Busy);
        }
        self.validate()?;
        self.submitting = true;

        Ok(ContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            template: "table",
            captcha: "false",
        })
    }

    /// Settles an in-flight submission. Success clears the fields; failure
    /// keeps them so the visitor can retry.
    pub fn finish_submit(&mut self, outcome: Result<(), ContactError>) -> Result<Notice, ContactError> {
        self.submitting = false;
        match outcome {
            Ok(()) => {
                self.name.clear();
                self.email.clear();
                self.message.clear();
                Ok(Notice::success(
                    "Message Sent!",
                    "Thank you for reaching out. I'll respond shortly.",
                ))
            }
            Err(e) => {
                warn!(error = %e, "Contact submission failed");
                Err(e)
            }
        }
    }

    pub async fn submit(&mut self, relay: &dyn ContactRelay) -> Result<Notice, ContactError> {
        let message = self.begin_submit()?;
        let outcome = relay.deliver(&message).await;
        if outcome.is_ok() {
            info!("Contact message relayed");
        }
        self.finish_submit(outcome)
    }
}
