use serde::{Deserialize, Serialize};

/// A normalized inbound message, independent of the webhook that delivered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRequest {
    /// Sender identifier as given by the messaging platform (e.g. `whatsapp:+91...`).
    pub sender: String,
    /// Message text; empty when the platform sent none.
    pub body: String,
    /// First attachment, present only when the platform reported one.
    pub attachment: Option<Attachment>,
}

/// Location and declared type of an inbound attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub content_type: String,
}

impl IntakeRequest {
    pub fn text(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, url: impl Into<String>, content_type: impl Into<String>) -> Self {
        self.attachment = Some(Attachment {
            url: url.into(),
            content_type: content_type.into(),
        });
        self
    }
}
