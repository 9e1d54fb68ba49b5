//! Twilio messaging webhook (SMS / WhatsApp).
//!
//! Inbound notifications arrive as `application/x-www-form-urlencoded` POSTs;
//! replies are TwiML documents returned in the HTTP response body.

use intake_core::IntakeRequest;
use quick_xml::escape::escape;
use serde::Deserialize;
use tracing::debug;

pub const TWIML_CONTENT_TYPE: &str = "application/xml";

/// Form fields read from a Twilio messaging webhook. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct InboundForm {
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
    /// Kept as text so a non-numeric value degrades instead of rejecting the form.
    #[serde(rename = "NumMedia", default)]
    pub num_media: Option<String>,
    #[serde(rename = "MediaUrl0", default)]
    pub media_url0: Option<String>,
    #[serde(rename = "MediaContentType0", default)]
    pub media_content_type0: Option<String>,
}

impl InboundForm {
    pub fn num_media(&self) -> u32 {
        self.num_media
            .as_deref()
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn into_request(self) -> IntakeRequest {
        let num_media = self.num_media();
        let request = IntakeRequest::text(
            self.from.unwrap_or_default(),
            self.body.unwrap_or_default(),
        );
        if num_media == 0 {
            return request;
        }
        match self.media_url0.filter(|url| !url.is_empty()) {
            Some(url) => request.with_attachment(url, self.media_content_type0.unwrap_or_default()),
            // Media announced but not addressable: the attachment text is empty
            // and still replaces the body.
            None => {
                debug!(num_media, "Media announced without MediaUrl0, ignoring body");
                IntakeRequest {
                    body: String::new(),
                    ..request
                }
            }
        }
    }
}

/// Parse a raw webhook body. Malformed input yields an empty request rather than an error.
pub fn parse_inbound(body: &[u8]) -> IntakeRequest {
    match serde_urlencoded::from_bytes::<InboundForm>(body) {
        Ok(form) => form.into_request(),
        Err(e) => {
            debug!(error = %e, "Unparsable webhook body, treating as empty message");
            IntakeRequest::default()
        }
    }
}

/// A TwiML `<Response>` carrying zero or more `<Message>` elements.
#[derive(Debug, Default, Clone)]
pub struct TwimlReply {
    messages: Vec<String>,
}

impl TwimlReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.messages.push(text.into());
        self
    }

    pub fn render(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for message in &self.messages {
            xml.push_str("<Message>");
            xml.push_str(&escape(message.as_str()));
            xml.push_str("</Message>");
        }
        xml.push_str("</Response>");
        xml
    }
}
