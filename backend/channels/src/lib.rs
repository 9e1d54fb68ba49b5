//! Messaging-platform adapters: inbound webhook parsing, reply documents,
//! and authenticated attachment downloads.

pub mod twilio;
pub mod twilio_media;

pub use twilio::{parse_inbound, InboundForm, TwimlReply, TWIML_CONTENT_TYPE};
pub use twilio_media::TwilioMediaFetcher;
