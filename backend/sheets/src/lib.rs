//! Google Sheets sink.
//!
//! Authenticates as a service account (JWT bearer grant), opens the target
//! spreadsheet by name through Drive, and appends one row per record to its
//! first sheet.

pub mod client;
pub mod credentials;
pub mod sink;
pub mod token;

pub use client::SheetsClient;
pub use credentials::{CredentialsError, ServiceAccountKey};
pub use sink::{SheetsSettings, SheetsSink};
pub use token::TokenProvider;
