use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::credentials::{CredentialsError, ServiceAccountKey};

pub const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_TTL_SECS: i64 = 3600;
/// Tokens are refreshed this long before Google says they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_key(key: &ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: SCOPES.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_TTL_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Exchanges signed service-account assertions for OAuth2 access tokens and
/// caches the result until shortly before expiry.
pub struct TokenProvider {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(client: Client, key: ServiceAccountKey) -> Result<Self, CredentialsError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        Ok(Self {
            client,
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, CredentialsError> {
        let claims = Claims::for_key(&self.key, now);
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?)
    }

    pub async fn access_token(&self) -> Result<String, CredentialsError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.token.clone());
        }

        let fresh = self.exchange(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, CredentialsError> {
        let assertion = self.assertion(now)?;
        debug!(client_email = %self.key.client_email, "Requesting Google access token");

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| CredentialsError::Token(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CredentialsError::Token(format!("{status}: {body}")));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialsError::Token(e.to_string()))?;

        Ok(CachedToken {
            token: parsed.access_token,
            expires_at: now + Duration::seconds(parsed.expires_in),
        })
    }
}
