//! Verification of identity-provider access tokens.
//!
//! Sessions are owned by the external identity provider. The server only
//! verifies the HS256 signature and expiry of the tokens it issues and reads
//! the [`Claims`] they carry.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use koda_core::roles::ROLE_USER;
use serde::{Deserialize, Serialize};

/// Claims carried by an identity-provider token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's external identity id.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role asserted by the provider. Only used when provisioning a new user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// The asserted role, defaulting to `user`.
    pub fn role_or_default(&self) -> &str {
        self.role.as_deref().unwrap_or(ROLE_USER)
    }
}

/// Configuration for identity token verification.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Lifetime of tokens minted by [`generate_token`], in minutes.
    pub token_expiry_mins: i64,
}

/// Default lifetime of locally minted tokens in minutes.
const DEFAULT_TOKEN_EXPIRY_MINS: i64 = 60;

impl IdentityConfig {
    /// Load identity configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `IDENTITY_JWT_SECRET`        | **yes**  | --      |
    /// | `IDENTITY_TOKEN_EXPIRY_MINS` | no       | `60`    |
    ///
    /// # Panics
    ///
    /// Panics if `IDENTITY_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("IDENTITY_JWT_SECRET")
            .expect("IDENTITY_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "IDENTITY_JWT_SECRET must not be empty");

        let token_expiry_mins: i64 = std::env::var("IDENTITY_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY_MINS.to_string())
            .parse()
            .expect("IDENTITY_TOKEN_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            token_expiry_mins,
        }
    }
}

/// Mint an HS256 token the way the identity provider does.
///
/// Used by local tooling and tests; production tokens come from the provider.
pub fn generate_token(
    subject: &str,
    email: Option<&str>,
    role: Option<&str>,
    config: &IdentityConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        email: email.map(str::to_string),
        role: role.map(str::to_string),
        exp: now + config.token_expiry_mins * 60,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(token: &str, config: &IdentityConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
