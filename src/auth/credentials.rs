//! Bearer credential for gated model downloads
//!
//! The token is read once at startup and handed to the fetcher explicitly.
//! It is never printed: `Debug` output is redacted.

use std::env;
use std::fmt;

use crate::constants::env as env_constants;

/// Bearer token attached to download requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Wrap a token, rejecting blank values
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self { token })
        }
    }

    /// Read the credential from `HUGGINGFACE_TOKEN`
    pub fn from_env() -> Option<Self> {
        Self::from_var(env_constants::TOKEN)
    }

    /// Read the credential from an arbitrary environment variable
    pub fn from_var(name: &str) -> Option<Self> {
        env::var(name).ok().and_then(Self::new)
    }

    /// Value of the `Authorization` header
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Authentication status information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    /// Whether a token was found
    pub token_set: bool,
}

impl AuthStatus {
    /// Status for an optional credential
    pub fn of(credential: Option<&Credential>) -> Self {
        Self {
            token_set: credential.is_some(),
        }
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        if self.token_set {
            format!("{} set, downloads are authenticated", env_constants::TOKEN)
        } else {
            format!(
                "{} not set, downloads are unauthenticated",
                env_constants::TOKEN
            )
        }
    }
}
