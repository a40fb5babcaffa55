use std::env;

use anyhow::Result;

/// Destination credentials loaded from environment variables.
///
/// All secrets come from env vars (never flags, never hardcoded). The
/// .env file is loaded automatically at startup via dotenvy. Connection
/// topology (LND host, channels, routing rules) travels on the CLI; only
/// secrets live here.
pub struct Config {
    pub mastodon_instance: String,
    pub mastodon_access_token: String,
    pub matrix_homeserver: String,
    pub matrix_user: String,
    pub matrix_password: String,
}

impl Config {
    /// Load configuration from environment variables. Nothing is required
    /// up front — each destination validates its own variables when
    /// enabled.
    pub fn load() -> Result<Self> {
        Ok(Self {
            mastodon_instance: env::var("MASTODON_INSTANCE").unwrap_or_default(),
            mastodon_access_token: env::var("MASTODON_ACCESS_TOKEN").unwrap_or_default(),
            matrix_homeserver: env::var("MATRIX_HOMESERVER").unwrap_or_default(),
            matrix_user: env::var("MATRIX_USER").unwrap_or_default(),
            matrix_password: env::var("MATRIX_PASSWORD").unwrap_or_default(),
        })
    }

    /// Check that Mastodon credentials are configured.
    /// Call this before constructing the Mastodon sink.
    pub fn require_mastodon(&self) -> Result<()> {
        if self.mastodon_instance.is_empty() || self.mastodon_access_token.is_empty() {
            anyhow::bail!(
                "MASTODON_INSTANCE and MASTODON_ACCESS_TOKEN must be set to use --mastodon.\n\
                 Add them to your .env file."
            );
        }
        Ok(())
    }

    /// Check that Matrix credentials are configured.
    /// Call this before constructing the Matrix sink.
    pub fn require_matrix(&self) -> Result<()> {
        if self.matrix_homeserver.is_empty()
            || self.matrix_user.is_empty()
            || self.matrix_password.is_empty()
        {
            anyhow::bail!(
                "MATRIX_HOMESERVER, MATRIX_USER, and MATRIX_PASSWORD must be set to use --matrix.\n\
                 Add them to your .env file."
            );
        }
        Ok(())
    }
}
