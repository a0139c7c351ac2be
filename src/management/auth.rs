use std::path::PathBuf;

use chrono::Utc;

use crate::{Error, Res, config::Config, spotify, types::Token, warning};

/// Refresh this many seconds before the token actually expires.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    path: PathBuf,
    client_id: String,
    token_url: String,
}

impl TokenManager {
    pub fn new(config: &Config, token: Token) -> Self {
        TokenManager {
            token,
            path: config.token_path(),
            client_id: config.client_id.clone(),
            token_url: config.token_url.clone(),
        }
    }

    /// Loads the token stored by `genrecli auth`.
    ///
    /// # Errors
    ///
    /// [`Error::Auth`] if no token file exists or it cannot be parsed.
    pub async fn load(config: &Config) -> Res<Self> {
        let path = config.token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            Error::Auth(format!(
                "no token at {} ({e}). Please run genrecli auth",
                path.display()
            ))
        })?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| Error::Auth(format!("unreadable token file: {e}")))?;
        Ok(Self::new(config, token))
    }

    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing it first when it is about to
    /// expire. A failed refresh keeps the old token; the next API call then
    /// reports the authorization error.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            match spotify::auth::refresh_token(
                &self.token_url,
                &self.client_id,
                &self.token.refresh_token,
            )
            .await
            {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to save refreshed token: {}", e);
                    }
                }
                Err(e) => warning!("Token refresh failed: {}", e),
            }
        }

        self.token.access_token.clone()
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }
}
