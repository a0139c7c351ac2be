use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Res, config::Config};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WatermarkFile {
    last_update: String,
}

/// Persists the moment of the last confirmed run as
/// `{"last_update": "<RFC 3339 UTC>"}`.
pub struct WatermarkManager {
    path: PathBuf,
}

impl WatermarkManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.watermark_path())
    }

    /// Reads the stored watermark. A missing file means no confirmed run has
    /// happened yet and yields `Ok(None)`.
    ///
    /// Timestamps written with a trailing `Z` or an explicit offset are both
    /// accepted.
    pub async fn load(&self) -> Res<Option<DateTime<Utc>>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: WatermarkFile = serde_json::from_str(&content)?;
        Ok(crate::utils::parse_timestamp(&file.last_update))
    }

    pub async fn persist(&self, at: DateTime<Utc>) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&WatermarkFile {
            last_update: at.to_rfc3339(),
        })?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}
