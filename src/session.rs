use crate::errors::SessionError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info};

/// Who is signed in to the admin console. Display and logout only; the
/// token is never checked on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub admin_token: String,
    pub admin_user: String,
}

impl AdminSession {
    pub fn new(token: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            admin_token: token.into(),
            admin_user: user.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Option<AdminSession> {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(session) => Some(session),
                Err(err) => {
                    error!("failed to parse session file: {err}");
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read session file: {err}");
                None
            }
        }
    }

    pub async fn login(&self, session: &AdminSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| SessionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_vec_pretty(session)?;
        fs::write(&self.path, payload)
            .await
            .map_err(|source| SessionError::Io {
                path: self.path.clone(),
                source,
            })?;
        info!(user = %session.admin_user, "admin signed in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("admin signed out");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
