//! Credential lookup for remote dataset sources.
//!
//! Credentials are read only when a fetch needs them. They are never written
//! to disk, logged, or echoed in errors; `KaggleCredentials` redacts its key
//! in `Debug` output.
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

#[derive(Clone, Deserialize)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl fmt::Debug for KaggleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KaggleCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

pub trait CredentialProvider {
    fn describe(&self) -> String;

    fn credentials(&self) -> Result<KaggleCredentials>;
}

/// `KAGGLE_USERNAME` / `KAGGLE_KEY` from the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    pub const USERNAME_VAR: &'static str = "KAGGLE_USERNAME";
    pub const KEY_VAR: &'static str = "KAGGLE_KEY";

    pub fn is_available() -> bool {
        std::env::var_os(Self::USERNAME_VAR).is_some() && std::env::var_os(Self::KEY_VAR).is_some()
    }
}

impl CredentialProvider for EnvCredentials {
    fn describe(&self) -> String {
        format!("environment ({} / {})", Self::USERNAME_VAR, Self::KEY_VAR)
    }

    fn credentials(&self) -> Result<KaggleCredentials> {
        let read = |var: &str| {
            std::env::var(var).map_err(|_| {
                PipelineError::acquisition(self.describe(), format!("{} is not set", var))
            })
        };
        Ok(KaggleCredentials {
            username: read(Self::USERNAME_VAR)?,
            key: read(Self::KEY_VAR)?,
        })
    }
}

/// A `kaggle.json` file holding `{"username": ..., "key": ...}`.
#[derive(Debug, Clone)]
pub struct KaggleJsonFile {
    pub path: PathBuf,
}

impl KaggleJsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        KaggleJsonFile { path: path.into() }
    }

    /// `$KAGGLE_CONFIG_DIR/kaggle.json`, else `~/.kaggle/kaggle.json`.
    pub fn default_location() -> Option<Self> {
        let dir = std::env::var_os("KAGGLE_CONFIG_DIR")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .or_else(|| std::env::var_os("USERPROFILE"))
                    .map(|home| PathBuf::from(home).join(".kaggle"))
            })?;
        Some(KaggleJsonFile::new(dir.join("kaggle.json")))
    }
}

impl CredentialProvider for KaggleJsonFile {
    fn describe(&self) -> String {
        format!("credentials file {}", self.path.display())
    }

    fn credentials(&self) -> Result<KaggleCredentials> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| PipelineError::acquisition(self.describe(), e))?;
        // serde_json errors can quote the offending input, so only keep the position.
        serde_json::from_str(&content).map_err(|e| {
            PipelineError::acquisition(
                self.describe(),
                format!("malformed credentials at line {} column {}", e.line(), e.column()),
            )
        })
    }
}

/// Environment variables when both are set, the default `kaggle.json` otherwise.
pub fn default_provider() -> Option<Box<dyn CredentialProvider>> {
    if EnvCredentials::is_available() {
        return Some(Box::new(EnvCredentials));
    }
    KaggleJsonFile::default_location().map(|f| Box::new(f) as Box<dyn CredentialProvider>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let creds = KaggleCredentials {
            username: "someone".to_string(),
            key: "s3cr3t".to_string(),
        };
        let shown = format!("{:?}", creds);
        assert!(shown.contains("someone"));
        assert!(!shown.contains("s3cr3t"));
    }

    #[test]
    fn json_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kaggle.json");
        std::fs::write(&path, r#"{"username": "u", "key": "k"}"#).unwrap();
        let creds = KaggleJsonFile::new(&path).credentials().unwrap();
        assert_eq!(creds.username, "u");
        assert_eq!(creds.key, "k");
    }

    #[test]
    fn malformed_json_does_not_echo_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kaggle.json");
        std::fs::write(&path, r#"{"username": "u", "key": s3cr3t}"#).unwrap();
        let err = KaggleJsonFile::new(&path).credentials().unwrap_err();
        assert!(!err.to_string().contains("s3cr3t"));
    }
}
