use std::{io::ErrorKind, path::PathBuf};

use serde_json::{Map, Value};
use tokio::fs;

use crate::errors::SecretsError;

/// Reads single keys out of a local JSON object file.
///
/// The file is read on every lookup so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct SecretsStore {
    path: PathBuf,
}

impl SecretsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>, SecretsError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(SecretsError::ConfigMissing),
            Err(e) => return Err(SecretsError::Read(e)),
        };

        let mut secrets: Map<String, Value> = serde_json::from_str(&raw).map_err(SecretsError::Parse)?;
        Ok(secrets.remove(key))
    }
}
