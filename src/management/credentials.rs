use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use super::StoreError;

pub const KEY_CLIENT_ID: &str = "CLIENT_ID";
pub const KEY_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const KEY_ACCESS_TOKEN: &str = "ACCESS_TOKEN";
pub const KEY_REFRESH_TOKEN: &str = "REFRESH_TOKEN";
pub const KEY_USER_ID: &str = "USER_ID";

// Older .env files spell the secret key this way.
const KEY_CLIENT_SECRET_LEGACY: &str = "CLIENT_SECRETE";

/// The credential set a session works with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_id: Option<String>,
}

/// Durable `KEY=value` storage of the credential set.
///
/// Values in the file win over the process environment because tokens are
/// rewritten here during a run while the environment keeps whatever was
/// loaded at startup.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the credential set.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be parsed, or if neither the file
    /// nor the environment provide a client id and secret.
    pub async fn load(&self) -> Result<Credentials, StoreError> {
        let entries = self.read_entries()?;
        let lookup = |key: &str| -> Option<String> {
            entries
                .get(key)
                .cloned()
                .or_else(|| env::var(key).ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let client_id = lookup(KEY_CLIENT_ID).ok_or(StoreError::MissingKey(KEY_CLIENT_ID))?;
        let client_secret = lookup(KEY_CLIENT_SECRET)
            .or_else(|| lookup(KEY_CLIENT_SECRET_LEGACY))
            .ok_or(StoreError::MissingKey(KEY_CLIENT_SECRET))?;

        Ok(Credentials {
            client_id,
            client_secret,
            access_token: lookup(KEY_ACCESS_TOKEN),
            refresh_token: lookup(KEY_REFRESH_TOKEN),
            user_id: lookup(KEY_USER_ID),
        })
    }

    pub async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.save_all(&[(key, value)]).await
    }

    /// Overwrites several keys with a single file replacement.
    ///
    /// The first line of a key gets the new value and later lines of the same
    /// key are dropped. Keys that are not in the file yet are appended; other
    /// lines, comments included, are kept as they are.
    pub async fn save_all(&self, pairs: &[(&str, &str)]) -> Result<(), StoreError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(StoreError::IoError(e)),
        };

        let mut written: Vec<&str> = Vec::new();
        let mut lines: Vec<String> = Vec::new();
        for line in content.lines() {
            let pair = line_key(line).and_then(|key| pairs.iter().find(|(k, _)| *k == key));
            match pair {
                Some((k, v)) => {
                    if !written.contains(k) {
                        lines.push(format_entry(k, v));
                        written.push(*k);
                    }
                }
                None => lines.push(line.to_string()),
            }
        }
        lines.extend(
            pairs
                .iter()
                .filter(|(k, _)| !written.contains(k))
                .map(|(k, v)| format_entry(k, v)),
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        async_fs::write(&tmp, lines.join("\n") + "\n").await?;
        async_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.is_file() {
            return Ok(HashMap::new());
        }

        let parse_error = |e: dotenv::Error| StoreError::ParseError {
            path: self.path.clone(),
            message: e.to_string(),
        };

        // Deprecated in dotenv 0.15; still the only reader that leaves the
        // process environment alone.
        #[allow(deprecated)]
        let entries = dotenv::from_path_iter(&self.path).map_err(parse_error)?;
        entries
            .map(|entry| entry.map_err(parse_error))
            .collect()
    }
}

fn line_key(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    line.split_once('=').map(|(k, _)| k.trim())
}

fn format_entry(key: &str, value: &str) -> String {
    if value.chars().any(|c| c.is_whitespace() || c == '#' || c == '"') {
        format!("{}='{}'", key, value)
    } else {
        format!("{}={}", key, value)
    }
}
