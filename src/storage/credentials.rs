use super::{KeyValueStore, StorageError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Local storage key holding the JSON array of submitted credentials.
pub const CREDENTIALS_KEY: &str = "user_credentials";

/// Local storage key holding the last successfully logged in username.
pub const USERNAME_KEY: &str = "username";

/// One submitted username/password pair.
///
/// The password is kept in clear text so existing stored lists stay readable.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    pub username: String,
    pub password: String,
    pub login_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl CredentialEntry {
    /// Entry stamped with the current time.
    #[must_use]
    pub fn new(username: &str, password: &str, user_agent: Option<String>) -> Self {
        Self::at(username, password, Utc::now(), user_agent)
    }

    #[must_use]
    pub fn at(
        username: &str,
        password: &str,
        login_time: DateTime<Utc>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            login_time: login_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            user_agent,
        }
    }
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("username", &self.username)
            .field("password", &"***")
            .field("login_time", &self.login_time)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Read the stored credential list. A missing key is an empty list.
///
/// # Errors
/// Returns an error if the store cannot be read or an item does not decode as
/// a [`CredentialEntry`].
pub fn load_local(store: &dyn KeyValueStore) -> Result<Vec<CredentialEntry>, StorageError> {
    match store.get(CREDENTIALS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Read the stored credential list as raw JSON items, leaving entries written
/// by other clients untouched.
///
/// A value that is not a JSON array counts as an empty list.
///
/// # Errors
/// Returns an error if the store cannot be read.
pub fn load_local_values(store: &dyn KeyValueStore) -> Result<Vec<Value>, StorageError> {
    let Some(raw) = store.get(CREDENTIALS_KEY)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(other) => {
            warn!("discarding credential list that is not an array: {}", other);
            Ok(Vec::new())
        }
        Err(err) => {
            warn!("discarding unreadable credential list: {}", err);
            Ok(Vec::new())
        }
    }
}

/// Append `entry` to the stored credential list and return the new length.
///
/// Existing items are kept as they are, whatever their shape. A list that
/// cannot be decoded is replaced by a fresh one.
///
/// # Errors
/// Returns an error if the store cannot be read or written.
pub fn append_local(
    store: &dyn KeyValueStore,
    entry: CredentialEntry,
) -> Result<usize, StorageError> {
    let mut items = load_local_values(store)?;
    items.push(serde_json::to_value(&entry)?);
    store.set(CREDENTIALS_KEY, &serde_json::to_string(&items)?)?;

    debug!("local credential list holds {} entries", items.len());

    Ok(items.len())
}
