//! Where submitted credentials end up.

use crate::remote::DocumentStore;
use crate::storage::{credentials, CredentialEntry, KeyValueStore, StorageError};
use std::{fmt, sync::Arc};
use tracing::{info, instrument, warn};

/// Persistence policy, chosen by configuration.
#[derive(Clone)]
pub enum PersistencePolicy {
    /// Read-modify-write the remote document, falling back to local storage
    /// when the write fails.
    RemoteFirst(Arc<dyn DocumentStore>),
    /// Append to local storage only.
    LocalOnly,
}

impl fmt::Debug for PersistencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteFirst(_) => f.write_str("RemoteFirst"),
            Self::LocalOnly => f.write_str("LocalOnly"),
        }
    }
}

/// Where an entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Remote,
    Local,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote store"),
            Self::Local => write!(f, "local storage"),
        }
    }
}

#[derive(Clone)]
pub struct CredentialPersistence {
    policy: PersistencePolicy,
    local: Arc<dyn KeyValueStore>,
}

impl CredentialPersistence {
    pub fn new(policy: PersistencePolicy, local: Arc<dyn KeyValueStore>) -> Self {
        Self { policy, local }
    }

    #[must_use]
    pub fn policy(&self) -> &PersistencePolicy {
        &self.policy
    }

    /// Append `entry` according to the policy.
    ///
    /// Remote failures are never returned: a failed read counts as an empty
    /// list and a failed write falls back to local storage.
    ///
    /// # Errors
    /// Returns an error only if local storage cannot be written.
    #[instrument(skip(self, entry), fields(username = %entry.username))]
    pub async fn persist(&self, entry: CredentialEntry) -> Result<Destination, StorageError> {
        match &self.policy {
            PersistencePolicy::LocalOnly => self.persist_local(entry),
            PersistencePolicy::RemoteFirst(remote) => {
                let mut entries = remote.fetch().await.unwrap_or_else(|err| {
                    warn!("could not read remote credential list, starting empty: {}", err);
                    Vec::new()
                });
                entries.push(serde_json::to_value(&entry)?);

                match remote.replace(&entries).await {
                    Ok(()) => {
                        info!("credential list written to remote store");
                        Ok(Destination::Remote)
                    }
                    Err(err) => {
                        warn!("remote write failed, falling back to local storage: {}", err);
                        self.persist_local(entry)
                    }
                }
            }
        }
    }

    fn persist_local(&self, entry: CredentialEntry) -> Result<Destination, StorageError> {
        credentials::append_local(self.local.as_ref(), entry)?;
        info!("credential list written to local storage");
        Ok(Destination::Local)
    }
}

impl fmt::Debug for CredentialPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPersistence")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::remote::{RemoteError, RemoteStore, StoreFuture, DEFAULT_TIMEOUT};
    use crate::storage::{credentials::load_local, MemoryStore};
    use reqwest::StatusCode;
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use std::{net::TcpListener, sync::Mutex, time::Duration};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn remote(uri: &str) -> Arc<dyn DocumentStore> {
        remote_with_timeout(uri, DEFAULT_TIMEOUT)
    }

    fn remote_with_timeout(uri: &str, timeout: Duration) -> Arc<dyn DocumentStore> {
        Arc::new(
            RemoteStore::new(
                &format!("{uri}/b/1"),
                SecretString::from("key".to_string()),
                timeout,
            )
            .unwrap(),
        )
    }

    /// In-process document store that can be told to fail.
    #[derive(Default)]
    struct FakeDocument {
        record: Mutex<Vec<Value>>,
        fail_fetch: bool,
        fail_replace: bool,
    }

    fn unavailable() -> RemoteError {
        RemoteError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "unavailable".to_string(),
        }
    }

    impl DocumentStore for FakeDocument {
        fn fetch(&self) -> StoreFuture<'_, Vec<Value>> {
            Box::pin(async move {
                if self.fail_fetch {
                    return Err(unavailable());
                }
                Ok(self.record.lock().unwrap().clone())
            })
        }

        fn replace<'a>(&'a self, entries: &'a [Value]) -> StoreFuture<'a, ()> {
            Box::pin(async move {
                if self.fail_replace {
                    return Err(unavailable());
                }
                *self.record.lock().unwrap() = entries.to_vec();
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn local_only_appends() {
        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(PersistencePolicy::LocalOnly, local.clone());

        let first = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();
        persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();

        assert_eq!(first, Destination::Local);
        assert_eq!(load_local(local.as_ref()).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn remote_write_keeps_foreign_entries() {
        let document = Arc::new(FakeDocument::default());
        *document.record.lock().unwrap() = vec![json!({"username": "carol", "password": "pw1234"})];

        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(document.clone()),
            local.clone(),
        );

        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();

        assert_eq!(destination, Destination::Remote);
        assert!(local.is_empty().unwrap());
        let record = document.record.lock().unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record[0], json!({"username": "carol", "password": "pw1234"}));
        assert_eq!(record[1]["username"], "alice");
    }

    #[tokio::test]
    async fn rejected_write_falls_back_without_network() {
        let document = Arc::new(FakeDocument {
            fail_fetch: true,
            fail_replace: true,
            ..FakeDocument::default()
        });

        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(document.clone()),
            local.clone(),
        );

        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();

        assert_eq!(destination, Destination::Local);
        assert!(document.record.lock().unwrap().is_empty());
        let entries = load_local(local.as_ref()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "alice");
    }

    #[tokio::test]
    async fn unreadable_document_is_replaced_with_new_entry() {
        let document = Arc::new(FakeDocument {
            fail_fetch: true,
            ..FakeDocument::default()
        });

        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(document.clone()),
            local.clone(),
        );

        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();

        assert_eq!(destination, Destination::Remote);
        assert_eq!(document.record.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remote_first_appends_to_existing_document() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/b/1/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "record": [
                    {"username": "bob", "password": "hunter22", "loginTime": "2024-01-01T00:00:00.000Z"},
                    {"username": "carol", "password": "pw1234"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/b/1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(remote(&server.uri())),
            local.clone(),
        );

        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();
        assert_eq!(destination, Destination::Remote);
        assert!(local.is_empty().unwrap());

        let requests = server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|request| request.method.as_str() == "PUT")
            .unwrap();
        let body: Vec<Value> = serde_json::from_slice(&put.body).unwrap();
        let names: Vec<&str> = body
            .iter()
            .filter_map(|entry| entry["username"].as_str())
            .collect();
        assert_eq!(names, vec!["bob", "carol", "alice"]);
        assert_eq!(body[1], json!({"username": "carol", "password": "pw1234"}));
    }

    #[tokio::test]
    async fn failed_read_still_writes_remote() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(remote(&server.uri())),
            local.clone(),
        );

        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();
        assert_eq!(destination, Destination::Remote);
        assert!(local.is_empty().unwrap());
    }

    #[tokio::test]
    async fn failed_write_falls_back_to_local() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(remote(&server.uri())),
            local.clone(),
        );

        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();
        assert_eq!(destination, Destination::Local);

        let entries = load_local(local.as_ref()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "alice");
    }

    #[tokio::test]
    async fn slow_remote_times_out_to_local() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "record": [] }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(remote_with_timeout(
                &server.uri(),
                Duration::from_millis(300),
            )),
            local.clone(),
        );

        let started = std::time::Instant::now();
        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();

        assert_eq!(destination, Destination::Local);
        assert!(started.elapsed() < Duration::from_secs(5));
        let entries = load_local(local.as_ref()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "alice");
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_local() {
        // nothing listens on the reserved discard port
        let local = Arc::new(MemoryStore::new());
        let persistence = CredentialPersistence::new(
            PersistencePolicy::RemoteFirst(remote("http://127.0.0.1:9")),
            local.clone(),
        );

        let destination = persistence
            .persist(CredentialEntry::new("alice", "secret1", None))
            .await
            .unwrap();
        assert_eq!(destination, Destination::Local);
        assert_eq!(load_local(local.as_ref()).unwrap().len(), 1);
    }
}
