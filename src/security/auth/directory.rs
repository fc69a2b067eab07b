//! Principal Directory
//!
//! The directory lists service accounts and users, each with a numeric
//! identity (used inside ACLs) and a resource ID (shown to people). A
//! snapshot of it is fetched once per command and then only read.

use crate::error::{AclError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// One account in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Numeric identity used in ACL principals
    pub id: i32,
    /// Human-facing resource ID, e.g. `sa-123` or `u-abc`
    pub resource_id: String,
}

impl DirectoryEntry {
    pub fn new(id: i32, resource_id: impl Into<String>) -> Self {
        Self {
            id,
            resource_id: resource_id.into(),
        }
    }
}

/// Source of directory listings
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    async fn list_service_accounts(&self) -> Result<Vec<DirectoryEntry>>;

    async fn list_users(&self) -> Result<Vec<DirectoryEntry>>;
}

/// Directory held in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticDirectory {
    #[serde(default)]
    pub service_accounts: Vec<DirectoryEntry>,
    #[serde(default)]
    pub users: Vec<DirectoryEntry>,
}

impl StaticDirectory {
    pub fn new(service_accounts: Vec<DirectoryEntry>, users: Vec<DirectoryEntry>) -> Self {
        Self {
            service_accounts,
            users,
        }
    }
}

#[async_trait]
impl PrincipalDirectory for StaticDirectory {
    async fn list_service_accounts(&self) -> Result<Vec<DirectoryEntry>> {
        Ok(self.service_accounts.clone())
    }

    async fn list_users(&self) -> Result<Vec<DirectoryEntry>> {
        Ok(self.users.clone())
    }
}

/// Directory exported to a JSON file shaped like [`StaticDirectory`].
///
/// The file is read once; both listings come from that same read.
#[derive(Debug, Clone)]
pub struct FileDirectory {
    path: PathBuf,
    loaded: OnceCell<StaticDirectory>,
}

impl FileDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: OnceCell::new(),
        }
    }

    async fn load(&self) -> Result<&StaticDirectory> {
        self.loaded.get_or_try_init(|| self.read()).await
    }

    async fn read(&self) -> Result<StaticDirectory> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AclError::Directory(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let directory = serde_json::from_str(&content)?;
        debug!("Loaded directory file {}", self.path.display());
        Ok(directory)
    }
}

#[async_trait]
impl PrincipalDirectory for FileDirectory {
    async fn list_service_accounts(&self) -> Result<Vec<DirectoryEntry>> {
        Ok(self.load().await?.service_accounts.clone())
    }

    async fn list_users(&self) -> Result<Vec<DirectoryEntry>> {
        Ok(self.load().await?.users.clone())
    }
}

/// Immutable two-way map between resource IDs and numeric IDs
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    by_resource_id: HashMap<String, i32>,
    by_id: HashMap<i32, String>,
}

impl DirectorySnapshot {
    /// Merge service accounts and users from `directory` into one snapshot
    pub async fn fetch(directory: &dyn PrincipalDirectory) -> Result<Self> {
        let service_accounts = directory.list_service_accounts().await?;
        let users = directory.list_users().await?;
        debug!(
            "Fetched {} service accounts and {} users from directory",
            service_accounts.len(),
            users.len()
        );

        Ok(Self::from_entries(service_accounts.into_iter().chain(users)))
    }

    /// Build a snapshot from entries; on duplicates the first entry wins
    pub fn from_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        let mut snapshot = Self::default();

        for entry in entries {
            if snapshot.by_resource_id.contains_key(&entry.resource_id) {
                warn!("Ignoring duplicate directory entry for {}", entry.resource_id);
                continue;
            }
            snapshot.by_id.entry(entry.id).or_insert_with(|| entry.resource_id.clone());
            snapshot.by_resource_id.insert(entry.resource_id, entry.id);
        }

        snapshot
    }

    pub fn id_for(&self, resource_id: &str) -> Option<i32> {
        self.by_resource_id.get(resource_id).copied()
    }

    pub fn resource_id_for(&self, id: i32) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_resource_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_resource_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn directory() -> StaticDirectory {
        StaticDirectory::new(
            vec![DirectoryEntry::new(1, "sa-1"), DirectoryEntry::new(2, "sa-2")],
            vec![DirectoryEntry::new(10, "u-abc")],
        )
    }

    #[tokio::test]
    async fn test_fetch_merges_service_accounts_and_users() {
        let snapshot = DirectorySnapshot::fetch(&directory()).await.unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.id_for("sa-2"), Some(2));
        assert_eq!(snapshot.id_for("u-abc"), Some(10));
        assert_eq!(snapshot.resource_id_for(10), Some("u-abc"));
        assert_eq!(snapshot.id_for("sa-9"), None);
    }

    #[test]
    fn test_duplicate_resource_ids_keep_first() {
        let snapshot = DirectorySnapshot::from_entries(vec![
            DirectoryEntry::new(1, "sa-1"),
            DirectoryEntry::new(7, "sa-1"),
        ]);

        assert_eq!(snapshot.id_for("sa-1"), Some(1));
        assert_eq!(snapshot.resource_id_for(7), None);
    }

    #[tokio::test]
    async fn test_file_directory() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"service_accounts": [{{"id": 5, "resource_id": "sa-5"}}], "users": []}}"#
        )
        .unwrap();

        let directory = FileDirectory::new(file.path());
        let snapshot = DirectorySnapshot::fetch(&directory).await.unwrap();
        assert_eq!(snapshot.id_for("sa-5"), Some(5));
    }

    #[tokio::test]
    async fn test_file_directory_reads_file_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"service_accounts": [{{"id": 5, "resource_id": "sa-5"}}], "users": [{{"id": 6, "resource_id": "u-6"}}]}}"#
        )
        .unwrap();

        let directory = FileDirectory::new(file.path());
        let service_accounts = directory.list_service_accounts().await.unwrap();

        // A rewrite after the first listing must not change the second one
        std::fs::write(file.path(), r#"{"service_accounts": [], "users": []}"#).unwrap();
        let users = directory.list_users().await.unwrap();

        assert_eq!(service_accounts, vec![DirectoryEntry::new(5, "sa-5")]);
        assert_eq!(users, vec![DirectoryEntry::new(6, "u-6")]);
    }

    #[tokio::test]
    async fn test_file_directory_missing_file() {
        let directory = FileDirectory::new("/nonexistent/directory.json");
        let err = DirectorySnapshot::fetch(&directory).await.unwrap_err();
        assert!(matches!(err, AclError::Directory(_)));
    }
}
