//! Transport Boundary
//!
//! The engine only prepares bindings and filters; a transport sends them to a
//! cluster. Batch bookkeeping (how far a batch got before failing) lives here
//! on the caller side, since only the caller sees network outcomes.

use crate::error::{AclError, Result};
use crate::security::acl::{AclBinding, AclFilter};
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info};

/// Sends ACL requests to a cluster
#[async_trait]
pub trait AclTransport: Send + Sync {
    /// Create one binding
    async fn create_acl(&self, binding: &AclBinding) -> Result<()>;

    /// Delete every binding matching `filter`, returning what was deleted
    async fn delete_acls(&self, filter: &AclFilter) -> Result<Vec<AclBinding>>;

    /// List every binding matching `filter`
    async fn list_acls(&self, filter: &AclFilter) -> Result<Vec<AclBinding>>;
}

/// Transport that keeps bindings in memory
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    bindings: Mutex<Vec<AclBinding>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Vec<AclBinding>) -> Self {
        Self {
            bindings: Mutex::new(bindings),
        }
    }

    pub fn snapshot(&self) -> Vec<AclBinding> {
        self.bindings.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.bindings.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.lock().is_empty()
    }
}

#[async_trait]
impl AclTransport for InMemoryTransport {
    async fn create_acl(&self, binding: &AclBinding) -> Result<()> {
        let mut bindings = self.bindings.lock();
        if !bindings.contains(binding) {
            debug!("Creating ACL: {}", binding);
            bindings.push(binding.clone());
        }
        Ok(())
    }

    async fn delete_acls(&self, filter: &AclFilter) -> Result<Vec<AclBinding>> {
        let mut bindings = self.bindings.lock();
        let (deleted, kept): (Vec<_>, Vec<_>) = bindings.drain(..).partition(|b| filter.matches(b));
        *bindings = kept;
        debug!("Deleted {} ACLs matching {}", deleted.len(), filter);
        Ok(deleted)
    }

    async fn list_acls(&self, filter: &AclFilter) -> Result<Vec<AclBinding>> {
        Ok(self
            .bindings
            .lock()
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }
}

/// Result of submitting a batch one request at a time
#[derive(Debug)]
pub struct BatchOutcome<T> {
    /// Results of the requests that succeeded, in submission order
    pub succeeded: Vec<T>,
    /// Index and error of the request that stopped the batch
    pub failed: Option<(usize, AclError)>,
}

impl<T> BatchOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Convert into a plain result, dropping partial progress on failure
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.failed {
            Some((_, e)) => Err(e),
            None => Ok(self.succeeded),
        }
    }
}

/// Create `bindings` in order, stopping at the first transport error.
///
/// Earlier bindings stay created on the server when a later one fails.
pub async fn submit_bindings(transport: &dyn AclTransport, bindings: &[AclBinding]) -> BatchOutcome<()> {
    let mut succeeded = Vec::with_capacity(bindings.len());

    for (index, binding) in bindings.iter().enumerate() {
        if let Err(e) = transport.create_acl(binding).await {
            error!(
                "Failed to create ACL {} of {} ({}): {}",
                index + 1,
                bindings.len(),
                binding,
                e
            );
            return BatchOutcome {
                succeeded,
                failed: Some((index, e)),
            };
        }
        succeeded.push(());
    }

    info!("Created {} ACLs", succeeded.len());
    BatchOutcome {
        succeeded,
        failed: None,
    }
}

/// Delete by each filter in order, stopping at the first transport error
pub async fn submit_filters(
    transport: &dyn AclTransport,
    filters: &[AclFilter],
) -> BatchOutcome<Vec<AclBinding>> {
    let mut succeeded = Vec::with_capacity(filters.len());

    for (index, filter) in filters.iter().enumerate() {
        match transport.delete_acls(filter).await {
            Ok(deleted) => succeeded.push(deleted),
            Err(e) => {
                error!("Failed to delete ACLs matching {}: {}", filter, e);
                return BatchOutcome {
                    succeeded,
                    failed: Some((index, e)),
                };
            }
        }
    }

    info!(
        "Deleted {} ACLs",
        succeeded.iter().map(Vec::len).sum::<usize>()
    );
    BatchOutcome {
        succeeded,
        failed: None,
    }
}
