//! Account lookup abstraction.
//!
//! The fetcher only needs "give me the metadata payload of this account".
//! Production code uses [`crate::hive::HiveAccountLookup`]; tests use
//! [`FakeAccountLookup`] with pre-configured accounts and no network access.

use crate::error::LookupError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Account as seen by the fetcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountRecord {
    /// Raw `json_metadata` string, if the account carries one
    pub metadata_payload: Option<String>,
}

impl AccountRecord {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            metadata_payload: Some(payload.into()),
        }
    }

    pub fn without_payload() -> Self {
        Self::default()
    }
}

/// Resolves an account identifier to its record.
///
/// `Ok(None)` means the account does not exist. Transport or RPC failures
/// are returned as [`LookupError`].
#[async_trait]
pub trait AccountLookup: Send + Sync {
    async fn lookup(&self, account: &str) -> Result<Option<AccountRecord>, LookupError>;
}

#[async_trait]
impl<T: AccountLookup + ?Sized> AccountLookup for Arc<T> {
    async fn lookup(&self, account: &str) -> Result<Option<AccountRecord>, LookupError> {
        (**self).lookup(account).await
    }
}

// ============================================================================
// Fake Account Lookup (Testing)
// ============================================================================

/// Pre-configured lookup outcome
#[derive(Debug, Clone)]
enum FakeOutcome {
    Found(AccountRecord),
    Fail(String),
}

/// In-memory lookup for deterministic tests
///
/// ```rust,ignore
/// let lookup = FakeAccountLookupBuilder::new()
///     .account("flowerengine", r#"{"nodes":[],"failing_nodes":{}}"#)
///     .build();
/// let fetcher = MetadataFetcher::new(lookup);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FakeAccountLookup {
    accounts: HashMap<String, FakeOutcome>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

impl FakeAccountLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lookups made for an account
    pub fn call_count(&self, account: &str) -> usize {
        self.call_counts
            .lock()
            .map(|counts| counts.get(account).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total lookups across all accounts
    pub fn total_calls(&self) -> usize {
        self.call_counts
            .lock()
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }
}

#[async_trait]
impl AccountLookup for FakeAccountLookup {
    async fn lookup(&self, account: &str) -> Result<Option<AccountRecord>, LookupError> {
        if let Ok(mut counts) = self.call_counts.lock() {
            *counts.entry(account.to_string()).or_insert(0) += 1;
        }

        match self.accounts.get(account) {
            Some(FakeOutcome::Found(record)) => Ok(Some(record.clone())),
            Some(FakeOutcome::Fail(message)) => Err(LookupError::Unavailable(message.clone())),
            None => Ok(None),
        }
    }
}

/// Builder for FakeAccountLookup
#[derive(Debug, Default)]
pub struct FakeAccountLookupBuilder {
    accounts: HashMap<String, FakeOutcome>,
}

impl FakeAccountLookupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account whose `json_metadata` is `payload`
    pub fn account(mut self, name: &str, payload: &str) -> Self {
        self.accounts.insert(
            name.to_string(),
            FakeOutcome::Found(AccountRecord::with_payload(payload)),
        );
        self
    }

    /// Account that exists but has no metadata
    pub fn account_without_metadata(mut self, name: &str) -> Self {
        self.accounts.insert(
            name.to_string(),
            FakeOutcome::Found(AccountRecord::without_payload()),
        );
        self
    }

    /// Lookups for this account fail with `LookupError::Unavailable`
    pub fn failing_account(mut self, name: &str, message: &str) -> Self {
        self.accounts
            .insert(name.to_string(), FakeOutcome::Fail(message.to_string()));
        self
    }

    pub fn build(self) -> FakeAccountLookup {
        FakeAccountLookup {
            accounts: self.accounts,
            call_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_lookup_outcomes() {
        let fake = FakeAccountLookupBuilder::new()
            .account("flowerengine", "{}")
            .account_without_metadata("bare")
            .failing_account("broken", "connection refused")
            .build();

        let found = fake.lookup("flowerengine").await.unwrap().unwrap();
        assert_eq!(found.metadata_payload.as_deref(), Some("{}"));

        let bare = fake.lookup("bare").await.unwrap().unwrap();
        assert!(bare.metadata_payload.is_none());

        assert!(fake.lookup("nobody").await.unwrap().is_none());
        assert!(matches!(
            fake.lookup("broken").await,
            Err(LookupError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_fake_lookup_counts_calls() {
        let fake = FakeAccountLookupBuilder::new()
            .account("flowerengine", "{}")
            .build();

        fake.lookup("flowerengine").await.unwrap();
        fake.lookup("flowerengine").await.unwrap();
        fake.lookup("other").await.unwrap();

        assert_eq!(fake.call_count("flowerengine"), 2);
        assert_eq!(fake.call_count("other"), 1);
        assert_eq!(fake.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_arc_lookup_delegates() {
        let fake = Arc::new(FakeAccountLookupBuilder::new().account("a", "{}").build());
        let shared: Arc<dyn AccountLookup> = fake.clone();

        assert!(shared.lookup("a").await.unwrap().is_some());
        assert_eq!(fake.call_count("a"), 1);
    }
}
