// Copyright 2025 Cowboy AI, LLC.

//! Durable draft snapshots with a freshness window

use super::snapshot_store::{SnapshotError, SnapshotStore};
use crate::catalog::Catalog;
use crate::client::ClientInfo;
use crate::draft::OrderDraft;
use crate::pair::Pair;
use crate::wizard::WizardStep;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Key the draft is stored under unless configured otherwise
pub const DEFAULT_DRAFT_KEY: &str = "cordo.order_draft";

/// How long a snapshot stays restorable unless configured otherwise
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Serialized form of a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    /// Pairs in order
    pub pairs: Vec<Pair>,
    /// Step the customer was on
    pub current_step: WizardStep,
    /// Client form contents
    #[serde(default)]
    pub client_info: ClientInfo,
    /// When the snapshot was written, as epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub saved_at: DateTime<Utc>,
}

impl DraftSnapshot {
    /// Capture a draft at `now`
    pub fn capture(draft: &OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            pairs: draft.pairs().to_vec(),
            current_step: draft.current_step(),
            client_info: draft.client_info().clone(),
            saved_at: now,
        }
    }

    /// Whether the snapshot is older than `ttl` at `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.saved_at) > ttl
    }
}

/// Saves and restores the one draft a session works on
///
/// Persistence is best-effort: failures are logged and never reach the
/// caller, the wizard keeps working from memory.
#[derive(Debug, Clone)]
pub struct PersistenceGateway<S> {
    store: S,
    key: String,
    ttl: Duration,
}

impl<S: SnapshotStore> PersistenceGateway<S> {
    /// Gateway with the default key and TTL
    pub fn new(store: S) -> Self {
        Self::with_settings(store, DEFAULT_DRAFT_KEY, Duration::hours(DEFAULT_TTL_HOURS))
    }

    /// Gateway with an explicit key and TTL
    pub fn with_settings(store: S, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
        }
    }

    /// Storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Freshness window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save the draft now
    pub fn save(&self, draft: &OrderDraft) {
        self.save_at(draft, Utc::now());
    }

    /// Save the draft stamped with `now`
    pub fn save_at(&self, draft: &OrderDraft, now: DateTime<Utc>) {
        let snapshot = DraftSnapshot::capture(draft, now);
        let result = serde_json::to_string(&snapshot)
            .map_err(SnapshotError::from)
            .and_then(|json| self.store.put(&self.key, &json));
        if let Err(err) = result {
            warn!(key = %self.key, error = %err, "failed to save draft snapshot");
        }
    }

    /// Restore the saved draft, if one is present and fresh
    pub fn load(&self, catalog: &Catalog) -> Option<OrderDraft> {
        self.load_at(catalog, Utc::now())
    }

    /// Restore the saved draft as seen at `now`
    ///
    /// Expired or unreadable snapshots are removed. Restored pairs are
    /// normalized against `catalog`.
    pub fn load_at(&self, catalog: &Catalog, now: DateTime<Utc>) -> Option<OrderDraft> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to read draft snapshot");
                return None;
            }
        };

        let snapshot: DraftSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                debug!(key = %self.key, error = %err, "discarding unreadable draft snapshot");
                self.discard();
                return None;
            }
        };

        if snapshot.is_expired(now, self.ttl) {
            debug!(key = %self.key, saved_at = %snapshot.saved_at, "discarding expired draft snapshot");
            self.discard();
            return None;
        }

        let mut pairs = snapshot.pairs;
        let repaired = pairs
            .iter_mut()
            .fold(0usize, |n, pair| n + usize::from(pair.normalize(catalog)));
        if repaired > 0 {
            debug!(repaired, "normalized restored pairs");
        }

        let mut seen = HashSet::with_capacity(pairs.len());
        let mut reassigned = 0usize;
        for pair in &mut pairs {
            while !seen.insert(pair.id()) {
                pair.reassign_id();
                reassigned += 1;
            }
        }
        if reassigned > 0 {
            debug!(reassigned, "gave duplicate restored pairs fresh ids");
        }

        Some(OrderDraft::restore(
            pairs,
            snapshot.client_info,
            snapshot.current_step,
        ))
    }

    /// Forget the saved draft
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %err, "failed to clear draft snapshot");
        }
    }

    fn discard(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %err, "failed to remove stale draft snapshot");
        }
    }
}
