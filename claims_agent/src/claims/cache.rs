use super::{ClaimRecord, ClaimSource};
use crate::error::Result;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct Snapshot {
    fetched_at: Instant,
    claims: Arc<Vec<ClaimRecord>>,
}

/// Time-boxed memoization of another [`ClaimSource`].
///
/// Failed fetches are never cached. Concurrent misses are collapsed into a
/// single upstream fetch.
pub struct CachedClaimSource<S> {
    inner: S,
    ttl: Duration,
    snapshot: RwLock<Option<Snapshot>>,
}

impl<S: ClaimSource> CachedClaimSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            snapshot: RwLock::new(None),
        }
    }

    /// Drop the current snapshot; the next fetch goes upstream.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }

    fn fresh(&self, snapshot: &Option<Snapshot>) -> Option<Arc<Vec<ClaimRecord>>> {
        snapshot
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < self.ttl)
            .map(|s| s.claims.clone())
    }
}

#[async_trait]
impl<S: ClaimSource> ClaimSource for CachedClaimSource<S> {
    async fn fetch_claims(&self) -> Result<Arc<Vec<ClaimRecord>>> {
        if let Some(claims) = self.fresh(&*self.snapshot.read().await) {
            return Ok(claims);
        }

        let mut snapshot = self.snapshot.write().await;
        // another request may have refreshed while we waited for the lock
        if let Some(claims) = self.fresh(&snapshot) {
            return Ok(claims);
        }

        debug!("claim cache miss, fetching upstream");
        let claims = self.inner.fetch_claims().await?;
        *snapshot = Some(Snapshot {
            fetched_at: Instant::now(),
            claims: claims.clone(),
        });
        Ok(claims)
    }
}
