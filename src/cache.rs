use std::sync::Arc;

use tokio::sync::RwLock;

pub struct CachedFeed {
    pub body: Vec<u8>,
    pub digest: String,
}

/// Last successfully rendered feed. Empty until the first publish; once
/// published it never goes back to empty.
#[derive(Default)]
pub struct FeedCache {
    inner: RwLock<Option<Arc<CachedFeed>>>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a new snapshot. Readers holding the previous snapshot are
    /// unaffected.
    pub async fn publish(&self, feed: CachedFeed) {
        *self.inner.write().await = Some(Arc::new(feed));
    }

    pub async fn snapshot(&self) -> Option<Arc<CachedFeed>> {
        self.inner.read().await.clone()
    }
}
