/// One-shot transfer of a comparison selection from the Tools page to the
/// Compare page.
///
/// `put` stores the selection as a JSON array of tool objects under a fresh
/// token; `take` reads it once and deletes the slot. Anything unreadable on
/// the receiving side (missing, expired, malformed) becomes an empty
/// selection.
///
/// Slots live in Redis when it is configured and reachable, otherwise in an
/// in-process map. Both expire after the configured TTL.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::compare::ComparisonSet;
use crate::model::Tool;
use crate::redis::RedisCache;

pub const DEFAULT_HANDOFF_TTL_SECS: u64 = 600;

static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(0);

pub type HandoffToken = String;

#[derive(Debug)]
struct Slot {
    payload: String,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct HandoffStore {
    redis: RedisCache,
    local: Arc<Mutex<HashMap<HandoffToken, Slot>>>,
    ttl_secs: u64,
}

impl HandoffStore {
    pub fn new(redis: RedisCache, ttl_secs: u64) -> Self {
        Self {
            redis,
            local: Arc::new(Mutex::new(HashMap::new())),
            ttl_secs: ttl_secs.max(1),
        }
    }

    /// In-process only.
    pub fn local(ttl_secs: u64) -> Self {
        Self::new(RedisCache::new(None), ttl_secs)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub async fn put(&self, selection: &ComparisonSet) -> HandoffToken {
        let token = new_token();
        let payload = encode(selection);

        if self.redis.is_configured()
            && self
                .redis
                .set_with_ttl(&slot_key(&token), &payload, self.ttl_secs)
                .await
        {
            debug!(token, tools = selection.len(), "handoff stored in redis");
            return token;
        }

        let mut local = self.local.lock().await;
        purge_expired(&mut local);
        local.insert(
            token.clone(),
            Slot {
                payload,
                expires_at: Instant::now() + self.ttl(),
            },
        );
        debug!(token, tools = selection.len(), "handoff stored in memory");
        token
    }

    /// Reads and clears the slot. Never fails.
    pub async fn take(&self, token: &str) -> ComparisonSet {
        let token = token.trim();
        if token.is_empty() {
            return ComparisonSet::new();
        }

        if self.redis.is_configured() {
            if let Some(payload) = self.redis.take(&slot_key(token)).await {
                return decode(&payload);
            }
        }

        let slot = {
            let mut local = self.local.lock().await;
            purge_expired(&mut local);
            local.remove(token)
        };
        match slot {
            Some(slot) => decode(&slot.payload),
            None => {
                debug!(token, "no handoff found, starting empty");
                ComparisonSet::new()
            }
        }
    }

    #[cfg(test)]
    async fn pending(&self) -> usize {
        self.local.lock().await.len()
    }
}

pub fn encode(selection: &ComparisonSet) -> String {
    serde_json::to_string(selection.tools()).unwrap_or_else(|_| "[]".to_string())
}

/// Malformed or non-array payloads decode to an empty set.
pub fn decode(payload: &str) -> ComparisonSet {
    match serde_json::from_str::<Vec<Tool>>(payload) {
        Ok(tools) => ComparisonSet::from_tools(tools),
        Err(e) => {
            warn!(error = %e, "discarding malformed comparison handoff");
            ComparisonSet::new()
        }
    }
}

fn purge_expired(slots: &mut HashMap<HandoffToken, Slot>) {
    let now = Instant::now();
    slots.retain(|_, slot| slot.expires_at > now);
}

fn slot_key(token: &str) -> String {
    format!("tool_finder:handoff:{token}")
}

fn new_token() -> HandoffToken {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0));
    let counter = TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();

    let mut h = Sha256::new();
    h.update(now.as_nanos().to_le_bytes());
    h.update(pid.to_le_bytes());
    h.update(counter.to_le_bytes());
    let digest = h.finalize();
    digest[..16].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::tool;
    use crate::model::Category;

    fn selection() -> ComparisonSet {
        ComparisonSet::from_tools([
            tool("a", "A", Category::Development, 4.0),
            tool("b", "B", Category::Productivity, 4.5),
        ])
    }

    #[tokio::test]
    async fn round_trip_then_channel_is_empty() {
        let store = HandoffStore::local(60);
        let token = store.put(&selection()).await;
        assert_eq!(token.len(), 32);

        let received = store.take(&token).await;
        assert_eq!(received.ids(), vec!["a", "b"]);
        assert_eq!(store.pending().await, 0);
        assert!(store.take(&token).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slots_expire_after_ttl() {
        let store = HandoffStore::local(1);
        let kept = store.put(&selection()).await;
        let expired = store.put(&selection()).await;

        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(store.take(&kept).await.ids(), vec!["a", "b"]);

        tokio::time::advance(Duration::from_millis(600)).await;
        assert!(store.take(&expired).await.is_empty());
        assert_eq!(store.pending().await, 0);
    }

    #[tokio::test]
    async fn unknown_token_starts_empty() {
        let store = HandoffStore::local(60);
        assert!(store.take("deadbeef").await.is_empty());
        assert!(store.take("   ").await.is_empty());
    }

    #[test]
    fn malformed_payloads_decode_empty() {
        assert!(decode("{not json").is_empty());
        assert!(decode(r#"{"id":"a"}"#).is_empty());
        assert!(decode("[1, 2, 3]").is_empty());
    }

    #[test]
    fn oversized_payload_is_truncated() {
        let tools: Vec<_> = ["a", "b", "c", "d", "a"]
            .iter()
            .map(|id| tool(id, id, Category::Development, 4.0))
            .collect();
        let payload = serde_json::to_string(&tools).unwrap();
        assert_eq!(decode(&payload).ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn tokens_are_distinct() {
        assert_ne!(new_token(), new_token());
    }
}
