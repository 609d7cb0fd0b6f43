/// Redis wrapper with graceful degradation.
///
/// All operations return `Option<T>` or `bool`. On any Redis error the
/// operation logs a warning and reports failure; callers fall back to the
/// in-process store. The directory is fully functional without Redis.
use redis::AsyncCommands;
use tracing::warn;

#[derive(Clone)]
pub struct RedisCache {
    client: Option<redis::Client>,
}

impl RedisCache {
    /// A `None` URL or an unparsable one yields a cache that always degrades.
    pub fn new(url: Option<&str>) -> Self {
        let client = url.and_then(|u| {
            redis::Client::open(u)
                .inspect_err(|e| warn!(error = %e, url = u, "failed to create redis client, redis disabled"))
                .ok()
        });
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Sends a PING. Returns `true` if Redis is reachable.
    pub async fn is_available(&self) -> bool {
        let Some(client) = &self.client else {
            return false;
        };
        match client.get_multiplexed_async_connection().await {
            Ok(mut conn) => {
                let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
                result.is_ok()
            }
            Err(_) => false,
        }
    }

    async fn connection(&self) -> Option<redis::aio::MultiplexedConnection> {
        let client = self.client.as_ref()?;
        client
            .get_multiplexed_async_connection()
            .await
            .inspect_err(|e| warn!(error = %e, "redis connection failed"))
            .ok()
    }

    /// Atomically reads and deletes a key (GETDEL).
    pub async fn take(&self, key: &str) -> Option<String> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis GETDEL failed"))
            .ok()?;
        value
    }

    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> bool {
        let Some(mut conn) = self.connection().await else {
            return false;
        };
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .inspect_err(|e| warn!(error = %e, key, "redis SETEX failed"))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::RedisCache;

    #[tokio::test]
    async fn unconfigured_cache_degrades() {
        let cache = RedisCache::new(None);
        assert!(!cache.is_configured());
        assert!(!cache.is_available().await);
        assert_eq!(cache.take("k").await, None);
        assert!(!cache.set_with_ttl("k", "v", 10).await);
    }
}
