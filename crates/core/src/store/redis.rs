//! Redis-backed key-value store.
//!
//! Wraps a `ConnectionManager` handle, so the store is cheap to clone and
//! reconnects on its own. TTLs are applied with millisecond precision so
//! sub-second values behave.

use std::time::Duration;

use redis::{AsyncCommands, aio::ConnectionManager};

use crate::Error;
use crate::store::KeyValueStore;

/// Redis store handle.
///
/// Construct once at startup and pass in wherever a store is needed.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to a Redis server at the given URL.
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::debug!(url, "connected to redis");
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), Error> {
        let mut conn = self.conn.clone();
        match ttl {
            Some(ttl) => {
                let () = conn.pset_ex(key, value, ttl.as_millis() as u64).await?;
            }
            None => {
                let () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64, Error> {
        let mut conn = self.conn.clone();
        let count: i64 = conn.incr(key, 1).await?;
        Ok(count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool, Error> {
        let mut conn = self.conn.clone();
        let applied: i64 = conn.pexpire(key, ttl.as_millis() as i64).await?;
        Ok(applied == 1)
    }
}
