use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::{bb8, redis, redis::AsyncCommands, RedisConnectionManager};
use tokio::time::timeout;
use tracing::{debug, info};

use configs::RedisConfig;
use models::record::{self, Record};

use crate::errors::ServiceError;
use crate::record::store::{RecordStore, COLLECTION};

/// Redis-backed store implementation.
///
/// Every record lives in the `"USER"` hash, keyed by record id, with the
/// field-named JSON payload as the value. Commands run against a shared bb8
/// pool and are bounded by the configured command timeout; a timeout, pool
/// checkout failure or connection failure surfaces as
/// `ServiceError::Unavailable` instead of hanging the caller.
#[derive(Clone)]
pub struct RedisRecordStore {
    pool: bb8::Pool<RedisConnectionManager>,
    command_timeout: Duration,
}

impl RedisRecordStore {
    /// Build the connection pool and verify the server answers a PING, so a
    /// misconfigured address fails at startup rather than on first request.
    pub async fn connect(cfg: &RedisConfig) -> anyhow::Result<Self> {
        let manager = RedisConnectionManager::new(cfg.url())?;
        let pool = bb8::Pool::builder()
            .max_size(cfg.max_connections)
            .connection_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .build(manager)
            .await?;
        {
            let mut conn = pool.get().await?;
            let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        }
        info!(host = %cfg.host, port = cfg.port, "connected to redis");
        Ok(Self {
            pool,
            command_timeout: Duration::from_secs(cfg.command_timeout_secs),
        })
    }

    async fn conn(
        &self,
    ) -> Result<bb8::PooledConnection<'_, RedisConnectionManager>, ServiceError> {
        self.pool
            .get()
            .await
            .map_err(|e| ServiceError::Unavailable(e.to_string()))
    }

    /// Run one command under the bounded timeout.
    async fn run<T>(
        &self,
        op: &str,
        cmd: impl Future<Output = redis::RedisResult<T>>,
    ) -> Result<T, ServiceError> {
        match timeout(self.command_timeout, cmd).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(ServiceError::Unavailable(format!("{op}: {e}"))),
            Err(_) => Err(ServiceError::Unavailable(format!("{op}: timed out"))),
        }
    }
}

#[async_trait]
impl RecordStore for RedisRecordStore {
    async fn put(&self, id: &str, rec: &Record) -> Result<Record, ServiceError> {
        let payload = record::serialize(rec)?;
        let mut conn = self.conn().await?;
        let _: () = self.run("hset", conn.hset(COLLECTION, id, payload)).await?;
        debug!(record_id = %id, "record stored");
        Ok(rec.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Record>, ServiceError> {
        let mut conn = self.conn().await?;
        let payload: Option<String> = self.run("hget", conn.hget(COLLECTION, id)).await?;
        match payload {
            // A payload that fails to parse is corruption, not absence.
            Some(payload) => Ok(Some(record::deserialize(&payload)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<HashMap<String, Record>, ServiceError> {
        let mut conn = self.conn().await?;
        let raw: HashMap<String, String> = self.run("hgetall", conn.hgetall(COLLECTION)).await?;
        let mut records = HashMap::with_capacity(raw.len());
        for (id, payload) in raw {
            records.insert(id, record::deserialize(&payload)?);
        }
        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let mut conn = self.conn().await?;
        let _: () = self.run("hdel", conn.hdel(COLLECTION, id)).await?;
        debug!(record_id = %id, "record deleted");
        Ok(())
    }
}
