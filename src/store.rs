//! # Redis
//!
//! Sole integration point between the subscriber and the interface.
//!
//! Two logical databases on one instance, matching the deployed layout the
//! reader fleet already talks to:
//!
//! - db 0, registry: tag UID -> operator-assigned label
//! - db 1, attendance: label -> newline-joined timestamp log
//!
//! Both are plain string keyspaces, small enough that enumerating with
//! `KEYS *` on every page load is fine. The attendance append runs as a
//! server-side script so two near-simultaneous check-ins on the same label
//! cannot lose a timestamp to a read-modify-write race.

use redis::{
    AsyncCommands, Client, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::info;

use crate::{config::Config, error::AppError};

const APPEND_LUA: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return redis.call('APPEND', KEYS[1], '\n' .. ARGV[1])
end
return redis.call('SET', KEYS[1], ARGV[1])
"#;

/// Store operations the two processes need. The subscriber's handler is
/// generic over this so tests can swap in [`memory::MemoryStore`].
#[allow(async_fn_in_trait)]
pub trait Store {
    /// Label registered for a tag UID. `Err(NotFound)` when the tag is not
    /// in the registry.
    async fn label_of(&self, tag_id: &str) -> Result<String, AppError>;

    /// Registers or overwrites a tag UID -> label entry.
    async fn set_label(&self, tag_id: &str, label: &str) -> Result<(), AppError>;

    /// Removes a registry entry. Deleting an absent key is a no-op.
    async fn delete_label(&self, tag_id: &str) -> Result<(), AppError>;

    /// All registry entries as (tag UID, label) pairs.
    async fn registry(&self) -> Result<Vec<(String, String)>, AppError>;

    /// Appends one timestamp line to an attendance log, creating the log on
    /// first write.
    async fn append_stamp(&self, key: &str, stamp: &str) -> Result<(), AppError>;

    /// All attendance logs as (key, raw newline-joined value) pairs.
    async fn attendance(&self) -> Result<Vec<(String, String)>, AppError>;
}

#[derive(Clone)]
pub struct RedisStore {
    tags: ConnectionManager,
    attendance: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let tags = open_db(&config.redis_url, 0).await?;
        let attendance = open_db(&config.redis_url, 1).await?;

        let mut conn = tags.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        info!("Connected to store");

        Ok(Self { tags, attendance })
    }
}

async fn open_db(url: &str, db: u8) -> Result<ConnectionManager, AppError> {
    let config = ConnectionManagerConfig::new().set_number_of_retries(1);

    let client = Client::open(format!("{url}/{db}"))?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

impl Store for RedisStore {
    async fn label_of(&self, tag_id: &str) -> Result<String, AppError> {
        let mut conn = self.tags.clone();
        let label: Option<String> = conn.get(tag_id).await?;

        label.ok_or(AppError::NotFound)
    }

    async fn set_label(&self, tag_id: &str, label: &str) -> Result<(), AppError> {
        let mut conn = self.tags.clone();
        let _: () = conn.set(tag_id, label).await?;

        Ok(())
    }

    async fn delete_label(&self, tag_id: &str) -> Result<(), AppError> {
        let mut conn = self.tags.clone();
        let _: () = conn.del(tag_id).await?;

        Ok(())
    }

    async fn registry(&self) -> Result<Vec<(String, String)>, AppError> {
        dump(self.tags.clone()).await
    }

    async fn append_stamp(&self, key: &str, stamp: &str) -> Result<(), AppError> {
        let mut conn = self.attendance.clone();
        let _: () = Script::new(APPEND_LUA)
            .key(key)
            .arg(stamp)
            .invoke_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn attendance(&self) -> Result<Vec<(String, String)>, AppError> {
        dump(self.attendance.clone()).await
    }
}

async fn dump(mut conn: ConnectionManager) -> Result<Vec<(String, String)>, AppError> {
    let mut keys: Vec<String> = conn.keys("*").await?;
    keys.sort();

    let mut entries = Vec::with_capacity(keys.len());
    for key in keys {
        // a key can disappear between KEYS and GET; skip it
        if let Some(value) = conn.get::<_, Option<String>>(&key).await? {
            entries.push((key, value));
        }
    }

    Ok(entries)
}
