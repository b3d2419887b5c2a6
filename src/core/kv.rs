//! Blob store - get/put/remove of opaque string values in the `kv_store` table.
//!
//! Functions are generic over `ConnectionTrait` so they work both on a plain
//! connection and inside a database transaction.

use crate::{
    entities::{KvEntry, kv_entry},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument};

/// Reads the blob stored under `key`.
///
/// # Returns
/// * `Ok(Some(value))` - The key exists
/// * `Ok(None)` - Nothing stored under this key
pub async fn get<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let entry = KvEntry::find()
        .filter(kv_entry::Column::Key.eq(key))
        .one(db)
        .await?;
    debug!("Blob '{}' present: {}", key, entry.is_some());
    Ok(entry.map(|e| e.value))
}

/// Stores `value` under `key`, replacing any previous value.
#[instrument(skip(db, value), fields(bytes = value.len()))]
pub async fn put<C>(db: &C, key: &str, value: String) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = KvEntry::find()
        .filter(kv_entry::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(entry) = existing {
        let mut active_model: kv_entry::ActiveModel = entry.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_entry.insert(db).await?;
    }

    Ok(())
}

/// Deletes the blob under `key`. Returns whether anything was removed.
pub async fn remove<C>(db: &C, key: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = KvEntry::delete_many()
        .filter(kv_entry::Column::Key.eq(key))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_test_tracing, setup_test_db};

    #[tokio::test]
    async fn test_put_and_get_new_key() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;

        put(&db, "items", r#"["a","b"]"#.to_string()).await?;
        assert_eq!(get(&db, "items").await?, Some(r#"["a","b"]"#.to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_put_replaces_existing_value() -> Result<()> {
        let db = setup_test_db().await?;

        put(&db, "orderHistory", "[]".to_string()).await?;
        put(&db, "orderHistory", "[1]".to_string()).await?;

        assert_eq!(get(&db, "orderHistory").await?, Some("[1]".to_string()));
        assert_eq!(KvEntry::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_key() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get(&db, "this_key_does_not_exist").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_remove() -> Result<()> {
        let db = setup_test_db().await?;
        put(&db, "savedUsername", "guest".to_string()).await?;

        assert!(remove(&db, "savedUsername").await?);
        assert!(!remove(&db, "savedUsername").await?);
        assert!(get(&db, "savedUsername").await?.is_none());
        Ok(())
    }
}
