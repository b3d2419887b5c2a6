//! Order history persistence.
//!
//! The whole history is one JSON array stored under [`ORDER_HISTORY_KEY`] in
//! the key-value table. Every write is a read-modify-write of that blob, done
//! inside a database transaction while holding the store's write lock, so
//! concurrent appends cannot lose each other's orders.
//!
//! Reads fail open: a missing or undecodable blob reads as "no orders". The
//! `try_` variant reports the underlying error for callers that care.

use crate::{
    core::kv,
    errors::{PersistenceError, Result},
    models::Order,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Blob key holding the serialized order history.
pub const ORDER_HISTORY_KEY: &str = "orderHistory";

/// Append-only order history backed by a single blob.
#[derive(Debug)]
pub struct OrderStore {
    db: DatabaseConnection,
    write_lock: Mutex<()>,
    load_delay: Duration,
}

impl OrderStore {
    /// Wraps a connection whose tables already exist.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
            load_delay: Duration::ZERO,
        }
    }

    /// Sets the artificial pause applied by [`OrderStore::load_all_delayed`].
    #[must_use]
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Reads the full history in insertion order.
    ///
    /// # Errors
    /// - `Error::Database` if the blob cannot be read
    /// - `Error::Persistence(DecodeFailed)` if the stored blob is not a valid history
    pub async fn try_load_all(&self) -> Result<Vec<Order>> {
        let blob = kv::get(&self.db, ORDER_HISTORY_KEY).await?;
        Ok(decode(blob.as_deref())?)
    }

    /// Reads the full history, treating any failure as an empty history.
    pub async fn load_all(&self) -> Vec<Order> {
        match self.try_load_all().await {
            Ok(orders) => {
                debug!("Loaded {} orders", orders.len());
                orders
            }
            Err(e) => {
                error!("Failed to load order history: {}", e);
                Vec::new()
            }
        }
    }

    /// [`OrderStore::load_all`] after the configured artificial delay.
    pub async fn load_all_delayed(&self) -> Vec<Order> {
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        self.load_all().await
    }

    /// History with the newest order first.
    pub async fn load_recent(&self) -> Vec<Order> {
        let mut orders = self.load_all().await;
        orders.reverse();
        orders
    }

    /// Looks up a single order by id.
    pub async fn find(&self, order_id: Uuid) -> Option<Order> {
        self.load_all().await.into_iter().find(|o| o.id == order_id)
    }

    /// Appends `order` to the history.
    ///
    /// An undecodable existing blob is replaced by a history holding only
    /// this order. An order with a non-finite total or item price is refused
    /// and the stored history is left as it was.
    ///
    /// # Errors
    /// - `Error::Persistence(EncodeFailed)` if the history cannot be serialized
    /// - `Error::Database` if the blob cannot be read or written
    #[instrument(skip(self, order), fields(order_code = %order.order_code))]
    pub async fn append(&self, order: Order) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        let blob = kv::get(&txn, ORDER_HISTORY_KEY).await?;
        let mut orders = decode_or_empty(blob.as_deref());
        orders.push(order);

        kv::put(&txn, ORDER_HISTORY_KEY, encode(&orders)?).await?;
        txn.commit().await?;

        info!("Order saved; history now holds {} orders", orders.len());
        Ok(())
    }

    /// Removes the order with `order_id`. Removing the last order clears the
    /// blob entirely.
    ///
    /// # Returns
    /// * `Ok(Some(order))` - The removed order
    /// * `Ok(None)` - No such order; nothing was written
    ///
    /// # Errors
    /// - `Error::Persistence(EncodeFailed)` if the history cannot be serialized
    /// - `Error::Database` if the blob cannot be read or written
    #[instrument(skip(self))]
    pub async fn delete(&self, order_id: Uuid) -> Result<Option<Order>> {
        let _guard = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        let blob = kv::get(&txn, ORDER_HISTORY_KEY).await?;
        let mut orders = decode_or_empty(blob.as_deref());

        let Some(index) = orders.iter().position(|o| o.id == order_id) else {
            debug!("No order {} to delete", order_id);
            return Ok(None);
        };
        let removed = orders.remove(index);

        if orders.is_empty() {
            kv::remove(&txn, ORDER_HISTORY_KEY).await?;
        } else {
            kv::put(&txn, ORDER_HISTORY_KEY, encode(&orders)?).await?;
        }
        txn.commit().await?;

        info!("Deleted order {}", removed.order_code);
        Ok(Some(removed))
    }
}

fn decode(blob: Option<&str>) -> std::result::Result<Vec<Order>, PersistenceError> {
    let Some(blob) = blob else {
        debug!("No order history data found");
        return Ok(Vec::new());
    };
    serde_json::from_str(blob).map_err(|e| PersistenceError::DecodeFailed {
        message: e.to_string(),
    })
}

fn decode_or_empty(blob: Option<&str>) -> Vec<Order> {
    decode(blob).unwrap_or_else(|e| {
        warn!("{}; starting from an empty history", e);
        Vec::new()
    })
}

fn encode(orders: &[Order]) -> std::result::Result<String, PersistenceError> {
    // serde_json writes NaN and infinities as null, which would not decode
    for order in orders {
        if !order.total_amount.is_finite() {
            return Err(PersistenceError::EncodeFailed {
                message: format!(
                    "order {} has a non-finite total {}",
                    order.order_code, order.total_amount
                ),
            });
        }
        if let Some(item) = order.items.iter().find(|i| !i.product.price.is_finite()) {
            return Err(PersistenceError::EncodeFailed {
                message: format!(
                    "order {} has a non-finite price {} for {}",
                    order.order_code, item.product.price, item.product.name
                ),
            });
        }
    }
    serde_json::to_string(orders).map_err(|e| PersistenceError::EncodeFailed {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{create_test_order, init_test_tracing, setup_order_store, setup_test_db};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_empty_store_loads_nothing() -> Result<()> {
        init_test_tracing();
        let store = setup_order_store().await?;
        assert!(store.try_load_all().await?.is_empty());
        assert!(store.load_all().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_append_then_delete_round_trip() -> Result<()> {
        let store = setup_order_store().await?;
        let o1 = create_test_order(69999.0);
        let o2 = create_test_order(24900.0);

        store.append(o1.clone()).await?;
        store.append(o2.clone()).await?;
        assert_eq!(store.load_all().await, vec![o1.clone(), o2.clone()]);

        let removed = store.delete(o1.id).await?;
        assert_eq!(removed, Some(o1));
        assert_eq!(store.load_all().await, vec![o2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_finite_price_is_rejected_and_history_kept() -> Result<()> {
        init_test_tracing();
        let store = setup_order_store().await?;
        let good = create_test_order(69999.0);
        store.append(good.clone()).await?;

        let mut bad = create_test_order(1.0);
        bad.items[0].product.price = f64::NAN;
        let result = store.append(bad).await;
        assert!(matches!(
            result,
            Err(Error::Persistence(PersistenceError::EncodeFailed { message: _ }))
        ));

        let infinite = create_test_order(f64::INFINITY);
        assert!(matches!(
            store.append(infinite).await,
            Err(Error::Persistence(PersistenceError::EncodeFailed { message: _ }))
        ));

        assert_eq!(store.try_load_all().await?, vec![good.clone()]);

        let next = create_test_order(24900.0);
        store.append(next.clone()).await?;
        assert_eq!(store.try_load_all().await?, vec![good, next]);
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_last_order_clears_blob() -> Result<()> {
        let db = setup_test_db().await?;
        let store = OrderStore::new(db.clone());
        let order = create_test_order(14900.0);
        store.append(order.clone()).await?;

        assert_eq!(store.delete(order.id).await?, Some(order));
        assert!(kv::get(&db, ORDER_HISTORY_KEY).await?.is_none());
        assert!(store.try_load_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_order_is_noop() -> Result<()> {
        let store = setup_order_store().await?;
        let order = create_test_order(14900.0);
        store.append(order.clone()).await?;

        assert_eq!(store.delete(Uuid::new_v4()).await?, None);
        assert_eq!(store.load_all().await, vec![order]);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_all_is_idempotent() -> Result<()> {
        let store = setup_order_store().await?;
        store.append(create_test_order(1.0)).await?;
        store.append(create_test_order(2.0)).await?;

        let first = store.load_all().await;
        let second = store.load_all().await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_blob_fails_open_but_is_observable() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        kv::put(&db, ORDER_HISTORY_KEY, "not json".to_string()).await?;
        let store = OrderStore::new(db);

        assert!(store.load_all().await.is_empty());
        assert!(matches!(
            store.try_load_all().await,
            Err(Error::Persistence(PersistenceError::DecodeFailed { message: _ }))
        ));

        // Writing over a corrupt blob starts a fresh history
        let order = create_test_order(32900.0);
        store.append(order.clone()).await?;
        assert_eq!(store.try_load_all().await?, vec![order]);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_recent_and_find() -> Result<()> {
        let store = setup_order_store().await?;
        let older = create_test_order(1.0);
        let newer = create_test_order(2.0);
        store.append(older.clone()).await?;
        store.append(newer.clone()).await?;

        assert_eq!(store.load_recent().await, vec![newer.clone(), older.clone()]);
        assert_eq!(store.find(older.id).await, Some(older));
        assert_eq!(store.find(Uuid::new_v4()).await, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delayed_load_waits() -> Result<()> {
        let store = setup_order_store()
            .await?
            .with_load_delay(Duration::from_millis(50));
        store.append(create_test_order(5.0)).await?;

        let started = std::time::Instant::now();
        let orders = store.load_all_delayed().await;
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(orders.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_every_order() -> Result<()> {
        let store = Arc::new(setup_order_store().await?);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.append(create_test_order(f64::from(i))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap()?;
        }

        assert_eq!(store.try_load_all().await?.len(), 8);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_without_tables_reports_database_error() -> Result<()> {
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let store = OrderStore::new(db);

        let result = store.append(create_test_order(1.0)).await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(store.load_all().await.is_empty());
        Ok(())
    }
}
