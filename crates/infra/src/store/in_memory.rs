use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};

use catalog_core::{Entity, ProductId};
use catalog_products::Product;

use super::r#trait::{ProductStore, StoreError};

/// Number of independently locked partitions of the key space.
const SHARDS: usize = 16;

/// First identifier handed out by a fresh (or reset) store.
const FIRST_ID: i64 = 1;

type Shard = RwLock<HashMap<ProductId, Product>>;

/// In-memory, concurrency-safe product store.
///
/// The key space is split across `SHARDS` read/write-locked maps (`id % SHARDS`),
/// so every operation holds at most one shard lock and operations on different
/// shards never contend. Identifiers come from an atomic counter.
///
/// `create` holds the issuance gate shared from id issue until the insert is
/// visible; `reset` holds it exclusively, so no id issued before a reset can
/// land in the map after it.
///
/// Volatile: contents live as long as the value does.
#[derive(Debug)]
pub struct InMemoryProductStore {
    shards: Box<[Shard]>,
    next_id: AtomicI64,
    issuance: RwLock<()>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        tracing::info!(shards = SHARDS, "in-memory product store initialized");
        Self {
            shards: (0..SHARDS).map(|_| RwLock::new(HashMap::new())).collect(),
            next_id: AtomicI64::new(FIRST_ID),
            issuance: RwLock::new(()),
        }
    }

    /// Drop every product and restart identifiers at 1 (test/admin only).
    ///
    /// Waits for in-flight creates, then clears the shards in index order with
    /// the counter restart inside the same exclusive section.
    pub fn reset(&self) -> Result<(), StoreError> {
        let _gate = self
            .issuance
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let mut guards = self
            .shards
            .iter()
            .map(write)
            .collect::<Result<Vec<_>, _>>()?;
        for guard in guards.iter_mut() {
            guard.clear();
        }
        self.next_id.store(FIRST_ID, Ordering::SeqCst);
        tracing::info!("all products removed");
        Ok(())
    }

    fn shard_for(&self, id: ProductId) -> &Shard {
        // Ids are positive, so the cast never wraps.
        &self.shards[id.get() as usize % SHARDS]
    }

    fn issue_id(&self) -> Result<ProductId, StoreError> {
        let raw = self.next_id.fetch_add(1, Ordering::SeqCst);
        ProductId::new(raw).map_err(|e| StoreError::Unavailable(format!("id space exhausted: {e}")))
    }
}

impl Default for InMemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

fn read(shard: &Shard) -> Result<RwLockReadGuard<'_, HashMap<ProductId, Product>>, StoreError> {
    shard
        .read()
        .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
}

fn write(shard: &Shard) -> Result<RwLockWriteGuard<'_, HashMap<ProductId, Product>>, StoreError> {
    shard
        .write()
        .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
}

fn strict_id(id: i64) -> Result<ProductId, StoreError> {
    ProductId::new(id).map_err(|_| {
        tracing::warn!(product_id = id, "rejected malformed product id");
        StoreError::InvalidInput(format!("invalid id: {id}"))
    })
}

/// Next `updated_at` stamp; strictly later than `previous` even if the clock is not.
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl ProductStore for InMemoryProductStore {
    fn create(&self, mut product: Product) -> Result<Product, StoreError> {
        if let Err(e) = product.validate_completeness() {
            tracing::error!(error = %e, "validation error creating product");
            return Err(StoreError::Invalid(e.to_string()));
        }

        let gate = self
            .issuance
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let id = self.issue_id()?;
        product.assign_id(id);
        product.stamp_created(Utc::now());

        write(self.shard_for(id))?.insert(id, product.clone());
        drop(gate);
        tracing::info!(product_id = %id, "product created");

        Ok(product)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let id = strict_id(id)?;
        let found = read(self.shard_for(id))?.get(&id).cloned();
        tracing::debug!(product_id = %id, found = found.is_some(), "product lookup");
        Ok(found)
    }

    fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let mut all = Vec::new();
        for shard in self.shards.iter() {
            all.extend(read(shard)?.values().cloned());
        }
        all.sort_by_key(|p| p.id());
        tracing::debug!(count = all.len(), "listing products");
        Ok(all)
    }

    fn update(&self, mut product: Product) -> Result<(), StoreError> {
        let Some(id) = product.id() else {
            tracing::error!("attempted to update a product without an id");
            return Err(StoreError::InvalidInput(
                "product must have an id to be updated".to_string(),
            ));
        };

        let mut shard = write(self.shard_for(id))?;
        let Some(stored) = shard.get(&id) else {
            tracing::warn!(product_id = %id, "attempted to update missing product");
            return Err(StoreError::NotFound(id));
        };

        if let Err(e) = product.validate_completeness() {
            tracing::error!(product_id = %id, error = %e, "validation error updating product");
            return Err(StoreError::Invalid(e.to_string()));
        }

        product.restore_created_at(stored.created_at());
        product.stamp_updated(next_stamp(stored.updated_at()));
        shard.insert(id, product);
        tracing::info!(product_id = %id, "product updated");

        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        let id = strict_id(id)?;
        if write(self.shard_for(id))?.remove(&id).is_none() {
            tracing::warn!(product_id = %id, "attempted to delete missing product");
            return Err(StoreError::NotFound(id));
        }
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    fn exists(&self, id: i64) -> Result<bool, StoreError> {
        let Ok(id) = ProductId::new(id) else {
            return Ok(false);
        };
        Ok(read(self.shard_for(id))?.contains_key(&id))
    }

    fn count(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for shard in self.shards.iter() {
            total += read(shard)?.len();
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;
    use std::sync::Arc;

    use catalog_products::ProductInput;
    use rust_decimal::Decimal;

    fn product(name: &str) -> Product {
        let input = ProductInput::new(name, Some("desc"), Decimal::from_str("10.50").unwrap(), 3);
        Product::with_fields(None, &input).unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids_and_stamps() {
        let store = InMemoryProductStore::new();
        let a = store.create(product("A")).unwrap();
        let b = store.create(product("B")).unwrap();

        assert_eq!(a.id().map(ProductId::get), Some(1));
        assert_eq!(b.id().map(ProductId::get), Some(2));
        assert_eq!(a.created_at(), a.updated_at());
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn create_overwrites_caller_supplied_timestamps() {
        let store = InMemoryProductStore::new();
        let mut p = product("A");
        let stale = Utc::now() - Duration::days(30);
        p.stamp_created(stale);

        let created = store.create(p).unwrap();
        assert!(created.created_at() > stale);
    }

    #[test]
    fn create_rejects_incomplete_product() {
        let store = InMemoryProductStore::new();
        let mut p = Product::new();
        p.set_name("Only a name").unwrap();

        let err = store.create(p).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ref m) if m.contains("price")));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn find_by_id_is_strict_about_malformed_ids() {
        let store = InMemoryProductStore::new();
        assert!(matches!(store.find_by_id(0), Err(StoreError::InvalidInput(_))));
        assert!(matches!(store.find_by_id(-5), Err(StoreError::InvalidInput(_))));
        assert_eq!(store.find_by_id(99).unwrap(), None);
    }

    #[test]
    fn find_by_id_returns_stored_copy() {
        let store = InMemoryProductStore::new();
        let created = store.create(product("  Keyboard ")).unwrap();

        let found = store.find_by_id(1).unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.name(), Some("Keyboard"));
        assert_eq!(found.description(), Some("desc"));
        assert_eq!(found.price(), Some(Decimal::from_str("10.50").unwrap()));
        assert_eq!(found.quantity(), Some(3));
    }

    #[test]
    fn find_all_is_a_snapshot() {
        let store = InMemoryProductStore::new();
        store.create(product("A")).unwrap();
        store.create(product("B")).unwrap();

        let snapshot = store.find_all().unwrap();
        store.delete(1).unwrap();
        store.create(product("C")).unwrap();

        let names: Vec<_> = snapshot.iter().filter_map(|p| p.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn update_refreshes_updated_at_and_keeps_created_at() {
        let store = InMemoryProductStore::new();
        let created = store.create(product("A")).unwrap();

        let mut changed = created.clone();
        changed.set_name("A2").unwrap();
        changed.restore_created_at(Utc::now() - Duration::days(1));
        store.update(changed).unwrap();

        let stored = store.find_by_id(1).unwrap().unwrap();
        assert_eq!(stored.name(), Some("A2"));
        assert_eq!(stored.created_at(), created.created_at());
        assert!(stored.updated_at() > created.updated_at());
    }

    #[test]
    fn update_requires_id_and_live_product() {
        let store = InMemoryProductStore::new();
        assert!(matches!(
            store.update(product("A")),
            Err(StoreError::InvalidInput(_))
        ));

        let ghost = Product::with_fields(
            ProductId::new(7).ok(),
            &ProductInput::new("Ghost", None, Decimal::ONE, 1),
        )
        .unwrap();
        assert_eq!(
            store.update(ghost),
            Err(StoreError::NotFound(ProductId::new(7).unwrap()))
        );
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn update_checks_existence_before_completeness() {
        let store = InMemoryProductStore::new();
        let mut incomplete = Product::new();
        incomplete.assign_id(ProductId::new(3).unwrap());

        assert!(matches!(store.update(incomplete.clone()), Err(StoreError::NotFound(_))));

        store.create(product("A")).unwrap();
        store.create(product("B")).unwrap();
        store.create(product("C")).unwrap();
        assert!(matches!(store.update(incomplete), Err(StoreError::Invalid(_))));
    }

    #[test]
    fn deleted_ids_stay_dead_and_are_never_reissued() {
        let store = InMemoryProductStore::new();
        store.create(product("A")).unwrap();
        store.delete(1).unwrap();

        assert_eq!(store.find_by_id(1).unwrap(), None);
        assert!(!store.exists(1).unwrap());
        assert_eq!(store.delete(1), Err(StoreError::NotFound(ProductId::new(1).unwrap())));

        let next = store.create(product("B")).unwrap();
        assert_eq!(next.id().map(ProductId::get), Some(2));
        assert!(!store.exists(1).unwrap());
    }

    #[test]
    fn delete_is_strict_and_exists_is_lenient() {
        let store = InMemoryProductStore::new();
        assert!(matches!(store.delete(0), Err(StoreError::InvalidInput(_))));
        assert!(matches!(store.delete(-1), Err(StoreError::InvalidInput(_))));
        assert_eq!(store.exists(0), Ok(false));
        assert_eq!(store.exists(-1), Ok(false));
        assert_eq!(store.exists(1), Ok(false));
    }

    #[test]
    fn reset_clears_entries_and_restarts_ids() {
        let store = InMemoryProductStore::new();
        store.create(product("A")).unwrap();
        store.create(product("B")).unwrap();

        store.reset().unwrap();
        assert_eq!(store.count().unwrap(), 0);

        let again = store.create(product("C")).unwrap();
        assert_eq!(again.id().map(ProductId::get), Some(1));
    }

    #[test]
    fn reset_racing_creates_leaves_no_stale_ids() {
        let store = Arc::new(InMemoryProductStore::new());
        let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let creators: Vec<_> = (0..4)
            .map(|t| {
                let store = store.clone();
                let stop = stop.clone();
                std::thread::spawn(move || {
                    let mut i = 0;
                    while !stop.load(Ordering::Relaxed) {
                        store.create(product(&format!("R{t}-{i}"))).unwrap();
                        i += 1;
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            store.reset().unwrap();
        }
        stop.store(true, Ordering::Relaxed);
        for h in creators {
            h.join().unwrap();
        }

        // Every surviving entry was issued after the last reset, below the counter.
        let survivors = store.find_all().unwrap();
        let next = store.create(product("after")).unwrap().id().unwrap().get();
        assert!(survivors.iter().all(|p| p.id().unwrap().get() < next));
        assert_eq!(survivors.len() as i64, next - 1);
    }

    #[test]
    fn concurrent_creates_issue_unique_gapless_ids() {
        let store = Arc::new(InMemoryProductStore::new());
        let threads = 8;
        let per_thread = 250;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut ids = Vec::with_capacity(per_thread);
                    for i in 0..per_thread {
                        let created = store.create(product(&format!("P-{t}-{i}"))).unwrap();
                        ids.push(created.id().unwrap().get());
                    }
                    ids
                })
            })
            .collect();

        let mut all = Vec::new();
        for h in handles {
            let ids = h.join().unwrap();
            // Each thread observes its own ids in issuance order.
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
            all.extend(ids);
        }

        let total = threads * per_thread;
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), total);
        assert_eq!(all.iter().min(), Some(&1));
        assert_eq!(all.iter().max(), Some(&(total as i64)));
        assert_eq!(store.count().unwrap(), total);
    }

    #[test]
    fn concurrent_mixed_operations_keep_count_consistent() {
        let store = Arc::new(InMemoryProductStore::new());

        let handles: Vec<_> = (0..6)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let mut created = 0usize;
                    let mut deleted = 0usize;
                    for i in 0..200 {
                        let p = store.create(product(&format!("T{t}-{i}"))).unwrap();
                        created += 1;
                        let id = p.id().unwrap().get();
                        assert!(store.find_by_id(id).unwrap().is_some());
                        let _ = store.find_all().unwrap();
                        if i % 3 == 0 && store.delete(id).is_ok() {
                            deleted += 1;
                        }
                    }
                    (created, deleted)
                })
            })
            .collect();

        let (mut created, mut deleted) = (0, 0);
        for h in handles {
            let (c, d) = h.join().unwrap();
            created += c;
            deleted += d;
        }

        assert_eq!(store.count().unwrap(), created - deleted);
        assert_eq!(store.find_all().unwrap().len(), created - deleted);
    }

    #[test]
    fn readers_never_observe_half_updated_products() {
        let store = Arc::new(InMemoryProductStore::new());
        store.create(product("v0")).unwrap();

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for i in 1..500i64 {
                    let mut p = store.find_by_id(1).unwrap().unwrap();
                    p.set_name(&format!("v{i}")).unwrap();
                    p.set_quantity(i).unwrap();
                    store.update(p).unwrap();
                }
            })
        };

        for _ in 0..500 {
            let p = store.find_by_id(1).unwrap().unwrap();
            let version: i64 = p.name().unwrap()[1..].parse().unwrap();
            // name and quantity are written together; a reader sees both or neither.
            if version > 0 {
                assert_eq!(p.quantity(), Some(version));
            } else {
                assert_eq!(p.quantity(), Some(3));
            }
        }

        writer.join().unwrap();
    }
}
