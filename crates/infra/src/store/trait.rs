use std::sync::Arc;

use thiserror::Error;

use catalog_core::ProductId;
use catalog_products::Product;

/// Storage engine operation error.
///
/// These are **storage errors** (malformed calls, missing keys, incomplete
/// entities, internal faults) as opposed to the entity's field-level errors.
///
/// ## Error Categories
///
/// - **InvalidInput**: a non-positive id or an id-less product reached the engine
///   directly. Indicates a bug in an internal caller, not bad user input.
/// - **Invalid**: the product failed its completeness gate (non-retriable)
/// - **NotFound**: no live product has that id
/// - **Unavailable**: internal state could not be accessed (poisoned lock)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("validation error: {0}")]
    Invalid(String),

    #[error("product with id {0} not found")]
    NotFound(ProductId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Concurrency-safe product storage keyed by identifier.
///
/// ## Identity
///
/// `create()` assigns identifiers from a monotonically increasing counter.
/// Identifiers are strictly increasing in issuance order and never reused, even
/// after the product is deleted.
///
/// ## Strict and lenient id handling
///
/// `find_by_id()` and `delete()` reject ids `<= 0` with `InvalidInput`;
/// `exists()` answers `false` for them instead.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - issue unique ids under concurrent `create()` calls
/// - make insert, replace and remove atomic with respect to readers (no torn reads)
/// - return owned snapshots from reads; later mutations never show through them
/// - never hold a lock across more than one key
pub trait ProductStore: Send + Sync {
    /// Gate, identify, stamp and commit a new product. Returns the live copy.
    fn create(&self, product: Product) -> Result<Product, StoreError>;

    /// Current value for `id`, if live.
    fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Snapshot of all live products (order unspecified).
    fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    /// Replace the stored value of an existing product.
    ///
    /// `created_at` is kept from the stored copy; `updated_at` is refreshed.
    fn update(&self, product: Product) -> Result<(), StoreError>;

    /// Remove a live product. Its id is never issued again.
    fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Lenient existence check: ids `<= 0` yield `false`.
    fn exists(&self, id: i64) -> Result<bool, StoreError>;

    /// Number of live products.
    fn count(&self) -> Result<usize, StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn create(&self, product: Product) -> Result<Product, StoreError> {
        (**self).create(product)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).find_all()
    }

    fn update(&self, product: Product) -> Result<(), StoreError> {
        (**self).update(product)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn exists(&self, id: i64) -> Result<bool, StoreError> {
        (**self).exists(id)
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }
}
