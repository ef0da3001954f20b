//! Product service (application-level orchestration).
//!
//! The service sits between the transport and the storage engine:
//!
//! ```text
//! caller input (plain values)
//!   ↓
//! 1. Business validation (required fields, numeric upper bounds)
//!   ↓
//! 2. Build / mutate the entity (field invariants fire again)
//!   ↓
//! 3. Storage engine call (completeness gate, id + timestamps)
//!   ↓
//! Product | ServiceError::{Validation, NotFound, Internal}
//! ```
//!
//! Lower-level failures are translated here, so the transport only ever sees
//! the three caller-facing kinds. Nothing is retried.

use rust_decimal::Decimal;
use thiserror::Error;

use catalog_core::{DomainError, Entity};
use catalog_products::{MAX_NAME_LEN, Product, ProductInput};

use crate::store::{ProductStore, StoreError};

/// Highest accepted price (999999.99).
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Highest accepted stock quantity.
pub const MAX_QUANTITY: i64 = 999_999;

/// Caller-facing failure taxonomy.
///
/// Every kind is distinguishable by the caller. `Internal` carries
/// no detail; the cause is logged where the translation happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Business-rule or field violation. Fix the input and try again.
    #[error("{0}")]
    Validation(String),

    /// The id is malformed, never existed, or was deleted.
    #[error("{0}")]
    NotFound(String),

    /// Unanticipated failure.
    #[error("internal error")]
    Internal,
}

impl ServiceError {
    fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        let msg = match value {
            DomainError::InvalidArgument(msg)
            | DomainError::InvalidState(msg)
            | DomainError::InvalidId(msg) => msg,
        };
        ServiceError::Validation(format!("invalid data: {msg}"))
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Invalid(msg) => ServiceError::Validation(msg),
            StoreError::NotFound(id) => ServiceError::NotFound(not_found_message(id)),
            StoreError::InvalidInput(_) | StoreError::Unavailable(_) => {
                tracing::error!(error = %value, "unexpected storage failure");
                ServiceError::Internal
            }
        }
    }
}

fn not_found_message(id: impl core::fmt::Display) -> String {
    format!("product with id {id} not found")
}

/// Business-level input check, run before any entity is built or touched.
pub fn validate_input(input: &ProductInput) -> Result<(), ServiceError> {
    let name = match input.name.as_deref() {
        Some(n) if !n.trim().is_empty() => n,
        _ => return Err(ServiceError::validation("product name is required")),
    };
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::validation(format!(
            "product name must not exceed {MAX_NAME_LEN} characters"
        )));
    }

    let Some(price) = input.price else {
        return Err(ServiceError::validation("price is required"));
    };
    if price < Decimal::ZERO {
        return Err(ServiceError::validation("price must not be negative"));
    }
    if price > MAX_PRICE {
        return Err(ServiceError::validation(format!(
            "price must not exceed {MAX_PRICE}"
        )));
    }

    let Some(quantity) = input.quantity else {
        return Err(ServiceError::validation("quantity is required"));
    };
    if quantity < 0 {
        return Err(ServiceError::validation("quantity must not be negative"));
    }
    if quantity > MAX_QUANTITY {
        return Err(ServiceError::validation(format!(
            "quantity must not exceed {MAX_QUANTITY}"
        )));
    }

    Ok(())
}

/// Product use cases over an injected storage engine.
///
/// `S` is any [`ProductStore`]; the process wires one shared
/// `Arc<InMemoryProductStore>`, tests may wire their own.
#[derive(Debug)]
pub struct ProductService<S> {
    store: S,
}

impl<S> ProductService<S> {
    pub fn new(store: S) -> Self {
        tracing::info!("product service initialized");
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> ProductService<S>
where
    S: ProductStore,
{
    /// Validate, build and store a new product.
    pub fn create_product(&self, input: &ProductInput) -> Result<Product, ServiceError> {
        tracing::debug!(
            name = ?input.name,
            price = ?input.price,
            quantity = ?input.quantity,
            "creating product"
        );

        validate_input(input)?;

        let mut product = Product::new();
        product.apply(input).map_err(|e| {
            tracing::error!(error = %e, "validation error creating product");
            ServiceError::from(e)
        })?;

        let created = self.store.create(product)?;
        if let Some(id) = created.id() {
            tracing::info!(product_id = %id, "product created");
        }
        Ok(created)
    }

    /// Fetch one product. Malformed ids are reported as not found.
    pub fn get_product_by_id(&self, id: i64) -> Result<Product, ServiceError> {
        if id <= 0 {
            tracing::warn!(product_id = id, "lookup with invalid product id");
            return Err(ServiceError::not_found(format!("invalid id: {id}")));
        }

        self.store.find_by_id(id)?.ok_or_else(|| {
            tracing::warn!(product_id = id, "product not found");
            ServiceError::not_found(not_found_message(id))
        })
    }

    pub fn get_all_products(&self) -> Result<Vec<Product>, ServiceError> {
        let products = self.store.find_all()?;
        tracing::debug!(count = products.len(), "listed products");
        Ok(products)
    }

    /// Replace all four caller fields of an existing product.
    ///
    /// Unlike lookups, a malformed id here is a validation failure.
    pub fn update_product(&self, id: i64, input: &ProductInput) -> Result<(), ServiceError> {
        tracing::debug!(product_id = id, "updating product");

        if id <= 0 {
            return Err(ServiceError::validation(format!("invalid id: {id}")));
        }

        validate_input(input)?;

        let mut product = self.get_product_by_id(id)?;
        product.apply(input).map_err(|e| {
            tracing::error!(product_id = id, error = %e, "validation error updating product");
            ServiceError::from(e)
        })?;

        self.store.update(product)?;
        tracing::info!(product_id = id, "product updated");
        Ok(())
    }

    pub fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        if id <= 0 {
            tracing::warn!(product_id = id, "delete with invalid product id");
            return Err(ServiceError::not_found(format!("invalid id: {id}")));
        }

        self.store.delete(id).inspect_err(|e| {
            if matches!(e, StoreError::NotFound(_)) {
                tracing::warn!(product_id = id, "product not found for deletion");
            }
        })?;
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }

    /// Lenient existence check: malformed ids answer `false`.
    pub fn product_exists(&self, id: i64) -> Result<bool, ServiceError> {
        if id <= 0 {
            return Ok(false);
        }
        Ok(self.store.exists(id)?)
    }
}
