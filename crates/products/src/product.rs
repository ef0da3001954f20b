use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

/// Longest accepted product name, in characters.
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Maximum number of fractional digits a price may carry.
pub const MAX_PRICE_SCALE: u32 = 2;

/// Caller-supplied product fields.
///
/// Every field is optional so that a missing value reaches validation (and is
/// reported as such) instead of failing at decode time.
///
/// A JSON number price is decoded from its literal text, so `2500.00` keeps
/// scale 2 and `19.990` keeps scale 3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
}

impl ProductInput {
    pub fn new(
        name: impl Into<String>,
        description: Option<&str>,
        price: Decimal,
        quantity: i64,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: description.map(str::to_string),
            price: Some(price),
            quantity: Some(quantity),
        }
    }
}

/// Entity: Product.
///
/// Field invariants are enforced by every setter, so no instance can hold an
/// invalid value. Completeness (name, price and quantity all set) is a separate
/// gate, see [`Product::validate_completeness`].
///
/// Equality is identity equality: two values with the same `id` are the same
/// product, whatever their other fields hold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: Option<ProductId>,
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    quantity: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Create a transient product with no identity and no fields set.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: None,
            description: None,
            price: None,
            quantity: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a product with every field applied through its setter.
    ///
    /// Fields are validated in the order name, description, price, quantity;
    /// the first violation aborts construction.
    pub fn with_fields(id: Option<ProductId>, input: &ProductInput) -> DomainResult<Self> {
        let mut product = Self::new();
        product.id = id;
        product.apply(input)?;
        Ok(product)
    }

    /// Apply all four caller fields (name → description → price → quantity).
    ///
    /// A missing name, price or quantity is an invalid argument here; a missing
    /// description clears it.
    pub fn apply(&mut self, input: &ProductInput) -> DomainResult<()> {
        let name = input
            .name
            .as_deref()
            .ok_or_else(|| DomainError::invalid_argument("product name must not be empty"))?;
        self.set_name(name)?;
        self.set_description(input.description.as_deref())?;
        let price = input
            .price
            .ok_or_else(|| DomainError::invalid_argument("price must not be null"))?;
        self.set_price(price)?;
        let quantity = input
            .quantity
            .ok_or_else(|| DomainError::invalid_argument("quantity must not be null"))?;
        self.set_quantity(quantity)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn quantity(&self) -> Option<i64> {
        self.quantity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::invalid_argument("product name must not be empty"));
        }
        // Length is measured before trimming.
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::invalid_argument(format!(
                "product name must not exceed {MAX_NAME_LEN} characters"
            )));
        }
        self.name = Some(name.trim().to_string());
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<&str>) -> DomainResult<()> {
        if let Some(d) = description {
            if d.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::invalid_argument(format!(
                    "description must not exceed {MAX_DESCRIPTION_LEN} characters"
                )));
            }
        }
        self.description = description.map(|d| d.trim().to_string());
        Ok(())
    }

    pub fn set_price(&mut self, price: Decimal) -> DomainResult<()> {
        if price < Decimal::ZERO {
            return Err(DomainError::invalid_argument("price must not be negative"));
        }
        if price.scale() > MAX_PRICE_SCALE {
            return Err(DomainError::invalid_argument(format!(
                "price must not have more than {MAX_PRICE_SCALE} decimal places"
            )));
        }
        self.price = Some(price);
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument("quantity must not be negative"));
        }
        self.quantity = Some(quantity);
        Ok(())
    }

    /// Pre-persistence gate: name, price and quantity must all be set.
    pub fn validate_completeness(&self) -> DomainResult<()> {
        if self.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
            return Err(DomainError::invalid_state("invalid product: name is required"));
        }
        if self.price.is_none() {
            return Err(DomainError::invalid_state("invalid product: price is required"));
        }
        if self.quantity.is_none() {
            return Err(DomainError::invalid_state("invalid product: quantity is required"));
        }
        Ok(())
    }

    // Identity and lifecycle stamps are owned by the storage engine.

    pub fn assign_id(&mut self, id: ProductId) {
        self.id = Some(id);
    }

    pub fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
        self.updated_at = at;
    }

    pub fn restore_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }

    pub fn stamp_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for Product {}

impl core::hash::Hash for Product {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
