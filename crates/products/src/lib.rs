//! Products domain module.
//!
//! This crate contains the product entity and its field invariants, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_PRICE_SCALE, Product, ProductInput};
