//! Infrastructure layer: product storage engine and the service that drives it.

pub mod service;
pub mod store;


pub use service::{MAX_PRICE, MAX_QUANTITY, ProductService, ServiceError};
pub use store::{InMemoryProductStore, ProductStore, StoreError};
