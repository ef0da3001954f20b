use std::sync::Arc;

use catalog_infra::{InMemoryProductStore, ProductService, ProductStore};

/// Shared application services, injected into handlers as an `Extension`.
pub struct AppServices {
    pub products: ProductService<Arc<dyn ProductStore>>,
}

impl AppServices {
    /// Wire the service to a fresh in-memory store (dev/test and the default binary).
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryProductStore::new()))
    }

    pub fn with_store(store: Arc<dyn ProductStore>) -> Self {
        Self {
            products: ProductService::new(store),
        }
    }
}
