use async_trait::async_trait;
use models::{Product, ProductId, Stock};

use crate::errors::ServiceError;

/// Read-only product metadata lookup.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, id: ProductId) -> Result<Product, ServiceError>;
}

/// Read-only stock lookup.
#[async_trait]
pub trait StockService: Send + Sync {
    async fn stock(&self, id: ProductId) -> Result<Stock, ServiceError>;
}

/// Namespaced string slots, the cart keeps its serialized lines in one of them.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn write(&self, key: &str, value: String) -> Result<(), ServiceError>;
    /// Returns whether the slot existed.
    async fn remove(&self, key: &str) -> Result<bool, ServiceError>;
}

/// In-memory collaborators for tests and doc examples
#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Catalog and stock endpoint backed by maps, with switchable failures and call counters.
    #[derive(Default)]
    pub struct MockCatalog {
        products: Mutex<HashMap<ProductId, Product>>,
        stock: Mutex<HashMap<ProductId, u32>>,
        fail_products: AtomicBool,
        fail_stock: AtomicBool,
        product_calls: AtomicUsize,
        stock_calls: AtomicUsize,
    }

    impl MockCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a product (its `amount` is ignored) with `stock` units available.
        pub fn with_product(self, product: Product, stock: u32) -> Self {
            self.set_stock(product.id, stock);
            lock(&self.products).insert(product.id, product.with_amount(0));
            self
        }

        pub fn set_stock(&self, id: ProductId, amount: u32) {
            lock(&self.stock).insert(id, amount);
        }

        pub fn fail_products(&self, fail: bool) {
            self.fail_products.store(fail, Ordering::SeqCst);
        }

        pub fn fail_stock(&self, fail: bool) {
            self.fail_stock.store(fail, Ordering::SeqCst);
        }

        pub fn product_calls(&self) -> usize {
            self.product_calls.load(Ordering::SeqCst)
        }

        pub fn stock_calls(&self) -> usize {
            self.stock_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProductCatalog for MockCatalog {
        async fn product(&self, id: ProductId) -> Result<Product, ServiceError> {
            self.product_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_products.load(Ordering::SeqCst) {
                return Err(ServiceError::Remote("catalog unavailable".into()));
            }
            lock(&self.products).get(&id).cloned().ok_or_else(|| ServiceError::not_found("product"))
        }
    }

    #[async_trait]
    impl StockService for MockCatalog {
        async fn stock(&self, id: ProductId) -> Result<Stock, ServiceError> {
            self.stock_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_stock.load(Ordering::SeqCst) {
                return Err(ServiceError::Remote("stock unavailable".into()));
            }
            lock(&self.stock)
                .get(&id)
                .map(|amount| Stock { id, amount: *amount })
                .ok_or_else(|| ServiceError::not_found("stock"))
        }
    }

    /// Slot store held in memory; counts writes and can be told to fail them.
    #[derive(Default)]
    pub struct MemoryStore {
        slots: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_slot(self, key: &str, value: impl Into<String>) -> Self {
            lock(&self.slots).insert(key.to_string(), value.into());
            self
        }

        pub fn slot(&self, key: &str) -> Option<String> {
            lock(&self.slots).get(key).cloned()
        }

        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl PersistentStore for MemoryStore {
        async fn read(&self, key: &str) -> Result<Option<String>, ServiceError> {
            Ok(self.slot(key))
        }

        async fn write(&self, key: &str, value: String) -> Result<(), ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Storage("disk full".into()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            lock(&self.slots).insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Storage("disk full".into()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(lock(&self.slots).remove(key).is_some())
        }
    }
}
