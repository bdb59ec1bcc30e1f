use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use models::{Cart, ProductId};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

use super::errors::CartError;
use super::notifier::Notifier;
use super::ports::{PersistentStore, ProductCatalog, StockService};
use crate::errors::ServiceError;

pub const ADDED: &str = "Product added to cart";
pub const REMOVED: &str = "Product removed from cart";
pub const UPDATED: &str = "Product amount updated";
pub const CLEARED: &str = "Cart cleared";

/// Requested quantity for a line. Signed so that zero and negative requests
/// coming from a UI can be ignored instead of rejected at decode time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Collaborators injected into a [`CartStore`].
#[derive(Clone)]
pub struct CartDeps {
    pub catalog: Arc<dyn ProductCatalog>,
    pub stock: Arc<dyn StockService>,
    pub storage: Arc<dyn PersistentStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Cart state container.
///
/// Holds the current cart as an immutable snapshot; each successful mutation
/// builds a new `Cart`, writes it to the storage slot, then swaps it in.
/// Mutations of the same product run one at a time, and every commit applies
/// its line change to the freshest snapshot, so concurrent calls never drop
/// each other's lines and the stored blob always matches memory.
pub struct CartStore {
    snapshot: ArcSwap<Cart>,
    key: String,
    deps: CartDeps,
    product_locks: DashMap<ProductId, Arc<Mutex<()>>>,
    commit_lock: Mutex<()>,
}

impl CartStore {
    /// Restore the cart from the storage slot named `key`.
    ///
    /// A missing slot starts an empty cart, and so does a slot that does not
    /// decode as a list of products. Failing to read the slot at all is an error.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::cart::{CartDeps, CartStore, RecordingNotifier};
    /// use service::cart::ports::mock::{MemoryStore, MockCatalog};
    /// use models::Product;
    ///
    /// let catalog = Arc::new(MockCatalog::new().with_product(
    ///     Product { id: 1, name: "Tênis".into(), price: 179.9, image: "https://img/1.jpg".into(), amount: 0 },
    ///     3,
    /// ));
    /// let deps = CartDeps {
    ///     catalog: catalog.clone(),
    ///     stock: catalog,
    ///     storage: Arc::new(MemoryStore::new()),
    ///     notifier: Arc::new(RecordingNotifier::new()),
    /// };
    /// let store = tokio_test::block_on(CartStore::load("@RocketShoes:cart", deps)).unwrap();
    /// let cart = tokio_test::block_on(store.add_product(1)).unwrap();
    /// assert_eq!(cart.find(1).map(|p| p.amount), Some(1));
    /// ```
    #[instrument(skip(deps))]
    pub async fn load(key: &str, deps: CartDeps) -> Result<Self, ServiceError> {
        let cart = match deps.storage.read(key).await? {
            Some(raw) => Cart::from_json(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "stored cart is unreadable; starting empty");
                Cart::new()
            }),
            None => Cart::new(),
        };
        info!(lines = cart.size(), "cart restored");
        Ok(Self {
            snapshot: ArcSwap::from_pointee(cart),
            key: key.to_string(),
            deps,
            product_locks: DashMap::new(),
            commit_lock: Mutex::new(()),
        })
    }

    /// Current cart snapshot.
    pub fn cart(&self) -> Arc<Cart> {
        self.snapshot.load_full()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Add one unit of `product_id`: a new line with amount 1, or the existing
    /// line incremented by one, as long as stock allows it.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let _guard = self.lock_product(product_id).await;
        let result = self.try_add(product_id).await;
        self.report(&result, ADDED);
        result
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let failed = |e: ServiceError| CartError::AddFailed { product_id, reason: e.to_string() };

        let product = match self.cart().find(product_id) {
            Some(existing) => existing.clone(),
            None => {
                let product = self.deps.catalog.product(product_id).await.map_err(failed)?;
                if product.id != product_id {
                    return Err(CartError::AddFailed {
                        product_id,
                        reason: format!("catalog answered with product {}", product.id),
                    });
                }
                product
            }
        };
        let stock = self.deps.stock.stock(product_id).await.map_err(failed)?;

        // the line may have changed while stock was in flight, so size it from the cart being committed to
        self.commit(
            |cart| {
                let held = cart.find(product_id).map_or(0, |p| p.amount);
                if stock.amount <= held {
                    return Err(CartError::OutOfStock {
                        product_id,
                        requested: held.saturating_add(1),
                        available: stock.amount,
                    });
                }
                let line = cart.find(product_id).unwrap_or(&product).with_amount(held + 1);
                debug!(amount = line.amount, "committing line");
                cart.with_line(line).map_err(|e| failed(e.into()))
            },
            failed,
        )
        .await
    }

    /// Drop the line for `product_id`.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let _guard = self.lock_product(product_id).await;
        let result = self.try_remove(product_id).await;
        self.report(&result, REMOVED);
        result
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<Arc<Cart>, CartError> {
        let failed = |e: ServiceError| CartError::RemoveFailed { product_id, reason: e.to_string() };
        self.commit(
            |cart| cart.without(product_id).ok_or_else(|| failed(ServiceError::not_found("cart line"))),
            failed,
        )
        .await
    }

    /// Set the amount of an existing line.
    ///
    /// Requests below 1 are ignored without a notification and return
    /// `Ok(None)`; nothing is fetched or written for them.
    #[instrument(skip(self, update), fields(product_id = update.product_id, amount = update.amount))]
    pub async fn update_product_amount(
        &self,
        update: UpdateProductAmount,
    ) -> Result<Option<Arc<Cart>>, CartError> {
        if update.amount < 1 {
            debug!("ignoring amount below 1");
            return Ok(None);
        }
        let _guard = self.lock_product(update.product_id).await;
        let result = self.try_update(update).await;
        self.report(&result, UPDATED);
        result.map(Some)
    }

    async fn try_update(&self, update: UpdateProductAmount) -> Result<Arc<Cart>, CartError> {
        let product_id = update.product_id;
        let failed = |e: ServiceError| CartError::UpdateFailed { product_id, reason: e.to_string() };

        let stock = self.deps.stock.stock(product_id).await.map_err(failed)?;
        let requested = match u32::try_from(update.amount) {
            Ok(requested) if stock.allows(requested) => requested,
            Ok(requested) => {
                return Err(CartError::OutOfStock { product_id, requested, available: stock.amount })
            }
            Err(_) => {
                return Err(CartError::OutOfStock { product_id, requested: u32::MAX, available: stock.amount })
            }
        };

        self.commit(
            |cart| {
                cart.with_amount(product_id, requested)
                    .map_err(|e| failed(e.into()))?
                    .ok_or(CartError::NotInCart { product_id })
            },
            failed,
        )
        .await
    }

    /// Empty the cart and drop its storage slot.
    ///
    /// Mutations already waiting on the catalog re-read the cart when they
    /// commit, so a line cleared under them is added back as a fresh line.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<Arc<Cart>, ServiceError> {
        let _guard = self.commit_lock.lock().await;
        let result = self.deps.storage.remove(&self.key).await;
        match result {
            Ok(existed) => {
                let empty = Arc::new(Cart::new());
                self.snapshot.store(Arc::clone(&empty));
                info!(existed, "cart cleared");
                self.deps.notifier.info(CLEARED);
                Ok(empty)
            }
            Err(e) => {
                warn!(error = %e, "clearing cart failed");
                Err(e)
            }
        }
    }

    async fn lock_product(&self, product_id: ProductId) -> ProductGuard<'_> {
        let lock = self
            .product_locks
            .entry(product_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        ProductGuard { locks: &self.product_locks, product_id, guard: Some(guard) }
    }

    /// Apply `change` to the freshest snapshot, persist the result, then publish it.
    /// Nothing is published when `change` or the write fails.
    async fn commit<F, E>(&self, change: F, failed: E) -> Result<Arc<Cart>, CartError>
    where
        F: FnOnce(&Cart) -> Result<Cart, CartError>,
        E: Fn(ServiceError) -> CartError,
    {
        let _guard = self.commit_lock.lock().await;
        let current = self.snapshot.load_full();
        let next = change(&current)?;
        let raw = next.to_json().map_err(|e| failed(e.into()))?;
        self.deps.storage.write(&self.key, raw).await.map_err(&failed)?;
        let next = Arc::new(next);
        self.snapshot.store(Arc::clone(&next));
        Ok(next)
    }

    fn report<T>(&self, result: &Result<T, CartError>, success: &str) {
        match result {
            Ok(_) => {
                info!(lines = self.cart().size(), "cart updated");
                self.deps.notifier.info(success);
            }
            Err(e) if e.is_business_rule() => {
                info!(code = e.code(), error = ?e, "cart change rejected");
                self.deps.notifier.error(&e.to_string());
            }
            Err(e) => {
                warn!(code = e.code(), error = ?e, "cart change failed");
                self.deps.notifier.error(&e.to_string());
            }
        }
    }
}

/// Holds the per-product mutex and drops its table entry once nobody else wants it.
struct ProductGuard<'a> {
    locks: &'a DashMap<ProductId, Arc<Mutex<()>>>,
    product_id: ProductId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ProductGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // only the table's own handle left
        self.locks.remove_if(&self.product_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
