//! # Products Store
//!
//! [`EntityStore<Product>`] with product-specific names and the low-stock
//! count.

use std::future::Future;
use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};

use backoffice_core::reactive::Memo;
use backoffice_core::{Category, Filter, NewProduct, Product, LOW_STOCK_THRESHOLD};
use backoffice_data::RecordService;

use super::store::{EntityStore, Outcome};

/// The `/products` page store.
#[derive(Debug, Clone)]
pub struct ProductsStore {
    inner: EntityStore<Product>,
    low_stock_threshold: i64,
    /// Keyed on the collection version; the threshold is fixed per store.
    low_stock: Arc<Mutex<Memo<u64, usize>>>,
}

impl ProductsStore {
    pub fn new(service: Arc<dyn RecordService<Product>>) -> Self {
        Self::with_threshold(service, LOW_STOCK_THRESHOLD)
    }

    /// Creates a store whose low-stock count uses `threshold`.
    pub fn with_threshold(service: Arc<dyn RecordService<Product>>, threshold: i64) -> Self {
        ProductsStore {
            inner: EntityStore::new(service),
            low_stock_threshold: threshold,
            low_stock: Arc::new(Mutex::new(Memo::new())),
        }
    }

    pub fn products(&self) -> Arc<[Product]> {
        self.inner.entities()
    }

    pub fn filtered_products(&self) -> Arc<[Product]> {
        self.inner.filtered()
    }

    pub fn active_products(&self) -> Arc<[Product]> {
        self.inner.active()
    }

    pub fn selected_product(&self) -> Option<Product> {
        self.inner.selected()
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    /// Products with stock below the threshold, active or not.
    pub fn low_stock_count(&self) -> usize {
        let threshold = self.low_stock_threshold;
        self.inner.with_items(|version, items| {
            let mut memo = self.low_stock.lock().unwrap_or_else(PoisonError::into_inner);
            memo.get_or_compute(version, || {
                items.iter().filter(|p| p.is_low_stock(threshold)).count()
            })
        })
    }

    /// `None` shows every category.
    pub fn set_filter_category(&self, category: Option<Category>) -> bool {
        self.inner
            .set_filter(category.map_or(Filter::All, Filter::Only))
    }

    pub fn load_products(&self) -> impl Future<Output = Outcome> + Send + 'static {
        self.inner.load()
    }

    pub fn create_product(
        &self,
        draft: NewProduct,
    ) -> impl Future<Output = Outcome> + Send + 'static {
        self.inner.create(draft)
    }
}

impl Deref for ProductsStore {
    type Target = EntityStore<Product>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
