//! # Product Service
//!
//! Mock `/products` endpoint backed by
//! [`seed::products`](crate::seed::products).

use backoffice_core::Product;

use super::MockService;
use crate::latency::Latency;
use crate::seed;

/// Mock product service.
pub type MockProductService = MockService<Product>;

impl MockService<Product> {
    /// Creates the service over the seed products.
    pub fn new(latency: Latency) -> Self {
        MockService::with_records(seed::products(), latency)
    }
}
