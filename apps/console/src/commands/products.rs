//! # Product Commands
//!
//! The `/products` page: the list, the low-stock count, the detail panel of
//! the selected product, and the create form.
//!
//! ## Page Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Products      5 total · 4 active · 2 low stock                 │
//! │  ┌───────────────────────────────────┐ ┌─────────────────────┐  │
//! │  │ rows: filtered products           │ │ detail: selected    │  │
//! │  │  > p2  Cotton T-Shirt   $29.95    │ │ name, description,  │  │
//! │  │    p3  Dark Chocolate   $4.50  !  │ │ price, stock, image │  │
//! │  └───────────────────────────────────┘ └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;

use serde::Serialize;
use tracing::{debug, info};

use backoffice_core::{LoadStatus, Product};

use super::{breakdown_dto, FacetCountDto};
use crate::error::ApiError;
use crate::forms::{parse_product, FormInput};
use crate::state::{Outcome, ProductsStore};

/// Formats a cent amount as dollars.
///
/// ## Example
/// ```rust
/// use backoffice_console::commands::products::format_price;
///
/// assert_eq!(format_price(14999), "$149.99");
/// assert_eq!(format_price(450), "$4.50");
/// ```
pub fn format_price(cents: i64) -> String {
    format!(
        "{}${}.{:02}",
        if cents < 0 { "-" } else { "" },
        (cents / 100).abs(),
        (cents % 100).abs()
    )
}

/// Product row for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    /// `price_cents` formatted, e.g. `$149.99`
    pub price: String,
    pub category: String,
    pub stock: i64,
    /// Stock below the store's threshold.
    pub low_stock: bool,
    pub image_url: String,
    pub active: bool,
    pub created_at: String,
    pub selected: bool,
}

impl ProductDto {
    fn from_product(p: &Product, threshold: i64, selected: Option<&str>) -> Self {
        ProductDto {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            price_cents: p.price_cents,
            price: format_price(p.price_cents),
            category: p.category.to_string(),
            stock: p.stock,
            low_stock: p.is_low_stock(threshold),
            image_url: p.image_url.clone(),
            active: p.active,
            created_at: p.created_at.format("%Y-%m-%d").to_string(),
            selected: selected == Some(p.id.as_str()),
        }
    }
}

/// Everything the products page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPageDto {
    pub status: LoadStatus,
    pub error: Option<String>,
    pub total: usize,
    pub active: usize,
    pub low_stock: usize,
    pub low_stock_threshold: i64,
    pub breakdown: Vec<FacetCountDto>,
    pub query: String,
    pub filter: String,
    pub rows: Vec<ProductDto>,
    /// Detail panel. Shown even when the filter hides the selected row.
    pub detail: Option<ProductDto>,
}

/// Builds the products page from the store's derived views.
pub fn list_products(store: &ProductsStore) -> ProductsPageDto {
    let threshold = store.low_stock_threshold();
    let selected_id = store.selected_id();
    let selected_id = selected_id.as_deref();

    let rows: Vec<ProductDto> = store
        .filtered_products()
        .iter()
        .map(|p| ProductDto::from_product(p, threshold, selected_id))
        .collect();

    debug!(rows = rows.len(), "list_products command");

    ProductsPageDto {
        status: store.loading_state().status(),
        error: store.error(),
        total: store.count(),
        active: store.active_count(),
        low_stock: store.low_stock_count(),
        low_stock_threshold: threshold,
        breakdown: breakdown_dto(&store.breakdown()),
        query: store.search(),
        filter: store.filter().to_string(),
        rows,
        detail: product_detail(store),
    }
}

/// The selected product, if any.
pub fn product_detail(store: &ProductsStore) -> Option<ProductDto> {
    let selected = store.selected_product()?;
    Some(ProductDto::from_product(
        &selected,
        store.low_stock_threshold(),
        Some(selected.id.as_str()),
    ))
}

/// Validates the product form and starts the create request.
pub fn create_product(
    store: &ProductsStore,
    form: &FormInput,
) -> Result<impl Future<Output = Outcome> + Send + 'static, ApiError> {
    let draft = parse_product(form)?;
    info!(
        name = %draft.name,
        price_cents = draft.price_cents,
        category = %draft.category,
        "create_product command"
    );
    Ok(store.create_product(draft))
}
