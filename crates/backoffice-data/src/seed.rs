//! # Seed Data
//!
//! The fixed records the mock services answer with.
//!
//! ```text
//!   users:    u1 Sarah Connor   admin   active
//!             u2 John Connor    user    active
//!             u3 Miles Dyson    admin   inactive
//!             u4 Kate Brewster  user    active
//!             u5 T-800 Unit     viewer  active
//!
//!   products: p1 Wireless Headphones  electronics  $149.99  42
//!             p2 Cotton T-Shirt       clothing      $29.95 120
//!             p3 Dark Chocolate Bar   food           $4.50   5
//!             p4 USB-C Hub            electronics   $59.00   0  inactive
//!             p5 Notebook & Pen Set   other         $18.00  67
//! ```

use chrono::{DateTime, TimeZone, Utc};

use backoffice_core::{Category, Product, Role, User};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn user(id: &str, name: &str, email: &str, role: Role, active: bool, created: DateTime<Utc>) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        active,
        created_at: created,
    }
}

/// The five demo users.
pub fn users() -> Vec<User> {
    vec![
        user("u1", "Sarah Connor", "sarah@resistance.net", Role::Admin, true, date(2024, 1, 15)),
        user("u2", "John Connor", "john@resistance.net", Role::User, true, date(2024, 2, 20)),
        user("u3", "Miles Dyson", "miles@cyberdyne.io", Role::Admin, false, date(2024, 3, 10)),
        user("u4", "Kate Brewster", "kate@resistance.net", Role::User, true, date(2024, 4, 5)),
        user("u5", "T-800 Unit", "unit@skynet.io", Role::Viewer, true, date(2024, 5, 1)),
    ]
}

struct ProductSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    category: Category,
    stock: i64,
    image: &'static str,
    active: bool,
    created: (i32, u32, u32),
}

const PRODUCTS: &[ProductSeed] = &[
    ProductSeed {
        id: "p1",
        name: "Wireless Headphones",
        description: "Noise-cancelling over-ear Bluetooth headphones with 30h battery.",
        price_cents: 14999,
        category: Category::Electronics,
        stock: 42,
        image: "https://placehold.co/120x120/dbeafe/2563eb?text=HP",
        active: true,
        created: (2025, 1, 10),
    },
    ProductSeed {
        id: "p2",
        name: "Cotton T-Shirt",
        description: "Premium 100% organic cotton crew-neck tee, available in 8 colours.",
        price_cents: 2995,
        category: Category::Clothing,
        stock: 120,
        image: "https://placehold.co/120x120/fce7f3/db2777?text=TS",
        active: true,
        created: (2025, 2, 14),
    },
    ProductSeed {
        id: "p3",
        name: "Dark Chocolate Bar",
        description: "70% cacao single-origin dark chocolate, 100 g.",
        price_cents: 450,
        category: Category::Food,
        stock: 5,
        image: "https://placehold.co/120x120/d1fae5/059669?text=CH",
        active: true,
        created: (2025, 3, 1),
    },
    ProductSeed {
        id: "p4",
        name: "USB-C Hub",
        description: "7-in-1 USB-C adapter with HDMI, SD card reader, and PD charging.",
        price_cents: 5900,
        category: Category::Electronics,
        stock: 0,
        image: "https://placehold.co/120x120/dbeafe/2563eb?text=HB",
        active: false,
        created: (2025, 4, 18),
    },
    ProductSeed {
        id: "p5",
        name: "Notebook & Pen Set",
        description: "A5 dotted notebook with premium gel pen gift set.",
        price_cents: 1800,
        category: Category::Other,
        stock: 67,
        image: "https://placehold.co/120x120/f3f4f6/6b7280?text=NB",
        active: true,
        created: (2025, 5, 22),
    },
];

/// The five demo products.
pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|p| Product {
            id: p.id.to_string(),
            name: p.name.to_string(),
            description: p.description.to_string(),
            price_cents: p.price_cents,
            category: p.category,
            stock: p.stock,
            image_url: p.image.to_string(),
            active: p.active,
            created_at: date(p.created.0, p.created.1, p.created.2),
        })
        .collect()
}
