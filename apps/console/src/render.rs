//! # Text Rendering
//!
//! Draws a page DTO as plain text.
//!
//! ```text
//! == Users ==================================================
//! Ready
//! 5 total | 4 active | 2 admins
//! admin: 2  user: 2  viewer: 1
//! search: "sarah"  filter: admin
//!
//!     ID   NAME            EMAIL                 ROLE    STATUS
//!   > u1   Sarah Connor    sarah@resistance.net  admin   active
//! ```

use std::fmt::{self, Write};

use backoffice_core::LoadStatus;

use crate::commands::products::{ProductDto, ProductsPageDto};
use crate::commands::users::UsersPageDto;
use crate::commands::FacetCountDto;

const RULE_WIDTH: usize = 60;

pub const HELP: &str = "\
Commands:
  go <path>            open /users or /products (/ opens /users)
  search <text>        filter rows by text; `search` alone clears it
  filter <name|all>    filter rows by role or category
  select <id>          select a row; selecting it again clears the selection
  toggle <id>          flip active / inactive
  remove <id>          remove a row
  add key=value ...    create a record
                         users:    name email [role]
                         products: name description price stock [category] [image]
  retry                reload the current page
  show [json]          redraw the current page, or print its data as JSON
  help                 this text
  quit                 exit";

fn header(out: &mut String, title: &str) -> fmt::Result {
    let lead = format!("== {title} ");
    let fill = RULE_WIDTH.saturating_sub(lead.chars().count());
    writeln!(out, "{lead}{}", "=".repeat(fill))
}

/// One line: what the page is doing right now.
pub fn status_line(status: LoadStatus, error: Option<&str>) -> String {
    match (status, error) {
        (LoadStatus::Loading, _) => "Loading…".to_string(),
        (_, Some(message)) => format!("Error: {message} (type `retry`)"),
        (LoadStatus::Idle, None) => "Not loaded".to_string(),
        _ => "Ready".to_string(),
    }
}

fn breakdown_line(out: &mut String, breakdown: &[FacetCountDto]) -> fmt::Result {
    let parts: Vec<String> = breakdown
        .iter()
        .map(|b| format!("{}: {}", b.facet, b.count))
        .collect();
    writeln!(out, "{}", parts.join("  "))
}

fn query_line(out: &mut String, query: &str, filter: &str) -> fmt::Result {
    let query = query.trim();
    if query.is_empty() {
        writeln!(out, "search: -  filter: {filter}")
    } else {
        writeln!(out, "search: \"{query}\"  filter: {filter}")
    }
}

fn marker(selected: bool) -> &'static str {
    if selected {
        ">"
    } else {
        " "
    }
}

fn activity(active: bool) -> &'static str {
    if active {
        "active"
    } else {
        "inactive"
    }
}

// =============================================================================
// Users
// =============================================================================

fn write_users_page(out: &mut String, page: &UsersPageDto) -> fmt::Result {
    header(out, "Users")?;
    writeln!(out, "{}", status_line(page.status, page.error.as_deref()))?;
    writeln!(
        out,
        "{} total | {} active | {} admins",
        page.total, page.active, page.admins
    )?;
    breakdown_line(out, &page.breakdown)?;
    query_line(out, &page.query, &page.filter)?;
    writeln!(out)?;

    if page.rows.is_empty() {
        return writeln!(out, "  (no users match)");
    }

    writeln!(
        out,
        "    {:<6} {:<18} {:<24} {:<7} STATUS",
        "ID", "NAME", "EMAIL", "ROLE"
    )?;
    for row in &page.rows {
        writeln!(
            out,
            "  {} {:<6} {:<18} {:<24} {:<7} {}",
            marker(row.selected),
            row.id,
            row.name,
            row.email,
            row.role,
            activity(row.active)
        )?;
    }
    Ok(())
}

pub fn users_page(page: &UsersPageDto) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_users_page(&mut out, page);
    out
}

// =============================================================================
// Products
// =============================================================================

fn write_detail(out: &mut String, product: &ProductDto) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "-- {} ({}) --", product.name, product.id)?;
    writeln!(out, "  {}", product.description)?;
    writeln!(out, "  price:    {}", product.price)?;
    writeln!(
        out,
        "  stock:    {}{}",
        product.stock,
        if product.low_stock { " (low)" } else { "" }
    )?;
    writeln!(out, "  category: {}", product.category)?;
    writeln!(out, "  status:   {}", activity(product.active))?;
    writeln!(out, "  added:    {}", product.created_at)?;
    if !product.image_url.is_empty() {
        writeln!(out, "  image:    {}", product.image_url)?;
    }
    Ok(())
}

fn write_products_page(out: &mut String, page: &ProductsPageDto) -> fmt::Result {
    header(out, "Products")?;
    writeln!(out, "{}", status_line(page.status, page.error.as_deref()))?;
    writeln!(
        out,
        "{} total | {} active | {} low stock (< {})",
        page.total, page.active, page.low_stock, page.low_stock_threshold
    )?;
    breakdown_line(out, &page.breakdown)?;
    query_line(out, &page.query, &page.filter)?;
    writeln!(out)?;

    if page.rows.is_empty() {
        writeln!(out, "  (no products match)")?;
    } else {
        writeln!(
            out,
            "    {:<6} {:<22} {:<12} {:>10} {:>6}  STATUS",
            "ID", "NAME", "CATEGORY", "PRICE", "STOCK"
        )?;
        for row in &page.rows {
            writeln!(
                out,
                "  {} {:<6} {:<22} {:<12} {:>10} {:>6}{} {}",
                marker(row.selected),
                row.id,
                row.name,
                row.category,
                row.price,
                row.stock,
                if row.low_stock { "!" } else { " " },
                activity(row.active)
            )?;
        }
    }

    if let Some(detail) = &page.detail {
        write_detail(out, detail)?;
    }
    Ok(())
}

pub fn products_page(page: &ProductsPageDto) -> String {
    let mut out = String::new();
    let _ = write_products_page(&mut out, page);
    out
}
