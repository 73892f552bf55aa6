//! Menu item document type and the sample catalog.
//!
//! Field constraints are enforced when an item is constructed, so nothing
//! invalid ever reaches the store. The JSON the API returns uses a separate
//! response shape because the client depends on `_id` being a plain hex
//! string and timestamps being RFC 3339, neither of which is how the driver
//! serializes BSON types.
use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    database::{MenuStore, StoreError},
    error::AppError,
};

pub const MENU_COLLECTION: &str = "menu_items";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_in_stock() -> bool {
    true
}

impl MenuItem {
    /// Validates and builds an item; the store assigns `_id` on insert.
    pub fn new(name: &str, category: &str, price: f64, in_stock: bool) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidItem("name must not be empty".into()));
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(AppError::InvalidItem("category must not be empty".into()));
        }

        if !price.is_finite() || price < 0.0 {
            return Err(AppError::InvalidItem(format!(
                "price must be a non-negative number, got {price}"
            )));
        }

        let now = DateTime::now();

        Ok(Self {
            id: None,
            name: name.to_string(),
            category: category.to_string(),
            price,
            in_stock,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Wire shape for menu items. The client reads `_id`, `name`, `category`,
/// `price`, and `inStock` literally.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub in_stock: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: item.name,
            category: item.category,
            price: item.price,
            in_stock: item.in_stock,
            created_at: item.created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: item.updated_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

/// The fixed catalog inserted into an empty store on first boot.
pub fn sample_menu() -> Result<Vec<MenuItem>, AppError> {
    [
        // Hot Drinks
        ("Espresso", "Hot Drinks", 800.5, true),
        ("Cappuccino", "Hot Drinks", 550.5, true),
        ("Latte", "Hot Drinks", 900.0, true),
        ("Americano", "Hot Drinks", 600.0, true),
        ("Mocha", "Hot Drinks", 950.0, true),
        // Cold Drinks
        ("Iced Coffee", "Cold Drinks", 800.0, true),
        ("Cold Brew", "Cold Drinks", 850.0, true),
        ("Caramel Frappé", "Cold Drinks", 1100.0, true),
        // Pastries
        ("Croissant", "Pastries", 700.5, true),
        ("Muffin", "Pastries", 400.0, false),
        ("Donut", "Pastries", 350.0, true),
        ("Cinnamon Roll", "Pastries", 650.0, true),
        ("Cheesecake Slice", "Pastries", 950.0, true),
        ("Apple Pie Slice", "Pastries", 800.0, true),
    ]
    .into_iter()
    .map(|(name, category, price, in_stock)| MenuItem::new(name, category, price, in_stock))
    .collect()
}

/// Inserts the sample catalog if the store holds nothing, at most once per
/// empty store. A populated store is left untouched.
pub async fn seed_if_empty(store: &dyn MenuStore) -> Result<u64, StoreError> {
    let count = store.count().await?;
    if count > 0 {
        info!("Menu already has {count} items");
        return Ok(0);
    }

    let items = sample_menu().map_err(|e| StoreError(e.to_string()))?;
    let inserted = items.len() as u64;
    store.insert_many(items).await?;
    info!("Seeded {inserted} sample menu items");

    Ok(inserted)
}
