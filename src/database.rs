//! # MongoDB
//!
//! Document store holding the `menu_items` collection.
//!
//! The service needs four primitives: count, insert-many (seeding), a sorted
//! full scan (listing), and filtered random sampling (`$sample`). They sit
//! behind the [`MenuStore`] trait so handlers can run against the in-memory
//! [`FakeMenuStore`] in tests.
//!
//! One client is created at boot and shared for the life of the process; the
//! driver pools connections internally. No retries — a failed operation
//! surfaces as a [`StoreError`] and the caller decides what to do with it.
use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{doc, oid::ObjectId},
    options::ClientOptions,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::menu::{MENU_COLLECTION, MenuItem};

#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self(err.to_string())
    }
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;

    async fn insert_many(&self, items: Vec<MenuItem>) -> Result<(), StoreError>;

    /// All items ordered by (category, name) ascending, case-sensitive,
    /// ties in natural store order.
    async fn list_sorted(&self) -> Result<Vec<MenuItem>, StoreError>;

    /// One uniformly-random in-stock item, skipping `exclude` if given.
    /// `None` when nothing qualifies.
    async fn sample_in_stock(
        &self,
        exclude: Option<ObjectId>,
    ) -> Result<Option<MenuItem>, StoreError>;
}

pub struct MongoMenuStore {
    collection: Collection<MenuItem>,
}

impl MongoMenuStore {
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(Duration::from_secs(10));

        let client = Client::with_options(options)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database("coffee_shop_db"));

        // Fail now rather than on the first request.
        database.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB");

        Ok(Self {
            collection: database.collection(MENU_COLLECTION),
        })
    }
}

#[async_trait]
impl MenuStore for MongoMenuStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn insert_many(&self, items: Vec<MenuItem>) -> Result<(), StoreError> {
        self.collection.insert_many(items).await?;
        Ok(())
    }

    async fn list_sorted(&self) -> Result<Vec<MenuItem>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "category": 1, "name": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn sample_in_stock(
        &self,
        exclude: Option<ObjectId>,
    ) -> Result<Option<MenuItem>, StoreError> {
        let mut filter = doc! { "inStock": true };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }

        let pipeline = [doc! { "$match": filter }, doc! { "$sample": { "size": 1 } }];

        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .with_type::<MenuItem>()
            .await?;

        Ok(cursor.try_next().await?)
    }
}

/// In-memory store for tests. Sampling cycles through qualifying items with a
/// counter instead of a real RNG so tests stay deterministic while still
/// touching every candidate. Flipping `set_failing` makes every operation
/// return a [`StoreError`], for exercising the degraded paths.
#[derive(Default)]
pub struct FakeMenuStore {
    items: Mutex<Vec<MenuItem>>,
    pick: AtomicU64,
    failing: AtomicBool,
}

impl FakeMenuStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    fn check_failing(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(StoreError("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MenuStore for FakeMenuStore {
    async fn count(&self) -> Result<u64, StoreError> {
        self.check_failing()?;
        Ok(self.items.lock().await.len() as u64)
    }

    async fn insert_many(&self, items: Vec<MenuItem>) -> Result<(), StoreError> {
        self.check_failing()?;
        let mut stored = self.items.lock().await;
        for mut item in items {
            if item.id.is_none() {
                item.id = Some(ObjectId::new());
            }
            stored.push(item);
        }
        Ok(())
    }

    async fn list_sorted(&self) -> Result<Vec<MenuItem>, StoreError> {
        self.check_failing()?;
        let mut items = self.items.lock().await.clone();
        // Stable sort keeps insertion order for ties.
        items.sort_by(|a, b| (&a.category, &a.name).cmp(&(&b.category, &b.name)));
        Ok(items)
    }

    async fn sample_in_stock(
        &self,
        exclude: Option<ObjectId>,
    ) -> Result<Option<MenuItem>, StoreError> {
        self.check_failing()?;
        let items = self.items.lock().await;
        let candidates: Vec<&MenuItem> = items
            .iter()
            .filter(|item| item.in_stock && exclude.map_or(true, |id| item.id != Some(id)))
            .collect();

        if candidates.is_empty() {
            return Ok(None);
        }

        let index = self.pick.fetch_add(1, Ordering::Relaxed) as usize % candidates.len();
        Ok(Some(candidates[index].clone()))
    }
}
