//! Menu and table loaders for the active venue
//!
//! Both caches are per venue. The menu cache is dropped whenever the remote
//! config version changes (see [`crate::poller`]).

use crate::ClientResult;
use crate::api::PosApi;
use shared::models::{DiningTable, FloorPlan, MenuCategory, MenuItem};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache key for "all items" (no category filter)
const ALL_ITEMS: &str = "";

#[derive(Debug, Default)]
struct MenuCache {
    categories: Option<Vec<MenuCategory>>,
    items: HashMap<String, Vec<MenuItem>>,
}

/// Categories and items of one venue
pub struct MenuCatalog {
    api: Arc<dyn PosApi>,
    venue_id: String,
    cache: RwLock<MenuCache>,
}

impl MenuCatalog {
    pub fn new(api: Arc<dyn PosApi>, venue_id: impl Into<String>) -> Self {
        Self {
            api,
            venue_id: venue_id.into(),
            cache: RwLock::new(MenuCache::default()),
        }
    }

    pub fn venue_id(&self) -> &str {
        &self.venue_id
    }

    /// Categories, sorted by `sort_order`
    pub async fn categories(&self) -> ClientResult<Vec<MenuCategory>> {
        if let Some(categories) = &self.cache.read().await.categories {
            return Ok(categories.clone());
        }

        let mut categories = self.api.list_categories(&self.venue_id).await?;
        categories.sort_by_key(|c| c.sort_order);
        tracing::debug!(venue_id = %self.venue_id, count = categories.len(), "Loaded menu categories");

        self.cache.write().await.categories = Some(categories.clone());
        Ok(categories)
    }

    /// Items of a category (`None` = whole menu)
    pub async fn items(&self, category_id: Option<&str>) -> ClientResult<Vec<MenuItem>> {
        let key = category_id.unwrap_or(ALL_ITEMS);
        if let Some(items) = self.cache.read().await.items.get(key) {
            return Ok(items.clone());
        }

        let items = self.api.list_items(&self.venue_id, category_id).await?;
        tracing::debug!(venue_id = %self.venue_id, category = key, count = items.len(), "Loaded menu items");

        self.cache.write().await.items.insert(key.to_string(), items.clone());
        Ok(items)
    }

    /// Categories already loaded, without touching the network
    pub async fn cached_categories(&self) -> Vec<MenuCategory> {
        self.cache.read().await.categories.clone().unwrap_or_default()
    }

    /// Items already loaded: the whole menu when fetched, else every loaded category
    pub async fn cached_items(&self) -> Vec<MenuItem> {
        let cache = self.cache.read().await;
        if let Some(all) = cache.items.get(ALL_ITEMS) {
            return all.clone();
        }
        let mut items: Vec<MenuItem> = cache.items.values().flatten().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }

    /// Look an item up among everything already loaded
    pub async fn find_item(&self, item_id: &str) -> Option<MenuItem> {
        self.cache
            .read()
            .await
            .items
            .values()
            .flatten()
            .find(|item| item.id == item_id)
            .cloned()
    }

    /// Drop everything cached; the next read refetches
    pub async fn invalidate(&self) {
        *self.cache.write().await = MenuCache::default();
        tracing::info!(venue_id = %self.venue_id, "Menu cache invalidated");
    }
}

/// Tables and floor plan of one venue
pub struct TableDirectory {
    api: Arc<dyn PosApi>,
    venue_id: String,
    tables: RwLock<Vec<DiningTable>>,
    floor_plan: RwLock<Option<FloorPlan>>,
}

impl TableDirectory {
    pub fn new(api: Arc<dyn PosApi>, venue_id: impl Into<String>) -> Self {
        Self {
            api,
            venue_id: venue_id.into(),
            tables: RwLock::new(Vec::new()),
            floor_plan: RwLock::new(None),
        }
    }

    /// Refetch tables (occupancy changes after every send / payment)
    pub async fn refresh(&self) -> ClientResult<Vec<DiningTable>> {
        let tables = self.api.list_tables(&self.venue_id).await?;
        tracing::debug!(venue_id = %self.venue_id, count = tables.len(), "Refreshed tables");
        *self.tables.write().await = tables.clone();
        Ok(tables)
    }

    /// Last fetched tables
    pub async fn tables(&self) -> Vec<DiningTable> {
        self.tables.read().await.clone()
    }

    pub async fn find(&self, table_id: &str) -> Option<DiningTable> {
        self.tables
            .read()
            .await
            .iter()
            .find(|t| t.id == table_id)
            .cloned()
    }

    /// Active floor plan, fetched once
    pub async fn floor_plan(&self) -> ClientResult<Option<FloorPlan>> {
        if let Some(plan) = self.floor_plan.read().await.as_ref() {
            return Ok(Some(plan.clone()));
        }
        let plan = self.api.active_floor_plan(&self.venue_id).await?;
        *self.floor_plan.write().await = plan.clone();
        Ok(plan)
    }
}
