//! Typed POS REST API
//!
//! [`PosApi`] is the seam between the order flow and the network. The
//! production implementation is [`RestPosApi`] over any [`HttpClient`].

use crate::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};
use async_trait::async_trait;
use serde::de::IgnoredAny;
use shared::models::{
    AddItemRequest, BillingEligibility, CloseOrderRequest, ConfigVersion, CreateOrderRequest,
    DiningTable, FloorPlan, MenuCategory, MenuItem, ModifierGroup, OrderDetail,
    SendOrderRequest, SendOrderResponse, Venue,
};

/// Endpoints consumed by the POS client
#[async_trait]
pub trait PosApi: Send + Sync {
    // ========== Venues ==========
    async fn list_venues(&self) -> ClientResult<Vec<Venue>>;
    async fn get_venue(&self, venue_id: &str) -> ClientResult<Venue>;
    async fn list_tables(&self, venue_id: &str) -> ClientResult<Vec<DiningTable>>;
    async fn active_floor_plan(&self, venue_id: &str) -> ClientResult<Option<FloorPlan>>;
    async fn active_config_version(&self, venue_id: &str) -> ClientResult<ConfigVersion>;

    // ========== Menu ==========
    async fn list_categories(&self, venue_id: &str) -> ClientResult<Vec<MenuCategory>>;
    async fn list_items(&self, venue_id: &str, category_id: Option<&str>) -> ClientResult<Vec<MenuItem>>;
    async fn item_modifiers(&self, item_id: &str) -> ClientResult<Vec<ModifierGroup>>;

    // ========== Orders ==========
    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<OrderDetail>;
    async fn add_item(&self, order_id: &str, request: &AddItemRequest) -> ClientResult<()>;
    async fn send_order(
        &self,
        order_id: &str,
        idempotency_key: &str,
        request: &SendOrderRequest,
    ) -> ClientResult<SendOrderResponse>;
    async fn get_order(&self, order_id: &str) -> ClientResult<OrderDetail>;
    async fn billing_eligibility(&self, order_id: &str) -> ClientResult<BillingEligibility>;
    async fn close_order(&self, order_id: &str, request: &CloseOrderRequest) -> ClientResult<()>;
}

/// REST implementation of [`PosApi`]
#[derive(Debug, Clone)]
pub struct RestPosApi<H = NetworkHttpClient> {
    http: H,
}

impl<H: HttpClient> RestPosApi<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &H {
        &self.http
    }
}

#[async_trait]
impl<H: HttpClient> PosApi for RestPosApi<H> {
    async fn list_venues(&self) -> ClientResult<Vec<Venue>> {
        self.http.get("/venues").await
    }

    async fn get_venue(&self, venue_id: &str) -> ClientResult<Venue> {
        self.http.get(&format!("/venues/{}", venue_id)).await
    }

    async fn list_tables(&self, venue_id: &str) -> ClientResult<Vec<DiningTable>> {
        self.http.get(&format!("/venues/{}/tables", venue_id)).await
    }

    async fn active_floor_plan(&self, venue_id: &str) -> ClientResult<Option<FloorPlan>> {
        self.http
            .get(&format!("/venues/{}/active-floor-plan", venue_id))
            .await
    }

    async fn active_config_version(&self, venue_id: &str) -> ClientResult<ConfigVersion> {
        self.http
            .get(&format!("/venues/{}/active-config-version", venue_id))
            .await
    }

    async fn list_categories(&self, venue_id: &str) -> ClientResult<Vec<MenuCategory>> {
        self.http
            .get_with_query("/menu/categories", &[("venue_id", venue_id)])
            .await
    }

    async fn list_items(&self, venue_id: &str, category_id: Option<&str>) -> ClientResult<Vec<MenuItem>> {
        match category_id {
            Some(category) => {
                self.http
                    .get_with_query("/menu/items", &[("venue_id", venue_id), ("category", category)])
                    .await
            }
            None => {
                self.http
                    .get_with_query("/menu/items", &[("venue_id", venue_id)])
                    .await
            }
        }
    }

    async fn item_modifiers(&self, item_id: &str) -> ClientResult<Vec<ModifierGroup>> {
        self.http
            .get(&format!("/menu/items/{}/modifiers", item_id))
            .await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<OrderDetail> {
        self.http.post("/orders", request).await
    }

    async fn add_item(&self, order_id: &str, request: &AddItemRequest) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .post(&format!("/orders/{}/items", order_id), request)
            .await?;
        Ok(())
    }

    async fn send_order(
        &self,
        order_id: &str,
        idempotency_key: &str,
        request: &SendOrderRequest,
    ) -> ClientResult<SendOrderResponse> {
        let response: Option<SendOrderResponse> = self
            .http
            .post_idempotent(&format!("/orders/{}/send", order_id), idempotency_key, request)
            .await?;
        Ok(response.unwrap_or_default())
    }

    async fn get_order(&self, order_id: &str) -> ClientResult<OrderDetail> {
        self.http.get(&format!("/orders/{}", order_id)).await
    }

    async fn billing_eligibility(&self, order_id: &str) -> ClientResult<BillingEligibility> {
        self.http
            .get(&format!("/orders/{}/billing-eligibility", order_id))
            .await
    }

    async fn close_order(&self, order_id: &str, request: &CloseOrderRequest) -> ClientResult<()> {
        let _: IgnoredAny = self
            .http
            .post(&format!("/orders/{}/close", order_id), request)
            .await?;
        Ok(())
    }
}
