// pos-client/tests/common/mod.rs
// In-memory POS backend shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use pos_client::{ClientError, ClientResult, ClientStorage, PosApi, PosSession, UserInfo, VenueSession};
use rust_decimal::Decimal;
use shared::models::{
    AddItemRequest, BillingEligibility, CloseOrderRequest, ConfigVersion, CreateOrderRequest,
    DiningTable, FloorPlan, MenuCategory, MenuItem, ModifierGroup, ModifierOption, OrderDetail,
    OrderLine, OrderStatus, SelectionType, SendOrderRequest, SendOrderResponse, SendRound,
    ServiceStyle, TableStatus, Venue,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const EXISTING_ORDER: &str = "o-existing";

pub struct FakePosApi {
    pub venues: Mutex<Vec<Venue>>,
    pub tables: Mutex<Vec<DiningTable>>,
    pub categories: Vec<MenuCategory>,
    pub items: Vec<MenuItem>,
    pub modifiers: HashMap<String, Vec<ModifierGroup>>,
    pub orders: Mutex<HashMap<String, OrderDetail>>,
    pub eligibility: Mutex<BillingEligibility>,
    pub config_version: AtomicI64,

    /// Every call, by endpoint name
    pub calls: Mutex<Vec<String>>,
    pub send_keys: Mutex<Vec<(String, String)>>,
    pub send_bodies: Mutex<Vec<SendOrderRequest>>,
    pub closes: Mutex<Vec<(String, CloseOrderRequest)>>,

    /// When set, `send_order` parks until notified
    pub send_gate: Mutex<Option<Arc<Notify>>>,
    pub send_started: Notify,
    /// Per order id: `get_order` parks until notified
    pub order_gates: Mutex<HashMap<String, Arc<Notify>>>,
    /// `add_item` fails once this many items were accepted
    pub fail_add_after: Mutex<Option<usize>>,

    next_order: AtomicU64,
    next_line: AtomicU64,
}

fn item(id: &str, name: &str, category: &str, cents: i64) -> MenuItem {
    MenuItem {
        id: id.into(),
        name: name.into(),
        price: Decimal::new(cents, 2),
        category_id: Some(category.into()),
        image: None,
        color: None,
    }
}

fn option(id: &str, name: &str, cents: i64, is_default: bool) -> ModifierOption {
    ModifierOption {
        id: id.into(),
        name: name.into(),
        price_adjustment: Decimal::new(cents, 2),
        is_default,
    }
}

pub fn venue(id: &str, style: ServiceStyle) -> Venue {
    Venue {
        id: id.into(),
        name: format!("Venue {}", id),
        currency: "EUR".into(),
        service_style: style,
        pos_theme: None,
    }
}

pub fn user() -> UserInfo {
    UserInfo {
        id: "u-1".into(),
        username: "maria".into(),
        role: "waiter".into(),
        permissions: vec![],
    }
}

pub fn committed_line(id: &str, item_id: &str, name: &str, cents: i64, quantity: i32) -> OrderLine {
    let mut line = OrderLine::pending(item_id, name, Decimal::new(cents, 2), vec![]);
    line.line_id = Some(id.into());
    line.quantity = quantity;
    line.recompute_total();
    line
}

impl FakePosApi {
    pub fn new(style: ServiceStyle) -> Self {
        let mut modifiers = HashMap::new();
        modifiers.insert(
            "burger".to_string(),
            vec![
                ModifierGroup {
                    id: "doneness".into(),
                    name: "Doneness".into(),
                    selection_type: SelectionType::Single,
                    required: true,
                    options: vec![
                        option("medium", "Medium", 0, true),
                        option("well", "Well done", 0, false),
                    ],
                },
                ModifierGroup {
                    id: "extras".into(),
                    name: "Extras".into(),
                    selection_type: SelectionType::Multiple,
                    required: false,
                    options: vec![
                        option("bacon", "Bacon", 150, false),
                        option("cheese", "Cheese", 100, false),
                    ],
                },
            ],
        );

        let mut orders = HashMap::new();
        orders.insert(
            EXISTING_ORDER.to_string(),
            OrderDetail {
                id: EXISTING_ORDER.into(),
                order_number: "42".into(),
                table_id: Some("t2".into()),
                status: OrderStatus::Open,
                items: vec![
                    committed_line("l-1", "margherita", "Margherita", 900, 2),
                    committed_line("l-2", "coke", "Coke", 250, 1),
                ],
                send_rounds: vec![SendRound {
                    round_no: 1,
                    sent_at: "2026-10-15T12:00:00Z".into(),
                    do_print: true,
                    do_kds: true,
                    do_stock: true,
                }],
            },
        );

        Self {
            venues: Mutex::new(vec![venue("v-1", style), venue("v-2", ServiceStyle::Counter)]),
            tables: Mutex::new(vec![
                DiningTable {
                    id: "t1".into(),
                    name: "T1".into(),
                    seats: 4,
                    status: TableStatus::Available,
                    current_order_id: None,
                },
                DiningTable {
                    id: "t2".into(),
                    name: "T2".into(),
                    seats: 2,
                    status: TableStatus::Occupied,
                    current_order_id: Some(EXISTING_ORDER.into()),
                },
            ]),
            categories: vec![
                MenuCategory {
                    id: "drinks".into(),
                    name: "Drinks".into(),
                    color: None,
                    sort_order: 2,
                },
                MenuCategory {
                    id: "food".into(),
                    name: "Food".into(),
                    color: None,
                    sort_order: 1,
                },
            ],
            items: vec![
                item("margherita", "Margherita", "food", 900),
                item("burger", "Burger", "food", 1200),
                item("coke", "Coke", "drinks", 250),
            ],
            modifiers,
            orders: Mutex::new(orders),
            eligibility: Mutex::new(BillingEligibility {
                eligible: true,
                reason: None,
                blocking_items: vec![],
            }),
            config_version: AtomicI64::new(1),
            calls: Mutex::new(Vec::new()),
            send_keys: Mutex::new(Vec::new()),
            send_bodies: Mutex::new(Vec::new()),
            closes: Mutex::new(Vec::new()),
            send_gate: Mutex::new(None),
            send_started: Notify::new(),
            order_gates: Mutex::new(HashMap::new()),
            fail_add_after: Mutex::new(None),
            next_order: AtomicU64::new(0),
            next_line: AtomicU64::new(0),
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn item(&self, id: &str) -> MenuItem {
        self.items.iter().find(|i| i.id == id).cloned().unwrap()
    }

    pub fn table(&self, id: &str) -> DiningTable {
        self.tables.lock().unwrap().iter().find(|t| t.id == id).cloned().unwrap()
    }

    pub fn order(&self, id: &str) -> OrderDetail {
        self.orders.lock().unwrap().get(id).cloned().unwrap()
    }

    fn not_found(what: &str) -> ClientError {
        ClientError::NotFound(what.to_string())
    }
}

#[async_trait]
impl PosApi for FakePosApi {
    async fn list_venues(&self) -> ClientResult<Vec<Venue>> {
        self.record("list_venues");
        Ok(self.venues.lock().unwrap().clone())
    }

    async fn get_venue(&self, venue_id: &str) -> ClientResult<Venue> {
        self.record("get_venue");
        self.venues
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == venue_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Venue"))
    }

    async fn list_tables(&self, _venue_id: &str) -> ClientResult<Vec<DiningTable>> {
        self.record("list_tables");
        Ok(self.tables.lock().unwrap().clone())
    }

    async fn active_floor_plan(&self, _venue_id: &str) -> ClientResult<Option<FloorPlan>> {
        self.record("active_floor_plan");
        Ok(None)
    }

    async fn active_config_version(&self, _venue_id: &str) -> ClientResult<ConfigVersion> {
        self.record("active_config_version");
        Ok(ConfigVersion {
            version: self.config_version.load(Ordering::SeqCst),
        })
    }

    async fn list_categories(&self, _venue_id: &str) -> ClientResult<Vec<MenuCategory>> {
        self.record("list_categories");
        Ok(self.categories.clone())
    }

    async fn list_items(&self, _venue_id: &str, category_id: Option<&str>) -> ClientResult<Vec<MenuItem>> {
        self.record("list_items");
        Ok(self
            .items
            .iter()
            .filter(|i| category_id.is_none() || i.category_id.as_deref() == category_id)
            .cloned()
            .collect())
    }

    async fn item_modifiers(&self, item_id: &str) -> ClientResult<Vec<ModifierGroup>> {
        self.record("item_modifiers");
        Ok(self.modifiers.get(item_id).cloned().unwrap_or_default())
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> ClientResult<OrderDetail> {
        self.record("create_order");
        let n = self.next_order.fetch_add(1, Ordering::SeqCst) + 1;
        let detail = OrderDetail {
            id: format!("o-{}", n),
            order_number: format!("{}", 100 + n),
            table_id: Some(request.table_id.clone()),
            status: OrderStatus::Open,
            items: vec![],
            send_rounds: vec![],
        };
        self.orders.lock().unwrap().insert(detail.id.clone(), detail.clone());
        if let Some(table) = self
            .tables
            .lock()
            .unwrap()
            .iter_mut()
            .find(|t| t.id == request.table_id)
        {
            table.status = TableStatus::Occupied;
            table.current_order_id = Some(detail.id.clone());
        }
        Ok(detail)
    }

    async fn add_item(&self, order_id: &str, request: &AddItemRequest) -> ClientResult<()> {
        self.record("add_item");
        if let Some(limit) = *self.fail_add_after.lock().unwrap()
            && self.count("add_item") > limit
        {
            return Err(ClientError::Api {
                status: http::StatusCode::CONFLICT,
                code: Some("ITEM_UNAVAILABLE".into()),
                message: "Item is sold out".into(),
            });
        }

        let n = self.next_line.fetch_add(1, Ordering::SeqCst) + 1;
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(order_id).ok_or_else(|| Self::not_found("Order"))?;
        let mut line = OrderLine::pending(
            request.menu_item_id.clone(),
            request.menu_item_id.clone(),
            self.items
                .iter()
                .find(|i| i.id == request.menu_item_id)
                .map(|i| i.price)
                .unwrap_or_default(),
            request.modifiers.clone(),
        );
        line.line_id = Some(format!("line-{}", n));
        line.quantity = request.quantity;
        line.seat = request.seat;
        line.course = request.course;
        line.notes = request.notes.clone();
        line.recompute_total();
        order.items.push(line);
        Ok(())
    }

    async fn send_order(
        &self,
        order_id: &str,
        idempotency_key: &str,
        request: &SendOrderRequest,
    ) -> ClientResult<SendOrderResponse> {
        self.record("send_order");
        let gate = self.send_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.send_started.notify_one();
            gate.notified().await;
        }

        let duplicate = self
            .send_keys
            .lock()
            .unwrap()
            .iter()
            .any(|(_, key)| key == idempotency_key);
        self.send_keys
            .lock()
            .unwrap()
            .push((order_id.to_string(), idempotency_key.to_string()));
        self.send_bodies.lock().unwrap().push(request.clone());

        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(order_id).ok_or_else(|| Self::not_found("Order"))?;
        if duplicate {
            return Ok(SendOrderResponse {
                round_no: order.send_rounds.last().map(|r| r.round_no),
                duplicate: true,
            });
        }
        let round_no = order.send_rounds.len() as u32 + 1;
        order.send_rounds.push(SendRound {
            round_no,
            sent_at: "2026-10-15T12:30:00Z".into(),
            do_print: request.do_print,
            do_kds: request.do_kds,
            do_stock: request.do_stock,
        });
        Ok(SendOrderResponse {
            round_no: Some(round_no),
            duplicate: false,
        })
    }

    async fn get_order(&self, order_id: &str) -> ClientResult<OrderDetail> {
        self.record("get_order");
        let gate = self.order_gates.lock().unwrap().get(order_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.orders
            .lock()
            .unwrap()
            .get(order_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Order"))
    }

    async fn billing_eligibility(&self, _order_id: &str) -> ClientResult<BillingEligibility> {
        self.record("billing_eligibility");
        Ok(self.eligibility.lock().unwrap().clone())
    }

    async fn close_order(&self, order_id: &str, request: &CloseOrderRequest) -> ClientResult<()> {
        self.record("close_order");
        self.closes
            .lock()
            .unwrap()
            .push((order_id.to_string(), request.clone()));
        if let Some(order) = self.orders.lock().unwrap().get_mut(order_id) {
            order.status = OrderStatus::Closed;
        }
        for table in self.tables.lock().unwrap().iter_mut() {
            if table.current_order_id.as_deref() == Some(order_id) {
                table.current_order_id = None;
                table.status = TableStatus::Available;
            }
        }
        Ok(())
    }
}

/// Session on venue v-1 with tables and menu loaded; the call log starts empty
pub async fn session(style: ServiceStyle) -> (Arc<FakePosApi>, Arc<PosSession>) {
    let api = Arc::new(FakePosApi::new(style));
    let storage = Arc::new(ClientStorage::in_memory());
    let venue = VenueSession::load(api.as_ref(), &storage, user()).await.unwrap();
    let session = PosSession::new(api.clone(), storage, venue);
    session.refresh_tables().await.unwrap();
    session.load_menu().await.unwrap();
    api.reset_calls();
    (api, Arc::new(session))
}
