//! POS session: order state and the send / payment orchestrator
//!
//! One [`PosSession`] drives one terminal. It owns the cart, the table
//! binding, the theme and the single-flight guard shared by send and payment.
//!
//! # Send flow
//!
//! 1. create the order when the server does not know it yet
//! 2. post every pending line, in ticket order
//! 3. `POST /orders/:id/send` with an `Idempotency-Key` header
//! 4. drop pending lines, refetch the order, refresh table occupancy
//!
//! Steps already completed are not rolled back when a later one fails.

use crate::api::PosApi;
use crate::cart::Cart;
use crate::catalog::{MenuCatalog, TableDirectory};
use crate::idempotency;
use crate::layout::{Action, LayoutProps, LayoutRenderer, LayoutUiState, RenderLayout, Screen};
use crate::modifier::{ItemWithModifiers, ModifierSelection};
use crate::poller::MenuVersionPoller;
use crate::storage::{ClientStorage, SendOptions};
use crate::theme::{self, PosTheme, ThemeInfo, ThemeLayer};
use crate::toast::Toast;
use crate::venue::VenueSession;
use crate::{ClientError, ClientResult, audit_log};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::OrderTotals;
use shared::models::{
    AddItemRequest, CloseOrderRequest, CreateOrderRequest, CurrentOrder, DiningTable, MenuItem,
    OrderLine, PaymentMethodKind, SendOrderRequest,
};
use shared::money::{format_amount, split_evenly};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, RwLockWriteGuard, broadcast};
use tokio_util::sync::CancellationToken;

/// Table reference used for orders without a table
pub const COUNTER_TABLE: &str = "counter";

const TOAST_CHANNEL_CAPACITY: usize = 64;

/// Payment method chosen on the pay screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    /// Even split preview; no payment is taken
    Split { ways: u32 },
}

/// Result of tapping a menu item
#[derive(Debug)]
pub enum AddItemOutcome {
    /// Nothing added; a table has to be picked first
    TableRequired,
    /// The item has modifiers; confirm the selection to add it
    ChooseModifiers(ModifierSelection),
    /// Added straight away (no modifier groups)
    Added { line: usize },
}

/// Successful send
#[derive(Debug, Clone, PartialEq)]
pub struct SendReceipt {
    pub order_id: String,
    pub order_number: String,
    pub round_no: Option<u32>,
    pub idempotency_key: String,
    pub lines_sent: usize,
    /// Server already had this key
    pub duplicate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Paid {
        order_id: String,
        method: PaymentMethodKind,
        amount: Decimal,
    },
    SplitPreview {
        ways: u32,
        per_person: Decimal,
        total: Decimal,
    },
}

/// What a dispatched [`Action`] produced
#[derive(Debug)]
pub enum ActionOutcome {
    Done,
    Item(AddItemOutcome),
    Sent(SendReceipt),
    Payment(PaymentOutcome),
}

#[derive(Debug, Clone, Default)]
struct OrderState {
    table: Option<DiningTable>,
    current_order: Option<CurrentOrder>,
    cart: Cart,
    /// The table's open order is being fetched; the cart is not usable yet
    loading: bool,
}

#[derive(Debug, Clone)]
struct ViewState {
    theme: PosTheme,
    layer: ThemeLayer,
    ui: LayoutUiState,
}

/// Clears the in-flight flag on every exit path
struct SendGuard<'a>(&'a AtomicBool);

impl<'a> SendGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> ClientResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClientError::SendInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Lines hydrated from the server are committed even when the payload omits ids
fn committed_lines(order_id: &str, lines: Vec<OrderLine>) -> Vec<OrderLine> {
    lines
        .into_iter()
        .enumerate()
        .map(|(index, mut line)| {
            if line.line_id.is_none() {
                line.line_id = Some(format!("{}:{}", order_id, index));
            }
            line
        })
        .collect()
}

/// Ordering happens at the counter: no table needed, payment sends first
fn is_counter_flow(theme: PosTheme, session: &VenueSession) -> bool {
    session.venue.service_style.pays_at_order() || !theme.requires_table()
}

/// POS terminal session
pub struct PosSession {
    api: Arc<dyn PosApi>,
    storage: Arc<ClientStorage>,
    venue: RwLock<Arc<VenueSession>>,
    menu: RwLock<Arc<MenuCatalog>>,
    tables: RwLock<Arc<TableDirectory>>,
    order: RwLock<OrderState>,
    view: RwLock<ViewState>,
    sending: AtomicBool,
    online: AtomicBool,
    /// Bumped on every table selection; stale hydrations compare against it
    table_generation: AtomicU64,
    toasts: broadcast::Sender<Toast>,
}

impl PosSession {
    pub fn new(api: Arc<dyn PosApi>, storage: Arc<ClientStorage>, venue: VenueSession) -> Self {
        let (theme, layer) = theme::resolve_theme(&storage, &venue.user.id, &venue.venue);
        let (toasts, _) = broadcast::channel(TOAST_CHANNEL_CAPACITY);
        tracing::info!(venue_id = %venue.venue.id, theme = %theme, ?layer, "POS session started");

        Self {
            menu: RwLock::new(Arc::new(MenuCatalog::new(api.clone(), venue.venue.id.clone()))),
            tables: RwLock::new(Arc::new(TableDirectory::new(api.clone(), venue.venue.id.clone()))),
            venue: RwLock::new(Arc::new(venue)),
            order: RwLock::new(OrderState::default()),
            view: RwLock::new(ViewState {
                theme,
                layer,
                ui: LayoutUiState::default(),
            }),
            sending: AtomicBool::new(false),
            online: AtomicBool::new(true),
            table_generation: AtomicU64::new(0),
            toasts,
            api,
            storage,
        }
    }

    fn toast(&self, toast: Toast) {
        // No subscriber is fine
        let _ = self.toasts.send(toast);
    }

    fn fail<T>(&self, err: ClientError) -> ClientResult<T> {
        self.toast(Toast::from(&err));
        Err(err)
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.toasts.subscribe()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::Acquire)
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    pub fn set_online(&self, online: bool) {
        if self.online.swap(online, Ordering::AcqRel) != online {
            tracing::info!(online, "Connectivity changed");
        }
    }

    /// Cart and table edits are refused while a send is in flight
    fn ensure_idle(&self) -> ClientResult<()> {
        if self.is_sending() {
            return Err(ClientError::SendInFlight);
        }
        Ok(())
    }

    /// Order state for a cart edit; refused until the bound table is hydrated
    async fn editable_order(&self) -> ClientResult<RwLockWriteGuard<'_, OrderState>> {
        self.ensure_idle()?;
        let state = self.order.write().await;
        if state.loading {
            return Err(ClientError::TableLoading);
        }
        Ok(state)
    }

    pub async fn is_table_loading(&self) -> bool {
        self.order.read().await.loading
    }

    pub fn storage(&self) -> &ClientStorage {
        &self.storage
    }

    // ========== Venue ==========

    pub async fn venue(&self) -> Arc<VenueSession> {
        self.venue.read().await.clone()
    }

    /// Switch to another venue; order state, caches and UI toggles start over
    pub async fn replace_venue(&self, venue: VenueSession) -> ClientResult<()> {
        self.ensure_idle()?;
        let (theme, layer) = theme::resolve_theme(&self.storage, &venue.user.id, &venue.venue);
        let venue_id = venue.venue.id.clone();

        *self.menu.write().await = Arc::new(MenuCatalog::new(self.api.clone(), venue_id.clone()));
        *self.tables.write().await = Arc::new(TableDirectory::new(self.api.clone(), venue_id.clone()));
        *self.venue.write().await = Arc::new(venue);
        self.rebind(OrderState::default()).await;
        *self.view.write().await = ViewState {
            theme,
            layer,
            ui: LayoutUiState::default(),
        };

        tracing::info!(venue_id = %venue_id, theme = %theme, "Venue switched");
        Ok(())
    }

    pub async fn select_venue(&self, venue_id: &str) -> ClientResult<()> {
        self.ensure_idle()?;
        let next = self
            .venue()
            .await
            .select(self.api.as_ref(), &self.storage, venue_id)
            .await?;
        self.replace_venue(next).await
    }

    /// Reload venue data; the order in progress survives unless the venue disappeared
    pub async fn refresh_venue(&self) -> ClientResult<()> {
        let current = self.venue().await;
        let next = current.refresh(self.api.as_ref(), &self.storage).await?;
        if next.venue.id == current.venue.id {
            *self.venue.write().await = Arc::new(next);
            Ok(())
        } else {
            tracing::warn!(previous = %current.venue.id, next = %next.venue.id, "Active venue no longer available");
            self.replace_venue(next).await
        }
    }

    // ========== Menu & tables ==========

    pub async fn menu(&self) -> Arc<MenuCatalog> {
        self.menu.read().await.clone()
    }

    pub async fn table_directory(&self) -> Arc<TableDirectory> {
        self.tables.read().await.clone()
    }

    /// Fetch categories and the whole menu into the cache
    pub async fn load_menu(&self) -> ClientResult<()> {
        let menu = self.menu().await;
        menu.categories().await?;
        menu.items(None).await?;
        Ok(())
    }

    pub async fn refresh_tables(&self) -> ClientResult<Vec<DiningTable>> {
        self.table_directory().await.refresh().await
    }

    async fn refresh_tables_quietly(&self) {
        if let Err(e) = self.refresh_tables().await {
            tracing::warn!(error = %e, "Table refresh failed");
        }
    }

    /// Poller bound to the current venue's menu cache
    pub async fn menu_poller(&self, period: Duration) -> MenuVersionPoller {
        MenuVersionPoller::new(self.api.clone(), self.menu().await, period)
    }

    /// Run a menu poller on the current runtime until `cancel` fires
    pub async fn spawn_menu_poller(
        &self,
        period: Duration,
        cancel: CancellationToken,
    ) -> Arc<MenuVersionPoller> {
        let poller = Arc::new(self.menu_poller(period).await);
        tokio::spawn(poller.clone().run(cancel));
        poller
    }

    // ========== Theme & UI toggles ==========

    pub async fn theme(&self) -> PosTheme {
        self.view.read().await.theme
    }

    pub async fn theme_layer(&self) -> ThemeLayer {
        self.view.read().await.layer
    }

    pub async fn theme_info(&self) -> ThemeInfo {
        self.theme().await.info()
    }

    /// Explicit theme change; persisted, order state untouched
    pub async fn set_theme(&self, theme: PosTheme) -> ClientResult<()> {
        let user_id = self.venue().await.user.id.clone();
        theme::persist_theme(&self.storage, &user_id, theme)?;
        let mut view = self.view.write().await;
        view.theme = theme;
        view.layer = ThemeLayer::Engine;
        Ok(())
    }

    pub async fn ui_state(&self) -> LayoutUiState {
        self.view.read().await.ui.clone()
    }

    pub async fn select_category(&self, category_id: Option<String>) {
        self.view.write().await.ui.active_category = category_id;
    }

    pub async fn set_active_course(&self, course: u32) {
        self.view.write().await.ui.active_course = course.max(1);
    }

    pub async fn set_active_seat(&self, seat: u32) {
        self.view.write().await.ui.active_seat = seat.max(1);
    }

    pub async fn toggle_keyboard(&self) -> bool {
        let mut view = self.view.write().await;
        view.ui.keyboard_visible = !view.ui.keyboard_visible;
        view.ui.keyboard_visible
    }

    pub async fn set_search(&self, query: impl Into<String>) {
        self.view.write().await.ui.search = query.into();
    }

    // ========== Send options ==========

    pub fn send_options(&self) -> SendOptions {
        self.storage.send_options()
    }

    pub fn set_send_options(&self, options: SendOptions) -> ClientResult<()> {
        self.storage.set_send_options(options)
    }

    // ========== Table binding ==========

    pub async fn selected_table(&self) -> Option<DiningTable> {
        self.order.read().await.table.clone()
    }

    pub async fn current_order(&self) -> Option<CurrentOrder> {
        self.order.read().await.current_order.clone()
    }

    pub async fn cart(&self) -> Cart {
        self.order.read().await.cart.clone()
    }

    /// Swap the order state and start a new selection generation, under one
    /// write lock so a hydration in flight can tell it was superseded
    async fn rebind(&self, next: OrderState) -> (u64, OrderState) {
        let mut state = self.order.write().await;
        let generation = self.table_generation.fetch_add(1, Ordering::AcqRel) + 1;
        (generation, std::mem::replace(&mut *state, next))
    }

    /// Bind the session to a table
    ///
    /// The previous cart is dropped. A table holding an open order is hydrated
    /// from the server and the cart stays locked until then; a response
    /// arriving after another selection is ignored. When the fetch fails the
    /// previous binding is restored.
    pub async fn select_table(&self, table: &DiningTable) -> ClientResult<()> {
        self.ensure_idle()?;
        let Some(order_id) = table.current_order_id.as_deref() else {
            self.rebind(OrderState {
                table: Some(table.clone()),
                ..Default::default()
            })
            .await;
            tracing::debug!(table_id = %table.id, "Selected free table");
            return Ok(());
        };

        let (generation, mut previous) = self
            .rebind(OrderState {
                table: Some(table.clone()),
                loading: true,
                ..Default::default()
            })
            .await;
        if previous.loading {
            // Its own hydration is now stale and will never finish it
            previous = OrderState::default();
        }

        let fetched = self.api.get_order(order_id).await;

        let mut state = self.order.write().await;
        if self.table_generation.load(Ordering::Acquire) != generation {
            tracing::debug!(table_id = %table.id, order_id, "Discarding stale order hydration");
            return Ok(());
        }
        match fetched {
            Ok(detail) => {
                let (header, lines) = detail.into_parts();
                tracing::debug!(table_id = %table.id, order_id, lines = lines.len(), "Hydrated table order");
                state.cart = Cart::hydrated(committed_lines(&header.id, lines));
                state.current_order = Some(header);
                state.loading = false;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(table_id = %table.id, order_id, error = %e, "Table hydration failed");
                *state = previous;
                drop(state);
                self.fail(e)
            }
        }
    }

    /// Counter order: no table, fresh cart
    pub async fn use_counter(&self) -> ClientResult<()> {
        self.ensure_idle()?;
        self.rebind(OrderState::default()).await;
        Ok(())
    }

    async fn table_required(&self) -> bool {
        let theme = self.theme().await;
        let venue = self.venue().await;
        !is_counter_flow(theme, &venue) && self.order.read().await.table.is_none()
    }

    // ========== Cart ==========

    /// Tap on a menu item
    pub async fn add_item(&self, item: &MenuItem) -> ClientResult<AddItemOutcome> {
        self.ensure_idle()?;
        if self.is_table_loading().await {
            return self.fail(ClientError::TableLoading);
        }
        if self.table_required().await {
            self.toast(Toast::info("Select a table first"));
            return Ok(AddItemOutcome::TableRequired);
        }

        let selection = match ModifierSelection::open(self.api.as_ref(), item.clone()).await {
            Ok(selection) => selection,
            Err(e) => return self.fail(e),
        };
        if selection.is_trivial() {
            let line = self.confirm_item_with_modifiers(selection.confirm()?).await?;
            return Ok(AddItemOutcome::Added { line });
        }
        Ok(AddItemOutcome::ChooseModifiers(selection))
    }

    /// Put a resolved item into the cart; returns the line index
    pub async fn confirm_item_with_modifiers(&self, item: ItemWithModifiers) -> ClientResult<usize> {
        let line = self.editable_order().await?.cart.confirm_item(&item)?;
        tracing::debug!(item_id = %item.item.id, line, "Item added");
        Ok(line)
    }

    pub async fn update_quantity(&self, line: usize, delta: i32) -> ClientResult<()> {
        self.editable_order().await?.cart.update_quantity(line, delta)
    }

    pub async fn remove_item(&self, line: usize) -> ClientResult<OrderLine> {
        self.editable_order().await?.cart.remove_item(line)
    }

    pub async fn assign_seat(&self, line: usize, seat: u32) -> ClientResult<()> {
        self.editable_order().await?.cart.assign_seat(line, seat)
    }

    pub async fn assign_course(&self, line: usize, course: u32) -> ClientResult<()> {
        self.editable_order().await?.cart.assign_course(line, course)
    }

    pub async fn set_notes(&self, line: usize, notes: Option<String>) -> ClientResult<()> {
        self.editable_order().await?.cart.set_notes(line, notes)
    }

    pub async fn calculate_total(&self) -> OrderTotals {
        self.order.read().await.cart.totals()
    }

    // ========== Send ==========

    /// Send pending lines to the kitchen
    ///
    /// A second call while one is in flight fails with
    /// [`ClientError::SendInFlight`] without touching the network.
    pub async fn send_order(&self) -> ClientResult<SendReceipt> {
        let _guard = SendGuard::acquire(&self.sending)?;

        match self.send_pending().await {
            Ok(receipt) => {
                let message = match receipt.round_no {
                    Some(round) => format!("Order #{} sent (round {})", receipt.order_number, round),
                    None => format!("Order #{} sent", receipt.order_number),
                };
                self.toast(Toast::success(message));
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Send failed");
                self.fail(e)
            }
        }
    }

    /// Steps 1-4 of the send flow; the caller holds the guard
    async fn send_pending(&self) -> ClientResult<SendReceipt> {
        let session = self.venue().await;
        let theme = self.theme().await;
        let (table, current, pending) = {
            let state = self.order.read().await;
            if state.loading {
                return Err(ClientError::TableLoading);
            }
            (
                state.table.clone(),
                state.current_order.clone(),
                state.cart.pending_lines().cloned().collect::<Vec<_>>(),
            )
        };

        if pending.is_empty() {
            return Err(ClientError::EmptyOrder);
        }
        if table.is_none() && !is_counter_flow(theme, &session) {
            return Err(ClientError::TableRequired);
        }
        if !self.is_online() {
            return Err(ClientError::Offline);
        }

        let table_ref = table
            .as_ref()
            .map(|t| t.id.clone())
            .unwrap_or_else(|| COUNTER_TABLE.to_string());
        let idempotency_key = match &current {
            Some(order) => idempotency::key_for_order(&order.id),
            None => idempotency::key_for_new_order(&table_ref),
        };
        let user_id = session.user.id.as_str();

        let order = match current {
            Some(order) => order,
            None => {
                let request = CreateOrderRequest {
                    venue_id: session.venue.id.clone(),
                    table_id: table_ref.clone(),
                    server_id: session.user.id.clone(),
                };
                let (header, _) = self.api.create_order(&request).await?.into_parts();
                let resource = format!("order:{}", header.id);
                audit_log!(user_id, "create_order", resource.as_str(), table_ref.as_str());
                // Kept even if a later step fails, so a retry reuses it
                self.order.write().await.current_order = Some(header.clone());
                header
            }
        };

        for line in &pending {
            self.api.add_item(&order.id, &AddItemRequest::from(line)).await?;
        }

        let options = self.storage.send_options();
        let request = SendOrderRequest {
            do_print: options.do_print,
            do_kds: options.do_kds,
            do_stock: options.do_stock,
            client_send_id: idempotency::client_send_id(),
        };
        let response = self
            .api
            .send_order(&order.id, &idempotency_key, &request)
            .await?;
        let resource = format!("order:{}", order.id);
        let details = format!(
            "key={} lines={} duplicate={}",
            idempotency_key,
            pending.len(),
            response.duplicate
        );
        audit_log!(user_id, "send_order", resource.as_str(), details.as_str());

        self.order.write().await.cart.clear_pending();

        let mut round_no = response.round_no;
        let mut order_number = order.order_number.clone();
        match self.api.get_order(&order.id).await {
            Ok(detail) => {
                let (header, lines) = detail.into_parts();
                round_no = round_no.or_else(|| header.last_round().map(|r| r.round_no));
                order_number = header.order_number.clone();
                let mut state = self.order.write().await;
                state.cart.replace_lines(committed_lines(&header.id, lines));
                state.current_order = Some(header);
            }
            Err(e) => {
                tracing::warn!(order_id = %order.id, error = %e, "Order refetch after send failed");
                self.toast(Toast::warning("Order sent, but the ticket could not be refreshed"));
            }
        }
        self.refresh_tables_quietly().await;

        Ok(SendReceipt {
            order_id: order.id,
            order_number,
            round_no,
            idempotency_key,
            lines_sent: pending.len(),
            duplicate: response.duplicate,
        })
    }

    // ========== Payment ==========

    /// Take payment for the current order
    pub async fn handle_payment(&self, method: PaymentMethod) -> ClientResult<PaymentOutcome> {
        let _guard = SendGuard::acquire(&self.sending)?;

        match self.pay(method).await {
            Ok(outcome) => {
                let currency = self.venue().await.venue.currency.clone();
                let message = match &outcome {
                    PaymentOutcome::Paid { amount, .. } => {
                        format!("Paid {}", format_amount(*amount, &currency))
                    }
                    PaymentOutcome::SplitPreview { ways, per_person, .. } => format!(
                        "Split {} ways: {} each",
                        ways,
                        format_amount(*per_person, &currency)
                    ),
                };
                self.toast(Toast::success(message));
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Payment failed");
                self.fail(e)
            }
        }
    }

    async fn pay(&self, method: PaymentMethod) -> ClientResult<PaymentOutcome> {
        if let PaymentMethod::Split { ways: 0 } = method {
            return Err(ClientError::Validation("Split needs at least one guest".into()));
        }

        let session = self.venue().await;
        let theme = self.theme().await;
        let (has_lines, has_pending, has_order) = {
            let state = self.order.read().await;
            if state.loading {
                return Err(ClientError::TableLoading);
            }
            (
                !state.cart.is_empty(),
                state.cart.has_pending(),
                state.current_order.is_some(),
            )
        };

        if !has_lines && !has_order {
            return Err(ClientError::EmptyOrder);
        }
        if has_pending {
            if !is_counter_flow(theme, &session) {
                return Err(ClientError::UnsentItems);
            }
            tracing::debug!("Sending pending lines before payment");
            self.send_pending().await?;
        }
        if !self.is_online() {
            return Err(ClientError::Offline);
        }

        let order = self
            .current_order()
            .await
            .ok_or(ClientError::EmptyOrder)?;

        let eligibility = self.api.billing_eligibility(&order.id).await?;
        if !eligibility.eligible {
            return Err(ClientError::BillingBlocked {
                reason: eligibility
                    .reason
                    .unwrap_or_else(|| "Order cannot be billed yet".to_string()),
                blocking_items: eligibility.blocking_items,
            });
        }

        let total = self.calculate_total().await.total;
        let kind = match method {
            PaymentMethod::Split { ways } => {
                let per_person = split_evenly(total, ways)
                    .ok_or_else(|| ClientError::Validation("Split needs at least one guest".into()))?;
                return Ok(PaymentOutcome::SplitPreview {
                    ways,
                    per_person,
                    total,
                });
            }
            PaymentMethod::Cash => PaymentMethodKind::Cash,
            PaymentMethod::Card => PaymentMethodKind::Card,
        };

        self.api
            .close_order(
                &order.id,
                &CloseOrderRequest {
                    payment_method: kind,
                    amount: total,
                },
            )
            .await?;
        let resource = format!("order:{}", order.id);
        let details = format!("{:?} {}", kind, format_amount(total, &session.venue.currency));
        audit_log!(session.user.id.as_str(), "close_order", resource.as_str(), details.as_str());

        self.rebind(OrderState::default()).await;
        self.refresh_tables_quietly().await;

        Ok(PaymentOutcome::Paid {
            order_id: order.id,
            method: kind,
            amount: total,
        })
    }

    // ========== Rendering ==========

    /// Render the active layout from cached data only
    pub async fn render(&self) -> Screen {
        let session = self.venue().await;
        let menu = self.menu().await;
        let categories = menu.cached_categories().await;
        let items = menu.cached_items().await;
        let tables = self.table_directory().await.tables().await;
        let view = self.view.read().await.clone();
        let state = self.order.read().await.clone();
        let totals = state.cart.totals();

        let props = LayoutProps {
            venue: &session.venue,
            categories: &categories,
            items: &items,
            tables: &tables,
            selected_table: state.table.as_ref(),
            current_order: state.current_order.as_ref(),
            lines: state.cart.lines(),
            totals,
            sending: self.is_sending(),
            online: self.is_online(),
            ui: &view.ui,
        };
        LayoutRenderer::from(view.theme).render(&props)
    }

    /// Run the intent behind a rendered control
    pub async fn dispatch(&self, action: Action) -> ClientResult<ActionOutcome> {
        match action {
            Action::SelectTable { table_id } => {
                let table = self
                    .table_directory()
                    .await
                    .find(&table_id)
                    .await
                    .ok_or_else(|| ClientError::NotFound(format!("Table {}", table_id)))?;
                self.select_table(&table).await?;
            }
            Action::UseCounter => self.use_counter().await?,
            Action::SelectCategory { category_id } => self.select_category(category_id).await,
            Action::AddItem { item_id } => {
                let item = self
                    .menu()
                    .await
                    .find_item(&item_id)
                    .await
                    .ok_or_else(|| ClientError::NotFound(format!("Menu item {}", item_id)))?;
                return Ok(ActionOutcome::Item(self.add_item(&item).await?));
            }
            Action::Increment { line } => self.update_quantity(line, 1).await?,
            Action::Decrement { line } => self.update_quantity(line, -1).await?,
            Action::Remove { line } => {
                self.remove_item(line).await?;
            }
            Action::SetCourse { course } => self.set_active_course(course).await,
            Action::SetSeat { seat } => self.set_active_seat(seat).await,
            Action::AssignActiveSeat { line } => {
                let seat = self.view.read().await.ui.active_seat;
                self.assign_seat(line, seat).await?;
            }
            Action::AssignActiveCourse { line } => {
                let course = self.view.read().await.ui.active_course;
                self.assign_course(line, course).await?;
            }
            Action::ToggleKeyboard => {
                self.toggle_keyboard().await;
            }
            Action::Search { query } => self.set_search(query).await,
            Action::Send => return Ok(ActionOutcome::Sent(self.send_order().await?)),
            Action::Pay { method } => {
                return Ok(ActionOutcome::Payment(self.handle_payment(method).await?));
            }
            Action::SwitchTheme { theme } => self.set_theme(theme).await?,
        }
        Ok(ActionOutcome::Done)
    }
}
