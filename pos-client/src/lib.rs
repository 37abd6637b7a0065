//! POS Client - order composition core of a restaurant point of sale
//!
//! Cart, table binding, idempotent send to kitchen, payment and per-venue
//! layout selection over the POS REST API.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod idempotency;
pub mod layout;
pub mod logger;
pub mod modifier;
pub mod poller;
pub mod session;
pub mod storage;
pub mod theme;
pub mod toast;
pub mod venue;

pub use api::{PosApi, RestPosApi};
pub use cart::Cart;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use crate::http::{HttpClient, NetworkHttpClient};
pub use layout::{Action, LayoutRenderer, Panel, RenderLayout, Screen};
pub use modifier::{ItemWithModifiers, ModifierSelection};
pub use poller::MenuVersionPoller;
pub use session::{
    ActionOutcome, AddItemOutcome, PaymentMethod, PaymentOutcome, PosSession, SendReceipt,
};
pub use storage::{ClientStorage, SendOptions};
pub use theme::{PosTheme, ThemeInfo, ThemeLayer};
pub use toast::{Toast, ToastLevel};
pub use venue::VenueSession;

// Re-export shared types for convenience
pub use shared::client::UserInfo;
pub use shared::{Decimal, OrderTotals};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A wired terminal: the session and its background menu poller
pub struct PosClient {
    pub session: Arc<PosSession>,
    pub poller: Arc<MenuVersionPoller>,
    shutdown: CancellationToken,
}

impl PosClient {
    /// Stop background tasks; the session itself stays usable
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Wire a terminal from configuration: REST API, storage file, venue,
/// tables, menu and the menu-version poller at `menu_poll_secs`
pub async fn bootstrap(config: &ClientConfig, user: UserInfo) -> ClientResult<PosClient> {
    let api: Arc<dyn PosApi> = Arc::new(RestPosApi::new(config.build_http_client()?));
    let storage = Arc::new(ClientStorage::open(config.storage_path())?);

    let venue = VenueSession::load(api.as_ref(), &storage, user).await?;
    let session = Arc::new(PosSession::new(api, storage, venue));
    session.refresh_tables().await?;
    session.load_menu().await?;

    let shutdown = CancellationToken::new();
    let poller = session
        .spawn_menu_poller(config.menu_poll_interval(), shutdown.clone())
        .await;
    Ok(PosClient {
        session,
        poller,
        shutdown,
    })
}
