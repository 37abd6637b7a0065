//! Menu version poller
//!
//! Periodically reads the venue's active config version and drops the menu
//! cache when it moves. Polling only happens while the host is visible; when
//! visibility comes back a check runs right away and the ticker restarts.

use crate::ClientResult;
use crate::api::PosApi;
use crate::catalog::MenuCatalog;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Default poll period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Menu version poller
pub struct MenuVersionPoller {
    api: Arc<dyn PosApi>,
    catalog: Arc<MenuCatalog>,
    period: Duration,
    visible: watch::Sender<bool>,
    version: watch::Sender<Option<i64>>,
}

impl MenuVersionPoller {
    pub fn new(api: Arc<dyn PosApi>, catalog: Arc<MenuCatalog>, period: Duration) -> Self {
        Self {
            api,
            catalog,
            period,
            visible: watch::Sender::new(true),
            version: watch::Sender::new(None),
        }
    }

    /// Host visibility (document visible / app in foreground)
    pub fn set_visible(&self, visible: bool) {
        self.visible.send_if_modified(|current| {
            let changed = *current != visible;
            *current = visible;
            changed
        });
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }

    /// Last seen version (None until the first successful check)
    pub fn subscribe_version(&self) -> watch::Receiver<Option<i64>> {
        self.version.subscribe()
    }

    pub fn current_version(&self) -> Option<i64> {
        *self.version.borrow()
    }

    /// One poll; returns `true` when the version moved and the menu was invalidated
    ///
    /// The first observed version only primes the watcher.
    pub async fn check_once(&self) -> ClientResult<bool> {
        let remote = self
            .api
            .active_config_version(self.catalog.venue_id())
            .await?
            .version;
        let previous = *self.version.borrow();

        match previous {
            Some(known) if known == remote => Ok(false),
            Some(known) => {
                tracing::info!(
                    venue_id = %self.catalog.venue_id(),
                    from = known,
                    to = remote,
                    "Menu version changed"
                );
                self.catalog.invalidate().await;
                self.version.send_replace(Some(remote));
                Ok(true)
            }
            None => {
                tracing::debug!(version = remote, "Menu version primed");
                self.version.send_replace(Some(remote));
                Ok(false)
            }
        }
    }

    async fn check_logged(&self) {
        if let Err(e) = self.check_once().await {
            tracing::warn!(error = %e, "Menu version check failed");
        }
    }

    /// Poll until `cancel` fires
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut visible_rx = self.visible.subscribe();

        tracing::info!(period_secs = self.period.as_secs(), "Menu version poller started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if *visible_rx.borrow() {
                        self.check_logged().await;
                    }
                }
                changed = visible_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let visible = *visible_rx.borrow_and_update();
                    if visible {
                        tracing::debug!("Host visible again, checking menu version");
                        self.check_logged().await;
                        ticker.reset();
                    }
                }
            }
        }

        tracing::info!("Menu version poller stopped");
    }
}
