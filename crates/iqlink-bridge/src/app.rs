//! Connection orchestration and the inbound command surface.
//!
//! Bring-up runs off the caller's critical path: probe the daemon
//! prerequisite, then connect Admin, Quote, and Historical in order
//! with settling delays between stages. A failed stage is logged and
//! never aborts the others; `Registered` arrives later, asynchronously,
//! through the admin handshake.

use crate::config::AppConfig;
use iqlink_core::{BarRequest, Basket, Feature, Security};
use iqlink_feed::{
    AdminHandler, AdminSettings, EventSender, HistoryClient, HistoryHandler, PendingRequests,
    QuoteHandler, RequestIdAllocator,
};
use iqlink_net::{ChannelHandle, ChannelState, TcpChannel};
use iqlink_registry::SubscriptionRegistry;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// How long the reachability probe waits for the daemon.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// The protocol engine: three feed channels plus shared state.
pub struct Bridge {
    config: AppConfig,
    registry: Arc<SubscriptionRegistry>,
    ids: Arc<RequestIdAllocator>,
    pending: PendingRequests,
    events: EventSender,
    shutdown: CancellationToken,
    admin: RwLock<Option<ChannelHandle>>,
    quote: RwLock<Option<ChannelHandle>>,
    history: RwLock<Option<HistoryClient>>,
}

impl Bridge {
    pub fn new(config: AppConfig, events: EventSender) -> Self {
        Self {
            config,
            registry: Arc::new(SubscriptionRegistry::new()),
            ids: Arc::new(RequestIdAllocator::new()),
            pending: PendingRequests::default(),
            events,
            shutdown: CancellationToken::new(),
            admin: RwLock::new(None),
            quote: RwLock::new(None),
            history: RwLock::new(None),
        }
    }

    /// Begin channel bring-up without blocking the caller.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.bring_up().await })
    }

    async fn bring_up(&self) {
        let settle = Duration::from_millis(self.config.feed.settle_ms);
        let host = self.config.feed.host.clone();

        // The daemon's process lifecycle is managed externally; all the
        // bridge verifies is that something answers on the admin port.
        if !daemon_reachable(&host, self.config.feed.admin_port).await {
            warn!(
                host = %host,
                port = self.config.feed.admin_port,
                "Feed daemon not reachable; attempting bring-up anyway"
            );
        }
        tokio::time::sleep(settle).await;

        match TcpChannel::connect(
            "admin",
            &host,
            self.config.feed.admin_port,
            self.shutdown.child_token(),
        )
        .await
        {
            Ok((channel, handle)) => {
                let handler =
                    AdminHandler::new(self.admin_settings(), handle.clone(), self.events.clone());
                *self.admin.write() = Some(handle);
                tokio::spawn(channel.run(handler));
            }
            Err(e) => error!(error = %e, "Admin channel bring-up failed"),
        }
        tokio::time::sleep(settle).await;

        match TcpChannel::connect(
            "quote",
            &host,
            self.config.feed.quote_port,
            self.shutdown.child_token(),
        )
        .await
        {
            Ok((channel, handle)) => {
                let handler = QuoteHandler::new(self.registry.clone(), self.events.clone());
                *self.quote.write() = Some(handle);
                tokio::spawn(channel.run(handler));
                for symbol in self.config.symbols.clone() {
                    self.subscribe(&symbol);
                }
            }
            Err(e) => error!(error = %e, "Quote channel bring-up failed"),
        }
        tokio::time::sleep(settle).await;

        match TcpChannel::connect(
            "history",
            &host,
            self.config.feed.lookup_port,
            self.shutdown.child_token(),
        )
        .await
        {
            Ok((channel, handle)) => {
                let handler = HistoryHandler::new(self.pending.clone(), self.events.clone());
                *self.history.write() =
                    Some(HistoryClient::new(self.ids.clone(), self.pending.clone(), handle));
                tokio::spawn(channel.run(handler));
            }
            Err(e) => error!(error = %e, "Historical channel bring-up failed"),
        }

        info!("Channel bring-up finished");
    }

    fn admin_settings(&self) -> AdminSettings {
        AdminSettings {
            app_name: self.config.credentials.app_name.clone(),
            app_version: self.config.credentials.app_version.clone(),
            login_id: self.config.credentials.login_id.clone(),
            password: self.config.credentials.password.clone(),
        }
    }

    /// Watch a symbol on the live feed.
    ///
    /// Idempotent: re-subscribing an existing symbol allocates no new
    /// slot and sends nothing, so the watch command goes out at most
    /// once per symbol.
    pub fn subscribe(&self, symbol: &str) {
        let security = Security::stock(symbol);
        if security.symbol.is_empty() {
            return;
        }

        let outcome = self.registry.add(security.clone());
        if !outcome.newly_added {
            return;
        }
        match &*self.quote.read() {
            Some(handle) => handle.send(format!("w{}\r\n", security.symbol)),
            None => warn!(symbol = %security.symbol, "Quote channel down; watch not sent"),
        }
    }

    /// Subscribe every basket member not already watched.
    pub fn subscribe_basket(&self, basket: &Basket) {
        for security in basket {
            self.subscribe(&security.symbol);
        }
    }

    /// Issue a historical bar request.
    ///
    /// Returns the correlation id, or `None` when the historical
    /// channel is down. A sent request cannot be withdrawn; its
    /// responses can only be ignored by the caller.
    pub fn request_bars(&self, request: &BarRequest) -> Option<u32> {
        match &*self.history.read() {
            Some(client) => Some(client.request_bars(request)),
            None => {
                warn!(symbol = %request.symbol, "Historical channel down; bar request dropped");
                None
            }
        }
    }

    /// Latest feed-reported day-high for a watched symbol.
    pub fn day_high(&self, symbol: &str) -> Option<Decimal> {
        self.registry.day_high(symbol)
    }

    /// Latest feed-reported day-low for a watched symbol.
    pub fn day_low(&self, symbol: &str) -> Option<Decimal> {
        self.registry.day_low(symbol)
    }

    /// Snapshot of the watched instruments in subscription order.
    pub fn basket(&self) -> Basket {
        self.registry.basket()
    }

    /// Capabilities answerable to downstream clients.
    pub fn features(&self) -> &'static [Feature] {
        Feature::supported()
    }

    /// True once the admin handshake has registered this client.
    pub fn is_connected(&self) -> bool {
        self.admin
            .read()
            .as_ref()
            .map(|handle| handle.state() == ChannelState::Registered)
            .unwrap_or(false)
    }

    /// Stop all channels.
    pub fn shutdown(&self) {
        info!("Bridge shutdown requested");
        self.shutdown.cancel();
    }
}

/// Prerequisite probe: is the daemon accepting connections on its
/// admin port?
async fn daemon_reachable(host: &str, port: u16) -> bool {
    matches!(
        tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await,
        Ok(Ok(_))
    )
}
