//! Connection lifecycle: connect, heartbeat, reconnect with backoff.

use crate::config::{backoff_delay, RealtimeConfig};
use crate::dispatch::dispatch_update;
use crate::error::{RealtimeError, RealtimeResult};
use fishdash_cache::QueryCache;
use fishdash_core::{ConnectionStatus, Notification, NotificationKind, RealTimeUpdate};
use fishdash_store::AppStore;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Heartbeat frame sent while connected.
const PING_FRAME: &str = r#"{"type":"ping"}"#;

/// Delay between force-close and fresh connect on manual reconnect.
const MANUAL_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// How long the give-up notification stays on screen.
const FATAL_NOTIFICATION_MS: u64 = 10_000;

/// Owns the push connection. Create with [`RealtimeService::new`], then
/// `start()`/`stop()` explicitly; constructing the service has no side
/// effects.
pub struct RealtimeService {
    config: RealtimeConfig,
    cache: Arc<QueryCache>,
    store: AppStore,
    shutdown: Mutex<Option<CancellationToken>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RealtimeService {
    pub fn new(config: RealtimeConfig, cache: Arc<QueryCache>, store: AppStore) -> Arc<Self> {
        Arc::new(Self {
            config,
            cache,
            store,
            shutdown: Mutex::new(None),
            task: Mutex::new(None),
        })
    }

    /// Spawn the connection loop. No-op when already running.
    pub fn start(self: &Arc<Self>) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            debug!("realtime service already running");
            return;
        }

        let token = CancellationToken::new();
        *self.shutdown.lock() = Some(token.clone());

        let service = Arc::clone(self);
        *task = Some(tokio::spawn(async move {
            service.run_loop(token).await;
        }));
    }

    /// Cancel any pending reconnect timer, close the socket with a normal
    /// closure, and wait for the loop to exit. Never auto-reconnects.
    pub async fn stop(&self) {
        let token = self.shutdown.lock().take();
        if let Some(token) = token {
            token.cancel();
        }
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(error = %err, "realtime task panicked during stop");
            }
        }
        self.store
            .set_connection_status(ConnectionStatus::Disconnected);
    }

    /// Force-close and reconnect after a short fixed delay, with backoff
    /// state reset.
    pub async fn reconnect(self: &Arc<Self>) {
        info!("manual reconnect requested");
        self.stop().await;
        tokio::time::sleep(MANUAL_RECONNECT_DELAY).await;
        self.start();
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    async fn run_loop(self: Arc<Self>, token: CancellationToken) {
        let mut attempts = 0u32;

        loop {
            if token.is_cancelled() {
                break;
            }

            match self.run_connection(&token, &mut attempts).await {
                Ok(()) => {
                    // Intentional close (stop() or server close 1000).
                    info!("realtime connection closed");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, attempts, "realtime connection lost");
                }
            }

            if token.is_cancelled() {
                break;
            }

            if attempts >= self.config.max_reconnect_attempts {
                error!(attempts, "max reconnection attempts reached, giving up");
                self.store.add_notification(
                    Notification::new(NotificationKind::Error, "Connection Lost")
                        .with_message(
                            "Unable to restore real-time updates. Please refresh the page.",
                        )
                        .with_duration_ms(FATAL_NOTIFICATION_MS),
                );
                break;
            }

            self.store
                .set_connection_status(ConnectionStatus::Reconnecting);
            let delay = backoff_delay(&self.config, attempts);
            attempts += 1;
            info!(attempts, delay_ms = delay.as_millis() as u64, "reconnecting");

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                () = token.cancelled() => break,
            }
        }

        self.store
            .set_connection_status(ConnectionStatus::Disconnected);
    }

    async fn run_connection(
        &self,
        token: &CancellationToken,
        attempts: &mut u32,
    ) -> RealtimeResult<()> {
        info!(url = %self.config.url, "connecting to realtime feed");
        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        self.store.set_connection_status(ConnectionStatus::Connected);
        *attempts = 0;
        info!("realtime feed connected");

        let mut heartbeat =
            tokio::time::interval(Duration::from_millis(self.config.heartbeat_interval_ms));
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so the first ping
        // goes out one full interval after connect.
        heartbeat.tick().await;

        loop {
            tokio::select! {
                () = token.cancelled() => {
                    info!("stop requested, closing realtime feed");
                    let close = CloseFrame {
                        code: CloseCode::Normal,
                        reason: "client shutdown".into(),
                    };
                    if let Err(err) = write.send(Message::Close(Some(close))).await {
                        warn!(error = %err, "failed to send close frame");
                    }
                    return Ok(());
                }

                frame = read.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_frame(&text);
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Pong(_))) => {
                            debug!("received pong");
                        }
                        Some(Ok(Message::Close(frame))) => {
                            let (code, reason) = frame
                                .map(|f| (u16::from(f.code), f.reason.to_string()))
                                .unwrap_or((1000, "normal close".to_string()));
                            if code == 1000 {
                                info!(%reason, "server closed connection normally");
                                return Ok(());
                            }
                            warn!(code, %reason, "server closed connection");
                            return Err(RealtimeError::ConnectionClosed { code, reason });
                        }
                        Some(Err(err)) => {
                            error!(error = %err, "realtime read error");
                            return Err(err.into());
                        }
                        None => {
                            warn!("realtime stream ended");
                            return Err(RealtimeError::ConnectionClosed {
                                code: 1006,
                                reason: "stream ended".to_string(),
                            });
                        }
                        _ => {}
                    }
                }

                _ = heartbeat.tick() => {
                    write.send(Message::Text(PING_FRAME.to_string())).await?;
                    debug!("sent heartbeat ping");
                }
            }
        }
    }

    /// Decode and dispatch one inbound frame. Malformed frames are logged
    /// and dropped; they never tear down the connection.
    pub(crate) fn handle_frame(&self, text: &str) {
        // Heartbeat replies arrive on the same channel as updates.
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
            if value.get("type").and_then(|t| t.as_str()) == Some("pong") {
                debug!("heartbeat pong");
                return;
            }
        }

        match RealTimeUpdate::decode(text) {
            Ok(update) => {
                self.store.record_update(update.tag());
                dispatch_update(&update, &self.cache, &self.store);
            }
            Err(err) => {
                warn!(error = %err, "dropping malformed realtime frame");
            }
        }
    }
}
