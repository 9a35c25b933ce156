//! Application wiring and run loop.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::service::DashboardService;
use fishdash_api::ApiClient;
use fishdash_cache::QueryCache;
use fishdash_realtime::RealtimeService;
use fishdash_store::{AppStore, StoreEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Owns every long-lived component. Constructing it loads persisted
/// preferences but opens no connections; `run()` does the work.
pub struct Application {
    store: AppStore,
    service: DashboardService,
    realtime: Arc<RealtimeService>,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = AppStore::with_persistence(&config.state_dir);
        let cache = QueryCache::new();
        let api = Arc::new(ApiClient::new(&config.api_base_url)?);

        let service = DashboardService::new(
            api,
            cache.clone(),
            store.clone(),
            config.stale_times.clone(),
        );
        let realtime = RealtimeService::new(config.realtime.clone(), cache, store.clone());

        Ok(Self {
            store,
            service,
            realtime,
        })
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn service(&self) -> &DashboardService {
        &self.service
    }

    /// Run until ctrl-c: keep the realtime connection matched to the
    /// store's toggle and prune expired notifications once a second.
    pub async fn run(&self) -> AppResult<()> {
        if self.store.real_time_enabled() {
            self.realtime.start();
        }

        let mut events = self.store.subscribe();
        let mut prune = tokio::time::interval(Duration::from_secs(1));
        prune.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(err) = result {
                        warn!(error = %err, "ctrl-c handler failed");
                    }
                    info!("shutdown requested");
                    break;
                }

                event = events.recv() => {
                    match event {
                        Ok(StoreEvent::RealTimeToggled(true)) => self.realtime.start(),
                        Ok(StoreEvent::RealTimeToggled(false)) => self.realtime.stop().await,
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "store event stream lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }

                _ = prune.tick() => {
                    let now = chrono::Utc::now().timestamp_millis();
                    let removed = self.store.prune_expired_notifications(now);
                    if removed > 0 {
                        debug!(removed, "pruned expired notifications");
                    }
                }
            }
        }

        self.realtime.stop().await;
        Ok(())
    }
}
