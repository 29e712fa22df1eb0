//! Lifecycle coordinator: fast-start then background enrichment.
//!
//! The coordinator owns the driver handle, the card store, the optional
//! encoder, and the cached retrieval engine. Cards are installed by atomic
//! pointer swap; readers take a snapshot and never see partial state.
//! Enrichment failures never regress readiness: the fast-start card stays
//! active and the failure is logged into the state.

use crate::config::ServiceConfig;
use crate::state::InitState;
use chrono::Utc;
use log::{error, info, warn};
use scout_core::card::SchemaCard;
use scout_core::config::ExplorerConfig;
use scout_core::fingerprint::connection_fingerprint;
use scout_core::plan::{InitPhase, InitStatus};
use scout_db::Database;
use scout_intel::{BuildCaps, CardBuilder, CardStore, HashEncoder, RetrievalEngine, TextEncoder};
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Grace window for joining background tasks on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

struct EngineEntry {
    reflection_hash: String,
    config_fingerprint: String,
    engine: Arc<RetrievalEngine>,
}

/// Process-wide coordinator. One instance per process by contract; the
/// binary installs it into [`Coordinator::global`].
pub struct Coordinator {
    db: Arc<dyn Database>,
    explorer_config: ExplorerConfig,
    connection_fp: String,
    store: CardStore,
    encoder: Option<Arc<dyn TextEncoder>>,
    state: RwLock<InitState>,
    phase_tx: watch::Sender<InitPhase>,
    engine_cache: RwLock<Option<EngineEntry>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

static GLOBAL: OnceLock<Arc<Coordinator>> = OnceLock::new();

impl Coordinator {
    pub fn new(db: Arc<dyn Database>, config: &ServiceConfig) -> Arc<Self> {
        let explorer_config = config.explorer_config();
        let encoder: Option<Arc<dyn TextEncoder>> = if config.embeddings_enabled {
            Some(Arc::new(HashEncoder::default()))
        } else {
            None
        };
        let (phase_tx, _) = watch::channel(InitPhase::Idle);
        Arc::new(Self {
            db,
            explorer_config,
            connection_fp: connection_fingerprint(&config.database_url),
            store: CardStore::new(config.card_cache_dir.clone()),
            encoder,
            state: RwLock::new(InitState::default()),
            phase_tx,
            engine_cache: RwLock::new(None),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Install the process-wide instance. Later calls return the first.
    pub fn install_global(coordinator: Arc<Coordinator>) -> Arc<Coordinator> {
        GLOBAL.get_or_init(|| coordinator).clone()
    }

    pub fn global() -> Option<Arc<Coordinator>> {
        GLOBAL.get().cloned()
    }

    pub fn status(&self) -> InitStatus {
        self.state
            .read()
            .map(|s| s.snapshot())
            .unwrap_or_else(|_| InitState::default().snapshot())
    }

    pub fn db(&self) -> &Arc<dyn Database> {
        &self.db
    }

    pub fn explorer_config(&self) -> &ExplorerConfig {
        &self.explorer_config
    }

    /// The installed card, if the service has reached readiness.
    pub fn card(&self) -> Option<Arc<SchemaCard>> {
        self.store.get()
    }

    fn set_phase(&self, phase: InitPhase, mutate: impl FnOnce(&mut InitState)) {
        if let Ok(mut state) = self.state.write() {
            state.phase = phase;
            mutate(&mut state);
        }
        self.phase_tx.send_replace(phase);
    }

    /// Start background initialization exactly once: a fast-start build
    /// that publishes READY, then full enrichment.
    pub fn start(self: &Arc<Self>) {
        {
            let Ok(state) = self.state.read() else { return };
            match state.phase {
                InitPhase::Idle => {}
                phase => {
                    warn!("initialization already {phase:?}; not restarting");
                    return;
                }
            }
        }
        self.set_phase(InitPhase::Starting, |s| {
            s.started_at = Some(Utc::now());
        });

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            this.set_phase(InitPhase::Running, |_| {});

            // A cached card for this connection short-circuits fast start.
            let fast_card = match this.store.load_cached(&this.connection_fp) {
                Some(card) => Ok(card),
                None => {
                    let builder = CardBuilder::new(this.db.as_ref(), &this.explorer_config);
                    builder
                        .build(
                            &this.connection_fp,
                            BuildCaps::fast_start(&this.explorer_config),
                        )
                        .await
                }
            };

            match fast_card {
                Ok(card) => {
                    info!(
                        "fast-start card ready: {} tables (hash {})",
                        card.table_count(),
                        card.reflection_hash
                    );
                    this.store.put(card);
                    this.set_phase(InitPhase::Ready, |s| {
                        s.attempts += 1;
                        s.completed_at = Some(Utc::now());
                    });
                    this.spawn_enrichment();
                }
                Err(e) => {
                    error!("fast-start build failed: {e}");
                    this.set_phase(InitPhase::Failed, |s| {
                        s.attempts += 1;
                        s.completed_at = Some(Utc::now());
                        s.error_message = Some(e.to_string());
                    });
                }
            }
        });
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(handle);
        }
    }

    fn spawn_enrichment(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let builder = CardBuilder::new(this.db.as_ref(), &this.explorer_config);
            match builder.build(&this.connection_fp, BuildCaps::full()).await {
                Ok(card) => {
                    info!(
                        "enrichment complete: {} tables (hash {})",
                        card.table_count(),
                        card.reflection_hash
                    );
                    this.store.put(card);
                }
                Err(e) => {
                    // Keep serving the fast-start card.
                    warn!("enrichment failed, keeping previous card: {e}");
                    if let Ok(mut state) = this.state.write() {
                        state.error_message = Some(format!("enrichment failed: {e}"));
                    }
                }
            }
        });
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(handle);
        }
    }

    /// Wait up to `deadline` for READY. Returns false on FAILED, STOPPED,
    /// or timeout.
    pub async fn ensure_ready(&self, deadline: Duration) -> bool {
        let mut rx = self.phase_tx.subscribe();
        if matches!(*rx.borrow(), InitPhase::Ready) {
            return true;
        }
        let wait = async {
            loop {
                if rx.changed().await.is_err() {
                    return false;
                }
                match *rx.borrow() {
                    InitPhase::Ready => return true,
                    InitPhase::Failed | InitPhase::Stopped => return false,
                    _ => {}
                }
            }
        };
        tokio::time::timeout(deadline, wait).await.unwrap_or(false)
    }

    /// The retrieval engine for the installed card, rebuilt only when the
    /// reflection hash or the planner-relevant config changes.
    pub fn engine(&self) -> Option<(Arc<SchemaCard>, Arc<RetrievalEngine>)> {
        let card = self.store.get()?;
        let config_fp = self.explorer_config.planner_fingerprint();

        if let Ok(cache) = self.engine_cache.read() {
            if let Some(entry) = cache.as_ref() {
                if entry.reflection_hash == card.reflection_hash
                    && entry.config_fingerprint == config_fp
                {
                    return Some((card, Arc::clone(&entry.engine)));
                }
            }
        }

        let engine = Arc::new(RetrievalEngine::build(
            Arc::clone(&card),
            self.encoder.clone(),
            &self.explorer_config,
        ));
        if let Ok(mut cache) = self.engine_cache.write() {
            *cache = Some(EngineEntry {
                reflection_hash: card.reflection_hash.clone(),
                config_fingerprint: config_fp,
                engine: Arc::clone(&engine),
            });
        }
        Some((card, engine))
    }

    /// Transition to STOPPED and join background tasks within the grace
    /// window, aborting stragglers.
    pub async fn shutdown(&self) {
        self.set_phase(InitPhase::Stopped, |_| {});
        let handles: Vec<JoinHandle<()>> = match self.tasks.lock() {
            Ok(mut tasks) => tasks.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for mut handle in handles {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
                warn!("background task did not finish within grace window; aborting");
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
