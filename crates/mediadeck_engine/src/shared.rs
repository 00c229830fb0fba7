use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use mediadeck_core::{update, Effect, FullSnapshot, JobAction, JobId, Msg, ReconciliationStore};
use mediadeck_logging::{deck_debug, deck_warn};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::{ClientError, Clock, EventSink, SessionEvent};

struct SessionCell {
    store: ReconciliationStore,
    torn_down: bool,
}

/// State shared by the polling loops, the dispatcher and the session handle.
///
/// Every store mutation goes through [`Shared::apply`], which holds the lock
/// only for the synchronous `update` call.
pub(crate) struct Shared {
    cell: Mutex<SessionCell>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    pub(crate) token: CancellationToken,
    pub(crate) refresh: Notify,
}

impl Shared {
    pub(crate) fn new(
        store: ReconciliationStore,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            cell: Mutex::new(SessionCell {
                store,
                torn_down: false,
            }),
            clock,
            sink,
            token: CancellationToken::new(),
            refresh: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionCell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Apply one message. Returns `None` once the session is torn down.
    pub(crate) fn apply(&self, msg: Msg) -> Option<Vec<Effect>> {
        let effects = {
            let mut cell = self.lock();
            if cell.torn_down {
                return None;
            }
            let store = std::mem::take(&mut cell.store);
            let (store, effects) = update(store, msg);
            cell.store = store;
            effects
        };
        self.publish(&effects);
        Some(effects)
    }

    /// Apply a full snapshot and report it. Returns false when the session is gone.
    pub(crate) fn apply_snapshot(&self, snapshot: FullSnapshot) -> bool {
        let jobs = snapshot.jobs.len();
        let playlists = snapshot.playlists.len();
        let msg = Msg::SnapshotReceived {
            snapshot,
            now: self.now(),
        };
        if self.apply(msg).is_none() {
            return false;
        }
        deck_debug!("Applied snapshot: {} jobs, {} playlists", jobs, playlists);
        self.emit(SessionEvent::SnapshotApplied { jobs, playlists });
        true
    }

    /// Guard and optimistic mutation for a job command, under one lock.
    pub(crate) fn begin_action(&self, job_id: &JobId, action: JobAction) -> Result<(), ClientError> {
        let mut cell = self.lock();
        if cell.torn_down {
            return Err(ClientError::ShutDown);
        }
        if !cell.store.contains(job_id) {
            return Err(ClientError::UnknownJob(job_id.clone()));
        }
        let store = std::mem::take(&mut cell.store);
        let (store, _effects) = update(
            store,
            Msg::ActionIssued {
                job_id: job_id.clone(),
                action,
                now: self.clock.now(),
            },
        );
        cell.store = store;
        Ok(())
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&ReconciliationStore) -> R) -> R {
        f(&self.lock().store)
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.lock().torn_down
    }

    /// Mark the store dead and cancel every loop and in-flight action.
    pub(crate) fn tear_down(&self) {
        self.lock().torn_down = true;
        self.token.cancel();
    }

    pub(crate) fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.sink.emit(event);
    }

    fn publish(&self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::StatusAnomaly(anomaly) => {
                    deck_warn!("Status anomaly: {}", anomaly);
                    self.emit(SessionEvent::Anomaly(anomaly.clone()));
                }
                Effect::OptimisticExpired { job_id, intended } => {
                    deck_warn!(
                        "Optimistic {} for job {} was not confirmed in time; using backend status",
                        intended,
                        job_id
                    );
                    self.emit(SessionEvent::OptimisticExpired {
                        job_id: job_id.clone(),
                        intended: *intended,
                    });
                }
                Effect::CompletedHidden { batch, count } => {
                    deck_debug!("Hid {} completed jobs as {:?}", count, batch);
                }
                Effect::ProgressUpdated { job_id } => {
                    self.emit(SessionEvent::TickApplied {
                        job_id: job_id.clone(),
                    });
                }
            }
        }
    }
}
