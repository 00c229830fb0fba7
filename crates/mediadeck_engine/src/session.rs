use std::sync::Arc;

use mediadeck_core::{QueueView, ReconciliationStore};
use mediadeck_logging::{deck_info, deck_warn};
use tokio::task::JoinHandle;

use crate::scheduler::{self, PollSettings};
use crate::shared::Shared;
use crate::{
    ActionDispatcher, Backend, ClientConfig, ClientError, Clock, EventSink, ReqwestBackend,
    SystemClock,
};

/// A running client: the store, both polling loops and the dispatcher.
///
/// Must be started from within a tokio runtime.
pub struct ClientSession {
    shared: Arc<Shared>,
    dispatcher: ActionDispatcher,
    tasks: Vec<JoinHandle<()>>,
}

impl ClientSession {
    /// Start a session against the HTTP backend described by `config`.
    pub fn connect(config: &ClientConfig, sink: Arc<dyn EventSink>) -> Result<Self, ClientError> {
        let backend = ReqwestBackend::new(config)?;
        deck_info!("Connecting to {}", backend.base_url());
        Ok(Self::start(config, Arc::new(backend), sink))
    }

    pub fn start(
        config: &ClientConfig,
        backend: Arc<dyn Backend>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self::start_with_clock(config, backend, sink, Arc::new(SystemClock))
    }

    pub fn start_with_clock(
        config: &ClientConfig,
        backend: Arc<dyn Backend>,
        sink: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = ReconciliationStore::with_optimistic_window(config.optimistic_window);
        let shared = Arc::new(Shared::new(store, clock, sink));
        let tasks = scheduler::spawn(shared.clone(), backend.clone(), PollSettings::from(config));
        let dispatcher = ActionDispatcher::new(shared.clone(), backend);
        Self {
            shared,
            dispatcher,
            tasks,
        }
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    /// Current projection of the store.
    pub fn view(&self) -> QueueView {
        self.shared.read(ReconciliationStore::view)
    }

    pub fn snapshots_applied(&self) -> u64 {
        self.shared.read(ReconciliationStore::snapshots_applied)
    }

    /// Ask for a full refresh now. Coalesces with any refresh already requested.
    pub fn refresh_now(&self) {
        self.shared.request_refresh();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.is_torn_down()
    }

    /// Stop both loops and every in-flight action, then wait for the loops to exit.
    pub async fn shutdown(mut self) {
        self.shared.tear_down();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(err) = task.await {
                deck_warn!("Polling task ended abnormally: {}", err);
            }
        }
        deck_info!("Session shut down");
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.shared.tear_down();
    }
}
