use std::sync::Arc;
use std::time::Duration;

use mediadeck_core::{FullSnapshot, Msg};
use mediadeck_logging::{deck_debug, deck_info, deck_warn, next_poll_cycle};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::decode::{decode_full_snapshot, decode_progress, ProgressPoll};
use crate::shared::Shared;
use crate::{
    ApiRequest, Backend, ClientConfig, ClientError, FailureKind, PollKind, SessionEvent,
    TransportError,
};

/// Pacing of the two polling loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub full_refresh_interval: Duration,
    pub progress_interval: Duration,
    pub backoff_step: Duration,
    pub backoff_ceiling: Duration,
}

impl From<&ClientConfig> for PollSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            full_refresh_interval: config.full_refresh_interval,
            progress_interval: config.progress_interval,
            backoff_step: config.backoff_step,
            backoff_ceiling: config.backoff_ceiling,
        }
    }
}

/// Extra delay after consecutive poll failures: one step, doubling, capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    step: Duration,
    ceiling: Duration,
    failures: u32,
}

impl Backoff {
    pub fn new(step: Duration, ceiling: Duration) -> Self {
        Self {
            step,
            ceiling,
            failures: 0,
        }
    }

    /// Count one failure and return the delay to add before the next poll.
    pub fn record_failure(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        self.penalty()
    }

    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn penalty(&self) -> Duration {
        if self.failures == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(self.failures - 1).unwrap_or(u32::MAX);
        self.step.saturating_mul(factor).min(self.ceiling)
    }
}

pub(crate) fn spawn(
    shared: Arc<Shared>,
    backend: Arc<dyn Backend>,
    settings: PollSettings,
) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(full_refresh_loop(shared.clone(), backend.clone(), settings)),
        tokio::spawn(progress_loop(shared, backend, settings)),
    ]
}

async fn full_refresh_loop(shared: Arc<Shared>, backend: Arc<dyn Backend>, settings: PollSettings) {
    let mut interval = tokio::time::interval(settings.full_refresh_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut backoff = Backoff::new(settings.backoff_step, settings.backoff_ceiling);

    loop {
        tokio::select! {
            biased;
            _ = shared.token.cancelled() => break,
            _ = shared.refresh.notified() => {
                deck_debug!("Refresh requested");
                interval.reset();
            }
            _ = interval.tick() => {}
        }

        next_poll_cycle();
        let outcome = tokio::select! {
            biased;
            _ = shared.token.cancelled() => break,
            outcome = fetch_snapshot(backend.as_ref()) => outcome,
        };
        if shared.token.is_cancelled() {
            break;
        }

        match outcome {
            Ok(snapshot) => {
                backoff.reset();
                if !shared.apply_snapshot(snapshot) {
                    break;
                }
            }
            Err(err) => {
                let penalty = backoff.record_failure();
                report_failure(&shared, PollKind::FullRefresh, &err, penalty);
                if !pause(&shared, penalty).await {
                    break;
                }
            }
        }
    }
    deck_info!("Full refresh loop stopped");
}

async fn progress_loop(shared: Arc<Shared>, backend: Arc<dyn Backend>, settings: PollSettings) {
    let mut interval = tokio::time::interval(settings.progress_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut backoff = Backoff::new(settings.backoff_step, settings.backoff_ceiling);

    loop {
        tokio::select! {
            biased;
            _ = shared.token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = shared.token.cancelled() => break,
            outcome = fetch_progress(backend.as_ref()) => outcome,
        };
        if shared.token.is_cancelled() {
            break;
        }

        match outcome {
            Ok(ProgressPoll::Update(tick)) => {
                backoff.reset();
                if shared.apply(Msg::TickReceived(tick)).is_none() {
                    break;
                }
            }
            Ok(ProgressPoll::Heartbeat) => backoff.reset(),
            Ok(ProgressPoll::BackendError(message)) => {
                backoff.reset();
                deck_debug!("Progress endpoint reported an error: {}", message);
            }
            Err(err) => {
                let penalty = backoff.record_failure();
                report_failure(&shared, PollKind::Progress, &err, penalty);
                if !pause(&shared, penalty).await {
                    break;
                }
            }
        }
    }
    deck_info!("Progress loop stopped");
}

async fn fetch_snapshot(backend: &dyn Backend) -> Result<FullSnapshot, ClientError> {
    let response = backend.send(&ApiRequest::Downloads).await?;
    if !response.is_success() {
        return Err(http_status(response.status).into());
    }
    Ok(decode_full_snapshot(&response.body)?)
}

async fn fetch_progress(backend: &dyn Backend) -> Result<ProgressPoll, ClientError> {
    let response = backend.send(&ApiRequest::Progress).await?;
    match decode_progress(&response.body) {
        Ok(poll @ ProgressPoll::BackendError(_)) => Ok(poll),
        _ if !response.is_success() => Err(http_status(response.status).into()),
        decoded => decoded.map_err(ClientError::from),
    }
}

fn http_status(status: u16) -> TransportError {
    TransportError::new(FailureKind::HttpStatus(status), format!("backend answered {status}"))
}

fn report_failure(shared: &Shared, kind: PollKind, err: &ClientError, penalty: Duration) {
    deck_warn!("{} poll failed: {}; backing off {:?}", kind, err, penalty);
    shared.emit(SessionEvent::PollFailed {
        kind,
        reason: err.to_string(),
        retry_penalty_ms: u64::try_from(penalty.as_millis()).unwrap_or(u64::MAX),
    });
}

/// Sleep for the back-off penalty. Returns false if cancelled meanwhile.
async fn pause(shared: &Shared, penalty: Duration) -> bool {
    if penalty.is_zero() {
        return true;
    }
    tokio::select! {
        biased;
        _ = shared.token.cancelled() => false,
        _ = tokio::time::sleep(penalty) => true,
    }
}
