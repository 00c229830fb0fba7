use std::sync::Arc;

use mediadeck_core::{Effect, JobAction, JobId, MediaInfo, Msg};
use mediadeck_logging::{deck_info, deck_warn};

use crate::decode::{decode_ack, decode_media_info, rejection};
use crate::shared::Shared;
use crate::{Acknowledgement, ApiRequest, ApiResponse, Backend, ClientError, Command, SessionEvent};

/// Issues user commands against the backend.
///
/// Job commands update the store optimistically before the request leaves,
/// roll back if the backend refuses, and trigger a full refresh on success.
#[derive(Clone)]
pub struct ActionDispatcher {
    shared: Arc<Shared>,
    backend: Arc<dyn Backend>,
}

impl ActionDispatcher {
    pub(crate) fn new(shared: Arc<Shared>, backend: Arc<dyn Backend>) -> Self {
        Self { shared, backend }
    }

    /// Fetch video or playlist metadata without queueing anything.
    pub async fn analyze(&self, url: &str) -> Result<MediaInfo, ClientError> {
        let url = required_url(url)?;
        let command = Command::Analyze { url: url.clone() };
        let result = self
            .send(ApiRequest::ExtractInfo { url })
            .await
            .and_then(|response| {
                if !response.is_success() {
                    return Err(rejection(&response));
                }
                Ok(decode_media_info(&response.body)?)
            });
        match &result {
            Ok(info) => self.succeeded(command, Some(info.title().to_string())),
            Err(err) => self.failed(command, err),
        }
        result
    }

    /// Queue a URL. `format_or_quality` is sent as both format id and quality.
    pub async fn add_download(
        &self,
        url: &str,
        format_or_quality: &str,
    ) -> Result<Acknowledgement, ClientError> {
        let url = required_url(url)?;
        let selector = match format_or_quality.trim() {
            "" => "best".to_string(),
            other => other.to_string(),
        };
        let command = Command::AddDownload { url: url.clone() };
        let request = ApiRequest::AddDownload {
            url,
            format_id: selector.clone(),
            quality: selector,
        };

        let result = self
            .send(request)
            .await
            .and_then(|response| decode_ack(&response));
        self.finish(command, result)
    }

    pub async fn pause(&self, job_id: &JobId) -> Result<Acknowledgement, ClientError> {
        self.job_action(job_id, JobAction::Pause).await
    }

    pub async fn resume(&self, job_id: &JobId) -> Result<Acknowledgement, ClientError> {
        self.job_action(job_id, JobAction::Resume).await
    }

    pub async fn cancel(&self, job_id: &JobId) -> Result<Acknowledgement, ClientError> {
        self.job_action(job_id, JobAction::Cancel).await
    }

    pub async fn job_action(
        &self,
        job_id: &JobId,
        action: JobAction,
    ) -> Result<Acknowledgement, ClientError> {
        self.shared.begin_action(job_id, action)?;
        let command = Command::Job {
            job_id: job_id.clone(),
            action,
        };

        let result = self
            .send(ApiRequest::for_action(action, job_id.clone()))
            .await
            .and_then(|response| decode_ack(&response));
        if result.is_err() {
            self.shared.apply(Msg::ActionFailed {
                job_id: job_id.clone(),
                action,
            });
        }
        self.finish(command, result)
    }

    /// Remove completed jobs, hiding them locally until the backend confirms.
    pub async fn clear_completed(&self) -> Result<Acknowledgement, ClientError> {
        let now = self.shared.now();
        let Some(effects) = self.shared.apply(Msg::ClearCompletedIssued { now }) else {
            return Err(ClientError::ShutDown);
        };
        let batch = effects.iter().find_map(|effect| match effect {
            Effect::CompletedHidden { batch, .. } => Some(*batch),
            _ => None,
        });

        let result = self
            .send(ApiRequest::ClearCompleted)
            .await
            .and_then(|response| decode_ack(&response));
        if let (Err(_), Some(batch)) = (&result, batch) {
            self.shared.apply(Msg::ClearCompletedFailed { batch });
        }
        self.finish(Command::ClearCompleted, result)
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        if self.shared.token.is_cancelled() {
            return Err(ClientError::ShutDown);
        }
        deck_info!("Sending {}", request);
        let response = tokio::select! {
            biased;
            _ = self.shared.token.cancelled() => return Err(ClientError::ShutDown),
            response = self.backend.send(&request) => response?,
        };
        if self.shared.token.is_cancelled() {
            return Err(ClientError::ShutDown);
        }
        Ok(response)
    }

    fn finish(
        &self,
        command: Command,
        result: Result<Acknowledgement, ClientError>,
    ) -> Result<Acknowledgement, ClientError> {
        match &result {
            Ok(ack) => {
                self.succeeded(command, ack.message.clone());
                self.shared.request_refresh();
            }
            Err(err) => self.failed(command, err),
        }
        result
    }

    fn succeeded(&self, command: Command, message: Option<String>) {
        deck_info!("{} succeeded", command);
        self.shared
            .emit(SessionEvent::ActionSucceeded { command, message });
    }

    fn failed(&self, command: Command, err: &ClientError) {
        deck_warn!("{} failed: {}", command, err);
        self.shared.emit(SessionEvent::ActionFailed {
            command,
            reason: err.to_string(),
        });
    }
}

fn required_url(url: &str) -> Result<String, ClientError> {
    match url.trim() {
        "" => Err(ClientError::InvalidRequest("URL is required".to_string())),
        trimmed => Ok(trimmed.to_string()),
    }
}
