//! Estimation job client: submit, poll until the result is ready, and
//! download the zip archive of spreadsheets and graphs.
//!
//! The server computes reliability estimates asynchronously; the only
//! progress interface is a result endpoint that answers "ready" /
//! "still running" / "unknown uid".  The client polls it at a fixed
//! interval until one of the terminal answers arrives or the caller
//! cancels.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use tetres_core::estimation::EstimationRequestInfo;
use tetres_core::{CoreError, DbId};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::events::JobEvent;
use crate::http::{FormData, HttpGateway};
use crate::protocol::{ResultStatus, UidPayload};
use crate::urls::ApiUrls;

/// Broadcast channel capacity for job progress events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors from the estimation workflow.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    /// Client-side request validation failed before submission.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// A transport or envelope error from the HTTP layer.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server rejected the job (bad request or unknown uid).
    #[error("Estimation rejected: {0}")]
    Rejected(String),

    /// The caller cancelled while waiting for the result.
    #[error("Estimation job {0} cancelled")]
    Cancelled(String),

    /// Writing or extracting the result archive failed.
    #[error("Result I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The downloaded archive could not be read.
    #[error("Result archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The blocking extraction task died.
    #[error("Extraction task failed: {0}")]
    Extract(String),
}

/// Client for long-running estimation jobs.
pub struct EstimationClient {
    gateway: Arc<HttpGateway>,
    urls: ApiUrls,
    results_dir: PathBuf,
    poll_interval: std::time::Duration,
    events: broadcast::Sender<JobEvent>,
}

impl EstimationClient {
    pub fn new(gateway: Arc<HttpGateway>, urls: ApiUrls, config: &ClientConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            gateway,
            urls,
            results_dir: config.results_dir(),
            poll_interval: config.poll_interval(),
            events,
        }
    }

    /// Subscribe to job progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    /// Submit a job for the given reliability routes.
    ///
    /// Returns the server-assigned job uid used for polling and
    /// download.
    pub async fn submit(
        &self,
        route_ids: &[DbId],
        request: &EstimationRequestInfo,
    ) -> Result<String, EstimationError> {
        let form = FormData::new()
            .json("routeIDs", &route_ids)?
            .json("param", request)?;

        let envelope = self
            .gateway
            .post_form::<UidPayload>(&self.urls.estimation_submit(), &form)
            .await?;

        match envelope.status() {
            ResultStatus::Success => {
                let uid = envelope.obj.ok_or(ApiError::MissingPayload)?.uid;
                tracing::info!(uid = %uid, routes = route_ids.len(), "Estimation submitted");
                self.publish(JobEvent::Submitted { uid: uid.clone() });
                Ok(uid)
            }
            _ => {
                let message = envelope.message_or_default();
                tracing::warn!(message = %message, "Estimation submission rejected");
                Err(EstimationError::Rejected(message))
            }
        }
    }

    /// Poll the result endpoint until the job finishes.
    ///
    /// The envelope code is the state machine here: success means the
    /// zip is ready, fail means the job is still running, error means
    /// the uid is unknown.  Transport errors abort the wait; callers
    /// resubmit or re-poll with the same uid.
    pub async fn wait_until_ready(
        &self,
        uid: &str,
        cancel: &CancellationToken,
    ) -> Result<(), EstimationError> {
        let url = self.urls.estimation_result();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            tracing::info!(uid, attempt, "Checking if estimation result is ready");

            let form = FormData::new().raw("uid", uid);
            let envelope = match self
                .gateway
                .post_form::<serde_json::Value>(&url, &form)
                .await
            {
                Ok(envelope) => envelope,
                Err(error) => {
                    self.publish(JobEvent::Failed {
                        uid: uid.to_string(),
                        error: error.to_string(),
                    });
                    return Err(error.into());
                }
            };

            match envelope.status() {
                ResultStatus::Success => {
                    tracing::info!(uid, attempt, "Estimation result ready");
                    self.publish(JobEvent::Ready {
                        uid: uid.to_string(),
                    });
                    return Ok(());
                }
                ResultStatus::Fail => {
                    // Still running.
                    self.publish(JobEvent::Polled {
                        uid: uid.to_string(),
                        attempt,
                    });
                }
                ResultStatus::Error => {
                    let message = envelope.message_or_default();
                    tracing::warn!(uid, message = %message, "Estimation failed on the server");
                    self.publish(JobEvent::Failed {
                        uid: uid.to_string(),
                        error: message.clone(),
                    });
                    return Err(EstimationError::Rejected(message));
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(uid, "Estimation wait cancelled");
                    self.publish(JobEvent::Cancelled { uid: uid.to_string() });
                    return Err(EstimationError::Cancelled(uid.to_string()));
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Download the result archive and extract it.
    ///
    /// The zip lands in the results directory, is extracted into a
    /// directory named after the uid, and is removed afterwards.
    /// Returns the extraction directory.
    pub async fn download(&self, uid: &str) -> Result<PathBuf, EstimationError> {
        tokio::fs::create_dir_all(&self.results_dir).await?;

        let zip_path = self.results_dir.join(format!("{uid}.zip"));
        let output_dir = self.results_dir.join(uid);

        let bytes = self
            .gateway
            .get_bytes(&self.urls.estimation_download(uid))
            .await?;
        tokio::fs::write(&zip_path, &bytes).await?;
        tracing::info!(uid, bytes = bytes.len(), "Result archive downloaded");

        // zip extraction is synchronous; keep it off the runtime threads.
        let extract_zip = zip_path.clone();
        let extract_dir = output_dir.clone();
        tokio::task::spawn_blocking(move || -> Result<(), EstimationError> {
            let file = std::fs::File::open(&extract_zip)?;
            let mut archive = zip::ZipArchive::new(file)?;
            archive.extract(&extract_dir)?;
            Ok(())
        })
        .await
        .map_err(|e| EstimationError::Extract(e.to_string()))??;

        tokio::fs::remove_file(&zip_path).await?;

        tracing::info!(uid, output_dir = %output_dir.display(), "Result extracted");
        self.publish(JobEvent::Downloaded {
            uid: uid.to_string(),
            output_dir: output_dir.clone(),
        });
        Ok(output_dir)
    }

    /// Full workflow: validate, submit, wait, download.
    pub async fn estimate(
        &self,
        route_ids: &[DbId],
        request: &EstimationRequestInfo,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, EstimationError> {
        request.check()?;
        let uid = self.submit(route_ids, request).await?;
        self.wait_until_ready(&uid, cancel).await?;
        self.download(&uid).await
    }

    fn publish(&self, event: JobEvent) {
        let _ = self.events.send(event);
    }
}
