//! HTTP dispatch client for the room notification API.

use std::time::Duration;

use async_trait::async_trait;

use super::request::NotificationRequest;
use crate::error::NotifyError;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Default read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(3000);

/// Dispatch seam between the orchestrator and the HTTP layer.
///
/// Implementations must be `Send + Sync` so the orchestrator can be shared
/// across concurrent pipeline jobs.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Perform a single dispatch attempt. No retries.
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

/// HTTP client for the room notification endpoint.
///
/// One outbound POST per dispatch. Success is decided solely by the
/// response status code: 204 for a normal send, 202 for a credential
/// test. Anything else is a protocol failure carrying the status, and a
/// transport problem (refused connection, timeout, DNS) is reported as
/// such.
#[derive(Clone)]
pub struct RoomClient {
    client: reqwest::Client,
}

impl RoomClient {
    /// Create a client with the default 3 second connect/read timeouts.
    pub fn new() -> Result<Self, NotifyError> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(connect: Duration, read: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(read)
            .build()
            .map_err(NotifyError::Transport)?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shared connection pool).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Dispatcher for RoomClient {
    async fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let url = request.target_url();
        let expected = request.expected_status();

        let response = self
            .client
            .post(&url)
            .form(&request.form_params())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "failed to reach the chat service");
                metrics::counter!("roomcast_notify_errors_total", "kind" => "transport")
                    .increment(1);
                NotifyError::Transport(e)
            })?;

        let status = response.status().as_u16();

        // Drain the body so the connection can be reused; the API sends
        // nothing we act on besides the status code.
        if let Err(e) = response.bytes().await {
            tracing::debug!(error = %e, "failed to drain response body");
        }

        if status == expected {
            tracing::debug!(status, "notification accepted");
            metrics::counter!("roomcast_notifications_sent_total").increment(1);
            Ok(())
        } else {
            tracing::warn!(status, expected, "api error");
            metrics::counter!("roomcast_notify_errors_total", "kind" => "status").increment(1);
            Err(NotifyError::UnexpectedStatus { status, expected })
        }
    }
}

impl std::fmt::Debug for RoomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomClient").finish()
    }
}
