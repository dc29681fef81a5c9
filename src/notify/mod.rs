//! Notification dispatch for build-pipeline jobs.
//!
//! This module ties the pieces of a notification together:
//! - `AuthRegistry` resolves a room name to its credentials
//! - `NotificationRequest` builds the wire parameters and target URL
//! - `RoomClient` performs the HTTP POST and classifies the status code
//! - `RoomNotifier` orchestrates the chain and folds every failure into
//!   an `Outcome` according to the caller's failure policy
//!
//! # Architecture
//!
//! ```text
//! RoomNotifier -> AuthRegistry (lookup)
//!              -> NotificationRequest (build)
//!              -> Dispatcher (send)
//!              -> Outcome
//! ```
//!
//! Each invocation is a single synchronous call chain: no retries, no
//! background work. The registry is the only shared state and is
//! read-only during dispatch.

pub mod client;
pub mod registry;
pub mod request;

use std::sync::Arc;

use clap::ValueEnum;

use crate::command::{self, CommandSpec};
use crate::config::SecretString;
use crate::error::NotifyError;

pub use client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, Dispatcher, RoomClient};
pub use registry::{AuthRecord, AuthRegistry};
pub use request::{Color, NotificationRequest};

/// Where the message text comes from.
#[derive(Debug, Clone)]
pub enum MessageSource {
    /// Post the text as-is.
    Literal(String),
    /// Run a local command and post its captured standard output.
    Command(CommandSpec),
}

/// What a failed notification does to the overall reported outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OnFailure {
    /// Report success regardless; an unsent chat message should not fail
    /// the job.
    Ignore,
    /// Report the job as unstable.
    Unstable,
    /// Report the job as failed.
    #[default]
    Fail,
}

impl OnFailure {
    /// Outcome reported when the notification could not be sent.
    fn on_failed(self) -> Outcome {
        match self {
            OnFailure::Ignore => Outcome::Success,
            OnFailure::Unstable => Outcome::Unstable,
            OnFailure::Fail => Outcome::Failed,
        }
    }
}

/// Overall outcome reported back to the invoking pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Unstable,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Process exit code: 0 success, 2 unstable, 1 failed.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Unstable => 2,
            Outcome::Failed => 1,
        }
    }
}

/// Request options supplied by the job configuration.
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    pub color: Color,
    pub notify: bool,
    pub html: bool,
    pub from: String,
}

/// Orchestrates one notification: resolve the message, resolve the
/// authentication, build the request, dispatch, report.
///
/// Every resolution or dispatch failure is logged and folded into the
/// returned `Outcome`; `notify` never panics and never propagates an
/// error to the host pipeline.
pub struct RoomNotifier {
    api_url: String,
    registry: Arc<AuthRegistry>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl RoomNotifier {
    pub fn new(
        api_url: impl Into<String>,
        registry: Arc<AuthRegistry>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            registry,
            dispatcher,
        }
    }

    /// Send one notification to the room registered under `room_name`.
    pub async fn notify(
        &self,
        room_name: &str,
        source: MessageSource,
        options: &NotifyOptions,
        on_failure: OnFailure,
    ) -> Outcome {
        let message = match resolve_message(source).await {
            Some(m) if !m.trim().is_empty() => m,
            _ => {
                tracing::error!(
                    room = %room_name,
                    error = %NotifyError::EmptyMessage,
                    "nothing to send"
                );
                return on_failure.on_failed();
            }
        };

        let Some(auth) = self.registry.find_by_name(room_name) else {
            tracing::error!(
                error = %NotifyError::UnknownRoom(room_name.to_string()),
                "cannot notify"
            );
            return on_failure.on_failed();
        };

        let request = NotificationRequest::new(
            self.api_url.clone(),
            auth.token().clone(),
            auth.room(),
            message,
        )
        .with_color(options.color)
        .with_notify(options.notify)
        .with_html(options.html)
        .with_from(options.from.clone());

        match self.dispatcher.dispatch(&request).await {
            Ok(()) => {
                tracing::info!(room = %room_name, "notification sent");
                Outcome::Success
            }
            Err(e) => {
                tracing::warn!(room = %room_name, error = %e, "notification failed");
                on_failure.on_failed()
            }
        }
    }

    /// Validate that a token/room pair is reachable.
    ///
    /// Unlike `notify`, the error value is propagated directly so the
    /// caller can show the failure detail (status code, transport cause).
    pub async fn test_authentication(
        &self,
        token: SecretString,
        room_id: &str,
    ) -> Result<(), NotifyError> {
        let request = NotificationRequest::new(self.api_url.clone(), token, room_id, "")
            .with_auth_test(true);
        self.dispatcher.dispatch(&request).await
    }
}

impl std::fmt::Debug for RoomNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomNotifier")
            .field("api_url", &self.api_url)
            .field("rooms", &self.registry.len())
            .finish()
    }
}

async fn resolve_message(source: MessageSource) -> Option<String> {
    match source {
        MessageSource::Literal(text) => Some(text),
        MessageSource::Command(spec) => match command::capture_output(&spec).await {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::error!(error = %e, "message command failed");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Dispatcher stub recording every request and returning a scripted
    /// result.
    struct StubDispatcher {
        // (status, expected) to fail with, or None for success.
        fail_status: Option<(u16, u16)>,
        calls: Mutex<Vec<NotificationRequest>>,
    }

    impl StubDispatcher {
        fn succeeding() -> Self {
            Self {
                fail_status: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16, expected: u16) -> Self {
            Self {
                fail_status: Some((status, expected)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<NotificationRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Dispatcher for StubDispatcher {
        async fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
            self.calls.lock().unwrap().push(request.clone());
            match self.fail_status {
                None => Ok(()),
                Some((status, expected)) => {
                    Err(NotifyError::UnexpectedStatus { status, expected })
                }
            }
        }
    }

    fn ops_registry() -> Arc<AuthRegistry> {
        let mut registry = AuthRegistry::new();
        registry.register(AuthRecord::new(
            "ops",
            SecretString::new("T1".to_string()),
            "123",
        ));
        Arc::new(registry)
    }

    fn notifier(
        registry: Arc<AuthRegistry>,
        dispatcher: Arc<StubDispatcher>,
    ) -> RoomNotifier {
        RoomNotifier::new("https://chat.example.com/v2", registry, dispatcher)
    }

    #[tokio::test]
    async fn successful_notify_posts_exact_parameters() {
        let stub = Arc::new(StubDispatcher::succeeding());
        let notifier = notifier(ops_registry(), stub.clone());

        let options = NotifyOptions {
            color: Color::Green,
            ..Default::default()
        };
        let outcome = notifier
            .notify(
                "ops",
                MessageSource::Literal("deploy complete".to_string()),
                &options,
                OnFailure::Fail,
            )
            .await;

        assert_eq!(outcome, Outcome::Success);

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(
            request.target_url(),
            "https://chat.example.com/v2/room/123/notification?auth_token=T1"
        );
        assert_eq!(
            request.form_params(),
            vec![
                ("message", "deploy complete".to_string()),
                ("color", "green".to_string()),
                ("notify", "false".to_string()),
                ("message_format", "text".to_string()),
                ("from", String::new()),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_room_fails_without_dispatch() {
        let stub = Arc::new(StubDispatcher::succeeding());
        let notifier = notifier(ops_registry(), stub.clone());

        let outcome = notifier
            .notify(
                "missing",
                MessageSource::Literal("hello".to_string()),
                &NotifyOptions::default(),
                OnFailure::Fail,
            )
            .await;

        assert_eq!(outcome, Outcome::Failed);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_room_with_ignore_policy_reports_success() {
        let stub = Arc::new(StubDispatcher::succeeding());
        let notifier = notifier(ops_registry(), stub.clone());

        let outcome = notifier
            .notify(
                "missing",
                MessageSource::Literal("hello".to_string()),
                &NotifyOptions::default(),
                OnFailure::Ignore,
            )
            .await;

        assert_eq!(outcome, Outcome::Success);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_message_fails_without_dispatch() {
        let stub = Arc::new(StubDispatcher::succeeding());
        let notifier = notifier(ops_registry(), stub.clone());

        for message in ["", "   \n"] {
            let outcome = notifier
                .notify(
                    "ops",
                    MessageSource::Literal(message.to_string()),
                    &NotifyOptions::default(),
                    OnFailure::Fail,
                )
                .await;
            assert_eq!(outcome, Outcome::Failed);
        }
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn dispatch_failure_maps_through_policy() {
        let cases = [
            (OnFailure::Fail, Outcome::Failed),
            (OnFailure::Unstable, Outcome::Unstable),
            (OnFailure::Ignore, Outcome::Success),
        ];

        for (policy, expected) in cases {
            let stub = Arc::new(StubDispatcher::failing(500, 204));
            let notifier = notifier(ops_registry(), stub.clone());

            let outcome = notifier
                .notify(
                    "ops",
                    MessageSource::Literal("hello".to_string()),
                    &NotifyOptions::default(),
                    policy,
                )
                .await;

            assert_eq!(outcome, expected, "policy {:?}", policy);
            assert_eq!(stub.calls().len(), 1);
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_source_output_becomes_the_message() {
        let stub = Arc::new(StubDispatcher::succeeding());
        let notifier = notifier(ops_registry(), stub.clone());

        let outcome = notifier
            .notify(
                "ops",
                MessageSource::Command(CommandSpec::new("echo from-command")),
                &NotifyOptions::default(),
                OnFailure::Fail,
            )
            .await;

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(stub.calls()[0].message(), "from-command\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_source_failure_is_treated_as_no_message() {
        let stub = Arc::new(StubDispatcher::succeeding());
        let notifier = notifier(ops_registry(), stub.clone());

        let outcome = notifier
            .notify(
                "ops",
                MessageSource::Command(CommandSpec::new("false")),
                &NotifyOptions::default(),
                OnFailure::Unstable,
            )
            .await;

        assert_eq!(outcome, Outcome::Unstable);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_authentication_builds_auth_test_request_and_propagates_errors() {
        let stub = Arc::new(StubDispatcher::failing(401, 202));
        let notifier = notifier(ops_registry(), stub.clone());

        let result = notifier
            .test_authentication(SecretString::new("T1".to_string()), "123")
            .await;

        assert!(matches!(
            result,
            Err(NotifyError::UnexpectedStatus {
                status: 401,
                expected: 202
            })
        ));

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].is_auth_test());
        assert!(calls[0].target_url().ends_with("&auth_test=true"));
    }

    #[test]
    fn outcome_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::Unstable.exit_code(), 2);
        assert_eq!(Outcome::Failed.exit_code(), 1);
        assert!(Outcome::Success.is_success());
        assert!(!Outcome::Failed.is_success());
    }

    #[test]
    fn on_failure_default_is_fail() {
        assert_eq!(OnFailure::default(), OnFailure::Fail);
    }
}
