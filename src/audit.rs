//! Best-effort audit logging to the external Apps Script endpoint.
//!
//! Audit logging is a secondary concern: primary operations must succeed or
//! fail independently of this endpoint's availability. The client retries a
//! bounded number of times with a linear backoff and, in fallback mode,
//! treats exhausted retries as a benign no-op.

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// User action mirrored to the external audit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CreateUser,
    UpdateUser,
    DeleteUser,
    Login,
    Logout,
    SyncUsers,
    ViewReports,
    ViewReportPdf,
}

/// Request body posted to the audit endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    /// ISO-8601 timestamp from the client clock.
    pub timestamp: String,
    /// Email of the acting user.
    pub user: String,
    pub data: Value,
}

impl AuditEvent {
    pub fn new(action: AuditAction, user: impl Into<String>, data: Value) -> Self {
        Self {
            action,
            timestamp: Utc::now().to_rfc3339(),
            user: user.into(),
            data,
        }
    }
}

/// Bounded-retry policy for the audit POST.
///
/// `max_attempts` counts total POSTs, including the first. The wait before
/// retry `n+1` is `backoff_step × n` (linear).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
    pub fallback_enabled: bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts,
            backoff_step,
            fallback_enabled: true,
        }
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Delay inserted after the given failed attempt (1-indexed).
    fn delay_after_attempt(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(1000))
    }
}

/// How a send resolved from the caller's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The endpoint accepted the event.
    Delivered,
    /// All attempts failed but fallback mode swallowed the failure.
    Fallback,
    /// No endpoint is configured; the event was logged locally only.
    Skipped,
}

/// Client for the audit endpoint.
#[derive(Debug, Clone)]
pub struct AuditClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl AuditClient {
    pub fn new(endpoint: Option<String>, policy: RetryPolicy, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            policy,
            timeout,
        }
    }

    /// Send one event, retrying per the policy.
    ///
    /// Returns `Ok` on delivery, on fallback resolution, and when no endpoint
    /// is configured; returns `Err` only when fallback mode is disabled and
    /// every attempt failed.
    pub async fn send(&self, event: &AuditEvent) -> Result<Outcome> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            debug!("Audit endpoint not configured, event logged locally: {:?}", event.action);
            return Ok(Outcome::Skipped);
        };

        let mut last_error = String::new();

        for attempt in 1..=self.policy.max_attempts {
            debug!("Audit POST attempt {}/{}: {:?}", attempt, self.policy.max_attempts, event.action);

            match self
                .http
                .post(endpoint)
                .timeout(self.timeout)
                .json(event)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    debug!("Audit event delivered: {:?}", event.action);
                    return Ok(Outcome::Delivered);
                }
                Ok(response) => {
                    last_error = format!("HTTP {}", response.status());
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }

            warn!(
                "Audit attempt {}/{} failed: {}",
                attempt, self.policy.max_attempts, last_error
            );

            if attempt < self.policy.max_attempts {
                sleep(self.policy.delay_after_attempt(attempt)).await;
            }
        }

        if self.policy.fallback_enabled {
            info!("Audit endpoint unavailable, continuing without remote logging");
            return Ok(Outcome::Fallback);
        }

        Err(anyhow!(
            "audit logging failed after {} attempts: {}",
            self.policy.max_attempts,
            last_error
        ))
    }

    /// System-facing wrapper: builds the event and swallows any failure.
    ///
    /// Never blocks or fails the calling operation; errors go to the
    /// diagnostic channel only.
    pub async fn log_action(&self, action: AuditAction, user_email: &str, data: Value) {
        let event = AuditEvent::new(action, user_email, data);
        if let Err(e) = self.send(&event).await {
            error!("Audit logging failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Action Serialization Tests ====================
    // The wire literals are part of the external contract.

    #[test]
    fn test_action_wire_literals() {
        let cases = [
            (AuditAction::CreateUser, "\"CREATE_USER\""),
            (AuditAction::UpdateUser, "\"UPDATE_USER\""),
            (AuditAction::DeleteUser, "\"DELETE_USER\""),
            (AuditAction::Login, "\"LOGIN\""),
            (AuditAction::Logout, "\"LOGOUT\""),
            (AuditAction::SyncUsers, "\"SYNC_USERS\""),
            (AuditAction::ViewReports, "\"VIEW_REPORTS\""),
            (AuditAction::ViewReportPdf, "\"VIEW_REPORT_PDF\""),
        ];

        for (action, expected) in cases {
            assert_eq!(serde_json::to_string(&action).unwrap(), expected);
        }
    }

    #[test]
    fn test_event_body_shape() {
        let event = AuditEvent::new(
            AuditAction::Login,
            "admin@example.com",
            serde_json::json!({"sessionInfo": {"userAgent": "test"}}),
        );

        let body: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(body["action"], "LOGIN");
        assert_eq!(body["user"], "admin@example.com");
        assert_eq!(body["data"]["sessionInfo"]["userAgent"], "test");
        // RFC 3339 timestamp from the client clock
        assert!(body["timestamp"].as_str().unwrap().contains('T'));
    }

    // ==================== Retry Policy Tests ====================

    #[test]
    fn test_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.backoff_step, Duration::from_millis(1000));
        assert!(policy.fallback_enabled);
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::new(4, Duration::from_millis(1000));
        assert_eq!(policy.delay_after_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_after_attempt(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_after_attempt(3), Duration::from_millis(3000));
    }

    #[test]
    fn test_with_fallback_builder() {
        let policy = RetryPolicy::default().with_fallback(false);
        assert!(!policy.fallback_enabled);
    }

    // ==================== Unconfigured Endpoint Tests ====================

    #[tokio::test]
    async fn test_send_without_endpoint_is_skipped() {
        let client = AuditClient::new(None, RetryPolicy::default(), Duration::from_secs(15));
        let event = AuditEvent::new(AuditAction::SyncUsers, "a@x.com", Value::Null);

        let outcome = client.send(&event).await.expect("Should succeed");
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[tokio::test]
    async fn test_log_action_without_endpoint_never_fails() {
        let client = AuditClient::new(None, RetryPolicy::default(), Duration::from_secs(15));
        // Must not panic or propagate anything
        client
            .log_action(AuditAction::Logout, "a@x.com", serde_json::json!({}))
            .await;
    }
}
