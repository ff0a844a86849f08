//! Session/auth gateway wrapping the Supabase identity backend.
//!
//! The gateway owns the process-wide session slot: sign-in establishes it,
//! sign-out clears it, and everything else only observes it through
//! `current_session`. Sign-in and sign-out mirror LOGIN/LOGOUT events to the
//! audit client; audit trouble never blocks or fails either operation.

use crate::audit::{AuditAction, AuditClient};
use crate::error::ApiError;
use crate::users::{Profile, Role};
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Authenticated identity plus the derived application profile.
///
/// Exists from successful sign-in until sign-out or external invalidation.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub email: String,
    /// Profile row for the signed-in user; absent when the row could not be
    /// resolved (the session is still usable for identity-only flows).
    pub profile: Option<Profile>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.profile
            .as_ref()
            .map(|p| p.role == Role::Admin)
            .unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Gateway over sign-in, sign-out and session observation.
#[derive(Clone)]
pub struct AuthGateway {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    audit: AuditClient,
    user_agent: String,
    session: Arc<Mutex<Option<Session>>>,
    loading: Arc<AtomicBool>,
}

impl AuthGateway {
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        audit: AuditClient,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            audit,
            user_agent: user_agent.into(),
            session: Arc::new(Mutex::new(None)),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Read-only synchronous access to the session slot. `None` until a
    /// sign-in or startup restore resolves.
    pub fn current_session(&self) -> Option<Session> {
        self.session_slot().clone()
    }

    /// True iff the resolved profile's role is admin. Gates destructive and
    /// creation operations.
    pub fn is_admin(&self) -> bool {
        self.current_session()
            .map(|s| s.is_admin())
            .unwrap_or(false)
    }

    /// True while the startup session restore is in flight. The
    /// authenticated view should not render during this window.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Authenticate with email and password.
    ///
    /// On success establishes the session and fires a LOGIN audit event
    /// carrying the client user-agent.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            debug!("Sign-in rejected with HTTP {}", response.status());
            return Err(ApiError::InvalidCredentials);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let session = self.build_session(token).await;
        info!("Signed in as {}", session.email);

        *self.session_slot() = Some(session.clone());

        self.audit
            .log_action(
                AuditAction::Login,
                &session.email,
                json!({ "sessionInfo": { "userAgent": self.user_agent } }),
            )
            .await;

        Ok(session)
    }

    /// Sign out the current session.
    ///
    /// The LOGOUT audit event is attempted before invalidation; its failure
    /// never blocks or fails the sign-out itself.
    pub async fn sign_out(&self) {
        let Some(session) = self.current_session() else {
            return;
        };

        self.audit
            .log_action(
                AuditAction::Logout,
                &session.email,
                json!({ "sessionInfo": { "userAgent": self.user_agent } }),
            )
            .await;

        let url = format!("{}/auth/v1/logout", self.base_url);
        let result = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;

        if let Err(e) = result {
            warn!("Backend sign-out call failed: {}", e);
        }

        *self.session_slot() = None;
        info!("Signed out {}", session.email);
    }

    /// Resolve a previously persisted session at startup.
    ///
    /// Sets the loading flag for the duration of the exchange so the caller
    /// can hold off rendering the authenticated view.
    pub async fn resolve_startup_session(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<Option<Session>, ApiError> {
        let Some(refresh_token) = refresh_token else {
            return Ok(None);
        };

        self.loading.store(true, Ordering::SeqCst);
        let result = self.refresh_session(refresh_token).await;
        self.loading.store(false, Ordering::SeqCst);

        result.map(Some)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, ApiError> {
        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::InvalidCredentials);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let session = self.build_session(token).await;
        *self.session_slot() = Some(session.clone());
        Ok(session)
    }

    // A panic while the slot is held must not wedge every later caller.
    fn session_slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    async fn build_session(&self, token: TokenResponse) -> Session {
        let email = token.user.email.unwrap_or_default();
        let profile = self.fetch_own_profile(&token.access_token, &token.user.id).await;

        Session {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            user_id: token.user.id,
            email,
            profile,
        }
    }

    /// Fetch the signed-in user's own profile row. Failure degrades to a
    /// session without a profile rather than failing the sign-in.
    async fn fetch_own_profile(&self, access_token: &str, user_id: &str) -> Option<Profile> {
        let url = format!(
            "{}/rest/v1/profiles?id=eq.{}&select=*",
            self.base_url, user_id
        );

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                match response.json::<Vec<Profile>>().await {
                    Ok(rows) => rows.into_iter().next(),
                    Err(e) => {
                        warn!("Could not parse own profile: {}", e);
                        None
                    }
                }
            }
            Ok(response) => {
                warn!("Profile lookup returned HTTP {}", response.status());
                None
            }
            Err(e) => {
                warn!("Profile lookup failed: {}", e);
                None
            }
        }
    }
}
