//! Application state and the intents operating on it.
//!
//! `AppState` is built once at startup and owns every collaborator: the auth
//! gateway, the data clients, the audit logger, the toast queue and the two
//! collection views. Intents mirror the console's user-facing actions; they
//! report outcomes through toasts and keep the view state coherent.

use crate::audit::{AuditAction, AuditClient, RetryPolicy};
use crate::auth::AuthGateway;
use crate::config::Config;
use crate::error::ApiError;
use crate::i18n::{resolve, Language, LanguageStore, TranslationKey};
use crate::pipeline::{ReportFilters, UserFilterState};
use crate::reports::{Report, ReportClient};
use crate::toast::ToastQueue;
use crate::users::{CreateUserRequest, Profile, UserClient, UserUpdate};
use serde_json::json;
use std::time::Duration;
use tracing::warn;

/// Create-or-update payload for the save intent.
#[derive(Debug, Clone)]
pub enum SaveUser {
    Create(CreateUserRequest),
    Update { user_id: String, update: UserUpdate },
}

pub struct AppState {
    pub auth: AuthGateway,
    pub toasts: ToastQueue,

    users_client: UserClient,
    reports_client: ReportClient,
    audit: AuditClient,
    language_store: LanguageStore,
    language: Language,

    /// Last successfully loaded user list; emptied on a failed load.
    pub users: Vec<Profile>,
    pub user_view: UserFilterState,

    /// Last successfully loaded report list; emptied on a failed load.
    pub reports: Vec<Report>,
    pub report_filters: ReportFilters,
    /// Inline error banner for the reports view. Unlike toasts it persists
    /// until the next successful load.
    pub report_error: Option<String>,

    refreshing: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let policy = RetryPolicy::new(config.audit_retry_attempts, Duration::from_millis(1_000))
            .with_fallback(config.audit_fallback);
        let audit = AuditClient::new(
            config.apps_script_url.clone(),
            policy,
            Duration::from_millis(config.audit_timeout_ms),
        );

        let user_agent = format!("um-console/{}", env!("CARGO_PKG_VERSION"));
        let auth = AuthGateway::new(
            &config.supabase_url,
            &config.supabase_anon_key,
            audit.clone(),
            user_agent,
        );

        let default_language = Language::from_code(&config.default_language)
            .unwrap_or_else(|_| Language::default_language());
        let language_store = LanguageStore::new(&config.language_file);
        let language = language_store.load(default_language);

        Self {
            auth,
            toasts: ToastQueue::new(Duration::from_millis(config.toast_duration_ms)),
            users_client: UserClient::new(&config.supabase_url, &config.supabase_anon_key),
            reports_client: ReportClient::new(config.reports_api_url.clone()),
            audit,
            language_store,
            language,
            users: Vec::new(),
            user_view: UserFilterState::new(config.users_per_page),
            reports: Vec::new(),
            report_filters: ReportFilters::default(),
            report_error: None,
            refreshing: false,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn audit(&self) -> &AuditClient {
        &self.audit
    }

    /// Switch the active language and persist the choice. A persistence
    /// failure keeps the in-memory switch and is only logged.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Err(e) = self.language_store.save(language) {
            warn!("Could not persist language preference: {:#}", e);
        }
    }

    /// Load (or reload) the user list.
    ///
    /// On success the list is replaced wholesale; an explicit refresh also
    /// confirms with a toast. On failure the visible list is emptied so the
    /// view never shows data the backend no longer vouches for.
    pub async fn load_users(&mut self, is_refresh: bool) {
        if self.refreshing {
            return;
        }
        let Some(session) = self.auth.current_session() else {
            warn!("load_users called without a session");
            return;
        };

        self.refreshing = true;
        match self.users_client.fetch_users(&session.access_token).await {
            Ok(users) => {
                self.users = users;
                if is_refresh {
                    self.toasts
                        .success(resolve(self.language, TranslationKey::DataRefreshed));
                }
            }
            Err(e) => {
                self.toasts
                    .error(self.describe_error(&e, TranslationKey::FetchUsersError));
                self.users.clear();
            }
        }
        self.refreshing = false;
    }

    /// Create or update a user, then reload the list.
    ///
    /// Outcomes are toasted either way; the returned result lets the caller
    /// decide whether to keep an edit form open.
    pub async fn save_user(&mut self, save: SaveUser) -> Result<Profile, ApiError> {
        let Some(session) = self.auth.current_session() else {
            return Err(ApiError::PermissionDenied);
        };

        let result = match &save {
            SaveUser::Create(request) => {
                let created = self
                    .users_client
                    .create_user(&session.access_token, request)
                    .await?;
                self.audit
                    .log_action(
                        AuditAction::CreateUser,
                        &session.email,
                        json!({ "email": request.email.trim(), "role": request.role.as_str() }),
                    )
                    .await;
                self.toasts
                    .success(resolve(self.language, TranslationKey::UserCreated));
                created
            }
            SaveUser::Update { user_id, update } => {
                let updated = self
                    .users_client
                    .update_user(&session.access_token, user_id, update)
                    .await?;
                self.audit
                    .log_action(
                        AuditAction::UpdateUser,
                        &session.email,
                        json!({ "userId": user_id }),
                    )
                    .await;
                self.toasts
                    .success(resolve(self.language, TranslationKey::UserUpdated));
                updated
            }
        };

        self.load_users(false).await;
        Ok(result)
    }

    /// Soft-delete a user (deactivation), then reload the list.
    pub async fn delete_user(&mut self, user_id: &str) -> Result<Profile, ApiError> {
        let Some(session) = self.auth.current_session() else {
            return Err(ApiError::PermissionDenied);
        };

        match self
            .users_client
            .deactivate_user(&session.access_token, user_id)
            .await
        {
            Ok(profile) => {
                self.audit
                    .log_action(
                        AuditAction::DeleteUser,
                        &session.email,
                        json!({ "userId": user_id }),
                    )
                    .await;
                self.toasts
                    .success(resolve(self.language, TranslationKey::UserDeleted));
                self.load_users(false).await;
                Ok(profile)
            }
            Err(e) => {
                self.toasts.error(format!(
                    "{}: {}",
                    resolve(self.language, TranslationKey::UserDeleteError),
                    e
                ));
                Err(e)
            }
        }
    }

    /// Load (or reload) the report list.
    ///
    /// A successful load clears the inline error banner and records a
    /// VIEW_REPORTS audit event with the row count. A failed load sets the
    /// banner, toasts, and empties the list.
    pub async fn load_reports(&mut self, is_refresh: bool) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;

        match self.reports_client.fetch_reports().await {
            Ok(reports) => {
                self.report_error = None;
                self.audit
                    .log_action(
                        AuditAction::ViewReports,
                        &self.actor_email(),
                        json!({ "reportCount": reports.len() }),
                    )
                    .await;
                self.reports = reports;
                if is_refresh {
                    self.toasts
                        .success(resolve(self.language, TranslationKey::ReportsRefreshed));
                }
            }
            Err(e) => {
                let message = self.describe_error(&e, TranslationKey::FetchReportsError);
                self.report_error = Some(message.clone());
                self.toasts.error(message);
                self.reports.clear();
            }
        }
        self.refreshing = false;
    }

    /// Record that a report document was opened and hand back its link.
    /// Reports without a document yield `None` and no audit event.
    pub async fn view_report_pdf(&self, report: &Report) -> Option<String> {
        if report.pdf_link.trim().is_empty() {
            return None;
        }
        self.audit
            .log_action(
                AuditAction::ViewReportPdf,
                &self.actor_email(),
                json!({ "reportId": report.id, "link": report.pdf_link }),
            )
            .await;
        Some(report.pdf_link.clone())
    }

    /// Toast message for an error: a dedicated translation when the kind has
    /// one, otherwise a generic prefix plus the raw error text.
    fn describe_error(&self, error: &ApiError, fallback: TranslationKey) -> String {
        match error.known_key() {
            Some(key) => resolve(self.language, key).to_string(),
            None => format!("{}: {}", resolve(self.language, fallback), error),
        }
    }

    fn actor_email(&self) -> String {
        self.auth
            .current_session()
            .map(|s| s.email)
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::Severity;
    use crate::users::Role;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str, language_file: &str) -> Config {
        Config {
            supabase_url: base_url.to_string(),
            supabase_anon_key: "anon-key".to_string(),
            apps_script_url: None,
            reports_api_url: Some(format!("{}/reports", base_url)),
            audit_timeout_ms: 1_000,
            audit_retry_attempts: 2,
            audit_fallback: true,
            users_per_page: 10,
            toast_duration_ms: 5_000,
            language_file: language_file.to_string(),
            default_language: "es".to_string(),
        }
    }

    fn profile(name: &str) -> Profile {
        Profile {
            id: format!("id-{}", name),
            name: name.to_string(),
            role: Role::Employee,
            company: "Acme".to_string(),
            department: String::new(),
            phone: String::new(),
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
            email: Some(format!("{}@x.com", name)),
            last_sign_in_at: None,
        }
    }

    async fn mock_sign_in(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token",
                "refresh_token": "refresh",
                "user": { "id": "user-1", "email": "admin@x.com" }
            })))
            .mount(server)
            .await;
    }

    async fn signed_in_state(server: &MockServer) -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let language_file = dir.path().join("language");
        let config = test_config(&server.uri(), language_file.to_str().unwrap());
        let state = AppState::new(&config);
        mock_sign_in(server).await;
        state.auth.sign_in("admin@x.com", "secret").await.unwrap();
        state
    }

    /// Like `signed_in_state`, but with the audit endpoint configured. The
    /// sign-in mounts its own LOGIN expectation, pinned to the wrapped
    /// `sessionInfo` payload shape.
    async fn signed_in_state_with_audit(server: &MockServer) -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let language_file = dir.path().join("language");
        let mut config = test_config(&server.uri(), language_file.to_str().unwrap());
        config.apps_script_url = Some(format!("{}/audit", server.uri()));
        let state = AppState::new(&config);

        Mock::given(method("POST"))
            .and(path("/audit"))
            .and(body_partial_json(json!({
                "action": "LOGIN",
                "user": "admin@x.com",
                "data": {
                    "sessionInfo": {
                        "userAgent": format!("um-console/{}", env!("CARGO_PKG_VERSION"))
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(server)
            .await;

        mock_sign_in(server).await;
        state.auth.sign_in("admin@x.com", "secret").await.unwrap();
        state
    }

    async fn mock_audit_action(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/audit"))
            .and(body_partial_json(body))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(server)
            .await;
    }

    // ==================== User Load Tests ====================

    #[tokio::test]
    async fn test_successful_load_replaces_list() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_users_with_emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "u1",
                    "name": "Ana",
                    "role": "admin",
                    "company": "Acme",
                    "is_active": true,
                    "email": "ana@x.com"
                }
            ])))
            .mount(&server)
            .await;

        state.load_users(false).await;
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].name, "Ana");
        // Plain load does not toast
        assert!(state.toasts.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_load_toasts_confirmation() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_users_with_emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        state.load_users(true).await;

        let toasts = state.toasts.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Success);
        assert_eq!(
            toasts[0].message,
            resolve(state.language(), TranslationKey::DataRefreshed)
        );
    }

    #[tokio::test]
    async fn failed_user_load_clears_previous_list() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;
        state.users = vec![profile("stale")];

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_users_with_emails"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "message": "permission denied for table profiles" })),
            )
            .mount(&server)
            .await;

        state.load_users(false).await;

        assert!(state.users.is_empty());
        let toasts = state.toasts.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Error);
        assert_eq!(
            toasts[0].message,
            resolve(state.language(), TranslationKey::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_load_without_session_is_noop() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(
            &server.uri(),
            dir.path().join("language").to_str().unwrap(),
        );
        let mut state = AppState::new(&config);
        state.users = vec![profile("kept")];

        state.load_users(false).await;
        assert_eq!(state.users.len(), 1);
    }

    // ==================== Save / Delete Tests ====================

    #[tokio::test]
    async fn test_validation_failure_issues_no_network_call() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/admin_create_user"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let request = CreateUserRequest {
            name: "  ".to_string(),
            email: "new@x.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Employee,
            company: "Acme".to_string(),
            department: None,
            phone: None,
        };

        let result = state.save_user(SaveUser::Create(request)).await;
        assert!(matches!(
            result,
            Err(ApiError::Validation { field: "name", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_toasts_and_reloads() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "u1",
                    "name": "Renamed",
                    "role": "employee",
                    "company": "Acme",
                    "is_active": true
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_users_with_emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let saved = state
            .save_user(SaveUser::Update {
                user_id: "u1".to_string(),
                update: UserUpdate::default().name("Renamed"),
            })
            .await
            .unwrap();

        assert_eq!(saved.name, "Renamed");
        let toasts = state.toasts.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(
            toasts[0].message,
            resolve(state.language(), TranslationKey::UserUpdated)
        );
    }

    #[tokio::test]
    async fn test_delete_failure_toasts_with_prefix() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;

        Mock::given(method("PATCH"))
            .and(path("/rest/v1/profiles"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })),
            )
            .mount(&server)
            .await;

        let result = state.delete_user("u1").await;
        assert!(result.is_err());

        let toasts = state.toasts.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, Severity::Error);
        let prefix = resolve(state.language(), TranslationKey::UserDeleteError);
        assert!(toasts[0].message.starts_with(prefix));
    }

    // ==================== Audit Wiring Tests ====================
    // One POST per successful mutating intent, with the action name and the
    // payload shape the endpoint expects. Counts are asserted by the mock
    // expectations when the server drops.

    #[tokio::test]
    async fn test_create_user_fires_one_create_user_audit() {
        let server = MockServer::start().await;
        let mut state = signed_in_state_with_audit(&server).await;

        mock_audit_action(
            &server,
            json!({
                "action": "CREATE_USER",
                "user": "admin@x.com",
                "data": { "email": "nina@x.com", "role": "nurse" }
            }),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/admin_create_user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": {
                    "id": "u9",
                    "name": "Nina",
                    "role": "nurse",
                    "company": "Acme",
                    "is_active": true,
                    "email": "nina@x.com"
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_users_with_emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let request = CreateUserRequest {
            name: "Nina".to_string(),
            email: "nina@x.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Nurse,
            company: "Acme".to_string(),
            department: None,
            phone: None,
        };
        state.save_user(SaveUser::Create(request)).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_user_fires_one_update_user_audit() {
        let server = MockServer::start().await;
        let mut state = signed_in_state_with_audit(&server).await;

        mock_audit_action(
            &server,
            json!({
                "action": "UPDATE_USER",
                "user": "admin@x.com",
                "data": { "userId": "u1" }
            }),
        )
        .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "u1",
                    "name": "Renamed",
                    "role": "employee",
                    "company": "Acme",
                    "is_active": true
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_users_with_emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        state
            .save_user(SaveUser::Update {
                user_id: "u1".to_string(),
                update: UserUpdate::default().name("Renamed"),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_user_fires_one_delete_user_audit() {
        let server = MockServer::start().await;
        let mut state = signed_in_state_with_audit(&server).await;

        mock_audit_action(
            &server,
            json!({
                "action": "DELETE_USER",
                "user": "admin@x.com",
                "data": { "userId": "u1" }
            }),
        )
        .await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "u1",
                    "name": "Ana",
                    "role": "employee",
                    "company": "Acme",
                    "is_active": false
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_users_with_emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        state.delete_user("u1").await.unwrap();
    }

    #[tokio::test]
    async fn test_load_reports_fires_view_reports_audit_with_count() {
        let server = MockServer::start().await;
        let mut state = signed_in_state_with_audit(&server).await;

        mock_audit_action(
            &server,
            json!({
                "action": "VIEW_REPORTS",
                "user": "admin@x.com",
                "data": { "reportCount": 1 }
            }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/reports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {
                        "ID": "r1",
                        "Fecha de verificación 验证日期": "15/03/2026",
                        "Centro de trabajo 地点": "Planta Norte",
                        "Proceso/tarea verificada 流程/任务已验证": "Andamios",
                        "Resultado Final 底線": "ACEPTABLE 可接受",
                        "Estado del cierre": "CERRADO",
                        "Link_PDF 連結_PDF": "https://x/pdf/r1"
                    }
                ]
            })))
            .mount(&server)
            .await;

        state.load_reports(false).await;
        assert_eq!(state.reports.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_fires_no_mutation_audit() {
        let server = MockServer::start().await;
        let mut state = signed_in_state_with_audit(&server).await;

        // Only the sign-in LOGIN event may reach the endpoint
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/admin_create_user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Ya existe un usuario registrado con este email"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/audit"))
            .and(body_partial_json(json!({ "action": "CREATE_USER" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = CreateUserRequest {
            name: "Nina".to_string(),
            email: "nina@x.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Nurse,
            company: "Acme".to_string(),
            department: None,
            phone: None,
        };
        let result = state.save_user(SaveUser::Create(request)).await;
        assert!(matches!(result, Err(ApiError::DuplicateEmail)));
    }

    // ==================== Report Load Tests ====================

    #[tokio::test]
    async fn test_successful_report_load_clears_banner() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;
        state.report_error = Some("previous failure".to_string());

        Mock::given(method("GET"))
            .and(path("/reports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {
                        "ID": "r1",
                        "Fecha de verificación 验证日期": "15/03/2026",
                        "Centro de trabajo 地点": "Planta Norte",
                        "Proceso/tarea verificada 流程/任务已验证": "Andamios",
                        "Resultado Final 底線": "ACEPTABLE 可接受",
                        "Estado del cierre": "CERRADO",
                        "Link_PDF 連結_PDF": "https://x/pdf/r1"
                    }
                ]
            })))
            .mount(&server)
            .await;

        state.load_reports(false).await;
        assert_eq!(state.reports.len(), 1);
        assert!(state.report_error.is_none());
    }

    #[tokio::test]
    async fn test_failed_report_load_sets_banner_and_empties_list() {
        let server = MockServer::start().await;
        let mut state = signed_in_state(&server).await;
        state.reports = vec![Report::from(crate::reports::RawReport {
            id: "stale".to_string(),
            verification_date: String::new(),
            work_center: String::new(),
            task: String::new(),
            result: String::new(),
            closure_status: String::new(),
            pdf_link: String::new(),
        })];

        Mock::given(method("GET"))
            .and(path("/reports"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "quota exceeded"
            })))
            .mount(&server)
            .await;

        state.load_reports(false).await;

        assert!(state.reports.is_empty());
        let banner = state.report_error.clone().unwrap();
        assert!(banner.contains("quota exceeded"));
        let toasts = state.toasts.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, banner);
    }

    // ==================== PDF / Language Tests ====================

    #[tokio::test]
    async fn test_view_report_pdf_returns_link_only_when_present() {
        let server = MockServer::start().await;
        let state = signed_in_state(&server).await;

        let with_link = Report::from(crate::reports::RawReport {
            id: "r1".to_string(),
            verification_date: String::new(),
            work_center: String::new(),
            task: String::new(),
            result: String::new(),
            closure_status: String::new(),
            pdf_link: "https://x/pdf/r1".to_string(),
        });
        assert_eq!(
            state.view_report_pdf(&with_link).await.as_deref(),
            Some("https://x/pdf/r1")
        );

        let without_link = Report::from(crate::reports::RawReport {
            id: "r2".to_string(),
            verification_date: String::new(),
            work_center: String::new(),
            task: String::new(),
            result: String::new(),
            closure_status: String::new(),
            pdf_link: "  ".to_string(),
        });
        assert_eq!(state.view_report_pdf(&without_link).await, None);
    }

    #[tokio::test]
    async fn test_set_language_persists_choice() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let language_file = dir.path().join("nested").join("language");
        let config = test_config(&server.uri(), language_file.to_str().unwrap());

        let mut state = AppState::new(&config);
        assert_eq!(state.language(), Language::SPANISH);

        state.set_language(Language::CHINESE);
        assert_eq!(state.language(), Language::CHINESE);

        let reloaded = AppState::new(&config);
        assert_eq!(reloaded.language(), Language::CHINESE);
    }
}
