//! Profile data access against the Supabase backend.
//!
//! Listing and provisioning go through server-side procedures
//! (`get_users_with_emails`, `admin_create_user`); updates and the soft
//! delete go straight to the `profiles` relation. Backend failures are
//! normalized into [`ApiError`] kinds by the classifiers in `error`.

use crate::error::{classify_create_user_error, classify_fetch_users_error, ApiError};
use crate::i18n::TranslationKey;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Authorization level attached to a profile. Fixed closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Coordinator,
    SstSpecialist,
    Nurse,
    Employee,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Coordinator,
        Role::SstSpecialist,
        Role::Nurse,
        Role::Employee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coordinator => "coordinator",
            Role::SstSpecialist => "sst_specialist",
            Role::Nurse => "nurse",
            Role::Employee => "employee",
        }
    }

    /// Parse a backend role string, falling back to `Employee` for anything
    /// unrecognized (mirrors the tolerant mapping at the fetch boundary).
    pub fn from_code_or_default(code: &str) -> Role {
        match code {
            "admin" => Role::Admin,
            "coordinator" => Role::Coordinator,
            "sst_specialist" => Role::SstSpecialist,
            "nurse" => Role::Nurse,
            _ => Role::Employee,
        }
    }
}

/// The application-level user record, distinct from raw identity credentials.
///
/// `id` is assigned by the identity backend and immutable. `email` is
/// authoritative only from the backend join; a placeholder is synthesized
/// when it is absent. `is_active == false` means soft-deleted: the record
/// stays visible, it is never physically removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub company: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub phone: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<String>,
}

/// Raw row shape returned by `get_users_with_emails`. Everything except the
/// id may be null on the wire.
#[derive(Debug, Deserialize)]
struct UserRow {
    id: String,
    name: Option<String>,
    role: Option<String>,
    company: Option<String>,
    department: Option<String>,
    phone: Option<String>,
    is_active: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    email: Option<String>,
    last_sign_in_at: Option<String>,
}

impl UserRow {
    fn into_profile(self) -> Profile {
        let email = match self.email.filter(|e| !e.is_empty()) {
            Some(email) => email,
            // Placeholder for identities with no joined email
            None => format!("user_{}@domain.com", truncate_id(&self.id)),
        };

        Profile {
            email: Some(email),
            name: self.name.unwrap_or_else(|| "Sin nombre".to_string()),
            role: self
                .role
                .as_deref()
                .map(Role::from_code_or_default)
                .unwrap_or(Role::Employee),
            company: self.company.unwrap_or_else(|| "Sin empresa".to_string()),
            department: self.department.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
            created_at: self.created_at.unwrap_or_default(),
            updated_at: self.updated_at.unwrap_or_default(),
            last_sign_in_at: self.last_sign_in_at,
            id: self.id,
        }
    }
}

fn truncate_id(id: &str) -> &str {
    let end = id
        .char_indices()
        .nth(8)
        .map(|(idx, _)| idx)
        .unwrap_or(id.len());
    &id[..end]
}

/// Data for the create operation. The password is required at creation only
/// and never stored client-side.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub company: String,
    pub department: Option<String>,
    pub phone: Option<String>,
}

impl CreateUserRequest {
    /// Client-side validation, performed before any network call.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation {
                field: "name",
                key: TranslationKey::NameRequired,
            });
        }
        if self.email.trim().is_empty() {
            return Err(ApiError::Validation {
                field: "email",
                key: TranslationKey::EmailRequired,
            });
        }
        if self.password.len() < 6 {
            return Err(ApiError::Validation {
                field: "password",
                key: TranslationKey::PasswordTooShort,
            });
        }
        if self.company.trim().is_empty() {
            return Err(ApiError::Validation {
                field: "company",
                key: TranslationKey::CompanyRequired,
            });
        }
        Ok(())
    }
}

/// Sparse update for a profile. Only fields explicitly provided are sent.
///
/// `department` and `phone` accept an explicit empty string (the field is
/// cleared); `is_active` is tri-state and included only when set.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn is_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    /// Build the sparse PATCH body. Blank name/role/company are not sent;
    /// provided department/phone are sent trimmed, empty string included.
    pub fn to_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(role) = self.role {
            body.insert("role".to_string(), json!(role.as_str()));
        }
        if let Some(company) = self
            .company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            body.insert("company".to_string(), json!(company));
        }
        if let Some(department) = self.department.as_deref() {
            body.insert("department".to_string(), json!(department.trim()));
        }
        if let Some(phone) = self.phone.as_deref() {
            body.insert("phone".to_string(), json!(phone.trim()));
        }
        if let Some(is_active) = self.is_active {
            body.insert("is_active".to_string(), json!(is_active));
        }
        body
    }
}

/// Client for profile operations against the Supabase REST surface.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl UserClient {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: into_trimmed(base_url.into()),
            anon_key: anon_key.into(),
        }
    }

    /// Fetch all user profiles with their joined emails.
    ///
    /// An empty or null result is an empty list, not an error.
    pub async fn fetch_users(&self, access_token: &str) -> Result<Vec<Profile>, ApiError> {
        let url = format!("{}/rest/v1/rpc/get_users_with_emails", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let message = backend_message(response).await;
            return Err(classify_fetch_users_error(&message));
        }

        let rows: Option<Vec<UserRow>> = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let users: Vec<Profile> = rows
            .unwrap_or_default()
            .into_iter()
            .map(UserRow::into_profile)
            .collect();

        info!("Fetched {} users", users.len());
        Ok(users)
    }

    /// Provision a new user through `admin_create_user`.
    ///
    /// Validates client-side first; a validation failure issues no network
    /// call at all.
    pub async fn create_user(
        &self,
        access_token: &str,
        request: &CreateUserRequest,
    ) -> Result<Profile, ApiError> {
        request.validate()?;

        let url = format!("{}/rest/v1/rpc/admin_create_user", self.base_url);
        debug!("Creating user {}", request.email.trim());

        let body = json!({
            "user_email": request.email.trim(),
            "user_password": request.password,
            "user_name": request.name.trim(),
            "user_role": request.role.as_str(),
            "user_company": request.company.trim(),
            "user_department": request.department.as_deref().map(str::trim).unwrap_or(""),
            "user_phone": request.phone.as_deref().map(str::trim).unwrap_or(""),
        });

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let message = backend_message(response).await;
            return Err(classify_create_user_error(&message));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        // The procedure reports its own structured failures with HTTP 200.
        if payload.get("success").and_then(Value::as_bool) == Some(false) {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Error desconocido al crear usuario");
            return Err(classify_create_user_error(message));
        }

        let record = payload.get("user").cloned().unwrap_or(payload);
        let created: Profile = serde_json::from_value(record)
            .map_err(|e| ApiError::Backend(format!("malformed create response: {}", e)))?;

        info!("Created user {}", created.id);
        Ok(created)
    }

    /// Apply a sparse update to a profile and return the updated row.
    pub async fn update_user(
        &self,
        access_token: &str,
        user_id: &str,
        update: &UserUpdate,
    ) -> Result<Profile, ApiError> {
        let url = format!("{}/rest/v1/profiles?id=eq.{}", self.base_url, user_id);

        let response = self
            .http
            .patch(&url)
            .header("apikey", &self.anon_key)
            .header("Prefer", "return=representation")
            .bearer_auth(access_token)
            .json(&update.to_body())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let message = backend_message(response).await;
            return Err(ApiError::UpdateFailed(message));
        }

        let rows: Vec<Profile> = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        rows.into_iter().next().ok_or(ApiError::NotFound)
    }

    /// Soft delete: flips `is_active` to false. Never removes the row.
    pub async fn deactivate_user(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Profile, ApiError> {
        debug!("Deactivating user {}", user_id);
        self.update_user(access_token, user_id, &UserUpdate::default().is_active(false))
            .await
    }
}

fn into_trimmed(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Extract the backend-supplied message from an error response body.
async fn backend_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(body),
        Err(_) => {
            if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                body
            }
        }
    }
}
