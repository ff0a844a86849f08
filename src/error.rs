//! Typed error signals for the console's remote boundaries.
//!
//! The Supabase backend reports failures as free text. The small closed set
//! of conditions the console reacts to is recognized by substring matching
//! against that text, confined to the two `classify_*` functions below.
//! Anything unrecognized falls through as `Backend` carrying the raw message.

use crate::i18n::TranslationKey;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Sign-in rejected by the identity backend.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Transport-level failure on a primary (non-audit) call.
    #[error("network error: {0}")]
    Network(String),

    /// The profile/email join reported an ambiguous identifier.
    #[error("ambiguous identifier in user/email join")]
    AmbiguousIdJoin,

    /// The `get_users_with_emails` procedure is missing on the backend.
    #[error("user listing function is not installed")]
    MissingDatabaseFunction,

    /// Row-level authorization rejected the operation.
    #[error("permission denied")]
    PermissionDenied,

    /// `admin_create_user` reported an already-registered email.
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// The `admin_create_user` procedure is missing on the backend.
    #[error("user provisioning function is not available")]
    ProvisioningUnavailable,

    /// A profile update failed; carries the backend message.
    #[error("update failed: {0}")]
    UpdateFailed(String),

    /// An update/select returned no row for the given id.
    #[error("user not found")]
    NotFound,

    /// The reports endpoint could not be reached at all (CORS/network).
    #[error("reports endpoint unreachable")]
    EndpointUnreachable,

    /// The reports endpoint answered with a structured failure.
    #[error("reports API error: {0}")]
    ReportsApi(String),

    /// Client-side validation failure, caught before any network call.
    #[error("validation failed for field '{field}'")]
    Validation {
        field: &'static str,
        key: TranslationKey,
    },

    /// Unrecognized backend failure, raw text passed through.
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Translation key for errors the UI renders with a dedicated message.
    ///
    /// Errors without a recognized key are rendered as a generic prefix plus
    /// the raw error text.
    pub fn known_key(&self) -> Option<TranslationKey> {
        match self {
            ApiError::AmbiguousIdJoin => Some(TranslationKey::SupabaseAmbiguousIdError),
            ApiError::MissingDatabaseFunction => Some(TranslationKey::DatabaseFunctionError),
            ApiError::PermissionDenied => Some(TranslationKey::PermissionDenied),
            ApiError::EndpointUnreachable => Some(TranslationKey::AppsScriptCorsError),
            ApiError::InvalidCredentials => Some(TranslationKey::LoginError),
            ApiError::DuplicateEmail => Some(TranslationKey::DuplicateEmailError),
            ApiError::ProvisioningUnavailable => Some(TranslationKey::ProvisioningError),
            ApiError::Validation { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Map a raw backend message from the user-listing procedure to a typed kind.
///
/// Recognized cases, in match order:
/// - `"ambiguous"`              -> [`ApiError::AmbiguousIdJoin`]
/// - `"get_users_with_emails"`  -> [`ApiError::MissingDatabaseFunction`]
/// - `"permission"`             -> [`ApiError::PermissionDenied`]
///
/// Everything else is passed through as [`ApiError::Backend`].
pub fn classify_fetch_users_error(message: &str) -> ApiError {
    if message.contains("ambiguous") {
        ApiError::AmbiguousIdJoin
    } else if message.contains("get_users_with_emails") {
        ApiError::MissingDatabaseFunction
    } else if message.contains("permission") {
        ApiError::PermissionDenied
    } else {
        ApiError::Backend(message.to_string())
    }
}

/// Map a raw backend message from the provisioning procedure to a typed kind.
///
/// Recognized cases, in match order:
/// - `"Ya existe un usuario"` -> [`ApiError::DuplicateEmail`]
/// - `"admin_create_user"`    -> [`ApiError::ProvisioningUnavailable`]
/// - `"permission"` / `"permisos"` -> [`ApiError::PermissionDenied`]
///
/// Everything else is passed through as [`ApiError::Backend`].
pub fn classify_create_user_error(message: &str) -> ApiError {
    if message.contains("Ya existe un usuario") {
        ApiError::DuplicateEmail
    } else if message.contains("admin_create_user") {
        ApiError::ProvisioningUnavailable
    } else if message.contains("permission") || message.contains("permisos") {
        ApiError::PermissionDenied
    } else {
        ApiError::Backend(message.to_string())
    }
}
