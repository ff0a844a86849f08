use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Supabase (identity + profile storage)
    pub supabase_url: String,
    pub supabase_anon_key: String,

    // Apps Script endpoints (audit logging + reports)
    pub apps_script_url: Option<String>,
    pub reports_api_url: Option<String>,

    // Audit logging client
    pub audit_timeout_ms: u64,
    pub audit_retry_attempts: u32,
    pub audit_fallback: bool,

    // Presentation
    pub users_per_page: usize,
    pub toast_duration_ms: u64,

    // Language preference
    pub language_file: String,
    pub default_language: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Supabase
            supabase_url: std::env::var("SUPABASE_URL")
                .context("SUPABASE_URL not set")?,
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY")
                .context("SUPABASE_ANON_KEY not set")?,

            // Apps Script - unset means audit logging / reports are disabled
            apps_script_url: std::env::var("APPS_SCRIPT_URL").ok().filter(|v| !v.is_empty()),
            reports_api_url: std::env::var("REPORTS_API_URL").ok().filter(|v| !v.is_empty()),

            // Audit logging
            audit_timeout_ms: std::env::var("AUDIT_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15_000),
            audit_retry_attempts: std::env::var("AUDIT_RETRY_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            audit_fallback: std::env::var("AUDIT_FALLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),

            // Presentation
            users_per_page: std::env::var("USERS_PER_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            toast_duration_ms: std::env::var("TOAST_DURATION_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),

            // Language
            language_file: std::env::var("LANGUAGE_FILE")
                .unwrap_or_else(|_| "data/language".to_string()),
            default_language: std::env::var("DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "es".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "SUPABASE_URL",
            "SUPABASE_ANON_KEY",
            "APPS_SCRIPT_URL",
            "REPORTS_API_URL",
            "AUDIT_TIMEOUT_MS",
            "AUDIT_RETRY_ATTEMPTS",
            "AUDIT_FALLBACK",
            "USERS_PER_PAGE",
            "TOAST_DURATION_MS",
            "LANGUAGE_FILE",
            "DEFAULT_LANGUAGE",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_supabase_url() {
        clear_env();
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SUPABASE_URL"));
    }

    #[test]
    #[serial]
    fn test_from_env_requires_anon_key() {
        clear_env();
        std::env::set_var("SUPABASE_URL", "https://example.supabase.co");

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SUPABASE_ANON_KEY"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("SUPABASE_URL", "https://example.supabase.co");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");

        let config = Config::from_env().expect("Should load config");

        assert!(config.apps_script_url.is_none());
        assert!(config.reports_api_url.is_none());
        assert_eq!(config.audit_timeout_ms, 15_000);
        assert_eq!(config.audit_retry_attempts, 2);
        assert!(config.audit_fallback);
        assert_eq!(config.users_per_page, 10);
        assert_eq!(config.toast_duration_ms, 5_000);
        assert_eq!(config.language_file, "data/language");
        assert_eq!(config.default_language, "es");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("SUPABASE_URL", "https://example.supabase.co");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
        std::env::set_var("APPS_SCRIPT_URL", "https://script.example.com/exec");
        std::env::set_var("AUDIT_RETRY_ATTEMPTS", "5");
        std::env::set_var("AUDIT_FALLBACK", "false");
        std::env::set_var("USERS_PER_PAGE", "25");

        let config = Config::from_env().expect("Should load config");

        assert_eq!(
            config.apps_script_url.as_deref(),
            Some("https://script.example.com/exec")
        );
        assert_eq!(config.audit_retry_attempts, 5);
        assert!(!config.audit_fallback);
        assert_eq!(config.users_per_page, 25);
    }

    #[test]
    #[serial]
    fn test_empty_endpoint_treated_as_unset() {
        clear_env();
        std::env::set_var("SUPABASE_URL", "https://example.supabase.co");
        std::env::set_var("SUPABASE_ANON_KEY", "anon-key");
        std::env::set_var("REPORTS_API_URL", "");

        let config = Config::from_env().expect("Should load config");
        assert!(config.reports_api_url.is_none());
    }
}
