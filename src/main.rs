use anyhow::Result;
use tracing::{info, warn};
use um_console::app::AppState;
use um_console::audit::AuditAction;
use um_console::config::Config;
use um_console::i18n::{resolve, TranslationKey};
use um_console::pipeline::{filter_reports, report_statistics, user_statistics};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("um_console=info".parse()?),
        )
        .init();

    info!("Starting console sync pass");

    // Load configuration from environment
    let config = Config::from_env()?;
    let mut state = AppState::new(&config);

    // Surface every toast in the log while running headless
    state.toasts.subscribe(|toasts| {
        if let Some(latest) = toasts.first() {
            info!("[toast {:?}] {}", latest.severity, latest.message);
        }
    });

    // Optional operator credentials; without them only the public report
    // feed is synced.
    let email = std::env::var("CONSOLE_EMAIL").ok();
    let password = std::env::var("CONSOLE_PASSWORD").ok();

    if let (Some(email), Some(password)) = (email, password) {
        let session = state.auth.sign_in(&email, &password).await?;
        info!(
            "Signed in as {} (admin: {})",
            session.email,
            state.auth.is_admin()
        );

        state.load_users(false).await;
        let stats = user_statistics(&state.users, state.language());
        info!(
            "{}: {}, {}: {}",
            resolve(state.language(), TranslationKey::TotalUsers),
            stats.total,
            resolve(state.language(), TranslationKey::ActiveUsers),
            stats.active
        );
        info!(
            "{}: {}",
            resolve(state.language(), TranslationKey::RoleDistribution),
            stats.role_distribution
        );

        if let Some(session) = state.auth.current_session() {
            state
                .audit()
                .log_action(
                    AuditAction::SyncUsers,
                    &session.email,
                    serde_json::json!({ "count": state.users.len() }),
                )
                .await;
        }
    } else {
        warn!("CONSOLE_EMAIL/CONSOLE_PASSWORD not set, skipping user sync");
    }

    state.load_reports(false).await;
    let today = chrono::Local::now().date_naive();
    let filtered = filter_reports(&state.reports, &state.report_filters, today);
    let stats = report_statistics(&filtered);
    info!(
        "{}: {} ({}% {})",
        resolve(state.language(), TranslationKey::TotalReports),
        stats.total,
        stats.acceptable_percentage,
        resolve(state.language(), TranslationKey::Acceptable)
    );

    if state.auth.current_session().is_some() {
        state.auth.sign_out().await;
    }

    info!("Console sync pass finished");
    Ok(())
}
