use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtdesk_shell::{LogFormat, ShellConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ShellConfig::from_env()?;

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "courtdesk_shell=debug,courtdesk_events=debug,courtdesk_core=info".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(
        data_dir = %config.data_dir.display(),
        persist = config.persist,
        today = %config.today(),
        "Loaded shell configuration"
    );

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let report = courtdesk_shell::run(config, &path).await?;
    tracing::info!(
        authenticated = report.authenticated,
        page = report.route.title(),
        breadcrumb = ?report.breadcrumb,
        "Shell exited"
    );
    Ok(())
}
