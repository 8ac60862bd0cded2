//! Command-line demo of the self-service portal client
//!
//! Signs in with the mock authentication context, prints the dashboard
//! summary and the first page of domains, then exits. With `--watch` the
//! dashboard keeps refreshing at the configured interval until Ctrl-C.
//!
//! The configuration file is taken from `PORTAL_CONFIG` when set.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use portal_api::{ApiClient, ListQuery};
use portal_core::validation::LoginForm;
use portal_core::{
    DashboardStore, DomainStore, FileAuthStorage, LogNotifier, MockAuth, Poller, PortalConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEMO_EMAIL: &str = "alex.morgan@example.com";
const DEMO_PASSWORD: &str = "demo";

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr, output to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let watch = std::env::args().skip(1).any(|arg| arg == "--watch");

    match run(watch).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(watch: bool) -> anyhow::Result<()> {
    let config_path = std::env::var_os("PORTAL_CONFIG").map(PathBuf::from);
    let config = PortalConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    tracing::info!("Using API at {}", config.api_base_url);

    let storage = Arc::new(FileAuthStorage::new(config.auth_state_path()?));
    let auth = Arc::new(MockAuth::new(storage, config.login_delay()));
    if auth.restore().await? {
        tracing::info!("Restored previous session");
    } else {
        auth.login(&LoginForm::new(DEMO_EMAIL, DEMO_PASSWORD))
            .await
            .context("Sign-in failed")?;
    }
    let user = auth.require_user().await?;
    println!("Signed in as {} <{}> ({} plan)", user.name, user.email, user.plan);

    let client = Arc::new(ApiClient::new(config.api_client_config(), auth.clone())?);
    let notifier = Arc::new(LogNotifier);

    let dashboard = Arc::new(DashboardStore::new(client.clone(), notifier.clone()));
    let domains = DomainStore::new(client, notifier);

    if let Err(e) = dashboard.refresh().await {
        tracing::warn!("Dashboard unavailable: {e}");
    }
    print_dashboard(&dashboard).await;

    domains
        .fetch(ListQuery::default())
        .await
        .context("Failed to list domains")?;
    let state = domains.snapshot().await;
    println!("\nDomains ({} total)", state.list.total);
    for domain in &state.list.items {
        println!(
            "  {:<32} {:<10} expires {}  auto-renew: {}",
            domain.name,
            format!("{:?}", domain.status).to_lowercase(),
            domain.expires_at.format("%Y-%m-%d"),
            if domain.auto_renew { "on" } else { "off" },
        );
    }

    if watch {
        let poller = Poller::spawn(dashboard.clone(), config.poll_interval());
        tracing::info!("Watching dashboard, press Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        poller.stop();
        print_dashboard(&dashboard).await;
    }

    Ok(())
}

async fn print_dashboard(dashboard: &DashboardStore) {
    let state = dashboard.snapshot().await;
    let Some(summary) = state.summary else {
        println!("Dashboard: no data");
        return;
    };

    println!("\nDashboard");
    println!("  Active domains:   {}", summary.active_domains);
    println!("  Expiring soon:    {}", summary.expiring_domains);
    println!("  Open tickets:     {}", summary.open_tickets);
    println!("  Unpaid invoices:  {}", summary.unpaid_invoices);
    if let Some(next) = summary.next_payment {
        println!("  Next payment:     {}", next.format("%Y-%m-%d"));
    }

    if !state.activity.is_empty() {
        println!("\nRecent activity");
        for item in &state.activity {
            println!(
                "  {}  {}",
                item.occurred_at.format("%Y-%m-%d %H:%M"),
                item.description
            );
        }
    }
}
