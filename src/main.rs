//! renewal-reminders server binary.
//!
//! Loads configuration from the environment, connects to PostgreSQL, starts
//! the daily reminder scheduler and serves the reminder HTTP API until
//! Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use renewal_reminders::adapters::http::{reminder_router, ReminderAppState};
use renewal_reminders::adapters::{
    DailyReminderScheduler, DailySchedule, MiniJinjaReminderRenderer, PostgresDispatchLedger,
    PostgresSubscriptionRepository, PostgresUserLookup, SmtpNotificationPort, SystemClock,
};
use renewal_reminders::application::{ReminderRunner, ReminderRunnerConfig};
use renewal_reminders::config::{AppConfig, ServerConfig};
use renewal_reminders::ports::{Clock, SubscriptionRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.server);
    config.validate().context("invalid configuration")?;

    let timezone = config.reminders.tz()?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("failed to connect to PostgreSQL")?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("Database migrations applied");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(timezone));
    let repository: Arc<dyn SubscriptionRepository> =
        Arc::new(PostgresSubscriptionRepository::new(pool.clone()));
    let renderer = MiniJinjaReminderRenderer::new().context("failed to compile email templates")?;
    let notifier =
        SmtpNotificationPort::from_config(&config.email).context("failed to configure SMTP")?;

    let mut runner_config = ReminderRunnerConfig::default()
        .with_lookahead_days(config.reminders.lookahead_days)
        .with_max_concurrent_dispatches(config.reminders.max_concurrent_dispatches);
    if let Some(timeout) = config.reminders.run_timeout() {
        runner_config = runner_config.with_run_timeout(timeout);
    }

    let mut runner = ReminderRunner::new(
        clock.clone(),
        repository.clone(),
        Arc::new(PostgresUserLookup::new(pool.clone())),
        Arc::new(renderer),
        Arc::new(notifier),
    )
    .with_config(runner_config);
    if config.reminders.ledger_enabled {
        runner = runner.with_ledger(Arc::new(PostgresDispatchLedger::new(pool.clone())));
    }
    let runner = Arc::new(runner);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let scheduler = if config.reminders.scheduler_enabled {
        let schedule = DailySchedule::new(
            timezone,
            config.reminders.schedule_hour,
            config.reminders.schedule_minute,
        )
        .context("invalid reminder schedule time")?;
        let scheduler = DailyReminderScheduler::new(runner.clone(), schedule);
        let shutdown = shutdown_rx.clone();
        Some(tokio::spawn(async move { scheduler.run(shutdown).await }))
    } else {
        tracing::info!("Daily reminder scheduler disabled");
        None
    };

    let app = reminder_router()
        .with_state(ReminderAppState::new(runner, clock, repository))
        .layer(TraceLayer::new_for_http());

    let address = config.server.socket_addr()?;
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, environment = ?config.server.environment, "Listening");

    let server_shutdown = shutdown_rx.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(server_shutdown))
        .await
        .context("server error")?;

    if let Some(handle) = scheduler {
        handle.await.context("scheduler task failed")?;
    }

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
