//! Account service entry point: settings, storage, notification worker and
//! the HTTP server.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::config::AccountsSettings;
use accounts::domain::{NotificationWorker, RetryPolicy};
use accounts::inbound::http::health::HealthState;
use accounts::outbound::auth::StaticTokenAuthenticator;
use accounts::outbound::memory::InMemoryUserRepository;
use accounts::outbound::notify::{TracingMailer, notification_channel};
use accounts::outbound::persistence::{DbPool, PoolConfig, migrate};
use server::{ServerConfig, UserStore, create_server};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

async fn open_store(settings: &AccountsSettings) -> color_eyre::Result<UserStore> {
    if let Some(url) = settings.database_url.as_deref() {
        let applied = migrate(url.to_owned())
            .await
            .wrap_err("failed to migrate the user store")?;
        info!(applied, "user store schema is current");
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("failed to connect to the user store")?;
        return Ok(UserStore::Postgres(pool));
    }

    let repository = match settings.seed_users_file.as_deref() {
        Some(path) => InMemoryUserRepository::from_seed_file(path)?,
        None => InMemoryUserRepository::new(),
    };
    warn!("no database configured; accounts are kept in memory");
    Ok(UserStore::Memory(Arc::new(repository)))
}

fn load_authenticator(settings: &AccountsSettings) -> color_eyre::Result<StaticTokenAuthenticator> {
    match settings.api_tokens_file.as_deref() {
        Some(path) => Ok(StaticTokenAuthenticator::from_file(path)?),
        None => {
            warn!("no API tokens configured; protected routes reject every request");
            Ok(StaticTokenAuthenticator::default())
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AccountsSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    settings.validate()?;

    let store = open_store(&settings).await?;
    let authenticator = load_authenticator(&settings)?;

    let (publisher, receiver) = notification_channel(settings.notification_queue_capacity()?);
    let worker = NotificationWorker::new(Arc::new(TracingMailer), settings.mail_from()?)
        .with_policy(RetryPolicy {
            max_attempts: settings.mail_max_attempts()?,
            ..RetryPolicy::default()
        });
    let worker_task = tokio::spawn(worker.run(receiver));

    let config = ServerConfig::new(settings.bind_addr()?)
        .with_store(store)
        .with_authenticator(authenticator)
        .with_page_size(settings.page_size()?);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config, publisher)?;
    info!(addr = %settings.bind_addr()?, "account service listening");
    let served = server.await;

    health_state.mark_unhealthy();
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker_task)
        .await
        .is_err()
    {
        warn!("notification worker did not drain before shutdown");
    }

    served.wrap_err("server terminated abnormally")
}
