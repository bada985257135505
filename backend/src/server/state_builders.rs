//! Assemble the HTTP state from the configured adapters.

use std::sync::Arc;

use accounts::domain::AccountService;
use accounts::domain::ports::{AccountCommand, AccountQuery, UserRepository};
use accounts::inbound::http::state::HttpState;
use accounts::outbound::auth::OwnerOnlyAuthorizer;
use accounts::outbound::notify::ChannelEventPublisher;
use accounts::outbound::persistence::DieselUserRepository;

use super::{ServerConfig, UserStore};

type AccountPorts = (Arc<dyn AccountQuery>, Arc<dyn AccountCommand>);

fn account_ports<R>(
    users: Arc<R>,
    events: ChannelEventPublisher,
    page_size: u32,
) -> std::io::Result<AccountPorts>
where
    R: UserRepository + 'static,
{
    let service = AccountService::new(users, Arc::new(OwnerOnlyAuthorizer), Arc::new(events))
        .with_page_size(page_size)
        .map_err(|err| std::io::Error::other(format!("invalid page size: {err}")))?;
    let service = Arc::new(service);
    Ok((service.clone(), service))
}

/// Wire the account service over whichever store is configured.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the page size is rejected.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    events: ChannelEventPublisher,
) -> std::io::Result<HttpState> {
    let (accounts, account_commands) = match &config.store {
        UserStore::Postgres(pool) => account_ports(
            Arc::new(DieselUserRepository::new(pool.clone())),
            events,
            config.page_size,
        )?,
        UserStore::Memory(repository) => {
            account_ports(repository.clone(), events, config.page_size)?
        }
    };

    Ok(HttpState::new(
        Arc::new(config.authenticator.clone()),
        accounts,
        account_commands,
    ))
}
